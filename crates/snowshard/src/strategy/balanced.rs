use core::str::FromStr;
use std::collections::HashMap;

use serde::Deserialize;

use crate::{BuildError, Dst, RandSource, ShardedId, Strategy, ThreadRandom};

/// Ordering applied to broadcast enumerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastMode {
    /// Keep the base strategy's order unchanged.
    Default,
    /// Interleave destinations across databases so no database receives
    /// two consecutive scan queries while others sit idle.
    RoundRobin,
    /// Randomly permute the destinations on every call.
    Shuffle,
}

impl Default for BroadcastMode {
    fn default() -> Self {
        Self::Default
    }
}

impl FromStr for BroadcastMode {
    type Err = BuildError;

    /// Parses a configuration string. The empty string normalizes to
    /// [`BroadcastMode::Default`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(Self::Default),
            "round_robin" => Ok(Self::RoundRobin),
            "shuffle" => Ok(Self::Shuffle),
            other => Err(BuildError::UnknownBroadcastMode(other.to_owned())),
        }
    }
}

/// A load-balancing decorator over a base [`Strategy`].
///
/// Single-key routing (`shard`, `dst_from_id`, `dst_from_shard_val`)
/// delegates to the base strategy unchanged; only the order of
/// [`broadcast`](Strategy::broadcast) differs, per the configured
/// [`BroadcastMode`]. The decorator implements [`Strategy`] itself, so
/// it is substitutable anywhere the base is expected.
///
/// The random source behind [`BroadcastMode::Shuffle`] is injectable via
/// [`with_rand_source`](Self::with_rand_source) so tests can use a
/// seeded, deterministic source.
///
/// # Example
///
/// ```
/// use snowshard::{
///     BalancedSharding, BroadcastMode, ModuloSharding, SnowflakeExtractor, Strategy,
/// };
///
/// let base = ModuloSharding::new(SnowflakeExtractor::new(), "db", "table", 3, 2).unwrap();
/// let strategy = BalancedSharding::new(base, BroadcastMode::RoundRobin);
///
/// let order: Vec<String> = strategy.broadcast().iter().map(|d| d.full_table()).collect();
/// assert_eq!(
///     order,
///     ["db_0.table_0", "db_1.table_0", "db_2.table_0",
///      "db_0.table_1", "db_1.table_1", "db_2.table_1"],
/// );
/// ```
pub struct BalancedSharding<S, R = ThreadRandom> {
    base: S,
    mode: BroadcastMode,
    rand: R,
}

impl<S> BalancedSharding<S>
where
    S: Strategy,
{
    /// Decorates `base` using the thread-local random source for
    /// shuffled broadcasts.
    pub fn new(base: S, mode: BroadcastMode) -> Self {
        Self::with_rand_source(base, mode, ThreadRandom)
    }
}

impl<S, R> BalancedSharding<S, R>
where
    S: Strategy,
    R: RandSource<u64>,
{
    /// Decorates `base` with a caller-supplied random source.
    pub fn with_rand_source(base: S, mode: BroadcastMode, rand: R) -> Self {
        Self { base, mode, rand }
    }

    /// Groups destinations by database (first-seen order) and takes one
    /// from each group in turn until every group is exhausted.
    fn round_robin(dsts: Vec<Dst>) -> Vec<Dst> {
        if dsts.is_empty() {
            return dsts;
        }

        let total = dsts.len();
        let mut dbs: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<Dst>> = HashMap::new();

        for dst in dsts {
            if !groups.contains_key(&dst.db) {
                dbs.push(dst.db.clone());
            }
            groups.entry(dst.db.clone()).or_default().push(dst);
        }

        let rounds = groups.values().map(Vec::len).max().unwrap_or(0);

        let mut out = Vec::with_capacity(total);
        for round in 0..rounds {
            for db in &dbs {
                if let Some(dst) = groups.get(db).and_then(|group| group.get(round)) {
                    out.push(dst.clone());
                }
            }
        }
        out
    }

    /// Fisher-Yates permutation driven by the injected random source.
    fn shuffle(&self, mut dsts: Vec<Dst>) -> Vec<Dst> {
        for i in (1..dsts.len()).rev() {
            let j = (self.rand.rand() % (i as u64 + 1)) as usize;
            dsts.swap(i, j);
        }
        dsts
    }
}

impl<S, R> Strategy for BalancedSharding<S, R>
where
    S: Strategy,
    R: RandSource<u64>,
{
    fn shard(&self, shard_val: u64) -> Dst {
        self.base.shard(shard_val)
    }

    fn dst_from_id(&self, id: ShardedId) -> Dst {
        self.base.dst_from_id(id)
    }

    fn dst_from_shard_val(&self, shard_val: u64) -> Dst {
        self.base.dst_from_shard_val(shard_val)
    }

    fn broadcast(&self) -> Vec<Dst> {
        let dsts = self.base.broadcast();
        match self.mode {
            BroadcastMode::Default => dsts,
            BroadcastMode::RoundRobin => Self::round_robin(dsts),
            BroadcastMode::Shuffle => self.shuffle(dsts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ModuloSharding, SnowflakeExtractor};
    use core::cell::Cell;
    use std::collections::HashSet;

    fn base(db: u64, tb: u64) -> ModuloSharding<SnowflakeExtractor> {
        ModuloSharding::new(SnowflakeExtractor::new(), "db", "table", db, tb).unwrap()
    }

    /// A stub strategy with no destinations at all.
    struct EmptyStrategy;

    impl Strategy for EmptyStrategy {
        fn shard(&self, _: u64) -> Dst {
            unreachable!()
        }
        fn dst_from_id(&self, _: ShardedId) -> Dst {
            unreachable!()
        }
        fn dst_from_shard_val(&self, _: u64) -> Dst {
            unreachable!()
        }
        fn broadcast(&self) -> Vec<Dst> {
            Vec::new()
        }
    }

    /// Deterministic source: replays a scripted sequence, then repeats
    /// the last value.
    struct ScriptedRand {
        values: Vec<u64>,
        index: Cell<usize>,
    }

    impl ScriptedRand {
        fn new(values: Vec<u64>) -> Self {
            Self {
                values,
                index: Cell::new(0),
            }
        }
    }

    impl RandSource<u64> for ScriptedRand {
        fn rand(&self) -> u64 {
            let i = self.index.get();
            let v = self.values[i.min(self.values.len() - 1)];
            self.index.set(i + 1);
            v
        }
    }

    #[test]
    fn parses_mode_strings() {
        assert_eq!("".parse::<BroadcastMode>().unwrap(), BroadcastMode::Default);
        assert_eq!(
            "default".parse::<BroadcastMode>().unwrap(),
            BroadcastMode::Default
        );
        assert_eq!(
            "round_robin".parse::<BroadcastMode>().unwrap(),
            BroadcastMode::RoundRobin
        );
        assert_eq!(
            "shuffle".parse::<BroadcastMode>().unwrap(),
            BroadcastMode::Shuffle
        );
        assert_eq!(
            "bogus".parse::<BroadcastMode>().unwrap_err(),
            BuildError::UnknownBroadcastMode("bogus".into())
        );
    }

    #[test]
    fn single_key_routing_delegates_unchanged() {
        let decorated = BalancedSharding::new(base(4, 2), BroadcastMode::RoundRobin);
        let plain = base(4, 2);

        for shard_val in [0, 1, 7, 8, 31, u64::MAX] {
            assert_eq!(decorated.shard(shard_val), plain.shard(shard_val));
            assert_eq!(
                decorated.dst_from_shard_val(shard_val),
                plain.dst_from_shard_val(shard_val)
            );
        }

        let id = ShardedId::from_parts(9, 5, 0);
        assert_eq!(decorated.dst_from_id(id), plain.dst_from_id(id));
    }

    #[test]
    fn default_mode_passes_the_base_order_through() {
        let decorated = BalancedSharding::new(base(3, 2), BroadcastMode::Default);
        assert_eq!(decorated.broadcast(), base(3, 2).broadcast());
    }

    #[test]
    fn round_robin_interleaves_databases() {
        let decorated = BalancedSharding::new(base(3, 2), BroadcastMode::RoundRobin);
        let order: Vec<String> = decorated.broadcast().iter().map(Dst::full_table).collect();
        assert_eq!(
            order,
            [
                "db_0.table_0",
                "db_1.table_0",
                "db_2.table_0",
                "db_0.table_1",
                "db_1.table_1",
                "db_2.table_1",
            ]
        );
    }

    #[test]
    fn round_robin_never_repeats_a_database_back_to_back() {
        let decorated = BalancedSharding::new(base(8, 4), BroadcastMode::RoundRobin);
        let dsts = decorated.broadcast();

        assert_eq!(dsts.len(), 32);
        for pair in dsts.windows(2) {
            assert_ne!(pair[0].db, pair[1].db);
        }
    }

    #[test]
    fn round_robin_drains_uneven_groups() {
        // db_0 has two tables, db_1 only one; once db_1 is exhausted the
        // remaining db_0 table follows on its own.
        struct UnevenStrategy;

        impl Strategy for UnevenStrategy {
            fn shard(&self, _: u64) -> Dst {
                unreachable!()
            }
            fn dst_from_id(&self, _: ShardedId) -> Dst {
                unreachable!()
            }
            fn dst_from_shard_val(&self, _: u64) -> Dst {
                unreachable!()
            }
            fn broadcast(&self) -> Vec<Dst> {
                let dst = |db_suffix: u64, tb_suffix: u64| Dst {
                    db_suffix,
                    tb_suffix,
                    db: format!("db_{db_suffix}"),
                    tb: format!("table_{tb_suffix}"),
                };
                vec![dst(0, 0), dst(0, 1), dst(1, 0)]
            }
        }

        let decorated = BalancedSharding::new(UnevenStrategy, BroadcastMode::RoundRobin);
        let order: Vec<String> = decorated.broadcast().iter().map(Dst::full_table).collect();
        assert_eq!(order, ["db_0.table_0", "db_1.table_0", "db_0.table_1"]);
    }

    #[test]
    fn every_mode_broadcasts_the_complete_set() {
        for mode in [
            BroadcastMode::Default,
            BroadcastMode::RoundRobin,
            BroadcastMode::Shuffle,
        ] {
            let decorated = BalancedSharding::new(base(8, 4), mode);
            let dsts = decorated.broadcast();
            assert_eq!(dsts.len(), 32);

            let unique: HashSet<String> = dsts.iter().map(Dst::full_table).collect();
            assert_eq!(unique.len(), 32, "duplicates under {mode:?}");
        }
    }

    #[test]
    fn shuffle_is_reproducible_with_a_scripted_source() {
        let script = || ScriptedRand::new((0..31u64).rev().collect());

        let a = BalancedSharding::with_rand_source(base(8, 4), BroadcastMode::Shuffle, script())
            .broadcast();
        let b = BalancedSharding::with_rand_source(base(8, 4), BroadcastMode::Shuffle, script())
            .broadcast();

        assert_eq!(a, b);
        assert_ne!(a, base(8, 4).broadcast());
    }

    #[test]
    fn shuffle_with_thread_random_permutes_without_loss() {
        let decorated = BalancedSharding::new(base(8, 4), BroadcastMode::Shuffle);

        // The base order is already sorted by (db, tb), so sorting the
        // shuffled output must reproduce it exactly.
        let mut shuffled = decorated.broadcast();
        shuffled.sort_by_key(|d| (d.db_suffix, d.tb_suffix));
        assert_eq!(shuffled, base(8, 4).broadcast());
    }

    #[test]
    fn empty_base_broadcast_stays_empty() {
        for mode in [
            BroadcastMode::Default,
            BroadcastMode::RoundRobin,
            BroadcastMode::Shuffle,
        ] {
            let decorated = BalancedSharding::new(EmptyStrategy, mode);
            assert!(decorated.broadcast().is_empty());
        }
    }
}
