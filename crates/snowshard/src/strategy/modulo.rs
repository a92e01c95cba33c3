use crate::{BuildError, Dst, ShardValExtractor, ShardedId, Strategy};

/// Modulo placement over a fixed `db_shard_count x tb_shard_count`
/// topology.
///
/// Placement decomposes the shard value in two steps:
///
/// 1. `index = shard_val % (db_shard_count * tb_shard_count)`
/// 2. `db_suffix = index % db_shard_count`,
///    `tb_suffix = index / db_shard_count`
///
/// so consecutive shard values walk across databases first, then tables.
/// Shard values at or above the total wrap around by construction:
/// distinct values landing on the same destination is intentional
/// partitioning behavior, not a defect.
///
/// # Example
///
/// ```
/// use snowshard::{ModuloSharding, SnowflakeExtractor, Strategy};
///
/// let strategy = ModuloSharding::new(SnowflakeExtractor::new(), "db", "table", 8, 4).unwrap();
/// assert_eq!(strategy.shard(1).full_table(), "db_1.table_0");
/// assert_eq!(strategy.shard(8).full_table(), "db_0.table_1");
/// ```
pub struct ModuloSharding<E> {
    extractor: E,
    db_prefix: String,
    tb_prefix: String,
    db_shard_count: u64,
    tb_shard_count: u64,
}

impl<E> ModuloSharding<E>
where
    E: ShardValExtractor,
{
    /// Creates a modulo strategy for the given topology.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if either count is zero or either prefix
    /// is empty.
    pub fn new(
        extractor: E,
        db_prefix: impl Into<String>,
        tb_prefix: impl Into<String>,
        db_shard_count: u64,
        tb_shard_count: u64,
    ) -> Result<Self, BuildError> {
        let db_prefix = db_prefix.into();
        let tb_prefix = tb_prefix.into();

        if db_shard_count == 0 {
            return Err(BuildError::ZeroShardCount { which: "database" });
        }
        if tb_shard_count == 0 {
            return Err(BuildError::ZeroShardCount { which: "table" });
        }
        if db_prefix.is_empty() {
            return Err(BuildError::EmptyPrefix { which: "database" });
        }
        if tb_prefix.is_empty() {
            return Err(BuildError::EmptyPrefix { which: "table" });
        }

        Ok(Self {
            extractor,
            db_prefix,
            tb_prefix,
            db_shard_count,
            tb_shard_count,
        })
    }

    fn dst_at(&self, db_suffix: u64, tb_suffix: u64) -> Dst {
        Dst {
            db_suffix,
            tb_suffix,
            db: format!("{}_{}", self.db_prefix, db_suffix),
            tb: format!("{}_{}", self.tb_prefix, tb_suffix),
        }
    }

    fn route(&self, shard_val: u64) -> Dst {
        let total = self.db_shard_count * self.tb_shard_count;
        let index = shard_val % total;
        self.dst_at(index % self.db_shard_count, index / self.db_shard_count)
    }
}

impl<E> Strategy for ModuloSharding<E>
where
    E: ShardValExtractor,
{
    fn shard(&self, shard_val: u64) -> Dst {
        self.route(shard_val)
    }

    fn dst_from_id(&self, id: ShardedId) -> Dst {
        self.route(self.extractor.extract_shard_val(id))
    }

    fn dst_from_shard_val(&self, shard_val: u64) -> Dst {
        self.route(shard_val)
    }

    /// Database-major enumeration: all tables of `db_0`, then all tables
    /// of `db_1`, and so on.
    fn broadcast(&self) -> Vec<Dst> {
        let mut dsts = Vec::with_capacity((self.db_shard_count * self.tb_shard_count) as usize);
        for db in 0..self.db_shard_count {
            for tb in 0..self.tb_shard_count {
                dsts.push(self.dst_at(db, tb));
            }
        }
        dsts
    }
}
