use crate::{Dst, ShardedId};

/// A placement strategy mapping shard values onto physical destinations.
///
/// Strategies are pure functions over their constructor-time topology:
/// every method is infallible and safe for unbounded concurrent use.
/// Validation happens once, at construction.
pub trait Strategy {
    /// Computes the destination for a shard value.
    fn shard(&self, shard_val: u64) -> Dst;

    /// Computes the destination for an existing ID by extracting its
    /// embedded shard fragment.
    ///
    /// Useful for lookups by ID: no sharder or generator is needed.
    fn dst_from_id(&self, id: ShardedId) -> Dst;

    /// Computes the destination for a shard value without minting
    /// anything. Alias of [`shard`](Self::shard) kept for symmetry with
    /// [`dst_from_id`](Self::dst_from_id).
    fn dst_from_shard_val(&self, shard_val: u64) -> Dst;

    /// Enumerates every destination, for queries that must scan all
    /// shards. Each destination appears exactly once; the order is
    /// strategy-specific.
    fn broadcast(&self) -> Vec<Dst>;
}
