use crate::{Dst, IdGenerator, Result, ShardedId, Sharder, Strategy};

/// The facade composing one ID generator and one placement strategy.
///
/// Data-access code talks to this type only: it can mint an
/// ID-with-destination in one call, or resolve a destination from an
/// existing ID or sharder. Each operation derives the shard value from
/// the sharder exactly once, so the hash is never computed twice.
///
/// The generator and the strategy's extractor must share one bit layout
/// or `dst_from_id` would diverge from `shard` for the same logical key;
/// wiring both ends from
/// [`SnowflakeGenerator::paired`](crate::SnowflakeGenerator::paired)
/// keeps that pairing intact.
pub struct ShardHelper<G, S> {
    generator: G,
    strategy: S,
}

impl<G, S> ShardHelper<G, S>
where
    G: IdGenerator,
    S: Strategy,
{
    pub fn new(generator: G, strategy: S) -> Self {
        Self {
            generator,
            strategy,
        }
    }

    /// Mints an ID and computes its destination in one call.
    ///
    /// This is the common write path: the returned ID embeds the shard
    /// fragment and the destination tells the caller where to store the
    /// row.
    pub fn next_id_and_shard(&self, sharder: &impl Sharder) -> Result<(ShardedId, Dst)> {
        let shard_val = sharder.shard_val()?;
        let id = self.generator.next_id(shard_val)?;
        let dst = self.strategy.shard(shard_val);
        Ok((id, dst))
    }

    /// Mints an ID only. The destination can be recovered later via
    /// [`dst_from_id`](Self::dst_from_id).
    pub fn next_id(&self, sharder: &impl Sharder) -> Result<ShardedId> {
        let shard_val = sharder.shard_val()?;
        self.generator.next_id(shard_val)
    }

    /// Computes a destination without minting an ID.
    pub fn shard(&self, sharder: &impl Sharder) -> Result<Dst> {
        Ok(self.strategy.shard(sharder.shard_val()?))
    }

    /// Resolves the destination of an existing ID. No sharder needed and
    /// no generator state touched.
    pub fn dst_from_id(&self, id: ShardedId) -> Dst {
        self.strategy.dst_from_id(id)
    }

    /// Resolves a destination from a sharder without mutating generator
    /// state.
    pub fn dst_from_sharder(&self, sharder: &impl Sharder) -> Result<Dst> {
        Ok(self.strategy.dst_from_shard_val(sharder.shard_val()?))
    }

    /// Enumerates every destination, in the wrapped strategy's order.
    pub fn broadcast(&self) -> Vec<Dst> {
        self.strategy.broadcast()
    }
}
