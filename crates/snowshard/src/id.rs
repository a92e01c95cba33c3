use core::fmt;

const TIMESTAMP_BITS: u32 = 41;
const SHARD_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;

const SHARD_SHIFT: u32 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + SHARD_BITS;

const TIMESTAMP_MASK: u64 = (1 << TIMESTAMP_BITS) - 1;
const SHARD_MASK: u64 = (1 << SHARD_BITS) - 1;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

/// A 64-bit Snowflake-style identifier that embeds its own shard
/// placement.
///
/// Layout, high to low:
///
/// ```text
/// ┌─────────────────────┬──────────────────────┬─────────────────┐
/// │ 41-bit timestamp ms │ 10-bit shard fragment │ 12-bit sequence │
/// └─────────────────────┴──────────────────────┴─────────────────┘
/// ```
///
/// The timestamp is measured from a fixed epoch (see
/// [`CUSTOM_EPOCH`](crate::CUSTOM_EPOCH)), so IDs minted by one generator
/// under a non-decreasing clock are strictly increasing.
///
/// The shard embedding is **lossy**: only the low 10 bits of the shard
/// value supplied at generation time are stored, and that fragment is
/// what [`shard_val`](Self::shard_val) recovers. Callers must not assume
/// a full-precision shard value survives the round trip.
///
/// This type is the single source of truth for the bit layout. The
/// generator packs through [`from_parts`](Self::from_parts) and the
/// extractor unpacks through [`shard_val`](Self::shard_val), so a paired
/// generator and extractor cannot disagree on offsets.
///
/// # Example
///
/// ```
/// use snowshard::ShardedId;
///
/// let id = ShardedId::from_parts(42, 7, 3);
/// assert_eq!(id.timestamp(), 42);
/// assert_eq!(id.shard_val(), 7);
/// assert_eq!(id.sequence(), 3);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardedId(u64);

impl ShardedId {
    /// Packs the three fields into an ID.
    ///
    /// Each field is truncated to its bit width: 41 bits of timestamp,
    /// 10 bits of shard value, 12 bits of sequence.
    pub const fn from_parts(timestamp: u64, shard_val: u64, sequence: u64) -> Self {
        Self(
            (timestamp & TIMESTAMP_MASK) << TIMESTAMP_SHIFT
                | (shard_val & SHARD_MASK) << SHARD_SHIFT
                | (sequence & SEQUENCE_MASK),
        )
    }

    /// Reinterprets a raw `u64` (e.g. read back from storage) as an ID.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` representation.
    pub const fn to_raw(self) -> u64 {
        self.0
    }

    /// Milliseconds since the epoch at which this ID was minted.
    pub const fn timestamp(self) -> u64 {
        (self.0 >> TIMESTAMP_SHIFT) & TIMESTAMP_MASK
    }

    /// The embedded 10-bit shard fragment.
    pub const fn shard_val(self) -> u64 {
        (self.0 >> SHARD_SHIFT) & SHARD_MASK
    }

    /// The per-millisecond sequence number.
    pub const fn sequence(self) -> u64 {
        self.0 & SEQUENCE_MASK
    }

    /// Largest sequence number representable (4095).
    pub const fn max_sequence() -> u64 {
        SEQUENCE_MASK
    }

    /// Largest shard fragment representable (1023).
    pub const fn max_shard_val() -> u64 {
        SHARD_MASK
    }
}

impl fmt::Display for ShardedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ShardedId> for u64 {
    fn from(id: ShardedId) -> u64 {
        id.to_raw()
    }
}

impl From<u64> for ShardedId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}
