use xxhash_rust::xxh64::{Xxh64, xxh64};

use crate::Result;

/// Derives a 64-bit shard value from a business key.
///
/// Implementations must be deterministic: the same input always yields
/// the same value, because a later lookup has to reproduce the exact
/// value used at write time.
///
/// The provided variants cannot fail; the contract is fallible so that a
/// future variant backed by fallible key derivation can slot in without
/// changing call sites.
pub trait Sharder {
    /// Returns the shard value for this key.
    fn shard_val(&self) -> Result<u64>;
}

/// A sharder that uses a single numeric ID as the shard value directly.
///
/// Appropriate when the ID is already uniformly distributed (e.g. a
/// previously minted [`ShardedId`](crate::ShardedId)); skipping the hash
/// saves work without hurting the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleIdSharder {
    id: u64,
}

impl SingleIdSharder {
    pub const fn new(id: u64) -> Self {
        Self { id }
    }
}

impl Sharder for SingleIdSharder {
    fn shard_val(&self) -> Result<u64> {
        Ok(self.id)
    }
}

/// A sharder combining a numeric business ID and a string key.
///
/// The two are framed as `be(biz_id) ++ ":" ++ biz_key` and run through
/// XXH64, so `(1, "23")` and `(12, "3")` hash differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BizSharder {
    biz_id: u64,
    biz_key: String,
}

impl BizSharder {
    pub fn new(biz_id: u64, biz_key: impl Into<String>) -> Self {
        Self {
            biz_id,
            biz_key: biz_key.into(),
        }
    }
}

impl Sharder for BizSharder {
    fn shard_val(&self) -> Result<u64> {
        let mut hasher = Xxh64::new(0);
        hasher.update(&self.biz_id.to_be_bytes());
        hasher.update(b":");
        hasher.update(self.biz_key.as_bytes());
        Ok(hasher.digest())
    }
}

/// A sharder hashing a single string key.
///
/// For cases where only a string identity (an email, a phone number) is
/// known before any numeric ID exists, e.g. deciding where a new user
/// row lands based on their email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringSharder {
    key: String,
}

impl StringSharder {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Sharder for StringSharder {
    fn shard_val(&self) -> Result<u64> {
        Ok(xxh64(self.key.as_bytes(), 0))
    }
}
