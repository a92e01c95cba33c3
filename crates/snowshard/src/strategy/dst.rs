use core::fmt;

use serde::{Deserialize, Serialize};

/// A resolved physical destination: one database and one table.
///
/// A `Dst` is a pure function of the shard value and the topology
/// configuration. The same inputs always produce the same destination,
/// in any process — this convergence is what makes a write and a later
/// lookup for the same logical key land on the same physical location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dst {
    /// Numeric database suffix, in `[0, db_shard_count)`.
    pub db_suffix: u64,
    /// Numeric table suffix, in `[0, tb_shard_count)`.
    pub tb_suffix: u64,
    /// Full database name, e.g. `"msg_db_3"`.
    pub db: String,
    /// Full table name, e.g. `"message_1"`.
    pub tb: String,
}

impl Dst {
    /// Returns the fully qualified table name, `"{db}.{tb}"`.
    pub fn full_table(&self) -> String {
        format!("{}.{}", self.db, self.tb)
    }
}

impl fmt::Display for Dst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.db, self.tb)
    }
}
