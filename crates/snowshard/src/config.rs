use serde::Deserialize;
use tracing::debug;

use crate::{
    BalancedSharding, BroadcastMode, BuildError, ModuloSharding, ShardHelper, SnowflakeExtractor,
    SnowflakeGenerator, TimeSource, WallClock,
};

/// The strategy stack a [`ShardingConfig`] wires up: balanced broadcast
/// over modulo placement, extracting fragments from Snowflake-layout IDs.
pub type ConfiguredStrategy = BalancedSharding<ModuloSharding<SnowflakeExtractor>>;

/// The helper a [`ShardingConfig`] produces.
pub type ConfiguredHelper<T = WallClock> = ShardHelper<SnowflakeGenerator<T>, ConfiguredStrategy>;

/// Declarative topology for one sharded entity.
///
/// The topology is supplied once at construction and is immutable for
/// the process lifetime; changing shard counts for existing data is
/// explicitly out of scope. A service typically deserializes one of
/// these per entity from its configuration file:
///
/// ```
/// use snowshard::ShardingConfig;
///
/// let config: ShardingConfig = serde_json::from_str(
///     r#"{
///         "db_prefix": "msg_db",
///         "tb_prefix": "message",
///         "db_shard_count": 8,
///         "tb_shard_count": 4,
///         "broadcast_mode": "round_robin"
///     }"#,
/// )
/// .unwrap();
///
/// let helper = config.build_helper().unwrap();
/// assert_eq!(helper.broadcast().len(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShardingConfig {
    /// Database name prefix, e.g. `"msg_db"`.
    pub db_prefix: String,
    /// Table name prefix, e.g. `"message"`.
    pub tb_prefix: String,
    /// Number of databases.
    pub db_shard_count: u64,
    /// Number of tables per database.
    pub tb_shard_count: u64,
    /// Broadcast ordering; defaults to [`BroadcastMode::Default`].
    #[serde(default)]
    pub broadcast_mode: BroadcastMode,
}

impl ShardingConfig {
    /// Builds a ready-to-use helper on the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the topology is invalid.
    pub fn build_helper(&self) -> Result<ConfiguredHelper, BuildError> {
        self.build_helper_with_clock(WallClock::default())
    }

    /// Builds a ready-to-use helper on a caller-supplied clock.
    ///
    /// Wires extractor → modulo strategy → balanced decorator → helper,
    /// with the generator and extractor constructed as a pair.
    pub fn build_helper_with_clock<T>(&self, clock: T) -> Result<ConfiguredHelper<T>, BuildError>
    where
        T: TimeSource,
    {
        let (generator, extractor) = SnowflakeGenerator::paired(clock);
        let base = ModuloSharding::new(
            extractor,
            self.db_prefix.as_str(),
            self.tb_prefix.as_str(),
            self.db_shard_count,
            self.tb_shard_count,
        )?;
        let strategy = BalancedSharding::new(base, self.broadcast_mode);

        debug!(
            db_prefix = %self.db_prefix,
            tb_prefix = %self.tb_prefix,
            db_shard_count = self.db_shard_count,
            tb_shard_count = self.tb_shard_count,
            broadcast_mode = ?self.broadcast_mode,
            "wired shard helper"
        );
        Ok(ShardHelper::new(generator, strategy))
    }
}
