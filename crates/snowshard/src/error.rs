/// A result type for runtime ID generation.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Failures raised while wiring the sharding components together.
///
/// These surface once at startup and never during steady-state operation:
/// a successfully constructed strategy computes destinations infallibly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// A shard count of zero would make every modulo undefined.
    #[error("{which} shard count must be greater than 0")]
    ZeroShardCount {
        /// Which count was zero: `"database"` or `"table"`.
        which: &'static str,
    },

    /// Destination names are `"{prefix}_{suffix}"`; an empty prefix would
    /// produce names like `"_3"`.
    #[error("{which} prefix cannot be empty")]
    EmptyPrefix {
        /// Which prefix was empty: `"database"` or `"table"`.
        which: &'static str,
    },

    /// The broadcast mode string did not name a known mode.
    ///
    /// Accepted spellings are `""`, `"default"`, `"round_robin"` and
    /// `"shuffle"`.
    #[error("unknown broadcast mode {0:?}")]
    UnknownBroadcastMode(String),
}

/// Failures raised while generating an ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The wall clock moved backwards further than the generator is
    /// willing to wait out.
    ///
    /// Small regressions are absorbed by waiting for the clock to catch
    /// up; a drift beyond the limit is fatal and requires operator
    /// intervention (the generator cannot safely mint ordered IDs until
    /// the clock is fixed).
    #[error("clock moved backwards by {drift_ms}ms, exceeding the {max_ms}ms recovery limit")]
    ClockDrift {
        /// Observed backward drift in milliseconds.
        drift_ms: u64,
        /// The largest drift the generator will wait out.
        max_ms: u64,
    },

    /// The caller-supplied deadline expired while the generator was
    /// waiting for the clock to advance.
    #[error("deadline expired while waiting for the clock to advance")]
    DeadlineExceeded,
}
