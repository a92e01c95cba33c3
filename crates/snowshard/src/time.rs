use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Custom epoch: Wednesday, January 1, 2025 00:00:00 UTC.
///
/// All timestamps embedded into IDs are measured from this instant, which
/// keeps the 41-bit timestamp field good for roughly 69 years.
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// A source of millisecond timestamps relative to a configured epoch.
///
/// This abstraction allows you to plug in the real system clock or a
/// mocked time source in tests.
///
/// # Example
///
/// ```
/// use snowshard::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured
    /// epoch.
    fn current_millis(&self) -> u64;
}

/// A wall-clock time source offset from a fixed epoch.
///
/// This is deliberately *not* a monotonic clock: the generator's contract
/// is to observe real wall-clock regressions (NTP step adjustments,
/// manual corrections) and absorb or reject them, so the source must
/// report them rather than paper over them.
#[derive(Clone, Debug)]
pub struct WallClock {
    epoch_ms: u64,
}

impl Default for WallClock {
    /// Constructs a wall clock aligned to [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using a custom epoch as the origin
    /// (t = 0), specified as a [`Duration`] since 1970-01-01 UTC.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_ms: epoch.as_millis() as u64,
        }
    }
}

impl TimeSource for WallClock {
    /// Returns the number of milliseconds since the configured epoch.
    ///
    /// Saturates to zero if the system clock reads earlier than the
    /// epoch.
    fn current_millis(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before UNIX_EPOCH")
            .as_millis() as u64;
        now.saturating_sub(self.epoch_ms)
    }
}
