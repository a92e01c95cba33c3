use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::{error, warn};

use crate::{Error, Result, ShardedId, TimeSource, WallClock};

/// Largest backward clock drift, in milliseconds, the generator will
/// absorb by waiting for the clock to catch up. Anything larger is fatal.
pub const MAX_BACKWARD_MS: u64 = 5_000;

/// Granularity of the waits for clock catch-up and sequence rollover.
const WAIT_STEP: Duration = Duration::from_micros(100);

/// A minimal interface for minting shard-embedding IDs.
///
/// This is the seam the [`ShardHelper`](crate::ShardHelper) facade
/// composes against, so alternative ID families can be swapped in
/// without touching data-access code.
pub trait IdGenerator {
    /// Generates the next ID, embedding the low 10 bits of `shard_val`.
    fn next_id(&self, shard_val: u64) -> Result<ShardedId>;
}

#[derive(Debug, Default)]
struct GenState {
    last_ts: u64,
    sequence: u64,
}

/// A lock-guarded Snowflake-style generator for [`ShardedId`]s.
///
/// All `next_id` calls serialize behind one mutex; everything else in
/// this crate is stateless. State is owned per instance rather than held
/// in a process-global, so independent generators for different ID
/// families can coexist.
///
/// Two transient conditions are absorbed by waiting while the lock is
/// held:
///
/// - **Backward clock drift** up to [`MAX_BACKWARD_MS`]: the call blocks
///   no longer than the drift, then proceeds. Larger drifts return
///   [`Error::ClockDrift`] instead of waiting indefinitely.
/// - **Sequence exhaustion** within one millisecond: the call blocks at
///   most until the next millisecond boundary.
///
/// Callers that cannot tolerate blocking through a pathological clock
/// can bound the wait with [`next_id_before`](Self::next_id_before).
pub struct SnowflakeGenerator<T = WallClock>
where
    T: TimeSource,
{
    state: Mutex<GenState>,
    clock: T,
}

impl SnowflakeGenerator<WallClock> {
    /// Creates a generator on the system wall clock and the default
    /// epoch.
    pub fn new() -> Self {
        Self::with_clock(WallClock::default())
    }
}

impl Default for SnowflakeGenerator<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator on a caller-supplied [`TimeSource`].
    pub fn with_clock(clock: T) -> Self {
        Self {
            state: Mutex::new(GenState::default()),
            clock,
        }
    }

    /// Creates a generator together with its matching extractor.
    ///
    /// Prefer this over constructing the two independently: both sides
    /// of the pair read the bit layout from [`ShardedId`], and building
    /// them in one call keeps the pairing visible at the wiring site.
    pub fn paired(clock: T) -> (Self, SnowflakeExtractor) {
        (Self::with_clock(clock), SnowflakeExtractor::new())
    }

    /// Generates the next ID, embedding the low 10 bits of `shard_val`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockDrift`] if the clock moved backwards by
    /// more than [`MAX_BACKWARD_MS`].
    pub fn next_id(&self, shard_val: u64) -> Result<ShardedId> {
        self.next_id_inner(shard_val, None)
    }

    /// Like [`next_id`](Self::next_id), but gives up once `deadline`
    /// passes while waiting out clock catch-up or sequence rollover.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeadlineExceeded`] if the deadline expires, or
    /// [`Error::ClockDrift`] for unrecoverable drift.
    pub fn next_id_before(&self, shard_val: u64, deadline: Instant) -> Result<ShardedId> {
        self.next_id_inner(shard_val, Some(deadline))
    }

    fn next_id_inner(&self, shard_val: u64, deadline: Option<Instant>) -> Result<ShardedId> {
        let mut state = self.state.lock();

        let mut now = self.clock.current_millis();

        if now < state.last_ts {
            let drift_ms = state.last_ts - now;
            if drift_ms > MAX_BACKWARD_MS {
                error!(drift_ms, "clock moved backwards beyond the recovery limit");
                return Err(Error::ClockDrift {
                    drift_ms,
                    max_ms: MAX_BACKWARD_MS,
                });
            }

            warn!(drift_ms, "clock moved backwards, waiting for catch-up");
            while now < state.last_ts {
                check_deadline(deadline)?;
                std::thread::sleep(WAIT_STEP);
                now = self.clock.current_millis();
            }
        }

        // Compute the sequence first and commit only after every wait has
        // succeeded, so a deadline failure leaves the state untouched.
        let sequence;
        if now == state.last_ts {
            let next = (state.sequence + 1) & ShardedId::max_sequence();
            if next == 0 {
                // Sequence exhausted within this millisecond.
                while now <= state.last_ts {
                    check_deadline(deadline)?;
                    std::thread::sleep(WAIT_STEP);
                    now = self.clock.current_millis();
                }
            }
            sequence = if now == state.last_ts { next } else { 0 };
        } else {
            sequence = 0;
        }

        state.last_ts = now;
        state.sequence = sequence;
        Ok(ShardedId::from_parts(now, shard_val, sequence))
    }
}

impl<T> IdGenerator for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn next_id(&self, shard_val: u64) -> Result<ShardedId> {
        self.next_id_inner(shard_val, None)
    }
}

fn check_deadline(deadline: Option<Instant>) -> Result<()> {
    if let Some(deadline) = deadline {
        if Instant::now() >= deadline {
            return Err(Error::DeadlineExceeded);
        }
    }
    Ok(())
}

/// Recovers the shard fragment embedded in an ID.
///
/// The strategy layer depends on this seam rather than on a concrete
/// generator, so routing by existing ID needs no generator at all.
pub trait ShardValExtractor {
    /// Returns the embedded shard fragment (the low 10 bits of the shard
    /// value supplied at generation time).
    fn extract_shard_val(&self, id: ShardedId) -> u64;
}

/// Extractor matching [`SnowflakeGenerator`]'s bit layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SnowflakeExtractor;

impl SnowflakeExtractor {
    /// Creates a new extractor instance.
    pub fn new() -> Self {
        Self
    }
}

impl ShardValExtractor for SnowflakeExtractor {
    fn extract_shard_val(&self, id: ShardedId) -> u64 {
        id.shard_val()
    }
}

/// Free-function form of [`ShardValExtractor::extract_shard_val`] for
/// call sites that do not hold an extractor instance.
pub fn extract_shard_val(id: ShardedId) -> u64 {
    id.shard_val()
}
