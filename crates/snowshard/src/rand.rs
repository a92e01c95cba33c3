use rand::{Rng, rng};

/// A source of random integers.
///
/// This abstraction allows you to plug in a real random source or a
/// seeded, deterministic one in tests — shuffled broadcasts stay
/// reproducible when the source is.
///
/// # Example
///
/// ```
/// use snowshard::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u64> for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&self) -> T;
}

/// A [`RandSource`] backed by the thread-local RNG.
///
/// Each OS thread has its own RNG instance, so calls from multiple
/// threads are contention-free. This type does not store the RNG itself;
/// it is a zero-sized handle that accesses the thread-local generator on
/// each call, so it is freely shareable across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
