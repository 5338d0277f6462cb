use rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// Generators draw the datacenter and worker fields of every ID from a
/// `RandSource`, so tests can substitute a fixed or scripted source and a
/// deployment that wants stable node identity can substitute one that always
/// returns the same value.
///
/// # Example
///
/// ```
/// use snowmint::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&self) -> u64;
}

/// A [`RandSource`] backed by the thread-local RNG (`rand::rng()`).
///
/// Each OS thread has its own RNG instance, so calls from multiple threads
/// are contention-free. This type does not store the RNG itself; it is a
/// zero-sized wrapper that accesses the thread-local generator on each call,
/// which makes it freely shareable across threads even though the underlying
/// `ThreadRng` is neither `Send` nor `Sync`.
#[derive(Default, Clone, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
