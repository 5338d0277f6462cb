use core::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    IdGenStatus, RandSource, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
    generator::{basic::cold_clock_skew, mint, mutex::Mutex},
};

/// A lock-based Snowflake ID generator for multi-threaded use.
///
/// Wraps the generator state in an [`Arc<Mutex<_>>`], so a single instance
/// can be shared across threads while the `(last timestamp, sequence)` pair
/// stays serialized. With the `parking-lot` feature the mutex is
/// `parking_lot::Mutex` (no poisoning); otherwise it is the std mutex and a
/// poisoned lock surfaces as [`Error::LockPoisoned`].
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - You want predictable latency under moderate-to-heavy contention
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
/// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
pub struct LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    state: Arc<Mutex<SnowflakeId>>,
    time: T,
    rng: R,
}

impl<T, R> LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a new generator reading from the given time and random
    /// sources.
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{LockSnowflakeGenerator, SnowflakeGenerator, ThreadRandom, WallClock};
    ///
    /// let generator = LockSnowflakeGenerator::new(WallClock::default(), ThreadRandom);
    /// let id = generator.next_id().expect("wall clock went backwards");
    /// ```
    pub fn new(time: T, rng: R) -> Self {
        Self::from_state(SnowflakeId::from_raw(0), time, rng)
    }

    /// Creates a generator preloaded with explicit state.
    ///
    /// Useful for tests and for restoring a persisted high-water mark. In
    /// typical use, prefer [`Self::new`].
    pub fn from_state(state: SnowflakeId, time: T, rng: R) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            time,
            rng,
        }
    }

    /// Attempts one generation step without blocking (beyond the lock). See
    /// [`SnowflakeGenerator::try_poll_id`].
    ///
    /// # Errors
    ///
    /// [`Error::ClockSkew`] when the clock ran backwards, and (without the
    /// `parking-lot` feature) [`Error::LockPoisoned`] if another thread
    /// panicked while holding the lock.
    ///
    /// [`Error::ClockSkew`]: crate::Error::ClockSkew
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_millis();

        #[cfg(feature = "parking-lot")]
        let mut state = self.state.lock();
        #[cfg(not(feature = "parking-lot"))]
        let mut state = self.state.lock()?;

        let last = state.timestamp();

        let status = match now.cmp(&last) {
            Ordering::Greater => {
                *state = mint(&self.rng, now, 0);
                IdGenStatus::Ready { id: *state }
            }
            Ordering::Equal => {
                if state.has_sequence_room() {
                    *state = mint(&self.rng, now, state.next_sequence());
                    IdGenStatus::Ready { id: *state }
                } else {
                    IdGenStatus::Pending { yield_for: 1 }
                }
            }
            Ordering::Less => return Err(cold_clock_skew(last, now)),
        };

        Ok(status)
    }
}

impl<T, R> SnowflakeGenerator for LockSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    fn try_poll_id(&self) -> Result<IdGenStatus> {
        self.try_poll_id()
    }
}
