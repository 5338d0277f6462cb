use core::{cell::Cell, cmp::Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, IdGenStatus, RandSource, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
    generator::mint,
};

/// A non-concurrent Snowflake ID generator for single-threaded use.
///
/// State lives in a [`Cell`], so this generator is lightweight and fast but
/// **not thread-safe**. The process-wide entry point ([`generate`]) and any
/// shared use should go through [`LockSnowflakeGenerator`] or
/// [`AtomicSnowflakeGenerator`] instead: the `(last timestamp, sequence)`
/// pair must never be mutated from two threads without serialization.
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - You want the fastest generator
///
/// ## See Also
/// - [`LockSnowflakeGenerator`]
/// - [`AtomicSnowflakeGenerator`]
///
/// [`generate`]: crate::generate
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
pub struct BasicSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    state: Cell<SnowflakeId>,
    time: T,
    rng: R,
}

impl<T, R> BasicSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a new generator reading from the given time and random
    /// sources.
    ///
    /// The internal state starts at timestamp 0 / sequence 0 and is updated
    /// on every successful mint; it lives as long as the generator and is
    /// never reset between calls.
    ///
    /// # Example
    ///
    /// ```
    /// use snowmint::{BasicSnowflakeGenerator, SnowflakeGenerator, ThreadRandom, WallClock};
    ///
    /// let generator = BasicSnowflakeGenerator::new(WallClock::default(), ThreadRandom);
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
            state: Cell::new(state),
            time,
            rng,
        }
    }

    /// Attempts one generation step without blocking. See
    /// [`SnowflakeGenerator::try_poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_millis();
        let state = self.state.get();
        let last = state.timestamp();

        match now.cmp(&last) {
            Ordering::Greater => {
                let id = mint(&self.rng, now, 0);
                self.state.set(id);
                Ok(IdGenStatus::Ready { id })
            }
            Ordering::Equal => {
                if state.has_sequence_room() {
                    let id = mint(&self.rng, now, state.next_sequence());
                    self.state.set(id);
                    Ok(IdGenStatus::Ready { id })
                } else {
                    Ok(IdGenStatus::Pending { yield_for: 1 })
                }
            }
            Ordering::Less => Err(cold_clock_skew(last, now)),
        }
    }
}

impl<T, R> SnowflakeGenerator for BasicSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    fn try_poll_id(&self) -> Result<IdGenStatus> {
        self.try_poll_id()
    }
}

#[cold]
#[inline(never)]
pub(crate) fn cold_clock_skew(last_ms: u64, observed_ms: u64) -> Error {
    debug_assert!(observed_ms < last_ms);
    Error::ClockSkew {
        last_ms,
        observed_ms,
    }
}
