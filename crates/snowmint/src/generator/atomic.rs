use core::cmp;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    IdGenStatus, RandSource, Result, SnowflakeGenerator, SnowflakeId, TimeSource,
    generator::{basic::cold_clock_skew, mint},
};

/// A lock-free Snowflake ID generator for multi-threaded use.
///
/// The entire packed ID doubles as the generator state in an [`AtomicU64`];
/// each mint is a compare-and-swap from the previously issued ID to the next
/// one, so the `(last timestamp, sequence)` pair is updated atomically
/// without a lock. Losing the CAS race reports
/// [`IdGenStatus::Pending`] with `yield_for: 0` (retry immediately).
///
/// With the `cache-padded` feature the state is wrapped in
/// `crossbeam_utils::CachePadded` to avoid false sharing with neighboring
/// atomics under heavy contention.
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`BasicSnowflakeGenerator`]
/// - [`LockSnowflakeGenerator`]
///
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
pub struct AtomicSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    time: T,
    rng: R,
}

impl<T, R> AtomicSnowflakeGenerator<T, R>
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
    /// use snowmint::{AtomicSnowflakeGenerator, SnowflakeGenerator, ThreadRandom, WallClock};
    ///
    /// let generator = AtomicSnowflakeGenerator::new(WallClock::default(), ThreadRandom);
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
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(state.to_raw())),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(state.to_raw()),
            time,
            rng,
        }
    }

    /// Attempts one generation step without blocking. See
    /// [`SnowflakeGenerator::try_poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<IdGenStatus> {
        let now = self.time.current_millis();

        let current_raw = self.state.load(Ordering::Relaxed);
        let current = SnowflakeId::from_raw(current_raw);
        let last = current.timestamp();

        let next = match now.cmp(&last) {
            cmp::Ordering::Greater => mint(&self.rng, now, 0),
            cmp::Ordering::Equal => {
                if current.has_sequence_room() {
                    mint(&self.rng, now, current.next_sequence())
                } else {
                    return Ok(IdGenStatus::Pending { yield_for: 1 });
                }
            }
            cmp::Ordering::Less => return Err(cold_clock_skew(last, now)),
        };

        if self
            .state
            .compare_exchange(
                current_raw,
                next.to_raw(),
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            Ok(IdGenStatus::Ready { id: next })
        } else {
            // Another thread won the race. Yield 0 to retry immediately.
            Ok(IdGenStatus::Pending { yield_for: 0 })
        }
    }
}

impl<T, R> SnowflakeGenerator for AtomicSnowflakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    fn try_poll_id(&self) -> Result<IdGenStatus> {
        self.try_poll_id()
    }
}
