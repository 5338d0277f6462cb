//! Process-wide minting and verification.
//!
//! The application-facing surface is two calls: [`generate`] mints a fresh ID
//! from a shared, lock-serialized generator, and [`verify`] checks an
//! existing value for structural plausibility. Both read the real wall clock
//! anchored to [`CUSTOM_EPOCH`].
//!
//! [`CUSTOM_EPOCH`]: crate::CUSTOM_EPOCH

use core::time::Duration;
use std::sync::LazyLock;

use crate::{
    LockSnowflakeGenerator, Result, SnowflakeGenerator, SnowflakeId, ThreadRandom, TimeSource,
    WallClock,
};

/// The process-wide generator behind [`generate`].
///
/// Lock-based so that concurrent callers serialize their access to the
/// `(last timestamp, sequence)` pair; the state lives for the lifetime of
/// the process.
static GENERATOR: LazyLock<LockSnowflakeGenerator<WallClock, ThreadRandom>> =
    LazyLock::new(|| LockSnowflakeGenerator::new(WallClock::default(), ThreadRandom));

/// Backoff strategies for waiting out sequence exhaustion.
///
/// When more than 4096 IDs are requested within one millisecond, the
/// generator must stall until the clock ticks. These strategies control how
/// the stall is spent.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Busy-waits in a tight loop.
    ///
    /// Maximum throughput at the cost of CPU; the stall resolves within ~1ms
    /// under a healthy clock.
    Spin,

    /// Yields to the OS scheduler between polls.
    ///
    /// More CPU-friendly than spinning; may still busy-wait if no other
    /// threads are ready.
    Yield,

    /// Sleeps for the suggested wait between polls.
    ///
    /// Lowest CPU usage; may oversleep depending on the platform's scheduler
    /// resolution.
    Sleep,
}

/// Mints a new Snowflake ID from the process-wide generator.
///
/// # Errors
///
/// Fails with [`Error::ClockSkew`] when the wall clock has moved backwards
/// relative to the last minted ID. There is no internal retry or fallback: a
/// backwards clock is an environment problem the caller must surface, and a
/// silently minted lower-quality ID would mask it.
///
/// # Example
///
/// ```
/// use snowmint::{Backoff, generate};
///
/// let id = generate(Backoff::Yield).expect("wall clock went backwards");
/// assert!(id.to_raw() > 0);
/// ```
///
/// [`Error::ClockSkew`]: crate::Error::ClockSkew
pub fn generate(strategy: Backoff) -> Result<SnowflakeId> {
    generate_with_backoff(|yield_for| match strategy {
        Backoff::Spin => core::hint::spin_loop(),
        Backoff::Yield => std::thread::yield_now(),
        Backoff::Sleep => std::thread::sleep(Duration::from_millis(yield_for)),
    })
}

/// Mints a new Snowflake ID using a custom backoff strategy.
///
/// `f` receives the suggested wait in milliseconds each time the generator
/// stalls on sequence exhaustion. Cooperative runtimes should yield to their
/// scheduler here rather than block the thread.
///
/// # Errors
///
/// Same failure modes as [`generate`].
pub fn generate_with_backoff(f: impl FnMut(u64)) -> Result<SnowflakeId> {
    GENERATOR.next_id_with(f)
}

/// Checks whether a raw 64-bit value is a structurally plausible Snowflake
/// ID for this scheme's epoch, judged against the wall clock.
///
/// Returns false for zero, for values with the reserved sign bit set, and
/// for embedded timestamps more than [`MAX_FUTURE_DRIFT`] ahead of now. This
/// is a plausibility predicate, not a proof of issuance, and it never fails:
/// malformed input is simply `false`.
///
/// [`MAX_FUTURE_DRIFT`]: crate::MAX_FUTURE_DRIFT
pub fn verify(raw: u64) -> bool {
    verify_at(raw, &WallClock::default())
}

/// [`verify`] for the decimal string form of an ID.
///
/// Surrounding whitespace is tolerated; anything that does not parse as a
/// positive base-10 integer within the signed 64-bit range is rejected.
pub fn verify_str(s: &str) -> bool {
    verify_str_at(s, &WallClock::default())
}

/// [`verify`] against an explicit time source. Exposed for callers (and
/// tests) that need a clock other than the process wall clock.
pub fn verify_at<T: TimeSource>(raw: u64, time: &T) -> bool {
    SnowflakeId::from_raw(raw).is_plausible_at(time.current_millis())
}

/// [`verify_str`] against an explicit time source.
pub fn verify_str_at<T: TimeSource>(s: &str, time: &T) -> bool {
    match s.trim().parse::<i64>() {
        Ok(raw) if raw > 0 => verify_at(raw as u64, time),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_FUTURE_DRIFT;

    struct MockTime {
        millis: u64,
    }

    impl TimeSource for MockTime {
        fn current_millis(&self) -> u64 {
            self.millis
        }
    }

    #[test]
    fn generated_ids_verify() {
        for strategy in [Backoff::Spin, Backoff::Yield, Backoff::Sleep] {
            let id = generate(strategy).unwrap();
            assert!(verify(id.to_raw()));
            assert!(verify_str(&id.to_string()));
            assert!(verify_str(&id.to_padded_string()));
        }
    }

    #[test]
    fn generated_ids_increase() {
        let a = generate(Backoff::Spin).unwrap();
        let b = generate(Backoff::Spin).unwrap();
        // Raw ordering is only guaranteed across ticks; (timestamp, sequence)
        // ordering always holds for a shared generator.
        assert!((b.timestamp(), b.sequence()) > (a.timestamp(), a.sequence()));
    }

    #[test]
    fn rejects_non_positive_and_garbage() {
        assert!(!verify(0));
        assert!(!verify_str("0"));
        assert!(!verify_str("-1"));
        assert!(!verify_str("not-a-number"));
        assert!(!verify_str(""));
        assert!(!verify_str("18446744073709551615")); // u64::MAX, outside i64 range
        assert!(!verify_str("1e10"));
    }

    #[test]
    fn tolerates_whitespace_in_string_form() {
        let id = generate(Backoff::Spin).unwrap();
        assert!(verify_str(&format!("  {id} ")));
    }

    #[test]
    fn rejects_ids_from_the_far_future() {
        let now = 1_000_000;
        let time = MockTime { millis: now };
        let tolerance = MAX_FUTURE_DRIFT.as_millis() as u64;

        let at_limit = SnowflakeId::from_components(now + tolerance, 3, 4, 0);
        assert!(verify_at(at_limit.to_raw(), &time));

        let beyond = SnowflakeId::from_components(now + tolerance + 1, 3, 4, 0);
        assert!(!verify_at(beyond.to_raw(), &time));
    }
}
