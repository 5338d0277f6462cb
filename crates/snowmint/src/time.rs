use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Custom epoch: Wednesday, February 5, 2025 00:00:00 IST (UTC+5:30).
///
/// Every timestamp field in a [`SnowflakeId`] counts milliseconds from this
/// instant. The value must never change: IDs already issued encode their
/// timestamps relative to it.
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_738_693_800_000);

/// A trait for time sources that return milliseconds elapsed since the
/// configured epoch.
///
/// This abstraction lets you plug in the real wall clock or a mocked time
/// source in tests.
///
/// # Example
///
/// ```
/// use snowmint::TimeSource;
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
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;
}

/// A wall-clock time source anchored to a fixed epoch.
///
/// Reads `SystemTime::now()` on every call, so external clock adjustments
/// (NTP steps, manual changes) are visible to the generator. That is
/// intentional: the generator must detect a clock that moved backwards and
/// fail with [`Error::ClockSkew`] instead of minting an out-of-order ID. A
/// monotonic source would hide the problem, not solve it.
///
/// If the system clock reads earlier than the epoch, the source saturates to
/// zero; a generator that has already minted IDs will then report skew.
///
/// [`Error::ClockSkew`]: crate::Error::ClockSkew
#[derive(Clone, Debug)]
pub struct WallClock {
    epoch: Duration,
}

impl Default for WallClock {
    /// Constructs a wall clock anchored to [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl WallClock {
    /// Constructs a wall clock using a custom epoch as the origin (t = 0),
    /// specified as a [`Duration`] since 1970-01-01 UTC.
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }
}

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|now| now.saturating_sub(self.epoch))
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}
