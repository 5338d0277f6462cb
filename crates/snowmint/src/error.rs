/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `snowmint` can produce.
///
/// Clock skew is deliberately a hard failure rather than something the
/// generator papers over: a wall clock that moved backwards usually points at
/// an environment problem (NTP step, VM migration), and silently reusing or
/// reordering timestamps would break the ordering guarantee of every ID
/// minted afterwards.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The time source reported a millisecond earlier than the last one used.
    ///
    /// Both values are milliseconds since the configured epoch. The call that
    /// observed the skew fails; retrying is the caller's decision, since
    /// retrying against a broken clock does not fix the clock.
    #[error("clock moved backwards: last timestamp {last_ms}ms, observed {observed_ms}ms")]
    ClockSkew {
        /// The last timestamp recorded by the generator.
        last_ms: u64,
        /// The (earlier) timestamp the time source just reported.
        observed_ms: u64,
    },

    /// The generator lock was poisoned by a thread that panicked while
    /// holding it. Not applicable when the `parking-lot` feature is enabled,
    /// since `parking_lot` mutexes do not poison.
    #[cfg(not(feature = "parking-lot"))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};

#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
