use crate::{IdGenStatus, Result, SnowflakeId};

/// A minimal interface for minting Snowflake IDs.
///
/// Implementors provide the single non-blocking step, [`try_poll_id`]; the
/// blocking entry points are derived from it. All three generators in this
/// crate ([`BasicSnowflakeGenerator`], [`LockSnowflakeGenerator`],
/// [`AtomicSnowflakeGenerator`]) implement this trait.
///
/// # Errors
///
/// Every method fails with [`Error::ClockSkew`] when the time source reports
/// a millisecond earlier than the last one used. That failure is permanent
/// for the observed clock state and is never retried internally.
///
/// [`try_poll_id`]: SnowflakeGenerator::try_poll_id
/// [`BasicSnowflakeGenerator`]: crate::BasicSnowflakeGenerator
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
/// [`AtomicSnowflakeGenerator`]: crate::AtomicSnowflakeGenerator
/// [`Error::ClockSkew`]: crate::Error::ClockSkew
pub trait SnowflakeGenerator {
    /// Attempts one generation step without blocking.
    ///
    /// Returns [`IdGenStatus::Pending`] when the 4096-value sequence for the
    /// current millisecond is exhausted; the caller should wait for the clock
    /// to advance and poll again.
    fn try_poll_id(&self) -> Result<IdGenStatus>;

    /// Mints the next ID, invoking `f` with the suggested wait (in
    /// milliseconds) whenever the generator must stall for the next tick.
    ///
    /// Use this from cooperative runtimes to yield instead of burning the
    /// CPU: the stall resolves as soon as the clock reaches the next
    /// millisecond.
    fn next_id_with(&self, mut f: impl FnMut(u64)) -> Result<SnowflakeId> {
        loop {
            match self.try_poll_id()? {
                IdGenStatus::Ready { id } => break Ok(id),
                IdGenStatus::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Mints the next ID, busy-waiting on sequence exhaustion.
    ///
    /// The spin resolves within ~1ms under a healthy clock, which is
    /// acceptable for low-throughput minting. Prefer [`next_id_with`] where
    /// spinning would starve other tasks.
    ///
    /// [`next_id_with`]: SnowflakeGenerator::next_id_with
    fn next_id(&self) -> Result<SnowflakeId> {
        self.next_id_with(|_| core::hint::spin_loop())
    }
}
