use crate::SnowflakeId;

/// The result of a single, non-blocking generation attempt.
///
/// - [`IdGenStatus::Ready`] carries a newly minted ID.
/// - [`IdGenStatus::Pending`] means the sequence for the current millisecond
///   is exhausted (or a lock-free update lost a race) and the caller should
///   back off until the clock advances past `yield_for` milliseconds.
///
/// This split keeps the core step non-blocking so callers can choose their
/// own waiting strategy: spin, yield, sleep, or an async-friendly pause.
///
/// # Example
///
/// ```
/// use snowmint::{BasicSnowflakeGenerator, IdGenStatus, ThreadRandom, WallClock};
///
/// let generator = BasicSnowflakeGenerator::new(WallClock::default(), ThreadRandom);
/// match generator.try_poll_id() {
///     Ok(IdGenStatus::Ready { id }) => println!("minted {id}"),
///     Ok(IdGenStatus::Pending { yield_for }) => println!("back off for {yield_for}ms"),
///     Err(err) => eprintln!("clock problem: {err}"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus {
    /// A unique ID was minted and is ready to use.
    Ready {
        /// The minted ID.
        id: SnowflakeId,
    },
    /// No ID could be minted on this attempt.
    Pending {
        /// Suggested wait, in milliseconds, before polling again. Zero means
        /// retry immediately (a lock-free race, not clock exhaustion).
        yield_for: u64,
    },
}
