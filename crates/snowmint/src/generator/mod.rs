mod atomic;
mod basic;
mod interface;
mod lock;
mod mutex;
mod status;
#[cfg(test)]
mod tests;

pub use atomic::*;
pub use basic::*;
pub use interface::*;
pub use lock::*;
pub(crate) use mutex::*;
pub use status::*;

use crate::{RandSource, SnowflakeId};

/// Assembles a fresh ID for the given tick and sequence, drawing the
/// datacenter and worker fields from the random source.
///
/// The datacenter ID is drawn first, then the worker ID; both are uniform
/// over [0, 31] because the masks are power-of-two ranges.
pub(crate) fn mint<R: RandSource>(rng: &R, timestamp: u64, sequence: u64) -> SnowflakeId {
    let datacenter_id = rng.rand() & SnowflakeId::DATACENTER_ID_MASK;
    let worker_id = rng.rand() & SnowflakeId::WORKER_ID_MASK;
    SnowflakeId::from_components(timestamp, datacenter_id, worker_id, sequence)
}
