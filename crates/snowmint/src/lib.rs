//! Snowflake-style 64-bit ID minting.
//!
//! Every ID packs a millisecond timestamp, a datacenter/worker identity pair,
//! and a per-millisecond sequence counter into a single `u64`:
//!
//! ```text
//!  Bit Index:  63             62           22 21             17 16         12 11             0
//!              +--------------+---------------+-----------------+-------------+---------------+
//!  Field:      | reserved (1) | timestamp (41)| datacenter (5)  | worker (5)  | sequence (12) |
//!              +--------------+---------------+-----------------+-------------+---------------+
//!              |<----------------- MSB ---------- 64 bits ---------- LSB -------------------->|
//! ```
//!
//! IDs minted by a single generator sort by creation time: the timestamp
//! occupies the high bits, and the sequence disambiguates IDs minted within
//! the same millisecond. The datacenter and worker fields are drawn fresh
//! from a [`RandSource`] on every call, trading a small cross-process
//! collision window within a single millisecond for zero deployment
//! coordination; deployments that need guaranteed cross-process uniqueness
//! can pin those fields with a constant [`RandSource`] per node.
//!
//! # Example
//!
//! ```
//! use snowmint::{Backoff, generate, verify};
//!
//! let id = generate(Backoff::Yield).expect("wall clock went backwards");
//! assert!(verify(id.to_raw()));
//! ```
//!
//! For single-threaded or custom-clock setups, construct a generator
//! directly:
//!
//! ```
//! use snowmint::{BasicSnowflakeGenerator, SnowflakeGenerator, ThreadRandom, WallClock};
//!
//! let generator = BasicSnowflakeGenerator::new(WallClock::default(), ThreadRandom);
//! let id = generator.next_id().expect("wall clock went backwards");
//! println!("minted {id}");
//! ```

mod error;
mod generator;
mod global;
mod id;
mod rand;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::global::*;
pub use crate::id::*;
pub use crate::rand::*;
#[cfg(feature = "serde")]
pub use crate::serde::*;
pub use crate::time::*;
