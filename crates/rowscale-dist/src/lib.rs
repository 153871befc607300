//! rowscale-dist - Partitioning and collectives for rowscale
//!
//! This crate provides the communication half of the distributed resizer:
//!
//! - [`partition`] / [`RowRange`] - Which output rows each participant owns
//! - [`Communicator`] - Rank, size and the three collectives the resizer
//!   needs (scalar broadcast, byte broadcast, variable-length gather)
//! - [`LocalGroup`] / [`LocalComm`] - An in-process participant group, one
//!   thread per participant, connected only by channels
//! - [`distribute`] - Broadcast of the source image from the coordinator
//! - [`GatherPlan`] / [`collect`] - Reassembly of the output on the
//!   coordinator
//!
//! Participant 0 is the coordinator.

pub mod broadcast;
pub mod comm;
mod error;
pub mod gather;
pub mod partition;

pub use broadcast::{ABORT_SENTINEL, distribute};
pub use comm::{Communicator, LocalComm, LocalGroup};
pub use error::{DistError, DistResult};
pub use gather::{GatherPlan, collect};
pub use partition::{RowRange, partition};

/// Index of the coordinator participant.
pub const COORDINATOR: usize = 0;
