//! Process-group abstraction
//!
//! A [`Communicator`] is one participant's endpoint into a fixed-size
//! group. Every collective is blocking and must be entered by every
//! participant with the same `root`; the root is the unique source of
//! truth for broadcasts and the unique destination of gathers.

mod local;

pub use local::{LocalComm, LocalGroup};

use crate::DistResult;

/// One participant's view of the group.
pub trait Communicator {
    /// Index of this participant, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of participants in the group.
    fn size(&self) -> usize;

    /// Whether this participant is `root`.
    fn is_root(&self, root: usize) -> bool {
        self.rank() == root
    }

    /// Propagate one integer from `root` to every participant.
    ///
    /// On the root `value` is read; elsewhere it is overwritten.
    fn broadcast_scalar(&self, value: &mut i64, root: usize) -> DistResult<()>;

    /// Propagate `buffer` from `root` to every participant.
    ///
    /// Non-root participants must pass a buffer of the same length as the
    /// root's; a length disagreement is an error, not a truncation.
    fn broadcast_bytes(&self, buffer: &mut [u8], root: usize) -> DistResult<()>;

    /// Variable-length gather.
    ///
    /// Participant `k` contributes `local`, which must be `counts[k]` bytes
    /// long. The root places each contribution at `offsets[k]` in
    /// `dest`. Offsets need not increase with rank. `dest` is only read on
    /// the root and may be `None` elsewhere.
    fn gather_varcount(
        &self,
        local: &[u8],
        counts: &[usize],
        offsets: &[usize],
        dest: Option<&mut [u8]>,
        root: usize,
    ) -> DistResult<()>;
}
