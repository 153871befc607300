//! Output band collection
//!
//! Each participant contributes its computed band as packed RGBA bytes.
//! The coordinator places band `k` at byte offset `start_k * out_width * 4`
//! of a destination sized for the whole output canvas. Offsets follow the
//! row partition, not rank order.

use crate::partition::partition;
use crate::{COORDINATOR, Communicator, DistError, DistResult};
use rowscale_core::{Image, Pixel};

/// Byte counts and offsets for one gather, identical on every participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherPlan {
    pub out_width: u32,
    pub out_height: u32,
    /// Bytes contributed by each participant, in rank order.
    pub byte_counts: Vec<usize>,
    /// Destination offset of each contribution, in rank order.
    pub byte_offsets: Vec<usize>,
}

impl GatherPlan {
    /// Derive the plan for `participants` participants and an output canvas
    /// of `out_width x out_height`.
    ///
    /// # Errors
    ///
    /// Returns [`DistError::InvalidGroup`] if `participants` is zero.
    pub fn new(participants: usize, out_width: u32, out_height: u32) -> DistResult<Self> {
        if participants == 0 {
            return Err(DistError::InvalidGroup(
                "gather plan for 0 participants".to_string(),
            ));
        }
        let row_bytes = out_width as usize * Pixel::BYTES;
        let mut byte_counts = Vec::with_capacity(participants);
        let mut byte_offsets = Vec::with_capacity(participants);

        for k in 0..participants {
            let range = partition(out_height, participants, k)?;
            let count = range.rows() * row_bytes;
            let offset = range.start.max(0) as usize * row_bytes;
            log::debug!(
                "gather plan: participant {k} sends {count} bytes at offset {offset} (rows {}..{})",
                range.start,
                range.end()
            );
            byte_counts.push(count);
            byte_offsets.push(offset);
        }

        Ok(Self {
            out_width,
            out_height,
            byte_counts,
            byte_offsets,
        })
    }

    /// Size of the assembled canvas in bytes.
    pub fn total_bytes(&self) -> usize {
        self.out_width as usize * self.out_height as usize * Pixel::BYTES
    }
}

/// Send `local` to the coordinator and assemble the full canvas there.
///
/// Returns `Some(image)` on the coordinator and `None` elsewhere.
///
/// # Errors
///
/// Propagates collective failures, including a length mismatch between
/// `local` and this participant's planned byte count.
pub fn collect<C: Communicator>(
    comm: &C,
    plan: &GatherPlan,
    local: &[u8],
) -> DistResult<Option<Image>> {
    if !comm.is_root(COORDINATOR) {
        comm.gather_varcount(
            local,
            &plan.byte_counts,
            &plan.byte_offsets,
            None,
            COORDINATOR,
        )?;
        return Ok(None);
    }

    let mut dest = vec![0u8; plan.total_bytes()];
    comm.gather_varcount(
        local,
        &plan.byte_counts,
        &plan.byte_offsets,
        Some(&mut dest),
        COORDINATOR,
    )?;
    log::debug!("gathered {} bytes", dest.len());
    Ok(Some(Image::from_rgba_bytes(
        plan.out_width,
        plan.out_height,
        &dest,
    )?))
}
