//! Source image broadcast
//!
//! The coordinator sends the width, then the height, then the packed RGBA
//! bytes of the source image. Every other participant allocates its
//! buffer from the two dimensions before the pixel broadcast arrives.
//!
//! A coordinator without an image broadcasts [`ABORT_SENTINEL`] in place
//! of the width and stops there. Every participant checks the width first,
//! so the whole group leaves together instead of waiting on a pixel
//! broadcast that never comes.

use crate::{COORDINATOR, Communicator, DistError, DistResult};
use rowscale_core::{Image, Pixel};

/// Width value meaning "the coordinator failed, abort".
pub const ABORT_SENTINEL: i64 = -1;

/// Give every participant an identical copy of the coordinator's image.
///
/// On the coordinator `loaded` is the decoded source, or `None` if decoding
/// failed. It is ignored on every other participant.
///
/// Returns `Ok(None)` on every participant (coordinator included) when the
/// coordinator had no image.
///
/// # Errors
///
/// Propagates collective failures, and returns [`DistError::Protocol`] if
/// the broadcast dimensions are not a valid image size.
pub fn distribute<C: Communicator>(comm: &C, loaded: Option<Image>) -> DistResult<Option<Image>> {
    let is_coordinator = comm.is_root(COORDINATOR);
    let loaded = if is_coordinator { loaded } else { None };

    let mut width = loaded
        .as_ref()
        .map_or(ABORT_SENTINEL, |img| i64::from(img.width()));
    comm.broadcast_scalar(&mut width, COORDINATOR)?;
    if width == ABORT_SENTINEL {
        log::debug!("participant {}: abort sentinel received", comm.rank());
        return Ok(None);
    }

    let mut height = loaded.as_ref().map_or(0, |img| i64::from(img.height()));
    comm.broadcast_scalar(&mut height, COORDINATOR)?;

    let width = dimension(width, "width")?;
    let height = dimension(height, "height")?;
    log::debug!(
        "participant {}: broadcast dimensions {}x{}",
        comm.rank(),
        width,
        height
    );

    if let Some(image) = loaded {
        let mut bytes = image.to_rgba_bytes();
        comm.broadcast_bytes(&mut bytes, COORDINATOR)?;
        return Ok(Some(image));
    }

    let len = width as usize * height as usize * Pixel::BYTES;
    let mut bytes = vec![0u8; len];
    comm.broadcast_bytes(&mut bytes, COORDINATOR)?;
    log::debug!("participant {}: received {} source bytes", comm.rank(), len);
    Ok(Some(Image::from_rgba_bytes(width, height, &bytes)?))
}

fn dimension(value: i64, what: &str) -> DistResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| DistError::Protocol(format!("broadcast {what} {value} is not a valid size")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalGroup;

    fn sample() -> Image {
        let pixels = (0..6u8).map(|i| Pixel::new(i, i * 2, i * 3, 100)).collect();
        Image::from_pixels(3, 2, pixels).unwrap()
    }

    #[test]
    fn test_every_participant_gets_identical_copy() {
        let results = LocalGroup::run(4, |comm| {
            let loaded = (comm.rank() == 0).then(sample);
            distribute(&comm, loaded)
        })
        .unwrap();
        for r in results {
            assert_eq!(r.unwrap(), Some(sample()));
        }
    }

    #[test]
    fn test_abort_sentinel_reaches_everyone() {
        let results = LocalGroup::run(3, |comm| distribute(&comm, None)).unwrap();
        for r in results {
            assert_eq!(r.unwrap(), None);
        }
    }

    #[test]
    fn test_non_coordinator_image_ignored() {
        let results = LocalGroup::run(2, |comm| {
            // Only rank 1 holds an image; the coordinator has none.
            let loaded = (comm.rank() == 1).then(sample);
            distribute(&comm, loaded)
        })
        .unwrap();
        for r in results {
            assert_eq!(r.unwrap(), None);
        }
    }

    #[test]
    fn test_invalid_dimension() {
        assert!(dimension(0, "width").is_err());
        assert!(dimension(-5, "height").is_err());
        assert!(dimension(i64::from(u32::MAX) + 1, "width").is_err());
        assert_eq!(dimension(7, "width").unwrap(), 7);
    }
}
