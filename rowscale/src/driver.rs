//! Coordinator driver
//!
//! Every participant walks the same state sequence:
//!
//! ```text
//! Loading -> Broadcasting -> Partitioning -> Resampling -> Gathering
//!         -> Writing (coordinator only) -> Done
//! ```
//!
//! `Broadcasting` and `Gathering` are collective; the states in between are
//! local. Any failure moves the participant to `Aborted`.
//!
//! A coordinator that cannot decode its source broadcasts the abort
//! sentinel in place of the width, so every participant aborts at the
//! first collective. A participant whose resampling fails returns a
//! [`ResizeError::Fault`] without entering the gather; the coordinator
//! then sees its peer disconnect instead of waiting forever.

use crate::{ResizeConfig, ResizeError, ResizeResult};
use rowscale_core::{Image, pixels_to_bytes};
use rowscale_dist::{
    COORDINATOR, Communicator, DistError, GatherPlan, LocalGroup, RowRange, collect, distribute,
    partition,
};
use rowscale_io::ImageFormat;
use rowscale_transform::{ScaleFactors, TransformResult, resample_rows};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Driver state of one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Loading,
    Broadcasting,
    Partitioning,
    Resampling,
    Gathering,
    Writing,
    Done,
    Aborted,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriverState::Loading => "loading",
            DriverState::Broadcasting => "broadcasting",
            DriverState::Partitioning => "partitioning",
            DriverState::Resampling => "resampling",
            DriverState::Gathering => "gathering",
            DriverState::Writing => "writing",
            DriverState::Done => "done",
            DriverState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// What the coordinator reports after a successful resize.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeReport {
    /// Source dimensions
    pub input: (u32, u32),
    /// Output dimensions
    pub output: (u32, u32),
    pub factors: ScaleFactors,
    /// Row range of every participant, in rank order
    pub ranges: Vec<RowRange>,
    /// File the output was written to
    pub output_path: PathBuf,
}

/// Assembled output on the coordinator.
struct Assembled {
    input: (u32, u32),
    image: Image,
    ranges: Vec<RowRange>,
}

struct Participant<'a, C: Communicator> {
    comm: &'a C,
    state: DriverState,
}

impl<'a, C: Communicator> Participant<'a, C> {
    fn new(comm: &'a C) -> Self {
        log::debug!("participant {}: {}", comm.rank(), DriverState::Loading);
        Self {
            comm,
            state: DriverState::Loading,
        }
    }

    fn rank(&self) -> usize {
        self.comm.rank()
    }

    fn is_coordinator(&self) -> bool {
        self.comm.is_root(COORDINATOR)
    }

    fn transition(&mut self, next: DriverState) {
        log::debug!("participant {}: {} -> {}", self.rank(), self.state, next);
        self.state = next;
    }

    fn abort(&mut self, err: ResizeError) -> ResizeError {
        log::error!(
            "participant {}: aborted while {}: {}",
            self.rank(),
            self.state,
            err
        );
        self.state = DriverState::Aborted;
        err
    }

    /// Broadcast, partition, resample and gather.
    ///
    /// `loaded` is only read on the coordinator. Returns the assembled
    /// output on the coordinator and `None` elsewhere.
    fn compute(
        &mut self,
        loaded: Option<Image>,
        config: &ResizeConfig,
    ) -> ResizeResult<Option<Assembled>> {
        self.transition(DriverState::Broadcasting);
        let source = match distribute(self.comm, loaded) {
            Ok(Some(image)) => image,
            Ok(None) => {
                let participant = self.rank();
                return Err(self.abort(ResizeError::Aborted { participant }));
            }
            Err(e) => return Err(self.abort(e.into())),
        };

        self.transition(DriverState::Partitioning);
        let input = source.dimensions();
        let (out_width, out_height) = match config.output_size(input.0, input.1) {
            Ok(size) => size,
            Err(e) => return Err(self.abort(e)),
        };
        if self.is_coordinator() {
            log::info!(
                "rescaling {}x{} -> {}x{} (scale {}, {})",
                input.0,
                input.1,
                out_width,
                out_height,
                config.factors.x,
                config.factors.y
            );
        }
        let size = self.comm.size();
        let range = match partition(out_height, size, self.rank()) {
            Ok(range) => range,
            Err(e) => return Err(self.abort(e.into())),
        };
        if range.is_empty() {
            log::warn!(
                "participant {} owns no rows of {}",
                self.rank(),
                out_height
            );
        } else {
            log::info!(
                "participant {} computes {}/{} rows starting at {}",
                self.rank(),
                range.count,
                out_height,
                range.start
            );
        }

        self.transition(DriverState::Resampling);
        let band = match fault_boundary(self.rank(), range, || {
            resample_rows(
                &source,
                out_width,
                out_height,
                range.as_range(),
                config.mapping,
            )
        }) {
            Ok(band) => band,
            Err(e) => return Err(self.abort(e)),
        };
        drop(source);
        let local = pixels_to_bytes(&band);
        drop(band);

        self.transition(DriverState::Gathering);
        let gathered = GatherPlan::new(size, out_width, out_height)
            .and_then(|plan| collect(self.comm, &plan, &local));
        let image = match gathered {
            Ok(image) => image,
            Err(e) => return Err(self.abort(e.into())),
        };

        let Some(image) = image else {
            return Ok(None);
        };
        let ranges = (0..size)
            .map(|k| partition(out_height, size, k))
            .collect::<Result<Vec<_>, DistError>>()?;
        Ok(Some(Assembled {
            input,
            image,
            ranges,
        }))
    }
}

/// Run `f` so that a panic or error becomes a [`ResizeError::Fault`]
/// naming the participant and its rows.
fn fault_boundary<T, F>(participant: usize, range: RowRange, f: F) -> ResizeResult<T>
where
    F: FnOnce() -> TransformResult<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ResizeError::Fault {
            participant,
            range,
            message: e.to_string(),
        }),
        Err(payload) => Err(ResizeError::Fault {
            participant,
            range,
            message: panic_message(payload.as_ref()),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

/// Run one participant of a file-to-file resize.
///
/// `source` is only read on the coordinator. The coordinator decodes it,
/// takes part in the computation like every other participant, then
/// writes the result to `config.output` and returns a report. Every other
/// participant returns `Ok(None)`.
///
/// # Errors
///
/// On the coordinator a decode failure is returned as
/// [`ResizeError::Decode`]; the other participants return
/// [`ResizeError::Aborted`].
pub fn run_participant<C: Communicator>(
    comm: &C,
    source: Option<&Path>,
    config: &ResizeConfig,
) -> ResizeResult<Option<ResizeReport>> {
    let mut participant = Participant::new(comm);

    let mut failure = None;
    let loaded = if participant.is_coordinator() {
        match load(source) {
            Ok(image) => Some(image),
            Err(e) => {
                failure = Some(e);
                None
            }
        }
    } else {
        None
    };

    if let Some(err) = failure {
        // Tell the group before leaving.
        if let Err(e) = distribute(comm, None) {
            log::warn!("participant {}: abort broadcast failed: {}", comm.rank(), e);
        }
        return Err(participant.abort(err));
    }

    let Some(assembled) = participant.compute(loaded, config)? else {
        participant.transition(DriverState::Done);
        return Ok(None);
    };

    participant.transition(DriverState::Writing);
    let format = ImageFormat::from_path(&config.output);
    if let Err(source) = rowscale_io::write_image(&assembled.image, &config.output, format) {
        return Err(participant.abort(ResizeError::Encode {
            path: config.output.clone(),
            source,
        }));
    }
    participant.transition(DriverState::Done);

    Ok(Some(ResizeReport {
        input: assembled.input,
        output: assembled.image.dimensions(),
        factors: config.factors,
        ranges: assembled.ranges,
        output_path: config.output.clone(),
    }))
}

fn load(source: Option<&Path>) -> ResizeResult<Image> {
    let path = source.ok_or_else(|| {
        ResizeError::Config("coordinator was given no source path".to_string())
    })?;
    rowscale_io::read_image(path).map_err(|source| ResizeError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Resize the image at `source` with an in-process group of
/// `config.participants` participants and write it to `config.output`.
///
/// # Examples
///
/// ```no_run
/// use rowscale::{ResizeConfig, ScaleFactors, resize_distributed};
///
/// let config = ResizeConfig::with_factors(ScaleFactors::new(2.0, 2.0).unwrap())
///     .participants(4)
///     .output("big.png");
/// let report = resize_distributed("small.png", &config).unwrap();
/// println!("{}x{}", report.output.0, report.output.1);
/// ```
pub fn resize_distributed<P: AsRef<Path>>(
    source: P,
    config: &ResizeConfig,
) -> ResizeResult<ResizeReport> {
    config.validate()?;
    let source = source.as_ref();
    let results = LocalGroup::run(config.participants, |comm| {
        let path = comm.is_root(COORDINATOR).then_some(source);
        run_participant(&comm, path, config)
    })?;
    coordinator_outcome(results)
}

/// Resize an in-memory image with an in-process group, without touching
/// the codec.
///
/// The result is identical for every participant count.
pub fn resize_image_distributed(image: &Image, config: &ResizeConfig) -> ResizeResult<Image> {
    config.validate()?;
    let results = LocalGroup::run(config.participants, |comm| -> ResizeResult<Option<Image>> {
        let loaded = comm.is_root(COORDINATOR).then(|| image.clone());
        let mut participant = Participant::new(&comm);
        let assembled = participant.compute(loaded, config)?;
        participant.transition(DriverState::Done);
        Ok(assembled.map(|a| a.image))
    })?;
    coordinator_outcome(results)
}

/// Pick the group's outcome: a fault anywhere wins, since the coordinator
/// only sees it as a disconnect; otherwise the coordinator's result.
fn coordinator_outcome<T>(results: Vec<ResizeResult<Option<T>>>) -> ResizeResult<T> {
    let mut results = results.into_iter();
    let coordinator = results.next().ok_or_else(|| {
        ResizeError::Config("participant group is empty".to_string())
    })?;

    for result in results {
        if let Err(fault @ ResizeError::Fault { .. }) = result {
            return Err(fault);
        }
    }

    match coordinator? {
        Some(value) => Ok(value),
        None => Err(DistError::Protocol("coordinator produced no output".to_string()).into()),
    }
}
