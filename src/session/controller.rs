use crate::capture::accumulator::{FrameAccumulator, FrameSequence};
use crate::encode::encoder::{AnimatedEncoder, EncoderConfig};
use crate::foundation::core::SessionBounds;
use crate::foundation::error::{CopGifError, CopGifResult};
use crate::session::config::RenderConfig;
use crate::session::hooks::{HookOutcome, NoHooks, SessionHooks};
use crate::source::provider::{ImageSource, RasterGuard};
use std::path::PathBuf;

/// Lifecycle state of a [`RenderController`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No session has started yet.
    Idle,
    /// Between `start` and `finalize`; frames may be captured.
    Capturing,
    /// The session finished, failed or was aborted. `start` begins a new one.
    Done,
}

/// Outcome of [`RenderController::finalize`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    /// Frames captured during the session.
    pub frames: usize,
    /// Locked frame width.
    pub width: u32,
    /// Locked frame height.
    pub height: u32,
    /// Delay written for every frame, in 1/100 s.
    pub delay_ticks: u16,
    /// Artifact written, or `None` when the session was aborted and only cleaned up.
    pub output: Option<PathBuf>,
}

/// Drives one capture session at a time: `start`, `capture_frame` per time sample, `finalize`.
///
/// Any failure ends the session in [`SessionState::Done`]; nothing is retried. Rasters borrowed
/// from the source are returned before `capture_frame` returns, on success and on failure.
pub struct RenderController<S, E, H = NoHooks> {
    config: RenderConfig,
    source: S,
    encoder: E,
    hooks: H,
    state: SessionState,
    bounds: Option<SessionBounds>,
    aborted: bool,
    accumulator: FrameAccumulator,
}

impl<S: ImageSource, E: AnimatedEncoder> RenderController<S, E, NoHooks> {
    /// Create a controller without hooks.
    pub fn new(config: RenderConfig, source: S, encoder: E) -> Self {
        Self::with_hooks(config, source, encoder, NoHooks)
    }
}

impl<S: ImageSource, E: AnimatedEncoder, H: SessionHooks> RenderController<S, E, H> {
    /// Create a controller that runs `hooks` around the session and each frame.
    pub fn with_hooks(config: RenderConfig, source: S, encoder: E, hooks: H) -> Self {
        Self {
            config,
            source,
            encoder,
            hooks,
            state: SessionState::Idle,
            bounds: None,
            aborted: false,
            accumulator: FrameAccumulator::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Configuration used for every session.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Mutable configuration; changes apply from the next frame on.
    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Borrow the image source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Borrow the encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Borrow the hooks.
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Frames captured so far in the current session.
    pub fn sequence(&self) -> &FrameSequence {
        self.accumulator.sequence()
    }

    /// Begin a session covering `frame_count` frames between `time_start` and `time_end`.
    ///
    /// Only a failing pre-session hook (or a session that is still capturing) makes this fail.
    /// Bounds that are not finite or run backwards are ignored for delay derivation.
    #[tracing::instrument(skip(self))]
    pub fn start(&mut self, frame_count: u32, time_start: f64, time_end: f64) -> CopGifResult<()> {
        if self.state == SessionState::Capturing {
            return Err(CopGifError::invalid_state(
                "start called while a session is capturing",
            ));
        }

        self.bounds = match SessionBounds::new(frame_count, time_start, time_end) {
            Ok(b) => Some(b),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring session bounds, frames use the default delay");
                None
            }
        };
        self.aborted = false;
        self.accumulator.begin_sequence();

        if let Err(e) = self.hooks.pre_session(time_start) {
            tracing::warn!(error = %e, "render session failed to start");
            self.state = SessionState::Done;
            self.bounds = None;
            return Err(e);
        }

        self.state = SessionState::Capturing;
        tracing::info!(
            frame_count,
            time_start,
            time_end,
            source = %self.config.source_path,
            plane = %self.config.plane,
            "render session started"
        );
        Ok(())
    }

    /// Capture, convert and accumulate the raster at `time`.
    ///
    /// On any error the session is aborted and moves to [`SessionState::Done`].
    #[tracing::instrument(skip(self))]
    pub fn capture_frame(&mut self, time: f64) -> CopGifResult<()> {
        if self.state != SessionState::Capturing {
            return Err(CopGifError::invalid_state(format!(
                "capture_frame requires a capturing session, state is {:?}",
                self.state
            )));
        }

        self.capture_inner(time).inspect_err(|e| {
            tracing::warn!(error = %e, time, "frame capture failed, aborting session");
            self.state = SessionState::Done;
            self.aborted = true;
        })
    }

    fn capture_inner(&mut self, time: f64) -> CopGifResult<()> {
        if self.hooks.pre_frame(time)? == HookOutcome::Abort {
            return Err(CopGifError::aborted(format!(
                "pre-frame hook requested abort at time {time}"
            )));
        }

        let full_path = self.source.full_path(&self.config.source_path).ok_or_else(|| {
            CopGifError::invalid_path(format!(
                "'{}' does not name an image source",
                self.config.source_path
            ))
        })?;

        {
            let raster = RasterGuard::acquire(&mut self.source, &full_path, &self.config.plane, time)?
                .ok_or_else(|| {
                    CopGifError::source_not_found(format!(
                        "no '{}' raster for '{full_path}' at time {time}",
                        self.config.plane
                    ))
                })?;
            self.accumulator.accept_frame(&raster)?;
        }

        self.hooks.post_frame(time)
    }

    /// Finish the session and hand the captured frames to the encoder.
    ///
    /// After an aborted session this only cleans up: frames are discarded, the encoder is not
    /// opened and the summary has no output.
    #[tracing::instrument(skip(self))]
    pub fn finalize(&mut self) -> CopGifResult<SessionSummary> {
        match self.state {
            SessionState::Capturing => {}
            SessionState::Done if self.aborted => return Ok(self.discard_aborted()),
            state => {
                return Err(CopGifError::invalid_state(format!(
                    "finalize requires a capturing or aborted session, state is {state:?}"
                )));
            }
        }

        let result = self.encode_sequence();
        self.state = SessionState::Done;
        self.bounds = None;
        match &result {
            Ok(summary) => tracing::info!(
                frames = summary.frames,
                width = summary.width,
                height = summary.height,
                "render session finished"
            ),
            Err(e) => tracing::warn!(error = %e, "render session failed to finalize"),
        }
        result
    }

    fn discard_aborted(&mut self) -> SessionSummary {
        let seq = self.accumulator.finish();
        let delay_ticks = self.delay_ticks();
        self.aborted = false;
        self.bounds = None;
        tracing::info!(discarded = seq.len(), "cleaned up aborted render session");
        SessionSummary {
            frames: seq.len(),
            width: seq.width,
            height: seq.height,
            delay_ticks,
            output: None,
        }
    }

    fn delay_ticks(&self) -> u16 {
        self.bounds.map_or(self.config.default_delay_ticks, |b| {
            b.delay_ticks(self.config.default_delay_ticks)
        })
    }

    fn encode_sequence(&mut self) -> CopGifResult<SessionSummary> {
        let time_end = self.bounds.map_or(0.0, |b| b.time_end);
        self.hooks.post_session(time_end)?;

        let seq = self.accumulator.finish();
        self.config.validate()?;
        let out_path = self.config.resolved_output()?.to_path_buf();
        if seq.is_empty() {
            return Err(CopGifError::empty_sequence(
                "no frames were captured in this session",
            ));
        }

        let delay_ticks = self.delay_ticks();
        let cfg = EncoderConfig {
            out_path: out_path.clone(),
            width: seq.width,
            height: seq.height,
            loop_count: self.config.loop_mode(),
        };

        let mut handle = self.encoder.open(&cfg).map_err(encoder_failure)?;
        for frame in &seq.frames {
            self.encoder
                .write_frame(
                    &mut handle,
                    frame.as_bytes(),
                    seq.width,
                    seq.height,
                    delay_ticks,
                )
                .map_err(encoder_failure)?;
        }
        self.encoder.close(handle).map_err(encoder_failure)?;

        Ok(SessionSummary {
            frames: seq.len(),
            width: seq.width,
            height: seq.height,
            delay_ticks,
            output: Some(out_path),
        })
    }

    /// Run a whole session over `times`, which must be strictly increasing.
    ///
    /// If a frame fails, the session is still finalized (cleanup only) and the frame's error is
    /// returned.
    pub fn render_range(&mut self, times: &[f64]) -> CopGifResult<SessionSummary> {
        if times.iter().any(|t| !t.is_finite()) {
            return Err(CopGifError::config("render times must be finite"));
        }
        if times.windows(2).any(|w| w[0] >= w[1]) {
            return Err(CopGifError::config(
                "render times must be strictly increasing",
            ));
        }
        let frame_count = u32::try_from(times.len())
            .map_err(|_| CopGifError::config("too many frames in render range"))?;
        let time_start = times.first().copied().unwrap_or(0.0);
        let time_end = times.last().copied().unwrap_or(time_start);
        self.config.validate()?;

        self.start(frame_count, time_start, time_end)?;
        for &time in times {
            if let Err(e) = self.capture_frame(time) {
                if let Err(cleanup) = self.finalize() {
                    tracing::warn!(error = %cleanup, "cleanup after failed frame also failed");
                }
                return Err(e);
            }
        }
        self.finalize()
    }
}

fn encoder_failure(e: CopGifError) -> CopGifError {
    match e {
        CopGifError::Encoder(_) => e,
        other => CopGifError::encoder(other.to_string()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/controller.rs"]
mod tests;
