//! copgif captures a time-varying image source frame by frame, quantizes each floating-point
//! raster to straight RGBA8, and encodes the sequence as an animated GIF.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: an [`ImageSource`] lends a [`Raster`] for a path, plane and time
//! 2. **Convert**: every pixel goes through [`convert_pixel`] (clamp, `floor(v * 256)`, 1.0 -> 255)
//! 3. **Accumulate**: a [`FrameAccumulator`] locks the first frame's size and appends [`Frame`]s
//! 4. **Encode**: the [`FrameSequence`] is streamed into an [`AnimatedEncoder`] once, at the end
//!
//! [`RenderController`] drives the three lifecycle phases (`start`, `capture_frame`,
//! `finalize`) as an explicit state machine.
//!
//! Only half and single precision float rasters are accepted. Fixed-point sources are rejected
//! with [`CopGifError::UnsupportedFormat`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame accumulation.
pub mod capture;
/// Animated-image encoders.
pub mod encode;
/// Raster model and pixel conversion.
pub mod raster;
/// Render session lifecycle.
pub mod session;
/// Image sources.
pub mod source;

pub use crate::foundation::core::{Dimensions, SessionBounds};
pub use crate::foundation::error::{CopGifError, CopGifResult};

pub use crate::capture::accumulator::{Frame, FrameAccumulator, FrameSequence};
pub use crate::encode::encoder::{AnimatedEncoder, EncoderConfig, LoopCount};
pub use crate::encode::gif::{GifEncoderOpts, GifFileEncoder, GifHandle, ensure_parent_dir};
pub use crate::encode::memory::{EncoderCall, FailPoint, InMemoryEncoder, MemoryHandle};
pub use crate::raster::convert::convert_pixel;
pub use crate::raster::format::{ChannelPacking, PixelFormat, channel_count, is_floating_point};
pub use crate::raster::raster::Raster;
pub use crate::session::config::{HookCommands, RenderConfig};
pub use crate::session::controller::{RenderController, SessionState, SessionSummary};
pub use crate::session::hooks::{CommandHooks, HookOutcome, NoHooks, SessionHooks};
pub use crate::source::files::{FileSequenceSource, expand_frame_pattern};
pub use crate::source::memory::InMemorySource;
pub use crate::source::provider::{ImageSource, RasterGuard};
