use crate::foundation::core::Dimensions;
use crate::foundation::error::CopGifResult;
use std::path::PathBuf;

/// How often an animation repeats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum LoopCount {
    /// Loop forever.
    #[default]
    Infinite,
    /// Repeat the given number of times after the first play.
    Finite(u16),
}

impl From<Option<u16>> for LoopCount {
    fn from(v: Option<u16>) -> Self {
        v.map_or(LoopCount::Infinite, LoopCount::Finite)
    }
}

/// Parameters passed to [`AnimatedEncoder::open`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Output artifact path.
    pub out_path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Repeat behaviour.
    pub loop_count: LoopCount,
}

impl EncoderConfig {
    /// Frame dimensions.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Sink for a finished frame sequence.
///
/// Call order contract: `open` once, `write_frame` once per frame in sequence order, then
/// `close` once. Frame bytes are straight RGBA8 in capture scan order (see
/// [`crate::Frame`]). Every failure is reported as [`crate::CopGifError::Encoder`].
pub trait AnimatedEncoder {
    /// Per-output state created by `open` and consumed by `close`.
    type Handle;

    /// Create the output artifact.
    fn open(&mut self, cfg: &EncoderConfig) -> CopGifResult<Self::Handle>;

    /// Append one frame shown for `delay_ticks` hundredths of a second.
    fn write_frame(
        &mut self,
        handle: &mut Self::Handle,
        rgba: &[u8],
        width: u32,
        height: u32,
        delay_ticks: u16,
    ) -> CopGifResult<()>;

    /// Finish the artifact.
    fn close(&mut self, handle: Self::Handle) -> CopGifResult<()>;
}
