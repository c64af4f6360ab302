use crate::foundation::error::{CopGifError, CopGifResult};

/// Width and height of a raster or frame, in pixels.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create a dimension pair.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Return `true` when either side is zero.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered, saturating on overflow.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Size in bytes of an RGBA8 buffer with these dimensions.
    pub fn rgba8_len(self) -> usize {
        self.pixel_count().saturating_mul(4)
    }
}

/// Time bounds recorded when a render session starts.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionBounds {
    /// Number of frames the host intends to render.
    pub frame_count: u32,
    /// Time of the first frame, in seconds.
    pub time_start: f64,
    /// Time of the last frame, in seconds.
    pub time_end: f64,
}

impl SessionBounds {
    /// Create validated bounds (`time_start <= time_end`, both finite).
    pub fn new(frame_count: u32, time_start: f64, time_end: f64) -> CopGifResult<Self> {
        if !time_start.is_finite() || !time_end.is_finite() {
            return Err(CopGifError::config("session times must be finite"));
        }
        if time_start > time_end {
            return Err(CopGifError::config(format!(
                "session start time {time_start} is after end time {time_end}"
            )));
        }
        Ok(Self {
            frame_count,
            time_start,
            time_end,
        })
    }

    /// Seconds between two consecutive frames, when the bounds determine it.
    pub fn frame_interval_secs(self) -> Option<f64> {
        if self.frame_count < 2 {
            return None;
        }
        let span = self.time_end - self.time_start;
        if span <= 0.0 {
            return None;
        }
        Some(span / f64::from(self.frame_count - 1))
    }

    /// Per-frame delay in GIF ticks (1/100 s), falling back to `default_ticks`.
    pub fn delay_ticks(self, default_ticks: u16) -> u16 {
        match self.frame_interval_secs() {
            Some(secs) => (secs * 100.0).round().clamp(1.0, f64::from(u16::MAX)) as u16,
            None => default_ticks,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
