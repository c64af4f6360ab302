use crate::encode::encoder::LoopCount;
use crate::foundation::error::{CopGifError, CopGifResult};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

fn default_plane() -> String {
    "C".to_string()
}

fn default_delay_ticks() -> u16 {
    4
}

/// Shell commands run at the four hook points. Empty entries are skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HookCommands {
    /// Run once before the first frame.
    pub pre_render: Option<String>,
    /// Run before each frame; a non-zero exit aborts the session.
    pub pre_frame: Option<String>,
    /// Run after each captured frame.
    pub post_frame: Option<String>,
    /// Run once after the last frame.
    pub post_render: Option<String>,
}

/// Inputs the render controller reads for every session.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    /// Logical path of the image source node (or file pattern).
    pub source_path: String,
    /// Image plane to capture.
    #[serde(default = "default_plane")]
    pub plane: String,
    /// Output artifact path.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    /// Repeat count; `None` loops forever.
    #[serde(default)]
    pub loop_count: Option<u16>,
    /// Frame delay in 1/100 s used when the session bounds do not determine one.
    #[serde(default = "default_delay_ticks")]
    pub default_delay_ticks: u16,
    /// Hook commands.
    #[serde(default)]
    pub hooks: HookCommands,
}

impl RenderConfig {
    /// Config for `source_path` with default plane, no output and no hooks.
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            plane: default_plane(),
            output_path: None,
            loop_count: None,
            default_delay_ticks: default_delay_ticks(),
            hooks: HookCommands::default(),
        }
    }

    /// Set the output path.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Set the image plane.
    pub fn with_plane(mut self, plane: impl Into<String>) -> Self {
        self.plane = plane.into();
        self
    }

    /// Parse a config from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> CopGifResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| CopGifError::config(format!("parse render config JSON: {e}")))
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> CopGifResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            CopGifError::config(format!("open render config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject configs that can never produce a frame.
    pub fn validate(&self) -> CopGifResult<()> {
        if self.source_path.trim().is_empty() {
            return Err(CopGifError::config("source_path must not be empty"));
        }
        if self.plane.trim().is_empty() {
            return Err(CopGifError::config("plane must not be empty"));
        }
        if self.default_delay_ticks == 0 {
            return Err(CopGifError::config("default_delay_ticks must be > 0"));
        }
        Ok(())
    }

    /// Output path, or `OutputUnconfigured` when missing or blank.
    pub fn resolved_output(&self) -> CopGifResult<&Path> {
        match self.output_path.as_deref() {
            Some(p) if !p.as_os_str().is_empty() => Ok(p),
            _ => Err(CopGifError::output_unconfigured(
                "no output file is configured",
            )),
        }
    }

    /// Repeat behaviour for the encoder.
    pub fn loop_mode(&self) -> LoopCount {
        self.loop_count.into()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
