use crate::foundation::error::{CopGifError, CopGifResult};
use crate::session::config::HookCommands;
use std::process::{Command, ExitStatus, Stdio};

/// What a pre-frame hook wants the controller to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    /// Capture the frame.
    Continue,
    /// Stop the session without capturing.
    Abort,
}

/// Callbacks run around a render session and around each frame.
///
/// Every method defaults to a no-op. Errors are fatal for the session.
pub trait SessionHooks {
    /// Before the first frame, with the session start time.
    fn pre_session(&mut self, _time: f64) -> CopGifResult<()> {
        Ok(())
    }

    /// Before each frame.
    fn pre_frame(&mut self, _time: f64) -> CopGifResult<HookOutcome> {
        Ok(HookOutcome::Continue)
    }

    /// After each captured frame.
    fn post_frame(&mut self, _time: f64) -> CopGifResult<()> {
        Ok(())
    }

    /// After the last frame, with the session end time.
    fn post_session(&mut self, _time: f64) -> CopGifResult<()> {
        Ok(())
    }
}

/// Hooks that do nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoHooks;

impl SessionHooks for NoHooks {}

/// Hooks that run shell commands.
///
/// Each command runs through the platform shell with `COPGIF_TIME` set to the hook time in
/// seconds. A non-zero pre-frame exit aborts the session; any other non-zero exit is an error.
#[derive(Clone, Debug, Default)]
pub struct CommandHooks {
    cmds: HookCommands,
}

impl CommandHooks {
    /// Create hooks from configured commands.
    pub fn new(cmds: HookCommands) -> Self {
        Self { cmds }
    }

    fn run(stage: &str, cmd: Option<&str>, time: f64) -> CopGifResult<Option<ExitStatus>> {
        let Some(cmd) = cmd.map(str::trim).filter(|c| !c.is_empty()) else {
            return Ok(None);
        };
        let (shell, flag) = if cfg!(windows) {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };
        tracing::debug!(stage, cmd, time, "running hook command");
        let status = Command::new(shell)
            .arg(flag)
            .arg(cmd)
            .env("COPGIF_TIME", time.to_string())
            .stdin(Stdio::null())
            .status()
            .map_err(|e| CopGifError::hook(format!("{stage} command '{cmd}' failed to start: {e}")))?;
        Ok(Some(status))
    }

    fn run_checked(stage: &str, cmd: Option<&str>, time: f64) -> CopGifResult<()> {
        match Self::run(stage, cmd, time)? {
            Some(status) if !status.success() => Err(CopGifError::hook(format!(
                "{stage} command exited with {status}"
            ))),
            _ => Ok(()),
        }
    }
}

impl SessionHooks for CommandHooks {
    fn pre_session(&mut self, time: f64) -> CopGifResult<()> {
        Self::run_checked("pre-render", self.cmds.pre_render.as_deref(), time)
    }

    fn pre_frame(&mut self, time: f64) -> CopGifResult<HookOutcome> {
        match Self::run("pre-frame", self.cmds.pre_frame.as_deref(), time)? {
            Some(status) if !status.success() => Ok(HookOutcome::Abort),
            _ => Ok(HookOutcome::Continue),
        }
    }

    fn post_frame(&mut self, time: f64) -> CopGifResult<()> {
        Self::run_checked("post-frame", self.cmds.post_frame.as_deref(), time)
    }

    fn post_session(&mut self, time: f64) -> CopGifResult<()> {
        Self::run_checked("post-render", self.cmds.post_render.as_deref(), time)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/hooks.rs"]
mod tests;
