use std::path::PathBuf;

use crate::command::instruction::{Instruction, to_tokens};
use crate::foundation::error::{ShotError, ShotResult};
use crate::geometry::compiler::CornerPin;

/// Thread count handed to `oiiotool` unless overridden.
pub const DEFAULT_THREADS: u32 = 4;

/// Full `oiiotool` invocation for one frame or sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCommand {
    pub input: PathBuf,
    pub output: PathBuf,
    pub threads: u32,
    pub geometry: Vec<Instruction>,
    pub color: Vec<Instruction>,
    /// Adds `--debug -v`.
    pub debug: bool,
}

impl RenderCommand {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            threads: DEFAULT_THREADS,
            geometry: Vec::new(),
            color: Vec::new(),
            debug: false,
        }
    }

    pub fn with_geometry(mut self, instructions: Vec<Instruction>) -> Self {
        self.geometry = instructions;
        self
    }

    pub fn with_color(mut self, instructions: Vec<Instruction>) -> Self {
        self.color = instructions;
        self
    }

    pub fn with_threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Argument vector, program name first.
    pub fn argv(&self) -> ShotResult<Vec<String>> {
        if self.geometry.is_empty() && self.color.is_empty() {
            return Err(ShotError::missing_config(
                "render command has neither geometry nor color instructions",
            ));
        }
        let mut cmd = vec![
            "oiiotool".to_owned(),
            "-i".to_owned(),
            self.input.display().to_string(),
            "--threads".to_owned(),
            self.threads.max(1).to_string(),
        ];
        cmd.extend(to_tokens(&self.geometry));
        cmd.extend(to_tokens(&self.color));
        cmd.extend(["--ch".to_owned(), "R,G,B".to_owned()]);
        if self.debug {
            cmd.extend(["--debug".to_owned(), "-v".to_owned()]);
        }
        cmd.extend(["-o".to_owned(), self.output.display().to_string()]);
        Ok(cmd)
    }
}

/// ffmpeg `-vf` chain that pins the source corners, then scales and crops to
/// `width`x`height`.
pub fn perspective_filter(pin: &CornerPin, width: u32, height: u32) -> String {
    let coords: Vec<String> = pin.values().iter().map(|v| format!("{v:?}")).collect();
    format!(
        "perspective={}:sense=destination:eval=init,scale={width}:-1,crop={width}:{height}",
        coords.join(":")
    )
}

#[cfg(test)]
#[path = "../../tests/unit/command/render.rs"]
mod tests;
