//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` executable as a blocking subprocess, one invocation per
//! segment plus one for the final concatenation.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::domain::model::*;
use crate::error::{SegcutError, SegcutResult};
use crate::ports::*;
use crate::utils::time::engine_seconds;

/// Executable looked up on `PATH` when none is configured
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Lines of engine stderr kept in error messages
const STDERR_TAIL_LINES: usize = 12;

/// FFmpeg-based execution adapter
#[derive(Debug, Clone)]
pub struct FfmpegAdapter {
    program: PathBuf,
}

impl Default for FfmpegAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_FFMPEG)
    }
}

impl FfmpegAdapter {
    /// Create an adapter for the given executable name or path.
    ///
    /// The executable is only resolved when the adapter is first used.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the executable against `PATH` (or check it directly if it is a path)
    pub fn resolve(&self) -> SegcutResult<PathBuf> {
        which::which(&self.program).map_err(|e| SegcutError::ToolMissing {
            tool: self.program.display().to_string(),
            message: format!("{}. Install ffmpeg or pass --ffmpeg <path>", e),
        })
    }

    /// Arguments that cut one segment
    pub fn extract_args(request: &ExtractRequest<'_>) -> Vec<OsString> {
        let settings = request.settings;
        let start = engine_seconds(request.segment.start.as_seconds());
        let duration = engine_seconds(request.segment.duration());

        let mut args: Vec<OsString> = common_args();

        match settings.mode {
            ExtractionMode::Fast | ExtractionMode::Balanced => {
                push(&mut args, ["-ss", start.as_str()]);
                args.push("-i".into());
                args.push(request.input.as_os_str().to_owned());
            }
            ExtractionMode::Accurate => {
                args.push("-i".into());
                args.push(request.input.as_os_str().to_owned());
                push(&mut args, ["-ss", start.as_str()]);
            }
        }
        push(&mut args, ["-t", duration.as_str()]);

        if settings.mode.reencodes() {
            let crf = settings.effective_crf().to_string();
            push(
                &mut args,
                [
                    "-c:v",
                    settings.video_codec.as_str(),
                    "-preset",
                    settings.effective_preset(),
                    "-crf",
                    crf.as_str(),
                ],
            );
            if !settings.no_audio {
                push(&mut args, ["-c:a", settings.audio_codec.as_str()]);
            }
        } else {
            push(&mut args, ["-c", "copy", "-avoid_negative_ts", "make_zero"]);
        }

        if settings.no_audio {
            args.push("-an".into());
        }

        args.push(request.output.as_os_str().to_owned());
        args
    }

    /// Arguments that join the manifest's files, re-encoding to the target codecs
    pub fn concat_args(request: &ConcatRequest<'_>) -> Vec<OsString> {
        let settings = request.settings;
        let crf = settings.effective_crf().to_string();

        let mut args: Vec<OsString> = common_args();
        push(&mut args, ["-f", "concat", "-safe", "0", "-i"]);
        args.push(request.manifest.as_os_str().to_owned());
        push(
            &mut args,
            [
                "-c:v",
                settings.video_codec.as_str(),
                "-preset",
                settings.effective_preset(),
                "-crf",
                crf.as_str(),
            ],
        );
        if settings.no_audio {
            args.push("-an".into());
        } else {
            push(&mut args, ["-c:a", settings.audio_codec.as_str()]);
        }
        push(&mut args, ["-movflags", "+faststart"]);
        args.push(request.output.as_os_str().to_owned());
        args
    }

    /// Run the engine to completion, mapping failures to the given stage
    fn run(&self, args: &[OsString], stage: PipelineStage) -> SegcutResult<()> {
        let program = self.resolve()?;
        debug!(
            program = %program.display(),
            args = ?args,
            "Running media engine"
        );

        let output = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            trace!(stderr = %stderr.trim(), "Media engine stderr");
        }

        if !output.status.success() {
            return Err(SegcutError::Process {
                stage,
                message: format!(
                    "{} exited with {}: {}",
                    self.name(),
                    output.status,
                    stderr_tail(&stderr)
                ),
            });
        }

        Ok(())
    }

    fn spawn_error(&self, error: std::io::Error) -> SegcutError {
        match error.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => SegcutError::ToolMissing {
                tool: self.program.display().to_string(),
                message: error.to_string(),
            },
            _ => SegcutError::Io(error),
        }
    }
}

impl MediaEnginePort for FfmpegAdapter {
    fn name(&self) -> &str {
        self.program
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_FFMPEG)
    }

    fn ensure_available(&self) -> SegcutResult<()> {
        let program = self.resolve()?;
        let output = Command::new(&program)
            .arg("-version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            return Err(SegcutError::ToolMissing {
                tool: program.display().to_string(),
                message: format!("'-version' exited with {}", output.status),
            });
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!(
            version = version.lines().next().unwrap_or("unknown"),
            "Media engine available"
        );
        Ok(())
    }

    fn extract_segment(&self, request: &ExtractRequest<'_>) -> SegcutResult<()> {
        self.run(&Self::extract_args(request), request.stage())
    }

    fn concat_segments(&self, request: &ConcatRequest<'_>) -> SegcutResult<()> {
        self.run(&Self::concat_args(request), PipelineStage::Concatenating)
    }
}

/// Flags shared by every invocation
fn common_args() -> Vec<OsString> {
    ["-hide_banner", "-loglevel", "error", "-y"]
        .into_iter()
        .map(OsString::from)
        .collect()
}

fn push<const N: usize>(args: &mut Vec<OsString>, values: [&str; N]) {
    args.extend(values.into_iter().map(OsString::from));
}

/// Last few non-empty lines of the engine's stderr
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no error output".to_string();
    }
    let skip = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[skip..].join("\n")
}
