//! CLI module for Segcut
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::model::ExtractionMode;
use crate::utils::logging::LogFormat;

pub mod commands;

const EXAMPLES: &str = "\
Examples:
  segcut -i video.mp4 -s \"03:05-03:10|40:05-40:10|1:03:05-1:04:05\" -o output.mp4
  segcut -i long_video.mp4 -s \"00:30-01:00|05:00-05:30\" -o highlights.mp4 --mode fast

Timecodes:
  MM:SS       e.g. 03:05 (3 minutes 5 seconds)
  HH:MM:SS    e.g. 1:03:05 (1 hour 3 minutes 5 seconds)
  Fractional seconds are allowed: 03:05.250

Segments:
  start1-end1|start2-end2|...   joined in the order given";

/// Segcut - cut several ranges out of a video and join them
///
/// Each range is extracted with ffmpeg into a temporary file, then all
/// pieces are concatenated into the output.
#[derive(Parser, Debug)]
#[command(name = "segcut")]
#[command(about = "Cut several time ranges out of a video and join them into one file")]
#[command(version)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Segments to keep: start-end|start-end|...
    #[arg(short, long)]
    pub segments: String,

    /// Output video file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Directory for temporary segment files [default: temp_segments]
    #[arg(short = 't', long)]
    pub temp_dir: Option<PathBuf>,

    /// Extraction mode: fast (stream copy), balanced, accurate [default: balanced]
    #[arg(short, long)]
    pub mode: Option<ExtractionMode>,

    /// Remove audio (silent output)
    #[arg(long)]
    pub no_audio: bool,

    /// Constant Rate Factor for re-encoding (0-51)
    #[arg(long, value_parser = parse_crf)]
    pub crf: Option<u8>,

    /// Encoder preset for re-encoding
    #[arg(long)]
    pub preset: Option<String>,

    /// Video codec of the joined output [default: libx264]
    #[arg(long)]
    pub video_codec: Option<String>,

    /// Audio codec of the joined output [default: aac]
    #[arg(long)]
    pub audio_codec: Option<String>,

    /// Path to the ffmpeg executable
    #[arg(long, env = "SEGCUT_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// Configuration file [default: ./segcut.toml if present]
    #[arg(long, env = "SEGCUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Keep temporary segment files after a successful run
    #[arg(long)]
    pub keep_temp: bool,

    /// Parse and print the segment plan without running ffmpeg
    #[arg(long)]
    pub dry_run: bool,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,

    /// Logging level or filter directive
    #[arg(long, env = "SEGCUT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log line format: pretty, compact, json
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

fn parse_crf(s: &str) -> Result<u8, String> {
    clap_num::number_range(s, 0, 51)
}
