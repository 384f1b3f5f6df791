//! Segcut Video Cutter
//!
//! Cuts several time ranges out of a video and joins them into one file,
//! delegating all media work to ffmpeg.
//!
//! # Usage
//!
//! ```bash
//! segcut -i video.mp4 -s "03:05-03:10|40:05-40:10|1:03:05-1:04:05" -o output.mp4
//! segcut -i video.mp4 -s "00:30-01:00" -o clip.mp4 --mode fast --no-audio
//! segcut -i video.mp4 -s "00:30-01:00|05:00-05:30" -o out.mp4 --dry-run
//! ```

use std::process::ExitCode;

use clap::Parser;

use segcut::cli::{commands, Cli};
use segcut::SegcutError;

/// Main entry point for the Segcut CLI application
fn main() -> ExitCode {
    let cli = Cli::parse();

    match commands::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<SegcutError>() {
            Some(segcut_err) => {
                eprintln!("Error [{}]: {}", segcut_err.stage(), segcut_err);
                ExitCode::from(segcut_err.exit_code())
            }
            None => {
                eprintln!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}
