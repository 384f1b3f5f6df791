//! Command implementations

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::adapters::exec_ffmpeg::{FfmpegAdapter, DEFAULT_FFMPEG};
use crate::adapters::toml_config::SegcutConfig;
use crate::app::{CutInteractor, CutReport};
use crate::cli::Cli;
use crate::domain::model::*;
use crate::utils::logging::{init_logging, DEFAULT_LOG_LEVEL};
use crate::utils::time::{format_elapsed, format_timestamp};

/// Execute the command line: load configuration, set up logging, then cut
pub fn run(cli: Cli) -> Result<()> {
    let config = SegcutConfig::load(cli.config.as_deref())?;

    let level = cli
        .log_level
        .clone()
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let format = cli.log_format.or(config.logging.format).unwrap_or_default();
    init_logging(&level, format)?;
    debug!(?config, "Configuration resolved");

    if cli.dry_run {
        return dry_run(&cli);
    }

    let ffmpeg = cli
        .ffmpeg
        .clone()
        .or_else(|| config.engine.ffmpeg.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FFMPEG));
    let request = build_request(&cli, &config);
    let json = cli.json;

    let mut interactor = CutInteractor::new(Arc::new(FfmpegAdapter::new(ffmpeg)));
    let report = interactor.execute(request)?;

    if json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize report to JSON")?;
        println!("{}", json);
    } else {
        display_report(&report);
    }

    info!("Cut completed successfully");
    Ok(())
}

/// Merge CLI flags over config file values over defaults
pub fn build_request(cli: &Cli, config: &SegcutConfig) -> CutRequest {
    let engine = &config.engine;
    let settings = EncodeSettings {
        mode: cli.mode.or(config.defaults.mode).unwrap_or_default(),
        crf: cli.crf.or(engine.crf),
        preset: cli.preset.clone().or_else(|| engine.preset.clone()),
        video_codec: cli
            .video_codec
            .clone()
            .or_else(|| engine.video_codec.clone())
            .unwrap_or_else(|| DEFAULT_VIDEO_CODEC.to_string()),
        audio_codec: cli
            .audio_codec
            .clone()
            .or_else(|| engine.audio_codec.clone())
            .unwrap_or_else(|| DEFAULT_AUDIO_CODEC.to_string()),
        no_audio: cli.no_audio,
    };

    CutRequest {
        input: cli.input.clone(),
        output: cli.output.clone(),
        temp_dir: cli
            .temp_dir
            .clone()
            .or_else(|| config.defaults.temp_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMP_DIR)),
        segments: cli.segments.clone(),
        settings,
        keep_temp: cli.keep_temp,
    }
}

/// Parse the segments and print the plan
fn dry_run(cli: &Cli) -> Result<()> {
    let segments = SegmentList::parse(&cli.segments)?;
    info!(segments = segments.len(), "Dry run, nothing will be extracted");
    display_plan(&segments);
    Ok(())
}

/// Display the parsed segment plan
fn display_plan(segments: &SegmentList) {
    println!("Segment Plan");
    println!("============");
    for (i, segment) in segments.iter().enumerate() {
        println!(
            "  {:>3}. {} -> {}  ({})",
            i + 1,
            segment.start,
            segment.end,
            format_timestamp(segment.duration())
        );
    }
    println!();
    println!("Segments: {}", segments.len());
    println!("Total duration: {}", format_timestamp(segments.total_duration()));
}

/// Display the job report in human-readable format
fn display_report(report: &CutReport) {
    println!("Cut Summary");
    println!("===========");
    println!("Input: {}", report.input.display());
    println!("Output: {}", report.output.display());
    println!("Mode: {}", report.mode);
    println!();
    for record in &report.segments {
        println!(
            "  {:>3}. {} -> {}  ({})",
            record.index,
            record.start,
            record.end,
            format_timestamp(record.duration)
        );
    }
    println!();
    println!("Total duration: {}", format_timestamp(report.total_duration));
    println!(
        "Elapsed: {}",
        format_elapsed(std::time::Duration::from_secs_f64(report.elapsed))
    );
    if let Some(dir) = &report.temp_dir {
        println!("Temporary files kept in: {}", dir.display());
    }
}
