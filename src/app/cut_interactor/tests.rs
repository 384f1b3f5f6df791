// Unit tests for the cut interactor

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use super::*;
use crate::error::SegcutError;

/// What the fake engine was asked to do
#[derive(Debug, Clone, PartialEq)]
enum Call {
    Check,
    Extract { index: usize, output: PathBuf },
    Concat { manifest_lines: usize, segments_on_disk: usize },
}

/// In-memory engine that writes small placeholder files
#[derive(Default)]
struct FakeEngine {
    calls: Mutex<Vec<Call>>,
    fail_extract_at: Option<usize>,
    fail_concat: bool,
    missing: bool,
}

impl FakeEngine {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn concat_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Concat { .. }))
            .count()
    }
}

impl MediaEnginePort for FakeEngine {
    fn name(&self) -> &str {
        "fake"
    }

    fn ensure_available(&self) -> SegcutResult<()> {
        self.calls.lock().unwrap().push(Call::Check);
        if self.missing {
            return Err(SegcutError::ToolMissing {
                tool: "fake".to_string(),
                message: "not installed".to_string(),
            });
        }
        Ok(())
    }

    fn extract_segment(&self, request: &ExtractRequest<'_>) -> SegcutResult<()> {
        self.calls.lock().unwrap().push(Call::Extract {
            index: request.index,
            output: request.output.to_path_buf(),
        });
        // Engines leave partial output behind when they fail.
        std::fs::write(request.output, b"segment").unwrap();
        if self.fail_extract_at == Some(request.index) {
            return Err(SegcutError::Process {
                stage: request.stage(),
                message: "fake exited with status 1".to_string(),
            });
        }
        Ok(())
    }

    fn concat_segments(&self, request: &ConcatRequest<'_>) -> SegcutResult<()> {
        let manifest = std::fs::read_to_string(request.manifest).unwrap();
        let segments_on_disk = manifest
            .lines()
            .filter(|line| {
                let path = line.trim_start_matches("file '").trim_end_matches('\'');
                Path::new(path).is_file()
            })
            .count();
        self.calls.lock().unwrap().push(Call::Concat {
            manifest_lines: manifest.lines().count(),
            segments_on_disk,
        });
        if self.fail_concat {
            return Err(SegcutError::Process {
                stage: PipelineStage::Concatenating,
                message: "fake exited with status 1".to_string(),
            });
        }
        std::fs::write(request.output, b"joined").unwrap();
        Ok(())
    }
}

struct Fixture {
    dir: TempDir,
    input: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("source.mp4");
        std::fs::write(&input, b"video").unwrap();
        Self { dir, input }
    }

    fn temp_dir(&self) -> PathBuf {
        self.dir.path().join("temp_segments")
    }

    fn output(&self) -> PathBuf {
        self.dir.path().join("highlights.mp4")
    }

    fn request(&self, segments: &str) -> CutRequest {
        let mut request = CutRequest::new(&self.input, self.output(), segments);
        request.temp_dir = self.temp_dir();
        request
    }
}

fn run(engine: Arc<FakeEngine>, request: CutRequest) -> (CutInteractor, SegcutResult<CutReport>) {
    let mut interactor = CutInteractor::new(engine);
    let result = interactor.execute(request);
    (interactor, result)
}

#[test]
fn test_successful_job() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());

    let (interactor, result) = run(
        engine.clone(),
        fixture.request("03:05-03:10|40:05-40:10|1:03:05-1:04:05"),
    );
    let report = result.unwrap();

    assert_eq!(interactor.stage(), PipelineStage::Done);
    assert_eq!(report.segments.len(), 3);
    assert_eq!(report.total_duration, 70.0);
    assert_eq!(report.mode, ExtractionMode::Balanced);
    assert!(report.temp_dir.is_none());
    assert!(fixture.output().is_file());
    assert!(!fixture.temp_dir().exists());
}

#[test]
fn test_one_temp_file_per_segment_before_concat() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());

    let (_, result) = run(engine.clone(), fixture.request("00:10-00:20|00:30-00:40"));
    result.unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0], Call::Check);
    assert_eq!(
        calls[1],
        Call::Extract {
            index: 1,
            output: fixture.temp_dir().join("segment_001.mp4"),
        }
    );
    assert_eq!(
        calls[2],
        Call::Extract {
            index: 2,
            output: fixture.temp_dir().join("segment_002.mp4"),
        }
    );
    assert_eq!(
        calls[3],
        Call::Concat {
            manifest_lines: 2,
            segments_on_disk: 2,
        }
    );
}

#[test]
fn test_extraction_failure_skips_concat_and_cleans_up() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine {
        fail_extract_at: Some(2),
        ..FakeEngine::default()
    });

    let (interactor, result) = run(
        engine.clone(),
        fixture.request("00:10-00:20|00:30-00:40|00:50-01:00"),
    );
    let err = result.unwrap_err();

    assert!(matches!(
        err,
        SegcutError::Process {
            stage: PipelineStage::Extracting { index: 2, total: 3 },
            ..
        }
    ));
    assert_eq!(interactor.stage(), PipelineStage::Failed);
    assert_eq!(engine.concat_calls(), 0);
    assert_eq!(engine.calls().len(), 3);
    assert!(!fixture.temp_dir().exists());
    assert!(!fixture.output().exists());
}

#[test]
fn test_concat_failure_cleans_up() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine {
        fail_concat: true,
        ..FakeEngine::default()
    });

    let (interactor, result) = run(engine.clone(), fixture.request("00:10-00:20"));
    let err = result.unwrap_err();

    assert_eq!(err.stage(), "concatenating");
    assert_eq!(interactor.stage(), PipelineStage::Failed);
    assert!(!fixture.temp_dir().exists());
}

#[test]
fn test_parse_failure_never_touches_engine() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());

    let (interactor, result) = run(engine.clone(), fixture.request("05:00-04:00"));

    assert!(matches!(result, Err(SegcutError::Range { .. })));
    assert_eq!(interactor.stage(), PipelineStage::Failed);
    assert!(engine.calls().is_empty());
    assert!(!fixture.temp_dir().exists());
}

#[test]
fn test_missing_input_fails_in_parsing() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());
    let mut request = fixture.request("00:10-00:20");
    request.input = fixture.dir.path().join("absent.mp4");

    let (_, result) = run(engine.clone(), request);

    assert!(matches!(result, Err(SegcutError::MissingFile { .. })));
    assert!(engine.calls().is_empty());
}

#[test]
fn test_missing_engine_fails_before_extraction() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine {
        missing: true,
        ..FakeEngine::default()
    });

    let (_, result) = run(engine.clone(), fixture.request("00:10-00:20"));

    assert!(matches!(result, Err(SegcutError::ToolMissing { .. })));
    assert_eq!(engine.calls(), vec![Call::Check]);
    assert!(!fixture.temp_dir().exists());
}

#[test]
fn test_keep_temp_leaves_segments() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());
    let mut request = fixture.request("00:10-00:20|00:30-00:40");
    request.keep_temp = true;

    let (_, result) = run(engine, request);
    let report = result.unwrap();

    assert_eq!(report.temp_dir, Some(fixture.temp_dir()));
    assert!(fixture.temp_dir().join("segment_001.mp4").is_file());
    assert!(fixture.temp_dir().join("segment_002.mp4").is_file());
}

#[test]
fn test_overlapping_and_reversed_segments_are_allowed() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());

    let (_, result) = run(engine, fixture.request("00:30-00:40|00:10-00:35"));
    let report = result.unwrap();

    assert_eq!(report.segments[0].start.as_seconds(), 30.0);
    assert_eq!(report.segments[1].start.as_seconds(), 10.0);
    assert_eq!(report.total_duration, 35.0);
}

#[test]
fn test_segment_files_follow_output_extension() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());
    let mut request = fixture.request("00:10-00:20");
    request.output = fixture.dir.path().join("clip.mkv");

    let (_, result) = run(engine, request);
    let report = result.unwrap();

    assert_eq!(
        report.segments[0].temp_file,
        fixture.temp_dir().join("segment_001.mkv")
    );
}

#[test]
fn test_output_inside_new_temp_dir_is_rejected() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());
    let mut request = fixture.request("00:10-00:20");
    request.output = fixture.temp_dir().join("final.mp4");

    let (interactor, result) = run(engine.clone(), request);

    assert!(matches!(result, Err(SegcutError::Format { .. })));
    assert_eq!(interactor.stage(), PipelineStage::Failed);
    assert!(engine.calls().is_empty());
    assert!(!fixture.temp_dir().exists());
}

#[test]
fn test_output_named_like_segment_file_is_rejected() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());
    let mut request = fixture.request("00:10-00:20|00:30-00:40");
    request.temp_dir = fixture.dir.path().to_path_buf();
    request.output = fixture.dir.path().join("segment_002.mp4");

    let (_, result) = run(engine.clone(), request);

    assert!(matches!(result, Err(SegcutError::Format { .. })));
    assert!(engine.calls().is_empty());
}

#[test]
fn test_output_beside_segments_in_existing_dir_survives() {
    let fixture = Fixture::new();
    let engine = Arc::new(FakeEngine::default());
    let mut request = fixture.request("00:10-00:20");
    request.temp_dir = fixture.dir.path().to_path_buf();

    let (_, result) = run(engine, request);
    let report = result.unwrap();

    assert!(report.output.is_file());
    assert!(fixture.input.is_file());
    assert!(!fixture.dir.path().join("segment_001.mp4").exists());
}
