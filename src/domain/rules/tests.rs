// Unit tests for domain rules

use std::path::Path;

use crate::domain::model::*;
use crate::domain::rules::*;
use crate::error::SegcutError;

#[test]
fn test_overlapping_pairs() {
    let list = SegmentList::parse("00:10-00:20|00:30-00:40|00:15-00:35").unwrap();
    assert_eq!(SegmentRules::overlapping_pairs(&list), vec![(0, 2), (1, 2)]);
}

#[test]
fn test_touching_segments_do_not_overlap() {
    let list = SegmentList::parse("00:10-00:20|00:20-00:30").unwrap();
    assert!(SegmentRules::overlapping_pairs(&list).is_empty());
}

#[test]
fn test_is_chronological() {
    let ordered = SegmentList::parse("00:10-00:20|00:30-00:40").unwrap();
    let reversed = SegmentList::parse("00:30-00:40|00:10-00:20").unwrap();
    assert!(SegmentRules::is_chronological(&ordered));
    assert!(!SegmentRules::is_chronological(&reversed));
}

#[test]
fn test_validate_input_missing() {
    let err = PathRules::validate_input(Path::new("definitely/not/here.mp4")).unwrap_err();
    assert!(matches!(err, SegcutError::MissingFile { .. }));
}

#[test]
fn test_validate_input_rejects_directory() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PathRules::validate_input(dir.path()).is_err());
}

#[test]
fn test_validate_input_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.mp4");
    std::fs::write(&input, b"data").unwrap();
    assert!(PathRules::validate_input(&input).is_ok());
}

#[test]
fn test_validate_output_rejects_input_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.mp4");
    std::fs::write(&input, b"data").unwrap();

    let err = PathRules::validate_output(&input, &input).unwrap_err();
    assert!(matches!(err, SegcutError::Format { .. }));
    assert!(PathRules::validate_output(&input, &dir.path().join("out.mp4")).is_ok());
}

#[test]
fn test_validate_workspace_rejects_output_in_new_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let temp_dir = dir.path().join("scratch").join("work");
    let files = vec!["segment_001.mp4".to_string(), "concat_list.txt".to_string()];

    for output in [
        temp_dir.join("final.mp4"),
        dir.path().join("scratch").join("final.mp4"),
    ] {
        let err = PathRules::validate_workspace(&output, &temp_dir, &files).unwrap_err();
        assert!(matches!(err, SegcutError::Format { .. }), "{:?}", output);
    }
    assert!(PathRules::validate_workspace(&dir.path().join("final.mp4"), &temp_dir, &files).is_ok());
}

#[test]
fn test_validate_workspace_rejects_temp_file_names() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec!["segment_001.mp4".to_string(), "concat_list.txt".to_string()];

    for name in ["segment_001.mp4", "concat_list.txt"] {
        let err = PathRules::validate_workspace(&dir.path().join(name), dir.path(), &files)
            .unwrap_err();
        assert!(matches!(err, SegcutError::Format { .. }));
    }
    // An existing temp dir keeps unrelated files, so other names are fine there.
    assert!(PathRules::validate_workspace(&dir.path().join("final.mp4"), dir.path(), &files).is_ok());
}

#[cfg(unix)]
#[test]
fn test_absolute_normalizes_dots() {
    let path = PathRules::absolute(Path::new("/tmp/a/./b/../c.mp4")).unwrap();
    assert_eq!(path, Path::new("/tmp/a/c.mp4"));
}

#[test]
fn test_first_missing_ancestor() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(PathRules::first_missing_ancestor(dir.path()), None);
    assert_eq!(
        PathRules::first_missing_ancestor(&dir.path().join("a").join("b").join("c")),
        Some(dir.path().join("a"))
    );
}
