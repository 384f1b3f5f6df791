// Domain rules - Checks applied to a parsed job before any work starts

use std::path::{Component, Path, PathBuf};

use crate::domain::model::*;
use crate::error::{SegcutError, SegcutResult};

/// Rules about the segment list as a whole
pub struct SegmentRules;

impl SegmentRules {
    /// Index pairs (0-based) of segments that share source time
    pub fn overlapping_pairs(segments: &SegmentList) -> Vec<(usize, usize)> {
        let list = segments.as_slice();
        let mut pairs = Vec::new();
        for (i, a) in list.iter().enumerate() {
            for (j, b) in list.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// Whether segments appear in source order
    pub fn is_chronological(segments: &SegmentList) -> bool {
        segments
            .as_slice()
            .windows(2)
            .all(|pair| pair[0].start <= pair[1].start)
    }
}

/// Rules about the job's file paths
pub struct PathRules;

impl PathRules {
    /// Source must be an existing file
    pub fn validate_input(input: &Path) -> SegcutResult<()> {
        if !input.is_file() {
            return Err(SegcutError::MissingFile {
                path: input.to_path_buf(),
            });
        }
        Ok(())
    }

    /// Output must not overwrite the source
    pub fn validate_output(input: &Path, output: &Path) -> SegcutResult<()> {
        if output.as_os_str().is_empty() {
            return Err(SegcutError::format("output path is empty"));
        }

        let same = match (input.canonicalize(), output.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => input == output,
        };
        if same {
            return Err(SegcutError::format(format!(
                "output path '{}' would overwrite the input",
                output.display()
            )));
        }
        Ok(())
    }

    /// Output must survive cleanup of the temporary directory.
    ///
    /// Rejects an output placed under any directory the job is about to
    /// create for `temp_dir`, or one named like a file the job writes there.
    pub fn validate_workspace(
        output: &Path,
        temp_dir: &Path,
        workspace_files: &[String],
    ) -> SegcutResult<()> {
        let output_abs = Self::absolute(output)?;
        let temp_abs = Self::absolute(temp_dir)?;

        if let Some(created) = Self::first_missing_ancestor(&temp_abs) {
            if output_abs.starts_with(&created) {
                return Err(SegcutError::format(format!(
                    "output path '{}' is inside the temporary directory '{}', which is removed after the job",
                    output.display(),
                    temp_dir.display()
                )));
            }
        }

        let collides = output_abs.parent() == Some(temp_abs.as_path())
            && output_abs
                .file_name()
                .map_or(false, |name| workspace_files.iter().any(|f| name == f.as_str()));
        if collides {
            return Err(SegcutError::format(format!(
                "output path '{}' collides with a temporary file in '{}'",
                output.display(),
                temp_dir.display()
            )));
        }
        Ok(())
    }

    /// Anchor `path` at the current directory and drop `.` and `..` lexically
    pub fn absolute(path: &Path) -> SegcutResult<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        Ok(normalized)
    }

    /// Topmost directory that `create_dir_all(dir)` would create, if any
    pub fn first_missing_ancestor(dir: &Path) -> Option<PathBuf> {
        dir.ancestors()
            .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
            .last()
            .map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests;
