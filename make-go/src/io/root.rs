//! Upward search for the project root.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{debug, info, instrument};

/// Directory containing the marker file, and how far above the start it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub path: PathBuf,
    /// Number of parent hops taken from the start directory.
    pub steps: usize,
}

/// Find the nearest directory at or above `start` that contains `marker`.
///
/// At most `max_steps` directories are examined, `start` included. The search
/// also stops at the filesystem root.
#[instrument(skip_all, fields(start = %start.display(), marker, max_steps))]
pub fn locate_project_root(start: &Path, marker: &str, max_steps: usize) -> Result<ProjectRoot> {
    info!("looking for project root");
    let mut dir = start;
    for steps in 0..max_steps {
        if marker_present(&dir.join(marker)) {
            debug!(root = %dir.display(), steps, "found project root");
            return Ok(ProjectRoot {
                path: dir.to_path_buf(),
                steps,
            });
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    bail!(
        "failed to find {marker} in {} or its parents (searched {max_steps} directories)",
        start.display()
    )
}

/// True when `candidate` is a regular file. Stat errors other than "not found"
/// are logged and treated as absent.
fn marker_present(candidate: &Path) -> bool {
    match fs::metadata(candidate) {
        Ok(meta) => meta.is_file(),
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            debug!(path = %candidate.display(), err = %e, "cannot stat marker, skipping");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{nested_dirs, write_marker};

    #[test]
    fn finds_marker_in_start_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_marker(temp.path(), "go.mod");

        let root = locate_project_root(temp.path(), "go.mod", 10).expect("root");
        assert_eq!(root.path, temp.path());
        assert_eq!(root.steps, 0);
    }

    #[test]
    fn walks_up_two_levels_from_package_dir() {
        let temp = tempfile::tempdir().expect("tempdir");
        let project = temp.path().join("home/u/project");
        let start = project.join("src/pkg");
        std::fs::create_dir_all(&start).expect("mkdir");
        write_marker(&project, "go.mod");

        let root = locate_project_root(&start, "go.mod", 10).expect("root");
        assert_eq!(root.path, project);
        assert_eq!(root.steps, 2);
    }

    #[test]
    fn finds_marker_nine_levels_up() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_marker(temp.path(), "go.mod");
        let start = nested_dirs(temp.path(), 9);

        let root = locate_project_root(&start, "go.mod", 10).expect("root");
        assert_eq!(root.path, temp.path());
        assert_eq!(root.steps, 9);
    }

    #[test]
    fn gives_up_at_ten_levels() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_marker(temp.path(), "go.mod");
        let start = nested_dirs(temp.path(), 10);

        let err = locate_project_root(&start, "go.mod", 10).unwrap_err();
        assert!(err.to_string().contains("failed to find go.mod"));
    }

    #[test]
    fn nearest_marker_wins() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_marker(temp.path(), "go.mod");
        let inner = nested_dirs(temp.path(), 1);
        write_marker(&inner, "go.mod");
        let start = nested_dirs(&inner, 2);

        let root = locate_project_root(&start, "go.mod", 10).expect("root");
        assert_eq!(root.path, inner);
    }

    #[test]
    fn directory_named_like_marker_does_not_count() {
        let temp = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(temp.path().join("go.mod")).expect("mkdir");

        assert!(locate_project_root(temp.path(), "go.mod", 1).is_err());
    }

    #[test]
    fn unreadable_candidate_is_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        write_marker(temp.path(), "go.mod");
        let file = temp.path().join("notes.txt");
        std::fs::write(&file, "not a directory").expect("write");

        // Stat of `notes.txt/go.mod` fails with a not-a-directory error.
        let root = locate_project_root(&file, "go.mod", 10).expect("root");
        assert_eq!(root.path, temp.path());
        assert_eq!(root.steps, 1);
    }
}
