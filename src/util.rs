use std::fmt::Display;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::maint_error::MaintError;

/// What a destructive operation did to its target. Displays as the line printed to stdout.
#[derive(Debug, PartialEq, Clone)]
pub enum Outcome {
    Removed(PathBuf),
    Cleared(PathBuf),
    Missing(PathBuf),
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Removed(p) => write!(f, "Deleted: {}", p.display()),
            Outcome::Cleared(p) => write!(f, "Cleared contents of: {}", p.display()),
            Outcome::Missing(p) => write!(f, "Directory does not exist: {}", p.display()),
        }
    }
}

/// Deletes the directory and everything below it, if it exists.
///
/// Failures during deletion are returned, never swallowed: a half-deleted data directory
/// must stop the run.
pub fn remove_dir<P: AsRef<Path>>(path: P) -> Result<Outcome, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    let outcome = if path.exists() {
        log::debug!("Removing directory tree {}", path.display());
        fs::remove_dir_all(path).map_err(|e| {
            MaintError::new(&format!("Failed to delete {}: {}", path.display(), e))
        })?;
        Outcome::Removed(path.to_path_buf())
    } else {
        Outcome::Missing(path.to_path_buf())
    };
    println!("{outcome}");
    Ok(outcome)
}

/// Empties the directory while keeping the directory itself.
///
/// Subdirectories are removed recursively; files, symlinks and anything else are unlinked
/// without being followed. A target that exists but is not a directory is rejected.
pub fn clear_dir_contents<P: AsRef<Path>>(
    path: P,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let path = path.as_ref();
    if !path.exists() {
        let outcome = Outcome::Missing(path.to_path_buf());
        println!("{outcome}");
        return Ok(outcome);
    }
    if !path.is_dir() {
        return Err(Box::new(MaintError::new(&format!(
            "Not a directory: {}",
            path.display()
        ))));
    }

    log::debug!("Clearing contents of {}", path.display());
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let entry_path = entry.path();

        let removed = if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&entry_path)
        } else {
            fs::remove_file(&entry_path)
        };
        removed.map_err(|e| {
            MaintError::new(&format!("Failed to delete {}: {}", entry_path.display(), e))
        })?;
    }

    let outcome = Outcome::Cleared(path.to_path_buf());
    println!("{outcome}");
    Ok(outcome)
}
