use std::fmt::Display;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Result of a best-effort observation. Never carries an error type, so a failed observation
/// cannot be propagated with `?` into a caller's own failure path.
#[must_use]
#[derive(Debug)]
pub enum Observation<T> {
    Observed(T),
    Absent,
    Failed(String),
}

#[derive(Debug, PartialEq, Clone)]
pub enum EntryKind {
    File { size: u64 },
    Dir,
    /// Broken symlinks, sockets, devices, and entries whose metadata can't be read
    Other,
}

#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl Display for ListedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EntryKind::File { size } => write!(f, "file: {} ({} bytes)", self.name, size),
            EntryKind::Dir => write!(f, "dir: {}", self.name),
            EntryKind::Other => write!(f, "other: {}", self.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub directory: PathBuf,
    pub entries: Vec<ListedEntry>,
}

impl DirectoryListing {
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

/// Logs the immediate children of `directory` at debug level, tagged with `context`.
///
/// Observation only: nothing is modified, and every failure, including the directory vanishing
/// mid-enumeration, is turned into a log line and an [Observation::Failed].
pub fn log_directory_contents<P: AsRef<Path>>(
    directory: P,
    context: &str,
) -> Observation<DirectoryListing> {
    observe_with(directory.as_ref(), context, enumerate_children)
}

/// Existence check, then `enumerate`. Any error out of `enumerate` becomes [Observation::Failed].
pub(crate) fn observe_with<F>(
    directory: &Path,
    context: &str,
    enumerate: F,
) -> Observation<DirectoryListing>
where
    F: FnOnce(&Path) -> Result<DirectoryListing, Box<dyn std::error::Error>>,
{
    if !directory.exists() {
        log::debug!(
            "[{}] Directory does not exist: {}",
            context,
            directory.display()
        );
        return Observation::Absent;
    }

    match enumerate(directory) {
        Ok(listing) => {
            log::debug!(
                "[{}] Directory {} contains {} entries",
                context,
                directory.display(),
                listing.count()
            );
            for entry in &listing.entries {
                if entry.kind != EntryKind::Other {
                    log::debug!("{}", entry);
                }
            }
            Observation::Observed(listing)
        }
        Err(e) => {
            log::debug!(
                "Could not list directory contents for {}: {}",
                context,
                e
            );
            Observation::Failed(e.to_string())
        }
    }
}

/// Lists immediate children sorted by name. Files and directories are classified through
/// symlinks; a child whose target can't be resolved is [EntryKind::Other].
pub(crate) fn enumerate_children(
    directory: &Path,
) -> Result<DirectoryListing, Box<dyn std::error::Error>> {
    if !directory.is_dir() {
        return Err(Box::new(crate::maint_error::MaintError::new(&format!(
            "Not a directory: {}",
            directory.display()
        ))));
    }

    let walker = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut entries: Vec<ListedEntry> = Vec::new();
    for entry in walker {
        let entry = entry?;
        let kind = match std::fs::metadata(entry.path()) {
            Ok(meta) if meta.is_file() => EntryKind::File { size: meta.len() },
            Ok(meta) if meta.is_dir() => EntryKind::Dir,
            _ => EntryKind::Other,
        };
        entries.push(ListedEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            kind,
        });
    }

    Ok(DirectoryListing {
        directory: directory.to_path_buf(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::util::clear_dir_contents;

    fn listed(observation: Observation<DirectoryListing>) -> DirectoryListing {
        match observation {
            Observation::Observed(listing) => listing,
            other => panic!("expected a listing, got {:?}", other),
        }
    }

    #[test]
    fn lists_files_with_size_and_dirs() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("notes.txt"), b"hello world\n").unwrap();
        fs::create_dir(root.path().join("archive")).unwrap();

        let listing = listed(log_directory_contents(root.path(), "listing"));
        assert_eq!(listing.count(), 2);
        assert_eq!(listing.entries[0].name, "archive");
        assert_eq!(listing.entries[0].kind, EntryKind::Dir);
        assert_eq!(listing.entries[1].to_string(), "file: notes.txt (12 bytes)");
    }

    #[test]
    fn only_immediate_children_are_counted() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a").join("b").join("c")).unwrap();
        fs::write(root.path().join("a").join("deep.txt"), b"x").unwrap();

        let listing = listed(log_directory_contents(root.path(), "depth"));
        assert_eq!(listing.count(), 1);
    }

    #[test]
    fn missing_directory_is_absent() {
        let root = tempfile::tempdir().unwrap();
        let observation = log_directory_contents(root.path().join("nope"), "missing");
        assert!(matches!(observation, Observation::Absent));
    }

    #[test]
    fn plain_file_degrades_to_failure() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("single.txt");
        fs::write(&file, b"x").unwrap();

        let observation = log_directory_contents(&file, "file");
        match observation {
            Observation::Failed(reason) => assert!(reason.contains("Not a directory")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn directory_vanishing_after_existence_check_is_a_failure() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("short-lived");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("part-0001.csv"), b"id\n").unwrap();

        let observation = observe_with(&dir, "vanished", |d| {
            fs::remove_dir_all(d).unwrap();
            enumerate_children(d)
        });
        assert!(matches!(observation, Observation::Failed(_)));
        assert!(!dir.exists());
    }

    #[test]
    fn walk_error_mid_enumeration_is_a_failure() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("raw");
        fs::create_dir(&dir).unwrap();

        let observation = observe_with(&dir, "walk", |d| {
            let walk_error = WalkDir::new(d.join("missing")).into_iter().next().unwrap();
            walk_error?;
            enumerate_children(d)
        });
        match observation {
            Observation::Failed(reason) => assert!(!reason.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(dir.is_dir());
    }

    #[test]
    fn already_removed_directory_is_absent() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("gone");
        fs::create_dir(&dir).unwrap();
        fs::remove_dir(&dir).unwrap();

        assert!(enumerate_children(&dir).is_err());
        assert!(matches!(
            log_directory_contents(&dir, "gone"),
            Observation::Absent
        ));
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlink_is_counted_as_other() {
        let root = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(root.path().join("gone"), root.path().join("dangling")).unwrap();

        let listing = listed(log_directory_contents(root.path(), "links"));
        assert_eq!(listing.count(), 1);
        assert_eq!(listing.entries[0].kind, EntryKind::Other);
    }

    #[test]
    fn post_clear_listing_is_empty() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("target");
        fs::create_dir_all(target.join("archive")).unwrap();
        fs::write(target.join("notes.txt"), b"hello world\n").unwrap();
        fs::write(target.join("archive").join("2023.csv"), b"1,2\n").unwrap();

        let pre = listed(log_directory_contents(&target, "pre-clear"));
        assert_eq!(pre.count(), 2);

        clear_dir_contents(&target).unwrap();
        assert!(target.is_dir());

        let post = listed(log_directory_contents(&target, "post-clear"));
        assert_eq!(post.count(), 0);
        assert_eq!(post.directory, target);
    }
}
