//! Concurrent workspace discovery.
//!
//! Recursively walks a directory tree looking for `.devcontainer` directories
//! that contain a `devcontainer.json`, pruning conventionally heavy
//! directories (dependency caches, build output, VCS metadata) without
//! descending into them. Sibling subtrees are scanned as concurrent tasks; a
//! semaphore bounds how many directory listings are in flight at once so very
//! wide trees cannot exhaust file handles. A subtree's results are fully
//! materialized before its parent aggregates them.

use crate::env;
use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// Default bound on concurrently listed directories
pub const DEFAULT_SCAN_CONCURRENCY: usize = 64;

/// Tuning knobs for a discovery scan
#[derive(Debug, Clone, Copy)]
pub struct ScanLimits {
    /// Maximum number of directory listings in flight at once
    pub max_concurrent_dirs: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_concurrent_dirs: DEFAULT_SCAN_CONCURRENCY,
        }
    }
}

/// Errors from a discovery scan.
///
/// Per-directory listing failures inside the tree are deliberately absent:
/// an unreadable subtree is expected in normal operation and is skipped
/// without aborting the scan.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The scan root itself does not exist, cannot be resolved, or cannot
    /// be listed
    #[error("Cannot read scan root {}: {source}", .root.display())]
    RootUnreadable {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan completed but found no marker directories anywhere
    #[error("No devcontainer workspace folders found under {}", .root.display())]
    NoWorkspacesFound { root: PathBuf },
}

/// Scan a directory tree for devcontainer workspace folders.
///
/// Returns the absolute paths of every `.devcontainer` directory that was
/// independently verified to contain a `devcontainer.json` at scan time.
/// `root` defaults to the current working directory. Zero matches is an
/// explicit [`DiscoveryError::NoWorkspacesFound`] so callers can tell "found
/// none" apart from a scan that could not run.
pub async fn discover(
    root: Option<&Path>,
    limits: ScanLimits,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let requested = match root {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().map_err(|source| DiscoveryError::RootUnreadable {
            root: PathBuf::from("."),
            source,
        })?,
    };
    let root = tokio::fs::canonicalize(&requested)
        .await
        .map_err(|source| DiscoveryError::RootUnreadable {
            root: requested,
            source,
        })?;

    // The silent-skip rule applies to directories inside the tree; the root
    // itself must be listable, so a file root or a permission error here is
    // a scan error, not "found none".
    tokio::fs::read_dir(&root)
        .await
        .map_err(|source| DiscoveryError::RootUnreadable {
            root: root.clone(),
            source,
        })?;

    let semaphore = Arc::new(Semaphore::new(limits.max_concurrent_dirs.max(1)));
    let found = scan_dir(root.clone(), semaphore).await;

    debug!(root = %root.display(), count = found.len(), "workspace discovery finished");
    if found.is_empty() {
        Err(DiscoveryError::NoWorkspacesFound { root })
    } else {
        Ok(found)
    }
}

/// Scan one directory level and, concurrently, everything below it.
///
/// The semaphore permit is held only across the single `read_dir` pass and
/// released before child tasks are spawned, so a parent waiting on its
/// children never starves them of permits.
fn scan_dir(dir: PathBuf, semaphore: Arc<Semaphore>) -> BoxFuture<'static, Vec<PathBuf>> {
    async move {
        let entries = {
            let _permit = match semaphore.acquire().await {
                Ok(permit) => permit,
                Err(_) => return Vec::new(),
            };
            match list_subdirs(&dir).await {
                Ok(entries) => entries,
                Err(error) => {
                    trace!(dir = %dir.display(), %error, "skipping unreadable directory");
                    return Vec::new();
                }
            }
        };

        let mut candidates = Vec::new();
        let mut subtrees = JoinSet::new();
        for (name, path) in entries {
            if name == env::MARKER_DIR_NAME {
                candidates.push(path);
            } else if env::is_skipped_dir(&name) {
                trace!(dir = %path.display(), "pruned skip-listed directory");
            } else {
                subtrees.spawn(scan_dir(path, semaphore.clone()));
            }
        }

        // Marker checks run concurrently with the subtree tasks spawned above.
        let checks = candidates.into_iter().map(|candidate| async move {
            let marker = candidate.join(env::MARKER_FILE_NAME);
            match tokio::fs::try_exists(&marker).await {
                Ok(true) => Some(candidate),
                _ => None,
            }
        });
        let mut found: Vec<PathBuf> = join_all(checks).await.into_iter().flatten().collect();

        while let Some(joined) = subtrees.join_next().await {
            if let Ok(mut subtree_found) = joined {
                found.append(&mut subtree_found);
            }
        }
        found
    }
    .boxed()
}

/// List the subdirectories of `dir` as (name, path) pairs.
///
/// Symlinks are not followed, which keeps the descent finite. Entries whose
/// type cannot be determined are skipped.
async fn list_subdirs(dir: &Path) -> std::io::Result<Vec<(String, PathBuf)>> {
    let mut subdirs = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let Ok(file_type) = entry.file_type().await else {
            continue;
        };
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        subdirs.push((name, entry.path()));
    }
    Ok(subdirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_workspace(root: &Path, rel: &str) -> PathBuf {
        let marker_dir = root.join(rel).join(env::MARKER_DIR_NAME);
        fs::create_dir_all(&marker_dir).unwrap();
        fs::write(marker_dir.join(env::MARKER_FILE_NAME), "{}").unwrap();
        marker_dir
    }

    #[tokio::test]
    async fn test_finds_marker_directory_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let expected = make_workspace(&root, "project");

        let found = discover(Some(&root), ScanLimits::default()).await.unwrap();
        assert_eq!(found, vec![expected]);
    }

    #[tokio::test]
    async fn test_candidate_without_config_file_is_excluded() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("project").join(env::MARKER_DIR_NAME)).unwrap();

        let result = discover(Some(&root), ScanLimits::default()).await;
        assert!(matches!(
            result,
            Err(DiscoveryError::NoWorkspacesFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_skip_listed_directories_are_never_descended() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let expected = make_workspace(&root, "a");
        // Valid marker buried under node_modules must be excluded entirely.
        make_workspace(&root, "node_modules/buried");
        make_workspace(&root, "target/debug/deep");

        let found = discover(Some(&root), ScanLimits::default()).await.unwrap();
        assert_eq!(found, vec![expected]);
    }

    #[tokio::test]
    async fn test_spec_scenario_exactly_one_match() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();

        let expected = make_workspace(&root, "a");
        fs::create_dir_all(root.join("b").join(env::MARKER_DIR_NAME)).unwrap();
        let node_modules_marker = root
            .join("node_modules")
            .join(env::MARKER_DIR_NAME);
        fs::create_dir_all(&node_modules_marker).unwrap();
        fs::write(node_modules_marker.join(env::MARKER_FILE_NAME), "{}").unwrap();

        let found = discover(Some(&root), ScanLimits::default()).await.unwrap();
        assert_eq!(found, vec![expected]);
    }

    #[tokio::test]
    async fn test_results_are_duplicate_free_and_complete() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();

        let mut expected = vec![
            make_workspace(&root, "one"),
            make_workspace(&root, "two/nested"),
            make_workspace(&root, "three/deeply/nested"),
        ];
        // Invalid candidates: marker-named, no config file inside.
        fs::create_dir_all(root.join("four").join(env::MARKER_DIR_NAME)).unwrap();
        fs::create_dir_all(root.join("five/deep").join(env::MARKER_DIR_NAME)).unwrap();

        let mut found = discover(Some(&root), ScanLimits::default()).await.unwrap();
        found.sort();
        expected.sort();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_empty_tree_reports_scanned_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("src")).unwrap();

        match discover(Some(&root), ScanLimits::default()).await {
            Err(DiscoveryError::NoWorkspacesFound { root: scanned }) => {
                assert_eq!(scanned, root);
            }
            other => panic!("expected NoWorkspacesFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nonexistent_root_is_an_explicit_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let result = discover(Some(&missing), ScanLimits::default()).await;
        assert!(matches!(
            result,
            Err(DiscoveryError::RootUnreadable { .. })
        ));
    }

    #[tokio::test]
    async fn test_tiny_concurrency_bound_still_completes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();

        let mut expected = Vec::new();
        for i in 0..8 {
            expected.push(make_workspace(&root, &format!("wide/{i}/leaf")));
        }

        let limits = ScanLimits {
            max_concurrent_dirs: 1,
        };
        let mut found = discover(Some(&root), limits).await.unwrap();
        found.sort();
        expected.sort();
        assert_eq!(found, expected);
    }
}
