//! Writable destination mirroring live subprocess stdout.
//!
//! A sink is exclusively owned by one invocation: opened before the process
//! spawns and closed on every exit path. Closing is idempotent, and a write
//! error marks the sink closed so later writes become no-ops instead of
//! producing corrupt output past the point of failure.

use super::RunnerError;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::warn;

#[derive(Debug)]
enum SinkKind {
    /// Mirror writes into a file created (truncated) at open time
    File { file: File, path: PathBuf },
    /// Accept and drop all writes
    Discard,
}

/// A live copy destination for subprocess stdout
#[derive(Debug)]
pub struct OutputSink {
    // None once closed
    inner: Option<SinkKind>,
}

impl OutputSink {
    /// Open a sink bound to `path`, or a discard sink when `path` is `None`.
    ///
    /// Fails with [`RunnerError::SinkCreation`] if the path cannot be created
    /// (missing parent directory, permissions). Parent directories are not
    /// auto-created.
    pub async fn open(path: Option<&Path>) -> Result<Self, RunnerError> {
        let inner = match path {
            Some(path) => {
                let file = File::create(path)
                    .await
                    .map_err(|source| RunnerError::SinkCreation {
                        path: path.to_path_buf(),
                        source,
                    })?;
                SinkKind::File {
                    file,
                    path: path.to_path_buf(),
                }
            }
            None => SinkKind::Discard,
        };
        Ok(Self { inner: Some(inner) })
    }

    /// Mirror one stdout chunk.
    ///
    /// A failed write closes the sink; the invocation keeps running and
    /// later chunks are silently dropped.
    pub async fn write(&mut self, chunk: &[u8]) {
        let write_failed = match self.inner.as_mut() {
            Some(SinkKind::File { file, path }) => match file.write_all(chunk).await {
                Ok(()) => false,
                Err(error) => {
                    warn!(path = %path.display(), %error, "output sink write failed, closing sink");
                    true
                }
            },
            _ => false,
        };
        if write_failed {
            self.close().await;
        }
    }

    /// Close the sink, releasing the underlying handle.
    ///
    /// Safe to call multiple times; flush errors on teardown are not
    /// propagated because the sink contract forbids a second error after a
    /// write failure.
    pub async fn close(&mut self) {
        if let Some(SinkKind::File { mut file, .. }) = self.inner.take() {
            let _ = file.shutdown().await;
        }
    }

    /// Whether the sink has been closed (or was never a file)
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_sink_receives_writes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");

        let mut sink = OutputSink::open(Some(&path)).await.unwrap();
        sink.write(b"hello ").await;
        sink.write(b"world").await;
        sink.close().await;

        let content = std::fs::read(&path).unwrap();
        assert_eq!(content, b"hello world");
    }

    #[tokio::test]
    async fn test_discard_sink_accepts_writes() {
        let mut sink = OutputSink::open(None).await.unwrap();
        sink.write(b"dropped").await;
        sink.close().await;
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");

        let mut sink = OutputSink::open(Some(&path)).await.unwrap();
        sink.write(b"data").await;
        sink.close().await;
        sink.close().await;
        sink.close().await;

        assert!(sink.is_closed());
        assert_eq!(std::fs::read(&path).unwrap(), b"data");
    }

    #[tokio::test]
    async fn test_writes_after_close_are_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");

        let mut sink = OutputSink::open(Some(&path)).await.unwrap();
        sink.write(b"kept").await;
        sink.close().await;
        sink.write(b" dropped").await;

        assert_eq!(std::fs::read(&path).unwrap(), b"kept");
    }

    #[tokio::test]
    async fn test_open_fails_on_missing_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("no-such-dir").join("out.log");

        let result = OutputSink::open(Some(&path)).await;
        assert!(matches!(
            result,
            Err(RunnerError::SinkCreation { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_truncates_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.log");
        std::fs::write(&path, "stale content").unwrap();

        let mut sink = OutputSink::open(Some(&path)).await.unwrap();
        sink.write(b"fresh").await;
        sink.close().await;

        assert_eq!(std::fs::read(&path).unwrap(), b"fresh");
    }
}
