// File-backed, append-only task log

use crate::api::TaskStore;
use crate::core::errors::TasksError;
use crate::core::models::Task;
use crate::store::framing;
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Append-only record store over a single delimiter-framed file.
///
/// Appends take the exclusive side of the lock, reads the shared side, so a
/// reader sees the file either before or after an append, never halfway.
/// The lock only covers this process; two processes sharing one file must not
/// both write to it.
pub struct TaskLog {
    path: PathBuf,
    lock: Arc<RwLock<()>>,
}

impl TaskLog {
    /// Create a store over `path`. The file itself is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(RwLock::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one task.
    ///
    /// The blocking write runs on a dedicated thread that owns the write guard,
    /// so dropping the returned future (client gone, request timeout) does not
    /// abort a write that has already started.
    pub async fn append(&self, task: &Task) -> Result<(), TasksError> {
        let frame = framing::encode_frame(task)?;
        let guard = self.lock.clone().write_owned().await;
        let path = self.path.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            append_frame(&path, frame.as_bytes())
        })
        .await;

        match outcome {
            Ok(Ok(())) => {
                debug!(path = %self.path.display(), "Task appended");
                Ok(())
            }
            Ok(Err(source)) => {
                error!(error = %source, path = %self.path.display(), "Failed to append task");
                Err(TasksError::StoreWrite {
                    path: self.path.clone(),
                    source,
                })
            }
            Err(join_error) => {
                error!(error = %join_error, path = %self.path.display(), "Append task aborted");
                Err(TasksError::StoreWrite {
                    path: self.path.clone(),
                    source: io::Error::new(io::ErrorKind::Other, join_error.to_string()),
                })
            }
        }
    }

    /// Read every task in append order.
    ///
    /// A log that does not exist yet reads as empty.
    pub async fn read_all(&self) -> Result<Vec<Task>, TasksError> {
        let guard = self.lock.clone().read_owned().await;
        let path = self.path.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            read_log(&path)
        })
        .await;

        let bytes = match outcome {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => {
                info!(path = %self.path.display(), "Task log not created yet, returning no tasks");
                return Ok(Vec::new());
            }
            Ok(Err(source)) => {
                error!(error = %source, path = %self.path.display(), "Failed to read task log");
                return Err(TasksError::StoreRead {
                    path: self.path.clone(),
                    source,
                });
            }
            Err(join_error) => {
                return Err(TasksError::StoreRead {
                    path: self.path.clone(),
                    source: io::Error::new(io::ErrorKind::Other, join_error.to_string()),
                });
            }
        };

        framing::decode_bytes(bytes).map_err(|e| {
            error!(error = %e, path = %self.path.display(), "Task log is corrupt");
            e
        })
    }
}

/// Single append-mode write of a whole frame, flushed to disk
fn append_frame(path: &Path, frame: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(frame)?;
    file.sync_data()
}

fn read_log(path: &Path) -> io::Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl TaskStore for TaskLog {
    async fn append(&self, task: &Task) -> Result<(), TasksError> {
        TaskLog::append(self, task).await
    }

    async fn read_all(&self) -> Result<Vec<Task>, TasksError> {
        TaskLog::read_all(self).await
    }
}
