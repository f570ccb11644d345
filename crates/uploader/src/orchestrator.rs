//! Upload orchestrator: strict phase sequencing plus the bounded worker
//! pool that fans chunk transmissions out.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use filesharer_protocol::FinalizeUploadResponse;
use filesharer_transfer::{ProgressCounter, chunk_plan, file_digest};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info};

use crate::{UploadApi, UploadError};

/// Immutable description of the file being uploaded, read from filesystem
/// metadata once at the start of a run.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub path: PathBuf,
    pub size: u64,
    pub name: String,
}

impl FileDescriptor {
    /// Reads metadata for `path` and validates it names a regular file.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(UploadError::NotAFile(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| UploadError::NotAFile(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
            name,
        })
    }
}

/// Progress events emitted over the orchestrator's event channel.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Hashing,
    Hashed {
        digest: String,
    },
    SessionStarted {
        upload_id: String,
        chunk_size: u64,
        total_chunks: u32,
    },
    /// Emitted after each successful chunk. `completed` is monotonically
    /// increasing across the run, without gaps or repeats.
    ChunkCompleted {
        completed: u32,
        total: u32,
    },
    Finalizing,
    Completed {
        result: FinalizeUploadResponse,
    },
}

/// Coordinates one upload run: hash, initiate, transmit, finalize.
///
/// Phases never overlap. Any failure is terminal for the run; a chunk
/// failure stops scheduling of not-yet-started chunks (in-flight sibling
/// sends may finish) and finalize is never invoked.
pub struct UploadOrchestrator {
    api: Arc<dyn UploadApi>,
    concurrency: usize,
    expiry: String,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
}

impl UploadOrchestrator {
    /// Creates an orchestrator over the given API with a worker-pool bound
    /// of `concurrency` (values below 1 are treated as 1).
    pub fn new(api: Arc<dyn UploadApi>, concurrency: usize, expiry: impl Into<String>) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            api,
            concurrency: concurrency.max(1),
            expiry: expiry.into(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Runs the full upload and returns the server's artifact descriptor.
    pub async fn upload(&self, path: &Path) -> Result<FinalizeUploadResponse, UploadError> {
        let file = FileDescriptor::from_path(path)?;
        info!(file = %file.name, size = file.size, "starting upload");

        // Hash. Streams the whole file, so keep it off the async workers.
        self.emit(UploadEvent::Hashing).await;
        let digest = tokio::task::spawn_blocking({
            let path = file.path.clone();
            move || file_digest(&path)
        })
        .await
        .map_err(|e| UploadError::Join(e.to_string()))?
        .map_err(UploadError::Hash)?;
        self.emit(UploadEvent::Hashed {
            digest: digest.clone(),
        })
        .await;

        // Initiate.
        let session = self
            .api
            .initiate(&file.name, file.size, &digest, &self.expiry)
            .await
            .map_err(UploadError::Session)?;
        self.emit(UploadEvent::SessionStarted {
            upload_id: session.upload_id.clone(),
            chunk_size: session.chunk_size,
            total_chunks: session.total_chunks,
        })
        .await;

        // Transmit.
        self.transmit(&file, &session.upload_id, session.chunk_size, session.total_chunks)
            .await?;

        // Finalize.
        self.emit(UploadEvent::Finalizing).await;
        let result = self
            .api
            .finalize(&session.upload_id, session.total_chunks)
            .await
            .map_err(UploadError::Finalize)?;
        info!(file = %result.file_name, link = %result.link, "upload complete");
        self.emit(UploadEvent::Completed {
            result: result.clone(),
        })
        .await;
        Ok(result)
    }

    /// Dispatches the chunk plan across the worker pool.
    ///
    /// Workers pull chunk specs from a shared queue, so each chunk is
    /// attempted exactly once and at most `concurrency` transmissions are
    /// in flight at any instant.
    async fn transmit(
        &self,
        file: &FileDescriptor,
        upload_id: &str,
        chunk_size: u64,
        total: u32,
    ) -> Result<(), UploadError> {
        let plan = chunk_plan(file.size, chunk_size);
        if plan.is_empty() {
            return Ok(());
        }

        let workers = self.concurrency.min(plan.len());
        debug!(chunks = plan.len(), workers, "dispatching chunk plan");

        // Queue capacity covers the whole plan, so filling it never blocks.
        let (work_tx, work_rx) = mpsc::channel(plan.len());
        for spec in plan {
            let _ = work_tx.send(spec).await;
        }
        drop(work_tx);

        let work_rx = Arc::new(Mutex::new(work_rx));
        let counter = Arc::new(ProgressCounter::new());
        let abort = Arc::new(AtomicBool::new(false));

        let mut handles = Vec::with_capacity(workers);
        for _ in 0..workers {
            let api = Arc::clone(&self.api);
            let work_rx = Arc::clone(&work_rx);
            let counter = Arc::clone(&counter);
            let abort = Arc::clone(&abort);
            let events_tx = self.events_tx.clone();
            let path = file.path.clone();
            let upload_id = upload_id.to_string();

            handles.push(tokio::spawn(async move {
                loop {
                    // Stop pulling new work once any sibling has failed.
                    if abort.load(Ordering::SeqCst) {
                        return Ok(());
                    }
                    let next = { work_rx.lock().await.recv().await };
                    let Some(spec) = next else {
                        return Ok(());
                    };

                    match api.send_chunk(&path, &upload_id, spec).await {
                        Ok(()) => {
                            let completed = counter.record_chunk();
                            let _ = events_tx
                                .send(UploadEvent::ChunkCompleted { completed, total })
                                .await;
                        }
                        Err(e) => {
                            abort.store(true, Ordering::SeqCst);
                            return Err(UploadError::Chunk {
                                number: spec.number,
                                source: e,
                            });
                        }
                    }
                }
            }));
        }

        let mut first_err = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
                Err(e) => {
                    if first_err.is_none() {
                        first_err = Some(UploadError::Join(e.to_string()));
                    }
                }
            }
        }

        match first_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    async fn emit(&self, event: UploadEvent) {
        let _ = self.events_tx.send(event).await;
    }
}
