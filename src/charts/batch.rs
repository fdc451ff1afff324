use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::error::AppResult;
use crate::figure::{Figure, write_sidecar};

use super::render::{RenderOptions, render_figure};

/// Independent figure renders running on the blocking pool.
///
/// At most `jobs` renders run at once. Renders share nothing, so they finish
/// in any order; `finish` waits for all of them.
#[derive(Debug)]
pub struct RenderQueue {
    options: RenderOptions,
    write_json: bool,
    permits: Arc<Semaphore>,
    pending: Vec<(String, JoinHandle<AppResult<PathBuf>>)>,
}

impl RenderQueue {
    #[must_use]
    pub fn new(options: RenderOptions, jobs: usize, write_json: bool) -> Self {
        Self {
            options,
            write_json,
            permits: Arc::new(Semaphore::new(jobs.max(1))),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queues a render. When the queue writes JSON, the description lands
    /// beside the image before drawing starts.
    pub fn submit(&mut self, figure: Figure) {
        let name = figure.file_name.clone();
        let permits = Arc::clone(&self.permits);
        let options = self.options;
        let write_json = self.write_json;
        debug!("Queued render of {}", name);

        let handle = tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            if write_json {
                write_sidecar(&figure).await?;
            }
            tokio::task::spawn_blocking(move || render_figure(&figure, &options)).await?
        });
        self.pending.push((name, handle));
    }

    /// Joins every queued render.
    ///
    /// # Errors
    ///
    /// Each failure is logged; the first one is returned once all renders
    /// have ended.
    pub async fn finish(self) -> AppResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.pending.len());
        let mut first_error = None;
        for (name, handle) in self.pending {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) => Err(err.into()),
            };
            match outcome {
                Ok(path) => written.push(path),
                Err(err) => {
                    error!("Failed to render '{}': {}", name, err);
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(written),
        }
    }
}
