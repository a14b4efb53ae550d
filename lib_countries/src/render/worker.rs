//! # Render Worker
//!
//! The single consumer of the render queue. Started once by the composition
//! root and stopped through a `broadcast` shutdown channel.
//!
//! Each snapshot is rendered on the blocking pool, one at a time. The outcome
//! of every render is matched inside the loop: failures are logged and the
//! worker moves on to the next snapshot. Nothing a render does can end the loop.
//!
//! A renderer panic is caught by `spawn_blocking` and surfaces as a
//! `JoinError`. That only works with `panic = "unwind"`; building with
//! `panic = "abort"` turns a bad snapshot into a process abort.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::queue::RenderReceiver;
use super::summary::SummaryRenderer;
use crate::error::RenderError;
use crate::models::RenderSnapshot;

/// # Render Worker
///
/// Owns the receiving end of the render queue and the renderer.
pub struct RenderWorker {
    receiver: RenderReceiver,
    renderer: Arc<dyn SummaryRenderer>,
    shutdown: broadcast::Receiver<()>,
}

impl RenderWorker {
    pub fn new(
        receiver: RenderReceiver,
        renderer: Arc<dyn SummaryRenderer>,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            receiver,
            renderer,
            shutdown,
        }
    }

    /// Runs the worker on its own task.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Consumes snapshots until shutdown is signalled or every sender is gone.
    pub async fn run(mut self) {
        tracing::info!("render worker started");
        let mut rendered: u64 = 0;
        let mut failed: u64 = 0;

        loop {
            let snapshot = tokio::select! {
                biased;
                _ = self.shutdown.recv() => {
                    tracing::info!("render worker received shutdown signal");
                    break;
                }
                next = self.receiver.next() => match next {
                    Some(snapshot) => snapshot,
                    None => {
                        tracing::info!("render queue closed");
                        break;
                    }
                },
            };

            let refreshed_at = snapshot.refreshed_at();
            match self.render_one(snapshot).await {
                Ok(path) => {
                    rendered += 1;
                    tracing::info!(path = %path.display(), %refreshed_at, "summary image rendered");
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!(error = %e, %refreshed_at, "summary render failed; skipping snapshot");
                }
            }
        }

        tracing::info!(rendered, failed, "render worker stopped");
    }

    async fn render_one(&self, snapshot: RenderSnapshot) -> Result<std::path::PathBuf, RenderError> {
        let renderer = Arc::clone(&self.renderer);
        // Requires panic = "unwind" in every profile.
        tokio::task::spawn_blocking(move || renderer.render(&snapshot))
            .await
            .map_err(|e| RenderError::Panicked(e.to_string()))?
    }
}
