//! # Summary Rendering
//!
//! Turns the result of a refresh into a PNG summary without holding up the
//! caller that triggered the refresh.
//!
//! ## Core Components:
//!
//! - **`queue`**: a fixed-capacity FIFO between the sync engine (producer) and
//!   the render worker (single consumer). A push waits while the queue is
//!   full, so a slow renderer throttles refreshes instead of growing memory.
//! - **`worker`**: the long-lived consumer. It renders one snapshot at a time,
//!   logs and skips any failure, and stops on the shutdown signal.
//! - **`summary`**: the pure top-five report and the `image`-based PNG renderer.
//!
//! The queue is an explicit object created by the composition root. The
//! sender goes to the sync engine, the receiver to the worker.

/// Bounded render queue.
pub mod queue;
/// Report building and PNG output.
pub mod summary;
/// Background render loop.
pub mod worker;

pub use queue::{render_queue, RenderReceiver, RenderSender, RENDER_QUEUE_CAPACITY};
pub use summary::{load_artifact, PngSummaryRenderer, SummaryReport, SummaryRenderer};
pub use worker::RenderWorker;
