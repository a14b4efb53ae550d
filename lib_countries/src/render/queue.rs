//! # Bounded Render Queue
//!
//! A thin wrapper over `tokio::sync::mpsc` with a fixed capacity. Pushes are
//! strict FIFO with no eviction and no priority.

use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::QueueClosed;
use crate::models::RenderSnapshot;

/// Default number of snapshots that may wait for the worker.
pub const RENDER_QUEUE_CAPACITY: usize = 50;

/// Creates a queue holding at most `capacity` pending snapshots (minimum 1).
pub fn render_queue(capacity: usize) -> (RenderSender, RenderReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (RenderSender { tx }, RenderReceiver { rx })
}

/// Producer handle, cloned into every sync engine that needs it.
#[derive(Debug, Clone)]
pub struct RenderSender {
    tx: mpsc::Sender<RenderSnapshot>,
}

impl RenderSender {
    /// Enqueues a snapshot, waiting for a free slot while the queue is full.
    ///
    /// # Errors
    /// `QueueClosed` once the receiver has been dropped.
    pub async fn push(&self, snapshot: RenderSnapshot) -> Result<(), QueueClosed> {
        match self.tx.try_reserve() {
            Ok(permit) => {
                permit.send(snapshot);
                return Ok(());
            }
            Err(TrySendError::Closed(())) => return Err(QueueClosed),
            Err(TrySendError::Full(())) => {
                tracing::warn!(
                    capacity = self.capacity(),
                    "render queue full; waiting for the worker to free a slot"
                );
            }
        }
        self.tx.send(snapshot).await.map_err(|_| QueueClosed)
    }

    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Snapshots currently waiting for the worker.
    pub fn pending(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }
}

/// Consumer handle. There is exactly one, owned by the render worker.
#[derive(Debug)]
pub struct RenderReceiver {
    rx: mpsc::Receiver<RenderSnapshot>,
}

impl RenderReceiver {
    /// Waits for the next snapshot. `None` once every sender is gone and the
    /// queue is drained.
    pub async fn next(&mut self) -> Option<RenderSnapshot> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;
    use tokio::time::timeout;

    fn snapshot(minute: u32) -> RenderSnapshot {
        RenderSnapshot::new(
            Vec::new(),
            Utc.with_ymd_and_hms(2025, 10, 25, 12, minute, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn push_blocks_when_full_until_a_slot_frees() {
        let (tx, mut rx) = render_queue(2);
        tx.push(snapshot(0)).await.unwrap();
        tx.push(snapshot(1)).await.unwrap();
        assert_eq!(tx.pending(), 2);

        let blocked = timeout(Duration::from_millis(100), tx.push(snapshot(2))).await;
        assert!(blocked.is_err(), "third push should wait on a full queue");

        let producer = tokio::spawn({
            let tx = tx.clone();
            async move { tx.push(snapshot(3)).await }
        });
        tokio::task::yield_now().await;
        assert!(!producer.is_finished());

        assert_eq!(rx.next().await.unwrap().refreshed_at(), snapshot(0).refreshed_at());
        timeout(Duration::from_secs(1), producer)
            .await
            .expect("push should complete once a slot frees")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn delivers_in_fifo_order() {
        let (tx, mut rx) = render_queue(RENDER_QUEUE_CAPACITY);
        for minute in 0..5 {
            tx.push(snapshot(minute)).await.unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(s) = rx.next().await {
            seen.push(s.refreshed_at());
        }
        let expected: Vec<_> = (0..5).map(|m| snapshot(m).refreshed_at()).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn push_fails_once_receiver_is_gone() {
        let (tx, rx) = render_queue(1);
        drop(rx);
        assert!(tx.push(snapshot(0)).await.is_err());
    }

    #[test]
    fn capacity_is_at_least_one() {
        let (tx, _rx) = render_queue(0);
        assert_eq!(tx.capacity(), 1);
    }
}
