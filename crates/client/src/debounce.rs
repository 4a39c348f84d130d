//! Resize debouncing.
//!
//! Heights stream in while a panel is being dragged. Each one restarts a
//! quiet timer; once the timer fires, the latest height is mapped to a
//! word target and emitted exactly once.

use std::time::Duration;

use lengthwise_core::text::words_for_height;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::debug;

pub const DEFAULT_QUIET: Duration = Duration::from_millis(300);

/// Handle for feeding heights into the debouncer task.
///
/// Dropping the handle flushes any pending height and ends the task.
pub struct ResizeDebouncer {
    heights: mpsc::UnboundedSender<u32>,
}

impl ResizeDebouncer {
    /// Spawn the debouncer. Settled word targets arrive on the receiver.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<u32>) {
        let (height_tx, height_rx) = mpsc::unbounded_channel();
        let (target_tx, target_rx) = mpsc::unbounded_channel();
        tokio::spawn(run(height_rx, target_tx, quiet));
        (Self { heights: height_tx }, target_rx)
    }

    /// Record a new panel height. Returns `false` once the task has stopped.
    pub fn push(&self, height_px: u32) -> bool {
        self.heights.send(height_px).is_ok()
    }
}

async fn run(
    mut heights: mpsc::UnboundedReceiver<u32>,
    targets: mpsc::UnboundedSender<u32>,
    quiet: Duration,
) {
    let mut pending: Option<u32> = None;
    let timer = sleep(quiet);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            height = heights.recv() => match height {
                Some(height) => {
                    pending = Some(height);
                    timer.as_mut().reset(Instant::now() + quiet);
                }
                None => {
                    if let Some(height) = pending.take() {
                        let _ = targets.send(words_for_height(height));
                    }
                    break;
                }
            },
            () = &mut timer, if pending.is_some() => {
                if let Some(height) = pending.take() {
                    let target = words_for_height(height);
                    debug!(height, target, "Resize settled");
                    if targets.send(target).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
