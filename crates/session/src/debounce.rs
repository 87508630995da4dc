//! Coalescing of rapid input.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tracing::trace;

/// Forward values from `input` to `output` once `quiet` has passed with no
/// newer value.
///
/// Only the latest value of each burst is forwarded. When `input` closes, a
/// value still waiting is forwarded immediately and the task ends. It also
/// ends when `output` is dropped.
pub async fn debounce<T>(mut input: mpsc::Receiver<T>, output: mpsc::Sender<T>, quiet: Duration) {
    while let Some(first) = input.recv().await {
        let mut latest = first;
        let mut superseded = 0usize;

        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => {
                        latest = value;
                        superseded += 1;
                    }
                    None => {
                        let _ = output.send(latest).await;
                        return;
                    }
                },
                _ = time::sleep(quiet) => break,
            }
        }

        trace!("Debounced burst, {superseded} values superseded");
        if output.send(latest).await.is_err() {
            return;
        }
    }
}
