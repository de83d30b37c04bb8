//! Banner hide timer: a single cancellable tokio task.
//!
//! Scheduling a new hide cancels the pending one, so at most one timer is
//! alive and it always belongs to the most recent alert.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::action::Action;

pub struct BannerTimer {
    action_tx: mpsc::UnboundedSender<Action>,
    pending: Option<CancellationToken>,
}

impl BannerTimer {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        Self {
            action_tx,
            pending: None,
        }
    }

    /// Send `Action::BannerExpired(generation)` after `after`, replacing
    /// any previously scheduled hide.
    pub fn schedule(&mut self, generation: u64, after: Duration) {
        self.cancel();

        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_token.cancelled() => trace!(generation, "banner timer cancelled"),
                () = tokio::time::sleep(after) => {
                    let _ = tx.send(Action::BannerExpired(generation));
                }
            }
        });

        self.pending = Some(token);
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}

impl Drop for BannerTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
