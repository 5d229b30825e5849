use crate::controller::SessionController;
use std::sync::Arc;
use tracing::trace;

/// Interaction signal kinds the embedding layer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivitySignal {
    PointerMove,
    KeyPress,
    Click,
}

/// Turns interaction signals into last-activity updates.
///
/// Signals are fire-and-forget: each one overwrites `last_activity_at` with
/// "now", an idempotent write that is safe under any interleaving because
/// every concurrent writer agrees on the value. Signals arriving while no
/// session is live are dropped.
#[derive(Clone)]
pub struct ActivityTracker {
    controller: Arc<SessionController>,
}

impl ActivityTracker {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self { controller }
    }

    pub async fn observe(&self, signal: ActivitySignal) {
        trace!(signal = ?signal, "interaction observed");
        self.controller.record_activity().await;
    }
}
