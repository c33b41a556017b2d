// Rate-limited publication of the local player's transform to the store.

use std::sync::Arc;

use tracing::warn;

use crate::domain::ports::{Clock, PlayerStore};
use crate::domain::state::{RecordPatch, Vec3};

/// Publishes the local transform at most once per throttle window. Calls
/// arriving inside the window are dropped, not queued or merged; only the most
/// recent state at the moment the gate opens is ever sent.
pub struct OutboundPublisher {
    store: Arc<dyn PlayerStore>,
    clock: Arc<dyn Clock>,
    self_id: String,
    min_interval_ms: u64,
    last_sent_ms: Option<u64>,
}

impl OutboundPublisher {
    pub fn new(
        store: Arc<dyn PlayerStore>,
        clock: Arc<dyn Clock>,
        self_id: String,
        min_interval_ms: u64,
    ) -> Self {
        Self {
            store,
            clock,
            self_id,
            min_interval_ms,
            last_sent_ms: None,
        }
    }

    /// Called once per render frame. A failed write is logged and dropped; the
    /// next periodic publish naturally supersedes it.
    pub async fn publish(&mut self, position: Vec3, yaw: f32) {
        let now = self.clock.now_millis();
        if let Some(last) = self.last_sent_ms
            && now.saturating_sub(last) < self.min_interval_ms
        {
            return;
        }
        self.last_sent_ms = Some(now);

        // Two-decimal precision bounds message size; finer motion is below
        // what remote interpolation can show anyway.
        let patch = RecordPatch::movement(round2_vec(position), round2(yaw));
        if let Err(e) = self.store.update(&self.self_id, patch).await {
            warn!(error = %e, "transform publish failed");
        }
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn round2_vec(v: Vec3) -> Vec3 {
    Vec3::new(round2(v.x), round2(v.y), round2(v.z))
}
