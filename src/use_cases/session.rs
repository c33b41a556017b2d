// Session lifecycle: joining the shared match, running the sync task, and the
// guaranteed record delete on leave.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::errors::StoreError;
use crate::domain::ports::{Clock, GameOutput, PlayerStore, Scene};
use crate::domain::state::{PlayerRecord, Vec3};
use crate::use_cases::combat::{CombatResolver, CombatSettings};
use crate::use_cases::interpolation;
use crate::use_cases::publisher::OutboundPublisher;
use crate::use_cases::reconciler::SnapshotReconciler;
use crate::use_cases::types::SessionEvent;

/// Tuning for a joined session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub publish_min_interval_ms: u64,
    pub smoothing_rate: f32,
    pub shot_damage: i32,
    pub lethal_hp_threshold: i32,
    pub max_hp: i32,
    pub win_kills: i32,
    pub respawn_position: Vec3,
    pub kill_feed_ttl_ms: u64,
    pub event_channel_capacity: usize,
}

/// Handle for a joined session. `stop` is the only clean leave path; the
/// process being killed before it runs leaks the record (accepted).
pub struct SessionHandle {
    input_tx: mpsc::Sender<SessionEvent>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Per-frame entry point from the render loop.
    pub async fn frame(&self, dt: f32, position: Vec3, yaw: f32) {
        let _ = self
            .input_tx
            .send(SessionEvent::Frame { dt, position, yaw })
            .await;
    }

    /// Reports a local hit-test result against a remote participant.
    pub async fn hit(&self, target_id: impl Into<String>) {
        let _ = self
            .input_tx
            .send(SessionEvent::Hit {
                target_id: target_id.into(),
            })
            .await;
    }

    /// Leaves the match: the sync task drops the subscription, releases all
    /// proxies, and deletes the local record before this returns.
    pub async fn stop(self) {
        let _ = self.input_tx.send(SessionEvent::Stop).await;
        if let Err(e) = self.task.await {
            warn!(error = %e, "session task join failed");
        }
    }
}

/// Joins the shared match: creates the local record (full hp, zero kills),
/// opens the collection subscription, and spawns the sync task. Exactly one
/// create and one subscription per session; re-joining without stopping is
/// not supported.
#[allow(clippy::too_many_arguments)]
pub async fn start_session(
    store: Arc<dyn PlayerStore>,
    clock: Arc<dyn Clock>,
    mut scene: Box<dyn Scene>,
    mut output: Box<dyn GameOutput>,
    settings: SessionSettings,
    self_id: String,
    username: String,
    initial_position: Vec3,
) -> Result<SessionHandle, StoreError> {
    let record = PlayerRecord {
        position: initial_position,
        rotation_yaw: 0.0,
        hp: settings.max_hp,
        kills: 0,
        username: username.clone(),
        last_seen_ms: 0,
    };
    store.create(&self_id, record).await?;
    let mut subscription = store.subscribe().await?;

    let (input_tx, mut input_rx) = mpsc::channel(settings.event_channel_capacity);

    let mut publisher = OutboundPublisher::new(
        store.clone(),
        clock.clone(),
        self_id.clone(),
        settings.publish_min_interval_ms,
    );
    let mut reconciler = SnapshotReconciler::new(self_id.clone(), username, settings.win_kills);
    let mut combat = CombatResolver::new(
        store.clone(),
        clock,
        self_id.clone(),
        CombatSettings {
            shot_damage: settings.shot_damage,
            lethal_hp_threshold: settings.lethal_hp_threshold,
            max_hp: settings.max_hp,
            respawn_position: settings.respawn_position,
            kill_feed_ttl_ms: settings.kill_feed_ttl_ms,
        },
    );

    info!(player_id = %self_id, "joined match");

    // All mutable sync state lives in this one task; the render loop and the
    // store's push feed interleave through its channels.
    let task = tokio::spawn(async move {
        let mut feed_open = true;
        loop {
            tokio::select! {
                event = input_rx.recv() => match event {
                    Some(SessionEvent::Frame { dt, position, yaw }) => {
                        publisher.publish(position, yaw).await;
                        interpolation::tick(
                            reconciler.proxies_mut(),
                            dt,
                            settings.smoothing_rate,
                            scene.as_mut(),
                        );
                        combat.tick_feed(output.as_mut());
                    }
                    Some(SessionEvent::Hit { target_id }) => {
                        // The proxy may already be gone; unknown targets are no-ops.
                        let cached = reconciler.proxy(&target_id).map(|p| p.last_record.clone());
                        match cached {
                            Some(record) => {
                                combat.resolve_hit(&target_id, &record, output.as_mut()).await
                            }
                            None => debug!(%target_id, "hit on unknown target ignored"),
                        }
                    }
                    Some(SessionEvent::Stop) | None => break,
                },
                batch = subscription.changes.recv(), if feed_open => match batch {
                    Some(batch) => reconciler.apply(&batch, scene.as_mut(), output.as_mut()),
                    None => {
                        debug!("change feed closed");
                        feed_open = false;
                    }
                },
            }
        }

        // Teardown: stop the change feed, release proxies, delete the record.
        drop(subscription);
        reconciler.clear(scene.as_mut());
        if let Err(e) = store.delete(&self_id).await {
            warn!(player_id = %self_id, error = %e, "record delete on leave failed");
        }
        info!(player_id = %self_id, "left match");
    });

    Ok(SessionHandle { input_tx, task })
}
