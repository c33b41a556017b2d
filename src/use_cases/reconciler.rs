// Applies subscription change batches to the local proxy set, self state, and
// HUD outputs.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::domain::ports::{GameOutput, Scene};
use crate::domain::state::{ChangeBatch, ChangeKind, PlayerRecord, RemoteProxy, SelfState};
use crate::use_cases::leaderboard;

/// Keeps the RemoteProxy set consistent with the latest collection snapshot
/// and mirrors the local player's record for the HUD.
pub struct SnapshotReconciler {
    self_id: String,
    win_kills: i32,
    self_state: SelfState,
    proxies: HashMap<String, RemoteProxy>,
    match_won: bool,
}

impl SnapshotReconciler {
    pub fn new(self_id: String, username: String, win_kills: i32) -> Self {
        Self {
            self_id,
            win_kills,
            self_state: SelfState {
                hp: 0,
                kills: 0,
                username,
            },
            proxies: HashMap::new(),
            match_won: false,
        }
    }

    pub fn proxy(&self, player_id: &str) -> Option<&RemoteProxy> {
        self.proxies.get(player_id)
    }

    pub fn proxies_mut(&mut self) -> &mut HashMap<String, RemoteProxy> {
        &mut self.proxies
    }

    pub fn self_state(&self) -> &SelfState {
        &self.self_state
    }

    /// Processes one batch in delivery order, reconciles the proxy set against
    /// the full snapshot, then recomputes the leaderboard. Events whose player
    /// is absent from the snapshot are no-ops.
    pub fn apply(&mut self, batch: &ChangeBatch, scene: &mut dyn Scene, out: &mut dyn GameOutput) {
        for change in &batch.changes {
            match change.kind {
                ChangeKind::Added => {
                    if change.player_id == self.self_id {
                        self.refresh_self(&change.record, out);
                        continue;
                    }
                    self.spawn_proxy(&change.player_id, &change.record, scene);
                }
                ChangeKind::Modified => {
                    if change.player_id == self.self_id {
                        self.refresh_self(&change.record, out);
                        continue;
                    }
                    if let Some(proxy) = self.proxies.get_mut(&change.player_id) {
                        proxy.target_position = change.record.position;
                        proxy.target_yaw = change.record.rotation_yaw;
                        proxy.last_record = change.record.clone();
                    }
                }
                ChangeKind::Removed => {
                    if let Some(proxy) = self.proxies.remove(&change.player_id) {
                        scene.remove_avatar(proxy.avatar);
                        debug!(player_id = %change.player_id, "remote player left");
                    }
                }
            }
        }

        // The feed can drop batches under backpressure, so the diff alone is
        // not authoritative. Heal against the snapshot: spawn anything a lost
        // added event missed, refresh targets, and release proxies for
        // players no longer present.
        for entry in &batch.snapshot {
            if entry.player_id == self.self_id {
                if entry.record.hp != self.self_state.hp
                    || entry.record.kills != self.self_state.kills
                {
                    self.refresh_self(&entry.record, out);
                }
                continue;
            }
            if let Some(proxy) = self.proxies.get_mut(&entry.player_id) {
                proxy.target_position = entry.record.position;
                proxy.target_yaw = entry.record.rotation_yaw;
                proxy.last_record = entry.record.clone();
                continue;
            }
            self.spawn_proxy(&entry.player_id, &entry.record, scene);
        }
        let present: HashSet<&str> = batch.snapshot.iter().map(|e| e.player_id.as_str()).collect();
        let stale: Vec<String> = self
            .proxies
            .keys()
            .filter(|id| !present.contains(id.as_str()))
            .cloned()
            .collect();
        for player_id in stale {
            if let Some(proxy) = self.proxies.remove(&player_id) {
                scene.remove_avatar(proxy.avatar);
                debug!(%player_id, "remote player left");
            }
        }

        out.leaderboard(&leaderboard::project(&batch.snapshot));
    }

    // Spawns directly at the reported position; interpolation only starts
    // smoothing on the next update.
    fn spawn_proxy(&mut self, player_id: &str, record: &PlayerRecord, scene: &mut dyn Scene) {
        let avatar = scene.spawn_avatar(player_id, record.position);
        debug!(%player_id, "remote player joined");
        self.proxies.insert(
            player_id.to_string(),
            RemoteProxy {
                avatar,
                rendered_position: record.position,
                target_position: record.position,
                target_yaw: record.rotation_yaw,
                last_record: record.clone(),
            },
        );
    }

    /// Releases every proxy and its scene handle on session teardown.
    pub fn clear(&mut self, scene: &mut dyn Scene) {
        for (_, proxy) in self.proxies.drain() {
            scene.remove_avatar(proxy.avatar);
        }
    }

    fn refresh_self(&mut self, record: &PlayerRecord, out: &mut dyn GameOutput) {
        self.self_state.hp = record.hp;
        self.self_state.kills = record.kills;
        out.self_stats(record.hp, record.kills);

        // Latched so the win signal fires once per session, not on every
        // update while the threshold holds.
        if !self.match_won && record.kills >= self.win_kills {
            self.match_won = true;
            info!(winner = %record.username, kills = record.kills, "win threshold reached");
            out.match_won(&record.username);
        }
    }
}
