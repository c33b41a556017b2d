// Optimistic combat resolution: damage, death, respawn, and scoring as
// independent last-write-wins store patches.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{Clock, GameOutput, PlayerStore};
use crate::domain::state::{PlayerRecord, RecordPatch, Vec3};

/// Tuning for hit resolution.
#[derive(Debug, Clone, Copy)]
pub struct CombatSettings {
    pub shot_damage: i32,
    pub lethal_hp_threshold: i32,
    pub max_hp: i32,
    pub respawn_position: Vec3,
    pub kill_feed_ttl_ms: u64,
}

/// Converts local hit-test results into remote state mutations.
///
/// There is no transaction: two attackers can both observe a cached hp above
/// the lethal threshold and both decrement without seeing each other's write,
/// under-registering damage or double-scoring. Accepted trade-off of the
/// serverless design.
pub struct CombatResolver {
    store: Arc<dyn PlayerStore>,
    clock: Arc<dyn Clock>,
    self_id: String,
    settings: CombatSettings,
    feed_expires_ms: Option<u64>,
}

impl CombatResolver {
    pub fn new(
        store: Arc<dyn PlayerStore>,
        clock: Arc<dyn Clock>,
        self_id: String,
        settings: CombatSettings,
    ) -> Self {
        Self {
            store,
            clock,
            self_id,
            settings,
            feed_expires_ms: None,
        }
    }

    /// Applies the fixed per-shot damage to the target and, when the *cached*
    /// record already sat at or below the lethal threshold, resets the victim
    /// to full hp at the spawn point and scores the kill locally. Lethality is
    /// judged on the last received snapshot, not the decrement just issued.
    /// All write failures are logged and dropped.
    pub async fn resolve_hit(
        &mut self,
        target_id: &str,
        cached: &PlayerRecord,
        out: &mut dyn GameOutput,
    ) {
        let damage = RecordPatch {
            hp_delta: Some(-self.settings.shot_damage),
            ..Default::default()
        };
        if let Err(e) = self.store.update(target_id, damage).await {
            warn!(target_id, error = %e, "damage write failed");
        }

        if cached.hp > self.settings.lethal_hp_threshold {
            return;
        }

        info!(target_id, victim = %cached.username, "lethal hit");
        let respawn = RecordPatch {
            hp: Some(self.settings.max_hp),
            position: Some(self.settings.respawn_position),
            ..Default::default()
        };
        if let Err(e) = self.store.update(target_id, respawn).await {
            warn!(target_id, error = %e, "respawn write failed");
        }
        let score = RecordPatch {
            kills_delta: Some(1),
            ..Default::default()
        };
        if let Err(e) = self.store.update(&self.self_id, score).await {
            warn!(error = %e, "kill score write failed");
        }

        self.feed_expires_ms = Some(self.clock.now_millis() + self.settings.kill_feed_ttl_ms);
        out.kill_feed_shown(&cached.username);
    }

    /// Frame-driven expiry for the transient kill-feed message.
    pub fn tick_feed(&mut self, out: &mut dyn GameOutput) {
        if let Some(expires) = self.feed_expires_ms
            && self.clock.now_millis() >= expires
        {
            self.feed_expires_ms = None;
            out.kill_feed_cleared();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    use crate::domain::errors::StoreError;
    use crate::domain::ports::Subscription;
    use crate::domain::state::LeaderboardEntry;

    struct ManualClock {
        now_ms: AtomicU64,
    }

    impl Clock for ManualClock {
        fn now_millis(&self) -> u64 {
            self.now_ms.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct RecordingStore {
        updates: Mutex<Vec<(String, RecordPatch)>>,
        should_fail_update: bool,
    }

    #[async_trait]
    impl PlayerStore for RecordingStore {
        async fn create(&self, _player_id: &str, _record: PlayerRecord) -> Result<(), StoreError> {
            Ok(())
        }

        async fn update(&self, player_id: &str, patch: RecordPatch) -> Result<(), StoreError> {
            if self.should_fail_update {
                return Err(StoreError::Unavailable("write rejected".to_string()));
            }
            let mut guard = self.updates.lock().expect("updates mutex poisoned");
            guard.push((player_id.to_string(), patch));
            Ok(())
        }

        async fn delete(&self, _player_id: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn subscribe(&self) -> Result<Subscription, StoreError> {
            let (_tx, rx) = mpsc::channel(1);
            Ok(Subscription { changes: rx })
        }
    }

    #[derive(Default)]
    struct RecordingOutput {
        feed: Vec<String>,
        cleared: usize,
    }

    impl GameOutput for RecordingOutput {
        fn self_stats(&mut self, _hp: i32, _kills: i32) {}

        fn leaderboard(&mut self, _entries: &[LeaderboardEntry]) {}

        fn kill_feed_shown(&mut self, victim: &str) {
            self.feed.push(victim.to_string());
        }

        fn kill_feed_cleared(&mut self) {
            self.cleared += 1;
        }

        fn match_won(&mut self, _winner: &str) {}
    }

    fn settings() -> CombatSettings {
        CombatSettings {
            shot_damage: 10,
            lethal_hp_threshold: 10,
            max_hp: 100,
            respawn_position: Vec3::new(0.0, 10.0, 0.0),
            kill_feed_ttl_ms: 2_000,
        }
    }

    fn victim(hp: i32) -> PlayerRecord {
        PlayerRecord {
            position: Vec3::new(5.0, 0.0, 0.0),
            rotation_yaw: 0.0,
            hp,
            kills: 0,
            username: "Bruno".to_string(),
            last_seen_ms: 0,
        }
    }

    fn resolver(store: &Arc<RecordingStore>, clock: &Arc<ManualClock>) -> CombatResolver {
        CombatResolver::new(store.clone(), clock.clone(), "me".to_string(), settings())
    }

    #[tokio::test]
    async fn when_the_cached_hp_is_above_the_threshold_then_only_damage_is_written() {
        let store = Arc::new(RecordingStore::default());
        let clock = Arc::new(ManualClock {
            now_ms: AtomicU64::new(0),
        });
        let mut resolver = resolver(&store, &clock);
        let mut out = RecordingOutput::default();

        resolver.resolve_hit("rival", &victim(100), &mut out).await;

        let updates = store.updates.lock().expect("updates mutex poisoned");
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].0, "rival");
        assert_eq!(updates[0].1.hp_delta, Some(-10));
        assert!(out.feed.is_empty());
    }

    #[tokio::test]
    async fn when_the_cached_hp_is_just_above_the_threshold_then_the_shot_is_not_lethal() {
        let store = Arc::new(RecordingStore::default());
        let clock = Arc::new(ManualClock {
            now_ms: AtomicU64::new(0),
        });
        let mut resolver = resolver(&store, &clock);
        let mut out = RecordingOutput::default();

        resolver.resolve_hit("rival", &victim(11), &mut out).await;

        let updates = store.updates.lock().expect("updates mutex poisoned");
        assert_eq!(updates.len(), 1);
    }

    #[tokio::test]
    async fn when_the_cached_hp_is_at_the_threshold_then_the_victim_respawns_and_the_attacker_scores()
    {
        let store = Arc::new(RecordingStore::default());
        let clock = Arc::new(ManualClock {
            now_ms: AtomicU64::new(1_000),
        });
        let mut resolver = resolver(&store, &clock);
        let mut out = RecordingOutput::default();

        resolver.resolve_hit("rival", &victim(10), &mut out).await;

        let updates = store.updates.lock().expect("updates mutex poisoned");
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].1.hp_delta, Some(-10));
        assert_eq!(updates[1].0, "rival");
        assert_eq!(updates[1].1.hp, Some(100));
        assert_eq!(updates[1].1.position, Some(Vec3::new(0.0, 10.0, 0.0)));
        assert_eq!(updates[2].0, "me");
        assert_eq!(updates[2].1.kills_delta, Some(1));
        assert_eq!(out.feed, vec!["Bruno".to_string()]);
    }

    #[tokio::test]
    async fn when_two_seconds_pass_then_the_kill_feed_clears_exactly_once() {
        let store = Arc::new(RecordingStore::default());
        let clock = Arc::new(ManualClock {
            now_ms: AtomicU64::new(1_000),
        });
        let mut resolver = resolver(&store, &clock);
        let mut out = RecordingOutput::default();
        resolver.resolve_hit("rival", &victim(5), &mut out).await;

        clock.now_ms.store(2_999, Ordering::SeqCst);
        resolver.tick_feed(&mut out);
        assert_eq!(out.cleared, 0);

        clock.now_ms.store(3_000, Ordering::SeqCst);
        resolver.tick_feed(&mut out);
        resolver.tick_feed(&mut out);
        assert_eq!(out.cleared, 1);
    }

    #[tokio::test]
    async fn when_writes_fail_then_resolution_degrades_without_panicking() {
        let store = Arc::new(RecordingStore {
            updates: Mutex::new(Vec::new()),
            should_fail_update: true,
        });
        let clock = Arc::new(ManualClock {
            now_ms: AtomicU64::new(0),
        });
        let mut resolver = resolver(&store, &clock);
        let mut out = RecordingOutput::default();

        resolver.resolve_hit("rival", &victim(10), &mut out).await;

        // The optimistic kill feed still shows; state lags until the next
        // snapshot corrects it.
        assert_eq!(out.feed, vec!["Bruno".to_string()]);
    }
}
