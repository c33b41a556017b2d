use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::errors::StoreError;
use crate::domain::state::{AvatarId, ChangeBatch, LeaderboardEntry, PlayerRecord, RecordPatch, Vec3};

/// Live subscription to the match's player collection. The first batch holds
/// the full snapshot as added events; later batches carry incremental diffs.
/// Dropping the subscription ends delivery.
pub struct Subscription {
    pub changes: mpsc::Receiver<ChangeBatch>,
}

// Port for the remote document store holding one record per participant.
// Injected at construction; the core never resolves a backend at runtime.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    async fn create(&self, player_id: &str, record: PlayerRecord) -> Result<(), StoreError>;
    async fn update(&self, player_id: &str, patch: RecordPatch) -> Result<(), StoreError>;
    async fn delete(&self, player_id: &str) -> Result<(), StoreError>;
    async fn subscribe(&self) -> Result<Subscription, StoreError>;
}

// Port for the renderable scene owning remote avatars.
pub trait Scene: Send {
    fn spawn_avatar(&mut self, player_id: &str, position: Vec3) -> AvatarId;
    fn update_avatar(&mut self, avatar: AvatarId, position: Vec3, yaw: f32);
    fn remove_avatar(&mut self, avatar: AvatarId);
}

// Output port for HUD and match-flow signals; the UI layer subscribes instead
// of the core writing into any particular presentation technology.
pub trait GameOutput: Send {
    fn self_stats(&mut self, hp: i32, kills: i32);
    fn leaderboard(&mut self, entries: &[LeaderboardEntry]);
    fn kill_feed_shown(&mut self, victim: &str);
    fn kill_feed_cleared(&mut self);
    fn match_won(&mut self, winner: &str);
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}
