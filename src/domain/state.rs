// Domain-level match state: records, patches, proxies, and change feed types.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Linear step toward `target` by fraction `t` (expected 0.0..=1.0).
    pub fn lerp(self, target: Vec3, t: f32) -> Vec3 {
        Vec3 {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }

    pub fn distance(self, other: Vec3) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// One participant's document in the match's player collection. The store owns
/// the authoritative copy; values are not clamped or validated on receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    pub position: Vec3,
    pub rotation_yaw: f32,
    pub hp: i32,
    pub kills: i32,
    pub username: String,
    // Store-assigned, milliseconds since epoch. Zero until first stamped.
    pub last_seen_ms: u64,
}

/// Partial-field update against one record. Deltas are applied store-side so
/// concurrent writers accumulate instead of overwriting each other.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordPatch {
    pub position: Option<Vec3>,
    pub rotation_yaw: Option<f32>,
    pub hp: Option<i32>,
    pub hp_delta: Option<i32>,
    pub kills_delta: Option<i32>,
    pub touch_last_seen: bool,
}

impl RecordPatch {
    /// Transform update sent by the outbound publisher; refreshes `lastSeen`.
    pub fn movement(position: Vec3, rotation_yaw: f32) -> Self {
        Self {
            position: Some(position),
            rotation_yaw: Some(rotation_yaw),
            touch_last_seen: true,
            ..Default::default()
        }
    }
}

/// Opaque handle to a renderable avatar owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AvatarId(pub u64);

/// Local stand-in for a remote participant: the scene handle, the latest
/// authoritative transform, and a cached copy of the last-seen record used for
/// combat decisions.
#[derive(Debug, Clone)]
pub struct RemoteProxy {
    pub avatar: AvatarId,
    pub rendered_position: Vec3,
    pub target_position: Vec3,
    pub target_yaw: f32,
    pub last_record: PlayerRecord,
}

/// Mirror of the local player's record for HUD display; not authoritative.
#[derive(Debug, Clone)]
pub struct SelfState {
    pub hp: i32,
    pub kills: i32,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub kills: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One diff event from the collection subscription. Removed events carry the
/// last known record; only the id is needed to react.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub player_id: String,
    pub record: PlayerRecord,
}

#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub player_id: String,
    pub record: PlayerRecord,
}

/// Atomic delivery unit from the subscription: the ordered diff events plus
/// the full collection snapshot they produced.
#[derive(Debug, Clone)]
pub struct ChangeBatch {
    pub changes: Vec<ChangeEvent>,
    pub snapshot: Vec<SnapshotEntry>,
}
