// Domain layer: match state, ports, and errors.

pub mod errors;
pub mod ports;
pub mod state;

pub use state::{
    AvatarId, ChangeBatch, ChangeEvent, ChangeKind, LeaderboardEntry, PlayerRecord, RecordPatch,
    RemoteProxy, SelfState, SnapshotEntry, Vec3,
};
