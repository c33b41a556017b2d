// Document wire schema for the match's player collection, stored at
// matches/{matchId}/players/{participantId}. Internal domain types never leak
// these field names.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::domain::state::{PlayerRecord, RecordPatch, Vec3};

/// Stored document shape for one participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecordDoc {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub ry: f32,
    pub hp: i32,
    pub kills: i32,
    pub username: String,
    #[serde(rename = "lastSeen", default)]
    pub last_seen: u64,
}

impl From<PlayerRecord> for PlayerRecordDoc {
    fn from(record: PlayerRecord) -> Self {
        Self {
            x: record.position.x,
            y: record.position.y,
            z: record.position.z,
            ry: record.rotation_yaw,
            hp: record.hp,
            kills: record.kills,
            username: record.username,
            last_seen: record.last_seen_ms,
        }
    }
}

impl From<PlayerRecordDoc> for PlayerRecord {
    fn from(doc: PlayerRecordDoc) -> Self {
        Self {
            position: Vec3::new(doc.x, doc.y, doc.z),
            rotation_yaw: doc.ry,
            hp: doc.hp,
            kills: doc.kills,
            username: doc.username,
            last_seen_ms: doc.last_seen,
        }
    }
}

/// A single field mutation inside a partial update.
#[derive(Debug, Clone)]
pub enum FieldOp {
    Set(Value),
    /// Store-side numeric transform; concurrent increments accumulate.
    Increment(i64),
}

/// Flattens a patch into the field operations a store applies atomically per
/// document. `lastSeen` stamping is left to the store, which owns the clock.
pub fn patch_ops(patch: &RecordPatch) -> Vec<(&'static str, FieldOp)> {
    let mut ops = Vec::new();
    if let Some(position) = patch.position {
        ops.push(("x", FieldOp::Set(number(position.x))));
        ops.push(("y", FieldOp::Set(number(position.y))));
        ops.push(("z", FieldOp::Set(number(position.z))));
    }
    if let Some(ry) = patch.rotation_yaw {
        ops.push(("ry", FieldOp::Set(number(ry))));
    }
    if let Some(hp) = patch.hp {
        ops.push(("hp", FieldOp::Set(Value::from(hp))));
    }
    if let Some(delta) = patch.hp_delta {
        ops.push(("hp", FieldOp::Increment(delta as i64)));
    }
    if let Some(delta) = patch.kills_delta {
        ops.push(("kills", FieldOp::Increment(delta as i64)));
    }
    ops
}

fn number(value: f32) -> Value {
    Number::from_f64(value as f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
