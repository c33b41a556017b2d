// Use-case level inputs for the session sync task.

use crate::domain::Vec3;

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// One render frame: local transform plus elapsed time.
    Frame { dt: f32, position: Vec3, yaw: f32 },
    /// Local hit test identified a remote participant as struck.
    Hit { target_id: String },
    /// Leave the match and tear the session down.
    Stop,
}
