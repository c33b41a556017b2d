// Headless Scene adapter: allocates avatar handles without a renderer.

use tracing::debug;

use crate::domain::ports::Scene;
use crate::domain::state::{AvatarId, Vec3};

/// Scene implementation for headless runs; hands out handles and tracks how
/// many avatars are live. A real renderer implements the same port.
pub struct HeadlessScene {
    next_handle: u64,
    live: usize,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            live: 0,
        }
    }

    pub fn live_avatars(&self) -> usize {
        self.live
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for HeadlessScene {
    fn spawn_avatar(&mut self, player_id: &str, position: Vec3) -> AvatarId {
        let avatar = AvatarId(self.next_handle);
        self.next_handle += 1;
        self.live += 1;
        debug!(player_id, x = position.x, y = position.y, z = position.z, "avatar spawned");
        avatar
    }

    fn update_avatar(&mut self, _avatar: AvatarId, _position: Vec3, _yaw: f32) {}

    fn remove_avatar(&mut self, avatar: AvatarId) {
        self.live = self.live.saturating_sub(1);
        debug!(handle = avatar.0, "avatar removed");
    }
}
