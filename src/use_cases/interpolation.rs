// Frame-rate-independent smoothing of remote proxies toward their latest
// authoritative transforms.

use std::collections::HashMap;

use crate::domain::ports::Scene;
use crate::domain::state::RemoteProxy;

/// Advances every live proxy toward its target once per render frame.
///
/// Position uses exponential smoothing: the per-frame fraction is `rate * dt`,
/// clamped to 1.0 so an oversized frame lands exactly on the target instead of
/// overshooting. Rotation snaps to the target yaw and is never smoothed.
pub fn tick(proxies: &mut HashMap<String, RemoteProxy>, dt: f32, rate: f32, scene: &mut dyn Scene) {
    let t = (rate * dt).min(1.0);
    for proxy in proxies.values_mut() {
        proxy.rendered_position = proxy.rendered_position.lerp(proxy.target_position, t);
        scene.update_avatar(proxy.avatar, proxy.rendered_position, proxy.target_yaw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{AvatarId, PlayerRecord, Vec3};

    struct RecordingScene {
        updates: Vec<(AvatarId, Vec3, f32)>,
    }

    impl Scene for RecordingScene {
        fn spawn_avatar(&mut self, _player_id: &str, _position: Vec3) -> AvatarId {
            AvatarId(1)
        }

        fn update_avatar(&mut self, avatar: AvatarId, position: Vec3, yaw: f32) {
            self.updates.push((avatar, position, yaw));
        }

        fn remove_avatar(&mut self, _avatar: AvatarId) {}
    }

    fn proxy_at(rendered: Vec3, target: Vec3, yaw: f32) -> RemoteProxy {
        RemoteProxy {
            avatar: AvatarId(7),
            rendered_position: rendered,
            target_position: target,
            target_yaw: yaw,
            last_record: PlayerRecord {
                position: target,
                rotation_yaw: yaw,
                hp: 100,
                kills: 0,
                username: "rival".to_string(),
                last_seen_ms: 0,
            },
        }
    }

    #[test]
    fn when_ticks_accumulate_then_the_rendered_position_converges_on_the_target() {
        let target = Vec3::new(10.0, 0.0, -4.0);
        let mut proxies = HashMap::new();
        proxies.insert(
            "rival".to_string(),
            proxy_at(Vec3::default(), target, 0.0),
        );
        let mut scene = RecordingScene { updates: Vec::new() };

        for _ in 0..120 {
            tick(&mut proxies, 1.0 / 60.0, 10.0, &mut scene);
        }

        let proxy = proxies.get("rival").expect("proxy should survive ticks");
        assert!(proxy.rendered_position.distance(target) < 0.01);
    }

    #[test]
    fn when_the_smoothing_step_reaches_one_then_a_single_tick_lands_on_the_target() {
        let target = Vec3::new(3.0, 1.0, 2.0);
        let mut proxies = HashMap::new();
        proxies.insert(
            "rival".to_string(),
            proxy_at(Vec3::new(-5.0, 0.0, 0.0), target, 0.0),
        );
        let mut scene = RecordingScene { updates: Vec::new() };

        // rate * dt = 2.0, clamped to 1.0: no overshoot past the target.
        tick(&mut proxies, 0.2, 10.0, &mut scene);

        let proxy = proxies.get("rival").expect("proxy should survive the tick");
        assert_eq!(proxy.rendered_position, target);
    }

    #[test]
    fn when_a_proxy_is_ticked_then_rotation_snaps_to_the_target_yaw() {
        let mut proxies = HashMap::new();
        proxies.insert(
            "rival".to_string(),
            proxy_at(Vec3::default(), Vec3::new(10.0, 0.0, 0.0), 1.57),
        );
        let mut scene = RecordingScene { updates: Vec::new() };

        tick(&mut proxies, 1.0 / 60.0, 10.0, &mut scene);

        // Position is still far from the target, but yaw is already exact.
        let (_, position, yaw) = scene.updates[0];
        assert!(position.distance(Vec3::new(10.0, 0.0, 0.0)) > 5.0);
        assert_eq!(yaw, 1.57);
    }
}
