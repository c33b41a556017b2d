// Framework bootstrap and a headless demo loop for the sync core.

use std::io::Result;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{Clock, PlayerStore};
use crate::domain::state::{PlayerRecord, RecordPatch, Vec3};
use crate::frameworks::config;
use crate::interface_adapters::hud::TracingOutput;
use crate::interface_adapters::memory_store::MemoryStore;
use crate::interface_adapters::scene::HeadlessScene;
use crate::use_cases::session::{SessionSettings, start_session};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

/// Wall-clock time source for live sessions.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

pub fn session_settings() -> SessionSettings {
    SessionSettings {
        publish_min_interval_ms: config::PUBLISH_MIN_INTERVAL_MS,
        smoothing_rate: config::SMOOTHING_RATE,
        shot_damage: config::SHOT_DAMAGE,
        lethal_hp_threshold: config::LETHAL_HP_THRESHOLD,
        max_hp: config::MAX_HP,
        win_kills: config::WIN_KILLS,
        respawn_position: config::RESPAWN_POSITION,
        kill_feed_ttl_ms: config::KILL_FEED_TTL_MS,
        event_channel_capacity: config::EVENT_CHANNEL_CAPACITY,
    }
}

/// Headless demo: one live session plus a scripted peer writing straight into
/// the store, standing in for the browser render loop.
pub async fn run_demo() -> Result<()> {
    init_runtime();

    let match_id = config::match_id();
    let store = MemoryStore::new(match_id.clone());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    info!(%match_id, "demo match starting");

    // Scripted peer: joins through the store and strafes toward the player.
    let peer_id = Uuid::new_v4().to_string();
    let peer_task = {
        let store = store.clone();
        let peer_id = peer_id.clone();
        tokio::spawn(async move {
            let record = PlayerRecord {
                position: Vec3::new(5.0, 0.0, 0.0),
                rotation_yaw: 0.0,
                hp: 25,
                kills: 3,
                username: "rival".to_string(),
                last_seen_ms: 0,
            };
            if let Err(e) = store.create(&peer_id, record).await {
                warn!(error = %e, "peer join failed");
                return;
            }
            for step in 0..20u32 {
                tokio::time::sleep(Duration::from_millis(100)).await;
                let x = 5.0 - step as f32 * 0.2;
                let patch = RecordPatch::movement(Vec3::new(x, 0.0, 0.0), 1.57);
                if let Err(e) = store.update(&peer_id, patch).await {
                    warn!(error = %e, "peer update failed");
                }
            }
        })
    };

    let self_id = Uuid::new_v4().to_string();
    let session = start_session(
        store.clone(),
        clock,
        Box::new(HeadlessScene::new()),
        Box::new(TracingOutput),
        session_settings(),
        self_id,
        config::username(),
        Vec3::new(0.0, 0.0, 8.0),
    )
    .await
    .map_err(|e| std::io::Error::other(format!("join failed: {e}")))?;

    // Fixed-step frame loop standing in for the render loop.
    let dt = 1.0 / 60.0;
    for frame in 0..180u32 {
        tokio::time::sleep(Duration::from_millis(16)).await;
        let position = Vec3::new(0.0, 0.0, 8.0 - frame as f32 * 0.02);
        session.frame(dt, position, frame as f32 * 0.01).await;
        if frame == 90 {
            // Pretend the raycaster reported the peer as struck.
            session.hit(peer_id.clone()).await;
        }
    }

    session.stop().await;
    let _ = peer_task.await;
    info!("demo match finished");
    Ok(())
}
