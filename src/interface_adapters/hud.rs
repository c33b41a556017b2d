// GameOutput adapters: a channel emitter for embedding UIs and a structured-log
// HUD for headless runs.

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::ports::GameOutput;
use crate::domain::state::LeaderboardEntry;

/// HUD updates as an emission contract; the UI layer consumes these instead of
/// the core touching any presentation technology.
#[derive(Debug, Clone, PartialEq)]
pub enum HudEvent {
    SelfStats { hp: i32, kills: i32 },
    Leaderboard(Vec<LeaderboardEntry>),
    KillFeedShown { victim: String },
    KillFeedCleared,
    MatchWon { winner: String },
}

/// Forwards HUD updates over an unbounded channel.
pub struct ChannelOutput {
    events: mpsc::UnboundedSender<HudEvent>,
}

impl ChannelOutput {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HudEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { events: tx }, rx)
    }
}

impl GameOutput for ChannelOutput {
    fn self_stats(&mut self, hp: i32, kills: i32) {
        let _ = self.events.send(HudEvent::SelfStats { hp, kills });
    }

    fn leaderboard(&mut self, entries: &[LeaderboardEntry]) {
        let _ = self.events.send(HudEvent::Leaderboard(entries.to_vec()));
    }

    fn kill_feed_shown(&mut self, victim: &str) {
        let _ = self.events.send(HudEvent::KillFeedShown {
            victim: victim.to_string(),
        });
    }

    fn kill_feed_cleared(&mut self) {
        let _ = self.events.send(HudEvent::KillFeedCleared);
    }

    fn match_won(&mut self, winner: &str) {
        let _ = self.events.send(HudEvent::MatchWon {
            winner: winner.to_string(),
        });
    }
}

/// Logs HUD updates; used by the demo binary.
pub struct TracingOutput;

impl GameOutput for TracingOutput {
    fn self_stats(&mut self, hp: i32, kills: i32) {
        info!(hp, kills, "self stats");
    }

    fn leaderboard(&mut self, entries: &[LeaderboardEntry]) {
        let ranking: Vec<String> = entries
            .iter()
            .map(|e| format!("{}: {}", e.username, e.kills))
            .collect();
        info!(?ranking, "leaderboard");
    }

    fn kill_feed_shown(&mut self, victim: &str) {
        info!(victim, "kill feed");
    }

    fn kill_feed_cleared(&mut self) {
        debug!("kill feed cleared");
    }

    fn match_won(&mut self, winner: &str) {
        info!(winner, "match won");
    }
}
