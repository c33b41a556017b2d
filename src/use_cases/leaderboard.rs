// Leaderboard projection from the latest collection snapshot.

use crate::domain::state::{LeaderboardEntry, SnapshotEntry};

/// Projects the full snapshot (self included) into a ranked leaderboard,
/// kills descending, ties unordered. Pure; each snapshot fully replaces the
/// previous projection.
pub fn project(snapshot: &[SnapshotEntry]) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = snapshot
        .iter()
        .map(|entry| LeaderboardEntry {
            username: entry.record.username.clone(),
            kills: entry.record.kills,
        })
        .collect();
    entries.sort_by(|a, b| b.kills.cmp(&a.kills));
    entries
}
