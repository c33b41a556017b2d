// Use cases layer: client-side synchronization workflows.

pub mod combat;
pub mod interpolation;
pub mod leaderboard;
pub mod publisher;
pub mod reconciler;
pub mod session;
pub mod types;

pub use session::{SessionHandle, SessionSettings, start_session};
pub use types::SessionEvent;
