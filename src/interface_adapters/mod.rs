// Interface adapters: document wire schema and concrete port implementations.

pub mod hud;
pub mod memory_store;
pub mod protocol;
pub mod scene;
