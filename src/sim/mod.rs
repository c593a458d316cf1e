//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (physics in pixels per tick)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{circles_collide, in_collection_band};
pub use input::{Action, InputState};
pub use snapshot::{FallingView, Snapshot, WallView};
pub use state::{
    Arena, FallingHazard, GamePhase, GameState, PatrolDirection, Player, Wall, WallHazard, WallSide,
};
pub use tick::tick;
