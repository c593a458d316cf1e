//! Read-only world snapshot published to the presentation layer
//!
//! The engine pushes one snapshot per tick; the renderer owns all visual
//! element lifecycle and never reaches back into the simulation.

use glam::Vec2;

use super::state::GameState;
use crate::consts::TICK_HZ;

/// Render data for one falling hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingView {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub collected: bool,
}

/// Render data for one wall patrol hazard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallView {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Player top-left corner
    pub player_pos: Vec2,
    /// Raw score accumulator; round with [`display_score`] before showing
    pub score: f32,
    pub elapsed_ticks: u64,
    pub elapsed_secs: u64,
    pub death_count: u32,
    pub difficulty_level: u32,
    pub game_over: bool,
    /// Host-measured frames per second, for the HUD only
    pub fps: u32,
    pub falling: Vec<FallingView>,
    pub walls: Vec<WallView>,
}

impl GameState {
    /// Capture the current world state for rendering
    pub fn snapshot(&self, fps: u32) -> Snapshot {
        Snapshot {
            player_pos: self.player.pos,
            score: self.score,
            elapsed_ticks: self.frame_count,
            elapsed_secs: self.frame_count / TICK_HZ as u64,
            death_count: self.death_count,
            difficulty_level: self.difficulty_level,
            game_over: self.game_over(),
            fps,
            falling: self
                .falling
                .iter()
                .map(|h| FallingView {
                    id: h.id,
                    pos: h.pos,
                    collected: h.collected,
                })
                .collect(),
            walls: self
                .walls
                .iter()
                .map(|h| WallView { id: h.id, pos: h.pos })
                .collect(),
        }
    }
}

/// Round the internal score for display or persistence. The float
/// accumulator stays inside the engine; integers cross the boundary.
#[inline]
pub fn display_score(score: f32) -> u64 {
    score.round().max(0.0) as u64
}
