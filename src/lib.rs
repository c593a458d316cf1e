//! Drop Dodge - a browser arcade avoider
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, hazards, collisions, scoring)
//! - `render`: Retained-mode DOM renderer driven by engine snapshots
//! - `scores`: Personal best / leaderboard persistence (LocalStorage)
//! - `settings`: Display preferences

pub mod render;
pub mod scores;
pub mod settings;
pub mod sim;

pub use scores::{ScoreBoard, SubmitOutcome};
pub use settings::Settings;

/// Game configuration constants
///
/// Physics values are in pixels per tick (not per second): the simulation
/// advances by a fixed per-tick delta regardless of actual frame timing.
pub mod consts {
    /// Nominal simulation rate (ticks per second)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Downward acceleration, pixels/tick^2
    pub const GRAVITY: f32 = 0.8;
    /// Ground jump impulse (negative y is up)
    pub const JUMP_FORCE: f32 = -20.0;
    /// Wall jump impulse
    pub const WALL_JUMP_FORCE: f32 = -15.0;
    /// Air jumps are weaker than ground jumps
    pub const AIR_JUMP_SCALE: f32 = 0.8;
    /// Horizontal kick away from the wall on a wall jump
    pub const WALL_PUSH_SCALE: f32 = 1.5;
    /// Horizontal run speed, pixels/tick
    pub const MOVE_SPEED: f32 = 9.0;
    /// vx multiplier per tick when no move key is held
    pub const FRICTION: f32 = 0.8;
    /// Total jumps allowed between ground contacts
    pub const MAX_JUMPS: u32 = 2;

    /// Player diameter; collision radius is half this
    pub const PLAYER_SIZE: f32 = 50.0;
    pub const PLAYER_RADIUS: f32 = PLAYER_SIZE / 2.0;
    /// Player spawn pose (arena-local, top-left origin)
    pub const PLAYER_SPAWN: (f32, f32) = (150.0, 50.0);

    /// Falling hazard diameter and lethal radius
    pub const FALLING_SIZE: f32 = 50.0;
    pub const FALLING_RADIUS: f32 = FALLING_SIZE / 2.0;
    /// Wall patrol hazards use a smaller lethal radius
    pub const WALL_HAZARD_RADIUS: f32 = 15.0;
    /// Live falling hazard cap
    pub const MAX_FALLING: usize = 15;
    /// Patrol hazards created per arena edge
    pub const WALL_HAZARDS_PER_WALL: usize = 1;

    /// Falling speed band, pixels/tick (uniform in [min, max))
    pub const FALL_SPEED_MIN: f32 = 2.0;
    pub const FALL_SPEED_MAX: f32 = 3.0;

    /// Horizontal band within which a hazard below the player counts as jumped over
    pub const COLLECT_BAND: f32 = 50.0;
    /// Bonus for jumping over a falling hazard
    pub const COLLECT_BONUS: f32 = 100.0;
    /// Survival score accrued every tick while alive
    pub const SCORE_PER_TICK: f32 = 0.1;

    /// Ticks between difficulty level increments (~10 s at 60 Hz)
    pub const DIFFICULTY_INTERVAL: u64 = 600;
    /// Base falling hazard spawn interval in ticks (2 s)
    pub const SPAWN_BASE_INTERVAL: u64 = 120;
    /// Spawn interval shrinks by this fraction of the base per difficulty level
    pub const SPAWN_SCALE_PER_LEVEL: f32 = 0.1;
    /// Spawn interval never shrinks below this fraction of the base
    pub const SPAWN_MIN_SCALE: f32 = 0.5;
    /// Probability of actually spawning on a scheduled tick
    pub const SPAWN_CHANCE: f32 = 0.8;

    /// Wall patrol speed: base + per-level, recomputed every tick
    pub const WALL_SPEED_BASE: f32 = 0.5;
    pub const WALL_SPEED_PER_LEVEL: f32 = 0.3;

    /// Falling hazards are removed this far past the bottom edge
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
    /// Fallback arena extent when the host surface reports zero size
    pub const NOMINAL_EXTENT: f32 = 400.0;
}
