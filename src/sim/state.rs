//! Game state and core simulation types
//!
//! All mutable world state is owned by [`GameState`] and only mutated inside
//! a tick. No ambient globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the host to start the game
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended by a lethal collision; restart key returns to Playing
    Dead,
}

/// Which arena edge the player is touching, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallSide {
    #[default]
    None,
    Left,
    Right,
}

/// Arena bounds (top-left origin)
///
/// A zero or undefined host surface degrades to a nominal extent so no
/// division or NaN can reach the physics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        let width = if width.is_finite() && width > 0.0 {
            width
        } else {
            NOMINAL_EXTENT
        };
        let height = if height.is_finite() && height > 0.0 {
            height
        } else {
            NOMINAL_EXTENT
        };
        Self { width, height }
    }

    /// Rightmost legal player x
    pub fn max_x(&self) -> f32 {
        (self.width - PLAYER_SIZE).max(0.0)
    }

    /// Lowest legal player y (the ground line)
    pub fn max_y(&self) -> f32 {
        (self.height - PLAYER_SIZE).max(0.0)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(NOMINAL_EXTENT, NOMINAL_EXTENT)
    }
}

/// The player circle
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner, arena-local
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub on_ground: bool,
    pub wall_side: WallSide,
    /// Resets to 0 on ground contact, to 1 on any jump or wall jump
    pub jumps_used: u32,
    pub max_jumps: u32,
}

impl Player {
    /// Player at the spawn pose, at rest
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1),
            vel: Vec2::ZERO,
            on_ground: false,
            wall_side: WallSide::None,
            jumps_used: 0,
            max_jumps: MAX_JUMPS,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(PLAYER_RADIUS)
    }

    pub fn on_wall(&self) -> bool {
        self.wall_side != WallSide::None
    }
}

/// A hazard descending from the top edge
///
/// Lethal on contact until the player jumps over it, which marks it
/// `collected`: still falling, still rendered, but permanently harmless.
#[derive(Debug, Clone, PartialEq)]
pub struct FallingHazard {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Fall speed, pixels per tick
    pub speed: f32,
    pub collected: bool,
}

impl FallingHazard {
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(FALLING_RADIUS)
    }
}

/// Arena edge a patrol hazard is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Top,
    Bottom,
    Left,
    Right,
}

impl Wall {
    /// Top/bottom patrols move horizontally, left/right vertically
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Wall::Top | Wall::Bottom)
    }
}

/// Patrol heading along the hazard's movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolDirection {
    Left,
    Right,
    Up,
    Down,
}

/// A hazard oscillating along one arena edge
///
/// Fixed population, created once per run. Never collectible.
#[derive(Debug, Clone, PartialEq)]
pub struct WallHazard {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Pixels per tick, recomputed from difficulty every tick
    pub speed: f32,
    pub direction: PatrolDirection,
    pub wall: Wall,
    /// Patrol segment bounds on the movement axis
    pub start_pos: f32,
    pub end_pos: f32,
}

impl WallHazard {
    /// Advance along the patrol axis, clamping exactly to the segment bound
    /// before reversing. Position never leaves `[start_pos, end_pos]`.
    pub fn advance(&mut self) {
        match self.direction {
            PatrolDirection::Right => {
                self.pos.x += self.speed;
                if self.pos.x >= self.end_pos {
                    self.pos.x = self.end_pos;
                    self.direction = PatrolDirection::Left;
                }
            }
            PatrolDirection::Left => {
                self.pos.x -= self.speed;
                if self.pos.x <= self.start_pos {
                    self.pos.x = self.start_pos;
                    self.direction = PatrolDirection::Right;
                }
            }
            PatrolDirection::Down => {
                self.pos.y += self.speed;
                if self.pos.y >= self.end_pos {
                    self.pos.y = self.end_pos;
                    self.direction = PatrolDirection::Up;
                }
            }
            PatrolDirection::Up => {
                self.pos.y -= self.speed;
                if self.pos.y <= self.start_pos {
                    self.pos.y = self.start_pos;
                    self.direction = PatrolDirection::Down;
                }
            }
        }
    }
}

/// Complete game state (deterministic given seed + input script)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub arena: Arena,
    pub phase: GamePhase,
    pub player: Player,
    /// Live falling hazards (ascending by id)
    pub falling: Vec<FallingHazard>,
    /// Wall patrol population (ascending by id)
    pub walls: Vec<WallHazard>,
    /// Ticks since the current run started
    pub frame_count: u64,
    /// Starts at 1, increments every DIFFICULTY_INTERVAL ticks
    pub difficulty_level: u32,
    /// Internal float accumulator; rounded only at display/persistence
    pub score: f32,
    /// Lifetime deaths this session, never reset by restart
    pub death_count: u32,
    pub(crate) rng: Pcg32,
    next_falling_id: u32,
    next_wall_id: u32,
}

impl GameState {
    /// Create a not-yet-started game with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            arena: Arena::default(),
            phase: GamePhase::NotStarted,
            player: Player::spawn(),
            falling: Vec::new(),
            walls: Vec::new(),
            frame_count: 0,
            difficulty_level: 1,
            score: 0.0,
            death_count: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_falling_id: 0,
            next_wall_id: 0,
        }
    }

    /// Begin the first run on a host surface of the given extent
    pub fn start(&mut self, width: f32, height: f32) {
        self.arena = Arena::new(width, height);
        self.begin_run();
    }

    /// Restart after death. Death count persists; everything else resets.
    pub fn reset_run(&mut self) {
        self.death_count += 1;
        self.begin_run();
    }

    fn begin_run(&mut self) {
        self.player = Player::spawn();
        self.falling.clear();
        self.create_wall_hazards();
        self.frame_count = 0;
        self.difficulty_level = 1;
        self.score = 0.0;
        self.phase = GamePhase::Playing;
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::Dead
    }

    /// Whole seconds survived this run
    pub fn elapsed_secs(&self) -> u64 {
        self.frame_count / TICK_HZ as u64
    }

    fn next_falling_id(&mut self) -> u32 {
        let id = self.next_falling_id;
        self.next_falling_id += 1;
        id
    }

    fn next_wall_id(&mut self) -> u32 {
        let id = self.next_wall_id;
        self.next_wall_id += 1;
        id
    }

    /// Spawn a falling hazard at a random x along the top edge, subject to
    /// the live-population cap. Returns whether one was spawned.
    pub fn spawn_falling(&mut self) -> bool {
        if self.falling.len() >= MAX_FALLING {
            return false;
        }
        let x = self.rng.random_range(0.0..self.arena.width);
        let speed = self.rng.random_range(FALL_SPEED_MIN..FALL_SPEED_MAX);
        let id = self.next_falling_id();
        self.falling.push(FallingHazard {
            id,
            pos: Vec2::new(x, 0.0),
            speed,
            collected: false,
        });
        true
    }

    /// Recreate the full wall patrol population at initial patrol midpoints.
    ///
    /// Each edge is split into WALL_HAZARDS_PER_WALL segments with one hazard
    /// at each segment midpoint. Segments whose midpoint lands too near the
    /// player spawn (top and left edges) are left empty.
    pub fn create_wall_hazards(&mut self) {
        self.walls.clear();

        let w = self.arena.width;
        let h = self.arena.height;
        let speed = WALL_SPEED_BASE + WALL_SPEED_PER_LEVEL * self.difficulty_level as f32;

        let edges = [
            (Wall::Top, PatrolDirection::Right),
            (Wall::Bottom, PatrolDirection::Right),
            (Wall::Left, PatrolDirection::Down),
            (Wall::Right, PatrolDirection::Down),
        ];

        for (wall, direction) in edges {
            let extent = if wall.is_horizontal() { w } else { h };
            let segment = extent / WALL_HAZARDS_PER_WALL as f32;

            for i in 0..WALL_HAZARDS_PER_WALL {
                let start_pos = i as f32 * segment;
                let end_pos = (i + 1) as f32 * segment;
                let mid = start_pos + segment / 2.0;

                // Keep spawn-adjacent edges clear of the player's start pose
                match wall {
                    Wall::Top if (mid - PLAYER_SPAWN.0).abs() < 50.0 => continue,
                    Wall::Left if (mid - PLAYER_SPAWN.1).abs() < 100.0 => continue,
                    _ => {}
                }

                let pos = match wall {
                    Wall::Top => Vec2::new(mid, 0.0),
                    Wall::Bottom => Vec2::new(mid, h),
                    Wall::Left => Vec2::new(0.0, mid),
                    Wall::Right => Vec2::new(w, mid),
                };

                let id = self.next_wall_id();
                self.walls.push(WallHazard {
                    id,
                    pos,
                    speed,
                    direction,
                    wall,
                    start_pos,
                    end_pos,
                });
            }
        }
    }
}
