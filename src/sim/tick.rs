//! Fixed timestep simulation tick
//!
//! One call advances the world by exactly one tick. Step order is fixed:
//! horizontal input, jump edge-trigger, integration, arena clamps, falling
//! hazards, wall patrols, difficulty, scoring, spawn decision. Physics is
//! in pixels per tick; wall-clock time never scales the step.

use rand::Rng;

use super::collision::{circles_collide, in_collection_band};
use super::input::{Action, InputState};
use super::state::{GamePhase, GameState, WallSide};
use crate::consts::*;

/// Advance the game state by one tick, consuming buffered input edges.
pub fn tick(state: &mut GameState, input: &mut InputState) {
    match state.phase {
        GamePhase::NotStarted => {
            input.clear_just_pressed();
            return;
        }
        GamePhase::Dead => {
            // Physics and spawning are frozen; only the restart edge matters
            if input.just_pressed(Action::Restart) {
                state.reset_run();
            }
            input.clear_just_pressed();
            return;
        }
        GamePhase::Playing => {}
    }

    state.frame_count += 1;

    // 1. Horizontal input: a held key wins, otherwise friction decays vx
    let p = &mut state.player;
    if input.held(Action::MoveLeft) {
        p.vel.x = -MOVE_SPEED;
    } else if input.held(Action::MoveRight) {
        p.vel.x = MOVE_SPEED;
    } else {
        p.vel.x *= FRICTION;
    }

    // 2. Jump edge-trigger: ground jump > wall jump > air jump budget
    if input.just_pressed(Action::Jump) {
        if p.on_ground {
            p.vel.y = JUMP_FORCE;
            p.on_ground = false;
            p.jumps_used = 1;
        } else if p.on_wall() {
            // Capture the side before clearing contact; the push direction
            // must come from the wall we were actually touching
            let side = p.wall_side;
            p.vel.y = WALL_JUMP_FORCE;
            p.wall_side = WallSide::None;
            p.jumps_used = 1;
            match side {
                WallSide::Left => p.vel.x = MOVE_SPEED * WALL_PUSH_SCALE,
                WallSide::Right => p.vel.x = -MOVE_SPEED * WALL_PUSH_SCALE,
                WallSide::None => {}
            }
        } else if p.jumps_used < p.max_jumps {
            p.vel.y = JUMP_FORCE * AIR_JUMP_SCALE;
            p.jumps_used += 1;
        }
    }

    // 3. Edge-triggered presses are consumed exactly once
    input.clear_just_pressed();

    // 4. Integrate
    p.vel.y += GRAVITY;
    p.pos += p.vel;

    // 5. Top/bottom clamp. Ground contact resets the jump budget and clears
    // wall contact (ground and wall contact are mutually exclusive).
    let max_y = state.arena.max_y();
    if p.pos.y <= 0.0 {
        p.pos.y = 0.0;
        p.vel.y = 0.0;
    }
    if p.pos.y >= max_y {
        p.pos.y = max_y;
        p.vel.y = 0.0;
        p.on_ground = true;
        p.wall_side = WallSide::None;
        p.jumps_used = 0;
    } else {
        p.on_ground = false;
    }

    // 6. Left/right clamp. Airborne edge contact is wall contact.
    let max_x = state.arena.max_x();
    if p.pos.x <= 0.0 {
        p.pos.x = 0.0;
        p.vel.x = 0.0;
        if !p.on_ground {
            p.wall_side = WallSide::Left;
        }
    } else if p.pos.x >= max_x {
        p.pos.x = max_x;
        p.vel.x = 0.0;
        if !p.on_ground {
            p.wall_side = WallSide::Right;
        }
    } else {
        p.wall_side = WallSide::None;
    }

    let player_center = state.player.center();
    let mut died = false;
    let mut bonus = 0.0;

    // 7. Falling hazards: advance, lethal test, collection test, cull.
    // Collected hazards keep falling but are permanently harmless.
    let cull_y = state.arena.height + OFFSCREEN_MARGIN;
    state.falling.retain_mut(|h| {
        h.pos.y += h.speed;
        if !h.collected {
            if circles_collide(player_center, PLAYER_RADIUS, h.center(), FALLING_RADIUS) {
                died = true;
            }
            if in_collection_band(player_center, h.center()) {
                h.collected = true;
                bonus += COLLECT_BONUS;
            }
        }
        h.pos.y <= cull_y
    });
    state.score += bonus;

    // 8. Wall patrols: speed tracks current difficulty, never cached
    let wall_speed = WALL_SPEED_BASE + WALL_SPEED_PER_LEVEL * state.difficulty_level as f32;
    for h in &mut state.walls {
        h.speed = wall_speed;
        h.advance();
        if circles_collide(player_center, PLAYER_RADIUS, h.pos, WALL_HAZARD_RADIUS) {
            died = true;
        }
    }

    // 9. Difficulty progression (~every 10 s)
    if state.frame_count % DIFFICULTY_INTERVAL == 0 {
        state.difficulty_level += 1;
    }

    // 10. Survival score accrues every tick while alive
    state.score += SCORE_PER_TICK;

    // 11. Spawn decision: interval shrinks with difficulty, floored at half
    // the base, and a scheduled tick only spawns with SPAWN_CHANCE
    let scale =
        (1.0 - (state.difficulty_level - 1) as f32 * SPAWN_SCALE_PER_LEVEL).max(SPAWN_MIN_SCALE);
    let interval = ((SPAWN_BASE_INTERVAL as f32 * scale).floor() as u64).max(1);
    if state.frame_count % interval == 0 && state.rng.random::<f32>() < SPAWN_CHANCE {
        state.spawn_falling();
    }

    // Lethal collisions (any number, any kind) flip the phase once
    if died {
        state.phase = GamePhase::Dead;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{FallingHazard, Wall, WallHazard};
    use glam::Vec2;
    use proptest::prelude::*;

    fn started() -> (GameState, InputState) {
        let mut state = GameState::new(12345);
        state.start(400.0, 400.0);
        (state, InputState::new())
    }

    /// Run n ticks with hazards removed after each step so the player
    /// cannot die from the random spawn stream.
    fn run_safe(state: &mut GameState, input: &mut InputState, n: u64) {
        for _ in 0..n {
            tick(state, input);
            state.falling.clear();
            state.walls.clear();
        }
    }

    fn settle_on_ground(state: &mut GameState, input: &mut InputState) {
        run_safe(state, input, 60);
        assert!(state.player.on_ground);
    }

    #[test]
    fn test_not_started_does_nothing() {
        let mut state = GameState::new(1);
        let mut input = InputState::new();
        input.key_down("w");
        tick(&mut state, &mut input);
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.phase, GamePhase::NotStarted);
        // Edge consumed even while idle, so a stale press can't fire later
        assert!(!input.just_pressed(Action::Jump));
    }

    #[test]
    fn test_friction_decays_vx_when_no_key_held() {
        let (mut state, mut input) = started();
        state.walls.clear();
        state.player.vel.x = 10.0;
        tick(&mut state, &mut input);
        assert!((state.player.vel.x - 10.0 * FRICTION).abs() < 1e-6);
    }

    #[test]
    fn test_ground_jump_resets_budget_on_landing() {
        let (mut state, mut input) = started();
        settle_on_ground(&mut state, &mut input);

        input.key_down("w");
        tick(&mut state, &mut input);
        assert_eq!(state.player.jumps_used, 1);
        assert!(!state.player.on_ground);
        assert!((state.player.vel.y - (JUMP_FORCE + GRAVITY)).abs() < 1e-6);

        // Air jump
        input.key_up("w");
        input.key_down("w");
        tick(&mut state, &mut input);
        assert_eq!(state.player.jumps_used, 2);

        // Budget exhausted: a third press changes nothing
        input.key_up("w");
        input.key_down("w");
        let vy_before = state.player.vel.y;
        tick(&mut state, &mut input);
        assert_eq!(state.player.jumps_used, 2);
        assert!((state.player.vel.y - (vy_before + GRAVITY)).abs() < 1e-6);

        // Landing restores the budget
        input.key_up("w");
        settle_on_ground(&mut state, &mut input);
        assert_eq!(state.player.jumps_used, 0);
    }

    #[test]
    fn test_jump_budget_never_exceeds_max() {
        let (mut state, mut input) = started();
        state.walls.clear();
        for i in 0..200 {
            if i % 3 == 0 {
                input.key_up("w");
                input.key_down("w");
            }
            tick(&mut state, &mut input);
            state.falling.clear();
            state.walls.clear();
            assert!(state.player.jumps_used <= state.player.max_jumps);
        }
    }

    #[test]
    fn test_wall_jump_pushes_away_from_left_wall() {
        let (mut state, mut input) = started();
        state.walls.clear();

        // Hold left until the player is pinned to the left wall, airborne
        input.key_down("a");
        for _ in 0..25 {
            tick(&mut state, &mut input);
            state.falling.clear();
            if state.player.wall_side == WallSide::Left {
                break;
            }
        }
        assert_eq!(state.player.wall_side, WallSide::Left);
        assert!(!state.player.on_ground);

        // Release left so the push isn't overwritten, then wall jump
        input.key_up("a");
        input.key_down("w");
        tick(&mut state, &mut input);

        assert!(state.player.vel.x > 0.0, "pushed away from the left wall");
        assert!((state.player.vel.y - (WALL_JUMP_FORCE + GRAVITY)).abs() < 1e-6);
        assert_eq!(state.player.jumps_used, 1);
        // The push moved the player off the edge region
        assert_eq!(state.player.wall_side, WallSide::None);
    }

    #[test]
    fn test_wall_jump_pushes_away_from_right_wall() {
        let (mut state, mut input) = started();
        state.walls.clear();

        input.key_down("d");
        for _ in 0..40 {
            tick(&mut state, &mut input);
            state.falling.clear();
            if state.player.wall_side == WallSide::Right {
                break;
            }
        }
        assert_eq!(state.player.wall_side, WallSide::Right);

        input.key_up("d");
        input.key_down("w");
        tick(&mut state, &mut input);
        assert!(state.player.vel.x < 0.0, "pushed away from the right wall");
    }

    #[test]
    fn test_held_jump_fires_once() {
        let (mut state, mut input) = started();
        settle_on_ground(&mut state, &mut input);

        input.key_down("w");
        tick(&mut state, &mut input);
        assert_eq!(state.player.jumps_used, 1);

        // Key stays held for many ticks: no second jump is consumed
        run_safe(&mut state, &mut input, 10);
        assert_eq!(state.player.jumps_used, 1);
    }

    #[test]
    fn test_ground_contact_excludes_wall_contact() {
        let (mut state, mut input) = started();
        state.walls.clear();
        input.key_down("a");
        // Long enough to slide into the bottom-left corner
        run_safe(&mut state, &mut input, 120);
        assert!(state.player.on_ground);
        assert_eq!(state.player.wall_side, WallSide::None);
        assert_eq!(state.player.pos.x, 0.0);
    }

    #[test]
    fn test_score_monotonic_while_alive() {
        let (mut state, mut input) = started();
        let mut last = state.score;
        for _ in 0..300 {
            tick(&mut state, &mut input);
            state.falling.clear();
            state.walls.clear();
            assert!(state.score >= last);
            last = state.score;
        }
        // Pure survival accrual, no bonuses collected
        assert!((state.score - 300.0 * SCORE_PER_TICK).abs() < 0.01);
    }

    #[test]
    fn test_difficulty_increments_after_exactly_600_ticks() {
        let (mut state, mut input) = started();
        assert_eq!(state.difficulty_level, 1);

        run_safe(&mut state, &mut input, 599);
        assert_eq!(state.difficulty_level, 1);

        run_safe(&mut state, &mut input, 1);
        assert_eq!(state.frame_count, 600);
        assert_eq!(state.difficulty_level, 2);
    }

    #[test]
    fn test_wall_speed_tracks_difficulty() {
        let (mut state, mut input) = started();
        state.falling.clear();
        state.difficulty_level = 3;
        tick(&mut state, &mut input);
        for h in &state.walls {
            assert!((h.speed - (WALL_SPEED_BASE + WALL_SPEED_PER_LEVEL * 3.0)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_lethal_falling_collision_sets_game_over() {
        let (mut state, mut input) = started();
        state.walls.clear();
        let center = state.player.center();
        state.falling.push(FallingHazard {
            id: 999,
            pos: center - Vec2::splat(FALLING_RADIUS),
            speed: 0.0,
            collected: false,
        });
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Dead);
    }

    #[test]
    fn test_wall_hazard_collision_sets_game_over() {
        let (mut state, mut input) = started();
        state.falling.clear();
        state.walls.clear();
        state.walls.push(WallHazard {
            id: 999,
            pos: state.player.center(),
            speed: 0.0,
            direction: crate::sim::state::PatrolDirection::Right,
            wall: Wall::Top,
            start_pos: 0.0,
            end_pos: 400.0,
        });
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Dead);
    }

    #[test]
    fn test_collection_awards_once_and_disarms() {
        let (mut state, mut input) = started();
        state.walls.clear();

        // Hazard directly below the player, inside the band
        let center = state.player.center();
        state.falling.push(FallingHazard {
            id: 7,
            pos: Vec2::new(center.x - FALLING_RADIUS, center.y + 40.0),
            speed: 0.0,
            collected: false,
        });

        let before = state.score;
        tick(&mut state, &mut input);
        assert!(state.falling[0].collected);
        assert!(state.score >= before + COLLECT_BONUS);

        // Second pass over the same hazard: no further bonus
        let before = state.score;
        tick(&mut state, &mut input);
        assert!((state.score - before - SCORE_PER_TICK).abs() < 1e-4);

        // A collected hazard overlapping the player is harmless
        state.falling[0].pos = state.player.center() - Vec2::splat(FALLING_RADIUS);
        state.falling[0].speed = 0.0;
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_offscreen_hazards_removed() {
        let (mut state, mut input) = started();
        state.walls.clear();
        state.falling.push(FallingHazard {
            id: 1,
            pos: Vec2::new(300.0, state.arena.height + OFFSCREEN_MARGIN),
            speed: 1.0,
            collected: true,
        });
        tick(&mut state, &mut input);
        assert!(state.falling.is_empty());
    }

    #[test]
    fn test_death_freezes_physics_and_score() {
        let (mut state, mut input) = started();
        state.walls.clear();
        state.falling.push(FallingHazard {
            id: 0,
            pos: state.player.center() - Vec2::splat(FALLING_RADIUS),
            speed: 0.0,
            collected: false,
        });
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Dead);

        let frozen_frame = state.frame_count;
        let frozen_score = state.score;
        let frozen_pos = state.player.pos;
        for _ in 0..30 {
            tick(&mut state, &mut input);
        }
        assert_eq!(state.frame_count, frozen_frame);
        assert_eq!(state.score, frozen_score);
        assert_eq!(state.player.pos, frozen_pos);
    }

    #[test]
    fn test_restart_preserves_death_count() {
        let (mut state, mut input) = started();
        state.walls.clear();
        state.score = 250.0;

        // Kill the player
        state.falling.push(FallingHazard {
            id: 0,
            pos: state.player.center() - Vec2::splat(FALLING_RADIUS),
            speed: 0.0,
            collected: false,
        });
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Dead);
        let deaths = state.death_count;

        // Holding a stale key is not a restart; only a fresh press is
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Dead);

        input.key_down(" ");
        tick(&mut state, &mut input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.death_count, deaths + 1);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.difficulty_level, 1);
        assert!(state.falling.is_empty());

        // Wall population recreated at patrol midpoints
        assert_eq!(state.walls.len(), 4);
        for h in &state.walls {
            let axis = if h.wall.is_horizontal() {
                h.pos.x
            } else {
                h.pos.y
            };
            assert!((axis - (h.start_pos + h.end_pos) / 2.0).abs() < 0.001);
        }

        // Player back at the spawn pose
        assert_eq!(state.player.pos, Vec2::new(PLAYER_SPAWN.0, PLAYER_SPAWN.1));
        assert_eq!(state.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_restart_edge_cleared_while_playing() {
        let (mut state, mut input) = started();
        // Space pressed mid-run is cleared by the tick and must not linger
        input.key_down(" ");
        tick(&mut state, &mut input);
        assert!(!input.just_pressed(Action::Restart));
    }

    #[test]
    fn test_patrol_containment_over_long_run() {
        let (mut state, mut input) = started();
        state.difficulty_level = 9; // fast patrols stress the clamping
        for _ in 0..2000 {
            tick(&mut state, &mut input);
            state.falling.clear();
            if state.phase == GamePhase::Dead {
                // Patrols can legitimately catch the idle player; containment
                // must have held for every tick up to that point
                break;
            }
            for h in &state.walls {
                let axis = if h.wall.is_horizontal() {
                    h.pos.x
                } else {
                    h.pos.y
                };
                assert!(
                    axis >= h.start_pos - 1e-3 && axis <= h.end_pos + 1e-3,
                    "patrol left its segment: {axis} not in [{}, {}]",
                    h.start_pos,
                    h.end_pos
                );
            }
        }
    }

    #[test]
    fn test_spawn_cadence_caps_population() {
        let (mut state, mut input) = started();
        state.walls.clear();
        // Park the player well below the top edge, clear of pinned hazards
        state.player.pos.y = 300.0;
        // Saturate the population, then run through many scheduled spawns
        while state.spawn_falling() {}
        assert_eq!(state.falling.len(), MAX_FALLING);
        for _ in 0..(SPAWN_BASE_INTERVAL * 3) {
            tick(&mut state, &mut input);
            assert!(state.falling.len() <= MAX_FALLING);
            // Pin hazards at the top edge so none are culled and none can
            // reach the player: every scheduled spawn hits the full cap
            for h in &mut state.falling {
                h.pos.y = 0.0;
            }
        }
        assert_eq!(state.falling.len(), MAX_FALLING);
    }

    #[test]
    fn test_determinism_same_seed_same_script() {
        let mut a = GameState::new(99999);
        let mut b = GameState::new(99999);
        a.start(400.0, 400.0);
        b.start(400.0, 400.0);

        let mut input_a = InputState::new();
        let mut input_b = InputState::new();

        for i in 0..500u32 {
            if i % 37 == 0 {
                input_a.key_down("w");
                input_b.key_down("w");
            }
            if i % 37 == 5 {
                input_a.key_up("w");
                input_b.key_up("w");
            }
            if i % 50 < 25 {
                input_a.key_down("d");
                input_b.key_down("d");
            } else {
                input_a.key_up("d");
                input_b.key_up("d");
            }
            tick(&mut a, &mut input_a);
            tick(&mut b, &mut input_b);
        }

        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.frame_count, b.frame_count);
        assert_eq!(a.falling.len(), b.falling.len());
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
    }

    proptest! {
        /// Bounds invariant: whatever the input script, the player never
        /// leaves the arena.
        #[test]
        fn prop_player_stays_in_bounds(
            seed in any::<u64>(),
            script in proptest::collection::vec(0u8..8, 1..400),
        ) {
            let mut state = GameState::new(seed);
            state.start(400.0, 400.0);
            let mut input = InputState::new();

            for step in script {
                if step & 1 != 0 { input.key_down("a") } else { input.key_up("a") }
                if step & 2 != 0 { input.key_down("d") } else { input.key_up("d") }
                if step & 4 != 0 { input.key_down("w") } else { input.key_up("w") }
                tick(&mut state, &mut input);

                let p = state.player.pos;
                prop_assert!(p.x >= 0.0 && p.x <= state.arena.max_x());
                prop_assert!(p.y >= 0.0 && p.y <= state.arena.max_y());
                prop_assert!(p.x.is_finite() && p.y.is_finite());
            }
        }
    }
}
