//! Collision predicates
//!
//! Everything is circles: lethal contact is a combined-radius overlap test,
//! and collection is a band check for the player passing above a hazard.

use glam::Vec2;

use crate::consts::COLLECT_BAND;

/// Circle overlap test on center positions
#[inline]
pub fn circles_collide(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let combined = a_radius + b_radius;
    a.distance_squared(b) < combined * combined
}

/// True when the player center is horizontally within the collection band
/// and strictly above the hazard center (the "jumped over it" condition).
#[inline]
pub fn in_collection_band(player_center: Vec2, hazard_center: Vec2) -> bool {
    (player_center.x - hazard_center.x).abs() < COLLECT_BAND && hazard_center.y > player_center.y
}
