//! Hit geometry for the flat play field
//!
//! Everything is axis-aligned boxes except two deliberate specials: the
//! near-miss check (center distance, looser than any hitbox, evaluated on
//! its own) and the laser beam (a narrow vertical band that only counts
//! while the beam is on).

use glam::Vec2;
use serde::Serialize;

use crate::consts::{HAZARD_MARGIN, LASER_BAND_HALF, NEAR_MISS_PAD, PLAYER_SIZE};
use crate::sim::state::{Behavior, Obstacle};

/// Axis-aligned box, top-left anchored (screen coordinates, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Shrink by `m` on each side (negative grows)
    pub fn inset(&self, m: f32) -> Rect {
        Rect::new(self.x + m, self.y + m, self.w - 2.0 * m, self.h - 2.0 * m)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Near-miss: player center within PLAYER_SIZE + pad of the obstacle center.
/// Looser than the hit boxes, so it can fire before or alongside a real hit
/// on the same obstacle.
pub fn near_miss(player_center: Vec2, obstacle_center: Vec2) -> bool {
    player_center.distance(obstacle_center) <= PLAYER_SIZE + NEAR_MISS_PAD
}

/// Hazard hit test. Hazard boxes shrink by the margin on each side; the
/// laser instead requires its active state and a narrow band around the
/// beam line.
pub fn hazard_hit(player: &Rect, obstacle: &Obstacle) -> bool {
    match obstacle.behavior {
        Behavior::Laser { active, .. } => {
            if !active {
                return false;
            }
            let beam = obstacle.rect();
            let horizontal = player.x < beam.x + beam.w && player.x + player.w > beam.x;
            let player_mid_y = player.y + player.h / 2.0;
            let beam_mid_y = beam.y + beam.h / 2.0;
            horizontal && (player_mid_y - beam_mid_y).abs() <= LASER_BAND_HALF
        }
        _ => player.overlaps(&obstacle.rect().inset(HAZARD_MARGIN)),
    }
}

/// Pickup overlap: plain box test, no margin
pub fn pickup_hit(player: &Rect, pickup: &Rect) -> bool {
    player.overlaps(pickup)
}
