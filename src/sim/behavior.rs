//! Per-type obstacle state machines
//!
//! Advanced once per tick, after player physics and before collision
//! resolution. Every obstacle also takes the world scroll. The scroll delta
//! is score-dependent and re-evaluated every tick, while each obstacle's
//! `speed_mult` stays frozen at its spawn value.

use glam::Vec2;
use rand::Rng;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::sim::state::{Behavior, GameState, ObstacleKind, ParticleKind, StompStage};

/// Obstacles and pickups are destroyed once fully past this x
const LEFT_CULL_X: f32 = -60.0;

/// World scroll delta for this tick
pub fn scroll_delta(score: f64, time_scale: f32) -> f32 {
    (SCROLL_BASE + (score / SCROLL_SCORE_DIVISOR) as f32) * time_scale
}

/// Advance every obstacle's motion/activation state by one tick
pub fn advance_obstacles(state: &mut GameState, now_ms: f64, cues: &mut Vec<AudioCue>) {
    let time_scale = state.time_scale;
    let scroll = scroll_delta(state.score, time_scale);
    let sim_ms = FRAME_MS * time_scale as f64;
    let mut impacts: Vec<Vec2> = Vec::new();

    for ob in state.obstacles.iter_mut() {
        ob.pos.x -= scroll * ob.speed_mult;

        match ob.behavior {
            Behavior::Fixed => {
                // Drone bobs around its anchor; phase mixes wall clock and x
                // so two drones on screen never sync
                if ob.kind == ObstacleKind::Drone {
                    let phase = (now_ms * 0.003) as f32 + ob.pos.x * 0.05;
                    ob.pos.y = ob.base_y + phase.sin() * DRONE_BOB_AMPLITUDE;
                }
            }
            Behavior::Mine { phase } => {
                let t = (now_ms * 0.004) as f32 + phase;
                ob.pos.y = ob.base_y + t.sin() * MINE_BOB_AMPLITUDE;
                ob.pos.x += (t * 0.5).cos() * MINE_DRIFT * time_scale;
            }
            Behavior::Laser {
                ref mut timer_ms,
                ref mut active,
            } => {
                *timer_ms += sim_ms;
                if *timer_ms >= LASER_CYCLE_MS {
                    *timer_ms -= LASER_CYCLE_MS;
                    *active = !*active;
                    if *active {
                        cues.push(AudioCue::LaserOn);
                    }
                }
            }
            Behavior::Saw { ref mut angle } => {
                *angle += SAW_SPIN_RATE * time_scale;
            }
            Behavior::Stomp {
                ref mut stage,
                ref mut timer_ms,
                ref mut impact_fired,
            } => match stage {
                StompStage::Waiting => {
                    *timer_ms -= sim_ms;
                    if *timer_ms <= 0.0 {
                        *stage = StompStage::Dropping;
                        *timer_ms = 0.0;
                    }
                }
                StompStage::Dropping => {
                    let floor_y = GROUND_Y - ob.height;
                    ob.pos.y = (ob.pos.y + STOMP_DROP_RATE * time_scale).min(floor_y);
                    if ob.pos.y >= floor_y {
                        if !*impact_fired {
                            *impact_fired = true;
                            cues.push(AudioCue::StompImpact);
                            impacts.push(Vec2::new(ob.pos.x + ob.width / 2.0, GROUND_Y));
                        }
                        *timer_ms += sim_ms;
                        if *timer_ms >= STOMP_PAUSE_MS {
                            *stage = StompStage::Rising;
                            *timer_ms = 0.0;
                        }
                    }
                }
                StompStage::Rising => {
                    ob.pos.y -= STOMP_RISE_RATE * time_scale;
                    if ob.pos.y <= ob.base_y {
                        ob.pos.y = ob.base_y;
                        *stage = StompStage::Waiting;
                        *timer_ms = state.rng.random_range(STOMP_WAIT_MIN_MS..STOMP_WAIT_MAX_MS);
                        *impact_fired = false;
                    }
                }
            },
            Behavior::Missile { extra_speed } => {
                ob.pos.x -= extra_speed * time_scale;
            }
        }
    }

    state
        .obstacles
        .retain(|ob| ob.pos.x + ob.width > LEFT_CULL_X);

    for impact in impacts {
        state.spawn_burst(impact, 10, 6, ParticleKind::Dust);
    }
}

/// Pickups ride the world scroll (no per-instance multiplier) and vanish
/// past the left boundary
pub fn advance_pickups(state: &mut GameState) {
    let scroll = scroll_delta(state.score, state.time_scale);
    for collectible in &mut state.collectibles {
        collectible.pos.x -= scroll;
    }
    for powerup in &mut state.powerups {
        powerup.pos.x -= scroll;
    }
    state
        .collectibles
        .retain(|c| c.pos.x + c.size > LEFT_CULL_X);
    state.powerups.retain(|p| p.pos.x + p.size > LEFT_CULL_X);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    /// Obstacle pinned in place (speed_mult 0) so long cycles stay on field
    fn pinned(kind: ObstacleKind, behavior: Behavior, y: f32, height: f32) -> Obstacle {
        Obstacle {
            id: 1,
            pos: Vec2::new(400.0, y),
            base_y: y,
            width: 50.0,
            height,
            kind,
            speed_mult: 0.0,
            behavior,
        }
    }

    fn run_ticks(state: &mut GameState, ticks: u64, cues: &mut Vec<AudioCue>) {
        for t in 0..ticks {
            advance_obstacles(state, t as f64 * FRAME_MS, cues);
        }
    }

    #[test]
    fn test_scroll_delta_formula() {
        assert_eq!(scroll_delta(0.0, 1.0), SCROLL_BASE);
        assert_eq!(scroll_delta(1200.0, 1.0), SCROLL_BASE + 1.0);
        assert!((scroll_delta(1200.0, 0.15) - (SCROLL_BASE + 1.0) * 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_laser_flips_every_cycle() {
        let mut state = GameState::new(1);
        state.obstacles.push(pinned(
            ObstacleKind::Laser,
            Behavior::Laser {
                timer_ms: 0.0,
                active: false,
            },
            200.0,
            10.0,
        ));

        let mut cues = Vec::new();
        // A hair over one cycle: exactly one activation
        run_ticks(&mut state, 125, &mut cues);
        assert_eq!(
            cues.iter().filter(|c| **c == AudioCue::LaserOn).count(),
            1
        );
        assert!(matches!(
            state.obstacles[0].behavior,
            Behavior::Laser { active: true, .. }
        ));

        // Two more cycles: off again, then back on (second cue)
        run_ticks(&mut state, 245, &mut cues);
        assert_eq!(
            cues.iter().filter(|c| **c == AudioCue::LaserOn).count(),
            2
        );
    }

    #[test]
    fn test_stomp_full_cycle_fires_impact_once() {
        let mut state = GameState::new(1);
        state.obstacles.push(pinned(
            ObstacleKind::Stomp,
            Behavior::Stomp {
                stage: StompStage::Waiting,
                timer_ms: 100.0,
                impact_fired: false,
            },
            STOMP_REST_Y,
            60.0,
        ));

        let mut cues = Vec::new();
        run_ticks(&mut state, 200, &mut cues);

        assert_eq!(
            cues.iter()
                .filter(|c| **c == AudioCue::StompImpact)
                .count(),
            1
        );
        // Back at rest, re-armed for the next drop
        match state.obstacles[0].behavior {
            Behavior::Stomp {
                stage,
                timer_ms,
                impact_fired,
            } => {
                assert_eq!(stage, StompStage::Waiting);
                assert!(timer_ms > 0.0);
                assert!(!impact_fired);
            }
            other => panic!("expected stomp behavior, got {other:?}"),
        }
        assert_eq!(state.obstacles[0].pos.y, STOMP_REST_Y);
    }

    #[test]
    fn test_missile_outruns_plain_scroll() {
        let mut state = GameState::new(1);
        let mut fixed = pinned(ObstacleKind::Wall, Behavior::Fixed, 270.0, 70.0);
        fixed.speed_mult = 1.0;
        let mut missile = pinned(
            ObstacleKind::Missile,
            Behavior::Missile { extra_speed: 3.0 },
            300.0,
            14.0,
        );
        missile.speed_mult = 1.0;
        state.obstacles.push(fixed);
        state.obstacles.push(missile);

        let mut cues = Vec::new();
        advance_obstacles(&mut state, 0.0, &mut cues);

        let fixed_x = state.obstacles[0].pos.x;
        let missile_x = state.obstacles[1].pos.x;
        assert!((400.0 - fixed_x - SCROLL_BASE).abs() < 1e-5);
        assert!((400.0 - missile_x - (SCROLL_BASE + 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_offscreen_obstacles_culled() {
        let mut state = GameState::new(1);
        let mut gone = pinned(ObstacleKind::Spike, Behavior::Fixed, 300.0, 40.0);
        gone.pos.x = -200.0;
        state.obstacles.push(gone);

        let mut cues = Vec::new();
        advance_obstacles(&mut state, 0.0, &mut cues);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_drone_bobs_around_anchor() {
        let mut state = GameState::new(1);
        state.obstacles.push(pinned(
            ObstacleKind::Drone,
            Behavior::Fixed,
            220.0,
            25.0,
        ));

        let mut cues = Vec::new();
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        for t in 0..240u64 {
            advance_obstacles(&mut state, t as f64 * FRAME_MS, &mut cues);
            min_y = min_y.min(state.obstacles[0].pos.y);
            max_y = max_y.max(state.obstacles[0].pos.y);
        }
        assert!(min_y < 220.0 && max_y > 220.0);
        assert!(max_y - min_y <= 2.0 * DRONE_BOB_AMPLITUDE + 1e-3);
        assert_eq!(state.obstacles[0].base_y, 220.0);
    }
}
