//! Procedural obstacle and pickup spawning
//!
//! Streaming spawner: the next obstacle is emitted once the most recently
//! spawned one has scrolled past a score-dependent gap threshold, so density
//! ramps smoothly with difficulty instead of running on a fixed timer.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::sim::state::{
    Behavior, Collectible, GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind, StompStage,
};

/// Spawn x just off the right edge
const SPAWN_X: f32 = FIELD_WIDTH + 40.0;

/// Gap the newest obstacle must clear before the next spawn. Shrinks
/// linearly with score and clamps at the floor.
pub fn spawn_gap(score: f64) -> f32 {
    let shrink = (score / SPAWN_GAP_SHRINK_DIVISOR) as f32;
    (SPAWN_GAP_START - shrink).max(SPAWN_GAP_FLOOR)
}

/// Frozen per-obstacle speed multiplier, taken from the score at spawn time
pub fn speed_multiplier(score: f64) -> f32 {
    1.0 + (score / OBSTACLE_SPEED_DIVISOR) as f32
}

/// True when the spawner should emit the next obstacle
pub fn should_spawn(state: &GameState) -> bool {
    match state.obstacles.last() {
        None => true,
        Some(last) => last.pos.x < FIELD_WIDTH - spawn_gap(state.score),
    }
}

/// Emit one obstacle plus, probabilistically, a companion pickup
pub fn spawn_obstacle(state: &mut GameState, cues: &mut Vec<AudioCue>) {
    let score = state.score;
    let player_y = state.player.pos.y;
    let kind = ObstacleKind::ALL[state.rng.random_range(0..ObstacleKind::ALL.len())];
    let id = state.next_entity_id();
    let obstacle = make_obstacle(id, kind, score, player_y, &mut state.rng);
    log::debug!(
        "spawn {:?} id={} speed_mult={:.2}",
        kind,
        id,
        obstacle.speed_mult
    );
    if kind == ObstacleKind::Missile {
        cues.push(AudioCue::MissileLaunch);
    }
    state.obstacles.push(obstacle);

    // Companion roll: power-up beats collectible, never both
    let roll: f32 = state.rng.random();
    if roll < POWERUP_CHANCE {
        spawn_powerup(state);
    } else if roll < POWERUP_CHANCE + COLLECTIBLE_CHANCE {
        spawn_collectible(state);
    }
}

fn make_obstacle(id: u32, kind: ObstacleKind, score: f64, player_y: f32, rng: &mut Pcg32) -> Obstacle {
    let speed_mult = speed_multiplier(score);
    let (width, height, y, behavior) = match kind {
        ObstacleKind::Spike => (30.0, 40.0, GROUND_Y - 40.0, Behavior::Fixed),
        ObstacleKind::Wall => (25.0, 70.0, GROUND_Y - 70.0, Behavior::Fixed),
        ObstacleKind::Drone => {
            let y = GROUND_Y - 90.0 - rng.random_range(0.0..80.0);
            (40.0, 25.0, y, Behavior::Fixed)
        }
        ObstacleKind::Mine => {
            let y = GROUND_Y - 70.0 - rng.random_range(0.0..90.0);
            let phase = rng.random_range(0.0..std::f32::consts::TAU);
            (28.0, 28.0, y, Behavior::Mine { phase })
        }
        ObstacleKind::Laser => {
            let y = GROUND_Y - 30.0 - rng.random_range(0.0..110.0);
            (
                110.0,
                10.0,
                y,
                Behavior::Laser {
                    timer_ms: 0.0,
                    active: false,
                },
            )
        }
        ObstacleKind::Saw => (44.0, 44.0, GROUND_Y - 44.0, Behavior::Saw { angle: 0.0 }),
        ObstacleKind::Stomp => (
            50.0,
            60.0,
            STOMP_REST_Y,
            Behavior::Stomp {
                stage: StompStage::Waiting,
                timer_ms: rng.random_range(STOMP_WAIT_MIN_MS..STOMP_WAIT_MAX_MS),
                impact_fired: false,
            },
        ),
        ObstacleKind::Missile => {
            // Intercepts at the player's current height
            let y = player_y + PLAYER_SIZE / 2.0 - 7.0;
            let extra_speed = rng.random_range(MISSILE_EXTRA_MIN..MISSILE_EXTRA_MAX);
            (34.0, 14.0, y, Behavior::Missile { extra_speed })
        }
    };

    Obstacle {
        id,
        pos: Vec2::new(SPAWN_X, y),
        base_y: y,
        width,
        height,
        kind,
        speed_mult,
        behavior,
    }
}

fn spawn_powerup(state: &mut GameState) {
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let y = pickup_y(&mut state.rng);
    let id = state.next_entity_id();
    state.powerups.push(PowerUp {
        id,
        pos: Vec2::new(SPAWN_X + 80.0, y),
        size: 24.0,
        kind,
        collected: false,
    });
}

fn spawn_collectible(state: &mut GameState) {
    let y = pickup_y(&mut state.rng);
    let id = state.next_entity_id();
    state.collectibles.push(Collectible {
        id,
        pos: Vec2::new(SPAWN_X + 80.0, y),
        size: 18.0,
        collected: false,
    });
}

/// Jump-reachable height ahead of the obstacle
fn pickup_y(rng: &mut Pcg32) -> f32 {
    GROUND_Y - 60.0 - rng.random_range(0.0..70.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_shrinks_to_floor() {
        assert_eq!(spawn_gap(0.0), SPAWN_GAP_START);
        assert!(spawn_gap(600.0) < SPAWN_GAP_START);
        assert_eq!(spawn_gap(1_000_000.0), SPAWN_GAP_FLOOR);
        // Never below the floor
        assert!(spawn_gap(50_000.0) >= SPAWN_GAP_FLOOR);
    }

    #[test]
    fn test_speed_multiplier_formula() {
        assert_eq!(speed_multiplier(0.0), 1.0);
        assert_eq!(speed_multiplier(2000.0), 3.0);
        assert_eq!(speed_multiplier(500.0), 1.5);
    }

    #[test]
    fn test_should_spawn_when_empty() {
        let state = GameState::new(1);
        assert!(should_spawn(&state));
    }

    #[test]
    fn test_companion_rolls_are_exclusive() {
        let mut state = GameState::new(42);
        let mut cues = Vec::new();
        for _ in 0..400 {
            let powerups_before = state.powerups.len();
            let collectibles_before = state.collectibles.len();
            spawn_obstacle(&mut state, &mut cues);
            let gained =
                (state.powerups.len() - powerups_before) + (state.collectibles.len() - collectibles_before);
            assert!(gained <= 1);
        }
        // With ~15% each over 400 rolls, both kinds must have appeared
        assert!(!state.powerups.is_empty());
        assert!(!state.collectibles.is_empty());
        assert_eq!(state.obstacles.len(), 400);
    }

    #[test]
    fn test_missile_spawns_at_player_height() {
        let mut state = GameState::new(7);
        state.player.pos.y = 200.0;
        let mut rng = state.rng.clone();
        let missile = make_obstacle(1, ObstacleKind::Missile, 0.0, state.player.pos.y, &mut rng);
        let missile_mid = missile.pos.y + missile.height / 2.0;
        let player_mid = 200.0 + PLAYER_SIZE / 2.0;
        assert!((missile_mid - player_mid).abs() < 1e-5);
    }

    #[test]
    fn test_stomp_spawns_waiting_with_countdown() {
        let mut state = GameState::new(9);
        let ob = make_obstacle(1, ObstacleKind::Stomp, 0.0, 0.0, &mut state.rng);
        match ob.behavior {
            Behavior::Stomp {
                stage,
                timer_ms,
                impact_fired,
            } => {
                assert_eq!(stage, StompStage::Waiting);
                assert!((STOMP_WAIT_MIN_MS..STOMP_WAIT_MAX_MS).contains(&timer_ms));
                assert!(!impact_fired);
            }
            other => panic!("expected stomp behavior, got {other:?}"),
        }
    }
}
