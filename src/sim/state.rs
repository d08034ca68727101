//! Entity model and session state
//!
//! Everything the simulation mutates per tick lives on `GameState`. Nothing
//! here is persisted; a session reset rebuilds the world from scratch.

use std::collections::HashSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;
use crate::sim::collision::Rect;
use crate::sim::registry::{PowerUpHud, PowerUpRegistry};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Idle, waiting for the host to start a run
    Start,
    /// Active gameplay (includes the slow-motion death sequence)
    Playing,
    /// Run ended, final score reported
    GameOver,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUpKind {
    /// Absorbs one hazard hit
    Shield,
    /// Faster horizontal movement, dash trail
    Boost,
    /// x2.5 passive accrual, flat 300 collectibles
    Multiplier,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [Self::Shield, Self::Boost, Self::Multiplier];

    /// Slot index for the timer registry
    pub(crate) fn slot(self) -> usize {
        match self {
            Self::Shield => 0,
            Self::Boost => 1,
            Self::Multiplier => 2,
        }
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObstacleKind {
    Spike,
    Wall,
    Drone,
    Mine,
    Laser,
    Saw,
    Stomp,
    Missile,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 8] = [
        Self::Spike,
        Self::Wall,
        Self::Drone,
        Self::Mine,
        Self::Laser,
        Self::Saw,
        Self::Stomp,
        Self::Missile,
    ];
}

/// Stomp crusher cycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StompStage {
    Waiting,
    Dropping,
    Rising,
}

/// Per-type behavior state. Each variant carries exactly the fields its
/// state machine needs; spike, wall and drone need none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Behavior {
    Fixed,
    /// Phase offset so mines spawned together never bob in sync
    Mine { phase: f32 },
    /// Timer accumulates simulated time and flips `active` every cycle;
    /// only the active state is collidable
    Laser { timer_ms: f64, active: bool },
    /// Accumulated rotation, cosmetic only (hitbox stays the full rect)
    Saw { angle: f32 },
    Stomp {
        stage: StompStage,
        timer_ms: f64,
        /// One-shot guard so the ground impact fires exactly once per drop
        impact_fired: bool,
    },
    /// Extra leftward speed on top of the world scroll, fixed at spawn
    Missile { extra_speed: f32 },
}

/// A hazard entity
#[derive(Debug, Clone, Serialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Vertical anchor for bobbing/stomp kinds (spawn-time y)
    pub base_y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: ObstacleKind,
    /// Frozen at spawn from the score at that moment; never updated after
    pub speed_mult: f32,
    pub behavior: Behavior,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + self.height / 2.0)
    }
}

/// A score pickup
#[derive(Debug, Clone, Serialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
}

impl Collectible {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// A timed-effect pickup
#[derive(Debug, Clone, Serialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub size: f32,
    pub kind: PowerUpKind,
    pub collected: bool,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }
}

/// Visual grouping for particles (render hint only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticleKind {
    Spark,
    Dust,
    Heart,
    Shield,
    Shard,
}

/// A particle for visual effects; never affects gameplay
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining life in ticks (a countdown, not wall-clock time)
    pub life: f32,
    /// Palette index for the renderer
    pub color: u32,
    pub size: f32,
    pub kind: ParticleKind,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Dash trail ring size (BOOST rendering aid)
pub const DASH_TRAIL_LENGTH: usize = 12;

/// The player avatar
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub airborne: bool,
    /// -1.0 or 1.0, last nonzero input direction
    pub facing: f32,
    /// Hazard checks are skipped entirely while now < this
    pub invincible_until: f64,
    pub dying: bool,
    /// Ghost positions recorded while BOOST is active (newest first)
    pub dash_trail: Vec<Vec2>,
}

impl Player {
    fn new() -> Self {
        Self {
            pos: Vec2::new(120.0, GROUND_Y - PLAYER_SIZE),
            vel: Vec2::ZERO,
            airborne: false,
            facing: 1.0,
            invincible_until: 0.0,
            dying: false,
            dash_trail: Vec::with_capacity(DASH_TRAIL_LENGTH),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, PLAYER_SIZE, PLAYER_SIZE)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.pos.x + PLAYER_SIZE / 2.0, self.pos.y + PLAYER_SIZE / 2.0)
    }

    /// Record current position to the dash trail (newest first)
    pub fn record_dash_trail(&mut self) {
        self.dash_trail.insert(0, self.pos);
        self.dash_trail.truncate(DASH_TRAIL_LENGTH);
    }

    /// Drain one trail entry; called on ticks without BOOST
    pub fn drain_dash_trail(&mut self) {
        self.dash_trail.pop();
    }
}

/// Discrete gameplay occurrences forwarded to the host, which turns them
/// into "social clout" bookkeeping outside this core
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SocialEvent {
    NearMiss,
    Collect,
    PowerUp(PowerUpKind),
    LevelUp(u32),
    GameOver { final_score: u64 },
}

/// Complete session state, owned exclusively by the simulation
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Monotone accumulator; truncate via `display_score` for the host
    pub score: f64,
    /// floor(score / 1000) + 1, tracked so each boundary fires once
    pub level: u32,
    /// Multiplier applied to every per-tick delta (slow motion on death)
    pub time_scale: f32,
    pub time_ticks: u64,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub powerups: Vec<PowerUp>,
    /// Visual particles, capped at MAX_PARTICLES
    pub particles: Vec<Particle>,
    pub registry: PowerUpRegistry,
    /// Obstacle ids already credited for a near-miss this session
    pub near_miss_credited: HashSet<u32>,
    /// Wall-clock deadline for the terminal game-over report
    pub death_report_at: Option<f64>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Start,
            score: 0.0,
            level: 1,
            time_scale: 1.0,
            time_ticks: 0,
            player: Player::new(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            registry: PowerUpRegistry::new(),
            near_miss_credited: HashSet::new(),
            death_report_at: None,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Truncated score for display and host reporting
    pub fn display_score(&self) -> u64 {
        self.score as u64
    }

    /// Full reset to the START-equivalent world
    fn reset_world(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.score = 0.0;
        self.level = 1;
        self.time_scale = 1.0;
        self.time_ticks = 0;
        self.player = Player::new();
        self.obstacles.clear();
        self.collectibles.clear();
        self.powerups.clear();
        self.particles.clear();
        self.registry.clear();
        self.near_miss_credited.clear();
        self.death_report_at = None;
        self.next_id = 1;
    }

    /// Begin a run. Always performs the full reset; a dying or stale
    /// simulation on the way in is logged and discarded so a corrupted
    /// mid-death state can never resume.
    pub fn start_session(&mut self) {
        if self.player.dying || self.death_report_at.is_some() {
            log::warn!("starting session over a mid-death simulation, resetting");
        }
        self.reset_world();
        self.phase = GamePhase::Playing;
        log::info!("session started (seed {})", self.seed);
    }

    /// Return to the idle state, discarding the run. Cancels any pending
    /// death report.
    pub fn reset_session(&mut self) {
        self.reset_world();
        self.phase = GamePhase::Start;
    }

    /// Host/renderer-facing view of this frame
    pub fn snapshot(&self, now_ms: f64) -> FrameSnapshot<'_> {
        FrameSnapshot {
            phase: self.phase,
            score: self.display_score(),
            level: self.level,
            time_scale: self.time_scale,
            player: &self.player,
            obstacles: &self.obstacles,
            collectibles: &self.collectibles,
            powerups: &self.powerups,
            particles: &self.particles,
            active_powerups: self.registry.hud_entries(now_ms),
        }
    }

    /// Scatter a cosmetic burst at `origin`. Uses the integer-hash trick
    /// rather than the session RNG: particles must not perturb gameplay
    /// determinism.
    pub(crate) fn spawn_burst(
        &mut self,
        origin: Vec2,
        count: usize,
        color: u32,
        kind: ParticleKind,
    ) {
        let seed = self.time_ticks as u32;
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                self.particles.remove(0);
            }
            let hash = seed.wrapping_mul(2654435761).wrapping_add(i as u32 * 7919);
            let r1 = (hash % 1000) as f32 / 1000.0;
            let r2 = ((hash >> 10) % 1000) as f32 / 1000.0;
            let r3 = ((hash >> 20) % 1000) as f32 / 1000.0;
            let angle = r1 * std::f32::consts::TAU;
            let speed = 2.0 + r2 * 4.0;
            self.particles.push(Particle {
                pos: origin,
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - 2.0),
                life: 20.0 + r3 * 25.0,
                color,
                size: 2.0 + r2 * 3.0,
                kind,
            });
        }
    }
}

/// Serializable view of one frame for the host/renderer
#[derive(Debug, Serialize)]
pub struct FrameSnapshot<'a> {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub time_scale: f32,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub powerups: &'a [PowerUp],
    pub particles: &'a [Particle],
    pub active_powerups: Vec<PowerUpHud>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_trail_bounded() {
        let mut player = Player::new();
        for _ in 0..40 {
            player.record_dash_trail();
        }
        assert_eq!(player.dash_trail.len(), DASH_TRAIL_LENGTH);
        player.drain_dash_trail();
        assert_eq!(player.dash_trail.len(), DASH_TRAIL_LENGTH - 1);
    }

    #[test]
    fn test_display_score_truncates() {
        let mut state = GameState::new(1);
        state.score = 1234.9;
        assert_eq!(state.display_score(), 1234);
    }

    #[test]
    fn test_start_session_discards_mid_death_state() {
        let mut state = GameState::new(1);
        state.start_session();
        state.player.dying = true;
        state.time_scale = DEATH_TIME_SCALE;
        state.death_report_at = Some(5000.0);

        state.start_session();
        assert!(!state.player.dying);
        assert_eq!(state.time_scale, 1.0);
        assert_eq!(state.death_report_at, None);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_particle_burst_respects_cap() {
        let mut state = GameState::new(1);
        for _ in 0..10 {
            state.spawn_burst(Vec2::new(100.0, 100.0), 40, 1, ParticleKind::Spark);
        }
        assert!(state.particles.len() <= MAX_PARTICLES);
    }
}
