//! Clout Dash - a side-scrolling obstacle dodger
//!
//! Core modules:
//! - `sim`: deterministic simulation (physics, spawning, collisions, scoring)
//! - `audio`: fire-and-forget audio cue collaborator
//! - `content`: biome/chat content collaborator with local fallback
//! - `input`: held-state to edge-triggered input tracking
//! - `settings`: host-facing preferences

pub mod audio;
pub mod content;
pub mod input;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration at the 60 Hz target (ms)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Ground line; the player's feet rest here
    pub const GROUND_Y: f32 = 340.0;

    /// Player bounding box is a square of this side
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Horizontal speed per tick
    pub const PLAYER_MOVE_SPEED: f32 = 5.0;
    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.8;
    /// Vertical impulse on jump (negative = up)
    pub const JUMP_IMPULSE: f32 = -15.0;
    /// Horizontal speed factor while BOOST is active
    pub const BOOST_FACTOR: f32 = 1.8;

    /// World scroll per tick: SCROLL_BASE + score / SCROLL_SCORE_DIVISOR
    pub const SCROLL_BASE: f32 = 6.0;
    pub const SCROLL_SCORE_DIVISOR: f64 = 1200.0;

    /// Spawn gap starts wide, shrinks with score, clamps at the floor
    pub const SPAWN_GAP_START: f32 = 420.0;
    pub const SPAWN_GAP_FLOOR: f32 = 240.0;
    /// Gap loses one pixel per this much score
    pub const SPAWN_GAP_SHRINK_DIVISOR: f64 = 12.0;
    /// Frozen obstacle speed multiplier: 1 + spawn_score / this
    pub const OBSTACLE_SPEED_DIVISOR: f64 = 1000.0;
    /// Companion roll per obstacle spawn (power-up wins, never both)
    pub const POWERUP_CHANCE: f32 = 0.15;
    pub const COLLECTIBLE_CHANCE: f32 = 0.15;

    /// Passive score per tick (before time scale and multiplier)
    pub const PASSIVE_ACCRUAL: f64 = 0.6;
    /// MULTIPLIER scales passive accrual by this factor
    pub const MULTIPLIER_ACCRUAL: f64 = 2.5;
    pub const NEAR_MISS_BONUS: f64 = 500.0;
    /// Near-miss radius: PLAYER_SIZE + this pad
    pub const NEAR_MISS_PAD: f32 = 25.0;
    pub const COLLECTIBLE_VALUE: f64 = 100.0;
    /// Flat boosted value while MULTIPLIER is active (not a literal 2.5x)
    pub const COLLECTIBLE_VALUE_BOOSTED: f64 = 300.0;
    /// One level per this much score
    pub const LEVEL_SCORE_STEP: f64 = 1000.0;

    /// Active power-up window
    pub const POWERUP_DURATION_MS: f64 = 8000.0;
    pub const LEVEL_UP_INVINCIBILITY_MS: f64 = 2000.0;
    pub const SHIELD_RECOVERY_MS: f64 = 1000.0;
    /// Real-time delay before the terminal game-over report.
    /// Deliberately not scaled by the slow-motion factor.
    pub const DEATH_REPORT_DELAY_MS: f64 = 1500.0;
    /// Laser flips active/inactive every this much simulated time
    pub const LASER_CYCLE_MS: f64 = 2000.0;

    /// Hazard boxes shrink by this margin on each side
    pub const HAZARD_MARGIN: f32 = 5.0;
    /// Laser beam vertical half-band for the hit test
    pub const LASER_BAND_HALF: f32 = 14.0;

    /// Slow-motion factor while the death sequence runs
    pub const DEATH_TIME_SCALE: f32 = 0.15;

    /// Obstacle motion tuning
    pub const DRONE_BOB_AMPLITUDE: f32 = 20.0;
    pub const MINE_BOB_AMPLITUDE: f32 = 16.0;
    pub const MINE_DRIFT: f32 = 0.8;
    /// Saw rotation per tick (radians), cosmetic only
    pub const SAW_SPIN_RATE: f32 = 0.25;

    /// Stomp crusher cycle
    pub const STOMP_REST_Y: f32 = -20.0;
    pub const STOMP_WAIT_MIN_MS: f64 = 1200.0;
    pub const STOMP_WAIT_MAX_MS: f64 = 3200.0;
    pub const STOMP_DROP_RATE: f32 = 9.0;
    pub const STOMP_PAUSE_MS: f64 = 400.0;
    pub const STOMP_RISE_RATE: f32 = 4.0;

    /// Missile extra speed range (per tick, on top of the world scroll)
    pub const MISSILE_EXTRA_MIN: f32 = 2.0;
    pub const MISSILE_EXTRA_MAX: f32 = 4.0;
}
