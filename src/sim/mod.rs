//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per host frame callback, synthetic `now_ms` timestamps only
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies; collaborators consume
//!   the event/cue output of `tick` instead

pub mod behavior;
pub mod collision;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use registry::{PowerUpHud, PowerUpRegistry};
pub use state::{
    Behavior, Collectible, FrameSnapshot, GamePhase, GameState, Obstacle, ObstacleKind, Particle,
    ParticleKind, Player, PowerUp, PowerUpKind, SocialEvent, StompStage,
};
pub use tick::{TickInput, TickOutput, tick};
