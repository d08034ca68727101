//! Host preferences
//!
//! Nothing here is persisted by the core; the host round-trips the JSON
//! form wherever it likes.

use serde::{Deserialize, Serialize};

use crate::sim::state::{DASH_TRAIL_LENGTH, MAX_PARTICLES};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Particle budget for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => MAX_PARTICLES / 4,
            QualityPreset::Medium => MAX_PARTICLES / 2,
            QualityPreset::High => MAX_PARTICLES,
        }
    }

    /// Dash trail fidelity (1.0 = full ring)
    pub fn trail_quality(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects on/off
    pub particles: bool,
    /// Reduced motion (minimize shake and flashes)
    pub reduced_motion: bool,

    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            reduced_motion: false,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Dash trail entries the renderer should draw
    pub fn trail_length(&self) -> usize {
        (DASH_TRAIL_LENGTH as f32 * self.quality.trail_quality()).round() as usize
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".into())
    }

    /// Parse host-supplied JSON; malformed input falls back to defaults
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("bad settings payload ({err}), using defaults");
            Self::default()
        })
    }
}
