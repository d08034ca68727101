//! Active power-up timing
//!
//! Tracks one absolute expiry timestamp per power-up type. Reapplying a type
//! refreshes its expiry rather than stacking a second instance. The registry
//! is an explicit owned object threaded into the subsystems that touch it
//! (the collision engine writes, the HUD projection reads); it is never
//! ambient global state.

use serde::Serialize;

use crate::consts::POWERUP_DURATION_MS;
use crate::sim::state::PowerUpKind;

/// HUD-facing projection of one active effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerUpHud {
    pub kind: PowerUpKind,
    pub time_left_ms: f64,
    /// 1.0 at activation, 0.0 at expiry
    pub percent: f32,
}

/// Expiry slots keyed by power-up type
#[derive(Debug, Clone, Default)]
pub struct PowerUpRegistry {
    expiries: [Option<f64>; 3],
}

impl PowerUpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or refresh the expiry for `kind` to now + the standard duration
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64) {
        self.expiries[kind.slot()] = Some(now_ms + POWERUP_DURATION_MS);
    }

    pub fn is_active(&self, kind: PowerUpKind, now_ms: f64) -> bool {
        matches!(self.expiries[kind.slot()], Some(expiry) if now_ms <= expiry)
    }

    /// Remove an entry before its expiry (shield absorption)
    pub fn consume(&mut self, kind: PowerUpKind) {
        self.expiries[kind.slot()] = None;
    }

    /// Drop entries whose expiry has passed
    pub fn purge_expired(&mut self, now_ms: f64) {
        for slot in &mut self.expiries {
            if matches!(slot, Some(expiry) if now_ms > *expiry) {
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.expiries = [None; 3];
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.iter().all(Option::is_none)
    }

    pub fn time_left_ms(&self, kind: PowerUpKind, now_ms: f64) -> Option<f64> {
        self.expiries[kind.slot()].map(|expiry| (expiry - now_ms).max(0.0))
    }

    /// Remaining entries as HUD rows
    pub fn hud_entries(&self, now_ms: f64) -> Vec<PowerUpHud> {
        PowerUpKind::ALL
            .iter()
            .filter_map(|&kind| {
                self.time_left_ms(kind, now_ms).map(|left| PowerUpHud {
                    kind,
                    time_left_ms: left,
                    percent: (left / POWERUP_DURATION_MS).clamp(0.0, 1.0) as f32,
                })
            })
            .collect()
    }
}
