//! The per-frame simulation tick
//!
//! Order within one tick is fixed: player physics, spawning, obstacle
//! behaviors, collision/scoring (near-miss, then pickups, then hazards),
//! registry purge, passive accrual, level-ups, particles. Later collision
//! stages are skipped once death has triggered on this run.

use glam::Vec2;

use crate::audio::AudioCue;
use crate::consts::*;
use crate::sim::behavior::{advance_obstacles, advance_pickups};
use crate::sim::collision::{hazard_hit, near_miss, pickup_hit};
use crate::sim::spawn::{should_spawn, spawn_obstacle};
use crate::sim::state::{
    GamePhase, GameState, ObstacleKind, ParticleKind, PowerUpKind, SocialEvent,
};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Edge-triggered: true only on the tick the jump was pressed
    pub jump: bool,
}

/// Everything the host consumes from one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    /// Truncated score after this tick
    pub score: u64,
    pub events: Vec<SocialEvent>,
    /// Fire-and-forget audio cues
    pub cues: Vec<AudioCue>,
}

/// Advance the session by one tick at wall-clock `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) -> TickOutput {
    let mut out = TickOutput {
        score: state.display_score(),
        ..Default::default()
    };

    if state.phase != GamePhase::Playing {
        return out;
    }

    // Terminal transition of the death sequence. Compared against real time
    // on purpose: slow motion must not stretch the game-over pacing.
    if let Some(deadline) = state.death_report_at {
        if now_ms >= deadline {
            state.death_report_at = None;
            state.phase = GamePhase::GameOver;
            let final_score = state.display_score();
            out.events.push(SocialEvent::GameOver { final_score });
            out.score = final_score;
            log::info!("game over, final score {final_score}");
            return out;
        }
    }

    state.time_ticks += 1;

    step_player(state, input, now_ms, &mut out);

    if should_spawn(state) {
        spawn_obstacle(state, &mut out.cues);
    }

    advance_obstacles(state, now_ms, &mut out.cues);
    advance_pickups(state);

    if !state.player.dying {
        resolve_collisions(state, now_ms, &mut out);
    }

    state.registry.purge_expired(now_ms);

    // Passive accrual, slow-motion scaled, x2.5 while MULTIPLIER is active
    let mut accrual = PASSIVE_ACCRUAL * state.time_scale as f64;
    if state.registry.is_active(PowerUpKind::Multiplier, now_ms) {
        accrual *= MULTIPLIER_ACCRUAL;
    }
    state.score += accrual;

    check_level_up(state, now_ms, &mut out);
    step_particles(state);

    out.score = state.display_score();
    out
}

fn step_player(state: &mut GameState, input: &TickInput, now_ms: f64, out: &mut TickOutput) {
    let ts = state.time_scale;
    let boost = state.registry.is_active(PowerUpKind::Boost, now_ms);

    // Held direction; the dying player keeps falling but stops steering
    let dir = if state.player.dying {
        0.0
    } else if input.left && !input.right {
        -1.0
    } else if input.right && !input.left {
        1.0
    } else {
        0.0
    };

    if dir != 0.0 {
        state.player.facing = dir;
    }
    let speed = PLAYER_MOVE_SPEED * if boost { BOOST_FACTOR } else { 1.0 };
    state.player.vel.x = dir * speed;
    state.player.pos.x =
        (state.player.pos.x + state.player.vel.x * ts).clamp(0.0, FIELD_WIDTH - PLAYER_SIZE);

    // Jump only from the ground; repeat presses while airborne are no-ops
    if input.jump && !state.player.airborne && !state.player.dying {
        state.player.vel.y = JUMP_IMPULSE;
        state.player.airborne = true;
        out.cues.push(AudioCue::Jump);
        let feet = Vec2::new(state.player.pos.x + PLAYER_SIZE / 2.0, GROUND_Y);
        state.spawn_burst(feet, 6, 7, ParticleKind::Dust);
    }

    state.player.vel.y += GRAVITY * ts;
    state.player.pos.y += state.player.vel.y * ts;

    let ground = GROUND_Y - PLAYER_SIZE;
    if state.player.pos.y >= ground {
        state.player.pos.y = ground;
        state.player.vel.y = 0.0;
        state.player.airborne = false;
    }

    // Dash trail only accumulates under BOOST and drains otherwise
    if boost && !state.player.dying {
        state.player.record_dash_trail();
    } else {
        state.player.drain_dash_trail();
    }
}

fn resolve_collisions(state: &mut GameState, now_ms: f64, out: &mut TickOutput) {
    let player_rect = state.player.rect();
    let player_center = state.player.center();

    // 1. Near-miss. Looser than any hitbox and evaluated on its own, so it
    // can fire before or alongside a real hit on the same obstacle. Credited
    // at most once per obstacle id per session.
    for ob in &state.obstacles {
        if state.near_miss_credited.contains(&ob.id) {
            continue;
        }
        if near_miss(player_center, ob.center()) {
            state.near_miss_credited.insert(ob.id);
            state.score += NEAR_MISS_BONUS;
            out.events.push(SocialEvent::NearMiss);
        }
    }

    // 2. Pickups: plain box overlap, no margin
    let mut activated: Vec<PowerUpKind> = Vec::new();
    for powerup in &mut state.powerups {
        if !powerup.collected && pickup_hit(&player_rect, &powerup.rect()) {
            powerup.collected = true;
            activated.push(powerup.kind);
        }
    }
    for kind in activated {
        state.registry.activate(kind, now_ms);
        out.events.push(SocialEvent::PowerUp(kind));
        out.cues.push(match kind {
            PowerUpKind::Shield => AudioCue::ShieldActivate,
            PowerUpKind::Boost => AudioCue::BoostActivate,
            PowerUpKind::Multiplier => AudioCue::MultiplierActivate,
        });
        state.spawn_burst(player_center, 12, 4, ParticleKind::Spark);
    }
    state.powerups.retain(|p| !p.collected);

    let mut collected = 0usize;
    for collectible in &mut state.collectibles {
        if !collectible.collected && pickup_hit(&player_rect, &collectible.rect()) {
            collectible.collected = true;
            collected += 1;
        }
    }
    if collected > 0 {
        let value = if state.registry.is_active(PowerUpKind::Multiplier, now_ms) {
            COLLECTIBLE_VALUE_BOOSTED
        } else {
            COLLECTIBLE_VALUE
        };
        for _ in 0..collected {
            state.score += value;
            out.events.push(SocialEvent::Collect);
            out.cues.push(AudioCue::Collect);
        }
        state.spawn_burst(player_center, 8, 3, ParticleKind::Heart);
    }
    state.collectibles.retain(|c| !c.collected);

    // 3. Hazards. Skipped wholesale inside the invincibility window;
    // near-miss and pickups above are unaffected by it.
    if now_ms < state.player.invincible_until {
        return;
    }

    let mut absorbed: Option<(u32, Vec2)> = None;
    let mut death_at: Option<Vec2> = None;
    for ob in &state.obstacles {
        if hazard_hit(&player_rect, ob) {
            if state.registry.is_active(PowerUpKind::Shield, now_ms) {
                absorbed = Some((ob.id, ob.center()));
            } else {
                death_at = Some(ob.center());
            }
            // First hit settles the tick: the shield grants invincibility,
            // death is idempotent
            break;
        }
    }

    if let Some((id, at)) = absorbed {
        state.registry.consume(PowerUpKind::Shield);
        state.player.invincible_until = now_ms + SHIELD_RECOVERY_MS;
        // The laser can't be shoved away; it simply can't hit again until
        // its next active cycle
        if let Some(ob) = state.obstacles.iter_mut().find(|o| o.id == id)
            && ob.kind != ObstacleKind::Laser
        {
            ob.pos.x = -FIELD_WIDTH;
        }
        out.cues.push(AudioCue::ShieldBreak);
        state.spawn_burst(at, 16, 5, ParticleKind::Shield);
    } else if let Some(at) = death_at {
        enter_death(state, now_ms, at, out);
    }
}

fn enter_death(state: &mut GameState, now_ms: f64, impact: Vec2, out: &mut TickOutput) {
    if state.player.dying {
        return;
    }
    state.player.dying = true;
    state.time_scale = DEATH_TIME_SCALE;
    state.death_report_at = Some(now_ms + DEATH_REPORT_DELAY_MS);
    out.cues.push(AudioCue::GameOver);
    state.spawn_burst(impact, 40, 2, ParticleKind::Shard);
    log::info!("death at score {}", state.display_score());
}

fn check_level_up(state: &mut GameState, now_ms: f64, out: &mut TickOutput) {
    let target = (state.score / LEVEL_SCORE_STEP) as u32 + 1;
    // One event per boundary, even when a single tick crosses several
    while state.level < target {
        state.level += 1;
        state.player.invincible_until = now_ms + LEVEL_UP_INVINCIBILITY_MS;
        out.events.push(SocialEvent::LevelUp(state.level));
        out.cues.push(AudioCue::LevelUp);
        log::info!("level up -> {}", state.level);
    }
}

fn step_particles(state: &mut GameState) {
    let ts = state.time_scale;
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * ts;
        particle.vel.y += 0.3 * ts;
        particle.vel *= 0.98;
        particle.life -= ts;
    }
    state.particles.retain(|p| p.life > 0.0);
}
