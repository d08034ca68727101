//! Clout Dash entry point
//!
//! Headless demo: runs a seeded session at a synthetic 60 Hz clock with a
//! tiny reactive bot on the stick, then prints the final score. Useful for
//! eyeballing the simulation and its collaborators without a renderer.

use clout_dash::Settings;
use clout_dash::audio::AudioMixer;
use clout_dash::consts::{FRAME_MS, GROUND_Y, PLAYER_SIZE};
use clout_dash::content::{ContentProvider, NoGenerator};
use clout_dash::input::{InputPoll, InputTracker};
use clout_dash::sim::{GamePhase, GameState, SocialEvent, tick};

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC10D);
    // Two minutes of simulated play, or until the run ends
    let max_ticks: u64 = 60 * 120;

    let settings = Settings::default();
    let mut state = GameState::new(seed);
    let mut tracker = InputTracker::new();
    let mut mixer = AudioMixer::disabled();
    mixer.set_master_volume(settings.master_volume);
    mixer.set_sfx_volume(settings.sfx_volume);
    mixer.set_muted(settings.muted);
    let mut content = ContentProvider::new(NoGenerator);

    state.start_session();
    let mut environment = content.request_environment(0, 0.0);
    log::info!("starting run in {}", environment.name);

    let mut social_clout: u64 = 0;
    for t in 0..max_ticks {
        let now_ms = t as f64 * FRAME_MS;
        let poll = bot_poll(&state);
        let input = tracker.sample(&poll);
        let out = tick(&mut state, &input, now_ms);

        for cue in &out.cues {
            mixer.play(*cue);
        }
        for event in &out.events {
            social_clout += clout_for(event);
            if let SocialEvent::LevelUp(level) = event {
                environment = content.request_environment(out.score, now_ms);
                log::info!("level {level}: biome is now {}", environment.name);
                for line in content.request_chat_lines(&environment.name, "level_up", now_ms) {
                    log::info!("chat <{}> {}", line.author, line.text);
                }
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!("final score: {}", state.display_score());
    println!("social clout: {social_clout}");
    println!("biomes seen: {}", content.history().join(", "));
}

/// Jump when the nearest ground-level hazard gets close; hold right
/// otherwise to keep pace with the field
fn bot_poll(state: &GameState) -> InputPoll {
    let player_x = state.player.pos.x;
    let nearest_threat = state
        .obstacles
        .iter()
        .filter(|ob| ob.pos.x > player_x && ob.pos.y + ob.height > GROUND_Y - PLAYER_SIZE * 1.5)
        .map(|ob| ob.pos.x - player_x)
        .fold(f32::INFINITY, f32::min);

    InputPoll {
        left: false,
        right: true,
        jump: nearest_threat < 140.0,
    }
}

/// The host-side "social clout" weighting for each event
fn clout_for(event: &SocialEvent) -> u64 {
    match event {
        SocialEvent::NearMiss => 5,
        SocialEvent::Collect => 1,
        SocialEvent::PowerUp(_) => 2,
        SocialEvent::LevelUp(_) => 10,
        SocialEvent::GameOver { .. } => 0,
    }
}
