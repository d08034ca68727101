//! Audio cue collaborator
//!
//! Procedurally designed sound effects; no sample files. The simulation
//! emits `AudioCue`s in its tick output and never waits on playback. The
//! mixer turns each cue into one or two tone specs on whatever backend the
//! host plugs in; without a backend every cue is a no-op.

use serde::Serialize;

/// Named gameplay sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AudioCue {
    /// Player left the ground
    Jump,
    /// Collectible picked up
    Collect,
    /// Score boundary crossed
    LevelUp,
    /// SHIELD power-up picked up
    ShieldActivate,
    /// Shield consumed absorbing a hit
    ShieldBreak,
    /// BOOST power-up picked up
    BoostActivate,
    /// MULTIPLIER power-up picked up
    MultiplierActivate,
    /// Stomp crusher reached the ground
    StompImpact,
    /// Laser beam switched on
    LaserOn,
    /// Missile entered the field
    MissileLaunch,
    /// Death sequence started
    GameOver,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One tone: a frequency sweep with a gain envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_freq: f32,
    pub end_freq: f32,
    pub duration_ms: f32,
    pub gain: f32,
    pub waveform: Waveform,
}

/// Playback sink. Implementations must not block; the mixer fires and
/// forgets.
pub trait AudioBackend {
    fn play_tone(&mut self, tone: Tone);
}

/// Audio manager; owns volumes and the optional backend
pub struct AudioMixer {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl AudioMixer {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend: Some(backend),
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Mixer with no sink attached; every cue is dropped silently
    pub fn disabled() -> Self {
        Self {
            backend: None,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a cue. Fire-and-forget: the result of playback is never checked.
    pub fn play(&mut self, cue: AudioCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        for mut tone in tones_for(cue) {
            tone.gain *= vol;
            backend.play_tone(tone);
        }
    }
}

/// Per-cue sound design
fn tones_for(cue: AudioCue) -> Vec<Tone> {
    let tone = |start_freq: f32, end_freq: f32, duration_ms: f32, gain: f32, waveform| Tone {
        start_freq,
        end_freq,
        duration_ms,
        gain,
        waveform,
    };

    match cue {
        // Quick upward chirp
        AudioCue::Jump => vec![tone(280.0, 520.0, 90.0, 0.5, Waveform::Sine)],
        // Bright double blip
        AudioCue::Collect => vec![
            tone(660.0, 660.0, 50.0, 0.45, Waveform::Square),
            tone(990.0, 990.0, 70.0, 0.4, Waveform::Square),
        ],
        // Ascending fanfare
        AudioCue::LevelUp => vec![
            tone(523.0, 523.0, 90.0, 0.5, Waveform::Triangle),
            tone(659.0, 784.0, 160.0, 0.5, Waveform::Triangle),
        ],
        AudioCue::ShieldActivate => vec![tone(200.0, 420.0, 180.0, 0.5, Waveform::Triangle)],
        // Crunchy downward snap
        AudioCue::ShieldBreak => vec![tone(500.0, 120.0, 160.0, 0.6, Waveform::Sawtooth)],
        AudioCue::BoostActivate => vec![tone(330.0, 660.0, 140.0, 0.5, Waveform::Square)],
        AudioCue::MultiplierActivate => vec![
            tone(440.0, 440.0, 60.0, 0.45, Waveform::Square),
            tone(880.0, 880.0, 90.0, 0.45, Waveform::Square),
        ],
        // Low thud
        AudioCue::StompImpact => vec![tone(120.0, 45.0, 180.0, 0.7, Waveform::Sine)],
        AudioCue::LaserOn => vec![tone(880.0, 880.0, 120.0, 0.35, Waveform::Sawtooth)],
        // Falling whistle
        AudioCue::MissileLaunch => vec![tone(700.0, 300.0, 250.0, 0.4, Waveform::Sawtooth)],
        // Long sad slide
        AudioCue::GameOver => vec![
            tone(440.0, 110.0, 700.0, 0.6, Waveform::Sine),
            tone(220.0, 55.0, 700.0, 0.4, Waveform::Sine),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<Tone>>>);

    impl AudioBackend for Recorder {
        fn play_tone(&mut self, tone: Tone) {
            self.0.borrow_mut().push(tone);
        }
    }

    const ALL_CUES: [AudioCue; 11] = [
        AudioCue::Jump,
        AudioCue::Collect,
        AudioCue::LevelUp,
        AudioCue::ShieldActivate,
        AudioCue::ShieldBreak,
        AudioCue::BoostActivate,
        AudioCue::MultiplierActivate,
        AudioCue::StompImpact,
        AudioCue::LaserOn,
        AudioCue::MissileLaunch,
        AudioCue::GameOver,
    ];

    #[test]
    fn test_every_cue_has_a_sound() {
        for cue in ALL_CUES {
            assert!(!tones_for(cue).is_empty(), "{cue:?} is silent");
        }
    }

    #[test]
    fn test_muted_mixer_plays_nothing() {
        let recorded = Rc::new(RefCell::new(Vec::new()));
        let mut mixer = AudioMixer::new(Box::new(Recorder(recorded.clone())));
        mixer.set_muted(true);
        mixer.play(AudioCue::Jump);
        assert!(recorded.borrow().is_empty());

        mixer.set_muted(false);
        mixer.play(AudioCue::Jump);
        assert_eq!(recorded.borrow().len(), 1);
    }

    #[test]
    fn test_volume_scales_gain() {
        let recorded = Rc::new(RefCell::new(Vec::new()));
        let mut mixer = AudioMixer::new(Box::new(Recorder(recorded.clone())));
        mixer.set_master_volume(1.0);
        mixer.set_sfx_volume(0.5);
        mixer.play(AudioCue::StompImpact);

        let tones = recorded.borrow();
        assert_eq!(tones.len(), 1);
        assert!((tones[0].gain - 0.7 * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_disabled_mixer_is_noop() {
        let mut mixer = AudioMixer::disabled();
        // Just must not panic
        for cue in ALL_CUES {
            mixer.play(cue);
        }
    }
}
