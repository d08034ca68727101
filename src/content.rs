//! Biome and chat content collaborator
//!
//! The simulation treats environment/chat content as always available. This
//! module makes that true: every request resolves, substituting
//! deterministic local fallback content whenever the external generator is
//! cooling down, rate-limited, or failing. Nothing here ever reaches the
//! tick loop as an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Visual theme for the play field. Affects rendering and the player
/// animation profile, never gameplay physics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub sky_color: String,
    pub ground_color: String,
    pub atmosphere: String,
}

/// One line of ambient chatter for the host overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub author: String,
    pub text: String,
}

/// Failures of the external generator. None of these escape the provider.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("rate limited")]
    RateLimited,
}

/// The external generator. Implementations may fail freely; the provider
/// owns the fallback policy.
pub trait ContentSource {
    fn generate_environment(
        &mut self,
        score: u64,
        history: &[String],
    ) -> Result<Environment, ContentError>;

    fn generate_chat(&mut self, biome: &str, event: &str) -> Result<Vec<ChatLine>, ContentError>;
}

/// Placeholder source for hosts that never attach a generator
pub struct NoGenerator;

impl ContentSource for NoGenerator {
    fn generate_environment(
        &mut self,
        _score: u64,
        _history: &[String],
    ) -> Result<Environment, ContentError> {
        Err(ContentError::Network("no generator attached".into()))
    }

    fn generate_chat(&mut self, _biome: &str, _event: &str) -> Result<Vec<ChatLine>, ContentError> {
        Err(ContentError::Network("no generator attached".into()))
    }
}

/// Minimum ms between environment calls to the external generator
pub const REQUEST_COOLDOWN_MS: f64 = 30_000.0;
/// Suppression window after a rate-limit signal
pub const BREAKER_OPEN_MS: f64 = 300_000.0;

/// Wraps a `ContentSource` with cooldown, circuit breaking and fallback so
/// the host can call it without ever handling a failure
pub struct ContentProvider<S> {
    source: S,
    current: Environment,
    history: Vec<String>,
    cooldown_until: f64,
    breaker_until: f64,
}

impl<S: ContentSource> ContentProvider<S> {
    pub fn new(source: S) -> Self {
        let current = fallback_environment(0);
        Self {
            source,
            history: vec![current.name.clone()],
            current,
            cooldown_until: 0.0,
            breaker_until: 0.0,
        }
    }

    pub fn current(&self) -> &Environment {
        &self.current
    }

    /// Names of every environment this session has seen, oldest first
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Swap to a fresh environment for the given score. Never fails; the
    /// simulation keeps ticking whatever happens in here.
    pub fn request_environment(&mut self, score: u64, now_ms: f64) -> Environment {
        if now_ms < self.cooldown_until || now_ms < self.breaker_until {
            return self.current.clone();
        }
        self.cooldown_until = now_ms + REQUEST_COOLDOWN_MS;

        let env = match self.source.generate_environment(score, &self.history) {
            Ok(env) => env,
            Err(ContentError::RateLimited) => {
                self.breaker_until = now_ms + BREAKER_OPEN_MS;
                log::warn!(
                    "content generator rate limited, suppressing calls for {}s",
                    BREAKER_OPEN_MS / 1000.0
                );
                fallback_environment(score)
            }
            Err(err) => {
                log::warn!("content generator failed ({err}), using fallback");
                fallback_environment(score)
            }
        };

        log::info!("environment -> {}", env.name);
        self.history.push(env.name.clone());
        self.current = env.clone();
        env
    }

    /// Chat lines for a gameplay event. Never fails.
    pub fn request_chat_lines(&mut self, biome: &str, event: &str, now_ms: f64) -> Vec<ChatLine> {
        if now_ms >= self.breaker_until {
            match self.source.generate_chat(biome, event) {
                Ok(lines) if !lines.is_empty() => return lines,
                Ok(_) => log::debug!("generator returned no chat, using fallback"),
                Err(ContentError::RateLimited) => {
                    self.breaker_until = now_ms + BREAKER_OPEN_MS;
                    log::warn!("chat generator rate limited");
                }
                Err(err) => log::debug!("chat generator failed ({err})"),
            }
        }
        fallback_chat(biome, event)
    }
}

/// Static biome rotation used whenever the generator is unavailable.
/// Rotates with level so long offline runs still see variety.
const FALLBACK_BIOMES: [(&str, &str, &str, &str); 5] = [
    ("Neon District", "#12021f", "#2b2140", "synthwave haze"),
    ("Rust Flats", "#2a120a", "#3d2b1f", "dry static"),
    ("Glacier Verge", "#04182b", "#1d3a4f", "aurora shimmer"),
    ("Signal Jungle", "#061f10", "#123524", "packet fireflies"),
    ("Ash Arcade", "#1c1c22", "#2e2e38", "crt flicker"),
];

pub fn fallback_environment(score: u64) -> Environment {
    let idx = (score / 1000) as usize % FALLBACK_BIOMES.len();
    let (name, sky, ground, atmosphere) = FALLBACK_BIOMES[idx];
    Environment {
        name: name.into(),
        sky_color: sky.into(),
        ground_color: ground.into(),
        atmosphere: atmosphere.into(),
    }
}

pub fn fallback_chat(biome: &str, event: &str) -> Vec<ChatLine> {
    let line = |author: &str, text: String| ChatLine {
        author: author.into(),
        text,
    };
    match event {
        "near_miss" => vec![
            line("clip_bot", format!("inches away in {biome}!!")),
            line("viewer_412", "NO WAY".into()),
        ],
        "level_up" => vec![line("hype_bot", format!("{biome} just leveled UP"))],
        "powerup" => vec![line("viewer_88", "juiced".into())],
        "game_over" => vec![line("gg_bot", "run over, gg".into())],
        _ => vec![line("lurker", format!("vibing in {biome}"))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scripted source: pops the next result off a queue, counts calls
    struct Scripted {
        env_results: Vec<Result<Environment, ContentError>>,
        env_calls: usize,
        chat_result: Result<Vec<ChatLine>, ContentError>,
        chat_calls: usize,
    }

    impl Scripted {
        fn new(env_results: Vec<Result<Environment, ContentError>>) -> Self {
            Self {
                env_results,
                env_calls: 0,
                chat_result: Err(ContentError::Network("scripted".into())),
                chat_calls: 0,
            }
        }
    }

    impl ContentSource for Scripted {
        fn generate_environment(
            &mut self,
            _score: u64,
            _history: &[String],
        ) -> Result<Environment, ContentError> {
            self.env_calls += 1;
            if self.env_results.is_empty() {
                Err(ContentError::Network("exhausted".into()))
            } else {
                self.env_results.remove(0)
            }
        }

        fn generate_chat(
            &mut self,
            _biome: &str,
            _event: &str,
        ) -> Result<Vec<ChatLine>, ContentError> {
            self.chat_calls += 1;
            match &self.chat_result {
                Ok(lines) => Ok(lines.clone()),
                Err(_) => Err(ContentError::Network("scripted".into())),
            }
        }
    }

    fn custom_env(name: &str) -> Environment {
        Environment {
            name: name.into(),
            sky_color: "#000000".into(),
            ground_color: "#111111".into(),
            atmosphere: "test".into(),
        }
    }

    #[test]
    fn test_success_swaps_environment_and_history() {
        let mut provider = ContentProvider::new(Scripted::new(vec![Ok(custom_env("Vapor Reef"))]));
        let env = provider.request_environment(500, 0.0);
        assert_eq!(env.name, "Vapor Reef");
        assert_eq!(provider.current().name, "Vapor Reef");
        assert!(provider.history().contains(&"Vapor Reef".to_string()));
    }

    #[test]
    fn test_failure_resolves_to_fallback() {
        let mut provider = ContentProvider::new(Scripted::new(vec![Err(ContentError::Malformed(
            "not json".into(),
        ))]));
        let env = provider.request_environment(0, 0.0);
        assert_eq!(env, fallback_environment(0));
    }

    #[test]
    fn test_cooldown_suppresses_source_calls() {
        let mut provider =
            ContentProvider::new(Scripted::new(vec![Ok(custom_env("A")), Ok(custom_env("B"))]));
        provider.request_environment(0, 0.0);
        // Within the cooldown: served from current, source untouched
        let env = provider.request_environment(0, 1000.0);
        assert_eq!(env.name, "A");
        assert_eq!(provider.source.env_calls, 1);
        // Past the cooldown the next call goes through
        provider.request_environment(0, REQUEST_COOLDOWN_MS + 1.0);
        assert_eq!(provider.source.env_calls, 2);
    }

    #[test]
    fn test_rate_limit_opens_breaker() {
        let mut provider = ContentProvider::new(Scripted::new(vec![
            Err(ContentError::RateLimited),
            Ok(custom_env("after breaker")),
        ]));
        let env = provider.request_environment(0, 0.0);
        assert_eq!(env, fallback_environment(0));

        // Well past the cooldown but inside the breaker window: no call
        provider.request_environment(0, REQUEST_COOLDOWN_MS * 2.0);
        assert_eq!(provider.source.env_calls, 1);

        // Breaker elapsed: source reachable again
        provider.request_environment(0, BREAKER_OPEN_MS + 1.0);
        assert_eq!(provider.source.env_calls, 2);
    }

    #[test]
    fn test_chat_falls_back_and_never_fails() {
        let mut provider = ContentProvider::new(Scripted::new(vec![]));
        let lines = provider.request_chat_lines("Neon District", "near_miss", 0.0);
        assert!(!lines.is_empty());
        assert!(lines.iter().any(|l| l.text.contains("Neon District")));
    }

    #[test]
    fn test_chat_passthrough_on_success() {
        let mut source = Scripted::new(vec![]);
        source.chat_result = Ok(vec![ChatLine {
            author: "real_chat".into(),
            text: "hello".into(),
        }]);
        let mut provider = ContentProvider::new(source);
        let lines = provider.request_chat_lines("Rust Flats", "collect", 0.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].author, "real_chat");
    }

    #[test]
    fn test_fallback_rotates_with_score() {
        let a = fallback_environment(0);
        let b = fallback_environment(1000);
        assert_ne!(a.name, b.name);
        // Wraps around the table
        assert_eq!(a, fallback_environment(5000));
    }

    #[test]
    fn test_offline_provider_always_resolves() {
        let mut provider = ContentProvider::new(NoGenerator);
        let env = provider.request_environment(2500, 0.0);
        assert_eq!(env, fallback_environment(2500));
        assert!(!provider.request_chat_lines(&env.name, "game_over", 0.0).is_empty());
    }
}
