use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AlgovizError, AlgovizResult};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled key through `lookup`: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt<F>(lookup: &F, profile: &str, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup(&prefixed) {
            return Some(v);
        }
    }
    lookup(key)
}

/// Parse a profiled key, keeping `default` when unset or unparsable.
fn profiled_parse<F, T>(lookup: &F, profile: &str, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    profiled_opt(lookup, profile, key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn default_speed_ms() -> u64 { 500 }
fn default_resolution_ms() -> u64 { 50 }
fn default_min_speed_ms() -> u64 { 1 }
fn default_max_speed_ms() -> u64 { 5000 }
fn default_success_hold() -> u32 { 2 }

// ── Playback config ───────────────────────────────────────────

/// Timing configuration shared by every visualizer instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Active profile name (empty = default).
    #[serde(default)]
    pub profile: String,
    /// Delay per step used when a controller is created.
    #[serde(default = "default_speed_ms")]
    pub default_speed_ms: u64,
    /// Polling resolution ceiling: the longest single tick of a suspended wait.
    #[serde(default = "default_resolution_ms")]
    pub resolution_ms: u64,
    /// Lower bound for `set_speed`.
    #[serde(default = "default_min_speed_ms")]
    pub min_speed_ms: u64,
    /// Upper bound for `set_speed`.
    #[serde(default = "default_max_speed_ms")]
    pub max_speed_ms: u64,
    /// Speed multiplier for the two-sum success pause.
    #[serde(default = "default_success_hold")]
    pub success_hold: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            profile: String::new(),
            default_speed_ms: default_speed_ms(),
            resolution_ms: default_resolution_ms(),
            min_speed_ms: default_min_speed_ms(),
            max_speed_ms: default_max_speed_ms(),
            success_hold: default_success_hold(),
        }
    }
}

impl PlaybackConfig {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ALGOVIZ_PROFILE`. When set (e.g. `DEMO`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("ALGOVIZ_PROFILE").unwrap_or_default();
        Self::from_lookup(&profile, env_opt)
    }

    /// Build config for a named profile from an arbitrary key lookup.
    pub fn from_lookup<F>(profile: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let p = profile.to_uppercase();
        let p = p.as_str();
        let defaults = Self::default();
        let get = |key: &str, default: u64| profiled_parse(&lookup, p, key, default);
        Self {
            profile: p.to_string(),
            default_speed_ms: get("ALGOVIZ_SPEED_MS", defaults.default_speed_ms),
            resolution_ms: get("ALGOVIZ_RESOLUTION_MS", defaults.resolution_ms).max(1),
            min_speed_ms: get("ALGOVIZ_MIN_SPEED_MS", defaults.min_speed_ms).max(1),
            max_speed_ms: get("ALGOVIZ_MAX_SPEED_MS", defaults.max_speed_ms),
            success_hold: profiled_parse(&lookup, p, "ALGOVIZ_SUCCESS_HOLD", defaults.success_hold)
                .max(1),
        }
    }

    /// Reject bounds that cannot hold any speed.
    pub fn validate(&self) -> AlgovizResult<()> {
        if self.min_speed_ms > self.max_speed_ms {
            return Err(AlgovizError::InvalidConfig(format!(
                "min_speed_ms ({}) exceeds max_speed_ms ({})",
                self.min_speed_ms, self.max_speed_ms
            )));
        }
        if self.resolution_ms == 0 {
            return Err(AlgovizError::InvalidConfig("resolution_ms must be positive".into()));
        }
        Ok(())
    }

    /// Clamp a requested step delay into the configured slider bounds.
    pub fn clamp_speed(&self, ms: u64) -> u64 {
        let min = self.min_speed_ms.max(1);
        let max = self.max_speed_ms.max(min);
        ms.clamp(min, max)
    }

    pub fn resolution(&self) -> Duration {
        Duration::from_millis(self.resolution_ms.max(1))
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  speed:       default={}ms, range={}..={}ms",
            self.default_speed_ms,
            self.min_speed_ms,
            self.max_speed_ms
        );
        tracing::info!("  resolution:  {}ms", self.resolution_ms);
        tracing::info!("  hold:        success x{}", self.success_hold);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = PlaybackConfig::from_lookup("", lookup_from(&[]));
        assert_eq!(config, PlaybackConfig::default());
        assert_eq!(config.resolution(), Duration::from_millis(50));
        assert_eq!(config.profile_label(), "default");
    }

    #[test]
    fn profile_prefix_wins_over_plain_key() {
        let lookup = lookup_from(&[
            ("ALGOVIZ_SPEED_MS", "300"),
            ("DEMO_ALGOVIZ_SPEED_MS", "120"),
            ("ALGOVIZ_RESOLUTION_MS", "20"),
        ]);
        let config = PlaybackConfig::from_lookup("demo", lookup);
        assert_eq!(config.profile, "DEMO");
        assert_eq!(config.default_speed_ms, 120);
        assert_eq!(config.resolution_ms, 20);
    }

    #[test]
    fn unparsable_values_fall_back() {
        let lookup = lookup_from(&[("ALGOVIZ_SPEED_MS", "fast"), ("ALGOVIZ_RESOLUTION_MS", "0")]);
        let config = PlaybackConfig::from_lookup("", lookup);
        assert_eq!(config.default_speed_ms, 500);
        assert_eq!(config.resolution_ms, 1);
    }

    #[test]
    fn each_key_parses_into_its_own_type() {
        let lookup = lookup_from(&[
            ("ALGOVIZ_SUCCESS_HOLD", " 4 "),
            ("ALGOVIZ_MAX_SPEED_MS", "9000"),
            ("DEMO_ALGOVIZ_SUCCESS_HOLD", "-3"),
        ]);
        let config = PlaybackConfig::from_lookup("", &lookup);
        assert_eq!(config.success_hold, 4);
        assert_eq!(config.max_speed_ms, 9000);

        // a negative hold does not parse as u32 and keeps the default
        let config = PlaybackConfig::from_lookup("demo", &lookup);
        assert_eq!(config.success_hold, 2);
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        let config = PlaybackConfig {
            min_speed_ms: 800,
            max_speed_ms: 100,
            ..PlaybackConfig::default()
        };
        assert!(matches!(config.validate(), Err(AlgovizError::InvalidConfig(_))));
        assert!(PlaybackConfig::default().validate().is_ok());
    }

    #[test]
    fn clamp_speed_respects_bounds() {
        let config = PlaybackConfig {
            min_speed_ms: 10,
            max_speed_ms: 1000,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.clamp_speed(0), 10);
        assert_eq!(config.clamp_speed(250), 250);
        assert_eq!(config.clamp_speed(9000), 1000);
    }

    #[test]
    fn deserializes_partial_toml_like_json() {
        let config: PlaybackConfig =
            serde_json::from_str(r#"{ "default_speed_ms": 200 }"#).unwrap();
        assert_eq!(config.default_speed_ms, 200);
        assert_eq!(config.resolution_ms, 50);
        assert_eq!(config.success_hold, 2);
    }
}
