use std::path::PathBuf;

use serde::Deserialize;

use necklace_types::{PatternParams, Theme, MAX_STEPS};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const FALLBACK_BPM: f64 = 120.0;
const FALLBACK_FRAME_RATE: u32 = 60;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: DefaultsConfig,
    #[serde(default)]
    runtime: RuntimeConfig,
}

#[derive(Deserialize, Default)]
struct DefaultsConfig {
    steps: Option<u32>,
    pulses: Option<u32>,
    rotation: Option<i32>,
    rate: Option<f64>,
    note_length: Option<f64>,
    name: Option<String>,
}

#[derive(Deserialize, Default)]
struct RuntimeConfig {
    bpm: Option<f64>,
    frame_rate: Option<u32>,
    theme: Option<String>,
}

pub struct Config {
    defaults: DefaultsConfig,
    runtime: RuntimeConfig,
}

impl Config {
    /// Embedded defaults with the user's config file merged on top.
    pub fn load() -> Self {
        let mut config = Self::embedded();
        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => config.merge_str(&contents, &path.display().to_string()),
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }
        config
    }

    /// Embedded defaults with `contents` merged on top. Malformed input is
    /// logged and ignored.
    pub fn from_toml_str(contents: &str) -> Self {
        let mut config = Self::embedded();
        config.merge_str(contents, "<string>");
        config
    }

    fn embedded() -> Self {
        let base = match toml::from_str::<ConfigFile>(DEFAULT_CONFIG) {
            Ok(base) => base,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is malformed: {}", e);
                ConfigFile::default()
            }
        };
        Config {
            defaults: base.defaults,
            runtime: base.runtime,
        }
    }

    fn merge_str(&mut self, contents: &str, origin: &str) {
        match toml::from_str::<ConfigFile>(contents) {
            Ok(user) => {
                merge_defaults(&mut self.defaults, user.defaults);
                merge_runtime(&mut self.runtime, user.runtime);
            }
            Err(e) => log::warn!(target: "config", "ignoring malformed config {}: {}", origin, e),
        }
    }

    /// Parameters for a newly created processor.
    pub fn pattern_defaults(&self) -> PatternParams {
        let fallback = PatternParams::default();
        let steps = self
            .defaults
            .steps
            .unwrap_or(fallback.steps)
            .clamp(1, MAX_STEPS);
        PatternParams {
            steps,
            pulses: self.defaults.pulses.unwrap_or(fallback.pulses).min(steps),
            rotation: self.defaults.rotation.unwrap_or(fallback.rotation),
            rate: positive(self.defaults.rate, "rate").unwrap_or(fallback.rate),
            note_length: positive(self.defaults.note_length, "note_length")
                .unwrap_or(fallback.note_length),
            name: self.defaults.name.clone().unwrap_or(fallback.name),
            ..fallback
        }
    }

    pub fn bpm(&self) -> f64 {
        positive(self.runtime.bpm, "bpm").unwrap_or(FALLBACK_BPM)
    }

    /// Frames per second of the render loop (clamped to 1..=240).
    pub fn frame_rate(&self) -> u32 {
        self.runtime
            .frame_rate
            .unwrap_or(FALLBACK_FRAME_RATE)
            .clamp(1, 240)
    }

    pub fn theme(&self) -> Theme {
        match self.runtime.theme.as_deref() {
            None => Theme::default(),
            Some(id) => Theme::by_id(id).unwrap_or_else(|| {
                log::warn!(target: "config", "unknown theme '{}', using default", id);
                Theme::default()
            }),
        }
    }
}

fn positive(value: Option<f64>, key: &str) -> Option<f64> {
    let v = value?;
    if v.is_finite() && v > 0.0 {
        Some(v)
    } else {
        log::warn!(target: "config", "ignoring non-positive {} = {}", key, v);
        None
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("necklace").join("config.toml"))
}

fn merge_defaults(base: &mut DefaultsConfig, user: DefaultsConfig) {
    if user.steps.is_some() {
        base.steps = user.steps;
    }
    if user.pulses.is_some() {
        base.pulses = user.pulses;
    }
    if user.rotation.is_some() {
        base.rotation = user.rotation;
    }
    if user.rate.is_some() {
        base.rate = user.rate;
    }
    if user.note_length.is_some() {
        base.note_length = user.note_length;
    }
    if user.name.is_some() {
        base.name = user.name;
    }
}

fn merge_runtime(base: &mut RuntimeConfig, user: RuntimeConfig) {
    if user.bpm.is_some() {
        base.bpm = user.bpm;
    }
    if user.frame_rate.is_some() {
        base.frame_rate = user.frame_rate;
    }
    if user.theme.is_some() {
        base.theme = user.theme;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_parses() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.defaults.steps, Some(16));
        assert_eq!(config.runtime.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn embedded_defaults_match_pattern_defaults() {
        let config = Config::from_toml_str("");
        assert_eq!(config.pattern_defaults(), PatternParams::default());
        assert_eq!(config.bpm(), 120.0);
        assert_eq!(config.frame_rate(), 60);
        assert_eq!(config.theme(), Theme::dark());
    }

    #[test]
    fn user_values_override_field_by_field() {
        let config = Config::from_toml_str(
            r#"
            [defaults]
            steps = 8
            name = "Hat"

            [runtime]
            theme = "light"
            "#,
        );
        let params = config.pattern_defaults();
        assert_eq!(params.steps, 8);
        assert_eq!(params.pulses, 4);
        assert_eq!(params.name, "Hat");
        assert_eq!(config.theme().id, "light");
        assert_eq!(config.bpm(), 120.0);
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let config = Config::from_toml_str(
            r#"
            [defaults]
            steps = 200
            pulses = 500
            rate = -1.0

            [runtime]
            bpm = 0.0
            frame_rate = 0
            theme = "sepia"
            "#,
        );
        let params = config.pattern_defaults();
        assert_eq!(params.steps, MAX_STEPS);
        assert_eq!(params.pulses, MAX_STEPS);
        assert_eq!(params.rate, 0.25);
        assert_eq!(config.bpm(), 120.0);
        assert_eq!(config.frame_rate(), 1);
        assert_eq!(config.theme(), Theme::dark());
    }

    #[test]
    fn malformed_config_ignored() {
        let config = Config::from_toml_str("[defaults\nsteps = ");
        assert_eq!(config.pattern_defaults().steps, 16);
    }
}
