//! Particle field configuration with TOML preset support.
//!
//! All tweakable settings are consolidated here. Options serialize to/from
//! TOML for presets; `#[serde(default)]` means a partial file (e.g. only
//! overriding `count`) works correctly. The record is immutable once a
//! field is mounted — changing it requires teardown + remount.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::GlimmerError;

/// Particle field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Particles")]
#[serde(default)]
pub struct ParticleOptions {
    /// Number of particles in the cloud.
    #[schemars(title = "Particle Count", range(min = 0, max = 10000))]
    pub count: usize,
    /// World-space scale applied to the unit-ball positions.
    #[schemars(title = "Spread", range(min = 1.0, max = 50.0), extend("step" = 0.5))]
    pub spread: f32,
    /// Time-accumulation multiplier for all animation.
    #[schemars(title = "Speed", range(min = 0.0, max = 2.0), extend("step" = 0.01))]
    pub speed: f32,
    /// Hex color palette sampled per particle (with replacement).
    #[schemars(skip)]
    pub colors: Vec<String>,
    /// Whether the cloud shifts against the pointer (parallax).
    #[schemars(title = "Hover Parallax")]
    pub move_on_hover: bool,
    /// Parallax displacement factor.
    #[schemars(title = "Hover Factor", range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    pub hover_factor: f32,
    /// Soft alpha falloff instead of hard-edged sprites.
    #[schemars(title = "Soft Particles")]
    pub alpha_particles: bool,
    /// Screen-space point size baseline in pixels.
    #[schemars(title = "Base Size", range(min = 1.0, max = 400.0), extend("step" = 1.0))]
    pub base_size: f32,
    /// Per-particle size jitter amplitude.
    #[schemars(title = "Size Randomness", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub size_randomness: f32,
    /// Camera distance from the cloud center.
    #[schemars(skip)]
    pub camera_distance: f32,
    /// Disable the slow sinusoidal rotation of the whole cloud.
    #[schemars(title = "Freeze Rotation")]
    pub disable_rotation: bool,
}

impl Default for ParticleOptions {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 10.0,
            speed: 0.1,
            colors: vec!["#ffffff".to_owned(), "#ffffff".to_owned()],
            move_on_hover: false,
            hover_factor: 1.0,
            alpha_particles: false,
            base_size: 100.0,
            size_randomness: 1.0,
            camera_distance: 20.0,
            disable_rotation: false,
        }
    }
}

impl ParticleOptions {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ParticleOptions)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::Io`] if the file cannot be read, or
    /// [`GlimmerError::OptionsParse`] if the TOML fails to parse.
    pub fn load(path: &Path) -> Result<Self, GlimmerError> {
        let content = std::fs::read_to_string(path).map_err(GlimmerError::Io)?;
        toml::from_str(&content)
            .map_err(|e| GlimmerError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`GlimmerError::OptionsParse`] if serialization fails or
    /// [`GlimmerError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), GlimmerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GlimmerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(GlimmerError::Io)?;
        }
        std::fs::write(path, content).map_err(GlimmerError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_widget_contract() {
        let opts = ParticleOptions::default();
        assert_eq!(opts.count, 200);
        assert_eq!(opts.spread, 10.0);
        assert_eq!(opts.speed, 0.1);
        assert_eq!(opts.colors, vec!["#ffffff", "#ffffff"]);
        assert!(!opts.move_on_hover);
        assert_eq!(opts.hover_factor, 1.0);
        assert!(!opts.alpha_particles);
        assert_eq!(opts.base_size, 100.0);
        assert_eq!(opts.size_randomness, 1.0);
        assert_eq!(opts.camera_distance, 20.0);
        assert!(!opts.disable_rotation);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let opts = ParticleOptions::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: ParticleOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r##"
count = 500
colors = ["#4af", "#ff0000"]
"##;
        let opts: ParticleOptions = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.count, 500);
        assert_eq!(opts.colors.len(), 2);
        // Everything else should be default
        assert_eq!(opts.spread, 10.0);
        assert_eq!(opts.base_size, 100.0);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(ParticleOptions::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        // UI-exposed knobs should be present
        assert!(props.contains_key("count"));
        assert!(props.contains_key("spread"));
        assert!(props.contains_key("speed"));
        assert!(props.contains_key("move_on_hover"));

        // Skipped fields should be absent
        assert!(!props.contains_key("colors"));
        assert!(!props.contains_key("camera_distance"));
    }
}
