//! Scene configuration.
//!
//! All values are read once at startup and never change afterwards. Defaults
//! match the reference scene; any subset can be overridden from a JSON file:
//!
//! ```json
//! { "foliage_count": 10000, "palette": { "gold_high_gloss": "#FFC125" } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::palette::Palette;
use crate::sampler::Cone;

/// Immutable configuration shared by every animation component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Tree height in world units.
    pub height: f32,
    /// Radius of the cone at its base.
    pub base_radius: f32,
    /// Number of foliage points.
    pub foliage_count: u32,
    /// Number of baubles on the tree surface.
    pub bauble_count: u32,
    /// Number of gifts around the base.
    pub gift_count: u32,
    /// Seconds for a speed-factor-1 record to cross from 0 to 1.
    pub transition_duration: f32,
    /// Radius of the chaos sphere for foliage.
    pub foliage_scatter_radius: f32,
    /// Radius of the chaos sphere for baubles and gifts.
    pub ornament_scatter_radius: f32,
    pub palette: Palette,
    /// RNG seed; `None` draws a new layout every run.
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            height: 14.0,
            base_radius: 5.0,
            foliage_count: 25_000,
            bauble_count: 400,
            gift_count: 50,
            transition_duration: 1.5,
            foliage_scatter_radius: 30.0,
            ornament_scatter_radius: 35.0,
            palette: Palette::default(),
            seed: None,
        }
    }
}

impl TreeConfig {
    /// Read a config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Write this config as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Reject values the animation cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: "must be a positive finite number",
                })
            }
        }

        positive("height", self.height)?;
        positive("base_radius", self.base_radius)?;
        positive("transition_duration", self.transition_duration)?;
        positive("foliage_scatter_radius", self.foliage_scatter_radius)?;
        positive("ornament_scatter_radius", self.ornament_scatter_radius)?;

        let counts = [
            ("foliage_count", self.foliage_count),
            ("bauble_count", self.bauble_count),
            ("gift_count", self.gift_count),
        ];
        for (field, count) in counts {
            if count == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be at least 1",
                });
            }
        }
        Ok(())
    }

    /// The tree silhouette described by this config.
    pub fn cone(&self) -> Cone {
        Cone::new(self.height, self.base_radius)
    }
}
