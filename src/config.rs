//! Render tunables.
//!
//! Stored as RON so they can live next to level files and be tweaked
//! without rebuilding.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::framebuffer::Color;

/// Hits at or closer than this are dropped.
pub const MIN_RENDER_DISTANCE: f64 = 5.0;
/// Global multiplier applied to every wall height.
pub const DISTANCE_RATIO_CONST: f64 = 1.0;
/// Canvas colour wherever no ray hit anything.
pub const BACKGROUND_COLOR: Color = Color::new(255, 120, 120, 255);

/// Parameters shared by the ray caster and the column compositor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub min_render_distance: f64,
    pub distance_ratio: f64,
    pub background: Color,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            min_render_distance: MIN_RENDER_DISTANCE,
            distance_ratio: DISTANCE_RATIO_CONST,
            background: BACKGROUND_COLOR,
        }
    }
}

impl RenderConfig {
    /// Parse a config from RON text. Missing fields take their defaults.
    pub fn from_ron_str(s: &str) -> Result<Self> {
        Ok(ron::from_str(s)?)
    }

    /// Load a config from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_ron_str(&contents)?;
        log::debug!("loaded render config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Serialize to pretty RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Write the config to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_ron_string()?)?;
        log::debug!("saved render config to {}", path.display());
        Ok(())
    }
}
