//! Render configuration and its string-keyed attribute form.

pub mod attributes;
pub mod file;

use serde::{Deserialize, Serialize};

pub use attributes::{AttributeKey, ElementAttributes};
pub use file::{ConfigError, ConfigFile};

use crate::ascii::ramp::{Ramp, DEFAULT_CHARSET};
use crate::image_pipeline::adjust::{ToneAdjust, DEFAULT_BRIGHTNESS, DEFAULT_CONTRAST};
use crate::image_pipeline::resize::{HostBounds, DEFAULT_SCALE};

pub const DEFAULT_BACKGROUND: &str = "transparent";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    /// Ramp from darkest to lightest, reversed at render time unless `invert`.
    pub charset: String,
    /// Sampling density, clamped to `[0.05, 1.0]` when rendering.
    pub scale: f64,
    pub invert: bool,
    /// Keep the sampled color of every cell.
    pub color: bool,
    pub contrast: f64,
    pub brightness: f64,
    /// Host box bounds in device pixels, before scale is applied.
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    /// Cosmetic background, not used by the renderer.
    pub bg: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARSET.to_owned(),
            scale: DEFAULT_SCALE,
            invert: false,
            color: false,
            contrast: DEFAULT_CONTRAST,
            brightness: DEFAULT_BRIGHTNESS,
            max_width: None,
            max_height: None,
            bg: DEFAULT_BACKGROUND.to_owned(),
        }
    }
}

impl RenderConfig {
    pub fn ramp(&self) -> Ramp {
        Ramp::for_render(&self.charset, self.invert)
    }

    pub fn tone(&self) -> ToneAdjust {
        ToneAdjust::new(self.contrast, self.brightness)
    }

    pub fn host_bounds(&self) -> HostBounds {
        HostBounds::new().with_max(self.max_width, self.max_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_element_policy() {
        let config = RenderConfig::default();
        assert_eq!(config.charset, "@%#*+=-:. ");
        assert_eq!(config.scale, 0.18);
        assert_eq!(config.contrast, 1.0);
        assert_eq!(config.brightness, 0.0);
        assert_eq!(config.bg, "transparent");
        assert!(!config.invert && !config.color);
    }

    #[test]
    fn zero_max_bounds_defer_to_container() {
        let config = RenderConfig { max_width: Some(0), ..RenderConfig::default() };
        assert_eq!(config.host_bounds().with_container(40, 30).resolve(640, 480), (40, 30));
    }
}
