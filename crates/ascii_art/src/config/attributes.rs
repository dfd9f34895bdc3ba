use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use super::{RenderConfig, DEFAULT_BACKGROUND};
use crate::ascii::ramp::DEFAULT_CHARSET;

/// Attribute keys recognized by the element. Anything else is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKey {
    Src,
    Charset,
    Scale,
    Invert,
    Color,
    MaxWidth,
    MaxHeight,
    Bg,
    Contrast,
    Brightness,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 10] = [
        AttributeKey::Src,
        AttributeKey::Charset,
        AttributeKey::Scale,
        AttributeKey::Invert,
        AttributeKey::Color,
        AttributeKey::MaxWidth,
        AttributeKey::MaxHeight,
        AttributeKey::Bg,
        AttributeKey::Contrast,
        AttributeKey::Brightness,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Src => "src",
            AttributeKey::Charset => "charset",
            AttributeKey::Scale => "scale",
            AttributeKey::Invert => "invert",
            AttributeKey::Color => "color",
            AttributeKey::MaxWidth => "max-width",
            AttributeKey::MaxHeight => "max-height",
            AttributeKey::Bg => "bg",
            AttributeKey::Contrast => "contrast",
            AttributeKey::Brightness => "brightness",
        }
    }

    /// Presence flags carry no value; only whether they are set matters.
    pub fn is_flag(self) -> bool {
        matches!(self, AttributeKey::Invert | AttributeKey::Color)
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// String-keyed attribute bag as set by a declarative host.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementAttributes {
    values: BTreeMap<AttributeKey, String>,
}

impl ElementAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the stored value changed.
    pub fn set(&mut self, key: AttributeKey, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.values.get(&key) == Some(&value) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    /// Returns whether an attribute was present.
    pub fn remove(&mut self, key: AttributeKey) -> bool {
        self.values.remove(&key).is_some()
    }

    pub fn get(&self, key: AttributeKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn has(&self, key: AttributeKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKey, &str)> + '_ {
        self.values.iter().map(|(key, value)| (*key, value.as_str()))
    }
}

impl RenderConfig {
    /// Parse the attribute bag. Missing or malformed values fall back to
    /// defaults; nothing here fails.
    pub fn from_attributes(attributes: &ElementAttributes) -> Self {
        let defaults = RenderConfig::default();

        let charset = match attributes.get(AttributeKey::Charset) {
            Some(charset) if !charset.is_empty() => charset.to_owned(),
            _ => DEFAULT_CHARSET.to_owned(),
        };
        let bg = match attributes.get(AttributeKey::Bg) {
            Some(bg) if !bg.is_empty() => bg.to_owned(),
            _ => DEFAULT_BACKGROUND.to_owned(),
        };

        Self {
            charset,
            scale: number_or(attributes, AttributeKey::Scale, defaults.scale),
            invert: attributes.has(AttributeKey::Invert),
            color: attributes.has(AttributeKey::Color),
            contrast: number_or(attributes, AttributeKey::Contrast, defaults.contrast),
            brightness: number_or(attributes, AttributeKey::Brightness, defaults.brightness),
            max_width: pixels(attributes, AttributeKey::MaxWidth),
            max_height: pixels(attributes, AttributeKey::MaxHeight),
            bg,
        }
    }

    /// Serialize back into attributes; `from_attributes` inverts this for
    /// finite values.
    pub fn to_attributes(&self) -> ElementAttributes {
        let mut attributes = ElementAttributes::new();
        attributes.set(AttributeKey::Charset, self.charset.clone());
        attributes.set(AttributeKey::Scale, self.scale.to_string());
        if self.invert {
            attributes.set(AttributeKey::Invert, "");
        }
        if self.color {
            attributes.set(AttributeKey::Color, "");
        }
        if let Some(width) = self.max_width {
            attributes.set(AttributeKey::MaxWidth, width.to_string());
        }
        if let Some(height) = self.max_height {
            attributes.set(AttributeKey::MaxHeight, height.to_string());
        }
        attributes.set(AttributeKey::Bg, self.bg.clone());
        attributes.set(AttributeKey::Contrast, self.contrast.to_string());
        attributes.set(AttributeKey::Brightness, self.brightness.to_string());
        attributes
    }
}

pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|number| number.is_finite())
}

fn number_or(attributes: &ElementAttributes, key: AttributeKey, default: f64) -> f64 {
    match attributes.get(key) {
        None => default,
        Some(raw) => parse_number(raw).unwrap_or_else(|| {
            debug!("ignoring non-numeric {key}={raw:?}, using {default}");
            default
        }),
    }
}

/// Positive pixel bound; zero, negative or malformed means unset.
fn pixels(attributes: &ElementAttributes, key: AttributeKey) -> Option<u32> {
    let raw = attributes.get(key)?;
    let Some(number) = parse_number(raw) else {
        debug!("ignoring non-numeric {key}={raw:?}");
        return None;
    };
    let pixels = number.floor();
    (pixels >= 1.0).then(|| pixels.min(f64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attributes(pairs: &[(&str, &str)]) -> ElementAttributes {
        let mut attributes = ElementAttributes::new();
        for (name, value) in pairs {
            let key = AttributeKey::parse(name).unwrap();
            attributes.set(key, *value);
        }
        attributes
    }

    #[test]
    fn keys_round_trip_through_names() {
        for key in AttributeKey::ALL {
            assert_eq!(AttributeKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(AttributeKey::parse("MAX-WIDTH"), Some(AttributeKey::MaxWidth));
        assert_eq!(AttributeKey::parse("alt"), None);
    }

    #[test]
    fn empty_bag_is_default_config() {
        let config = RenderConfig::from_attributes(&ElementAttributes::new());
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn parses_every_key() {
        let config = RenderConfig::from_attributes(&attributes(&[
            ("charset", "01"),
            ("scale", "0.5"),
            ("invert", ""),
            ("color", "false"),
            ("max-width", "320.7"),
            ("max-height", "200"),
            ("bg", "#000"),
            ("contrast", "1.5"),
            ("brightness", "-20"),
        ]));
        assert_eq!(config.charset, "01");
        assert_eq!(config.scale, 0.5);
        assert!(config.invert);
        // Presence, not value, sets a flag.
        assert!(config.color);
        assert_eq!(config.max_width, Some(320));
        assert_eq!(config.max_height, Some(200));
        assert_eq!(config.bg, "#000");
        assert_eq!(config.contrast, 1.5);
        assert_eq!(config.brightness, -20.0);
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = RenderConfig::from_attributes(&attributes(&[
            ("scale", "big"),
            ("contrast", "NaN"),
            ("brightness", ""),
            ("max-width", "0"),
            ("max-height", "-5"),
            ("charset", ""),
        ]));
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn zero_contrast_is_kept() {
        let config = RenderConfig::from_attributes(&attributes(&[("contrast", "0")]));
        assert_eq!(config.contrast, 0.0);
    }

    #[test]
    fn serialize_then_parse_is_identity() {
        let config = RenderConfig {
            charset: " .oO@".into(),
            scale: 0.33,
            invert: true,
            color: true,
            contrast: 1.25,
            brightness: 12.5,
            max_width: Some(640),
            max_height: None,
            bg: "black".into(),
        };
        assert_eq!(RenderConfig::from_attributes(&config.to_attributes()), config);
    }

    #[test]
    fn set_reports_changes() {
        let mut attributes = ElementAttributes::new();
        assert!(attributes.set(AttributeKey::Scale, "0.2"));
        assert!(!attributes.set(AttributeKey::Scale, "0.2"));
        assert!(attributes.remove(AttributeKey::Scale));
        assert!(!attributes.remove(AttributeKey::Scale));
    }
}
