pub const DEFAULT_CONTRAST: f64 = 1.0;
pub const DEFAULT_BRIGHTNESS: f64 = 0.0;

/// BT.709 relative luminance in `[0, 255]`, alpha ignored.
///
/// Weights are applied in integer ten-thousandths so that equal channels
/// produce exactly the channel value.
pub fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let weighted = 2126 * u32::from(r) + 7152 * u32::from(g) + 722 * u32::from(b);
    f64::from(weighted) / 10_000.0
}

/// Contrast multiplier and brightness offset applied to luminance before
/// glyph selection. Extreme values saturate instead of failing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToneAdjust {
    contrast: f64,
    brightness: f64,
}

impl Default for ToneAdjust {
    fn default() -> Self {
        Self { contrast: DEFAULT_CONTRAST, brightness: DEFAULT_BRIGHTNESS }
    }
}

impl ToneAdjust {
    pub fn new(contrast: f64, brightness: f64) -> Self {
        let contrast = if contrast.is_finite() { contrast } else { DEFAULT_CONTRAST };
        let brightness = if brightness.is_finite() { brightness } else { DEFAULT_BRIGHTNESS };
        Self { contrast, brightness }
    }

    pub fn contrast(&self) -> f64 {
        self.contrast
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn apply(&self, luminance: f64) -> f64 {
        (luminance * self.contrast + self.brightness).clamp(0.0, 255.0)
    }
}
