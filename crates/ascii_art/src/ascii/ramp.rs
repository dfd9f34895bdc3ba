use log::debug;

/// Charset used when none, or an empty one, is configured.
pub const DEFAULT_CHARSET: &str = "@%#*+=-:. ";

/// Ordered characters used to represent luminance levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(DEFAULT_CHARSET)
    }
}

impl Ramp {
    /// Build a ramp in configured order. An empty charset falls back to
    /// [`DEFAULT_CHARSET`]; a single character is allowed and repeats.
    pub fn new(charset: &str) -> Self {
        if charset.is_empty() {
            debug!("empty charset, using default ramp");
            return Self { chars: DEFAULT_CHARSET.chars().collect() };
        }
        Self { chars: charset.chars().collect() }
    }

    /// Ramp in lookup order: reversed unless `invert` is set.
    pub fn for_render(charset: &str, invert: bool) -> Self {
        let ramp = Self::new(charset);
        if invert { ramp } else { ramp.reversed() }
    }

    pub fn reversed(mut self) -> Self {
        self.chars.reverse();
        self
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }

    /// Index for an adjusted luminance in `[0, 255]`.
    pub fn index_for(&self, adjusted: f64) -> usize {
        let max_index = self.chars.len().saturating_sub(1);
        let scaled = (adjusted.clamp(0.0, 255.0) / 255.0) * max_index as f64;
        (scaled.floor() as usize).min(max_index)
    }

    pub fn char_for(&self, adjusted: f64) -> char {
        self.chars[self.index_for(adjusted)]
    }
}
