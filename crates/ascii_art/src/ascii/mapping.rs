use image::RgbaImage;

use super::{
    grid::{CellGlyph, GlyphGrid},
    ramp::Ramp,
};
use crate::image_pipeline::adjust::{self, ToneAdjust};

/// Maps resampled pixels to glyphs, one cell per pixel.
pub struct GlyphMapper {
    ramp: Ramp,
    tone: ToneAdjust,
}

impl GlyphMapper {
    pub fn new(ramp: Ramp, tone: ToneAdjust) -> Self {
        Self { ramp, tone }
    }

    pub fn glyph_for(&self, r: u8, g: u8, b: u8) -> CellGlyph {
        let adjusted = self.tone.apply(adjust::luminance(r, g, b));
        CellGlyph::new(self.ramp.char_for(adjusted), [r, g, b])
    }

    pub fn map_pixels(&self, pixels: &RgbaImage) -> GlyphGrid {
        let (width, height) = pixels.dimensions();
        let cells = pixels
            .pixels()
            .map(|pixel| {
                let [r, g, b, _] = pixel.0;
                self.glyph_for(r, g, b)
            })
            .collect();

        GlyphGrid::new(width, height, cells)
    }
}
