//! Image to monospace glyph renderer.
//!
//! A [`SourceImage`] is resampled to one pixel per output cell, each pixel's
//! BT.709 luminance picks a character from a [`Ramp`], and the result is
//! either a newline-joined text block or a [`GlyphGrid`] that keeps the
//! sampled color of every cell. [`AsciiArtElement`] and [`AsciiHook`] adapt
//! the renderer to attribute-driven and programmatic callers.

mod ascii;
pub mod config;
mod element;
mod hook;
mod image_pipeline;
mod registry;
mod scheduler;

use std::path::Path;

use log::debug;

pub use ascii::{
    grid::{CellGlyph, GlyphGrid},
    mapping::GlyphMapper,
    ramp::{Ramp, DEFAULT_CHARSET},
};
pub use config::RenderConfig;
pub use element::{AsciiArtElement, RenderTarget, LOAD_FAILED_TEXT, TAG_NAME};
pub use hook::{AsciiHook, HookOptions, HookOutcome};
pub use image_pipeline::{
    adjust::{luminance, ToneAdjust},
    loader::{FsLoader, ImageLoader, SourceImage},
    resize::{
        clamp_scale, HostBounds, LayoutPolicy, TargetGeometry, CHAR_ASPECT, DEFAULT_SCALE,
        MAX_SCALE, MIN_SCALE,
    },
};
pub use registry::ElementRegistry;
pub use scheduler::{FrameRequest, FrameScheduler};

use image_pipeline::resize;

#[derive(Debug, thiserror::Error)]
pub enum AsciiError {
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to load image {src}: {source}")]
    Load {
        src: String,
        #[source]
        source: image::ImageError,
    },
    #[error("pixel buffer holds {found} bytes, expected {expected}")]
    PixelBuffer { expected: usize, found: usize },
}

/// Text block or colored grid, depending on the color flag of the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rendering {
    Text(String),
    Colored(GlyphGrid),
}

impl Rendering {
    /// Plain text, dropping color information if present.
    pub fn to_text(&self) -> String {
        match self {
            Rendering::Text(text) => text.clone(),
            Rendering::Colored(grid) => grid.to_text(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    pub rendering: Rendering,
    pub geometry: TargetGeometry,
}

/// Stateless conversion engine. Identical inputs always produce identical
/// output.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiRenderer;

impl AsciiRenderer {
    pub fn render_path<P: AsRef<Path>>(
        &self,
        path: P,
        config: &RenderConfig,
        container: (u32, u32),
    ) -> Result<RenderOutput, AsciiError> {
        let image = SourceImage::open(path)?;
        Ok(self.render(&image, config, container))
    }

    /// Fit layout: host box from max bounds, container or native size,
    /// scaled and fitted to the image's aspect ratio.
    pub fn render(
        &self,
        image: &SourceImage,
        config: &RenderConfig,
        container: (u32, u32),
    ) -> RenderOutput {
        let bounds = config.host_bounds().with_container(container.0, container.1);
        let (host_width, host_height) = bounds.resolve(image.width(), image.height());
        let layout = LayoutPolicy::Fit { host_width, host_height, scale: config.scale };

        self.render_with_layout(image, layout, config.ramp(), config.tone(), config.color)
    }

    /// Exact layout with default tone, always plain text.
    pub fn render_exact(
        &self,
        image: &SourceImage,
        columns: u32,
        rows: u32,
        charset: &str,
        invert: bool,
    ) -> String {
        let layout = LayoutPolicy::Exact { columns, rows };
        let ramp = Ramp::for_render(charset, invert);
        self.render_with_layout(image, layout, ramp, ToneAdjust::default(), false)
            .rendering
            .to_text()
    }

    pub fn render_with_layout(
        &self,
        image: &SourceImage,
        layout: LayoutPolicy,
        ramp: Ramp,
        tone: ToneAdjust,
        color: bool,
    ) -> RenderOutput {
        let (width, height) = image.dimensions();
        let geometry = layout.derive(width, height);
        debug!(
            "rendering {}x{} source into {}x{} cells",
            width, height, geometry.columns, geometry.rows
        );

        let pixels = resize::resample(image, geometry);
        let grid = GlyphMapper::new(ramp, tone).map_pixels(&pixels);

        let rendering =
            if color { Rendering::Colored(grid) } else { Rendering::Text(grid.to_text()) };
        RenderOutput { rendering, geometry }
    }
}
