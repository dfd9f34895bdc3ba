use image::imageops::{self, FilterType};
use image::RgbaImage;

use super::loader::SourceImage;

/// Monospace glyphs are roughly twice as tall as they are wide.
pub const CHAR_ASPECT: f64 = 0.5;
pub const MIN_SCALE: f64 = 0.05;
pub const MAX_SCALE: f64 = 1.0;
pub const DEFAULT_SCALE: f64 = 0.18;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetGeometry {
    pub columns: u32,
    pub rows: u32,
}

impl TargetGeometry {
    pub const UNIT: Self = Self { columns: 1, rows: 1 };
}

/// Bounding box candidates for the fit layout, in device pixels.
///
/// Each axis resolves independently to the first non-zero value of the
/// explicit maximum, the container size, and the image's native size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostBounds {
    pub max_width: u32,
    pub max_height: u32,
    pub container_width: u32,
    pub container_height: u32,
}

impl HostBounds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.max_width = width.unwrap_or(0);
        self.max_height = height.unwrap_or(0);
        self
    }

    pub fn with_container(mut self, width: u32, height: u32) -> Self {
        self.container_width = width;
        self.container_height = height;
        self
    }

    pub fn resolve(&self, native_width: u32, native_height: u32) -> (u32, u32) {
        (
            first_non_zero([self.max_width, self.container_width, native_width]),
            first_non_zero([self.max_height, self.container_height, native_height]),
        )
    }
}

fn first_non_zero(candidates: [u32; 3]) -> u32 {
    candidates.into_iter().find(|&value| value != 0).unwrap_or(0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutPolicy {
    /// Scale the host box, compensate for glyph aspect, then fit the image ratio.
    Fit { host_width: u32, host_height: u32, scale: f64 },
    /// Caller-supplied cell counts, used as is.
    Exact { columns: u32, rows: u32 },
}

impl LayoutPolicy {
    pub fn derive(&self, source_width: u32, source_height: u32) -> TargetGeometry {
        match *self {
            LayoutPolicy::Exact { columns, rows } => {
                TargetGeometry { columns: columns.max(1), rows: rows.max(1) }
            },
            LayoutPolicy::Fit { host_width, host_height, scale } => {
                if source_width == 0 || source_height == 0 {
                    return TargetGeometry::UNIT;
                }

                let scale = clamp_scale(scale);
                let mut columns = floor_at_least_one(f64::from(host_width) * scale);
                let mut rows = floor_at_least_one(f64::from(host_height) * scale / CHAR_ASPECT);

                let ratio = f64::from(source_width) / f64::from(source_height);
                if f64::from(columns) / f64::from(rows) > ratio {
                    columns = floor_at_least_one(f64::from(rows) * ratio);
                } else {
                    rows = floor_at_least_one(f64::from(columns) / ratio);
                }

                TargetGeometry { columns, rows }
            },
        }
    }
}

pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return DEFAULT_SCALE;
    }
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

fn floor_at_least_one(value: f64) -> u32 {
    // Float to int casts saturate, so huge hosts stay in range.
    (value.floor() as u32).max(1)
}

/// Resample the source to exactly one pixel per target cell.
pub fn resample(source: &SourceImage, geometry: TargetGeometry) -> RgbaImage {
    let Some(buffer) = source.to_buffer() else {
        return RgbaImage::new(geometry.columns, geometry.rows);
    };

    if buffer.dimensions() == (geometry.columns, geometry.rows) {
        return buffer;
    }

    imageops::resize(&buffer, geometry.columns, geometry.rows, FilterType::Triangle)
}
