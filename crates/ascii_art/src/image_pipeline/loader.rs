use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView, RgbaImage};
use log::debug;

use crate::AsciiError;

/// Decoded RGBA bitmap, row-major with four bytes per pixel.
///
/// A zero-sized image is representable so that degenerate sources can still
/// flow through the pipeline and collapse to a single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl SourceImage {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AsciiError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(AsciiError::PixelBuffer { expected, found: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// Single-colour image, mostly useful for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let pixels = rgba.iter().copied().cycle().take(count * 4).collect();
        Self { width, height, pixels }
    }

    pub fn from_dynamic(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self { width, height, pixels: image.to_rgba8().into_raw() }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, AsciiError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(&image))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AsciiError> {
        let path = path.as_ref();
        let image = image::open(path)?;
        let (w, h) = image.dimensions();
        debug!("loaded source image {}x{} from {}", w, h, path.display());
        Ok(Self::from_dynamic(&image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy into an `image` buffer, `None` for zero-sized sources.
    pub(crate) fn to_buffer(&self) -> Option<RgbaImage> {
        if self.is_empty() {
            return None;
        }
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }
}

/// Resolves an image source reference into a decoded bitmap.
pub trait ImageLoader {
    fn load(&mut self, src: &str) -> Result<SourceImage, AsciiError>;
}

/// Loads sources from the local filesystem, optionally relative to a root.
#[derive(Clone, Debug, Default)]
pub struct FsLoader {
    root: Option<PathBuf>,
}

impl FsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: Some(root.into()) }
    }

    fn resolve(&self, src: &str) -> PathBuf {
        let src = src.strip_prefix("file://").unwrap_or(src);
        match &self.root {
            Some(root) => root.join(src),
            None => PathBuf::from(src),
        }
    }
}

impl ImageLoader for FsLoader {
    fn load(&mut self, src: &str) -> Result<SourceImage, AsciiError> {
        let path = self.resolve(src);
        SourceImage::open(&path).map_err(|err| match err {
            AsciiError::Image(source) => AsciiError::Load { src: src.to_owned(), source },
            other => other,
        })
    }
}
