use log::{debug, warn};

use crate::config::{AttributeKey, ElementAttributes, RenderConfig};
use crate::image_pipeline::loader::{FsLoader, ImageLoader, SourceImage};
use crate::scheduler::FrameScheduler;
use crate::{AsciiRenderer, GlyphGrid, Rendering, TargetGeometry};

pub const TAG_NAME: &str = "ascii-art";
pub const LOAD_FAILED_TEXT: &str = "[ascii-art] failed to load image";

/// What the element currently displays.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RenderTarget {
    #[default]
    Empty,
    Text(String),
    Colored(GlyphGrid),
    Failed(String),
}

impl RenderTarget {
    pub fn text(&self) -> Option<&str> {
        match self {
            RenderTarget::Text(text) | RenderTarget::Failed(text) => Some(text),
            RenderTarget::Empty | RenderTarget::Colored(_) => None,
        }
    }
}

impl From<Rendering> for RenderTarget {
    fn from(rendering: Rendering) -> Self {
        match rendering {
            Rendering::Text(text) => RenderTarget::Text(text),
            Rendering::Colored(grid) => RenderTarget::Colored(grid),
        }
    }
}

/// Attribute-driven adapter keeping a rendering in sync with its source
/// image, configuration and container size.
///
/// Every trigger only schedules a pass; the pass itself runs on the next
/// [`AsciiArtElement::animation_frame`] with whatever image, configuration
/// and size are current at that moment.
#[derive(Debug)]
pub struct AsciiArtElement<L: ImageLoader = FsLoader> {
    attributes: ElementAttributes,
    config: RenderConfig,
    loader: L,
    image: Option<SourceImage>,
    loaded_src: Option<String>,
    container: (u32, u32),
    connected: bool,
    observing_size: bool,
    scheduler: FrameScheduler,
    renderer: AsciiRenderer,
    target: RenderTarget,
    last_geometry: Option<TargetGeometry>,
    passes: u64,
}

impl Default for AsciiArtElement<FsLoader> {
    fn default() -> Self {
        Self::new(FsLoader::new())
    }
}

impl<L: ImageLoader> AsciiArtElement<L> {
    pub fn new(loader: L) -> Self {
        Self {
            attributes: ElementAttributes::new(),
            config: RenderConfig::default(),
            loader,
            image: None,
            loaded_src: None,
            container: (0, 0),
            connected: false,
            observing_size: false,
            scheduler: FrameScheduler::new(),
            renderer: AsciiRenderer,
            target: RenderTarget::Empty,
            last_geometry: None,
            passes: 0,
        }
    }

    pub fn connect(&mut self) {
        if self.connected {
            return;
        }
        self.connected = true;
        self.observing_size = true;

        // `src` may have changed while disconnected.
        if self.image.is_some() && self.loaded_src.as_deref() == Some(self.src()) {
            self.scheduler.schedule();
        } else {
            self.load_image();
        }
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
        self.observing_size = false;
        self.scheduler.cancel();
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Set an attribute by name. Unknown names are ignored.
    ///
    /// Writing `src` always reloads, even with an unchanged value, so a failed
    /// load can be retried by setting the same source again.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let Some(key) = AttributeKey::parse(name) else {
            debug!("ignoring unobserved attribute {name}");
            return;
        };
        let value = if key.is_flag() { "" } else { value };
        if self.attributes.set(key, value) || key == AttributeKey::Src {
            self.attribute_changed(key);
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        let Some(key) = AttributeKey::parse(name) else {
            return;
        };
        if self.attributes.remove(key) {
            self.attribute_changed(key);
        }
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        AttributeKey::parse(name).and_then(|key| self.attributes.get(key))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        AttributeKey::parse(name).is_some_and(|key| self.attributes.has(key))
    }

    fn attribute_changed(&mut self, key: AttributeKey) {
        self.config = RenderConfig::from_attributes(&self.attributes);

        if key == AttributeKey::Src {
            if self.connected {
                self.load_image();
            }
            return;
        }

        if key == AttributeKey::Bg {
            // Cosmetic only, the glyphs do not depend on it.
            return;
        }

        self.schedule_render();
    }

    /// Container size changed, as reported by the host's resize observer.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == self.container {
            return;
        }
        self.container = (width, height);
        if self.observing_size {
            self.schedule_render();
        }
    }

    /// Load `src` through the loader, replacing the active image.
    ///
    /// On failure the element shows [`LOAD_FAILED_TEXT`] and drops the previous
    /// image so later passes do not paint over the failure.
    pub fn load_image(&mut self) {
        let src = self.src().to_owned();
        if src.is_empty() {
            return;
        }

        match self.loader.load(&src) {
            Ok(image) => {
                debug!("loaded {src} ({}x{})", image.width(), image.height());
                self.image = Some(image);
                self.loaded_src = Some(src);
                self.schedule_render();
            },
            Err(err) => {
                warn!("{err}");
                self.image = None;
                self.loaded_src = None;
                self.scheduler.cancel();
                self.target = RenderTarget::Failed(LOAD_FAILED_TEXT.to_owned());
            },
        }
    }

    fn schedule_render(&mut self) {
        if self.connected && self.image.is_some() {
            self.scheduler.schedule();
        }
    }

    /// Display refresh tick. Runs the pending pass, if any, and reports
    /// whether the output was recomputed.
    pub fn animation_frame(&mut self) -> bool {
        if self.scheduler.take_due().is_none() {
            return false;
        }

        let Some(image) = &self.image else {
            return false;
        };

        let output = self.renderer.render(image, &self.config, self.container);
        self.last_geometry = Some(output.geometry);
        self.target = output.rendering.into();
        self.passes += 1;
        true
    }

    pub fn has_pending_render(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn target(&self) -> &RenderTarget {
        &self.target
    }

    pub fn geometry(&self) -> Option<TargetGeometry> {
        self.last_geometry
    }

    /// Number of passes executed so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn style_sheet(&self) -> String {
        format!(":host{{display:inline-block;background:{}}} pre{{font-size:12px}}", self.config.bg)
    }

    pub fn src(&self) -> &str {
        self.attributes.get(AttributeKey::Src).unwrap_or_default()
    }

    pub fn set_src(&mut self, src: Option<&str>) {
        self.set_or_remove(AttributeKey::Src, src.map(str::to_owned));
    }

    pub fn charset(&self) -> &str {
        &self.config.charset
    }

    pub fn set_charset(&mut self, charset: Option<&str>) {
        self.set_or_remove(AttributeKey::Charset, charset.map(str::to_owned));
    }

    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    pub fn set_scale(&mut self, scale: Option<f64>) {
        self.set_or_remove(AttributeKey::Scale, scale.map(|value| value.to_string()));
    }

    pub fn invert(&self) -> bool {
        self.config.invert
    }

    pub fn set_invert(&mut self, invert: bool) {
        self.set_or_remove(AttributeKey::Invert, invert.then(String::new));
    }

    pub fn color(&self) -> bool {
        self.config.color
    }

    pub fn set_color(&mut self, color: bool) {
        self.set_or_remove(AttributeKey::Color, color.then(String::new));
    }

    /// Zero when unset.
    pub fn max_width(&self) -> u32 {
        self.config.max_width.unwrap_or(0)
    }

    pub fn set_max_width(&mut self, width: Option<u32>) {
        self.set_or_remove(AttributeKey::MaxWidth, width.map(|value| value.to_string()));
    }

    /// Zero when unset.
    pub fn max_height(&self) -> u32 {
        self.config.max_height.unwrap_or(0)
    }

    pub fn set_max_height(&mut self, height: Option<u32>) {
        self.set_or_remove(AttributeKey::MaxHeight, height.map(|value| value.to_string()));
    }

    pub fn bg(&self) -> &str {
        &self.config.bg
    }

    pub fn set_bg(&mut self, bg: Option<&str>) {
        self.set_or_remove(AttributeKey::Bg, bg.map(str::to_owned));
    }

    pub fn contrast(&self) -> f64 {
        self.config.contrast
    }

    pub fn set_contrast(&mut self, contrast: Option<f64>) {
        self.set_or_remove(AttributeKey::Contrast, contrast.map(|value| value.to_string()));
    }

    pub fn brightness(&self) -> f64 {
        self.config.brightness
    }

    pub fn set_brightness(&mut self, brightness: Option<f64>) {
        self.set_or_remove(AttributeKey::Brightness, brightness.map(|value| value.to_string()));
    }

    fn set_or_remove(&mut self, key: AttributeKey, value: Option<String>) {
        let changed = match value {
            Some(value) => self.attributes.set(key, value) || key == AttributeKey::Src,
            None => self.attributes.remove(key),
        };
        if changed {
            self.attribute_changed(key);
        }
    }
}
