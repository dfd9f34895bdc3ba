use log::warn;

use crate::ascii::ramp::DEFAULT_CHARSET;
use crate::image_pipeline::loader::{FsLoader, ImageLoader};
use crate::AsciiRenderer;

/// Inputs of the programmatic renderer. `width` and `height` are output
/// cell counts used as is; no scale or aspect fit is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HookOptions {
    pub src: String,
    pub charset: String,
    pub width: u32,
    pub height: u32,
    pub invert: bool,
}

impl HookOptions {
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self { src: src.into(), charset: DEFAULT_CHARSET.to_owned(), width, height, invert: false }
    }

    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookOutcome {
    /// Inputs identical to the previous run; nothing was done.
    Unchanged,
    Rendered,
    /// The source failed to load; the output target was left untouched.
    LoadFailed,
}

/// Re-renders into a caller-owned text target whenever its inputs change.
#[derive(Debug)]
pub struct AsciiHook<L: ImageLoader = FsLoader> {
    loader: L,
    renderer: AsciiRenderer,
    last: Option<HookOptions>,
}

impl Default for AsciiHook<FsLoader> {
    fn default() -> Self {
        Self::new(FsLoader::new())
    }
}

impl<L: ImageLoader> AsciiHook<L> {
    pub fn new(loader: L) -> Self {
        Self { loader, renderer: AsciiRenderer, last: None }
    }

    pub fn update(&mut self, options: &HookOptions, target: &mut String) -> HookOutcome {
        if self.last.as_ref() == Some(options) {
            return HookOutcome::Unchanged;
        }
        self.last = Some(options.clone());

        let image = match self.loader.load(&options.src) {
            Ok(image) => image,
            Err(err) => {
                warn!("{err}");
                return HookOutcome::LoadFailed;
            },
        };

        *target = self.renderer.render_exact(
            &image,
            options.width,
            options.height,
            &options.charset,
            options.invert,
        );
        HookOutcome::Rendered
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{AsciiError, SourceImage};

    struct CountingLoader {
        image: Option<SourceImage>,
        loads: usize,
    }

    impl ImageLoader for CountingLoader {
        fn load(&mut self, src: &str) -> Result<SourceImage, AsciiError> {
            self.loads += 1;
            self.image.clone().ok_or_else(|| AsciiError::Load {
                src: src.to_owned(),
                source: image::ImageError::IoError(io::ErrorKind::NotFound.into()),
            })
        }
    }

    fn black_hook() -> AsciiHook<CountingLoader> {
        let image = SourceImage::filled(10, 10, [0, 0, 0, 255]);
        AsciiHook::new(CountingLoader { image: Some(image), loads: 0 })
    }

    #[test]
    fn exact_size_ignores_aspect() {
        let mut hook = black_hook();
        let mut out = String::new();

        let outcome = hook.update(&HookOptions::new("black.png", 4, 2), &mut out);
        assert_eq!(outcome, HookOutcome::Rendered);
        assert_eq!(out, "    \n    ");
    }

    #[test]
    fn reruns_only_on_change() {
        let mut hook = black_hook();
        let mut out = String::new();
        let options = HookOptions::new("black.png", 3, 1);

        hook.update(&options, &mut out);
        assert_eq!(hook.update(&options, &mut out), HookOutcome::Unchanged);
        assert_eq!(hook.loader.loads, 1);

        let inverted = options.clone().invert(true);
        assert_eq!(hook.update(&inverted, &mut out), HookOutcome::Rendered);
        assert_eq!(out, "@@@");
        assert_eq!(hook.loader.loads, 2);
    }

    #[test]
    fn custom_charset() {
        let mut hook = black_hook();
        let mut out = String::new();
        hook.update(&HookOptions::new("black.png", 2, 1).charset("ab"), &mut out);
        assert_eq!(out, "bb");
    }

    #[test]
    fn load_failure_keeps_previous_text() {
        let mut hook = AsciiHook::new(CountingLoader { image: None, loads: 0 });
        let mut out = String::from("previous");
        let outcome = hook.update(&HookOptions::new("gone.png", 2, 2), &mut out);
        assert_eq!(outcome, HookOutcome::LoadFailed);
        assert_eq!(out, "previous");
    }
}
