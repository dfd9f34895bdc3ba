use std::collections::HashSet;

use log::debug;

use crate::element::{AsciiArtElement, TAG_NAME};
use crate::image_pipeline::loader::ImageLoader;

/// Tag registrations owned by the hosting application.
///
/// Registration is an explicit call rather than a side effect of linking the
/// crate, and defining the same tag twice is a no-op.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    defined: HashSet<String>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the `ascii-art` tag. Returns `true` only for the call that
    /// performed the registration.
    pub fn define_ascii_art(&mut self) -> bool {
        let newly_defined = self.defined.insert(TAG_NAME.to_owned());
        if newly_defined {
            debug!("registered <{TAG_NAME}>");
        }
        newly_defined
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.defined.contains(&tag.to_ascii_lowercase())
    }

    /// Instantiate an element for a registered tag.
    pub fn create<L: ImageLoader>(&self, tag: &str, loader: L) -> Option<AsciiArtElement<L>> {
        if !tag.eq_ignore_ascii_case(TAG_NAME) || !self.is_defined(TAG_NAME) {
            return None;
        }
        Some(AsciiArtElement::new(loader))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FsLoader;

    #[test]
    fn definition_is_idempotent() {
        let mut registry = ElementRegistry::new();
        assert!(!registry.is_defined("ascii-art"));
        assert!(registry.define_ascii_art());
        assert!(!registry.define_ascii_art());
        assert!(registry.is_defined("ASCII-ART"));
    }

    #[test]
    fn create_requires_registration() {
        let mut registry = ElementRegistry::new();
        assert!(registry.create("ascii-art", FsLoader::new()).is_none());

        registry.define_ascii_art();
        assert!(registry.create("ascii-art", FsLoader::new()).is_some());
        assert!(registry.create("image-art", FsLoader::new()).is_none());
    }
}
