use std::collections::BTreeMap;

use crate::foundation::core::Rgb8;

/// Entity name to ring color, with a fallback for everyone else.
///
/// Lookups are exact string matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderPalette {
    colors: BTreeMap<String, Rgb8>,
    fallback: Rgb8,
}

impl Default for BorderPalette {
    fn default() -> Self {
        Self::new(Rgb8::BLACK)
            .with("Carl", Rgb8::new(0, 200, 0))
            .with("Julia", Rgb8::new(200, 0, 0))
    }
}

impl BorderPalette {
    /// Empty palette where every entity gets `fallback`.
    pub fn new(fallback: Rgb8) -> Self {
        Self {
            colors: BTreeMap::new(),
            fallback,
        }
    }

    /// Builder-style [`BorderPalette::insert`].
    pub fn with(mut self, name: impl Into<String>, color: Rgb8) -> Self {
        self.insert(name, color);
        self
    }

    /// Set the color for `name`, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, color: Rgb8) {
        self.colors.insert(name.into(), color);
    }

    /// Replace the fallback color.
    pub fn set_fallback(&mut self, color: Rgb8) {
        self.fallback = color;
    }

    /// Ring color for `name`.
    pub fn color_for(&self, name: &str) -> Rgb8 {
        self.colors.get(name).copied().unwrap_or(self.fallback)
    }

    /// Color used for names not in the table.
    pub fn fallback(&self) -> Rgb8 {
        self.fallback
    }
}
