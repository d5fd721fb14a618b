//! Cell styling types
//!
//! Formatting is limited to whole-cell fonts:
//! - [`Style`] - Complete cell style
//! - [`FontStyle`] - Font settings
//! - [`StylePool`] - Style deduplication

mod font;
mod pool;

pub use font::{FontStyle, Underline};
pub use pool::StylePool;

/// Complete cell style
///
/// Styles are deduplicated via [`StylePool`]; cells refer to them by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a style carrying the given font
    pub fn from_font(font: FontStyle) -> Self {
        Self { font }
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set underline
    pub fn underline(mut self, underline: Underline) -> Self {
        self.font.underline = underline;
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }
}

impl From<FontStyle> for Style {
    fn from(font: FontStyle) -> Self {
        Self::from_font(font)
    }
}
