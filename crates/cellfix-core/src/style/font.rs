//! Font style types

/// Font style settings for a whole cell
///
/// A value type: two fonts with equal fields are interchangeable. Build one
/// from [`FontStyle::default`] and override only what a cell needs:
///
/// ```
/// use cellfix_core::{FontStyle, Underline};
///
/// let font = FontStyle::new().with_bold(true).with_underline(Underline::Single);
/// assert_eq!(font.name, "Calibri");
/// assert!(font.bold && !font.italic);
/// ```
#[derive(Debug, Clone)]
pub struct FontStyle {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: String,
    /// Font size in points; the writer rejects sizes that are not finite and positive
    pub size: f64,
    /// Bold
    pub bold: bool,
    /// Italic
    pub italic: bool,
    /// Underline style
    pub underline: Underline,
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            name: "Calibri".to_string(),
            size: 11.0,
            bold: false,
            italic: false,
            underline: Underline::None,
        }
    }
}

impl FontStyle {
    /// Create a new default font
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font name
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Set font size
    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    /// Set bold
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    /// Set italic
    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// Set underline
    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    /// Check whether every attribute equals its default
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Short human-readable summary of the non-plain flags, e.g. "bold, italic"
    pub fn describe_flags(&self) -> String {
        let mut flags = Vec::new();
        if self.bold {
            flags.push("bold");
        }
        if self.italic {
            flags.push("italic");
        }
        if self.underline == Underline::Single {
            flags.push("underline");
        }
        if flags.is_empty() {
            "plain".to_string()
        } else {
            flags.join(", ")
        }
    }
}

// Sizes compare by bit pattern so equality stays reflexive and agrees with Hash
impl PartialEq for FontStyle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size.to_bits() == other.size.to_bits()
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
    }
}

impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
    }
}

impl Eq for FontStyle {}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    /// No underline
    #[default]
    None,
    /// Single underline
    Single,
}
