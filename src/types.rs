//! Core types shared by the document host, the layout bridge and the engine.

use std::fmt;

// =============================================================================
// Dimension
// =============================================================================

/// A length as understood by the cell-grid layout.
///
/// One cell is one terminal column horizontally and one row vertically.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Size from content (or stretch, for widths inside a block).
    #[default]
    Auto,
    /// Absolute size in cells.
    Cells(u16),
    /// Percentage of the containing block (0-100).
    Percent(f32),
}

impl Dimension {
    /// Parse an inline style value.
    ///
    /// Accepts `N`, `Npx` (one pixel is one cell), `N%`, `auto` and the empty
    /// string. `none` is accepted for max-size properties and means unbounded,
    /// which the layout treats the same as `Auto`. Anything else yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("auto") || value.eq_ignore_ascii_case("none") {
            return Some(Self::Auto);
        }

        if let Some(pct) = value.strip_suffix('%') {
            let p: f32 = pct.trim().parse().ok()?;
            return (p.is_finite() && p >= 0.0).then_some(Self::Percent(p));
        }

        let number = value.strip_suffix("px").unwrap_or(value).trim();
        let n: f32 = number.parse().ok()?;
        if !n.is_finite() || n < 0.0 {
            return None;
        }
        Some(Self::Cells(n.round().min(u16::MAX as f32) as u16))
    }

    /// Check if this dimension is content-sized.
    #[inline]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        Self::Cells(value)
    }
}

// =============================================================================
// Display
// =============================================================================

/// Outer display type of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Generates a block box laid out as a column.
    #[default]
    Block,
    /// Flows into the enclosing block's line boxes.
    Inline,
    /// Generates no box; contents are neither laid out nor painted.
    None,
}

impl Display {
    /// Default display for an element tag, mirroring the user-agent sheet.
    pub fn for_tag(tag: &str) -> Self {
        match tag {
            "a" | "abbr" | "b" | "code" | "em" | "i" | "kbd" | "label" | "mark" | "q" | "s"
            | "small" | "span" | "strong" | "sub" | "sup" | "u" => Self::Inline,
            _ => Self::Block,
        }
    }

    /// Parse a `display` value. Unknown keywords yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "block" | "flex" => Some(Self::Block),
            "inline" | "inline-block" => Some(Self::Inline),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

// =============================================================================
// StyleProperty
// =============================================================================

/// Inline style properties a host exposes.
///
/// The truncation engine only touches `Height`, `MaxHeight` and `Display`;
/// the rest feed the cell-grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StyleProperty {
    Height,
    MaxHeight,
    Width,
    Display,
    Padding,
    LineHeight,
}

impl StyleProperty {
    /// CSS property name.
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::MaxHeight => "max-height",
            Self::Width => "width",
            Self::Display => "display",
            Self::Padding => "padding",
            Self::LineHeight => "line-height",
        }
    }

    /// Look up a property by its CSS name.
    pub fn from_css_name(name: &str) -> Option<Self> {
        Some(match name.trim() {
            "height" => Self::Height,
            "max-height" => Self::MaxHeight,
            "width" => Self::Width,
            "display" => Self::Display,
            "padding" => Self::Padding,
            "line-height" => Self::LineHeight,
            _ => return None,
        })
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_parse_cells() {
        assert_eq!(Dimension::parse("12"), Some(Dimension::Cells(12)));
        assert_eq!(Dimension::parse("12px"), Some(Dimension::Cells(12)));
        assert_eq!(Dimension::parse(" 3 "), Some(Dimension::Cells(3)));
    }

    #[test]
    fn test_dimension_parse_keywords() {
        assert_eq!(Dimension::parse(""), Some(Dimension::Auto));
        assert_eq!(Dimension::parse("auto"), Some(Dimension::Auto));
        assert_eq!(Dimension::parse("none"), Some(Dimension::Auto));
    }

    #[test]
    fn test_dimension_parse_percent() {
        assert_eq!(Dimension::parse("50%"), Some(Dimension::Percent(50.0)));
    }

    #[test]
    fn test_dimension_parse_rejects_garbage() {
        assert_eq!(Dimension::parse("tall"), None);
        assert_eq!(Dimension::parse("-4"), None);
        assert_eq!(Dimension::parse("NaN"), None);
    }

    #[test]
    fn test_display_for_tag() {
        assert_eq!(Display::for_tag("span"), Display::Inline);
        assert_eq!(Display::for_tag("a"), Display::Inline);
        assert_eq!(Display::for_tag("p"), Display::Block);
        assert_eq!(Display::for_tag("div"), Display::Block);
    }

    #[test]
    fn test_style_property_names_round_trip() {
        for prop in [
            StyleProperty::Height,
            StyleProperty::MaxHeight,
            StyleProperty::Width,
            StyleProperty::Display,
            StyleProperty::Padding,
            StyleProperty::LineHeight,
        ] {
            assert_eq!(StyleProperty::from_css_name(prop.css_name()), Some(prop));
        }
    }
}
