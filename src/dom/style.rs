//! Inline style declarations.
//!
//! Values are stored as the strings they were set with, the way
//! `element.style.height` round-trips in a browser. An empty string means
//! "no inline declaration". Typed accessors parse on read.

use std::collections::BTreeMap;

use crate::error::HostError;
use crate::types::{Dimension, Display, StyleProperty};

/// An element's inline style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: BTreeMap<StyleProperty, String>,
}

impl InlineStyle {
    /// Raw value of a property, `""` when not declared.
    pub fn get(&self, property: StyleProperty) -> &str {
        self.declarations.get(&property).map(String::as_str).unwrap_or("")
    }

    /// Set a property. An empty value removes the declaration.
    ///
    /// Values the layout cannot interpret are rejected so a bad write never
    /// silently changes geometry.
    pub fn set(&mut self, property: StyleProperty, value: &str) -> Result<(), HostError> {
        let value = value.trim();
        if value.is_empty() {
            self.declarations.remove(&property);
            return Ok(());
        }

        let valid = match property {
            StyleProperty::Display => Display::parse(value).is_some(),
            StyleProperty::LineHeight => value.parse::<u16>().is_ok_and(|n| n > 0) || value == "normal",
            StyleProperty::MaxHeight => Dimension::parse(value).is_some(),
            _ => value != "none" && Dimension::parse(value).is_some(),
        };
        if !valid {
            return Err(HostError::InvalidStyle {
                property: property.css_name(),
                value: value.to_string(),
            });
        }

        self.declarations.insert(property, value.to_string());
        Ok(())
    }

    /// Apply a `name: value; name: value` declaration block.
    ///
    /// Unknown property names are ignored, like a browser drops declarations
    /// it does not support.
    pub fn apply_css_text(&mut self, css: &str) -> Result<(), HostError> {
        for declaration in css.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            if let Some(property) = StyleProperty::from_css_name(name) {
                self.set(property, value)?;
            }
        }
        Ok(())
    }

    /// Declared `display`, if any.
    pub fn display(&self) -> Option<Display> {
        Display::parse(self.get(StyleProperty::Display))
    }

    /// Parsed dimension of a size property, `Auto` when undeclared.
    pub fn dimension(&self, property: StyleProperty) -> Dimension {
        Dimension::parse(self.get(property)).unwrap_or_default()
    }

    /// Declared padding in cells, applied on all four sides.
    pub fn padding(&self) -> u16 {
        match self.dimension(StyleProperty::Padding) {
            Dimension::Cells(n) => n,
            _ => 0,
        }
    }

    /// Declared line height in rows, if any.
    pub fn line_height(&self) -> Option<u16> {
        self.get(StyleProperty::LineHeight).parse().ok()
    }

    /// Serialize back to a declaration block.
    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{}: {};", property.css_name(), value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
