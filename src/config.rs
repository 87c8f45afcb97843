//! Options and their resolved form.
//!
//! [`ShaveOptions`] mirrors the options object callers pass from script:
//! every field is optional and it deserializes from the same JSON shape.
//! [`Config`] is the resolved, immutable value the engine threads through
//! one call.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::tokenize::Tokenizer;

/// Default marker text.
pub const DEFAULT_CHARACTER: &str = "…";
/// Default class of the hidden remainder wrapper.
pub const DEFAULT_CLASSNAME: &str = "js-shave";
/// Default class of the visible marker.
pub const DEFAULT_CHAR_CLASSNAME: &str = "js-shave-char";

/// A value in a link descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LinkValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl LinkValue {
    /// Truthiness as script would judge it.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
        }
    }

    /// Attribute string for this value.
    pub fn to_attribute(&self) -> String {
        match self {
            Self::Flag(b) => b.to_string(),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for LinkValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Attribute map used to turn the marker into a link.
pub type Link = BTreeMap<String, LinkValue>;

/// Caller-facing options. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShaveOptions {
    /// Marker text.
    pub character: Option<String>,
    /// Class of the hidden remainder wrapper.
    pub classname: Option<String>,
    /// Split on spaces (`true`) or per character (`false`).
    #[serde(deserialize_with = "lenient_bool")]
    pub spaces: Option<bool>,
    /// Class of the visible marker.
    pub charclassname: Option<String>,
    /// Attributes for a link marker. Ignored without a truthy `href`.
    #[serde(deserialize_with = "link_entries")]
    pub link: Option<Link>,
    /// Custom delimiter; overrides `spaces` when non-empty.
    pub delimiter: Option<String>,
}

/// Accept any JSON value for a boolean flag; non-booleans count as `true`.
fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| v.as_bool().unwrap_or(true)))
}

/// Read a link descriptor, dropping `null` entries.
fn link_entries<'de, D>(deserializer: D) -> Result<Option<Link>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<BTreeMap<String, Option<LinkValue>>>::deserialize(deserializer)?;
    Ok(entries.map(|entries| {
        entries
            .into_iter()
            .filter_map(|(name, value)| Some((name, value?)))
            .collect()
    }))
}

impl ShaveOptions {
    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The marker installed at the cut point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// A `span` holding the marker text.
    Plain,
    /// An `a` element with the given attributes.
    Link {
        attributes: Vec<(String, String)>,
        /// Replaces the marker character when present.
        text: Option<String>,
    },
}

/// Options resolved for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub character: String,
    pub remainder_class: String,
    pub marker_class: String,
    pub tokenizer: Tokenizer,
    pub marker: Marker,
}

/// Key of a link descriptor entry that sets the marker text.
const LINK_TEXT_KEY: &str = "textContent";

fn non_empty_or(value: &Option<String>, default: &str) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

impl Config {
    /// Resolve options against the defaults.
    pub fn resolve(options: &ShaveOptions) -> Self {
        let tokenizer = match options.delimiter.as_deref() {
            Some(d) if !d.is_empty() => Tokenizer::Delimiter(d.to_string()),
            _ if options.spaces.unwrap_or(true) => Tokenizer::Spaces,
            _ => Tokenizer::Graphemes,
        };

        let marker = match &options.link {
            Some(link) if link.get("href").is_some_and(LinkValue::is_truthy) => Marker::Link {
                attributes: link
                    .iter()
                    .filter(|(k, _)| k.as_str() != LINK_TEXT_KEY)
                    .map(|(k, v)| (k.clone(), v.to_attribute()))
                    .collect(),
                text: link
                    .get(LINK_TEXT_KEY)
                    .filter(|v| v.is_truthy())
                    .map(LinkValue::to_attribute),
            },
            _ => Marker::Plain,
        };

        Self {
            character: options.character.clone().unwrap_or_else(|| DEFAULT_CHARACTER.to_string()),
            remainder_class: non_empty_or(&options.classname, DEFAULT_CLASSNAME),
            marker_class: non_empty_or(&options.charclassname, DEFAULT_CHAR_CLASSNAME),
            tokenizer,
            marker,
        }
    }

    /// Text shown inside the marker element.
    pub fn marker_text(&self) -> &str {
        match &self.marker {
            Marker::Link { text: Some(text), .. } => text,
            _ => &self.character,
        }
    }

    /// Tag of the marker element.
    pub fn marker_tag(&self) -> &'static str {
        match self.marker {
            Marker::Plain => "span",
            Marker::Link { .. } => "a",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(&ShaveOptions::default())
    }
}
