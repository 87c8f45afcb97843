//! A small CSS selector subset.
//!
//! Supported: `*`, type (`p`), class (`.note`), id (`#intro`), compounds of
//! those (`p.note#intro`), the descendant combinator (whitespace) and
//! selector lists (`,`).

use crate::error::HostError;

/// One compound selector, e.g. `p.note#intro`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// A chain of compounds joined by descendant combinators, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    pub compounds: Vec<Compound>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    pub selectors: Vec<Complex>,
}

/// What a matcher needs to know about an element.
pub trait Subject {
    fn tag(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

impl Compound {
    pub fn matches(&self, subject: &impl Subject) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(subject.tag()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if subject.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| subject.has_class(c))
    }
}

impl Complex {
    /// Match against an element and its ancestors, nearest ancestor first.
    pub fn matches<'s, S: Subject + 's>(
        &self,
        subject: &S,
        ancestors: impl IntoIterator<Item = &'s S>,
    ) -> bool {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(subject) {
            return false;
        }

        let mut pending = rest.iter().rev().peekable();
        for ancestor in ancestors {
            match pending.peek() {
                Some(compound) if compound.matches(ancestor) => {
                    pending.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        pending.peek().is_none()
    }
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(selector: &str) -> Result<Self, HostError> {
        let fail = |reason| HostError::InvalidSelector {
            selector: selector.to_string(),
            reason,
        };

        let mut selectors = Vec::new();
        for group in selector.split(',') {
            let mut compounds = Vec::new();
            for part in group.split_whitespace() {
                compounds.push(parse_compound(part).map_err(fail)?);
            }
            if compounds.is_empty() {
                return Err(fail("empty selector"));
            }
            selectors.push(Complex { compounds });
        }
        Ok(Self { selectors })
    }

    pub fn matches<'s, S: Subject + 's>(
        &self,
        subject: &S,
        ancestors: impl IntoIterator<Item = &'s S> + Clone,
    ) -> bool {
        self.selectors
            .iter()
            .any(|complex| complex.matches(subject, ancestors.clone()))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn parse_compound(part: &str) -> Result<Compound, &'static str> {
    let mut compound = Compound::default();
    let mut rest = part;

    if let Some(after) = rest.strip_prefix('*') {
        rest = after;
    } else {
        let end = rest.find(|c| !is_ident_char(c)).unwrap_or(rest.len());
        if end > 0 {
            compound.tag = Some(rest[..end].to_ascii_lowercase());
            rest = &rest[end..];
        }
    }

    while let Some(sigil) = rest.chars().next() {
        let body = &rest[sigil.len_utf8()..];
        let end = body.find(|c| !is_ident_char(c)).unwrap_or(body.len());
        if end == 0 {
            return Err("expected a name");
        }
        let name = body[..end].to_string();
        match sigil {
            '.' => compound.classes.push(name),
            '#' if compound.id.is_none() => compound.id = Some(name),
            '#' => return Err("duplicate id"),
            _ => return Err("unsupported syntax"),
        }
        rest = &body[end..];
    }

    Ok(compound)
}
