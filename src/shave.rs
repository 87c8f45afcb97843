//! The truncation engine.
//!
//! For each target element, in order:
//!
//! 1. Undo a previous truncation (marker removed, hidden remainder folded
//!    back into one text node).
//! 2. Tokenize the full text; fewer than two tokens means nothing to cut.
//! 3. Clear inline `height` / `max-height` so the element measures its
//!    natural flow.
//! 4. If it already fits, restore the styles and stop.
//! 5. Binary search the longest token prefix that fits together with the
//!    marker. Every search step is one mutation followed by one height read, so an
//!    element costs O(log n) reflows.
//! 6. Commit prefix + marker + hidden remainder.
//! 7. Restore the saved inline styles.
//!
//! Truncation state lives only in the document: an element is shaved iff it
//! holds a remainder-class descendant. Calling again re-derives everything
//! from the original text.

use tracing::{debug, trace, warn};

use crate::config::{Config, Marker, ShaveOptions};
use crate::error::{ElementProcessingFailure, HostError, ShaveError};
use crate::host::Host;
use crate::report::{ElementOutcome, ShaveReport};
use crate::target::Target;
use crate::types::StyleProperty;

/// Truncate every target so its rendered height is at most `max_height`.
///
/// `max_height` is `None` when the caller did not supply one; that and `NaN`
/// fail with [`ShaveError::InvalidArgument`] before anything is touched. A
/// selector that matches nothing is not an error.
///
/// Errors on individual elements do not stop the call. They are logged and
/// returned in the report, and the element is left in whatever state it
/// reached.
///
/// # Example
///
/// ```
/// use spark_shave::{Document, ShaveOptions, shave};
///
/// let mut doc = Document::new(10);
/// let p = doc.create_element("p");
/// doc.set_text_content(p, "alpha beta gamma delta").unwrap();
/// doc.append_child(doc.root(), p).unwrap();
///
/// shave(&mut doc, p, Some(1.0), &ShaveOptions::default()).unwrap();
/// assert_eq!(doc.inner_text(p).unwrap(), "alpha…");
/// assert_eq!(doc.text_content(p).unwrap(), "alpha… beta gamma delta");
/// ```
pub fn shave<'a, H, T>(
    host: &mut H,
    target: T,
    max_height: Option<f64>,
    options: &ShaveOptions,
) -> Result<ShaveReport<H::Node>, ShaveError>
where
    H: Host + ?Sized,
    T: Into<Target<'a, H::Node>>,
{
    let max_height = match max_height {
        Some(h) if !h.is_nan() => h,
        _ => return Err(ShaveError::InvalidArgument("maxHeight is required")),
    };

    let nodes = resolve(host, target.into())?;
    let config = Config::resolve(options);
    let mut report = ShaveReport::with_capacity(nodes.len());

    for (position, node) in nodes.into_iter().enumerate() {
        let outcome = match shave_element(host, node, max_height, &config) {
            Ok(outcome) => {
                debug!(position, ?node, ?outcome, "shave");
                outcome
            }
            Err(source) => {
                warn!(position, ?node, error = %source, "could not shave element");
                ElementOutcome::Failed(ElementProcessingFailure { position, source })
            }
        };
        report.push(node, outcome);
    }

    Ok(report)
}

/// Undo a previous truncation on every target without truncating again.
///
/// `options` must name the same classes the truncation was done with.
pub fn unshave<'a, H, T>(
    host: &mut H,
    target: T,
    options: &ShaveOptions,
) -> Result<ShaveReport<H::Node>, ShaveError>
where
    H: Host + ?Sized,
    T: Into<Target<'a, H::Node>>,
{
    let nodes = resolve(host, target.into())?;
    let config = Config::resolve(options);
    let mut report = ShaveReport::with_capacity(nodes.len());

    for (position, node) in nodes.into_iter().enumerate() {
        let outcome = match restore_original(host, node, &config) {
            Ok(true) => ElementOutcome::Restored,
            Ok(false) => ElementOutcome::Untouched,
            Err(source) => {
                warn!(position, ?node, error = %source, "could not unshave element");
                ElementOutcome::Failed(ElementProcessingFailure { position, source })
            }
        };
        report.push(node, outcome);
    }

    Ok(report)
}

fn resolve<H: Host + ?Sized>(host: &H, target: Target<'_, H::Node>) -> Result<Vec<H::Node>, ShaveError> {
    let selector = target.selector();
    target.resolve(host).map_err(|source| ShaveError::Selector {
        selector: selector.unwrap_or_default().to_string(),
        source,
    })
}

// =============================================================================
// Per-element steps
// =============================================================================

fn shave_element<H: Host + ?Sized>(
    host: &mut H,
    node: H::Node,
    max_height: f64,
    config: &Config,
) -> Result<ElementOutcome, HostError> {
    restore_original(host, node, config)?;

    let full_text = host.text_content(node)?;
    let tokens = config.tokenizer.split(&full_text);
    if tokens.len() < 2 {
        return Ok(ElementOutcome::TooFewTokens);
    }

    let saved = SavedHeights::neutralize(host, node)?;
    let fitted = fit(host, node, &tokens, max_height, config);
    let restored = saved.restore(host, node);

    let outcome = fitted?;
    restored?;
    Ok(outcome)
}

/// Remove the marker and fold the hidden remainder back into the text.
///
/// Returns whether there was a truncation to undo.
fn restore_original<H: Host + ?Sized>(host: &mut H, node: H::Node, config: &Config) -> Result<bool, HostError> {
    let Some(hidden) = host.query_class(node, &config.remainder_class)? else {
        return Ok(false);
    };

    if let Some(marker) = host.query_class(node, &config.marker_class)?.filter(|&m| m != hidden) {
        host.discard(marker)?;
    }
    // Re-assigning the text collapses the prefix and remainder nodes into one.
    let text = host.text_content(node)?;
    host.set_text_content(node, &text)?;
    host.discard(hidden)?;
    Ok(true)
}

/// Search for the longest fitting prefix and commit it.
fn fit<H: Host + ?Sized>(
    host: &mut H,
    node: H::Node,
    tokens: &[&str],
    max_height: f64,
    config: &Config,
) -> Result<ElementOutcome, HostError> {
    if host.offset_height(node)? <= max_height {
        return Ok(ElementOutcome::AlreadyFits);
    }

    let marker = create_marker(host, config)?;
    match cut(host, node, tokens, max_height, marker, config) {
        Ok(kept) => Ok(ElementOutcome::Shaved {
            kept,
            total: tokens.len(),
        }),
        Err(err) => {
            // Put the full text back so a failed element never loses content.
            let rollback = host
                .set_text_content(node, &config.tokenizer.join(tokens))
                .and_then(|()| host.discard(marker));
            if let Err(rollback_err) = rollback {
                warn!(?node, error = %rollback_err, "could not roll back partial truncation");
            }
            Err(err)
        }
    }
}

/// Binary search the prefix length, then install prefix, marker and remainder.
fn cut<H: Host + ?Sized>(
    host: &mut H,
    node: H::Node,
    tokens: &[&str],
    max_height: f64,
    marker: H::Node,
    config: &Config,
) -> Result<usize, HostError> {
    // The whole sequence is known not to fit, so the answer is in [0, n-1].
    // Upper-mid pivots make ties resolve toward the longer prefix.
    let mut min = 0;
    let mut max = tokens.len() - 1;
    while min < max {
        let pivot = (min + max).div_ceil(2);
        show_prefix(host, node, &tokens[..pivot], marker, config)?;
        let height = host.offset_height(node)?;
        trace!(pivot, height, "search step");
        if height > max_height {
            max = pivot - 1;
        } else {
            min = pivot;
        }
    }

    show_prefix(host, node, &tokens[..max], marker, config)?;

    let hidden = host.create_element("span")?;
    let installed = host
        .add_class(hidden, &config.remainder_class)
        .and_then(|()| host.set_style(hidden, StyleProperty::Display, "none"))
        .and_then(|()| host.set_text_content(hidden, &config.tokenizer.remainder(tokens, max)))
        .and_then(|()| host.append_child(node, hidden));
    if let Err(err) = installed {
        if let Err(discard_err) = host.discard(hidden) {
            warn!(?node, error = %discard_err, "could not discard remainder node");
        }
        return Err(err);
    }
    Ok(max)
}

fn show_prefix<H: Host + ?Sized>(
    host: &mut H,
    node: H::Node,
    prefix: &[&str],
    marker: H::Node,
    config: &Config,
) -> Result<(), HostError> {
    host.set_text_content(node, &config.tokenizer.join(prefix))?;
    host.append_child(node, marker)
}

fn create_marker<H: Host + ?Sized>(host: &mut H, config: &Config) -> Result<H::Node, HostError> {
    let marker = host.create_element(config.marker_tag())?;
    if let Marker::Link { attributes, .. } = &config.marker {
        for (name, value) in attributes {
            host.set_attribute(marker, name, value)?;
        }
    }
    // After the link attributes, so a `class` entry cannot drop the marker class.
    host.add_class(marker, &config.marker_class)?;
    host.set_text_content(marker, config.marker_text())?;
    Ok(marker)
}

// =============================================================================
// Style save / restore
// =============================================================================

/// Inline `height` / `max-height` as they were before the call.
struct SavedHeights {
    height: String,
    max_height: String,
}

impl SavedHeights {
    /// Save the current values and unclamp the element for measuring.
    fn neutralize<H: Host + ?Sized>(host: &mut H, node: H::Node) -> Result<Self, HostError> {
        let saved = Self {
            height: host.style(node, StyleProperty::Height)?,
            max_height: host.style(node, StyleProperty::MaxHeight)?,
        };

        let unclamped = host
            .set_style(node, StyleProperty::Height, "auto")
            .and_then(|()| host.set_style(node, StyleProperty::MaxHeight, "none"));
        if let Err(err) = unclamped {
            if let Err(restore_err) = saved.restore(host, node) {
                warn!(?node, error = %restore_err, "could not restore height styles");
            }
            return Err(err);
        }
        Ok(saved)
    }

    fn restore<H: Host + ?Sized>(&self, host: &mut H, node: H::Node) -> Result<(), HostError> {
        host.set_style(node, StyleProperty::Height, &self.height)?;
        host.set_style(node, StyleProperty::MaxHeight, &self.max_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use pretty_assertions::assert_eq;

    fn paragraph(doc: &mut Document, css: &str, text: &str) -> NodeId {
        let p = doc.create_element("p");
        doc.set_css_text(p, css).unwrap();
        doc.set_text_content(p, text).unwrap();
        doc.append_child(doc.root(), p).unwrap();
        p
    }

    fn defaults() -> ShaveOptions {
        ShaveOptions::default()
    }

    #[test]
    fn test_missing_or_nan_height_is_rejected() {
        let mut doc = Document::new(10);
        let p = paragraph(&mut doc, "", "alpha beta gamma delta");
        let reflows = doc.reflow_count();

        for bad in [None, Some(f64::NAN)] {
            let err = shave(&mut doc, p, bad, &defaults()).unwrap_err();
            assert!(matches!(err, ShaveError::InvalidArgument(_)));
        }
        assert_eq!(doc.text_content(p).unwrap(), "alpha beta gamma delta");
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.reflow_count(), reflows);
    }

    #[test]
    fn test_validation_happens_before_selector_parsing() {
        let mut doc = Document::new(10);
        let err = shave(&mut doc, "p >", None, &defaults()).unwrap_err();
        assert!(matches!(err, ShaveError::InvalidArgument(_)));

        let err = shave(&mut doc, "p >", Some(1.0), &defaults()).unwrap_err();
        assert!(matches!(err, ShaveError::Selector { .. }));
    }

    #[test]
    fn test_empty_selection_is_a_no_op() {
        let mut doc = Document::new(10);
        let report = shave(&mut doc, ".missing", Some(1.0), &defaults()).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn test_binary_search_keeps_longest_prefix() {
        let mut doc = Document::new(40);
        // At width 11, "alpha beta…" is one line; adding " gamma" wraps.
        let p = paragraph(&mut doc, "width: 11", "alpha beta gamma delta");
        let report = shave(&mut doc, p, Some(1.0), &defaults()).unwrap();

        assert!(matches!(
            report.outcome(p),
            Some(ElementOutcome::Shaved { kept: 2, total: 4 })
        ));
        assert_eq!(doc.inner_text(p).unwrap(), "alpha beta…");
        assert_eq!(doc.offset_height(p).unwrap(), 1);
    }

    #[test]
    fn test_search_reflows_are_logarithmic() {
        let mut doc = Document::new(40);
        let words: Vec<String> = (0..64).map(|i| format!("w{i}")).collect();
        let p = paragraph(&mut doc, "width: 20", &words.join(" "));
        let before = doc.reflow_count();

        shave(&mut doc, p, Some(2.0), &defaults()).unwrap();
        // one fast-path read plus ceil(log2(64)) search steps
        assert!(doc.reflow_count() - before <= 1 + 6);
    }

    #[test]
    fn test_saved_styles_are_restored() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 10; height: 5; max-height: 2", "alpha beta gamma delta");
        shave(&mut doc, p, Some(2.0), &defaults()).unwrap();

        assert_eq!(doc.style_value(p, StyleProperty::Height).unwrap(), "5");
        assert_eq!(doc.style_value(p, StyleProperty::MaxHeight).unwrap(), "2");
        // the clamp did not influence the search: two lines of text were kept
        assert_eq!(doc.inner_text(p).unwrap(), "alpha beta gamma…");
    }

    #[test]
    fn test_empty_styles_stay_empty() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 10", "alpha beta gamma delta");
        shave(&mut doc, p, Some(1.0), &defaults()).unwrap();
        assert_eq!(doc.style_value(p, StyleProperty::Height).unwrap(), "");
        assert_eq!(doc.style_value(p, StyleProperty::MaxHeight).unwrap(), "");

        shave(&mut doc, p, Some(10.0), &defaults()).unwrap();
        assert_eq!(doc.style_value(p, StyleProperty::Height).unwrap(), "");
        assert_eq!(doc.style_value(p, StyleProperty::MaxHeight).unwrap(), "");
    }

    #[test]
    fn test_hidden_remainder_structure() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 11", "alpha beta gamma delta");
        shave(&mut doc, p, Some(1.0), &defaults()).unwrap();

        let children = doc.children(p).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(doc.text_data(children[0]), Some("alpha beta"));

        let marker = children[1];
        assert!(doc.has_class(marker, "js-shave-char"));
        assert_eq!(doc.text_content(marker).unwrap(), "…");

        let remainder = children[2];
        assert!(doc.has_class(remainder, "js-shave"));
        assert_eq!(doc.style_value(remainder, StyleProperty::Display).unwrap(), "none");
        assert_eq!(doc.text_content(remainder).unwrap(), " gamma delta");
    }

    #[test]
    fn test_unshave_restores_original() {
        let mut doc = Document::new(40);
        let text = "alpha  beta gamma delta";
        let p = paragraph(&mut doc, "width: 11", text);
        shave(&mut doc, p, Some(1.0), &defaults()).unwrap();
        assert_ne!(doc.inner_text(p).unwrap(), text);

        let report = unshave(&mut doc, p, &defaults()).unwrap();
        assert!(matches!(report.outcome(p), Some(ElementOutcome::Restored)));
        assert_eq!(doc.text_content(p).unwrap(), text);
        assert_eq!(doc.children(p).len(), 1);

        let report = unshave(&mut doc, p, &defaults()).unwrap();
        assert!(matches!(report.outcome(p), Some(ElementOutcome::Untouched)));
    }

    #[test]
    fn test_link_class_entry_keeps_marker_class() {
        let mut doc = Document::new(40);
        let p = paragraph(&mut doc, "width: 11", "alpha beta gamma delta");
        let options = ShaveOptions::from_json(r#"{"link": {"href": "/more", "class": "more"}}"#).unwrap();
        shave(&mut doc, p, Some(1.0), &options).unwrap();

        let marker = doc.find_by_class(p, "js-shave-char").unwrap().unwrap();
        assert!(doc.has_class(marker, "more"));
        assert_eq!(doc.element(marker).unwrap().tag(), "a");
    }
}
