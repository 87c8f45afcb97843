//! Per-element diagnostics returned by a call.

use crate::error::ElementProcessingFailure;

/// What happened to one element.
#[derive(Debug)]
pub enum ElementOutcome {
    /// Truncated to `kept` of `total` tokens.
    Shaved { kept: usize, total: usize },
    /// The full text already fits; nothing was installed.
    AlreadyFits,
    /// Fewer than two tokens; the element was not touched.
    TooFewTokens,
    /// A previous truncation was undone.
    Restored,
    /// Nothing to undo.
    Untouched,
    /// A host error stopped processing of this element.
    Failed(ElementProcessingFailure),
}

impl ElementOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Outcomes in target order.
#[derive(Debug)]
pub struct ShaveReport<N> {
    entries: Vec<(N, ElementOutcome)>,
}

impl<N> Default for ShaveReport<N> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<N: Copy + Eq> ShaveReport<N> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, node: N, outcome: ElementOutcome) {
        self.entries.push((node, outcome));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (N, &ElementOutcome)> {
        self.entries.iter().map(|(n, o)| (*n, o))
    }

    /// Outcome for a node, if it was part of the call.
    pub fn outcome(&self, node: N) -> Option<&ElementOutcome> {
        self.entries.iter().find(|(n, _)| *n == node).map(|(_, o)| o)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ElementProcessingFailure> {
        self.entries.iter().filter_map(|(_, o)| match o {
            ElementOutcome::Failed(failure) => Some(failure),
            _ => None,
        })
    }

    /// Number of elements that ended up truncated.
    pub fn shaved(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, o)| matches!(o, ElementOutcome::Shaved { .. }))
            .count()
    }
}
