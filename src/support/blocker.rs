//! Site blocking overlay
//!
//! The overlay is an element of a [`Document`] whose display style is toggled
//! while a request is in flight. Documents without the element are tolerated.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::trace;

use crate::constants::BLOCKER_ELEMENT_ID;

/// Display style of a document element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayStyle {
    /// The element is rendered (css `block`)
    Block,
    /// The element is not rendered (css `none`)
    Hidden,
}

impl DisplayStyle {
    /// The css `display` value for this style
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Hidden => "none",
        }
    }
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// A document whose elements can be shown or hidden
pub trait Document: Send + Sync {
    /// Apply `style` to the element with id `element_id`
    ///
    /// Returns `false` when the document has no such element.
    fn set_display(&self, element_id: &str, style: DisplayStyle) -> bool;
}

/// In-memory document for headless use
///
/// Every display change applied to an existing element is also appended to a
/// history, so the sequence of overlay states can be inspected afterwards.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

#[derive(Debug, Default)]
struct DocumentState {
    elements: HashMap<String, DisplayStyle>,
    history:  Vec<(String, DisplayStyle)>,
}

impl MemoryDocument {
    /// Create a document without any element
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding one element with the given initial style
    pub fn with_element(element_id: impl Into<String>, style: DisplayStyle) -> Self {
        let document = Self::new();
        document.insert_element(element_id, style);
        document
    }

    /// Add an element, replacing any element with the same id
    pub fn insert_element(&self, element_id: impl Into<String>, style: DisplayStyle) {
        self.lock().elements.insert(element_id.into(), style);
    }

    /// Current display style of an element, `None` if it does not exist
    #[must_use]
    pub fn display_of(&self, element_id: &str) -> Option<DisplayStyle> {
        self.lock().elements.get(element_id).copied()
    }

    /// Styles applied to an element so far, oldest first
    #[must_use]
    pub fn history_of(&self, element_id: &str) -> Vec<DisplayStyle> {
        self.lock()
            .history
            .iter()
            .filter(|(id, _)| id == element_id)
            .map(|(_, style)| *style)
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DocumentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Document for MemoryDocument {
    fn set_display(&self, element_id: &str, style: DisplayStyle) -> bool {
        let mut state = self.lock();
        let Some(current) = state.elements.get_mut(element_id) else {
            return false;
        };
        *current = style;
        state.history.push((element_id.to_string(), style));
        true
    }
}

/// Blocks or unblocks the site for user interaction
#[derive(Clone)]
pub struct SiteBlocker {
    document: Arc<dyn Document>,
}

impl SiteBlocker {
    /// Create a blocker operating on the `blocker` element of `document`
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self { document }
    }

    /// Show the overlay when `blocked` is true, hide it otherwise
    ///
    /// Does nothing when the document has no overlay element.
    pub fn set_blocked(&self, blocked: bool) {
        let style = if blocked {
            DisplayStyle::Block
        } else {
            DisplayStyle::Hidden
        };

        if self.document.set_display(BLOCKER_ELEMENT_ID, style) {
            trace!("Overlay display set to {}", style);
        } else {
            trace!("No overlay element, display left untouched");
        }
    }
}

impl fmt::Debug for SiteBlocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteBlocker").finish_non_exhaustive()
    }
}
