#![forbid(unsafe_code)]

//! Render-target capabilities.
//!
//! The reorder engine never touches a concrete UI toolkit. It issues
//! imperative commands against these traits: read a card's rectangle, set
//! its translation and transition, register a one-shot transition-end hook,
//! and move it within its container. A DOM binding, a retained-mode GUI or
//! the in-memory harness can all implement them.
//!
//! # Ownership
//!
//! During a reorder pass the engine has exclusive use of the container's
//! child order and of every card's translation and transition. Nothing else
//! may mutate them until the pass is played.

use std::fmt;

use flipboard_core::entries::EntriesTable;
use flipboard_core::{HouseId, Offset, Rect, ScoreDisplay, TransitionSpec};

/// Callback run once when a card's transform transition finishes.
pub type TransitionEndHook = Box<dyn FnOnce(&mut dyn CardStyle)>;

/// Inline style controls of a card.
pub trait CardStyle {
    /// Set the inline translation. [`Offset::ZERO`] clears it.
    fn set_translation(&mut self, offset: Offset);

    /// Set the inline transition. [`TransitionSpec::Inherit`] clears it.
    fn set_transition(&mut self, spec: TransitionSpec);
}

/// One visual card.
pub trait CardNode: CardStyle {
    /// Current bounding rectangle in page coordinates, including any
    /// translation currently rendered.
    fn rect(&self) -> Rect;

    /// Replace the score text.
    fn set_score_text(&mut self, text: &str);

    /// Register a hook for the next transform transition end.
    ///
    /// A card holds at most one hook: registering replaces any hook that has
    /// not fired yet, and firing consumes it.
    fn once_transition_end(&mut self, hook: TransitionEndHook);
}

/// The container holding one card per identity.
pub trait CardSurface {
    type Node: CardNode;

    /// Create one card per identity, in `order`, each showing `placeholder`.
    fn mount(&mut self, order: &[HouseId], placeholder: &str);

    /// Identities in current child order.
    fn order(&self) -> Vec<HouseId>;

    fn node(&self, id: &HouseId) -> Option<&Self::Node>;

    fn node_mut(&mut self, id: &HouseId) -> Option<&mut Self::Node>;

    /// Move a card to the end of the container. Returns `false` when the
    /// card is not mounted.
    fn append(&mut self, id: &HouseId) -> bool;

    /// Enable or suppress hover and other interactive feedback.
    fn set_interactive(&mut self, interactive: bool);

    /// Replace every card with a static message.
    fn show_failure(&mut self, text: &str);
}

/// Adapts a surface so the normalizer can write card score text.
pub(crate) struct SurfaceScores<'a, S>(pub(crate) &'a mut S);

impl<S: CardSurface> ScoreDisplay for SurfaceScores<'_, S> {
    fn show_score(&mut self, id: &HouseId, text: &str) {
        if let Some(node) = self.0.node_mut(id) {
            node.set_score_text(text);
        }
    }
}

/// Receiver for the historical entries view.
pub trait TableSink {
    /// Replace the view with `table`.
    fn show_table(&mut self, table: &EntriesTable);

    /// Replace the view with a static message.
    fn show_message(&mut self, text: &str);
}

/// Single-use storage for a [`TransitionEndHook`].
///
/// Card implementations embed one of these and call [`fire`] from their
/// transition-end notification.
///
/// [`fire`]: TransitionEndSlot::fire
#[derive(Default)]
pub struct TransitionEndSlot {
    hook: Option<TransitionEndHook>,
}

impl TransitionEndSlot {
    #[must_use]
    pub const fn new() -> Self {
        Self { hook: None }
    }

    /// Store `hook`, dropping any unfired one. Returns `true` if a hook was
    /// replaced.
    pub fn arm(&mut self, hook: TransitionEndHook) -> bool {
        self.hook.replace(hook).is_some()
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.hook.is_some()
    }

    /// Take the hook out, leaving the slot empty.
    pub fn take(&mut self) -> Option<TransitionEndHook> {
        self.hook.take()
    }

    /// Run the hook against `style` if one is armed.
    pub fn fire(&mut self, style: &mut dyn CardStyle) -> bool {
        match self.hook.take() {
            Some(hook) => {
                hook(style);
                true
            }
            None => false,
        }
    }

    /// Drop any armed hook without running it.
    pub fn clear(&mut self) {
        self.hook = None;
    }
}

impl fmt::Debug for TransitionEndSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEndSlot")
            .field("armed", &self.is_armed())
            .finish()
    }
}
