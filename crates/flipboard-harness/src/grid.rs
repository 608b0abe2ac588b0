#![forbid(unsafe_code)]

//! In-memory card grid with simulated transform transitions.
//!
//! [`GridSurface`] lays cards out in a wrapping grid and models the parts of
//! a browser the reorder engine relies on:
//!
//! - `rect()` reports the layout slot plus the translation currently
//!   rendered, so a card caught mid-animation measures where it is drawn.
//! - Setting a translation under an animated transition starts a motion
//!   from the rendered offset; any other transition applies it at once.
//! - A motion that runs to completion fires the card's one-shot
//!   transition-end hook. A motion replaced before completion does not.
//!
//! Time only moves through [`GridSurface::advance`].

use std::time::Duration;

use flipboard_core::{HouseId, Offset, Rect, Transition, TransitionSpec};
use flipboard_runtime::{CardNode, CardStyle, CardSurface, TransitionEndHook, TransitionEndSlot};
use serde_json::json;

/// Geometry of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub card_width: f64,
    pub card_height: f64,
    pub gap: f64,
    pub origin: Offset,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 2,
            card_width: 240.0,
            card_height: 120.0,
            gap: 16.0,
            origin: Offset::new(32.0, 180.0),
        }
    }
}

impl GridLayout {
    /// Single column list.
    pub fn column() -> Self {
        Self {
            columns: 1,
            ..Self::default()
        }
    }

    /// Rectangle of the slot at `index` (row-major).
    pub fn slot(&self, index: usize) -> Rect {
        let columns = self.columns.max(1);
        let col = (index % columns) as f64;
        let row = (index / columns) as f64;
        Rect::new(
            self.origin.dx + col * (self.card_width + self.gap),
            self.origin.dy + row * (self.card_height + self.gap),
            self.card_width,
            self.card_height,
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Motion {
    from: Offset,
    to: Offset,
    transition: Transition,
    elapsed: Duration,
}

/// One card of a [`GridSurface`].
#[derive(Debug)]
pub struct GridCard {
    id: HouseId,
    layout: Rect,
    translation: Offset,
    rendered: Offset,
    transition: TransitionSpec,
    motion: Option<Motion>,
    hook: TransitionEndSlot,
    score_text: String,
    transition_ends: u32,
}

impl GridCard {
    fn new(id: HouseId, text: &str) -> Self {
        Self {
            id,
            layout: Rect::default(),
            translation: Offset::ZERO,
            rendered: Offset::ZERO,
            transition: TransitionSpec::Inherit,
            motion: None,
            hook: TransitionEndSlot::new(),
            score_text: text.to_owned(),
            transition_ends: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> &HouseId {
        &self.id
    }

    /// Slot rectangle, ignoring translation.
    #[inline]
    pub fn layout_rect(&self) -> Rect {
        self.layout
    }

    /// Inline translation as last set.
    #[inline]
    pub fn translation(&self) -> Offset {
        self.translation
    }

    /// Translation currently drawn.
    #[inline]
    pub fn rendered(&self) -> Offset {
        self.rendered
    }

    #[inline]
    pub fn transition(&self) -> TransitionSpec {
        self.transition
    }

    #[inline]
    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.motion.is_some()
    }

    #[inline]
    pub fn has_pending_hook(&self) -> bool {
        self.hook.is_armed()
    }

    /// Completed transform transitions so far.
    #[inline]
    pub fn transition_ends(&self) -> u32 {
        self.transition_ends
    }

    /// No inline translation and no inline transition.
    pub fn styles_clear(&self) -> bool {
        self.translation.is_zero() && self.transition == TransitionSpec::Inherit
    }

    fn advance(&mut self, dt: Duration) {
        let Some(mut motion) = self.motion else {
            return;
        };
        motion.elapsed = motion.elapsed.saturating_add(dt);
        if motion.elapsed >= motion.transition.duration {
            self.rendered = motion.to;
            self.motion = None;
            self.transition_ends += 1;
            let mut slot = std::mem::take(&mut self.hook);
            slot.fire(self);
            return;
        }
        let p = motion.transition.progress(motion.elapsed);
        self.rendered = motion.from + (motion.to - motion.from).scale(p);
        self.motion = Some(motion);
    }
}

impl CardStyle for GridCard {
    fn set_translation(&mut self, offset: Offset) {
        self.translation = offset;
        match self.transition {
            TransitionSpec::Animated(transition) if offset != self.rendered => {
                self.motion = Some(Motion {
                    from: self.rendered,
                    to: offset,
                    transition,
                    elapsed: Duration::ZERO,
                });
            }
            _ => {
                self.motion = None;
                self.rendered = offset;
            }
        }
    }

    fn set_transition(&mut self, spec: TransitionSpec) {
        self.transition = spec;
    }
}

impl CardNode for GridCard {
    fn rect(&self) -> Rect {
        self.layout.translated(self.rendered)
    }

    fn set_score_text(&mut self, text: &str) {
        text.clone_into(&mut self.score_text);
    }

    fn once_transition_end(&mut self, hook: TransitionEndHook) {
        self.hook.arm(hook);
    }
}

/// In-memory [`CardSurface`].
#[derive(Debug)]
pub struct GridSurface {
    layout: GridLayout,
    cards: Vec<GridCard>,
    interactive: bool,
    failure: Option<String>,
}

impl Default for GridSurface {
    fn default() -> Self {
        Self::new(GridLayout::default())
    }
}

impl GridSurface {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            cards: Vec::new(),
            interactive: true,
            failure: None,
        }
    }

    #[inline]
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    pub fn card(&self, id: &str) -> Option<&GridCard> {
        self.node(&HouseId::new(id))
    }

    pub fn cards(&self) -> impl Iterator<Item = &GridCard> {
        self.cards.iter()
    }

    /// Identities in child order, as plain strings.
    pub fn order_names(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.id.to_string()).collect()
    }

    /// Score texts in child order.
    pub fn score_texts(&self) -> Vec<String> {
        self.cards.iter().map(|c| c.score_text.clone()).collect()
    }

    #[inline]
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    #[inline]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Every card drawn at its slot with no inline styles.
    pub fn is_settled(&self) -> bool {
        self.cards
            .iter()
            .all(|c| !c.is_moving() && c.styles_clear() && c.rendered.is_zero())
    }

    /// Remove a card from the container, as if something else detached it.
    pub fn detach(&mut self, id: &str) -> bool {
        let id = HouseId::new(id);
        let Some(index) = self.cards.iter().position(|c| c.id == id) else {
            return false;
        };
        self.cards.remove(index);
        self.reflow();
        true
    }

    /// Let rendered time pass: progress motions and fire transition ends.
    pub fn advance(&mut self, dt: Duration) {
        for card in &mut self.cards {
            card.advance(dt);
        }
    }

    /// Drawn state of every card, in child order.
    pub fn paint(&self) -> serde_json::Value {
        let cards: Vec<_> = self
            .cards
            .iter()
            .map(|c| {
                let rect = c.rect();
                json!({
                    "id": c.id.as_str(),
                    "left": rect.left,
                    "top": rect.top,
                    "score": c.score_text,
                    "transform": c.translation.to_css(),
                    "transition": c.transition.to_css(),
                })
            })
            .collect();
        json!({
            "interactive": self.interactive,
            "failure": self.failure,
            "cards": cards,
        })
    }

    /// `blake3:<hex>` digest of [`paint`](Self::paint).
    pub fn checksum(&self) -> String {
        let painted = self.paint().to_string();
        format!("blake3:{}", blake3::hash(painted.as_bytes()).to_hex())
    }

    fn reflow(&mut self) {
        for (index, card) in self.cards.iter_mut().enumerate() {
            card.layout = self.layout.slot(index);
        }
    }
}

impl CardSurface for GridSurface {
    type Node = GridCard;

    fn mount(&mut self, order: &[HouseId], placeholder: &str) {
        self.cards = order
            .iter()
            .map(|id| GridCard::new(id.clone(), placeholder))
            .collect();
        self.failure = None;
        self.reflow();
    }

    fn order(&self) -> Vec<HouseId> {
        self.cards.iter().map(|c| c.id.clone()).collect()
    }

    fn node(&self, id: &HouseId) -> Option<&GridCard> {
        self.cards.iter().find(|c| c.id == *id)
    }

    fn node_mut(&mut self, id: &HouseId) -> Option<&mut GridCard> {
        self.cards.iter_mut().find(|c| c.id == *id)
    }

    fn append(&mut self, id: &HouseId) -> bool {
        let Some(index) = self.cards.iter().position(|c| c.id == *id) else {
            return false;
        };
        let card = self.cards.remove(index);
        self.cards.push(card);
        self.reflow();
        true
    }

    fn set_interactive(&mut self, interactive: bool) {
        if self.interactive != interactive {
            tracing::trace!(target: "flipboard.harness", interactive, "hover feedback toggled");
        }
        self.interactive = interactive;
    }

    fn show_failure(&mut self, text: &str) {
        self.cards.clear();
        self.failure = Some(text.to_owned());
    }
}
