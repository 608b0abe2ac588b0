#![forbid(unsafe_code)]

//! Position snapshot: the "First" of FLIP.
//!
//! Records every mounted card's rectangle before the container is
//! reordered. Pure measurement; nothing is mutated.

use std::collections::HashMap;

use flipboard_core::{HouseId, Rect};

use crate::node::{CardNode, CardSurface};

/// Rectangles of every mounted card at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSnapshot {
    rects: HashMap<HouseId, Rect>,
}

impl PositionSnapshot {
    /// Measure every card currently in `surface`.
    pub fn capture<S: CardSurface>(surface: &S) -> Self {
        let rects = surface
            .order()
            .into_iter()
            .filter_map(|id| {
                let rect = surface.node(&id)?.rect();
                Some((id, rect))
            })
            .collect();
        Self { rects }
    }

    #[inline]
    pub fn get(&self, id: &HouseId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Forget an identity, as if it had not been mounted when captured.
    pub fn forget(&mut self, id: &HouseId) -> Option<Rect> {
        self.rects.remove(id)
    }
}
