#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are CSS-style pixels in page/viewport space (origin top-left,
//! `y` grows downward). Only `left`/`top` take part in reorder deltas; the
//! size fields exist so render targets can report full bounding boxes.

use std::ops::{Add, Neg, Sub};

/// A bounding rectangle as reported by a render target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// The translation that moves `later` back onto `self`.
    ///
    /// This is the FLIP inverse: `self - later`, component-wise on
    /// `left`/`top` only.
    #[inline]
    pub fn delta_from(&self, later: &Rect) -> Offset {
        Offset::new(self.left - later.left, self.top - later.top)
    }

    /// This rectangle moved by `offset`. Size is unchanged.
    #[inline]
    pub fn translated(&self, offset: Offset) -> Rect {
        Rect {
            left: self.left + offset.dx,
            top: self.top + offset.dy,
            ..*self
        }
    }
}

/// A 2D translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    /// No translation.
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    #[inline]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Whether both components are exactly zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }

    /// Scale both components by `factor`.
    #[inline]
    pub fn scale(&self, factor: f64) -> Offset {
        Offset::new(self.dx * factor, self.dy * factor)
    }

    /// CSS `transform` value for this translation; empty when zero.
    pub fn to_css(&self) -> String {
        if self.is_zero() {
            String::new()
        } else {
            format!("translate({}px, {}px)", self.dx, self.dy)
        }
    }
}

impl Add for Offset {
    type Output = Offset;

    fn add(self, rhs: Offset) -> Offset {
        Offset::new(self.dx + rhs.dx, self.dy + rhs.dy)
    }
}

impl Sub for Offset {
    type Output = Offset;

    fn sub(self, rhs: Offset) -> Offset {
        Offset::new(self.dx - rhs.dx, self.dy - rhs.dy)
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset::new(-self.dx, -self.dy)
    }
}
