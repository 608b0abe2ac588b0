#![forbid(unsafe_code)]

//! Easing curves and transition descriptions.
//!
//! [`CubicBezier`] evaluates CSS `cubic-bezier(x1, y1, x2, y2)` timing
//! functions so headless render targets can compute in-flight positions the
//! same way a browser would. [`TransitionSpec`] is the inline transition
//! state a card can be put into by the reorder engine.
//!
//! # Invariants
//!
//! - `CubicBezier::sample(0.0) == 0.0` and `sample(1.0) == 1.0`.
//! - Input progress is clamped to [0.0, 1.0].
//! - x control points are clamped to [0.0, 1.0] so the curve is a function
//!   of time.

use std::fmt;
use std::time::Duration;

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_EPSILON: f64 = 1e-7;
const BISECTION_ITERATIONS: usize = 32;

/// A CSS cubic-bezier timing function with endpoints (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl CubicBezier {
    /// Fast start, long gentle settle. The reorder default.
    pub const EASE_OUT_QUART: CubicBezier = CubicBezier {
        x1: 0.25,
        y1: 1.0,
        x2: 0.5,
        y2: 1.0,
    };

    /// CSS `linear`.
    pub const LINEAR: CubicBezier = CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };

    /// Create a curve; x control points are clamped to [0, 1].
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Control points as `[x1, y1, x2, y2]`.
    #[inline]
    pub const fn points(&self) -> [f64; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Eased progress for linear time progress `t`.
    pub fn sample(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        let s = self.solve_x(t);
        bezier(s, self.y1, self.y2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_x(&self, x: f64) -> f64 {
        let mut s = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = bezier(s, self.x1, self.x2) - x;
            if err.abs() < NEWTON_EPSILON {
                return s;
            }
            let slope = bezier_slope(s, self.x1, self.x2);
            if slope.abs() < NEWTON_EPSILON {
                break;
            }
            s -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        s = x;
        for _ in 0..BISECTION_ITERATIONS {
            let v = bezier(s, self.x1, self.x2);
            if (v - x).abs() < NEWTON_EPSILON {
                break;
            }
            if v < x {
                lo = s;
            } else {
                hi = s;
            }
            s = (lo + hi) / 2.0;
        }
        s
    }
}

impl Default for CubicBezier {
    fn default() -> Self {
        Self::EASE_OUT_QUART
    }
}

impl fmt::Display for CubicBezier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cubic-bezier({}, {}, {}, {})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

/// One coordinate of a cubic bezier with endpoints 0 and 1.
#[inline]
fn bezier(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

#[inline]
fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// An animated transform transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub easing: CubicBezier,
}

impl Transition {
    pub const fn new(duration: Duration, easing: CubicBezier) -> Self {
        Self { duration, easing }
    }

    /// Eased progress after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.easing.sample(t)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(Duration::from_millis(800), CubicBezier::EASE_OUT_QUART)
    }
}

/// Inline transition state of a card.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TransitionSpec {
    /// No inline override; the stylesheet decides.
    #[default]
    Inherit,
    /// `transform 0s`: changes apply on the next paint with no animation.
    Instant,
    /// Transform changes animate.
    Animated(Transition),
}

impl TransitionSpec {
    /// CSS `transition` value; empty for [`TransitionSpec::Inherit`].
    pub fn to_css(&self) -> String {
        match self {
            Self::Inherit => String::new(),
            Self::Instant => "transform 0s".to_owned(),
            Self::Animated(t) => format!("transform {}s {}", t.duration.as_secs_f64(), t.easing),
        }
    }
}
