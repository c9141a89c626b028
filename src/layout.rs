use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::IMAGE_SIZE_PCT;

/// One of the four regions of the valid placement area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            Quadrant::TopLeft => 0,
            Quadrant::TopRight => 1,
            Quadrant::BottomLeft => 2,
            Quadrant::BottomRight => 3,
        }
    }

    fn is_right(self) -> bool {
        matches!(self, Quadrant::TopRight | Quadrant::BottomRight)
    }

    fn is_bottom(self) -> bool {
        matches!(self, Quadrant::BottomLeft | Quadrant::BottomRight)
    }

    pub fn name(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }
}

/// Top-left corner of the slide container, in percent of the hero area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub left_pct: f64,
    pub top_pct: f64,
}

impl Position {
    pub fn new(left_pct: f64, top_pct: f64) -> Self {
        Self { left_pct, top_pct }
    }

    /// CSS `left` value, e.g. `"12.5%"`.
    pub fn css_left(&self) -> String {
        format!("{}%", self.left_pct)
    }

    pub fn css_top(&self) -> String {
        format!("{}%", self.top_pct)
    }
}

/// Picks randomized, non-repeating slide positions.
///
/// The valid span on each axis is `[0, 100 - image_size_pct]` so the image's
/// bounding box stays inside the hero. The span is split at its midpoint on
/// both axes, giving four quadrants. Consecutive calls never reuse the
/// previous quadrant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    image_size_pct: f64,
}

impl Layout {
    pub fn new(image_size_pct: f64) -> Self {
        Self { image_size_pct }
    }

    /// Upper bound for both `left` and `top`.
    pub fn position_max(&self) -> f64 {
        100.0 - self.image_size_pct
    }

    pub fn half(&self) -> f64 {
        self.position_max() / 2.0
    }

    pub fn next_position<R: Rng>(
        &self,
        rng: &mut R,
        last: Option<Quadrant>,
    ) -> (Position, Quadrant) {
        let quadrant = pick_other_quadrant(rng, last);
        (self.position_in_quadrant(rng, quadrant), quadrant)
    }

    pub fn position_in_quadrant<R: Rng>(&self, rng: &mut R, quadrant: Quadrant) -> Position {
        let half = self.half();
        let max = self.position_max();

        // Inclusive ranges keep a zero-width span (image_size_pct == 100) valid
        let (left_lo, left_hi) = if quadrant.is_right() { (half, max) } else { (0.0, half) };
        let (top_lo, top_hi) = if quadrant.is_bottom() { (half, max) } else { (0.0, half) };

        Position::new(
            rng.random_range(left_lo..=left_hi),
            rng.random_range(top_lo..=top_hi),
        )
    }

    /// Quadrant a position falls in. The midpoint belongs to the right/bottom side.
    pub fn quadrant_of(&self, position: Position) -> Quadrant {
        let half = self.half();
        match (position.left_pct >= half, position.top_pct >= half) {
            (false, false) => Quadrant::TopLeft,
            (true, false) => Quadrant::TopRight,
            (false, true) => Quadrant::BottomLeft,
            (true, true) => Quadrant::BottomRight,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(IMAGE_SIZE_PCT)
    }
}

/// Uniform pick among the quadrants other than `last` (all four when `None`).
pub fn pick_other_quadrant<R: Rng>(rng: &mut R, last: Option<Quadrant>) -> Quadrant {
    let candidates: Vec<Quadrant> = Quadrant::ALL
        .into_iter()
        .filter(|q| Some(*q) != last)
        .collect();
    candidates[rng.random_range(0..candidates.len())]
}
