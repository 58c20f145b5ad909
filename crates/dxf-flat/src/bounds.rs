use serde::{Deserialize, Serialize};

use crate::units::meters_to_inches;
use crate::view::ViewSource;

/// Axis-aligned box around a drawing view, in inches
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build bounds from a view outline `[min_x, min_y, max_x, max_y]` in meters.
    ///
    /// Width and height are `|min| + |max|`, which is only the real span when the
    /// view origin lies inside the outline. Flat pattern views are placed that
    /// way by the host, so the simple form is kept.
    pub fn from_outline(outline: [f64; 4]) -> Self {
        let [min_x, min_y, max_x, max_y] = outline.map(meters_to_inches);

        Self {
            x: min_x,
            y: min_y,
            width: min_x.abs() + max_x.abs(),
            height: min_y.abs() + max_y.abs(),
        }
    }

    pub fn of_view<V: ViewSource + ?Sized>(view: &V) -> Self {
        Self::from_outline(view.outline())
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}
