use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bend::Bend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BendOrientation {
    Horizontal,
    Vertical,
    Unknown,
}

impl fmt::Display for BendOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BendOrientation::Horizontal => write!(f, "horizontal"),
            BendOrientation::Vertical => write!(f, "vertical"),
            BendOrientation::Unknown => write!(f, "unknown"),
        }
    }
}

/// Bucket a note rotation (degrees) into an orientation.
///
/// Each bucket is a 20° window around an axis. Anything outside those windows,
/// like a note at 45°, is `Unknown` and takes no part in the tie-break.
pub fn classify(angle_degrees: f64) -> BendOrientation {
    let a = angle_degrees;

    if a < 10.0 || a > 350.0 || (a > 170.0 && a < 190.0) {
        BendOrientation::Horizontal
    } else if (a > 80.0 && a < 100.0) || (a > 260.0 && a < 280.0) {
        BendOrientation::Vertical
    } else {
        BendOrientation::Unknown
    }
}

/// Majority orientation of the bends on a view.
///
/// Vertical wins only with strictly more bends; a view without any
/// classifiable bend is `Unknown`.
pub fn dominant_orientation(bends: &[Bend]) -> BendOrientation {
    let (horizontal, vertical) =
        bends
            .iter()
            .fold((0usize, 0usize), |(h, v), bend| match bend.orientation() {
                BendOrientation::Horizontal => (h + 1, v),
                BendOrientation::Vertical => (h, v + 1),
                BendOrientation::Unknown => (h, v),
            });

    if horizontal == 0 && vertical == 0 {
        BendOrientation::Unknown
    } else if vertical > horizontal {
        BendOrientation::Vertical
    } else {
        BendOrientation::Horizontal
    }
}
