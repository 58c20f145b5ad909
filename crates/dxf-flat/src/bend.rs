use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::orientation::{classify, BendOrientation};
use crate::units::{meters_to_inches, radians_to_degrees};
use crate::view::{Annotation, ViewSource};

/// Matches bend notes such as `UP 90°` or `down 45.5°`
static BEND_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(UP|DOWN)\s*([0-9]+(?:\.[0-9]*)?)°").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BendDirection {
    Up,
    Down,
}

impl fmt::Display for BendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BendDirection::Up => write!(f, "UP"),
            BendDirection::Down => write!(f, "DOWN"),
        }
    }
}

/// One bend note read from a flat pattern view.
///
/// `angle` and `line_angle` are unrelated quantities: `angle` is how far the
/// sheet is bent (the number in the note text) while `line_angle` is the
/// rotation of the note itself, which follows the bend line and is only used
/// to tell horizontal bends from vertical ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bend {
    pub direction: BendDirection,
    /// Bend magnitude in degrees, always >= 0
    pub angle: f64,
    /// Rotation of the bend note in degrees, within `[0, 360)`
    pub line_angle: f64,
    /// Note position in inches
    pub x: f64,
    pub y: f64,
}

impl Bend {
    pub fn orientation(&self) -> BendOrientation {
        classify(self.line_angle)
    }

    pub fn is_up(&self) -> bool {
        self.direction == BendDirection::Up
    }

    pub fn is_down(&self) -> bool {
        self.direction == BendDirection::Down
    }
}

/// Parse the direction and magnitude out of a bend note's text.
///
/// Returns `None` for anything that is not a bend note; views carry plenty of
/// other notes and those are simply ignored.
pub fn parse_bend_note(text: &str) -> Option<(BendDirection, f64)> {
    let caps = BEND_NOTE.captures(text)?;

    let direction = if caps[1].eq_ignore_ascii_case("up") {
        BendDirection::Up
    } else {
        BendDirection::Down
    };

    let angle = match caps[2].parse::<f64>() {
        Ok(angle) => angle,
        Err(e) => {
            log::debug!("Ignoring bend note {text:?}: bad angle {:?} ({e})", &caps[2]);
            return None;
        }
    };

    Some((direction, angle))
}

/// Turn a single view annotation into a [`Bend`], if it is a bend note
pub fn parse_annotation(annotation: &Annotation) -> Option<Bend> {
    let Some((direction, angle)) = parse_bend_note(&annotation.text) else {
        log::trace!("Skipping non-bend note {:?}", annotation.text);
        return None;
    };

    Some(Bend {
        direction,
        angle,
        line_angle: normalize_degrees(radians_to_degrees(annotation.rotation)),
        x: meters_to_inches(annotation.position[0]),
        y: meters_to_inches(annotation.position[1]),
    })
}

/// Collect every bend note on a view. An empty list is a normal result for
/// parts without bends.
pub fn bends_from_view<V: ViewSource + ?Sized>(view: &V) -> Vec<Bend> {
    let bends: Vec<Bend> = view
        .annotations()
        .iter()
        .filter_map(parse_annotation)
        .collect();

    log::debug!("Found {} bend note(s) on view", bends.len());
    bends
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 {
        0.0
    } else {
        // Adding zero turns -0.0 into 0.0
        normalized + 0.0
    }
}
