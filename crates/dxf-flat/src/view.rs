use serde::{Deserialize, Serialize};

/// A note placed on a drawing view, as reported by the CAD host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    /// Text insertion point in meters
    pub position: [f64; 2],
    /// Rotation of the note in radians
    #[serde(default)]
    pub rotation: f64,
}

impl Annotation {
    pub fn new(text: impl Into<String>, position: [f64; 2], rotation: f64) -> Self {
        Self {
            text: text.into(),
            position,
            rotation,
        }
    }
}

/// Read access to a flat pattern drawing view.
///
/// Implemented by whatever talks to the CAD host. The engine only ever reads
/// through this trait and never holds on to the view between calls.
pub trait ViewSource {
    /// All notes on the view, bend notes and otherwise
    fn annotations(&self) -> Vec<Annotation>;

    /// View outline as `[min_x, min_y, max_x, max_y]` in meters
    fn outline(&self) -> [f64; 4];
}
