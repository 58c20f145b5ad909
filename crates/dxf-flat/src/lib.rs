//! Flat pattern view analysis.
//!
//! Reads the bend notes placed on a sheet metal flat pattern view and decides
//! whether the view has to be mirrored before it is exported, so that down
//! bends end up on a consistent side of the part.
//!
//! - [`parse_annotation`] / [`bends_from_view`] - bend notes to [`Bend`]s
//! - [`classify`] - bucket a note rotation into a [`BendOrientation`]
//! - [`Bounds`] - view outline in inches
//! - [`closest_to_bounds`] - the bend nearest an edge of the outline
//! - [`FlipPolicy`] - the decision strategies

mod bend;
mod bounds;
mod flip;
mod orientation;
mod tiebreak;
pub mod units;
mod view;

pub use bend::{bends_from_view, parse_annotation, parse_bend_note, Bend, BendDirection};
pub use bounds::Bounds;
pub use flip::{Confirm, FlipPolicy, FLIP_PROMPT};
pub use orientation::{classify, dominant_orientation, BendOrientation};
pub use tiebreak::closest_to_bounds;
pub use view::{Annotation, ViewSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlipError {
    #[error("Failed to get flip confirmation")]
    Confirmation(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unknown flip policy '{0}' (expected one of: automatic, ask, prefer-up)")]
    UnknownPolicy(String),
}

pub type Result<T> = std::result::Result<T, FlipError>;
