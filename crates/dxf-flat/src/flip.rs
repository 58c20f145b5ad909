use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bend::{bends_from_view, Bend};
use crate::bounds::Bounds;
use crate::tiebreak::closest_to_bounds;
use crate::view::ViewSource;
use crate::{FlipError, Result};

/// Question put to the user when a policy cannot decide on its own
pub const FLIP_PROMPT: &str = "Flip view?";

/// Yes/no confirmation from the user.
///
/// Calls block until an answer is available. There is no timeout and the
/// policies never ask twice for the same view.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> Result<bool>,
{
    fn confirm(&self, prompt: &str) -> Result<bool> {
        self(prompt)
    }
}

/// Strategy for deciding whether a flat pattern view gets mirrored.
///
/// By convention down bends should read as up bends on the exported drawing,
/// so a view is flipped when the bend that matters points down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlipPolicy {
    /// Decide from the bends alone, using the bend nearest an edge to settle
    /// views that have both directions
    #[default]
    #[serde(rename = "automatic")]
    Automatic,
    /// Ask for every view that has bends
    #[serde(rename = "ask")]
    AlwaysAsk,
    /// Keep up-only views, flip down-only views, ask when directions are mixed
    #[serde(rename = "prefer-up")]
    PreferUp,
}

impl FlipPolicy {
    pub const ALL: [FlipPolicy; 3] = [
        FlipPolicy::Automatic,
        FlipPolicy::AlwaysAsk,
        FlipPolicy::PreferUp,
    ];

    /// Human readable name, as shown in pickers and logs
    pub fn name(&self) -> &'static str {
        match self {
            FlipPolicy::Automatic => "Automatic",
            FlipPolicy::AlwaysAsk => "Ask to flip",
            FlipPolicy::PreferUp => "Prefer up bends, ask if up/down",
        }
    }

    /// Short identifier used on the command line and in config files
    pub fn slug(&self) -> &'static str {
        match self {
            FlipPolicy::Automatic => "automatic",
            FlipPolicy::AlwaysAsk => "ask",
            FlipPolicy::PreferUp => "prefer-up",
        }
    }

    /// Decide whether a view with the given bends should be flipped.
    ///
    /// `bounds` is only consulted by [`FlipPolicy::Automatic`], and `confirm`
    /// is called at most once.
    pub fn decide(&self, bends: &[Bend], bounds: &Bounds, confirm: &dyn Confirm) -> Result<bool> {
        let up = bends.iter().filter(|b| b.is_up()).count();
        let down = bends.iter().filter(|b| b.is_down()).count();

        log::debug!("{}: {up} up bend(s), {down} down bend(s)", self.name());

        match self {
            FlipPolicy::Automatic => {
                if down == 0 {
                    return Ok(false);
                }
                if up == 0 {
                    return Ok(true);
                }

                match closest_to_bounds(bounds, bends) {
                    Some(bend) => {
                        log::debug!(
                            "Tie-break bend {} {}° at ({}, {})",
                            bend.direction,
                            bend.angle,
                            bend.x,
                            bend.y
                        );
                        Ok(bend.is_down())
                    }
                    None => {
                        log::warn!(
                            "Mixed bend directions but no horizontal or vertical bend to break the tie; leaving view as is"
                        );
                        Ok(false)
                    }
                }
            }
            FlipPolicy::AlwaysAsk => {
                if bends.is_empty() {
                    return Ok(false);
                }
                confirm.confirm(FLIP_PROMPT)
            }
            FlipPolicy::PreferUp => {
                if up > 0 && down > 0 {
                    confirm.confirm(FLIP_PROMPT)
                } else {
                    Ok(down > 0)
                }
            }
        }
    }

    /// Read bends and bounds from a view and decide
    pub fn decide_view<V: ViewSource + ?Sized>(
        &self,
        view: &V,
        confirm: &dyn Confirm,
    ) -> Result<bool> {
        let bends = bends_from_view(view);
        let bounds = Bounds::of_view(view);
        self.decide(&bends, &bounds, confirm)
    }
}

impl fmt::Display for FlipPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for FlipPolicy {
    type Err = FlipError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        FlipPolicy::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(s) || p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FlipError::UnknownPolicy(s.to_string()))
    }
}
