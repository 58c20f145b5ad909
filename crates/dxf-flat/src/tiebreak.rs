use crate::bend::Bend;
use crate::bounds::Bounds;
use crate::orientation::BendOrientation;

/// Find the bend closest to an edge of the view.
///
/// Vertical bends are measured against the left/right edges and horizontal
/// bends against the bottom/top edges; bends with an `Unknown` orientation are
/// ignored. The horizontal candidate only wins when it is strictly closer, so
/// an exact tie goes to the vertical bend. Returns `None` when no bend can be
/// classified.
pub fn closest_to_bounds<'a>(bounds: &Bounds, bends: &'a [Bend]) -> Option<&'a Bend> {
    let (v_best, v_dist) = nearest(bends, BendOrientation::Vertical, |bend| {
        (bend.x - bounds.left())
            .abs()
            .min((bounds.right() - bend.x).abs())
    });

    let (h_best, h_dist) = nearest(bends, BendOrientation::Horizontal, |bend| {
        (bend.y - bounds.bottom())
            .abs()
            .min((bounds.top() - bend.y).abs())
    });

    log::debug!("Closest bends: horizontal at {h_dist}, vertical at {v_dist}");

    if h_dist < v_dist {
        h_best
    } else {
        v_best
    }
}

/// First bend of the given orientation with the smallest edge distance.
/// An empty subset reports an infinite distance.
fn nearest<'a>(
    bends: &'a [Bend],
    orientation: BendOrientation,
    distance: impl Fn(&Bend) -> f64,
) -> (Option<&'a Bend>, f64) {
    let mut best = None;
    let mut best_dist = f64::INFINITY;

    for bend in bends.iter().filter(|b| b.orientation() == orientation) {
        let dist = distance(bend);
        if dist < best_dist {
            best = Some(bend);
            best_dist = dist;
        }
    }

    (best, best_dist)
}
