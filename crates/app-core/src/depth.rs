//! Back-to-front ordering with anti-flicker hysteresis.

use crate::camera::Camera;
use crate::projection::{Projector, Viewport};
use crate::scene::AssetOrb;

/// Order orbs for drawing, farthest first.
///
/// Each orb carries a committed depth (`last_depth`) that is refreshed only
/// when the freshly projected depth moves at least `threshold` away from it;
/// the sort always follows the committed values. Two orbs whose depths differ
/// by sub-threshold noise therefore keep their prior relative order instead
/// of swapping every frame, and the comparator remains a consistent total
/// order. The index tiebreak keeps equal depths deterministic.
pub fn sort_back_to_front(
    orbs: &mut [AssetOrb],
    projector: &Projector,
    camera: &Camera,
    viewport: &Viewport,
    threshold: f32,
) -> Vec<usize> {
    for orb in orbs.iter_mut() {
        let depth = projector.project(orb.displayed, camera, viewport).depth;
        if !orb.last_depth.is_finite() || (depth - orb.last_depth).abs() >= threshold {
            orb.last_depth = depth;
        }
    }
    let mut order: Vec<usize> = (0..orbs.len()).collect();
    order.sort_by(|&a, &b| {
        orbs[b]
            .last_depth
            .partial_cmp(&orbs[a].last_depth)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    order
}
