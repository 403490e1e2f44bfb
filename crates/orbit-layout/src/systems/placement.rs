// systems/placement.rs
//
// Two-pass greedy orbit placement.
//
// A primary's spacing among its siblings depends on how far its satellite
// system reaches, and that reach depends on where the satellites sit. The
// cycle is broken by phase order:
//   1. every satellite group in the forest (children of non-star primaries),
//   2. every group orbiting a star (planets, belts, companion stars).
// Within a phase, groups run deepest primary first so nested systems are
// measured before their parent group is spaced.

use crate::api::types::{AnnularOrbit, BeltGeometry, Orbit};
use crate::config::policy::{DistanceMode, PolicyConfig};
use crate::core::forest::Forest;

/// Placement of one object relative to its primary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Roots, and anything not yet reached by a pass.
    Unplaced,
    Orbit(f64),
    Belt(BeltGeometry),
}

impl Placement {
    pub fn distance(&self) -> Option<f64> {
        match self {
            Placement::Orbit(d) => Some(*d),
            _ => None,
        }
    }

    pub fn belt(&self) -> Option<BeltGeometry> {
        match self {
            Placement::Belt(g) => Some(*g),
            _ => None,
        }
    }
}

/// How much room a point-orbit member claims beyond its own effective radius
/// before the next sibling may start.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Spacing {
    Satellite,
    Primary,
}

/// Upper bound for any scaled source distance. Keeps huge or infinite
/// orbital elements inside a finite display range.
pub const MAX_SCALED_DISTANCE: f64 = 1e12;

/// Source distance `x` in display units, clamped to `[0, MAX_SCALED_DISTANCE]`.
/// NaN maps to 0 so the placement's required distance wins.
pub fn scaled_distance(x: f64, policy: &PolicyConfig) -> f64 {
    let scaled = x * policy.orbit_scale;
    if scaled.is_nan() {
        0.0
    } else {
        scaled.clamp(0.0, MAX_SCALED_DISTANCE)
    }
}

/// Inner edge of the first free orbit around a primary of `primary_radius`.
/// Always strictly outside the primary's body.
pub fn seed_distance(primary_radius: f64, policy: &PolicyConfig) -> f64 {
    (primary_radius * policy.safety_multiplier).max(primary_radius + policy.min_distance)
}

/// Radius the object occupies together with everything orbiting it.
///
/// The satellite-system share is scaled by the policy's extent factor but
/// never drops below the object's own visual radius.
pub fn effective_radius(forest: &Forest, policy: &PolicyConfig, radii: &[f64], placements: &[Placement], i: usize) -> f64 {
    let reach = forest
        .children(i)
        .iter()
        .map(|&c| match placements[c] {
            Placement::Orbit(d) => d + effective_radius(forest, policy, radii, placements, c),
            Placement::Belt(g) => g.outer_radius,
            Placement::Unplaced => 0.0,
        })
        .fold(0.0, f64::max);
    radii[i].max(reach * policy.satellite_extent_factor)
}

/// Compute every orbit distance and belt annulus for the forest.
pub fn place_orbits(forest: &Forest, policy: &PolicyConfig, radii: &[f64]) -> Vec<Placement> {
    let mut placements = vec![Placement::Unplaced; forest.len()];
    let primaries = forest.primaries_deepest_first();

    for &p in primaries.iter().filter(|&&p| !forest.object(p).classification.is_star()) {
        place_group(forest, policy, radii, &mut placements, p, Spacing::Satellite);
    }
    for &p in primaries.iter().filter(|&&p| forest.object(p).classification.is_star()) {
        place_group(forest, policy, radii, &mut placements, p, Spacing::Primary);
    }

    placements
}

fn place_group(
    forest: &Forest,
    policy: &PolicyConfig,
    radii: &[f64],
    placements: &mut [Placement],
    primary: usize,
    spacing: Spacing,
) {
    let gap_factor = match spacing {
        Spacing::Satellite => policy.satellite_safety(),
        Spacing::Primary => 1.0,
    };

    // Inner edge the next sibling may start at.
    let mut next_inner = seed_distance(radii[primary], policy);

    for c in forest.children_by_distance(primary) {
        let obj = forest.object(c);
        match &obj.orbit {
            Some(Orbit::Point(orbit)) => {
                let extent = effective_radius(forest, policy, radii, placements, c);
                let required = next_inner + extent;
                let actual = match policy.distance_mode {
                    DistanceMode::Equidistant => required,
                    DistanceMode::Proportional => scaled_distance(orbit.semi_major_axis, policy).max(required),
                };
                log::trace!(
                    "{}: a={} -> distance {:.3} (required {:.3}, extent {:.3})",
                    obj.id, orbit.semi_major_axis, actual, required, extent
                );
                placements[c] = Placement::Orbit(actual);
                next_inner = actual + extent * gap_factor + policy.min_distance;
            }
            Some(Orbit::Annular(orbit)) => {
                let belt = place_belt(orbit, next_inner, policy);
                log::trace!(
                    "{}: annulus {:.3}..{:.3}",
                    obj.id, belt.inner_radius, belt.outer_radius
                );
                placements[c] = Placement::Belt(belt);
                next_inner = belt.outer_radius + policy.min_distance;
            }
            None => {}
        }
    }
}

/// Annulus starting no earlier than `min_inner`. Width follows the scaled
/// source width, clamped to the policy's belt band so a wide belt cannot
/// push the rest of the system outward.
pub fn place_belt(orbit: &AnnularOrbit, min_inner: f64, policy: &PolicyConfig) -> BeltGeometry {
    let raw_width = (orbit.outer_radius - orbit.inner_radius) * policy.orbit_scale;
    let width = if raw_width.is_finite() {
        raw_width.clamp(policy.min_belt_width, policy.max_belt_width)
    } else {
        policy.min_belt_width
    };
    let inner = match policy.distance_mode {
        DistanceMode::Equidistant => min_inner,
        DistanceMode::Proportional => scaled_distance(orbit.inner_radius, policy).max(min_inner),
    };
    BeltGeometry::new(inner, inner + width)
}
