// systems/collision.rs
//
// Optional sweep over computed placements. Placement spaces orbits as
// circles; this pass checks the eccentric extent each orbit actually sweeps
// (periapsis d(1-e) to apoapsis d(1+e)) and pushes a body outward until its
// periapsis edge clears the previous sibling's apoapsis edge.
// Circular layouts produced by `place_orbits` pass through unchanged.

use crate::config::policy::PolicyConfig;
use crate::core::forest::Forest;
use crate::systems::placement::{effective_radius, Placement};

/// Eccentricities at or above this are treated as this value.
const MAX_ECCENTRICITY: f64 = 0.95;

/// Overlaps smaller than this are float noise from placement arithmetic.
const TOLERANCE: f64 = 1e-9;

/// Push overlapping siblings apart. Returns how many objects moved.
pub fn resolve_collisions(
    forest: &Forest,
    policy: &PolicyConfig,
    radii: &[f64],
    placements: &mut [Placement],
) -> usize {
    let mut pushed = 0;

    // Deepest first: pushing a moon out grows its planet's extent, which the
    // planet's own group must see.
    for p in forest.primaries_deepest_first() {
        let mut required_inner = radii[p] + policy.min_distance;

        for c in forest.children_by_distance(p) {
            match placements[c] {
                Placement::Orbit(d) => {
                    let e = clamp_eccentricity(forest.object(c).orbit.as_ref().map_or(0.0, |o| o.eccentricity()));
                    let extent = effective_radius(forest, policy, radii, placements, c);

                    let mut distance = d;
                    if distance * (1.0 - e) - extent < required_inner - TOLERANCE {
                        distance = (required_inner + extent) / (1.0 - e);
                        log::debug!(
                            "{}: periapsis overlap, pushed {:.3} -> {:.3}",
                            forest.object(c).id, d, distance
                        );
                        placements[c] = Placement::Orbit(distance);
                        pushed += 1;
                    }
                    required_inner = distance * (1.0 + e) + extent + policy.min_distance;
                }
                Placement::Belt(mut belt) => {
                    if belt.inner_radius < required_inner - TOLERANCE {
                        belt = belt.shifted(required_inner - belt.inner_radius);
                        log::debug!(
                            "{}: annulus overlap, moved inner edge to {:.3}",
                            forest.object(c).id, belt.inner_radius
                        );
                        placements[c] = Placement::Belt(belt);
                        pushed += 1;
                    }
                    required_inner = belt.outer_radius + policy.min_distance;
                }
                Placement::Unplaced => {}
            }
        }
    }

    pushed
}

/// NaN passes through `f64::clamp`, and a NaN eccentricity would silently
/// disable every later push in the group.
fn clamp_eccentricity(e: f64) -> f64 {
    if e.is_nan() {
        0.0
    } else {
        e.clamp(0.0, MAX_ECCENTRICITY)
    }
}
