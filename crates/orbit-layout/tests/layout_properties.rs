//! Whole-pipeline checks: geometric invariants across every built-in policy
//! and the reference scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use approx::assert_relative_eq;
use orbit_layout::{
    layout_objects, CelestialObject, Classification, LayoutEngine, LayoutMap, ObjectId, Orbit,
    PolicyConfig, PolicyId,
};

const EPS: f64 = 1e-9;

fn solar_system() -> Vec<CelestialObject> {
    use Classification::*;
    vec![
        CelestialObject::new("sun", Star, 695_700.0).with_name("Sun"),
        CelestialObject::new("mercury", Planet, 2439.7).orbiting("sun", 0.387).with_period(87.97).with_eccentricity(0.2056),
        CelestialObject::new("venus", Planet, 6051.8).orbiting("sun", 0.723).with_period(224.70).with_eccentricity(0.0068),
        CelestialObject::new("earth", Planet, 6371.0).orbiting("sun", 1.0).with_period(365.26).with_eccentricity(0.0167),
        CelestialObject::new("moon", Moon, 1737.4).orbiting("earth", 0.00257).with_period(27.32).with_eccentricity(0.0549),
        CelestialObject::new("mars", Planet, 3389.5).orbiting("sun", 1.524).with_period(686.98).with_eccentricity(0.0934),
        CelestialObject::new("phobos", Moon, 11.3).orbiting("mars", 0.0000627).with_period(0.32),
        CelestialObject::new("deimos", Moon, 6.2).orbiting("mars", 0.000157).with_period(1.26),
        CelestialObject::new("main-belt", Belt, 470.0).annulus("sun", 2.2, 3.2),
        CelestialObject::new("jupiter", GasGiant, 69_911.0).orbiting("sun", 5.203).with_period(4332.59).with_eccentricity(0.0485),
        CelestialObject::new("io", Moon, 1821.6).orbiting("jupiter", 0.00282).with_period(1.77),
        CelestialObject::new("europa", Moon, 1560.8).orbiting("jupiter", 0.00449).with_period(3.55),
        CelestialObject::new("ganymede", Moon, 2634.1).orbiting("jupiter", 0.00716).with_period(7.15),
        CelestialObject::new("callisto", Moon, 2410.3).orbiting("jupiter", 0.01259).with_period(16.69),
        CelestialObject::new("saturn", GasGiant, 58_232.0).orbiting("sun", 9.537).with_period(10_759.22).with_eccentricity(0.0555),
        CelestialObject::new("saturn-rings", Belt, 1.0).annulus("saturn", 0.00045, 0.00091),
        CelestialObject::new("titan", Moon, 2574.7).orbiting("saturn", 0.00817).with_period(15.95).with_eccentricity(0.0288),
        CelestialObject::new("uranus", GasGiant, 25_362.0).orbiting("sun", 19.19).with_period(30_688.5),
        CelestialObject::new("neptune", GasGiant, 24_622.0).orbiting("sun", 30.07).with_period(60_182.0),
        CelestialObject::new("triton", Moon, 1353.4).orbiting("neptune", 0.00237).with_period(-5.877),
        CelestialObject::new("kuiper-belt", Belt, 500.0).annulus("sun", 30.5, 50.0),
        CelestialObject::new("pluto", Other, 1188.3).orbiting("sun", 39.48).with_period(90_560.0).with_eccentricity(0.2488),
        CelestialObject::new("charon", Moon, 606.0).orbiting("pluto", 0.000131).with_period(6.387),
    ]
}

fn id(s: &str) -> ObjectId {
    ObjectId::from(s)
}

/// Outer reach of an object's whole system, measured from its own centre.
fn extent(objects: &[CelestialObject], layout: &LayoutMap, obj: &ObjectId) -> f64 {
    let reach = objects
        .iter()
        .filter(|o| o.parent_id() == Some(obj))
        .map(|o| {
            let r = &layout[&o.id];
            match (r.orbit_distance, r.belt_geometry) {
                (Some(d), _) => d + extent(objects, layout, &o.id),
                (_, Some(belt)) => belt.outer_radius,
                _ => 0.0,
            }
        })
        .fold(0.0, f64::max);
    layout[obj].visual_radius.max(reach)
}

/// (inner edge, centre, outer edge) of a placed child.
fn span(objects: &[CelestialObject], layout: &LayoutMap, obj: &ObjectId) -> (f64, f64, f64) {
    let r = &layout[obj];
    match (r.orbit_distance, r.belt_geometry) {
        (Some(d), _) => {
            let e = extent(objects, layout, obj);
            (d - e, d, d + e)
        }
        (_, Some(b)) => (b.inner_radius, b.center_radius, b.outer_radius),
        _ => panic!("{obj} has no placement"),
    }
}

fn siblings_by_source(objects: &[CelestialObject]) -> HashMap<ObjectId, Vec<&CelestialObject>> {
    let mut groups: HashMap<ObjectId, Vec<&CelestialObject>> = HashMap::new();
    for o in objects {
        if let Some(p) = o.parent_id() {
            groups.entry(p.clone()).or_default().push(o);
        }
    }
    for kids in groups.values_mut() {
        kids.sort_by(|a, b| {
            let key = |o: &CelestialObject| o.orbit.as_ref().map_or(0.0, Orbit::ordering_key);
            key(a).total_cmp(&key(b))
        });
    }
    groups
}

fn assert_invariants(objects: &[CelestialObject], layout: &LayoutMap, policy: &PolicyConfig, label: &str) {
    assert_eq!(layout.len(), objects.len(), "{label}: missing results");

    for o in objects {
        let r = &layout[&o.id];
        assert!(r.visual_radius > 0.0, "{label}: {} has radius {}", o.id, r.visual_radius);

        if let Some(belt) = r.belt_geometry {
            assert!(belt.inner_radius < belt.outer_radius, "{label}: {} inverted belt", o.id);
            assert_relative_eq!(belt.center_radius, (belt.inner_radius + belt.outer_radius) / 2.0);
            assert!(belt.outer_radius - belt.inner_radius <= policy.max_belt_width + EPS);
        }

        let Some(parent) = o.parent_id() else {
            assert!(r.orbit_distance.is_none() && r.belt_geometry.is_none());
            continue;
        };
        let primary = &layout[parent];
        let (inner, _, _) = span(objects, layout, &o.id);
        assert!(
            inner > primary.visual_radius,
            "{label}: {} inner edge {inner} inside primary {parent} ({})",
            o.id,
            primary.visual_radius
        );
        if let Some(d) = r.orbit_distance {
            assert!(d - r.visual_radius > primary.visual_radius, "{label}: {} overlaps {parent}", o.id);
        }
        if !o.classification.is_belt() {
            assert!(
                primary.visual_radius > r.visual_radius,
                "{label}: {parent} ({}) not larger than {} ({})",
                primary.visual_radius,
                o.id,
                r.visual_radius
            );
        }
    }

    for (parent, kids) in siblings_by_source(objects) {
        for pair in kids.windows(2) {
            let (_, a_center, a_outer) = span(objects, layout, &pair[0].id);
            let (b_inner, b_center, _) = span(objects, layout, &pair[1].id);
            assert!(
                b_inner >= a_outer + policy.min_distance - EPS,
                "{label}: {} (inner {b_inner}) crowds {} (outer {a_outer}) around {parent}",
                pair[1].id,
                pair[0].id
            );
            assert!(b_center > a_center, "{label}: order of {} and {} flipped", pair[0].id, pair[1].id);
        }
    }
}

#[test]
fn invariants_hold_for_every_policy() {
    let objects = solar_system();
    for id in PolicyId::ALL {
        let policy = PolicyConfig::builtin(id);
        let layout = layout_objects(&objects, &policy, false).unwrap();
        assert_invariants(&objects, &layout, &policy, id.name());
    }
}

#[test]
fn invariants_hold_with_collision_pass() {
    let objects = solar_system();
    for id in PolicyId::ALL {
        let policy = PolicyConfig::builtin(id).with_collision_pass(true);
        let layout = layout_objects(&objects, &policy, false).unwrap();
        assert_invariants(&objects, &layout, &policy, id.name());
    }
}

#[test]
fn collision_pass_clears_eccentric_extents() {
    let objects = solar_system();
    for id in PolicyId::ALL {
        let policy = PolicyConfig::builtin(id).with_collision_pass(true);
        let layout = layout_objects(&objects, &policy, false).unwrap();

        for kids in siblings_by_source(&objects).values() {
            for pair in kids.windows(2) {
                let (Some(a), Some(b)) = (layout[&pair[0].id].orbit_distance, layout[&pair[1].id].orbit_distance) else {
                    continue;
                };
                let ea = pair[0].orbit.as_ref().map_or(0.0, Orbit::eccentricity);
                let eb = pair[1].orbit.as_ref().map_or(0.0, Orbit::eccentricity);
                let apo_outer = a * (1.0 + ea) + extent(&objects, &layout, &pair[0].id);
                let peri_inner = b * (1.0 - eb) - extent(&objects, &layout, &pair[1].id);
                assert!(
                    peri_inner >= apo_outer + policy.min_distance - EPS,
                    "{}: {} periapsis crosses {} apoapsis",
                    id.name(),
                    pair[1].id,
                    pair[0].id
                );
            }
        }
    }
}

#[test]
fn collision_pass_changes_eccentric_layout_only() {
    let policy = PolicyConfig::equidistant();
    let toggled = PolicyConfig::equidistant().with_collision_pass(true);

    let eccentric = solar_system();
    let off = layout_objects(&eccentric, &policy, false).unwrap();
    let on = layout_objects(&eccentric, &toggled, false).unwrap();
    assert_ne!(off, on);

    let circular: Vec<CelestialObject> = solar_system()
        .into_iter()
        .map(|o| o.with_eccentricity(0.0))
        .collect();
    let off = layout_objects(&circular, &policy, false).unwrap();
    let on = layout_objects(&circular, &toggled, false).unwrap();
    assert_eq!(off, on);
}

#[test]
fn cached_result_is_reference_equal() {
    let objects = solar_system();
    let mut engine = LayoutEngine::new();
    let first = engine.compute_layout(&objects, PolicyId::TrueScale, false).unwrap();
    let again = engine.compute_layout(&objects, PolicyId::TrueScale, false).unwrap();
    assert!(Arc::ptr_eq(&first, &again));

    engine.clear_layout_cache();
    let fresh = engine.compute_layout(&objects, PolicyId::TrueScale, false).unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(*first, *fresh);
}

#[test]
fn animation_speeds_follow_periods() {
    let objects = solar_system();
    let layout = layout_objects(&objects, &PolicyConfig::compressed(), false).unwrap();
    let earth = layout[&id("earth")].animation_speed.unwrap();
    let mercury = layout[&id("mercury")].animation_speed.unwrap();
    assert_relative_eq!(earth, 365.25 / 365.26);
    assert!(mercury > earth);
    assert!(layout[&id("triton")].animation_speed.unwrap() < 0.0);
    assert_eq!(layout[&id("main-belt")].animation_speed, None);
    assert_eq!(layout[&id("sun")].animation_speed, None);
}

// ── Reference scenarios ─────────────────────────────────────────────

#[test]
fn true_scale_mercury_clears_star() {
    let objects = vec![
        CelestialObject::new("star", Classification::Star, 695_700.0),
        CelestialObject::new("mercury", Classification::Planet, 2439.0).orbiting("star", 0.39),
    ];
    let layout = layout_objects(&objects, &PolicyConfig::true_scale(), false).unwrap();
    let star = layout[&id("star")].visual_radius;
    let mercury = &layout[&id("mercury")];
    let d = mercury.orbit_distance.unwrap();
    assert!(d > star);
    let clearance = (d - mercury.visual_radius - star) / star;
    assert!(clearance >= 0.05, "clearance ratio {clearance}");
}

#[test]
fn equidistant_gaps_are_equal() {
    let objects = vec![
        CelestialObject::new("star", Classification::Star, 695_700.0),
        CelestialObject::new("p1", Classification::Planet, 6000.0).orbiting("star", 1.0),
        CelestialObject::new("p2", Classification::Planet, 6000.0).orbiting("star", 2.0),
        CelestialObject::new("p3", Classification::Planet, 6000.0).orbiting("star", 3.0),
    ];
    let layout = layout_objects(&objects, &PolicyConfig::equidistant(), false).unwrap();
    let d: Vec<f64> = ["p1", "p2", "p3"]
        .iter()
        .map(|p| layout[&id(p)].orbit_distance.unwrap())
        .collect();
    let (g1, g2) = (d[1] - d[0], d[2] - d[1]);
    assert!(g1 > 0.0);
    assert!((g1 - g2).abs() / g1 <= 0.05, "gaps {g1} vs {g2}");
}

#[test]
fn literal_moon_distance_is_pushed_outside_planet() {
    let objects = vec![
        CelestialObject::new("sun", Classification::Star, 695_700.0),
        CelestialObject::new("earth", Classification::Planet, 6371.0).orbiting("sun", 1.0),
        CelestialObject::new("moon", Classification::Moon, 1737.0).orbiting("earth", 0.002),
    ];
    for pid in PolicyId::ALL {
        let layout = layout_objects(&objects, &PolicyConfig::builtin(pid), false).unwrap();
        let earth = layout[&id("earth")].visual_radius;
        let moon = &layout[&id("moon")];
        let inner = moon.orbit_distance.unwrap() - moon.visual_radius;
        assert!(inner > earth, "{}: moon inner edge {inner} vs earth {earth}", pid.name());
    }
}

#[test]
fn larger_moon_still_smaller_than_planet() {
    let objects = vec![
        CelestialObject::new("sun", Classification::Star, 695_700.0),
        CelestialObject::new("planet", Classification::Planet, 1000.0).orbiting("sun", 1.0),
        CelestialObject::new("moon", Classification::Moon, 2000.0).orbiting("planet", 0.001),
    ];
    for pid in PolicyId::ALL {
        let policy = PolicyConfig::builtin(pid);
        let layout = layout_objects(&objects, &policy, false).unwrap();
        let planet = layout[&id("planet")].visual_radius;
        let moon = layout[&id("moon")].visual_radius;
        assert!(planet > moon, "{}: planet {planet} vs moon {moon}", pid.name());
        assert_invariants(&objects, &layout, &policy, pid.name());
    }
}

#[test]
fn belts_bracket_planet_in_order() {
    let objects = vec![
        CelestialObject::new("sun", Classification::Star, 695_700.0),
        CelestialObject::new("inner-belt", Classification::Belt, 300.0).annulus("sun", 1.5, 2.0),
        CelestialObject::new("planet", Classification::Planet, 6000.0).orbiting("sun", 2.5),
        CelestialObject::new("outer-belt", Classification::Belt, 300.0).annulus("sun", 3.0, 4.0),
    ];
    for pid in PolicyId::ALL {
        let policy = PolicyConfig::builtin(pid);
        let layout = layout_objects(&objects, &policy, false).unwrap();
        let sun = layout[&id("sun")].visual_radius;
        let inner = layout[&id("inner-belt")].belt_geometry.unwrap();
        let planet = &layout[&id("planet")];
        let outer = layout[&id("outer-belt")].belt_geometry.unwrap();
        let d = planet.orbit_distance.unwrap();

        assert!(inner.inner_radius > sun);
        assert!(d - planet.visual_radius > inner.outer_radius);
        assert!(outer.inner_radius > d + planet.visual_radius, "{}", pid.name());
        assert_invariants(&objects, &layout, &policy, pid.name());
    }
}
