use crate::config::policy::PolicyConfig;
use crate::core::forest::Forest;
use crate::systems::normalize::SizeRange;

/// Assign a visual radius to every object, indexed like the forest.
///
/// Pass A sizes everything that is not a satellite. Pass B then walks
/// satellites shallowest first, so each satellite's primary is final by the
/// time the satellite is sized.
pub fn resolve_visual_radii(forest: &Forest, policy: &PolicyConfig, range: &SizeRange) -> Vec<f64> {
    let mut radii: Vec<Option<f64>> = vec![None; forest.len()];

    for i in 0..forest.len() {
        if !forest.is_satellite(i) {
            radii[i] = Some(independent_size(forest, i, policy, range));
        }
    }

    let mut satellites: Vec<usize> = (0..forest.len()).filter(|&i| forest.is_satellite(i)).collect();
    satellites.sort_by_key(|&i| forest.depth(i));
    for i in satellites {
        radii[i] = Some(satellite_size(forest, i, &radii, policy, range));
    }

    radii
        .into_iter()
        .map(|r| r.unwrap_or(policy.min_visual_size))
        .collect()
}

/// Size from the fixed table or the normalized log range, without looking
/// at the primary.
fn independent_size(forest: &Forest, i: usize, policy: &PolicyConfig, range: &SizeRange) -> f64 {
    let obj = forest.object(i);
    match &policy.fixed_sizes {
        Some(table) => table
            .size_for(obj.classification)
            .clamp(policy.min_visual_size, policy.ceiling_for(obj.classification)),
        None => {
            let t = range.normalize(obj.physical.layout_radius()).powf(policy.size_contrast);
            policy.min_visual_size + t * (policy.max_visual_size - policy.min_visual_size)
        }
    }
}

fn satellite_size(
    forest: &Forest,
    i: usize,
    radii: &[Option<f64>],
    policy: &PolicyConfig,
    range: &SizeRange,
) -> f64 {
    if policy.fixed_sizes.is_some() {
        return independent_size(forest, i, policy, range);
    }

    let primary = forest.parent(i).and_then(|p| radii[p].map(|r| (p, r)));
    let Some((p, primary_visual)) = primary else {
        log::warn!(
            "{}: primary not sized, using independent size",
            forest.object(i).id
        );
        return independent_size(forest, i, policy, range);
    };

    let ratio = forest.object(i).physical.layout_radius() / forest.object(p).physical.layout_radius();
    (primary_visual * ratio)
        .max(2.0 * policy.min_visual_size)
        .min(policy.max_visual_size)
}
