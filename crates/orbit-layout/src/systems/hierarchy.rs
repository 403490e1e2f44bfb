use crate::config::policy::PolicyConfig;
use crate::core::forest::Forest;

/// Minimum size margin a primary keeps over its largest non-exempt child.
pub const HIERARCHY_MARGIN: f64 = 1.2;

/// Children scaled down under a capped primary keep at most this share of
/// their previous size.
pub const MAX_CHILD_SCALE: f64 = 0.8;

/// Make every primary strictly larger than its non-belt children.
///
/// Primaries are visited deepest first, so growing a planet is seen by its
/// star afterwards. When the corrected size would pass the class ceiling, the
/// primary is capped and its non-exempt subtrees are shrunk instead.
/// Returns whether any radius changed.
pub fn enforce_hierarchy(forest: &Forest, policy: &PolicyConfig, radii: &mut [f64]) -> bool {
    let mut changed = false;

    for p in forest.primaries_deepest_first() {
        let largest_child = largest_child(forest, radii, p);
        if radii[p] > largest_child {
            continue;
        }

        let obj = forest.object(p);
        let wanted = largest_child * HIERARCHY_MARGIN;
        let ceiling = policy.ceiling_for(obj.classification);
        if wanted <= ceiling {
            log::debug!("{}: grown {:.3} -> {:.3} to outsize children", obj.id, radii[p], wanted);
            radii[p] = wanted;
        } else {
            let factor = (ceiling / wanted).min(MAX_CHILD_SCALE);
            log::debug!(
                "{}: capped at {:.3}, shrinking children by {:.3}",
                obj.id, ceiling, factor
            );
            radii[p] = ceiling;
            for &c in forest.children(p) {
                if !forest.is_hierarchy_exempt(c) {
                    shrink_subtree(forest, policy, radii, c, factor);
                    regrow_subtree(forest, policy, radii, c);
                }
            }
            fit_under(forest, radii, p);
        }
        changed = true;
    }

    changed
}

/// Largest radius among the non-exempt children of `i`, or -inf for none.
fn largest_child(forest: &Forest, radii: &[f64], i: usize) -> f64 {
    forest
        .children(i)
        .iter()
        .filter(|&&c| !forest.is_hierarchy_exempt(c))
        .map(|&c| radii[c])
        .fold(f64::NEG_INFINITY, f64::max)
}

fn shrink_subtree(forest: &Forest, policy: &PolicyConfig, radii: &mut [f64], i: usize, factor: f64) {
    radii[i] = (radii[i] * factor).max(policy.min_visual_size);
    for &c in forest.children(i) {
        if !forest.is_hierarchy_exempt(c) {
            shrink_subtree(forest, policy, radii, c, factor);
        }
    }
}

/// Shrinking floors every level at `min_visual_size` independently, so a
/// primary and its child can land on the same size. Grow such primaries back
/// above their children, bottom up, within their class ceiling.
fn regrow_subtree(forest: &Forest, policy: &PolicyConfig, radii: &mut [f64], i: usize) {
    for &c in forest.children(i) {
        if !forest.is_hierarchy_exempt(c) {
            regrow_subtree(forest, policy, radii, c);
        }
    }
    let largest = largest_child(forest, radii, i);
    if radii[i] <= largest {
        let obj = forest.object(i);
        let grown = (largest * HIERARCHY_MARGIN).min(policy.ceiling_for(obj.classification));
        log::debug!("{}: regrown {:.3} -> {:.3} after shrink", obj.id, radii[i], grown);
        radii[i] = grown;
    }
}

/// Last resort when the size band is too narrow for the tree's depth: cut
/// any child that still reaches its primary's size down below it, top down.
/// This may go under `min_visual_size` but stays positive.
fn fit_under(forest: &Forest, radii: &mut [f64], i: usize) {
    for &c in forest.children(i) {
        if forest.is_hierarchy_exempt(c) {
            continue;
        }
        if radii[c] >= radii[i] {
            log::warn!(
                "{}: size band too narrow, cut {:.3} -> {:.3}",
                forest.object(c).id, radii[c], radii[i] / HIERARCHY_MARGIN
            );
            radii[c] = radii[i] / HIERARCHY_MARGIN;
        }
        fit_under(forest, radii, c);
    }
}
