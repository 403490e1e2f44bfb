use std::sync::Arc;

use crate::api::error::EngineResult;
use crate::api::types::{CelestialObject, LayoutMap, LayoutResult};
use crate::config::policy::{PolicyConfig, PolicyId, PolicyTable};
use crate::core::cache::{Fingerprint, LayoutCache};
use crate::core::forest::Forest;
use crate::systems::animation::animation_speed;
use crate::systems::collision::resolve_collisions;
use crate::systems::hierarchy::enforce_hierarchy;
use crate::systems::normalize::SizeRange;
use crate::systems::placement::{place_orbits, Placement};
use crate::systems::sizing::resolve_visual_radii;

/// Layout engine: a policy table plus the memo of the last computed layout.
///
/// Each instance owns its cache, so independent engines never share
/// results. Requests need `&mut self`; hosts that share one engine across
/// threads wrap it in a mutex.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    policies: PolicyTable,
    cache: LayoutCache,
}

impl LayoutEngine {
    /// Engine with the built-in policies and an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policies(policies: PolicyTable) -> Self {
        Self {
            policies,
            cache: LayoutCache::new(),
        }
    }

    /// Use `cache` instead of a fresh one.
    pub fn with_cache(mut self, cache: LayoutCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    /// Replace one policy. Clears the cache, since fingerprints only carry
    /// the policy id.
    pub fn set_policy(&mut self, id: PolicyId, config: PolicyConfig) -> EngineResult<()> {
        self.policies.insert(id, config)?;
        self.cache.clear();
        Ok(())
    }

    /// Replace the whole policy table. Clears the cache.
    pub fn set_policies(&mut self, policies: PolicyTable) {
        self.policies = policies;
        self.cache.clear();
    }

    /// Layout for `objects` under `policy`.
    ///
    /// A request whose fingerprint matches the previous one returns the same
    /// `Arc` without recomputing.
    pub fn compute_layout(
        &mut self,
        objects: &[CelestialObject],
        policy: PolicyId,
        paused: bool,
    ) -> EngineResult<Arc<LayoutMap>> {
        let key = Fingerprint::new(objects, policy, paused);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let config = self.policies.get(policy)?;
        let layout = Arc::new(layout_objects(objects, config, paused)?);
        log::debug!("Computed {} layout for {} objects", policy, layout.len());
        self.cache.put(key, Arc::clone(&layout));
        Ok(layout)
    }

    /// Force the next `compute_layout` to recompute.
    pub fn clear_layout_cache(&mut self) {
        self.cache.clear();
    }
}

/// Run the full pipeline without caching.
///
/// size → place (→ collide) → enforce hierarchy → animation speeds. If the
/// hierarchy pass changes any radius, placement runs again against the
/// corrected radii.
pub fn layout_objects(
    objects: &[CelestialObject],
    policy: &PolicyConfig,
    paused: bool,
) -> EngineResult<LayoutMap> {
    let forest = Forest::build(objects)?;
    let range = SizeRange::from_objects(objects);

    let mut radii = resolve_visual_radii(&forest, policy, &range);
    let mut placements = place(&forest, policy, &radii);
    if enforce_hierarchy(&forest, policy, &mut radii) {
        placements = place(&forest, policy, &radii);
    }

    let layout = forest
        .objects()
        .iter()
        .enumerate()
        .map(|(i, obj)| {
            let result = LayoutResult {
                visual_radius: radii[i],
                orbit_distance: placements[i].distance(),
                belt_geometry: placements[i].belt(),
                animation_speed: animation_speed(obj.orbital_period(), paused),
            };
            (obj.id.clone(), result)
        })
        .collect();
    Ok(layout)
}

fn place(forest: &Forest, policy: &PolicyConfig, radii: &[f64]) -> Vec<Placement> {
    let mut placements = place_orbits(forest, policy, radii);
    if policy.global_collision_pass {
        let moved = resolve_collisions(forest, policy, radii, &mut placements);
        if moved > 0 {
            log::debug!("Collision pass moved {} objects", moved);
        }
    }
    placements
}
