use std::sync::Arc;

use crate::api::types::{CelestialObject, LayoutMap, ObjectId};
use crate::config::policy::PolicyId;

/// Structural key for a layout request.
///
/// Only ids, physical radii and parent links take part. Changes to orbital
/// elements keep the same fingerprint, which is why the cache has an
/// explicit `clear`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    policy: PolicyId,
    paused: bool,
    /// `(id, radius bits, parent)` in input order.
    entries: Vec<(ObjectId, Option<u64>, Option<ObjectId>)>,
}

impl Fingerprint {
    pub fn new(objects: &[CelestialObject], policy: PolicyId, paused: bool) -> Self {
        let entries = objects
            .iter()
            .map(|o| {
                (
                    o.id.clone(),
                    o.physical.radius.map(f64::to_bits),
                    o.parent_id().cloned(),
                )
            })
            .collect();
        Self {
            policy,
            paused,
            entries,
        }
    }
}

/// Single-slot memo of the last computed layout.
///
/// Not an LRU: a request with a different fingerprint replaces the slot.
#[derive(Debug, Default)]
pub struct LayoutCache {
    slot: Option<(Fingerprint, Arc<LayoutMap>)>,
    hits: u64,
    misses: u64,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached layout for `key`, shared with the caller (`Arc::ptr_eq` holds
    /// between repeated hits).
    pub fn get(&mut self, key: &Fingerprint) -> Option<Arc<LayoutMap>> {
        match &self.slot {
            Some((cached, layout)) if cached == key => {
                self.hits += 1;
                log::debug!("Layout cache HIT ({} objects)", layout.len());
                Some(Arc::clone(layout))
            }
            _ => {
                self.misses += 1;
                log::debug!("Layout cache MISS");
                None
            }
        }
    }

    pub fn put(&mut self, key: Fingerprint, layout: Arc<LayoutMap>) {
        self.slot = Some((key, layout));
    }

    /// Drop the cached layout so the next request recomputes.
    pub fn clear(&mut self) {
        if self.slot.take().is_some() {
            log::debug!("Layout cache cleared");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
