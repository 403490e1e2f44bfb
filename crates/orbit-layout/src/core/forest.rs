// core/forest.rs
//
// Orbit hierarchy index over a borrowed object slice.
// Validates the forest once, then hands out parent/children/depth lookups by
// slice index so every later stage works on plain `Vec`s instead of id maps.

use std::collections::HashMap;

use crate::api::error::{EngineResult, LayoutError};
use crate::api::types::{CelestialObject, ObjectId, Orbit};

/// Validated orbit forest.
#[derive(Debug)]
pub struct Forest<'a> {
    objects: &'a [CelestialObject],
    index: HashMap<&'a ObjectId, usize>,
    parent: Vec<Option<usize>>,
    /// Children in source order.
    children: Vec<Vec<usize>>,
    depth: Vec<usize>,
    roots: Vec<usize>,
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Fresh,
    InProgress,
    Done,
}

impl<'a> Forest<'a> {
    /// Index `objects`, rejecting duplicate ids, dangling parents and cycles.
    pub fn build(objects: &'a [CelestialObject]) -> EngineResult<Self> {
        let mut index = HashMap::with_capacity(objects.len());
        for (i, obj) in objects.iter().enumerate() {
            if index.insert(&obj.id, i).is_some() {
                return Err(LayoutError::DuplicateId(obj.id.clone()));
            }
        }

        let mut parent = vec![None; objects.len()];
        let mut children = vec![Vec::new(); objects.len()];
        let mut roots = Vec::new();
        for (i, obj) in objects.iter().enumerate() {
            match obj.parent_id() {
                Some(pid) => {
                    let p = *index.get(pid).ok_or_else(|| LayoutError::MissingParent {
                        id: obj.id.clone(),
                        parent: pid.clone(),
                    })?;
                    parent[i] = Some(p);
                    children[p].push(i);
                }
                None => roots.push(i),
            }
        }

        let depth = Self::depths(objects, &parent)?;

        Ok(Self {
            objects,
            index,
            parent,
            children,
            depth,
            roots,
        })
    }

    /// Depth of every node (roots are 0). Walks each parent chain once,
    /// reporting a cycle when a chain revisits a node still in progress.
    fn depths(objects: &[CelestialObject], parent: &[Option<usize>]) -> EngineResult<Vec<usize>> {
        let mut state = vec![Visit::Fresh; objects.len()];
        let mut depth = vec![0; objects.len()];
        let mut chain = Vec::new();

        for start in 0..objects.len() {
            let mut node = start;
            loop {
                match state[node] {
                    Visit::Done => break,
                    Visit::InProgress => {
                        return Err(LayoutError::Cycle {
                            id: objects[node].id.clone(),
                        });
                    }
                    Visit::Fresh => {
                        state[node] = Visit::InProgress;
                        chain.push(node);
                        match parent[node] {
                            Some(p) => node = p,
                            None => break,
                        }
                    }
                }
            }

            // Unwind from the top of the chain down.
            while let Some(n) = chain.pop() {
                depth[n] = parent[n].map_or(0, |p| depth[p] + 1);
                state[n] = Visit::Done;
            }
        }
        Ok(depth)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, i: usize) -> &'a CelestialObject {
        &self.objects[i]
    }

    pub fn objects(&self) -> &'a [CelestialObject] {
        self.objects
    }

    pub fn index_of(&self, id: &ObjectId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn parent(&self, i: usize) -> Option<usize> {
        self.parent[i]
    }

    pub fn children(&self, i: usize) -> &[usize] {
        &self.children[i]
    }

    pub fn depth(&self, i: usize) -> usize {
        self.depth[i]
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Point-orbit object whose primary is not a star.
    pub fn is_satellite(&self, i: usize) -> bool {
        matches!(self.objects[i].orbit, Some(Orbit::Point(_)))
            && self.parent[i].is_some_and(|p| !self.objects[p].classification.is_star())
    }

    /// Belts and rings are exempt from the primary-larger-than-child rule.
    pub fn is_hierarchy_exempt(&self, i: usize) -> bool {
        self.objects[i].classification.is_belt()
            || matches!(self.objects[i].orbit, Some(Orbit::Annular(_)))
    }

    /// Children of `i` sorted by source distance (semi-major axis or inner
    /// radius). Ties keep source order.
    pub fn children_by_distance(&self, i: usize) -> Vec<usize> {
        let mut kids = self.children[i].clone();
        kids.sort_by(|&a, &b| self.ordering_key(a).total_cmp(&self.ordering_key(b)));
        kids
    }

    fn ordering_key(&self, i: usize) -> f64 {
        self.objects[i].orbit.as_ref().map_or(0.0, Orbit::ordering_key)
    }

    /// Objects that have at least one child, deepest first.
    pub fn primaries_deepest_first(&self) -> Vec<usize> {
        let mut primaries: Vec<usize> = (0..self.len())
            .filter(|&i| !self.children[i].is_empty())
            .collect();
        primaries.sort_by(|&a, &b| self.depth[b].cmp(&self.depth[a]));
        primaries
    }
}
