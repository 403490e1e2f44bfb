use std::sync::Arc;

use orbit_layout::{CelestialObject, LayoutEngine, LayoutError, LayoutMap, PolicyId, PolicyTable};
use thiserror::Error;

/// Errors surfaced to JavaScript as exception strings.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("unknown policy: {0}")]
    UnknownPolicy(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Layout(LayoutError::Json(err))
    }
}

/// JSON-in/JSON-out wrapper around a `LayoutEngine`.
///
/// The crate root keeps one of these in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export the
/// engine's borrowing API directly.
#[derive(Debug, Default)]
pub struct LayoutRunner {
    engine: LayoutEngine,
    last: Option<Arc<LayoutMap>>,
    changed: bool,
}

impl LayoutRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the policy table from an override file.
    pub fn load_policies(&mut self, json: &str) -> Result<(), BridgeError> {
        let table = PolicyTable::from_json(json)?;
        self.engine.set_policies(table);
        Ok(())
    }

    /// Parse `objects_json` (an array of objects), lay it out, and return the
    /// layout as a JSON object keyed by id.
    ///
    /// A failed call clears the change flag.
    pub fn compute(&mut self, objects_json: &str, policy: &str, paused: bool) -> Result<String, BridgeError> {
        self.changed = false;
        let policy = PolicyId::from_name(policy).ok_or_else(|| BridgeError::UnknownPolicy(policy.to_string()))?;
        let objects: Vec<CelestialObject> = serde_json::from_str(objects_json)?;

        let layout = self.engine.compute_layout(&objects, policy, paused)?;
        self.changed = !self.last.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, &layout));
        let json = serde_json::to_string(layout.as_ref())?;
        self.last = Some(layout);
        Ok(json)
    }

    /// Whether the last `compute` succeeded with a different layout than the
    /// one before it.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn clear_cache(&mut self) {
        self.engine.clear_layout_cache();
    }
}
