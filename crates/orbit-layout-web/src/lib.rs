pub mod runner;

pub use runner::{BridgeError, LayoutRunner};

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<LayoutRunner> = RefCell::new(LayoutRunner::new());
}

fn with_runner<R>(f: impl FnOnce(&mut LayoutRunner) -> R) -> R {
    RUNNER.with(|cell| f(&mut cell.borrow_mut()))
}

fn to_js(err: BridgeError) -> JsValue {
    log::warn!("orbit-layout: {}", err);
    JsValue::from_str(&err.to_string())
}

/// Install the panic hook and console logger. Safe to call more than once.
#[wasm_bindgen]
pub fn layout_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("orbit-layout: initialized");
}

/// Lay out a JSON array of objects under the named policy
/// (`true-scale`, `compressed`, `schematic-fixed`, `equidistant`).
/// Returns a JSON object keyed by object id.
#[wasm_bindgen]
pub fn layout_compute(objects_json: &str, policy: &str, paused: bool) -> Result<String, JsValue> {
    with_runner(|r| r.compute(objects_json, policy, paused)).map_err(to_js)
}

/// Whether the last `layout_compute` returned a different layout than the
/// call before it.
#[wasm_bindgen]
pub fn layout_changed() -> bool {
    with_runner(|r| r.changed())
}

#[wasm_bindgen]
pub fn layout_clear_cache() {
    with_runner(|r| r.clear_cache());
}

/// Replace the policy table from a JSON override file.
#[wasm_bindgen]
pub fn layout_load_policies(json: &str) -> Result<(), JsValue> {
    with_runner(|r| r.load_policies(json)).map_err(to_js)
}
