//! Browser bridge for the orrery engine.
//!
//! One `OrreryRunner` lives in a `thread_local!`; every export forwards to
//! it. Calls made before `orrery_init` are logged and ignored.

pub mod runner;

use std::cell::RefCell;

use js_sys::Array;
use orrery_engine::{NodeInstance, OrreryConfig};
use wasm_bindgen::prelude::*;

pub use runner::OrreryRunner;

thread_local! {
    static RUNNER: RefCell<Option<OrreryRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut OrreryRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let mut borrow = cell.borrow_mut();
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("orrery not initialized; call orrery_init() first");
                None
            }
        }
    })
}

/// Initialize from a JSON configuration (empty string for the defaults).
#[wasm_bindgen]
pub fn orrery_init(config_json: &str) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let runner = OrreryRunner::from_json(config_json)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("orrery: initialized");
    Ok(())
}

/// The built-in configuration as JSON, for tools that want a template.
#[wasm_bindgen]
pub fn orrery_default_config() -> Result<String, JsValue> {
    OrreryConfig::default()
        .to_json()
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn orrery_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Comparison ----

/// Returns false when the request was rejected; the reason is queued as a
/// notice.
#[wasm_bindgen]
pub fn request_comparison(left: &str, right: &str) -> bool {
    with_runner(|r| r.request_comparison(left, right)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn clear_comparison() {
    with_runner(|r| r.clear_comparison());
}

/// `[left, right]`, each a body name or `null`.
#[wasm_bindgen]
pub fn current_comparison() -> Array {
    let snapshot = with_runner(|r| r.current_comparison()).unwrap_or_default();
    let to_js = |name: Option<String>| name.map_or(JsValue::NULL, |n| JsValue::from_str(&n));
    Array::of2(&to_js(snapshot.left), &to_js(snapshot.right))
}

// ---- Orbit mode ----

#[wasm_bindgen]
pub fn enter_orbit_mode() -> u32 {
    with_runner(|r| r.enter_orbit_mode()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn exit_orbit_mode() {
    with_runner(|r| r.exit_orbit_mode());
}

#[wasm_bindgen]
pub fn pause_orbit_for_planet(name: &str) -> bool {
    with_runner(|r| r.pause_orbit_for_planet(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn resume_orbit_for_planet(name: &str) -> bool {
    with_runner(|r| r.resume_orbit_for_planet(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn set_orbit_paused(paused: bool) {
    with_runner(|r| r.set_orbit_paused(paused));
}

#[wasm_bindgen]
pub fn toggle_orbit_paused() -> bool {
    with_runner(|r| r.toggle_orbit_paused()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn set_time_warp(time_warp: f64) {
    with_runner(|r| r.set_time_warp(time_warp));
}

// ---- UI feedback ----

/// Queued notice messages since the last call.
#[wasm_bindgen]
pub fn drain_notices() -> Array {
    with_runner(|r| r.drain_notices())
        .unwrap_or_default()
        .iter()
        .map(|notice| JsValue::from_str(&notice.message()))
        .collect()
}

/// 0 = solar system, 1 = comparison, 2 = orbit.
#[wasm_bindgen]
pub fn view_mode() -> u32 {
    with_runner(|r| r.view_mode()).unwrap_or(0)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instance_floats() -> u32 {
    NodeInstance::FLOATS as u32
}

#[wasm_bindgen]
pub fn get_camera_ptr() -> *const f32 {
    with_runner(|r| r.camera_ptr()).unwrap_or(std::ptr::null())
}
