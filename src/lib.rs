//! Spaghetti Strings core crate.
//!
//! Drag across the canvas to stretch a string between two points; sweep the
//! pointer through it to pluck it. Each string wobbles back to rest on a
//! damped spring and plays a note picked from its length.
//!
//! The simulation ([`Spaghetti`], [`InteractiveVertex`], [`PointerTracker`])
//! is plain Rust and runs natively under `cargo test`. Only the `mount`
//! module and the web-backed store and sink talk to the browser.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod error;
pub mod geometry;
pub mod hitbox;
mod mount;
pub mod pointer;
pub mod scale;
pub mod settings;
pub mod spaghetti;
pub mod store;
pub mod surface;
pub mod throttle;
pub mod vertex;

pub use audio::{NoteSink, NullSink, WebAudioSink};
pub use error::{Result, SpaghettiError};
pub use geometry::Point;
pub use pointer::{Gesture, PointerState, PointerTracker, TouchPoint};
pub use settings::{HiRange, Settings};
pub use spaghetti::{Cursor, Spaghetti, SpaghettiString};
pub use store::{LocalStorageStore, MemoryStore, StoredString, StringStore};
pub use surface::Surface;
pub use vertex::{InteractiveVertex, Physics};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init only fails because a logger is already installed.
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);
}

// -----------------------------------------------------------------------------
// JS entry points
// -----------------------------------------------------------------------------

/// Mounts the canvas and starts the loop. `options_json` is a JSON object of
/// setting overrides; calling again re-mounts with the new options.
#[wasm_bindgen]
pub fn start_spaghetti(options_json: Option<String>) -> std::result::Result<(), JsValue> {
    mount::start(options_json.as_deref()).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn stop_spaghetti() {
    mount::stop();
}

#[wasm_bindgen]
pub fn clear_spaghetti() {
    mount::clear();
}

/// Returns the new mute state.
#[wasm_bindgen]
pub fn toggle_spaghetti_mute() -> bool {
    mount::toggle_mute()
}

#[wasm_bindgen]
pub fn spaghetti_string_count() -> u32 {
    mount::string_count()
}
