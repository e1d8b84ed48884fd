//! Save State demo
//!
//! Drives a small counter reducer through the persisting wrapper. Native
//! builds use an in-memory store; the web build writes to LocalStorage.

use save_state::{PersistConfig, PersistError, StateStore, load_state, save_state};
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const STORAGE_KEY: &str = "save_state_demo";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Counter {
    count: i64,
    /// Not persisted, changes on every action
    last_action: String,
}

#[derive(Debug)]
enum Action {
    Increment,
    Decrement,
    Touch,
}

fn counter(state: Option<&Counter>, action: &Action) -> Counter {
    let mut next = state.cloned().unwrap_or_default();
    match action {
        Action::Increment => next.count += 1,
        Action::Decrement => next.count -= 1,
        Action::Touch => {}
    }
    next.last_action = format!("{action:?}");
    next
}

fn run_demo<St: StateStore>(store: St) -> Result<(), PersistError> {
    let config = PersistConfig::new(STORAGE_KEY).with_keys(["count"]);
    let restored: Option<serde_json::Value> = load_state(&store, STORAGE_KEY)?;
    log::info!("Restored record: {restored:?}");

    let reducer = save_state(config, store, counter);
    let mut state = reducer.reduce(None, &Action::Touch)?;
    for action in [
        Action::Increment,
        Action::Increment,
        Action::Touch,
        Action::Decrement,
    ] {
        let (next, outcome) = reducer.reduce_with_outcome(Some(&state), &action)?;
        log::info!("{action:?} -> count {} ({outcome:?})", next.count);
        state = next;
    }

    let key = &reducer.config().storage_key;
    let saved = reducer.store().get_item(key)?;
    log::info!("Stored under '{key}': {saved:?}");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }

    log::info!("Save State demo (web) starting...");
    let result = save_state::LocalStorage::open()
        .map_err(PersistError::from)
        .and_then(run_demo);
    if let Err(e) = result {
        log::error!("Demo failed: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), PersistError> {
    env_logger::init();
    log::info!("Save State demo (native, in-memory store) starting...");
    run_demo(save_state::MemoryStore::new())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
