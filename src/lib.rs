//! Save State - persist a slice of reducer state to LocalStorage
//!
//! Core modules:
//! - `reducer`: Wrapper that persists the projection of state when it changes
//! - `projection`: Key path resolution and record serialization
//! - `config`: Storage key and key paths to persist
//! - `storage`: Key-value store trait, in-memory and LocalStorage backends
//! - `error`: Error types
//!
//! ```
//! use save_state::{MemoryStore, PersistConfig, save_state};
//! use serde_json::{Value, json};
//!
//! let store = MemoryStore::new();
//! let config = PersistConfig::new("app").with_keys(["user"]);
//! let reducer = save_state(config, &store, |_: Option<&Value>, _: &&str| {
//!     json!({"user": "ada", "cursor": 3})
//! });
//!
//! reducer.reduce(Some(&json!({})), &"login").unwrap();
//! assert_eq!(store.get("app").as_deref(), Some(r#"{"user":"ada"}"#));
//! ```

pub mod config;
pub mod error;
pub mod projection;
pub mod reducer;
pub mod storage;

pub use config::{KeyPath, PersistConfig};
pub use error::{PersistError, StoreError};
pub use projection::Projection;
pub use reducer::{Persisted, PersistingReducer, load_state, save_state};
pub use storage::{MemoryStore, StateStore};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
