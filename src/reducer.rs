//! Persisting reducer
//!
//! Wraps a base reducer so that every transition which changes the persisted
//! projection of state is written to a [`StateStore`]. The state returned to
//! the caller is always exactly what the base reducer produced.
//!
//! ```text
//! prior --base(action)--> next
//!   |                      |
//! project               project
//!   \----- differ? -----/
//!            |
//!    store.set_item(key, json)
//! ```

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::PersistConfig;
use crate::error::{PersistError, Result};
use crate::projection::Projection;
use crate::storage::StateStore;

/// Outcome of the persistence step for one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persisted {
    /// No prior state to compare against
    NoPriorState,
    /// Projection unchanged, nothing written
    Unchanged,
    /// Projection changed and was written
    Written,
}

/// Reducer wrapper that persists a projection of state on change
pub struct PersistingReducer<S, A, F, St> {
    config: PersistConfig,
    store: St,
    base: F,
    _marker: PhantomData<fn(Option<&S>, &A) -> S>,
}

/// Wrap `base` so changes to the configured projection are saved to `store`
pub fn save_state<S, A, F, St>(
    config: PersistConfig,
    store: St,
    base: F,
) -> PersistingReducer<S, A, F, St>
where
    F: Fn(Option<&S>, &A) -> S,
    S: Serialize,
    St: StateStore,
{
    PersistingReducer::new(config, store, base)
}

impl<S, A, F, St> PersistingReducer<S, A, F, St>
where
    F: Fn(Option<&S>, &A) -> S,
    S: Serialize,
    St: StateStore,
{
    pub fn new(config: PersistConfig, store: St, base: F) -> Self {
        Self {
            config,
            store,
            base,
            _marker: PhantomData,
        }
    }

    /// Run the base reducer and persist the result if its projection changed.
    ///
    /// Store and serialization failures are returned as errors; the next
    /// state is not returned in that case.
    pub fn reduce(&self, prior: Option<&S>, action: &A) -> Result<S> {
        self.reduce_with_outcome(prior, action).map(|(next, _)| next)
    }

    /// Like [`reduce`](Self::reduce), also reporting what happened to storage
    pub fn reduce_with_outcome(&self, prior: Option<&S>, action: &A) -> Result<(S, Persisted)> {
        let next = (self.base)(prior, action);
        let outcome = self.persist(prior, &next)?;
        Ok((next, outcome))
    }

    fn persist(&self, prior: Option<&S>, next: &S) -> Result<Persisted> {
        let key = &self.config.storage_key;

        let prior = match prior.map(to_value).transpose()? {
            Some(value) if !value.is_null() => value,
            _ => {
                log::debug!("No prior state, skipping persistence of '{key}'");
                return Ok(Persisted::NoPriorState);
            }
        };
        let next = to_value(next)?;

        let keys = self.config.keys_to_save.as_deref();
        let prior_projection = Projection::of(&prior, keys);
        let next_projection = Projection::of(&next, keys);

        if prior_projection == next_projection {
            log::trace!("Projection for '{key}' unchanged");
            return Ok(Persisted::Unchanged);
        }

        let record = next_projection.to_json().map_err(PersistError::Serialize)?;
        if let Err(e) = self.store.set_item(key, &record) {
            log::warn!("Failed to persist '{key}': {e}");
            return Err(e.into());
        }
        log::debug!("Persisted '{key}' ({} bytes)", record.len());
        Ok(Persisted::Written)
    }

    pub fn config(&self) -> &PersistConfig {
        &self.config
    }

    pub fn store(&self) -> &St {
        &self.store
    }
}

fn to_value<S: Serialize>(state: &S) -> Result<Value> {
    serde_json::to_value(state).map_err(PersistError::Serialize)
}

/// Load a previously persisted record for hydrating initial state.
///
/// Returns `Ok(None)` when nothing is stored under `key`.
pub fn load_state<T, St>(store: &St, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    St: StateStore + ?Sized,
{
    let Some(json) = store.get_item(key)? else {
        log::debug!("Nothing stored under '{key}'");
        return Ok(None);
    };
    let value = serde_json::from_str(&json).map_err(|source| PersistError::Corrupt {
        key: key.to_owned(),
        source,
    })?;
    log::debug!("Loaded '{key}' from storage");
    Ok(Some(value))
}
