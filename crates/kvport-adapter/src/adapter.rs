use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use kvport_protocol::{names, PortRequest, PortResponse};
use kvport_store::KeyValueStore;

use crate::error::AdapterResult;
use crate::hook::{DiagnosticHook, NoOpHook};
use crate::set;

/// Serves storage operations against a host [`KeyValueStore`].
///
/// Values are JSON, stored as their canonical text. Each operation runs to
/// completion on the calling thread; the read-modify-write in the set
/// operations is not atomic against other writers of the same store.
pub struct StorageAdapter<S> {
    store: S,
    hook: Arc<dyn DiagnosticHook>,
}

impl<S: KeyValueStore> StorageAdapter<S> {
    /// Create an adapter with no diagnostic hook.
    pub fn new(store: S) -> Self {
        Self {
            store,
            hook: Arc::new(NoOpHook),
        }
    }

    /// Create an adapter that reports every port call to `hook`.
    pub fn with_hook(store: S, hook: impl DiagnosticHook + 'static) -> Self {
        Self {
            store,
            hook: Arc::new(hook),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decode the entry under `key`, or `Value::Null` if it is absent or
    /// not valid JSON.
    pub fn get_item(&self, key: &str) -> AdapterResult<Value> {
        self.hook.log(names::GET_ITEM, &[Value::from(key)]);
        let value = self.read_json(key)?.unwrap_or(Value::Null);
        self.hook
            .log(names::GET_ITEM_RESPONSE, &[Value::from(key), value.clone()]);
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &Value) -> AdapterResult<()> {
        self.hook
            .log(names::SET_ITEM, &[Value::from(key), value.clone()]);
        self.write_json(key, value)
    }

    pub fn remove_item(&self, key: &str) -> AdapterResult<()> {
        self.hook.log(names::REMOVE_ITEM, &[Value::from(key)]);
        self.store.remove_item(key)?;
        Ok(())
    }

    pub fn clear(&self) -> AdapterResult<()> {
        self.hook.log(names::CLEAR, &[]);
        self.store.clear()?;
        Ok(())
    }

    /// Append `value` to the set under `key` unless already present.
    ///
    /// Anything other than an array at `key` (including nothing) is replaced
    /// by a fresh set. The set is written back even when unchanged.
    pub fn push_to_set(&self, key: &str, value: &Value) -> AdapterResult<()> {
        self.hook
            .log(names::PUSH_TO_SET, &[Value::from(key), value.clone()]);

        let mut list = match self.read_json(key)? {
            Some(Value::Array(items)) => items,
            Some(other) => {
                debug!(key, discarded = %other, "replacing non-list value with a new set");
                Vec::new()
            }
            None => Vec::new(),
        };
        set::push_unique(&mut list, value.clone())?;
        self.write_json(key, &Value::Array(list))
    }

    /// Remove every element equal to `value` from the set under `key`.
    ///
    /// If `key` does not hold an array the call aborts without writing.
    pub fn remove_from_set(&self, key: &str, value: &Value) -> AdapterResult<()> {
        self.hook
            .log(names::REMOVE_FROM_SET, &[Value::from(key), value.clone()]);

        let mut list = match self.read_json(key)? {
            Some(Value::Array(items)) => items,
            other => {
                let stored = other.unwrap_or(Value::Null);
                self.hook.log(
                    names::REMOVE_FROM_SET_ABORTED,
                    &[Value::from(key), value.clone(), stored],
                );
                return Ok(());
            }
        };
        let removed = set::remove_all(&mut list, value)?;
        debug!(key, removed, "filtered set");
        self.write_json(key, &Value::Array(list))
    }

    /// Run one request, returning the response the port emits, if any.
    pub fn handle(&self, request: PortRequest) -> AdapterResult<Option<PortResponse>> {
        match request {
            PortRequest::GetItem { key } => {
                let value = self.get_item(&key)?;
                Ok(Some(PortResponse::GetItem { key, value }))
            }
            PortRequest::SetItem { key, value } => self.set_item(&key, &value).map(|_| None),
            PortRequest::RemoveItem { key } => self.remove_item(&key).map(|_| None),
            PortRequest::Clear => self.clear().map(|_| None),
            PortRequest::PushToSet { key, value } => self.push_to_set(&key, &value).map(|_| None),
            PortRequest::RemoveFromSet { key, value } => {
                self.remove_from_set(&key, &value).map(|_| None)
            }
        }
    }

    /// Read and decode the entry under `key`. Undecodable text reads as
    /// absent; store failures still propagate.
    fn read_json(&self, key: &str) -> AdapterResult<Option<Value>> {
        let Some(text) = self.store.get_item(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                debug!(key, error = %e, "stored entry is not valid JSON; reading as null");
                Ok(None)
            }
        }
    }

    fn write_json(&self, key: &str, value: &Value) -> AdapterResult<()> {
        let text = set::canonical_json(value)?;
        self.store.set_item(key, &text)?;
        Ok(())
    }
}

impl<S> std::fmt::Debug for StorageAdapter<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
