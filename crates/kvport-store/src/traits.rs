use crate::error::StoreResult;

/// A flat, string-keyed, string-valued store.
///
/// The method set mirrors the host `Storage` facility the adapter sits on:
/// entries are opaque strings and the store never interprets them.
///
/// Implementations must satisfy these invariants:
/// - All methods take `&self`; mutation goes through interior locking so a
///   store can be shared behind an `Arc`.
/// - A single call is atomic with respect to other calls on the same store.
///   Sequences of calls are not.
/// - Failures (I/O, quota) are returned, never swallowed.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw entry stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or overwrite the entry under `key`.
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete the entry under `key`. Returns `true` if it existed.
    fn remove_item(&self, key: &str) -> StoreResult<bool>;

    /// Delete every entry.
    fn clear(&self) -> StoreResult<()>;

    /// All keys currently present, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Number of entries.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.keys()?.len())
    }

    /// Returns `true` if the store holds no entries.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Check whether `key` has an entry.
    fn contains_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StoreResult<bool> {
        (**self).remove_item(key)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        (**self).keys()
    }

    fn len(&self) -> StoreResult<usize> {
        (**self).len()
    }
}
