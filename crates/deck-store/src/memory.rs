//! In-process `RemoteStore`, for tests and offline use.
//!
//! Stores a serialized copy of the collection so every `load` hands out an
//! independent value, the same way the HTTP store does.

use crate::{RemoteStore, StoreError};
use deck_core::Collection;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryState {
    document: String,
    failures: VecDeque<StoreError>,
    loads: usize,
    saves: usize,
}

/// A store backed by a string in memory.
#[derive(Debug)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::with_collection(&Collection::new())
    }

    /// A store whose document starts as `collection`.
    pub fn with_collection(collection: &Collection) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                document: encode(collection),
                ..MemoryState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make the next load or save fail with `error`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, error: StoreError) {
        self.lock().failures.push_back(error);
    }

    /// The stored document as it is now, bypassing failure injection.
    pub fn snapshot(&self) -> Collection {
        decode(&self.lock().document).unwrap_or_default()
    }

    /// Number of successful loads.
    pub fn loads(&self) -> usize {
        self.lock().loads
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.lock().saves
    }
}

impl RemoteStore for MemoryStore {
    async fn load(&self) -> Result<Collection, StoreError> {
        let mut state = self.lock();
        if let Some(e) = state.failures.pop_front() {
            return Err(e);
        }
        let collection = decode(&state.document)?;
        state.loads += 1;
        Ok(collection)
    }

    async fn save(&self, collection: &Collection) -> Result<(), StoreError> {
        let mut state = self.lock();
        if let Some(e) = state.failures.pop_front() {
            return Err(e);
        }
        state.document = encode(collection);
        state.saves += 1;
        Ok(())
    }
}

fn encode(collection: &Collection) -> String {
    serde_json::to_string(collection).unwrap_or_else(|e| {
        log::warn!("memory store could not encode collection: {e}");
        String::from("{}")
    })
}

fn decode(document: &str) -> Result<Collection, StoreError> {
    Ok(serde_json::from_str(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::{Presentation, PresentationId};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn save_replaces_whole_document() {
        let store = MemoryStore::new();
        let mut collection = Collection::new();
        collection.push(Presentation::new("one", ""));
        store.save(&collection).await.unwrap();

        let mut other = Collection::new();
        other.push(Presentation::new("two", ""));
        other.push(Presentation::new("three", ""));
        store.save(&other).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, other);
        assert_eq!(loaded.get(PresentationId::FIRST).unwrap().name, "two");
        assert_eq!(store.saves(), 2);
        assert_eq!(store.loads(), 1);
    }

    #[tokio::test]
    async fn loads_are_independent_copies() {
        let store = MemoryStore::new();
        let mut a = store.load().await.unwrap();
        a.push(Presentation::new("local only", ""));
        let b = store.load().await.unwrap();
        assert!(b.is_empty());
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_in_order() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::Auth("expired".into()));
        store.fail_next(StoreError::Network("offline".into()));

        assert_eq!(
            store.load().await.unwrap_err(),
            StoreError::Auth("expired".into())
        );
        assert_eq!(
            store.save(&Collection::new()).await.unwrap_err(),
            StoreError::Network("offline".into())
        );
        assert!(store.load().await.is_ok());
    }
}
