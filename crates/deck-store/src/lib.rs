//! Remote store client.
//!
//! The remote store holds one JSON document per user: the whole presentation
//! collection. There are no partial updates. `load` fetches the document and
//! `save` replaces it, last writer wins.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;

pub use config::StoreConfig;
pub use error::StoreError;
pub use http::HttpStore;
pub use memory::MemoryStore;

use deck_core::Collection;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Body of `GET /store` and `PUT /store`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub store: Collection,
}

/// A whole-document store for the presentation collection.
pub trait RemoteStore {
    /// Fetch the entire collection.
    fn load(&self) -> impl Future<Output = Result<Collection, StoreError>> + Send;

    /// Replace the entire collection.
    fn save(&self, collection: &Collection) -> impl Future<Output = Result<(), StoreError>> + Send;
}

impl<S: RemoteStore + Sync> RemoteStore for &S {
    fn load(&self) -> impl Future<Output = Result<Collection, StoreError>> + Send {
        (**self).load()
    }

    fn save(&self, collection: &Collection) -> impl Future<Output = Result<(), StoreError>> + Send {
        (**self).save(collection)
    }
}
