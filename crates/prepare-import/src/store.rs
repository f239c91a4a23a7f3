//! Persistence of manifests in the `Admin` collection.

use std::collections::BTreeMap;

use tracing::info;

use crate::admin_object::{AdminId, AdminObject};
use crate::{PrepareImportError, Result};

/// Collection receiving the manifests.
pub const ADMIN_COLLECTION: &str = "Admin";

/// Sink for manifests, and the injection point for the `Admin` database
/// client. Implementations store the document as-is and reject a second
/// document with the same `_id`.
pub trait AdminStore {
    fn insert(&mut self, admin_object: &AdminObject) -> Result<AdminId>;
}

/// In-memory `Admin` collection, keyed by `_id`
#[derive(Debug, Default)]
pub struct InMemoryAdminStore {
    documents: BTreeMap<AdminId, AdminObject>,
}

impl InMemoryAdminStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &AdminId) -> Option<&AdminObject> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl AdminStore for InMemoryAdminStore {
    fn insert(&mut self, admin_object: &AdminObject) -> Result<AdminId> {
        let id = admin_object.id.clone();
        if self.documents.contains_key(&id) {
            return Err(PrepareImportError::Persistence(format!(
                "E11000 duplicate key error collection: {} dup key: {{ _id: {{ key: \"{}\", type: \"{}\" }} }}",
                ADMIN_COLLECTION, id.key, id.kind
            )));
        }
        self.documents.insert(id.clone(), admin_object.clone());
        info!(collection = ADMIN_COLLECTION, key = %id.key, "Manifest inserted");
        Ok(id)
    }
}
