//! Fully-typed data adapter contract.

use crate::entity::Entity;
use crate::error::AdapterError;
use crate::key::EntityKey;
use crate::query::{QueryParams, QueryResult};
use crate::validation::ValidationModel;
use async_trait::async_trait;
use std::any::type_name;

/// Asynchronous CRUD and query operations over one entity type.
///
/// Implemented by the transport collaborator (an OData-style HTTP client, a
/// database-backed store, an in-memory fake in tests). Conventions:
/// not-found is `Ok(None)`, deleting an absent record is `Ok(())`, and a
/// failed validation on create/update is a normal [`ValidationModel`] return,
/// not an error. `expand` names related sub-entities to include,
/// comma-separated.
#[async_trait]
pub trait DataAdapter<T: Entity>: Send + Sync {
    /// Entities matching the filter/sort/paging criteria in `params`.
    async fn get(&self, params: &QueryParams) -> Result<QueryResult<T>, AdapterError>;

    /// One entity by key, or `None` if absent.
    async fn get_by_id(&self, id: &T::Key, expand: Option<&str>)
        -> Result<Option<T>, AdapterError>;

    /// String-keyed overload for ids not naturally typed. Parses the id into
    /// the entity's key type and forwards; an unparsable id is a conversion
    /// error.
    async fn get_by_str_id(
        &self,
        id: &str,
        expand: Option<&str>,
    ) -> Result<Option<T>, AdapterError> {
        let key = T::Key::parse_key(id)
            .ok_or_else(|| AdapterError::conversion(id, type_name::<T::Key>()))?;
        self.get_by_id(&key, expand).await
    }

    /// Persist a new item.
    async fn create(&self, item: T) -> Result<ValidationModel<T>, AdapterError>;

    /// Persist changes to an existing item, located by its own identifier.
    async fn update(&self, item: T) -> Result<ValidationModel<T>, AdapterError>;

    /// Remove the entity with the given key. Absence is not an error.
    async fn delete(&self, id: &T::Key) -> Result<(), AdapterError>;
}
