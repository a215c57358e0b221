//! Datasource SDK: generic entity data-access contracts with key-type-erased
//! CRUD dispatch.
//!
//! The [`Entity`] and [`DataAdapter`] traits define the contract between UI
//! components and whatever collaborator actually performs storage or
//! OData-style network calls. The [`AdapterRegistry`] adds the convenience
//! layer: callers naming only the entity type get forwarded to the
//! fully-typed adapter through a binding cached per entity type.

pub mod adapter;
pub mod entity;
pub mod error;
pub mod key;
pub mod query;
pub mod registry;
pub mod validation;

pub use adapter::DataAdapter;
pub use entity::{Entity, IntKeyed, LongKeyed, StringKeyed, UuidKeyed};
pub use error::{AdapterError, ConfigError};
pub use key::{convert_id, convert_id_opt, EntityKey, IdValue, KeyKind};
pub use query::{QueryParams, QueryResult, SortDescriptor};
pub use registry::AdapterRegistry;
pub use validation::{ValidationErrors, ValidationModel};

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use crate::{
        AdapterError, AdapterRegistry, DataAdapter, Entity, EntityKey, IdValue, QueryParams,
        QueryResult, ValidationModel,
    };
}
