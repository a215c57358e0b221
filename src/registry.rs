//! Key-type-erased dispatch over registered adapters.
//!
//! Callers holding only an entity type invoke the convenience operations
//! here; the registry resolves the entity's adapter binding (built at most
//! effectively-once per entity type) and forwards to the fully-typed
//! [`DataAdapter`] methods.

use crate::adapter::DataAdapter;
use crate::entity::Entity;
use crate::error::{AdapterError, ConfigError};
use crate::key::{convert_id, EntityKey, IdValue, KeyKind};
use crate::query::{QueryParams, QueryResult};
use crate::validation::ValidationModel;
use dashmap::DashMap;
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

type AdapterFactory = Box<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

struct Registration {
    entity: &'static str,
    key_kind: KeyKind,
    factory: AdapterFactory,
}

/// One cached, fully-constructed binding. Immutable once published.
struct Binding {
    entity: &'static str,
    key_kind: KeyKind,
    /// `Arc<dyn DataAdapter<T>>` behind `Any`, downcast per call.
    adapter: Box<dyn Any + Send + Sync>,
}

/// Registry of adapter factories and cached per-entity-type bindings.
///
/// Registration is explicit: each entity type is wired to a factory producing
/// its adapter, binding the key type at registration time. The binding itself
/// is built lazily on first use with insert-if-absent publication, so
/// concurrent first callers may build redundantly (factories are expected to
/// be pure) but all observe the same fully-built entry.
pub struct AdapterRegistry {
    factories: DashMap<TypeId, Registration>,
    bindings: DashMap<TypeId, Arc<Binding>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self {
            factories: DashMap::new(),
            bindings: DashMap::new(),
        }
    }

    /// Wire an entity type to a factory producing its adapter.
    pub fn register<T, F>(&self, factory: F) -> Result<(), ConfigError>
    where
        T: Entity,
        F: Fn() -> Arc<dyn DataAdapter<T>> + Send + Sync + 'static,
    {
        let tid = TypeId::of::<T>();
        if self.factories.contains_key(&tid) {
            return Err(ConfigError::DuplicateRegistration {
                entity: type_name::<T>(),
            });
        }
        self.factories.insert(
            tid,
            Registration {
                entity: type_name::<T>(),
                key_kind: T::Key::kind(),
                factory: Box::new(move || Box::new(factory())),
            },
        );
        Ok(())
    }

    /// Wire an entity type to a pre-built adapter instance.
    pub fn register_adapter<T: Entity>(
        &self,
        adapter: Arc<dyn DataAdapter<T>>,
    ) -> Result<(), ConfigError> {
        self.register::<T, _>(move || adapter.clone())
    }

    /// The cached adapter for `T`, binding it on first use.
    pub fn resolve<T: Entity>(&self) -> Result<Arc<dyn DataAdapter<T>>, AdapterError> {
        let tid = TypeId::of::<T>();
        if let Some(binding) = self.bindings.get(&tid) {
            return Ok(Self::typed_adapter::<T>(&binding));
        }
        let built = {
            let reg = self
                .factories
                .get(&tid)
                .ok_or(ConfigError::UnregisteredEntity {
                    entity: type_name::<T>(),
                })?;
            tracing::debug!(entity = reg.entity, key = ?reg.key_kind, "binding adapter");
            Arc::new(Binding {
                entity: reg.entity,
                key_kind: reg.key_kind,
                adapter: (reg.factory)(),
            })
        };
        // Losing the insert race is fine: the winner's entry is equivalent
        // and already published whole.
        let binding = self.bindings.entry(tid).or_insert(built);
        Ok(Self::typed_adapter::<T>(&binding))
    }

    /// The key kind recorded for `T`, if registered.
    pub fn key_kind_of<T: Entity>(&self) -> Option<KeyKind> {
        let tid = TypeId::of::<T>();
        if let Some(binding) = self.bindings.get(&tid) {
            return Some(binding.key_kind);
        }
        self.factories.get(&tid).map(|reg| reg.key_kind)
    }

    /// Entities matching `params`, via the cached binding for `T`.
    pub async fn get<T: Entity>(
        &self,
        params: &QueryParams,
    ) -> Result<QueryResult<T>, AdapterError> {
        tracing::debug!(entity = type_name::<T>(), "dispatch get");
        self.resolve::<T>()?.get(params).await
    }

    /// One entity by erased id, converted to `T`'s key type before the call.
    pub async fn get_by_id<T: Entity>(
        &self,
        id: &IdValue,
        expand: Option<&str>,
    ) -> Result<Option<T>, AdapterError> {
        tracing::debug!(entity = type_name::<T>(), id = %id, "dispatch get_by_id");
        let adapter = self.resolve::<T>()?;
        let key = convert_id::<T::Key>(id)?;
        adapter.get_by_id(&key, expand).await
    }

    /// One entity by string id.
    pub async fn get_by_str_id<T: Entity>(
        &self,
        id: &str,
        expand: Option<&str>,
    ) -> Result<Option<T>, AdapterError> {
        tracing::debug!(entity = type_name::<T>(), id = %id, "dispatch get_by_str_id");
        self.resolve::<T>()?.get_by_str_id(id, expand).await
    }

    /// Persist a new item. An absent item is an argument error, raised
    /// before any binding lookup or delegation.
    pub async fn create<T: Entity>(
        &self,
        item: Option<T>,
    ) -> Result<ValidationModel<T>, AdapterError> {
        let item =
            item.ok_or_else(|| AdapterError::InvalidArgument("item is required".into()))?;
        tracing::debug!(entity = type_name::<T>(), "dispatch create");
        self.resolve::<T>()?.create(item).await
    }

    /// Persist changes to an existing item. An absent item is an argument
    /// error, raised before any binding lookup or delegation.
    pub async fn update<T: Entity>(
        &self,
        item: Option<T>,
    ) -> Result<ValidationModel<T>, AdapterError> {
        let item =
            item.ok_or_else(|| AdapterError::InvalidArgument("item is required".into()))?;
        tracing::debug!(entity = type_name::<T>(), "dispatch update");
        self.resolve::<T>()?.update(item).await
    }

    /// Remove the entity with the given erased id. Absence is not an error.
    pub async fn delete<T: Entity>(&self, id: &IdValue) -> Result<(), AdapterError> {
        tracing::debug!(entity = type_name::<T>(), id = %id, "dispatch delete");
        let adapter = self.resolve::<T>()?;
        let key = convert_id::<T::Key>(id)?;
        adapter.delete(&key).await
    }

    fn typed_adapter<T: Entity>(binding: &Binding) -> Arc<dyn DataAdapter<T>> {
        binding
            .adapter
            .downcast_ref::<Arc<dyn DataAdapter<T>>>()
            .unwrap_or_else(|| {
                // Bindings are keyed by T's TypeId and only written by
                // register::<T>/resolve::<T>.
                unreachable!("adapter binding for '{}' has unexpected type", binding.entity)
            })
            .clone()
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
