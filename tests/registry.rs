//! End-to-end dispatch tests against an in-memory adapter.

use async_trait::async_trait;
use datasource_sdk::prelude::*;
use datasource_sdk::{ConfigError, ValidationErrors};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq)]
struct Customer {
    id: Option<String>,
    name: String,
}

impl Entity for Customer {
    type Key = String;
    fn key(&self) -> Option<&String> {
        self.id.as_ref()
    }
    fn set_key(&mut self, key: String) {
        self.id = Some(key);
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Ticket {
    id: Option<i32>,
    subject: String,
}

impl Entity for Ticket {
    type Key = i32;
    fn key(&self) -> Option<&i32> {
        self.id.as_ref()
    }
    fn set_key(&mut self, key: i32) {
        self.id = Some(key);
    }
}

/// In-memory adapter: a keyed map plus counters/recorders used to observe
/// delegation from the convenience layer.
struct MemStore<T: Entity + Clone> {
    rows: Mutex<HashMap<T::Key, T>>,
    calls: AtomicUsize,
    last_expand: Mutex<Option<String>>,
}

impl<T: Entity + Clone> MemStore<T> {
    fn new() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            last_expand: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<T: Entity + Clone> DataAdapter<T> for MemStore<T> {
    async fn get(&self, params: &QueryParams) -> Result<QueryResult<T>, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.lock().unwrap();
        let total = rows.len() as u64;
        let skip = params.skip.unwrap_or(0) as usize;
        let take = params.take.map(|t| t as usize).unwrap_or(usize::MAX);
        let items = rows.values().cloned().skip(skip).take(take).collect();
        Ok(QueryResult::new(items, total))
    }

    async fn get_by_id(
        &self,
        id: &T::Key,
        expand: Option<&str>,
    ) -> Result<Option<T>, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_expand.lock().unwrap() = expand.map(str::to_string);
        Ok(self.rows.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, item: T) -> Result<ValidationModel<T>, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(key) = item.key().cloned() else {
            return Ok(ValidationModel::invalid(
                ValidationErrors::new().add("id", "id is required"),
            ));
        };
        self.rows.lock().unwrap().insert(key, item.clone());
        Ok(ValidationModel::valid(item))
    }

    async fn update(&self, item: T) -> Result<ValidationModel<T>, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some(key) = item.key().cloned() else {
            return Ok(ValidationModel::invalid(
                ValidationErrors::new().add("id", "id is required"),
            ));
        };
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&key) {
            return Ok(ValidationModel::invalid(
                ValidationErrors::new().add("id", "no record with this id"),
            ));
        }
        rows.insert(key, item.clone());
        Ok(ValidationModel::valid(item))
    }

    async fn delete(&self, id: &T::Key) -> Result<(), AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().remove(id);
        Ok(())
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn customer_registry() -> (AdapterRegistry, Arc<MemStore<Customer>>) {
    init_tracing();
    let store = Arc::new(MemStore::new());
    let registry = AdapterRegistry::new();
    registry
        .register::<Customer, _>({
            let store = store.clone();
            move || store.clone() as Arc<dyn DataAdapter<Customer>>
        })
        .unwrap();
    (registry, store)
}

#[tokio::test]
async fn convenience_ops_delegate_to_typed_adapter() {
    let (registry, store) = customer_registry();

    let created = registry
        .create(Some(Customer {
            id: Some("c-1".into()),
            name: "Ada".into(),
        }))
        .await
        .unwrap();
    assert!(created.is_valid());

    // Same result through the convenience layer and the typed adapter.
    let via_registry: Option<Customer> =
        registry.get_by_id(&json!("c-1"), None).await.unwrap();
    let via_adapter = store.get_by_id(&"c-1".to_string(), None).await.unwrap();
    assert_eq!(via_registry, via_adapter);
    assert_eq!(via_registry.unwrap().name, "Ada");

    let updated = registry
        .update(Some(Customer {
            id: Some("c-1".into()),
            name: "Ada L.".into(),
        }))
        .await
        .unwrap();
    assert!(updated.is_valid());

    let result: QueryResult<Customer> = registry.get(&QueryParams::default()).await.unwrap();
    assert_eq!(result.total_count, 1);
    assert_eq!(result.items[0].name, "Ada L.");

    registry.delete::<Customer>(&json!("c-1")).await.unwrap();
    let result: QueryResult<Customer> = registry.get(&QueryParams::default()).await.unwrap();
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn absent_item_is_rejected_before_delegation() {
    let (registry, store) = customer_registry();

    let err = registry.create::<Customer>(None).await.unwrap_err();
    assert!(matches!(err, AdapterError::InvalidArgument(_)));
    let err = registry.update::<Customer>(None).await.unwrap_err();
    assert!(matches!(err, AdapterError::InvalidArgument(_)));
    assert_eq!(store.calls(), 0);

    // Even with nothing registered the argument error wins over the
    // configuration error.
    let empty = AdapterRegistry::new();
    let err = empty.create::<Customer>(None).await.unwrap_err();
    assert!(matches!(err, AdapterError::InvalidArgument(_)));
}

#[tokio::test]
async fn unregistered_entity_is_a_config_error() {
    init_tracing();
    let registry = AdapterRegistry::new();
    let err = registry
        .get::<Customer>(&QueryParams::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdapterError::Config(ConfigError::UnregisteredEntity { .. })
    ));
}

#[tokio::test]
async fn erased_id_is_converted_to_the_key_type() {
    init_tracing();
    let store = Arc::new(MemStore::<Ticket>::new());
    let registry = AdapterRegistry::new();
    registry.register_adapter::<Ticket>(store.clone()).unwrap();

    registry
        .create(Some(Ticket {
            id: Some(42),
            subject: "printer on fire".into(),
        }))
        .await
        .unwrap();

    // Int id as a JSON number and as its string form both reach the record.
    let t: Option<Ticket> = registry.get_by_id(&json!(42), None).await.unwrap();
    assert_eq!(t.unwrap().subject, "printer on fire");
    let t: Option<Ticket> = registry.get_by_id(&json!("42"), None).await.unwrap();
    assert!(t.is_some());
    let t: Option<Ticket> = registry.get_by_str_id("42", None).await.unwrap();
    assert!(t.is_some());

    let err = registry
        .get_by_id::<Ticket>(&json!("abc"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::Conversion { .. }));

    registry.delete::<Ticket>(&json!("42")).await.unwrap();
    let t: Option<Ticket> = registry.get_by_id(&json!(42), None).await.unwrap();
    assert!(t.is_none());
}

#[tokio::test]
async fn expand_is_forwarded_unchanged() {
    let (registry, store) = customer_registry();
    let _: Option<Customer> = registry
        .get_by_id(&json!("c-9"), Some("orders,invoices"))
        .await
        .unwrap();
    assert_eq!(
        store.last_expand.lock().unwrap().as_deref(),
        Some("orders,invoices")
    );
}

#[tokio::test]
async fn validation_failure_is_a_normal_return() {
    let (registry, _) = customer_registry();
    let model = registry
        .create(Some(Customer {
            id: None,
            name: "no key".into(),
        }))
        .await
        .unwrap();
    assert!(!model.is_valid());
    assert_eq!(model.errors["id"], vec!["id is required"]);

    let model = registry
        .update(Some(Customer {
            id: Some("ghost".into()),
            name: "missing".into(),
        }))
        .await
        .unwrap();
    assert!(!model.is_valid());
    assert!(model.errors.contains_key("id"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_use_binds_consistently() {
    let (registry, _) = customer_registry();
    let registry = Arc::new(registry);
    let barrier = Arc::new(tokio::sync::Barrier::new(8));

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        let barrier = barrier.clone();
        tasks.push(tokio::spawn(async move {
            barrier.wait().await;
            registry.get::<Customer>(&QueryParams::default()).await
        }));
    }
    for task in tasks {
        let result = task.await.unwrap().unwrap();
        assert_eq!(result.total_count, 0);
    }

    // The published binding is stable after the race.
    let a = registry.resolve::<Customer>().unwrap();
    let b = registry.resolve::<Customer>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn string_keyed_worked_example() {
    let (registry, _) = customer_registry();

    let result: QueryResult<Customer> = registry.get(&QueryParams::default()).await.unwrap();
    assert_eq!(result.total_count, 0);
    assert!(result.items.is_empty());

    let found: Option<Customer> = registry.get_by_str_id("1", None).await.unwrap();
    assert!(found.is_none());

    // Deleting a record that never existed is not an error.
    registry.delete::<Customer>(&json!("1")).await.unwrap();
}
