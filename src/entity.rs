//! Entity contract: a record with a typed primary key.

use crate::key::EntityKey;
use uuid::Uuid;

/// A record type with a typed primary-key identifier.
///
/// The key type is fixed by the associated type, so each entity exposes
/// exactly one key type and the dispatch layer can recover it without any
/// runtime inspection.
///
/// # Example
///
/// ```
/// use datasource_sdk::Entity;
///
/// struct Order {
///     id: Option<i64>,
///     total: u32,
/// }
///
/// impl Entity for Order {
///     type Key = i64;
///     fn key(&self) -> Option<&i64> { self.id.as_ref() }
///     fn set_key(&mut self, key: i64) { self.id = Some(key); }
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    type Key: EntityKey;

    /// The identifier, absent on records not yet persisted.
    fn key(&self) -> Option<&Self::Key>;

    fn set_key(&mut self, key: Self::Key);

    /// The identifier's natural string form, empty if absent.
    fn key_display(&self) -> String {
        self.key().map(|k| k.to_string()).unwrap_or_default()
    }
}

/// Entity keyed by a string.
pub trait StringKeyed: Entity<Key = String> {}
impl<T: Entity<Key = String>> StringKeyed for T {}

/// Entity keyed by a 32-bit integer.
pub trait IntKeyed: Entity<Key = i32> {}
impl<T: Entity<Key = i32>> IntKeyed for T {}

/// Entity keyed by a 64-bit integer.
pub trait LongKeyed: Entity<Key = i64> {}
impl<T: Entity<Key = i64>> LongKeyed for T {}

/// Entity keyed by a UUID.
pub trait UuidKeyed: Entity<Key = Uuid> {}
impl<T: Entity<Key = Uuid>> UuidKeyed for T {}
