//! Key types and erased-id conversion.
//!
//! Ids cross the convenience layer as [`IdValue`] (untyped JSON values, the
//! same representation the transport collaborator speaks) and are converted
//! into the entity's declared key type before any adapter call.

use crate::error::AdapterError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::type_name;
use std::fmt::Display;
use std::hash::Hash;
use uuid::Uuid;

/// An id whose key type has been erased.
pub type IdValue = Value;

/// The shape of an entity's primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Text,
    Int,
    BigInt,
    Uuid,
    /// Any other comparable key type supplied by the consumer.
    Other,
}

/// A type usable as an entity's primary key.
///
/// Implemented for `String`, `i32`, `i64` and [`Uuid`]. Consumers may
/// implement it for their own comparable key types (enum-like keys included);
/// `parse_key` is then the hook through which erased ids reach that type.
pub trait EntityKey: Clone + Eq + Hash + Display + Send + Sync + 'static {
    fn kind() -> KeyKind {
        KeyKind::Other
    }

    /// Parse the key from its natural string form.
    fn parse_key(s: &str) -> Option<Self>;

    /// Convert an erased id into this key type.
    ///
    /// The default renders the value's natural string form and parses it;
    /// the well-known key types override this to accept values already of
    /// their shape unchanged.
    fn from_id_value(v: &IdValue) -> Result<Self, AdapterError> {
        Self::parse_key(&natural_string(v))
            .ok_or_else(|| AdapterError::conversion(v, type_name::<Self>()))
    }
}

impl EntityKey for String {
    fn kind() -> KeyKind {
        KeyKind::Text
    }

    fn parse_key(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn from_id_value(v: &IdValue) -> Result<Self, AdapterError> {
        match v {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Err(AdapterError::conversion(v, type_name::<Self>())),
            other => Ok(natural_string(other)),
        }
    }
}

impl EntityKey for i32 {
    fn kind() -> KeyKind {
        KeyKind::Int
    }

    fn parse_key(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn from_id_value(v: &IdValue) -> Result<Self, AdapterError> {
        match v {
            // Narrowing from a wider JSON integer must be lossless.
            Value::Number(n) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| AdapterError::conversion(v, type_name::<Self>())),
            Value::String(s) => Self::parse_key(s)
                .ok_or_else(|| AdapterError::conversion(v, type_name::<Self>())),
            _ => Err(AdapterError::conversion(v, type_name::<Self>())),
        }
    }
}

impl EntityKey for i64 {
    fn kind() -> KeyKind {
        KeyKind::BigInt
    }

    fn parse_key(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    fn from_id_value(v: &IdValue) -> Result<Self, AdapterError> {
        match v {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| AdapterError::conversion(v, type_name::<Self>())),
            Value::String(s) => Self::parse_key(s)
                .ok_or_else(|| AdapterError::conversion(v, type_name::<Self>())),
            _ => Err(AdapterError::conversion(v, type_name::<Self>())),
        }
    }
}

impl EntityKey for Uuid {
    fn kind() -> KeyKind {
        KeyKind::Uuid
    }

    fn parse_key(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok()
    }
}

/// Convert an erased id into the key type `K`.
///
/// Idempotent: a value already of the target shape is returned unchanged.
pub fn convert_id<K: EntityKey>(v: &IdValue) -> Result<K, AdapterError> {
    K::from_id_value(v)
}

/// Nullable variant: JSON null maps to `None`, anything else goes through
/// the same conversion ladder as [`convert_id`].
pub fn convert_id_opt<K: EntityKey>(v: &IdValue) -> Result<Option<K>, AdapterError> {
    match v {
        Value::Null => Ok(None),
        other => convert_id(other).map(Some),
    }
}

/// The natural string rendering of an erased value: the bare string for JSON
/// strings, the JSON rendering otherwise.
fn natural_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
