//! Validation outcome carrier for create/update operations.
//!
//! Rule evaluation lives in the persistence collaborator; this layer only
//! carries the outcome back. A failed validation is a normal return value,
//! never an error.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Either a persisted item or a field-name → error-messages mapping.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationModel<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub errors: HashMap<String, Vec<String>>,
}

impl<T> ValidationModel<T> {
    /// A successfully persisted item.
    pub fn valid(item: T) -> Self {
        Self {
            item: Some(item),
            errors: HashMap::new(),
        }
    }

    /// A rejected item with field-level messages. An empty error set would
    /// be indistinguishable from a valid model, so callers must add at
    /// least one message.
    pub fn invalid(errors: ValidationErrors) -> Self {
        debug_assert!(!errors.is_empty(), "invalid model needs at least one message");
        Self {
            item: None,
            errors: errors.0,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_item(self) -> Option<T> {
        self.item
    }
}

/// Accumulates field-level validation messages.
#[derive(Clone, Debug, Default)]
pub struct ValidationErrors(HashMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.0.entry(field.into()).or_default().push(message.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
