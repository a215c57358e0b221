//! Query data contracts shared with the transport collaborator.
//!
//! `QueryParams` is passed through this layer unmodified; its filter tree is
//! opaque here and interpreted by whatever speaks the OData-like protocol.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One sort criterion.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortDescriptor {
    pub selector: String,
    #[serde(default)]
    pub desc: bool,
}

/// Opaque filter/sort/paging/expand descriptor.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    /// Filter expression tree, interpreted by the transport collaborator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take: Option<u64>,
    /// Related sub-entities to include, comma-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expand: Option<String>,
    #[serde(default)]
    pub require_total_count: bool,
}

impl QueryParams {
    /// Params selecting one page of results.
    pub fn paged(skip: u64, take: u64) -> Self {
        Self {
            skip: Some(skip),
            take: Some(take),
            ..Self::default()
        }
    }
}

/// Ordered matches plus the total count across all pages.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> QueryResult<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}
