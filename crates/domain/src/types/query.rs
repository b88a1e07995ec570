//! Query types for collection lookups

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::Entity;

/// A query-language statement with optional paging parameters.
///
/// Plain strings convert into a query without limit or cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub ql: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

impl Query {
    pub fn new(ql: impl Into<String>) -> Self {
        Self { ql: ql.into(), limit: None, cursor: None }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl From<&str> for Query {
    fn from(ql: &str) -> Self {
        Self::new(ql)
    }
}

impl From<String> for Query {
    fn from(ql: String) -> Self {
        Self::new(ql)
    }
}

impl From<&Query> for Query {
    fn from(query: &Query) -> Self {
        query.clone()
    }
}

/// Entities matched by a query together with the raw response envelope.
///
/// Paging is caller driven: read [`FindResult::cursor`] and issue the next
/// query with it.
#[derive(Debug, Clone, PartialEq)]
pub struct FindResult {
    pub entities: Vec<Entity>,
    pub envelope: Value,
}

impl FindResult {
    /// Continuation cursor reported by the backend, if more results exist.
    pub fn cursor(&self) -> Option<&str> {
        self.envelope.get("cursor").and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }
}
