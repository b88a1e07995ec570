//! Entity and count value types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A remote collection member: string keys mapped to JSON values.
///
/// Once persisted remotely it carries the configured id property.
pub type Entity = Map<String, Value>;

/// Collection size as reported by application metadata.
///
/// The backend cannot count the results of a query, so this is the size of
/// the whole collection at the time the metadata was last refreshed. It may
/// lag behind recent writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApproximateCount(u64);

impl ApproximateCount {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The approximate number of entities in the collection.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<ApproximateCount> for u64 {
    fn from(count: ApproximateCount) -> Self {
        count.0
    }
}
