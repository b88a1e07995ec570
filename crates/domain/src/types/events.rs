//! Collection lifecycle notifications

use serde::Serialize;

use super::entity::{ApproximateCount, Entity};
use super::query::Query;

/// Data carried by a `received` notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    Entity(Entity),
    Entities(Vec<Entity>),
    Count(ApproximateCount),
    Empty,
}

impl From<Option<Entity>> for EventPayload {
    fn from(entity: Option<Entity>) -> Self {
        entity.map_or(Self::Empty, Self::Entity)
    }
}

/// Notification emitted by a collection client around each operation.
///
/// Intent events (`Create`, `Read`, ...) fire before the token is fetched,
/// even when the operation later fails. Completion events fire only after a
/// successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum CollectionEvent {
    Create(Entity),
    AfterCreate(Entity),
    Read(String),
    Update { entity: Entity, overwrite: bool },
    AfterUpdate(Entity),
    Delete(String),
    AfterDelete { id: String, entity: Option<Entity> },
    Find(Query),
    FindOne(Query),
    Count,
    Received(EventPayload),
}

impl CollectionEvent {
    /// Event name as announced on the notification channel.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create(_) => "create",
            Self::AfterCreate(_) => "afterCreate",
            Self::Read(_) => "read",
            Self::Update { .. } => "update",
            Self::AfterUpdate(_) => "afterUpdate",
            Self::Delete(_) => "delete",
            Self::AfterDelete { .. } => "afterDelete",
            Self::Find(_) => "find",
            Self::FindOne(_) => "findOne",
            Self::Count => "count",
            Self::Received(_) => "received",
        }
    }
}
