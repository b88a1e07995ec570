//! Collection client
//!
//! Maps create/read/update/delete/find/count onto a remote collection. Every
//! operation follows the same path: announce intent on the event bus, fetch
//! a token, perform one request, check the status, extract the payload from
//! the envelope, announce completion.

use std::sync::Arc;

use futures::stream::{Stream, StreamExt};
use gridsave_common::{encode_uri_component, entity_id};
use gridsave_domain::{
    AccessToken, ApproximateCount, CollectionConfig, CollectionEvent, Credentials, Entity,
    EventPayload, FindResult, GridSaveError, OperationKind, Query, Result,
};
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

use super::envelope;
use crate::auth::{TokenCache, TokenEndpoint};
use crate::events::EventBus;
use crate::transport::{Method, Transport, TransportRequest, TransportResponse};

/// Client for one named collection
pub struct CollectionClient {
    collection: String,
    config: CollectionConfig,
    collection_url: String,
    transport: Arc<dyn Transport>,
    tokens: TokenCache,
    events: EventBus,
}

impl CollectionClient {
    /// Create a client whose tokens come from the application's token
    /// endpoint, exchanged over the same transport.
    pub fn new(
        collection: impl Into<String>,
        config: CollectionConfig,
        credentials: Credentials,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let endpoint = TokenEndpoint::for_config(Arc::clone(&transport), &config, credentials);
        Self::with_token_cache(collection, config, transport, TokenCache::new(Arc::new(endpoint)))
    }

    /// Create a client around an existing token cache.
    pub fn with_token_cache(
        collection: impl Into<String>,
        config: CollectionConfig,
        transport: Arc<dyn Transport>,
        tokens: TokenCache,
    ) -> Self {
        let collection = collection.into();
        let collection_url = config.collection_url(&collection);
        Self { collection, config, collection_url, transport, tokens, events: EventBus::new() }
    }

    /// Publish events on `events` instead of a private bus.
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id_property(&self) -> &str {
        self.config.id_property()
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Subscribe to this client's lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionEvent> {
        self.events.subscribe()
    }

    /// Insert a new entity. Any id it carries is left for the backend to
    /// ignore; the returned entity holds the server-assigned id.
    ///
    /// # Errors
    /// `Transport`/`Auth` from the token fetch or request, `Operation` on a
    /// non-200 status, `Decode` if the response holds no entity.
    #[instrument(skip(self, entity), fields(collection = %self.collection))]
    pub async fn create(&self, entity: &Entity) -> Result<Entity> {
        self.events.emit(CollectionEvent::Create(entity.clone()));

        let token = self.tokens.get_token().await?;
        let request = self
            .request(Method::Post, self.collection_url.clone(), &token)
            .json(Value::Object(entity.clone()));
        let response = self.transport.perform(request).await?;

        if !response.is_ok() {
            warn!(status = response.status, "Create rejected");
            return Err(GridSaveError::operation(OperationKind::Create, "Failed to create"));
        }

        let created = single_entity(&response, OperationKind::Create)?;
        debug!(id = ?entity_id(&created, self.id_property()), "Entity created");

        self.events.emit(CollectionEvent::AfterCreate(created.clone()));
        self.events.emit(CollectionEvent::Received(EventPayload::Entity(created.clone())));
        Ok(created)
    }

    /// Fetch an entity by id.
    ///
    /// A 404 is not a failure: it resolves to `Ok(None)`.
    ///
    /// # Errors
    /// `Transport`/`Auth`, or `Operation` for any status other than 200/404.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn read(&self, id: &str) -> Result<Option<Entity>> {
        self.events.emit(CollectionEvent::Read(id.to_string()));

        let token = self.tokens.get_token().await?;
        let request = self.request(Method::Get, self.entity_url(id), &token);
        let response = self.transport.perform(request).await?;

        match response.status {
            200 => {}
            404 => {
                debug!("Entity not found");
                return Ok(None);
            }
            status => {
                warn!(status, "Read rejected");
                return Err(GridSaveError::operation(
                    OperationKind::Retrieve,
                    format!("Failed to retrieve {id}"),
                ));
            }
        }

        let entity = envelope::first_entity(&response.json_body()?)?;
        if let Some(found) = &entity {
            self.events.emit(CollectionEvent::Received(EventPayload::Entity(found.clone())));
        }
        Ok(entity)
    }

    /// Modify an existing entity identified by its id property.
    ///
    /// Full-document overwrite is refused: passing `overwrite = true` fails
    /// before any network call. The backend creates an entity when updating
    /// a missing id; use [`CollectionClient::create_or_update`] when the
    /// entity may not exist.
    ///
    /// # Errors
    /// `Validation` if overwrite is requested or the id is missing, otherwise
    /// as for [`CollectionClient::create`].
    #[instrument(skip(self, entity), fields(collection = %self.collection))]
    pub async fn update(&self, entity: &Entity, overwrite: bool) -> Result<Entity> {
        if overwrite {
            return Err(GridSaveError::Validation("Overwrite not supported".to_string()));
        }

        self.events.emit(CollectionEvent::Update { entity: entity.clone(), overwrite });

        let id = entity_id(entity, self.id_property()).ok_or_else(|| {
            GridSaveError::Validation(format!("Object has no '{}' property", self.id_property()))
        })?;

        let token = self.tokens.get_token().await?;
        let request = self
            .request(Method::Put, self.entity_url(&id), &token)
            .json(Value::Object(entity.clone()));
        let response = self.transport.perform(request).await?;

        if !response.is_ok() {
            warn!(%id, status = response.status, "Update rejected");
            return Err(GridSaveError::operation(
                OperationKind::Update,
                format!("Failed to update {id}"),
            ));
        }

        let updated = single_entity(&response, OperationKind::Update)?;

        self.events.emit(CollectionEvent::AfterUpdate(updated.clone()));
        self.events.emit(CollectionEvent::Received(EventPayload::Entity(updated.clone())));
        Ok(updated)
    }

    /// Insert or modify depending on whether the entity exists remotely.
    ///
    /// Without an id the entity is created directly. With an id, one read
    /// decides: found means update, not found means create. A failed read
    /// aborts the whole operation. At most one read and one write are issued.
    ///
    /// # Errors
    /// Whatever the read or the chosen write returns.
    #[instrument(skip(self, entity), fields(collection = %self.collection))]
    pub async fn create_or_update(&self, entity: &Entity) -> Result<Entity> {
        let Some(id) = entity_id(entity, self.id_property()) else {
            return self.create(entity).await;
        };

        match self.read(&id).await? {
            Some(_) => {
                debug!(%id, "Entity exists, updating");
                self.update(entity, false).await
            }
            None => {
                debug!(%id, "Entity absent, creating");
                self.create(entity).await
            }
        }
    }

    /// Apply [`CollectionClient::create_or_update`] to each entity of a
    /// stream, one at a time, yielding results in input order.
    pub fn create_or_update_stream<'a, S>(
        &'a self,
        entities: S,
    ) -> impl Stream<Item = Result<Entity>> + 'a
    where
        S: Stream<Item = Entity> + 'a,
    {
        entities.then(move |entity| async move { self.create_or_update(&entity).await })
    }

    /// Bulk update is not offered by the backend.
    ///
    /// # Errors
    /// Always `Unsupported`, without any network call.
    pub async fn update_many(&self, _query: impl Into<Query>, _changes: &Entity) -> Result<u64> {
        Err(GridSaveError::Unsupported("updateMany unsupported".to_string()))
    }

    /// Delete an entity by id, returning the backend's last representation
    /// of it when one is included in the response.
    ///
    /// # Errors
    /// `Transport`/`Auth`, or `Operation` on a non-200 status.
    #[instrument(skip(self), fields(collection = %self.collection))]
    pub async fn delete(&self, id: &str) -> Result<Option<Entity>> {
        self.events.emit(CollectionEvent::Delete(id.to_string()));

        let token = self.tokens.get_token().await?;
        let request = self.request(Method::Delete, self.entity_url(id), &token);
        let response = self.transport.perform(request).await?;

        if !response.is_ok() {
            warn!(status = response.status, "Delete rejected");
            return Err(GridSaveError::operation(
                OperationKind::Delete,
                format!("Failed to delete {id}"),
            ));
        }

        let deleted = envelope::first_entity(&response.json_body()?)?;

        self.events
            .emit(CollectionEvent::AfterDelete { id: id.to_string(), entity: deleted.clone() });
        self.events.emit(CollectionEvent::Received(deleted.clone().into()));
        Ok(deleted)
    }

    /// Bulk delete is not offered by the backend.
    ///
    /// # Errors
    /// Always `Unsupported`, without any network call.
    pub async fn delete_many(&self, _query: impl Into<Query>) -> Result<u64> {
        Err(GridSaveError::Unsupported("deleteMany unsupported".to_string()))
    }

    /// Run a query against the collection.
    ///
    /// Accepts a raw query-language string or a [`Query`] with limit and
    /// cursor. Only one page is fetched; continue with
    /// [`FindResult::cursor`].
    ///
    /// # Errors
    /// `Transport`/`Auth`, or `Operation` carrying the request URL on a
    /// non-200 status.
    #[instrument(skip(self, query), fields(collection = %self.collection))]
    pub async fn find(&self, query: impl Into<Query>) -> Result<FindResult> {
        let query = query.into();
        self.events.emit(CollectionEvent::Find(query.clone()));

        let token = self.tokens.get_token().await?;
        let url = self.query_url(&query);
        debug!(%url, "Running query");
        let response = self.transport.perform(self.request(Method::Get, url.clone(), &token)).await?;

        if !response.is_ok() {
            warn!(%url, status = response.status, "Query rejected");
            return Err(GridSaveError::operation(OperationKind::Query, format!("Query failed {url}")));
        }

        let body = response.json_body()?;
        let entities = envelope::entities(&body)?;

        self.events.emit(CollectionEvent::Received(EventPayload::Entities(entities.clone())));
        Ok(FindResult { entities, envelope: body })
    }

    /// First entity matching the query, if any. The query's limit is forced
    /// to 1 and its cursor dropped.
    ///
    /// # Errors
    /// As for [`CollectionClient::find`].
    #[instrument(skip(self, query), fields(collection = %self.collection))]
    pub async fn find_one(&self, query: impl Into<Query>) -> Result<Option<Entity>> {
        let query = query.into();
        self.events.emit(CollectionEvent::FindOne(query.clone()));

        let single = Query::new(query.ql).with_limit(1);
        let found = self.find(single).await?.into_entities().into_iter().next();

        self.events.emit(CollectionEvent::Received(found.clone().into()));
        Ok(found)
    }

    /// Approximate number of entities in the whole collection.
    ///
    /// The backend cannot count query results, so `_query` is ignored and
    /// the figure comes from application metadata, which may lag recent
    /// writes.
    ///
    /// # Errors
    /// `Transport`/`Auth`, `Operation` on a non-200 status, `Decode` if the
    /// metadata lacks this collection.
    #[instrument(skip(self, _query), fields(collection = %self.collection))]
    pub async fn count(&self, _query: impl Into<Query>) -> Result<ApproximateCount> {
        self.events.emit(CollectionEvent::Count);

        let token = self.tokens.get_token().await?;
        let request = self.request(Method::Get, self.config.app_url(), &token);
        let response = self.transport.perform(request).await?;

        if !response.is_ok() {
            warn!(status = response.status, "Count rejected");
            return Err(GridSaveError::operation(OperationKind::Count, "Count failed"));
        }

        let count = ApproximateCount::new(envelope::collection_count(
            &response.json_body()?,
            &self.collection,
        )?);

        self.events.emit(CollectionEvent::Received(EventPayload::Count(count)));
        Ok(count)
    }

    fn request(&self, method: Method, url: String, token: &AccessToken) -> TransportRequest {
        TransportRequest::new(method, url, self.config.timeout()).bearer(token)
    }

    fn entity_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn query_url(&self, query: &Query) -> String {
        let mut url = format!("{}?ql={}", self.collection_url, encode_uri_component(&query.ql));
        if let Some(limit) = query.limit.filter(|limit| *limit > 0) {
            url.push_str(&format!("&limit={limit}"));
        }
        if let Some(cursor) = query.cursor.as_deref().filter(|cursor| !cursor.is_empty()) {
            url.push_str(&format!("&cursor={}", encode_uri_component(cursor)));
        }
        url
    }
}

fn single_entity(response: &TransportResponse, kind: OperationKind) -> Result<Entity> {
    envelope::first_entity(&response.json_body()?)?.ok_or_else(|| {
        GridSaveError::Decode(format!("{kind} response contained no entity"))
    })
}

#[cfg(test)]
mod tests {
    use futures::stream;
    use gridsave_common::MockClock;
    use gridsave_domain::ErrorKind;
    use serde_json::json;

    use super::*;
    use crate::testing::MockTransport;

    const TOKEN_URL: &str = "https://localhost/org/app/token";
    const APP_URL: &str = "https://localhost/org/app";
    const COLLECTION_URL: &str = "https://localhost/org/app/test";

    fn entity(value: Value) -> Entity {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture is not an object: {other}"),
        }
    }

    fn envelope_of(entities: Value) -> TransportResponse {
        TransportResponse::json(200, &json!({ "entities": entities }))
    }

    fn setup() -> (Arc<MockTransport>, CollectionClient) {
        let transport = Arc::new(MockTransport::new());
        transport.respond(
            Method::Post,
            TOKEN_URL,
            TransportResponse::json(200, &json!({ "access_token": 12345678 })),
        );
        let config = CollectionConfig::builder("https://localhost", "org", "app").build();
        let client = CollectionClient::new(
            "test",
            config,
            Credentials::client_credentials("client", "such secret, much wow"),
            transport.clone(),
        );
        (transport, client)
    }

    fn drain(rx: &mut broadcast::Receiver<CollectionEvent>) -> Vec<CollectionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn create_returns_server_entity_and_announces_it() {
        let (transport, client) = setup();
        let created = json!({ "uuid": "12345678", "foo": "bar" });
        transport.respond(Method::Post, COLLECTION_URL, envelope_of(json!([created.clone()])));
        let mut rx = client.subscribe();

        let input = entity(json!({ "foo": "bar" }));
        let result = client.create(&input).await.unwrap();

        assert_eq!(Value::Object(result.clone()), created);
        assert_eq!(input, entity(json!({ "foo": "bar" })));

        let events = drain(&mut rx);
        assert_eq!(events[0], CollectionEvent::Create(input));
        assert_eq!(events[1], CollectionEvent::AfterCreate(result.clone()));
        assert_eq!(events[2], CollectionEvent::Received(EventPayload::Entity(result)));

        let requests = transport.requests();
        let request = &requests[1];
        assert_eq!(request.header_value("authorization"), Some("Bearer 12345678"));
        assert_eq!(request.body, crate::transport::RequestBody::Json(json!({ "foo": "bar" })));
    }

    #[tokio::test]
    async fn token_is_fetched_once_across_operations() {
        let (transport, client) = setup();
        transport.respond(Method::Get, format!("{COLLECTION_URL}/1"), envelope_of(json!([{ "uuid": "1" }])));
        transport.respond(Method::Get, format!("{COLLECTION_URL}/2"), TransportResponse::new(500, ""));
        transport.respond(Method::Get, format!("{COLLECTION_URL}/3"), envelope_of(json!([{ "uuid": "3" }])));

        client.read("1").await.unwrap();
        client.read("2").await.unwrap_err();
        client.read("3").await.unwrap();

        assert_eq!(transport.count_to(Method::Post, TOKEN_URL), 1);
    }

    #[tokio::test]
    async fn auth_failure_stops_before_primary_request() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, TOKEN_URL, TransportResponse::new(500, ""));
        let config = CollectionConfig::builder("https://localhost", "org", "app").build();
        let client = CollectionClient::new(
            "test",
            config,
            Credentials::client_credentials("client", "secret"),
            transport.clone(),
        );
        let mut rx = client.subscribe();

        let err = client.create(&entity(json!({ "foo": "bar" }))).await.unwrap_err();

        assert_eq!(err.to_string(), "Authorisation failure, responded with 500");
        assert_eq!(transport.request_count(), 1);
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name(), "create");
    }

    #[tokio::test]
    async fn read_treats_404_as_absent() {
        let (transport, client) = setup();
        transport.respond(Method::Get, format!("{COLLECTION_URL}/missing"), TransportResponse::new(404, ""));

        assert_eq!(client.read("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn read_failure_names_the_id() {
        let (transport, client) = setup();
        transport.respond(Method::Get, format!("{COLLECTION_URL}/12345678"), TransportResponse::new(500, ""));

        let err = client.read("12345678").await.unwrap_err();

        assert_eq!(err.to_string(), "Failed to retrieve 12345678");
        assert_eq!(err.kind(), ErrorKind::Operation(OperationKind::Retrieve));
    }

    #[tokio::test]
    async fn update_refuses_overwrite_without_network() {
        let (transport, client) = setup();

        let err = client.update(&entity(json!({ "uuid": 1 })), true).await.unwrap_err();

        assert_eq!(err, GridSaveError::Validation("Overwrite not supported".into()));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn update_requires_id_without_network() {
        let (transport, client) = setup();

        let err = client.update(&entity(json!({ "foo": "bar" })), false).await.unwrap_err();

        assert_eq!(err.to_string(), "Object has no 'uuid' property");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn update_puts_to_entity_url() {
        let (transport, client) = setup();
        let object = json!({ "uuid": 1, "foo": "bar" });
        transport.respond(Method::Put, format!("{COLLECTION_URL}/1"), envelope_of(json!([object.clone()])));
        let mut rx = client.subscribe();

        let updated = client.update(&entity(object.clone()), false).await.unwrap();

        assert_eq!(updated["foo"], "bar");
        let names: Vec<_> = drain(&mut rx).iter().map(CollectionEvent::name).collect();
        assert_eq!(names, vec!["update", "afterUpdate", "received"]);
    }

    #[tokio::test]
    async fn create_or_update_without_id_only_creates() {
        let (transport, client) = setup();
        transport.respond(Method::Post, COLLECTION_URL, envelope_of(json!([{ "uuid": 3, "foo": "baz" }])));

        let result = client.create_or_update(&entity(json!({ "foo": "baz" }))).await.unwrap();

        assert_eq!(result["uuid"], 3);
        assert_eq!(transport.count(Method::Get), 0);
        assert_eq!(transport.count_to(Method::Post, COLLECTION_URL), 1);
        assert_eq!(transport.count(Method::Put), 0);
    }

    #[tokio::test]
    async fn create_or_update_updates_existing_entity() {
        let (transport, client) = setup();
        let object = json!({ "uuid": 3, "foo": "bar" });
        transport.respond(Method::Get, format!("{COLLECTION_URL}/3"), envelope_of(json!([object.clone()])));
        transport.respond(Method::Put, format!("{COLLECTION_URL}/3"), envelope_of(json!([object.clone()])));

        let result = client.create_or_update(&entity(object)).await.unwrap();

        assert_eq!(result["foo"], "bar");
        assert_eq!(transport.count(Method::Get), 1);
        assert_eq!(transport.count(Method::Put), 1);
        assert_eq!(transport.count_to(Method::Post, COLLECTION_URL), 0);
    }

    #[tokio::test]
    async fn create_or_update_creates_when_id_is_unknown() {
        let (transport, client) = setup();
        transport.respond(Method::Get, format!("{COLLECTION_URL}/7"), TransportResponse::new(404, ""));
        transport.respond(Method::Post, COLLECTION_URL, envelope_of(json!([{ "uuid": "server-7" }])));

        let result = client.create_or_update(&entity(json!({ "uuid": 7, "foo": "bar" }))).await.unwrap();

        assert_eq!(result["uuid"], "server-7");
        assert_eq!(transport.count(Method::Get), 1);
        assert_eq!(transport.count_to(Method::Post, COLLECTION_URL), 1);
        assert_eq!(transport.count(Method::Put), 0);
    }

    #[tokio::test]
    async fn create_or_update_aborts_on_read_failure() {
        let (transport, client) = setup();
        transport.fail(Method::Get, format!("{COLLECTION_URL}/3"), "test");

        let err = client.create_or_update(&entity(json!({ "uuid": 3 }))).await.unwrap_err();

        assert_eq!(err, GridSaveError::Transport("test".into()));
        assert_eq!(transport.count_to(Method::Post, COLLECTION_URL), 0);
        assert_eq!(transport.count(Method::Put), 0);
    }

    #[tokio::test]
    async fn create_or_update_stream_preserves_order() {
        let (transport, client) = setup();
        transport.respond(Method::Post, COLLECTION_URL, envelope_of(json!([{ "uuid": "a" }])));
        transport.respond(Method::Post, COLLECTION_URL, envelope_of(json!([{ "uuid": "b" }])));

        let input = stream::iter(vec![entity(json!({ "n": 1 })), entity(json!({ "n": 2 }))]);
        let results: Vec<_> = client.create_or_update_stream(input).collect().await;

        let ids: Vec<_> = results.into_iter().map(|r| r.unwrap()["uuid"].clone()).collect();
        assert_eq!(ids, vec![json!("a"), json!("b")]);
    }

    #[tokio::test]
    async fn bulk_operations_are_rejected_without_network() {
        let (transport, client) = setup();

        let update = client.update_many("select *", &entity(json!({ "foo": "bar" }))).await.unwrap_err();
        let delete = client.delete_many("select *").await.unwrap_err();

        assert_eq!(update.to_string(), "updateMany unsupported");
        assert_eq!(delete.to_string(), "deleteMany unsupported");
        assert_eq!(update.kind(), ErrorKind::Unsupported);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn delete_announces_id_and_payload() {
        let (transport, client) = setup();
        let gone = json!({ "uuid": "1", "foo": "bar" });
        transport.respond(Method::Delete, format!("{COLLECTION_URL}/1"), envelope_of(json!([gone.clone()])));
        let mut rx = client.subscribe();

        let deleted = client.delete("1").await.unwrap();

        assert_eq!(deleted, Some(entity(gone.clone())));
        let events = drain(&mut rx);
        assert_eq!(events[0], CollectionEvent::Delete("1".into()));
        assert_eq!(
            events[1],
            CollectionEvent::AfterDelete { id: "1".into(), entity: Some(entity(gone)) }
        );
    }

    #[tokio::test]
    async fn delete_failure_names_the_id() {
        let (transport, client) = setup();
        transport.respond(Method::Delete, format!("{COLLECTION_URL}/1"), TransportResponse::new(500, ""));

        assert_eq!(client.delete("1").await.unwrap_err().to_string(), "Failed to delete 1");
    }

    #[tokio::test]
    async fn find_encodes_query_and_paging() {
        let (transport, client) = setup();
        let url = format!("{COLLECTION_URL}?ql=SELECT%20*%20WHERE%20foo%20%3D%20bar&limit=10&cursor=abc");
        transport.respond(
            Method::Get,
            url,
            TransportResponse::json(
                200,
                &json!({ "entities": [{ "foo": "bar" }, { "foo": "bar" }], "cursor": "next" }),
            ),
        );

        let query = Query::new("SELECT * WHERE foo = bar").with_limit(10).with_cursor("abc");
        let result = client.find(query).await.unwrap();

        assert_eq!(result.len(), 2);
        assert!(result.entities.iter().all(|e| e["foo"] == "bar"));
        assert_eq!(result.cursor(), Some("next"));
    }

    #[tokio::test]
    async fn find_failure_reports_url() {
        let (transport, client) = setup();
        transport.respond(
            Method::Get,
            format!("{COLLECTION_URL}?ql=select%20*"),
            TransportResponse::new(400, ""),
        );

        let err = client.find("select *").await.unwrap_err();

        assert_eq!(err.to_string(), format!("Query failed {COLLECTION_URL}?ql=select%20*"));
    }

    #[tokio::test]
    async fn find_one_forces_single_result() {
        let (transport, client) = setup();
        transport.respond(
            Method::Get,
            format!("{COLLECTION_URL}?ql=select%20*&limit=1"),
            envelope_of(json!([{ "foo": "bar" }])),
        );
        let mut rx = client.subscribe();

        let found = client.find_one(Query::new("select *").with_limit(50)).await.unwrap();

        assert_eq!(found.unwrap()["foo"], "bar");
        let names: Vec<_> = drain(&mut rx).iter().map(CollectionEvent::name).collect();
        assert_eq!(names, vec!["findOne", "find", "received", "received"]);
    }

    #[tokio::test]
    async fn find_one_without_match_is_none() {
        let (transport, client) = setup();
        transport.respond(
            Method::Get,
            format!("{COLLECTION_URL}?ql=select%20*&limit=1"),
            envelope_of(json!([])),
        );

        assert_eq!(client.find_one("select *").await.unwrap(), None);
    }

    #[tokio::test]
    async fn count_reads_application_metadata() {
        let (transport, client) = setup();
        transport.respond(
            Method::Get,
            APP_URL,
            envelope_of(json!([{ "metadata": { "collections": { "test": { "count": 2 } } } }])),
        );

        let count = client.count(Query::default()).await.unwrap();

        assert_eq!(count.get(), 2);
    }

    #[tokio::test]
    async fn count_failure_message() {
        let (transport, client) = setup();
        transport.respond(Method::Get, APP_URL, TransportResponse::new(500, ""));

        assert_eq!(client.count("").await.unwrap_err().to_string(), "Count failed");
    }

    #[tokio::test]
    async fn expired_token_is_replaced_transparently() {
        let transport = Arc::new(MockTransport::new());
        transport.respond(Method::Post, TOKEN_URL, TransportResponse::json(200, &json!({ "access_token": "one" })));
        transport.respond(Method::Post, TOKEN_URL, TransportResponse::json(200, &json!({ "access_token": "two" })));
        for _ in 0..2 {
            transport.respond(Method::Get, format!("{COLLECTION_URL}/1"), TransportResponse::new(404, ""));
        }
        let config = CollectionConfig::builder("https://localhost", "org", "app").build();
        let clock = MockClock::new();
        let endpoint = TokenEndpoint::for_config(
            transport.clone(),
            &config,
            Credentials::client_credentials("client", "secret"),
        );
        let tokens = TokenCache::with_clock(Arc::new(endpoint), Arc::new(clock.clone()));
        let client = CollectionClient::with_token_cache("test", config, transport.clone(), tokens);

        client.read("1").await.unwrap();
        clock.advance_secs(3600);
        client.read("1").await.unwrap();

        let requests = transport.requests();
        assert_eq!(transport.count_to(Method::Post, TOKEN_URL), 2);
        assert_eq!(requests[1].header_value("Authorization"), Some("Bearer one"));
        assert_eq!(requests[3].header_value("Authorization"), Some("Bearer two"));
    }
}
