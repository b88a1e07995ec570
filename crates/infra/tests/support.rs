//! Shared fixtures for integration tests against a wiremock backend

#![allow(dead_code)]

use std::net::TcpListener;

use gridsave_core::CollectionClient;
use gridsave_domain::{Entity, GridSaveSettings};
use gridsave_infra::connect;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COLLECTION: &str = "test";
pub const TOKEN: u64 = 12345678;

/// Settings pointing at `host` with the fixture org/app and credentials.
pub fn settings_for(host: &str) -> GridSaveSettings {
    GridSaveSettings {
        host: host.to_string(),
        org: "org".into(),
        app: "app".into(),
        id_property: "uuid".into(),
        timeout_ms: 500,
        grant_type: "client_credentials".into(),
        client_id: "client".into(),
        client_secret: "such secret, much wow".into(),
    }
}

/// Client for the `test` collection on `server`.
pub fn client_for(server: &MockServer) -> CollectionClient {
    connect(COLLECTION, &settings_for(&server.uri())).expect("client should connect")
}

/// Mount a token endpoint that must be hit exactly `times` times.
pub async fn mount_token(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/org/app/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": TOKEN })))
        .expect(times)
        .mount(server)
        .await;
}

/// Response carrying `entities` in the backend envelope.
pub fn envelope(entities: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "entities": entities }))
}

pub fn fixtures() -> Vec<Entity> {
    vec![entity(json!({ "foo": "bar" })), entity(json!({ "foo": "baz" }))]
}

pub fn entity(value: Value) -> Entity {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture is not an object: {other}"),
    }
}

/// Base URL on which nothing is listening.
pub fn closed_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
