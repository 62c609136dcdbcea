//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use slimedex::config::ServerConfig;
use slimedex::query::{FieldDef, FieldMap, FieldType, QueryPolicy, UnknownFieldPolicy};
use slimedex::rest_api::{build_router, Catalog};
use slimedex::store::InMemoryCollection;

/// The bundled sample catalog
pub fn slime_records() -> Vec<Value> {
    serde_json::from_str(include_str!("../../data/slimes.json")).unwrap()
}

/// Policy matching the bundled `slimedex.json`
pub fn slime_policy() -> QueryPolicy {
    let mut fields = FieldMap::new();
    for name in [
        "id",
        "name",
        "diet",
        "favouriteToy",
        "favouriteFood",
        "type",
        "slimepedia.risks",
    ] {
        fields.insert(name.to_string(), FieldDef::Typed(FieldType::String));
    }
    fields.insert(
        "locations".to_string(),
        FieldDef::Typed(FieldType::StringArray),
    );
    fields.insert("games".to_string(), FieldDef::Typed(FieldType::NumberArray));

    QueryPolicy {
        fields,
        unknown_fields: UnknownFieldPolicy::Reject,
        ..Default::default()
    }
}

pub fn slimes() -> InMemoryCollection {
    InMemoryCollection::new("slimes", slime_policy(), slime_records()).unwrap()
}

pub fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(Arc::new(slimes()));
    catalog
}

pub fn app() -> Router {
    build_router(Arc::new(catalog()), &ServerConfig::default())
}

/// Identity values of a record list, in order
pub fn ids(records: &[Value]) -> Vec<String> {
    records
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

/// Issue a GET against the router and decode the JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
