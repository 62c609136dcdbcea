//! # REST API HTTP Server
//!
//! Axum router exposing the catalog's collections.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, RawQuery, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};

use crate::config::ServerConfig;
use crate::executor;
use crate::query::{ProjectionSpec, QueryError, QuerySpec, RawParameters};
use crate::store::Collection;

use super::catalog::Catalog;
use super::context::{stamp_request, RequestContext};
use super::errors::{ApiError, ApiResult};
use super::response::{GroupEnvelope, ListEnvelope, SingleEnvelope};

/// Shared state type
type SharedCatalog = Arc<Catalog>;

/// HTTP server over a loaded catalog
pub struct ApiServer {
    config: ServerConfig,
    router: Router,
}

impl ApiServer {
    pub fn new(catalog: Catalog, config: ServerConfig) -> Self {
        let router = build_router(Arc::new(catalog), &config);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.config.socket_addr()).await?;
        info!(
            addr = %listener.local_addr()?,
            api_prefix = %self.config.api_prefix,
            "slimedex listening"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

/// Build the full router: health, collection routes under the API prefix,
/// catch-all 404, request stamping, tracing and CORS
pub fn build_router(catalog: SharedCatalog, config: &ServerConfig) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let prefix = config.api_prefix.trim_end_matches('/');
    let router = Router::new().route("/health", get(health_handler));
    let router = if prefix.is_empty() {
        router.merge(collection_routes())
    } else {
        router.nest(prefix, collection_routes())
    };

    router
        .fallback(fallback_handler)
        .layer(middleware::from_fn(stamp_request))
        .layer(trace)
        .layer(cors)
        .with_state(catalog)
}

fn collection_routes() -> Router<SharedCatalog> {
    Router::new()
        .route("/:collection", get(list_handler))
        .route("/:collection/:id", get(get_handler))
        .route("/:collection/by/:field/:value", get(list_by_handler))
        .route("/:collection/group/:field", get(group_handler))
}

/// Translate parameters, run the query and wrap the page.
///
/// Shared by the HTTP handlers and the `query` command.
pub async fn list_records(
    collection: &dyn Collection,
    params: &RawParameters,
    context: &RequestContext,
) -> ApiResult<ListEnvelope> {
    let spec = QuerySpec::from_params(params, collection.policy()).inspect_err(|err| {
        debug!(collection = collection.name(), error = %err, "query rejected");
    })?;

    let output = executor::run(collection, &spec).await?;
    Ok(ListEnvelope::new(context, output))
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

/// List records handler
async fn list_handler(
    State(catalog): State<SharedCatalog>,
    Extension(context): Extension<RequestContext>,
    Path(name): Path<String>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<ListEnvelope>> {
    let collection = catalog.get(&name)?;
    let params = RawParameters::parse(query.as_deref().unwrap_or_default());

    let envelope = list_records(collection.as_ref(), &params, &context).await?;
    Ok(Json(envelope))
}

/// List records with a route-supplied equality predicate.
///
/// The query string wins when it already names the field.
async fn list_by_handler(
    State(catalog): State<SharedCatalog>,
    Extension(context): Extension<RequestContext>,
    Path((name, field, value)): Path<(String, String, String)>,
    RawQuery(query): RawQuery,
) -> ApiResult<Json<ListEnvelope>> {
    let collection = catalog.get(&name)?;
    let params = RawParameters::parse(query.as_deref().unwrap_or_default());
    let params = if params.mentions_field(&field) {
        params
    } else {
        params.with(field, value)
    };

    let envelope = list_records(collection.as_ref(), &params, &context).await?;
    Ok(Json(envelope))
}

/// Get single record handler
async fn get_handler(
    State(catalog): State<SharedCatalog>,
    Extension(context): Extension<RequestContext>,
    Path((name, id)): Path<(String, String)>,
) -> ApiResult<Json<SingleEnvelope>> {
    let collection = catalog.get(&name)?;
    let record = collection
        .find_by_id(&id)
        .await?
        .ok_or(QueryError::NotFound)?;

    let hidden = ProjectionSpec::exclude(collection.policy().hidden_fields.clone());
    Ok(Json(SingleEnvelope::new(&context, hidden.apply(&record))))
}

/// Group records handler
async fn group_handler(
    State(catalog): State<SharedCatalog>,
    Extension(context): Extension<RequestContext>,
    Path((name, field)): Path<(String, String)>,
) -> ApiResult<Json<GroupEnvelope>> {
    let collection = catalog.get(&name)?;
    let groups = executor::group_by(collection.as_ref(), &field).await?;
    Ok(Json(GroupEnvelope::new(&context, groups)))
}

async fn fallback_handler(OriginalUri(uri): OriginalUri) -> ApiError {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |path_and_query| path_and_query.as_str());
    ApiError::RouteNotFound(target.to_string())
}
