use std::sync::Arc;

use axum::{
    Router,
    extract::{FromRef, Query, State, rejection::QueryRejection},
    http::{HeaderName, Uri},
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Token decoding and identity.
pub mod role;
pub mod session;
pub mod token;

// Guard pipeline.
pub mod completion;
pub mod guard;
pub mod navigation;

// Backend boundary.
pub mod api_client;
pub mod profile;

pub mod config;
pub mod pages;
pub mod routes;
pub mod views;

// --- Public Re-exports ---

pub use api_client::{HttpProfileService, MockProfileService, ProfileState};
pub use config::AppConfig;
pub use routes::{RouteTable, route_table};
pub use session::Session;

/// ApiDoc
///
/// OpenAPI document for the JSON surface, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(pages::get_navigation),
    components(schemas(navigation::Navigation, routes::Page, role::Role)),
    tags(
        (name = "skillbridge-web", description = "SkillBridge page gateway")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable state handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Backend profile lookups (HTTP in production, mock in tests).
    pub profiles: ProfileState,
    pub config: AppConfig,
    /// Path → guard mapping, consulted by the JSON navigation endpoint.
    pub routes: Arc<RouteTable>,
}

impl AppState {
    pub fn new(profiles: ProfileState, config: AppConfig) -> Self {
        Self {
            profiles,
            config,
            routes: Arc::new(route_table()),
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for ProfileState {
    fn from_ref(app_state: &AppState) -> ProfileState {
        app_state.profiles.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// page_routes
///
/// Registers a `GET` handler for every entry of the route table. Each handler
/// carries its own `RouteSpec`, so the table stays the only source of guards.
fn page_routes(table: &RouteTable) -> Router<AppState> {
    table.iter().fold(Router::new(), |router, spec| {
        let spec = spec.clone();
        router.route(
            spec.path,
            get(
                move |State(state): State<AppState>,
                      session: Session,
                      uri: Uri,
                      query: Result<Query<pages::PageQuery>, QueryRejection>| {
                    let spec = spec.clone();
                    let query = query.map(|Query(query)| query).unwrap_or_default();
                    async move { pages::serve_page(state, session, spec, uri, query).await }
                },
            ),
        )
    })
}

/// create_router
///
/// Assembles pages, the JSON API, documentation and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(|| async { "ok" }))
        .route("/api/navigation", get(pages::get_navigation))
        .merge(page_routes(&state.routes))
        .fallback(pages::not_found)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span per request, correlated by the `x-request-id` header.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
