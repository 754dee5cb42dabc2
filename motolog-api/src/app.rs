/// Application state and router configuration
///
/// This module wires together the HTTP surface of the MotoLog API:
/// the shared application state, the per-resource route trees, the
/// JWT authentication middleware, and the outer middleware stack
/// (security headers, CORS, compression, tracing, rate limiting).

use crate::config::Config;
use crate::error::ApiError;
use crate::middleware::rate_limit::{rate_limit_layer, RateLimiter};
use crate::middleware::security::SecurityHeadersLayer;
use crate::routes;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post, put},
    Router,
};
use motolog_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Per-client request rate limiter
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit.max_requests,
            config.rate_limit.window_secs,
        ));

        Self {
            db,
            config: Arc::new(config),
            rate_limiter,
        }
    }

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete application router
///
/// # Routes
///
/// - `/health`: public health check
/// - `/api/auth`: registration, login, profile, password change
/// - `/api/vehicles`: vehicle CRUD, stats, renewals, odometer
/// - `/api/fuel`: fuel entries and per-vehicle statistics
/// - `/api/insurance`, `/api/puc`, `/api/services`: compliance records
/// - `/api/notifications`: reminder notifications
/// - `/api/dashboard`: aggregate views
///
/// Everything under `/api` passes the rate limiter; everything except
/// register and login requires a valid bearer token.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_public = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let auth_protected = Router::new()
        .route(
            "/profile",
            get(routes::auth::get_profile).put(routes::auth::update_profile),
        )
        .route("/change-password", put(routes::auth::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let auth_routes = auth_public.merge(auth_protected);

    let vehicle_routes = Router::new()
        .route(
            "/",
            post(routes::vehicles::create_vehicle).get(routes::vehicles::list_vehicles),
        )
        .route("/stats", get(routes::vehicles::vehicle_stats))
        .route("/renewals", get(routes::vehicles::upcoming_renewals))
        .route(
            "/:id",
            get(routes::vehicles::get_vehicle)
                .put(routes::vehicles::update_vehicle)
                .delete(routes::vehicles::delete_vehicle),
        )
        .route("/:id/odometer", patch(routes::vehicles::update_odometer))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let fuel_routes = Router::new()
        .route("/", post(routes::fuel::create_fuel_entry))
        .route("/recent", get(routes::fuel::recent_entries))
        .route("/vehicle/:vehicle_id", get(routes::fuel::list_entries))
        .route(
            "/vehicle/:vehicle_id/stats/monthly",
            get(routes::fuel::monthly_stats),
        )
        .route(
            "/vehicle/:vehicle_id/stats/mileage",
            get(routes::fuel::mileage_stats),
        )
        .route(
            "/vehicle/:vehicle_id/stats/expense",
            get(routes::fuel::expense_stats),
        )
        .route(
            "/:id",
            get(routes::fuel::get_fuel_entry)
                .put(routes::fuel::update_fuel_entry)
                .delete(routes::fuel::delete_fuel_entry),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let insurance_routes = Router::new()
        .route("/", post(routes::insurance::create_insurance))
        .route("/vehicle/:vehicle_id", get(routes::insurance::list_insurance))
        .route(
            "/:id",
            put(routes::insurance::update_insurance)
                .delete(routes::insurance::delete_insurance),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let puc_routes = Router::new()
        .route("/", post(routes::puc::create_puc))
        .route("/vehicle/:vehicle_id", get(routes::puc::list_puc))
        .route(
            "/:id",
            put(routes::puc::update_puc).delete(routes::puc::delete_puc),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let service_routes = Router::new()
        .route("/", post(routes::services::create_service_record))
        .route(
            "/vehicle/:vehicle_id",
            get(routes::services::list_service_records),
        )
        .route(
            "/:id",
            put(routes::services::update_service_record)
                .delete(routes::services::delete_service_record),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route(
            "/:id/read",
            put(routes::notifications::mark_notification_read),
        )
        .route("/:id", delete(routes::notifications::delete_notification))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let dashboard_routes = Router::new()
        .route("/overview", get(routes::dashboard::overview))
        .route("/mileage-stats", get(routes::dashboard::mileage_stats))
        .route("/expense-trends", get(routes::dashboard::expense_trends))
        .route(
            "/service-reminders",
            get(routes::dashboard::service_reminders),
        )
        .route("/vehicle-health", get(routes::dashboard::vehicle_health))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/vehicles", vehicle_routes)
        .nest("/fuel", fuel_routes)
        .nest("/insurance", insurance_routes)
        .nest("/puc", puc_routes)
        .nest("/services", service_routes)
        .nest("/notifications", notification_routes)
        .nest("/dashboard", dashboard_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            rate_limit_layer,
        ));

    // CORS configuration. A wildcard origin cannot be combined with
    // credentials, so the permissive branch leaves them off.
    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(Duration::from_secs(3600))
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware
///
/// Validates the `Authorization: Bearer <token>` header and injects an
/// [`AuthContext`] into request extensions for downstream handlers.
///
/// # Errors
///
/// - 401 Unauthorized: missing header, invalid or expired token
/// - 400 Bad Request: malformed authorization header
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;
    let auth_context = AuthContext::from_claims(&claims);

    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}
