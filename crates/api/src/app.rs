use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, security_headers_middleware,
    trace_id, RateLimiterState,
};
use crate::routes::{attendees, audit_logs, check_ins, health, portals};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled
    let rate_limiter = if config.security.checkin_rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.checkin_rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // The public admission endpoint is the only unauthenticated write path
    // and gets its own per-client rate limit.
    let admission_routes = Router::new()
        .route("/api/v1/check-ins", post(check_ins::create_check_in))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // Public routes (no organizer identity required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route(
            "/api/v1/portals/by-slug/:slug",
            get(portals::get_portal_by_slug),
        )
        .route("/api/v1/attendees", post(attendees::register_attendee));

    // Organizer routes (identity supplied via the X-Organizer-Id header,
    // enforced by the OrganizerId extractor in each handler)
    let organizer_routes = Router::new()
        .route(
            "/api/v1/portals",
            post(portals::create_portal).get(portals::list_portals),
        )
        .route(
            "/api/v1/portals/:portal_id",
            get(portals::get_portal)
                .patch(portals::update_portal)
                .delete(portals::delete_portal),
        )
        .route(
            "/api/v1/portals/:portal_id/check-ins",
            get(check_ins::list_portal_check_ins),
        )
        .route(
            "/api/v1/attendees/by-email",
            get(attendees::find_attendee_by_email),
        )
        .route("/api/v1/audit-logs", get(audit_logs::list_audit_logs));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(admission_routes)
        .merge(organizer_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
