use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::config::upload::UploadConfig;
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{extract::DefaultBodyLimit, middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes(upload_config: &UploadConfig) -> Router {
    Router::new().nest("/api/v1", api_routes(upload_config))
}

fn api_routes(upload_config: &UploadConfig) -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public_read = public_read_routes(&rate_limit_config);
    let protected = protected_routes(&rate_limit_config, upload_config)
        .layer(middleware::from_fn(auth_middleware));

    auth.merge(public_read).merge(protected)
}

/// Auth routes: signup and login.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/signup", routing::post(handlers::signup))
        .route("/auth/login", routing::post(handlers::login));

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Public read routes: item listing and detail.
fn public_read_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/items", routing::get(handlers::item::list_items))
        .route("/items/{id}", routing::get(handlers::item::get_item));

    with_optional_rate_limit(router, config.enabled, config.public_read)
}

/// Protected routes: everything gated on a session. The upload config must
/// be the same instance the item handler receives via Extension, so the
/// body limit and the handler's size check agree.
fn protected_routes(config: &RateLimitConfig, upload_config: &UploadConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::get_current_user))
        .route("/auth/logout", routing::post(handlers::logout))
        // Items (the report form carries an image, so the multipart route
        // gets a body limit matching the upload cap)
        .route(
            "/items",
            routing::post(handlers::item::create_item)
                .layer(DefaultBodyLimit::max(upload_config.max_size + 64 * 1024)),
        )
        .route(
            "/items/{id}/claim",
            routing::post(handlers::item::claim_item),
        )
        // Comments
        .route(
            "/items/{id}/comments",
            routing::post(handlers::comment::create_comment),
        )
        // Conversations
        .route(
            "/conversations",
            routing::get(handlers::conversation::inbox),
        )
        .route(
            "/conversations/{username}",
            routing::get(handlers::conversation::get_thread)
                .post(handlers::conversation::send_message),
        )
        // Admin
        .route(
            "/admin/claims",
            routing::get(handlers::admin::list_routed_claims),
        );

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
