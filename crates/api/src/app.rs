use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{FeatureGate, PeriodService, PointsService, RankingService};
use persistence::Stores;
use shared::jwt::{JwtError, TokenKeys};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_gamification, require_user_auth, trace_id,
};
use crate::routes::{feature_settings, gamification, health};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub stores: Stores,
    pub token_keys: Arc<TokenKeys>,
    pub features: FeatureGate,
    pub periods: PeriodService,
    pub ranking: RankingService,
    pub points: PointsService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Result<Self, JwtError> {
        let token_keys = Arc::new(config.jwt.token_keys()?);

        let features = FeatureGate::new(stores.features.clone());
        let periods = PeriodService::new(stores.periods.clone());
        let ranking = RankingService::new(
            stores.ledger.clone(),
            periods.clone(),
            config.gamification.ranking_limit,
        );
        let points = PointsService::new(
            stores.ledger.clone(),
            stores.users.clone(),
            periods.clone(),
            ranking.clone(),
        );

        Ok(Self {
            config: Arc::new(config),
            stores,
            token_keys,
            features,
            periods,
            ranking,
            points,
        })
    }
}

pub fn create_app(config: Config, stores: Stores) -> Result<Router, JwtError> {
    let state = AppState::new(config, stores)?;
    let config = state.config.clone();

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
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

    // Checks are public; the update handler requires an administrator itself
    let feature_routes = Router::new()
        .route(
            "/api/feature-settings",
            get(feature_settings::list_feature_settings),
        )
        .route(
            "/api/feature-settings/header",
            get(feature_settings::header_navigation),
        )
        .route(
            "/api/feature-settings/check/:name",
            get(feature_settings::check_feature),
        )
        .route(
            "/api/feature-settings/:name",
            put(feature_settings::update_feature_setting),
        );

    // Feature guard runs first (outermost layer), then token verification
    let gamification_routes = Router::new()
        .route("/api/gamification/ranking", get(gamification::get_ranking))
        .route("/api/gamification/periods", get(gamification::get_periods))
        .route(
            "/api/gamification/periods/:period",
            put(gamification::update_period),
        )
        .route("/api/gamification/points", post(gamification::award_points))
        .route("/api/gamification/points/me", get(gamification::my_ledger))
        .route(
            "/api/gamification/points/me/summary",
            get(gamification::my_summary),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_gamification,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Ok(Router::new()
        .merge(public_routes)
        .merge(feature_routes)
        .merge(gamification_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state))
}
