mod handlers;
pub mod middleware;

use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::DashboardConfig;
use crate::dashboard::Dashboard;
use middleware::SecurityConfig;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
    pub config: DashboardConfig,
}

pub fn create_router(dashboard: Dashboard, config: DashboardConfig) -> Router {
    let security = SecurityConfig::from_config(&config);
    create_router_with_security(dashboard, config, security)
}

pub fn create_router_with_security(
    dashboard: Dashboard,
    config: DashboardConfig,
    security: SecurityConfig,
) -> Router {
    let api = Router::new()
        // Calendar
        .route("/week", get(handlers::current_week))
        // Milestones
        .route("/milestones/import", post(handlers::import_milestones))
        .route("/quarters/{quarter}/milestones", get(handlers::list_milestones))
        .route(
            "/quarters/{quarter}/categories/{category}/milestones",
            post(handlers::create_milestone),
        )
        .route(
            "/quarters/{quarter}/categories/{category}/milestones/{id}",
            put(handlers::update_milestone),
        )
        // Quarterly resourcing
        .route("/quarters/{quarter}/resourcing", get(handlers::get_quarter_resourcing))
        .route(
            "/quarters/{quarter}/resourcing/recompute",
            post(handlers::recompute_quarter_resourcing),
        )
        // Weekly plans
        .route("/quarters/{quarter}/weeks/{week}/tasks", get(handlers::list_weekly_tasks))
        .route(
            "/quarters/{quarter}/weeks/{week}/categories/{category}/tasks",
            post(handlers::create_weekly_task),
        )
        .route(
            "/quarters/{quarter}/weeks/{week}/resourcing",
            get(handlers::get_weekly_resourcing),
        )
        // Daily logs
        .route("/daily", get(handlers::get_daily_board))
        .route("/daily/{date}/{person}", put(handlers::set_daily_update))
        // History
        .route("/history/weeks", get(handlers::get_week_history))
        .route("/history/{quarter}", get(handlers::get_quarter_history))
        .layer(axum::middleware::from_fn_with_state(
            security.clone(),
            middleware::auth_middleware,
        ))
        // Health stays reachable without a token
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&security))
        .with_state(AppState { dashboard, config })
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    match &security.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
        None => CorsLayer::permissive(),
    }
}
