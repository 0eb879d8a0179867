// server.rs - Router assembly
//
// Public routes first, then the protected /api/* tiers behind the JWT
// middleware, then the global layers (body limit, CORS, tracing).

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the complete application router over `state`.
pub fn app(state: AppState) -> Router {
    let protected_routes = Router::new()
        .merge(client_routes())
        .merge(project_routes())
        .merge(reminder_routes())
        .merge(dashboard_routes())
        // route_layer so unmatched paths still answer 404, not 401
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config))
                .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes)),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/signup", post(auth::signup_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn client_routes() -> Router<AppState> {
    use protected::clients;

    Router::new()
        .route("/api/clients", get(clients::clients_get).post(clients::clients_post))
        .route(
            "/api/clients/:id",
            get(clients::client_get)
                .patch(clients::client_patch)
                .delete(clients::client_delete),
        )
}

fn project_routes() -> Router<AppState> {
    use protected::projects;

    Router::new()
        .route("/api/projects", get(projects::projects_get).post(projects::projects_post))
        .route("/api/projects/client/:client_id", get(projects::projects_by_client_get))
        .route(
            "/api/projects/:id",
            get(projects::project_get)
                .patch(projects::project_patch)
                .delete(projects::project_delete),
        )
}

fn reminder_routes() -> Router<AppState> {
    use protected::reminders;

    Router::new()
        .route("/api/reminders", get(reminders::reminders_get).post(reminders::reminders_post))
        // Static segments win over `:id` in axum's matcher
        .route("/api/reminders/due", get(reminders::reminders_due_get))
        .route("/api/reminders/toggle/:id", post(reminders::reminder_toggle_post))
        .route(
            "/api/reminders/:id",
            get(reminders::reminder_get)
                .patch(reminders::reminder_patch)
                .delete(reminders::reminder_delete),
        )
}

fn dashboard_routes() -> Router<AppState> {
    use protected::dashboard;

    Router::new().route("/api/dashboard", get(dashboard::dashboard_get))
}

/// Permissive in development or without configured origins; otherwise an allow-list.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment == Environment::Development || config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
