//! API Routes

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context;
use crate::gateway;
use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Account routes behind the ownership/block gateway. The gated routes
    // identify the caller by the documentNumber query parameter.
    let gated = Router::new()
        .route("/:id", get(handlers::recover_account))
        .route("/deposit/:id", put(handlers::deposit))
        .route("/withdrawal/:id", put(handlers::withdrawal))
        .route("/block/:id", put(handlers::block))
        .route("/statement/:id", get(handlers::statement))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            gateway::account_access,
        ));

    Router::new()
        // Open routes
        .route("/healthcheck", get(handlers::healthcheck))
        .route("/create-owner", post(handlers::create_owner))
        .route(
            "/recover-owner/:document_number",
            get(handlers::recover_owner),
        )
        .route("/", post(handlers::create_account))
        .merge(gated)
        // Middleware
        .layer(middleware::from_fn(context::correlation_id))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
