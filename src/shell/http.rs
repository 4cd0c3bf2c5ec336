use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::modules::dashboard::adapters::inbound::http as dashboard_http;
use crate::shell::graphql::{build_schema, graphiql, graphql};
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    let schema = build_schema(state.clone());
    Router::new()
        .route("/", get(dashboard_http::index))
        .route("/login", post(dashboard_http::login))
        .route("/logout", post(dashboard_http::logout))
        .route("/records", post(dashboard_http::submit))
        .route("/records/table", get(dashboard_http::table))
        .route(
            "/records/clear",
            get(dashboard_http::confirm_clear).post(dashboard_http::clear),
        )
        .route(
            "/records/{id}/delete",
            get(dashboard_http::confirm_delete).post(dashboard_http::delete),
        )
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
