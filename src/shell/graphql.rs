use async_graphql::{EmptySubscription, MergedObject, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension,
    http::{HeaderMap, header},
    response::Html,
};

use crate::modules::attendance::adapters::inbound::graphql::{
    AttendanceMutation, AttendanceQuery,
};
use crate::modules::dashboard::adapters::inbound::http::session_token;
use crate::modules::session::adapters::inbound::graphql::{
    SessionMutation, SessionQuery, ViewerToken,
};
pub use crate::shell::state::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AttendanceQuery, SessionQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AttendanceMutation, SessionMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(state)
    .finish()
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub async fn graphql(
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let token = bearer_token(&headers).or_else(|| session_token(&headers));
    schema
        .execute(req.into_inner().data(ViewerToken(token)))
        .await
        .into()
}

pub async fn graphiql() -> Html<String> {
    use async_graphql::http::GraphiQLSource;
    Html(GraphiQLSource::build().endpoint("/gql").finish())
}
