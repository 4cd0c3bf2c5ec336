use async_graphql::{Context, Object, Result as GqlResult};

use crate::modules::session::core::session::{Credentials, Session};
use crate::shell::state::AppState;

/// Session token of the GraphQL caller, taken from the bearer header or the
/// session cookie. Attached to every request by the shell.
#[derive(Debug, Clone, Default)]
pub struct ViewerToken(pub Option<String>);

#[derive(async_graphql::SimpleObject, Clone)]
pub struct GqlSession {
    pub session_id: String,
    pub user_id: String,
    pub display_label: String,
    pub signed_in_at: i64,
}

impl From<Session> for GqlSession {
    fn from(s: Session) -> Self {
        Self {
            session_id: s.session_id,
            user_id: s.user_id,
            display_label: s.display_label,
            signed_in_at: s.signed_in_at,
        }
    }
}

fn token<'a>(context: &'a Context<'_>) -> Option<&'a str> {
    context
        .data_opt::<ViewerToken>()
        .and_then(|token| token.0.as_deref())
}

pub async fn viewer_session(context: &Context<'_>) -> GqlResult<Option<Session>> {
    let state = context.data_unchecked::<AppState>();
    state
        .context
        .identity
        .current_session(token(context))
        .await
        .map_err(|e| async_graphql::Error::new(e.to_string()))
}

/// Like `viewer_session` but anonymous callers are an error.
pub async fn require_session(context: &Context<'_>) -> GqlResult<Session> {
    viewer_session(context)
        .await?
        .ok_or_else(|| async_graphql::Error::new("not signed in"))
}

#[derive(Default)]
pub struct SessionQuery;

#[Object]
impl SessionQuery {
    async fn me(&self, context: &Context<'_>) -> GqlResult<Option<GqlSession>> {
        Ok(viewer_session(context).await?.map(Into::into))
    }
}

#[derive(Default)]
pub struct SessionMutation;

#[Object]
impl SessionMutation {
    async fn sign_in(
        &self,
        context: &Context<'_>,
        email: String,
        password: String,
    ) -> GqlResult<GqlSession> {
        let state = context.data_unchecked::<AppState>();
        let session = state
            .context
            .identity
            .sign_in(&Credentials::new(email, password))
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(session.into())
    }

    async fn sign_out(&self, context: &Context<'_>) -> GqlResult<bool> {
        let state = context.data_unchecked::<AppState>();
        let Some(session) = viewer_session(context).await? else {
            return Ok(false);
        };
        state
            .viewers
            .sign_out(&session.session_id)
            .await
            .map_err(|e| async_graphql::Error::new(e.to_string()))?;
        Ok(true)
    }
}
