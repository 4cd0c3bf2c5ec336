use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::modules::attendance::adapters::outbound::record_store::StoreError;
use crate::modules::dashboard::adapters::inbound::html;
use crate::modules::dashboard::core::view::{Confirmation, Flash};
use crate::modules::dashboard::use_cases::dashboard::{Dashboard, DashboardError};
use crate::modules::session::adapters::outbound::identity::AuthError;
use crate::modules::session::core::session::Credentials;
use crate::shell::state::AppState;

pub const SESSION_COOKIE: &str = "attendance_session";
pub const REVISION_HEADER: &str = "x-revision";

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct SubmitBody {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize)]
pub struct ConfirmBody {
    #[serde(default)]
    pub confirmed: Option<String>,
}

impl ConfirmBody {
    fn confirmation(&self) -> Confirmation {
        Confirmation::from(self.confirmed.as_deref() == Some("true"))
    }
}

#[derive(Deserialize)]
pub struct TableParams {
    #[serde(default)]
    pub after: u64,
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax")
}

fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn auth_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn dashboard_status(error: &DashboardError) -> StatusCode {
    match error {
        DashboardError::Validation(_) | DashboardError::Store(StoreError::Validation(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DashboardError::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        DashboardError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        DashboardError::Auth(e) => auth_status(e),
        DashboardError::SignedOut => StatusCode::UNAUTHORIZED,
    }
}

fn landing(status: StatusCode, flash: Option<&Flash>) -> Response {
    (status, Html(html::landing_page(flash))).into_response()
}

fn dashboard_response(state: &AppState, dashboard: &Dashboard, status: StatusCode) -> Response {
    let flash = dashboard.take_flash();
    let view = dashboard.view();
    (
        status,
        Html(html::dashboard_page(
            &view,
            flash.as_ref(),
            &state.context.renderer,
        )),
    )
        .into_response()
}

fn with_cookie(cookie: String, response: impl IntoResponse) -> Response {
    match HeaderValue::from_str(&cookie) {
        Ok(value) => ([(header::SET_COOKIE, value)], response).into_response(),
        Err(_) => response.into_response(),
    }
}

/// Resolve the viewer behind the cookie. `Err` carries the response to send
/// when the identity service cannot be reached.
async fn viewer(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(Option<String>, Option<Arc<Dashboard>>), Response> {
    let token = session_token(headers);
    match state.viewers.resolve(token.as_deref()).await {
        Ok(dashboard) => Ok((token, dashboard)),
        Err(e) => Err(landing(
            auth_status(&e),
            Some(&Flash::Error(format!("Error checking session: {e}"))),
        )),
    }
}

pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let (token, dashboard) = match viewer(&state, &headers).await {
        Ok(found) => found,
        Err(response) => return response,
    };
    let Some(dashboard) = dashboard else {
        return landing(StatusCode::OK, None);
    };
    dashboard.reload().await;
    dashboard.settled().await;
    let response = dashboard_response(&state, &dashboard, StatusCode::OK);
    match dashboard.gate().current_session() {
        Some(session) if token.as_deref() != Some(session.session_id.as_str()) => {
            with_cookie(session_cookie(&session.session_id), response)
        }
        _ => response,
    }
}

pub async fn login(State(state): State<AppState>, Form(body): Form<LoginBody>) -> Response {
    let credentials = Credentials::new(body.email, body.password);
    match state.viewers.sign_in(&credentials).await {
        Ok((session, _)) => with_cookie(session_cookie(&session.session_id), Redirect::to("/")),
        Err(e) => landing(
            auth_status(&e),
            Some(&Flash::Error(format!("Error signing in: {e}"))),
        ),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(token) = session_token(&headers) else {
        return Redirect::to("/").into_response();
    };
    match state.viewers.sign_out(&token).await {
        Ok(()) => with_cookie(expired_session_cookie(), Redirect::to("/")),
        Err(e) => match state.viewers.resolve(Some(&token)).await {
            Ok(Some(dashboard)) => dashboard_response(&state, &dashboard, dashboard_status(&e)),
            _ => landing(
                dashboard_status(&e),
                Some(&Flash::Error(format!("Error signing out: {e}"))),
            ),
        },
    }
}

pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(body): Form<SubmitBody>,
) -> Response {
    let dashboard = match viewer(&state, &headers).await {
        Ok((_, Some(dashboard))) => dashboard,
        Ok((_, None)) => return Redirect::to("/").into_response(),
        Err(response) => return response,
    };
    dashboard.settled().await;
    match dashboard.submit(&body.name).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => dashboard_response(&state, &dashboard, dashboard_status(&e)),
    }
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(record_id): Path<String>,
) -> Response {
    match viewer(&state, &headers).await {
        Ok((_, Some(_))) => Html(html::confirm_page(
            "Are you sure you want to delete this record?",
            &format!("/records/{record_id}/delete"),
        ))
        .into_response(),
        Ok((_, None)) => Redirect::to("/").into_response(),
        Err(response) => response,
    }
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(record_id): Path<String>,
    Form(body): Form<ConfirmBody>,
) -> Response {
    let dashboard = match viewer(&state, &headers).await {
        Ok((_, Some(dashboard))) => dashboard,
        Ok((_, None)) => return Redirect::to("/").into_response(),
        Err(response) => return response,
    };
    match dashboard
        .delete_record(&record_id, body.confirmation())
        .await
    {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => dashboard_response(&state, &dashboard, dashboard_status(&e)),
    }
}

pub async fn confirm_clear(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match viewer(&state, &headers).await {
        Ok((_, Some(_))) => Html(html::confirm_page(
            "Are you sure you want to clear all attendance records?",
            "/records/clear",
        ))
        .into_response(),
        Ok((_, None)) => Redirect::to("/").into_response(),
        Err(response) => response,
    }
}

pub async fn clear(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(body): Form<ConfirmBody>,
) -> Response {
    let dashboard = match viewer(&state, &headers).await {
        Ok((_, Some(dashboard))) => dashboard,
        Ok((_, None)) => return Redirect::to("/").into_response(),
        Err(response) => return response,
    };
    match dashboard.clear_records(body.confirmation()).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => dashboard_response(&state, &dashboard, dashboard_status(&e)),
    }
}

/// Long poll for the table body. Answers once the view is newer than `after`
/// or when the poll timeout elapses.
pub async fn table(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TableParams>,
) -> Response {
    let dashboard = match viewer(&state, &headers).await {
        Ok((_, Some(dashboard))) => dashboard,
        Ok((_, None)) => return StatusCode::UNAUTHORIZED.into_response(),
        Err(response) => return response,
    };
    dashboard.reload().await;
    let view = dashboard
        .wait_for_revision(params.after, state.poll_timeout)
        .await;
    if !view.is_dashboard() {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    (
        [(
            header::HeaderName::from_static(REVISION_HEADER),
            HeaderValue::from(view.revision),
        )],
        Html(state.context.renderer.body_html(&view.table)),
    )
        .into_response()
}
