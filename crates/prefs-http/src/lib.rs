// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HTTP front end for the display preferences panel.
//!
//! `GET` renders the form, `POST` submits it. The caller's identity comes
//! from a request header set by an authenticating reverse proxy.

pub mod html;

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query, State},
    http::{header, request::Parts, HeaderName, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use prefs_core::{
    DisplayPreferencesPanel, PanelError, PanelRequest, PanelResponse, PreferenceStore, Submission,
    UserId,
};
use serde::Deserialize;
use tracing::{error, warn};

/// Header an upstream proxy uses to pass the authenticated user.
pub const DEFAULT_USER_HEADER: &str = "x-remote-user";

/// Preference store shared across request tasks.
pub type SharedStore = Arc<dyn PreferenceStore + Send + Sync>;

/// State shared by all handlers.
pub struct AppState {
    panel: DisplayPreferencesPanel<SharedStore>,
    user_header: HeaderName,
}

impl AppState {
    /// Bundle the panel with the header identifying the caller.
    pub fn new(panel: DisplayPreferencesPanel<SharedStore>, user_header: HeaderName) -> Self {
        Self { panel, user_header }
    }
}

/// Build the router: the panel at its own URI plus `/healthz`.
pub fn router(state: Arc<AppState>) -> Router {
    let panel_path = state.panel.panel_uri("");
    Router::new()
        .route(&panel_path, get(view_panel).post(submit_panel))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Authenticated caller, taken from the configured user header.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(&state.user_header)
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing user"))?;
        match UserId::parse(raw) {
            Ok(user) => Ok(Self(user)),
            Err(err) => {
                warn!(%err, "rejected user header");
                Err((StatusCode::UNAUTHORIZED, "invalid user"))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ViewParams {
    saved: Option<String>,
}

async fn view_panel(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<ViewParams>,
) -> Response {
    let saved = params.saved.as_deref() == Some("true");
    run_panel(state, user, PanelRequest::View { saved }).await
}

async fn submit_panel(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Form(submission): Form<Submission>,
) -> Response {
    run_panel(state, user, PanelRequest::Submit(submission)).await
}

async fn run_panel(state: Arc<AppState>, user: UserId, request: PanelRequest) -> Response {
    // Stores may hit the filesystem; keep that off the async workers.
    let task_state = Arc::clone(&state);
    let joined =
        tokio::task::spawn_blocking(move || task_state.panel.process(&user, request)).await;
    match joined {
        Ok(result) => respond(&state, result),
        Err(err) => {
            error!(?err, "panel task failed");
            internal_error()
        }
    }
}

fn respond(state: &AppState, result: Result<PanelResponse, PanelError>) -> Response {
    match result {
        Ok(PanelResponse::Redirect(location)) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Ok(PanelResponse::Form(form)) => match html::render_page(&form, &state.panel.panel_uri("")) {
            Ok(page) => Html(page).into_response(),
            Err(err) => {
                error!(%err, "failed to render display preferences");
                internal_error()
            }
        },
        Err(err) => {
            error!(%err, "display preferences request failed");
            internal_error()
        }
    }
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to load or save preferences",
    )
        .into_response()
}
