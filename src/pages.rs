//! Page and JSON handlers
//!
//! Every page route funnels into [`serve_page`], which asks the
//! [`Navigator`] for a decision and turns it into an HTTP response with
//! [`render`]. The JSON endpoint returns the same decision unrendered.
use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, Uri, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    AppState,
    navigation::{MAX_LOADING_ATTEMPTS, Navigation, Navigator},
    routes::{Page, RouteSpec},
    session::{Session, expired_session_cookie},
    views,
};

/// Query value that marks a login visit caused by a rejected session.
const NOTICE_SESSION_EXPIRED: &str = "session-expired";

/// NavigationQuery
///
/// Query parameters for `GET /api/navigation`.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct NavigationQuery {
    /// The path the single-page application is about to show, e.g. `/jobs`.
    pub path: String,
    /// Loading answers already received for this path. Omit on the first ask.
    pub attempt: Option<u32>,
}

/// PageQuery
///
/// The query parameters page routes care about. Anything else in the query
/// string belongs to the single-page application and is ignored here.
///
/// A malformed query (say `?attempt=soon`) is treated as an empty one rather
/// than rejected, so a hand-edited URL still reaches its page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Set by the loading view's refresh; counts the loading views served so far.
    pub attempt: Option<u32>,
    /// `session-expired` on the login page after the backend rejected a token.
    pub notice: Option<String>,
}

impl PageQuery {
    fn attempt(&self) -> u32 {
        self.attempt.unwrap_or(0).min(MAX_LOADING_ATTEMPTS)
    }
}

/// serve_page
///
/// [Page Route] Runs the navigation pipeline for one table entry and renders
/// the outcome.
///
/// The `attempt` carried by a loading view's refresh is fed back into the
/// navigator, which is what keeps a persistently slow backend from producing
/// an endless chain of loading pages.
pub async fn serve_page(state: AppState, session: Session, spec: RouteSpec, uri: Uri, query: PageQuery) -> Response {
    let navigation = Navigator::from_state(&state)
        .decide_attempt(&spec, &session, query.attempt())
        .await;
    let session_expired_notice =
        spec.page == Page::Login && query.notice.as_deref() == Some(NOTICE_SESSION_EXPIRED);
    render(navigation, &state.config.token_cookie, &uri, session_expired_notice)
}

/// render
///
/// One response per navigation outcome. Redirects use `303 See Other`, so the
/// browser replaces the entry instead of stacking a new one.
///
/// `uri` is the request being answered. A loading view refreshes back to it
/// with the next `attempt`, keeping the rest of its query intact.
pub fn render(navigation: Navigation, token_cookie: &str, uri: &Uri, session_expired_notice: bool) -> Response {
    match navigation {
        Navigation::Render { page: Page::Login } => {
            Html(views::login(session_expired_notice)).into_response()
        }
        Navigation::Render { page } => Html(views::page(page)).into_response(),
        Navigation::Redirect { to } => Redirect::to(&to).into_response(),
        Navigation::CompleteProfile { page, action_path } => {
            Html(views::complete_profile(page, &action_path)).into_response()
        }
        Navigation::SessionExpired { redirect_to } => (
            [(header::SET_COOKIE, expired_session_cookie(token_cookie).to_string())],
            Redirect::to(&redirect_to),
        )
            .into_response(),
        Navigation::Loading {
            retry_after_ms,
            attempt,
        } => (
            [(header::CACHE_CONTROL, "no-store")],
            Html(views::loading(retry_after_ms, &refresh_url(uri, attempt))),
        )
            .into_response(),
        Navigation::NotFound { path } => {
            (StatusCode::NOT_FOUND, Html(views::not_found(&path))).into_response()
        }
    }
}

/// The request's own URL with `attempt` replaced.
fn refresh_url(uri: &Uri, attempt: u32) -> String {
    let mut pairs: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("attempt="))
        .collect();
    let attempt = format!("attempt={attempt}");
    pairs.push(&attempt);
    format!("{}?{}", uri.path(), pairs.join("&"))
}

/// get_navigation
///
/// [Public Route] Returns the navigation decision for `path` as JSON, for the
/// single-page application's client-side router. When the backend has rejected
/// the session the response also clears the token cookie.
///
/// A `loading` answer carries an `attempt`; the client sends it back on its
/// next ask, and after enough of them the answer becomes the home page.
#[utoipa::path(
    get,
    path = "/api/navigation",
    params(NavigationQuery),
    responses(
        (status = 200, description = "Navigation decision", body = Navigation),
        (status = 404, description = "Unknown path", body = Navigation)
    )
)]
pub async fn get_navigation(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<NavigationQuery>,
) -> Response {
    let Some(spec) = state.routes.resolve(&query.path) else {
        let navigation = Navigation::NotFound { path: query.path };
        return (StatusCode::NOT_FOUND, Json(navigation)).into_response();
    };

    let attempt = query.attempt.unwrap_or(0).min(MAX_LOADING_ATTEMPTS);
    let navigation = Navigator::from_state(&state)
        .decide_attempt(spec, &session, attempt)
        .await;

    if matches!(navigation, Navigation::SessionExpired { .. }) {
        let cookie = expired_session_cookie(&state.config.token_cookie).to_string();
        return ([(header::SET_COOKIE, cookie)], Json(navigation)).into_response();
    }
    Json(navigation).into_response()
}

/// not_found
///
/// Fallback for paths missing from the route table, including trailing-slash
/// variants of real pages.
pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route for path");
    render(
        Navigation::NotFound {
            path: uri.path().to_string(),
        },
        "",
        &uri,
        false,
    )
}
