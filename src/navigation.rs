use std::time::Duration;

use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    AppState,
    api_client::{ProfileError, ProfileState},
    completion::{Completion, LoadState, ProfileLoader, ViewSlot},
    guard::{Access, LOGIN_PATH},
    role::Role,
    routes::{Page, RouteSpec, admin::ADMIN_DASHBOARD_PATH},
    session::Session,
};

/// Where the login page is reached after the backend rejects a session.
pub const SESSION_EXPIRED_PATH: &str = "/login?notice=session-expired";

/// How long a loading view waits before asking again.
pub const LOADING_RETRY_MS: u64 = 1000;

/// Profile fetches a single visit may start before the gateway stops offering
/// loading views and falls back to the public home page.
pub const MAX_LOADING_ATTEMPTS: u32 = 3;

/// Navigation
///
/// The final decision for one page visit. Served as HTML by the page routes
/// and as JSON by `GET /api/navigation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export)]
pub enum Navigation {
    /// Show the requested page.
    Render { page: Page },
    /// Replace the current history entry with `to`.
    Redirect { to: String },
    /// Show the onboarding interstitial in place of `page`.
    CompleteProfile { page: Page, action_path: String },
    /// The backend rejected the token: clear it and go to `redirect_to`.
    SessionExpired { redirect_to: String },
    /// The profile is still being fetched; ask again after `retry_after_ms`,
    /// passing `attempt` back so the retries stay bounded.
    Loading { retry_after_ms: u64, attempt: u32 },
    NotFound { path: String },
}

/// Navigator
///
/// Runs the full decision pipeline for a route: guard, home routing, then
/// the per-page profile-completion check.
#[derive(Clone)]
pub struct Navigator {
    loader: ProfileLoader,
    profile_timeout: Duration,
}

impl Navigator {
    pub fn new(profiles: ProfileState, profile_timeout: Duration) -> Self {
        Self {
            loader: ProfileLoader::new(profiles),
            profile_timeout,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.profiles.clone(), state.config.profile_timeout)
    }

    /// decide
    ///
    /// First visit to a route. Equivalent to `decide_attempt(spec, session, 0)`.
    pub async fn decide(&self, spec: &RouteSpec, session: &Session) -> Navigation {
        self.decide_attempt(spec, session, 0).await
    }

    /// decide_attempt
    ///
    /// Runs the pipeline for a visit that has already been answered with
    /// `attempt` loading views. Once [`MAX_LOADING_ATTEMPTS`] fetches have
    /// timed out the visit settles on the public home page instead of
    /// refreshing forever.
    pub async fn decide_attempt(&self, spec: &RouteSpec, session: &Session, attempt: u32) -> Navigation {
        let access = spec.guard.evaluate(session);
        let allowed_role = match &access {
            Access::Allowed { viewer } => Some(viewer.as_ref().map(|viewer| viewer.role)),
            _ => None,
        };
        let Some(role) = allowed_role else {
            return Self::settle(access, spec.page, attempt);
        };

        // Home router: administrators never see the public landing page.
        if spec.page == Page::Home && role == Some(Role::Admin) {
            return Navigation::Redirect {
                to: ADMIN_DASHBOARD_PATH.to_string(),
            };
        }

        match (role, session.token.as_deref()) {
            (Some(Role::Tutor), Some(token)) if spec.completion_gated => {
                self.check_completion(spec.page, Role::Tutor, token, attempt).await
            }
            _ => Self::settle(access, spec.page, attempt),
        }
    }

    /// settle
    ///
    /// Maps an access outcome onto the navigation served for `page`.
    /// `Access::Loading` is entered here, by the completion check, while a
    /// gated page's profile fetch is still pending.
    fn settle(access: Access, page: Page, attempt: u32) -> Navigation {
        match access {
            Access::Loading => {
                let attempt = attempt.saturating_add(1);
                if attempt >= MAX_LOADING_ATTEMPTS {
                    tracing::warn!(?page, attempt, "Profile fetch kept timing out; falling back to home");
                    return Navigation::Render { page: Page::Home };
                }
                Navigation::Loading {
                    retry_after_ms: LOADING_RETRY_MS,
                    attempt,
                }
            }
            Access::Unauthenticated => Navigation::Redirect {
                to: LOGIN_PATH.to_string(),
            },
            Access::Forbidden { redirect_to } => Navigation::Redirect { to: redirect_to },
            Access::Allowed { .. } => Navigation::Render { page },
        }
    }

    /// Fetches the profile and holds `page` back until tutor onboarding is
    /// complete. The view slot lives only for this call: if the fetch outlasts
    /// the timeout, its late result is dropped instead of applied.
    async fn check_completion(&self, page: Page, role: Role, token: &str, attempt: u32) -> Navigation {
        let slot = ViewSlot::mount();
        let pending = self.loader.load(&slot, token.to_string());

        match tokio::time::timeout(self.profile_timeout, pending).await {
            Err(_) => {
                tracing::info!(?page, attempt, "Profile fetch still pending");
                return Self::settle(Access::Loading, page, attempt);
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Profile fetch task failed");
                return Navigation::Render { page: Page::Home };
            }
            Ok(Ok(_)) => {}
        }

        match slot.take().await {
            LoadState::Loaded(profile) => match Completion::evaluate(role, &profile) {
                Completion::Complete => Navigation::Render { page },
                Completion::Incomplete { action_path, step } => {
                    tracing::debug!(?page, ?step, "Tutor profile incomplete");
                    Navigation::CompleteProfile {
                        page,
                        action_path: action_path.to_string(),
                    }
                }
            },
            LoadState::Failed(ProfileError::Unauthorized) => {
                tracing::info!("Backend rejected session during profile fetch");
                Navigation::SessionExpired {
                    redirect_to: SESSION_EXPIRED_PATH.to_string(),
                }
            }
            LoadState::Failed(e) => {
                // Safest default: public content rather than a hung page.
                tracing::warn!(error = %e, ?page, "Profile fetch failed; falling back to home");
                Navigation::Render { page: Page::Home }
            }
            LoadState::Loading => Navigation::Render { page: Page::Home },
        }
    }
}
