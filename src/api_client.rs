use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::profile::{Envelope, UserProfile};

/// Path of the authenticated profile endpoint, relative to the API base URL.
pub const PROFILE_ENDPOINT: &str = "/user/profile";

/// ProfileError
///
/// Everything that can go wrong while fetching a profile.
///
/// `Unauthorized` is kept apart from every other failure: it means a session
/// the UI believed in has been rejected by the backend and must be ended.
/// The navigator turns it into a cleared cookie and the session-expired
/// notice. The remaining variants are logged and degrade to the public home
/// page, so a flaky backend never strands a visitor on an error screen.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("backend rejected the session")]
    Unauthorized,

    #[error("profile request failed: {0}")]
    Transport(String),

    #[error("backend answered {code}: {message}")]
    Status { code: u16, message: String },

    #[error("malformed profile envelope: {0}")]
    Envelope(String),
}

// 1. ProfileService Contract
/// ProfileService
///
/// Defines the contract for fetching the signed-in user's profile from the
/// SkillBridge backend. This trait lets the gateway swap the concrete
/// implementation, [`HttpProfileService`] in production and
/// [`MockProfileService`] in tests, without touching the navigator.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Fetches the profile belonging to `token`.
    ///
    /// A backend 401, whether sent as the HTTP status or inside the envelope,
    /// must come back as [`ProfileError::Unauthorized`].
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ProfileError>;
}

/// ProfileState
///
/// The concrete type used to share the profile service across the
/// application state and the spawned fetch tasks.
pub type ProfileState = Arc<dyn ProfileService>;

// 2. The Real Implementation (reqwest)
/// HttpProfileService
///
/// The concrete implementation using reqwest. Calls
/// `GET {api_base_url}/user/profile` with the visitor's bearer token and
/// unwraps the `{headers, body}` envelope the backend wraps every answer in.
///
/// The client's own timeout is the hard ceiling on a request. It is set above
/// the navigator's loading threshold, so a slow request can still land after
/// the visitor has been shown the loading view.
#[derive(Clone)]
pub struct HttpProfileService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProfileService {
    /// new
    ///
    /// Builds the client. `timeout` bounds each request end to end.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProfileService for HttpProfileService {
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, ProfileError> {
        let url = format!("{}{}", self.base_url, PROFILE_ENDPOINT);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProfileError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ProfileError::Unauthorized);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ProfileError::Transport(e.to_string()))?;

        if !status.is_success() {
            // Error bodies usually still carry the envelope headers; surface
            // the customer message when there is one.
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&text)
                .ok()
                .and_then(|envelope| envelope.headers.customer_message)
                .unwrap_or_else(|| status.to_string());
            return Err(ProfileError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<UserProfile> =
            serde_json::from_str(&text).map_err(|e| ProfileError::Envelope(e.to_string()))?;

        // The envelope can report a failure inside a 200 response.
        match envelope.headers.response_code {
            Some(401) => Err(ProfileError::Unauthorized),
            Some(code) if !(200..300).contains(&code) => Err(ProfileError::Status {
                code,
                message: envelope.headers.customer_message.unwrap_or_default(),
            }),
            _ => Ok(envelope.body.data),
        }
    }
}

// 3. The Mock Implementation (For Tests)
#[derive(Clone)]
enum MockOutcome {
    Profile(UserProfile),
    Unauthorized,
    Failing,
}

/// MockProfileService
///
/// A mock implementation of `ProfileService` used for unit and integration
/// testing. Every call answers with the same canned outcome, optionally after
/// a delay, which is how tests reproduce a slow backend.
///
/// Calls are counted on a shared counter, so clones handed to the
/// application state still report to the test that kept the original.
#[derive(Clone)]
pub struct MockProfileService {
    outcome: MockOutcome,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockProfileService {
    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn returning(profile: UserProfile) -> Self {
        Self::with_outcome(MockOutcome::Profile(profile))
    }

    pub fn unauthorized() -> Self {
        Self::with_outcome(MockOutcome::Unauthorized)
    }

    pub fn failing() -> Self {
        Self::with_outcome(MockOutcome::Failing)
    }

    /// Holds every response back by `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileService for MockProfileService {
    async fn fetch_profile(&self, _token: &str) -> Result<UserProfile, ProfileError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.outcome {
            MockOutcome::Profile(profile) => Ok(profile.clone()),
            MockOutcome::Unauthorized => Err(ProfileError::Unauthorized),
            MockOutcome::Failing => Err(ProfileError::Transport(
                "Mock Profile Error: Simulation requested".to_string(),
            )),
        }
    }
}
