use std::sync::{Arc, Weak};

use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    api_client::{ProfileError, ProfileState},
    profile::{PROFILE_FORM_PATH, StepName, UserProfile},
    role::Role,
};

/// Completion
///
/// Whether a viewer may see a completion-gated page, or must first finish
/// tutor onboarding.
///
/// Tutor onboarding is a sequence of forms (profile, education, experience,
/// subjects, details). The backend reports the first unfinished one as
/// `stepName`; `Incomplete` names the form that picks up from there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Complete,
    /// The page is replaced by a "complete your profile" interstitial whose
    /// primary action leads to `action_path`.
    Incomplete {
        step: Option<StepName>,
        action_path: &'static str,
    },
}

impl Completion {
    /// Only tutors can be incomplete; every other role passes untouched.
    /// A missing or unrecognised step routes to the first onboarding form.
    pub fn evaluate(role: Role, profile: &UserProfile) -> Completion {
        if role != Role::Tutor {
            return Completion::Complete;
        }

        match profile.step_name {
            Some(StepName::Complete) => Completion::Complete,
            Some(step) => Completion::Incomplete {
                step: Some(step),
                action_path: step.form_path(),
            },
            None => Completion::Incomplete {
                step: None,
                action_path: PROFILE_FORM_PATH,
            },
        }
    }
}

/// LoadState
///
/// What a view knows about its profile fetch. Starts as `Loading` and is
/// overwritten once, by the fetch task, if the view is still mounted.
#[derive(Debug, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(UserProfile),
    Failed(ProfileError),
}

/// ViewSlot
///
/// The state owned by a mounted view. The fetch task only holds a `Weak`
/// reference, so once the view is dropped its result has nowhere to land.
///
/// The navigator mounts one slot per gated page visit and drops it when it
/// stops waiting. A fetch that outlives the visit therefore cannot leak its
/// profile into a later visit or into another visitor's response.
#[derive(Debug, Default)]
pub struct ViewSlot {
    state: Arc<Mutex<LoadState>>,
}

impl ViewSlot {
    pub fn mount() -> Self {
        Self::default()
    }

    pub async fn is_loading(&self) -> bool {
        matches!(*self.state.lock().await, LoadState::Loading)
    }

    /// Moves the settled state out, leaving `Loading` behind.
    pub async fn take(&self) -> LoadState {
        std::mem::take(&mut *self.state.lock().await)
    }

    fn downgrade(&self) -> Weak<Mutex<LoadState>> {
        Arc::downgrade(&self.state)
    }
}

/// Delivery
///
/// Whether a finished fetch reached its view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Applied,
    Discarded,
}

/// ProfileLoader
///
/// Runs profile fetches on their own task so a view can stop waiting (or
/// disappear) without cancelling the request.
///
/// Each call to [`ProfileLoader::load`] starts a fresh fetch; profiles are
/// never cached between visits.
#[derive(Clone)]
pub struct ProfileLoader {
    service: ProfileState,
}

impl ProfileLoader {
    pub fn new(service: ProfileState) -> Self {
        Self { service }
    }

    /// load
    ///
    /// Spawns the fetch for `token` and returns its handle. The handle
    /// resolves to `Applied` when the result reached `slot` and to
    /// `Discarded` when the slot had already been dropped.
    pub fn load(&self, slot: &ViewSlot, token: String) -> JoinHandle<Delivery> {
        let service = self.service.clone();
        let target = slot.downgrade();

        tokio::spawn(async move {
            let result = service.fetch_profile(&token).await;

            let Some(state) = target.upgrade() else {
                tracing::debug!("View dropped before profile fetch settled; discarding result");
                return Delivery::Discarded;
            };

            *state.lock().await = match result {
                Ok(profile) => LoadState::Loaded(profile),
                Err(e) => LoadState::Failed(e),
            };
            Delivery::Applied
        })
    }
}
