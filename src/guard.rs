use crate::{
    role::Role,
    session::{Session, Viewer},
};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

/// Guard
///
/// The guard composition a route declares: none, authentication only, or
/// authentication plus a role policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Public,
    Authenticated,
    Role(RolePolicy),
}

/// RolePolicy
///
/// Allow/deny lists for a role-guarded route. An empty allow-list admits any
/// authenticated role. The deny-list is consulted first, so a role present in
/// both lists is denied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    pub allowed: Vec<Role>,
    pub denied: Vec<Role>,
    pub redirect_to: String,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self {
            allowed: Vec::new(),
            denied: Vec::new(),
            redirect_to: HOME_PATH.to_string(),
        }
    }
}

impl RolePolicy {
    pub fn allow(roles: &[Role]) -> Self {
        Self {
            allowed: roles.to_vec(),
            ..Self::default()
        }
    }

    pub fn deny(roles: &[Role]) -> Self {
        Self {
            denied: roles.to_vec(),
            ..Self::default()
        }
    }

    pub fn and_deny(mut self, roles: &[Role]) -> Self {
        self.denied.extend_from_slice(roles);
        self
    }

    pub fn redirect_to(mut self, path: impl Into<String>) -> Self {
        self.redirect_to = path.into();
        self
    }

    /// Whether `role` may pass. Deny is checked before allow.
    pub fn admits(&self, role: Role) -> bool {
        if self.denied.contains(&role) {
            return false;
        }
        self.allowed.is_empty() || self.allowed.contains(&role)
    }
}

/// Access
///
/// Outcome of evaluating a guard. Each variant maps to exactly one rendering
/// branch.
///
/// [`Guard::evaluate`] only ever answers from the token, so it never returns
/// `Loading`. That variant belongs to the navigation layer, which enters it
/// when a completion-gated page is still waiting on the profile fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    /// An asynchronous precondition (the profile fetch) has not settled yet.
    Loading,
    /// No usable token: send the visitor to the login page.
    Unauthenticated,
    /// Authenticated, but the role policy rejected the viewer.
    Forbidden { redirect_to: String },
    /// Render the protected view. `viewer` is `None` only on public routes
    /// visited without a usable token.
    Allowed { viewer: Option<Viewer> },
}

impl Guard {
    /// evaluate
    ///
    /// Synchronous check against the session alone. Decode failures degrade
    /// to `Unauthenticated` rather than erroring.
    pub fn evaluate(&self, session: &Session) -> Access {
        let viewer = session.viewer();

        match self {
            Guard::Public => Access::Allowed { viewer },
            Guard::Authenticated => match viewer {
                Some(viewer) => Access::Allowed {
                    viewer: Some(viewer),
                },
                None => Access::Unauthenticated,
            },
            Guard::Role(policy) => match viewer {
                None => Access::Unauthenticated,
                Some(viewer) if policy.admits(viewer.role) => Access::Allowed {
                    viewer: Some(viewer),
                },
                Some(viewer) => {
                    tracing::debug!(role = %viewer.role, redirect_to = %policy.redirect_to, "Role guard rejected viewer");
                    Access::Forbidden {
                        redirect_to: policy.redirect_to.clone(),
                    }
                }
            },
        }
    }
}
