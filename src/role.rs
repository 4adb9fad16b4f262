use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The closed set of account roles issued by the SkillBridge backend.
/// The wire form is the backend's `ROLE_*` string, both in token claims and in
/// the `roleName` field of the user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub enum Role {
    #[serde(rename = "ROLE_STUDENT")]
    Student,
    #[serde(rename = "ROLE_TUTOR")]
    Tutor,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl Role {
    /// Maps a raw claim string onto a role. Unknown strings yield `None`.
    pub fn from_claim(claim: &str) -> Option<Role> {
        match claim.trim() {
            "ROLE_STUDENT" => Some(Role::Student),
            "ROLE_TUTOR" => Some(Role::Tutor),
            "ROLE_ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "ROLE_STUDENT",
            Role::Tutor => "ROLE_TUTOR",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
