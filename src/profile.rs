use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::role::Role;

// --- Backend Envelope ---

/// Envelope
///
/// The backend's uniform response wrapper:
/// `{ headers: { responseCode, customerMessage }, body: { data } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub headers: EnvelopeHeaders,
    pub body: EnvelopeBody<T>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeHeaders {
    /// Mirrors the HTTP status. Some endpoints send it as a string.
    #[serde(default, deserialize_with = "lenient_code")]
    pub response_code: Option<u16>,
    #[serde(default)]
    pub customer_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeBody<T> {
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            headers: EnvelopeHeaders {
                response_code: Some(200),
                customer_message: None,
            },
            body: EnvelopeBody { data },
        }
    }
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Role::from_claim(&s),
        _ => None,
    })
}

// --- User Profile ---

/// UserId
///
/// The backend keys users by a numeric id, older payloads by a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Numeric(i64),
    Text(String),
}

/// UserProfile
///
/// The fields of the profile record the guards consult. Fetched fresh for
/// every gated page view and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: UserId,
    /// Roles this gateway does not know (say `ROLE_PARENT`) read as `None`
    /// instead of failing the whole envelope.
    #[serde(default, deserialize_with = "lenient_role")]
    pub role_name: Option<Role>,
    /// Only meaningful for tutors.
    #[serde(default)]
    pub step_name: Option<StepName>,
}

/// StepName
///
/// Tutor onboarding progress: the first step still incomplete, or `COMPLETE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepName {
    Profile,
    Education,
    Experience,
    Subjects,
    Details,
    Complete,
    /// Anything the backend adds later; routed like a missing step.
    #[serde(other)]
    Unknown,
}

pub const PROFILE_FORM_PATH: &str = "/tutor/profile";
pub const EDUCATION_FORM_PATH: &str = "/tutor/education";
pub const EXPERIENCE_FORM_PATH: &str = "/tutor/experience";
pub const SUBJECTS_FORM_PATH: &str = "/tutor/subjects";
pub const DETAILS_FORM_PATH: &str = "/tutor/details";

impl StepName {
    /// The form that completes this step. `COMPLETE` and unknown steps fall
    /// back to the first form.
    pub fn form_path(&self) -> &'static str {
        match self {
            StepName::Profile => PROFILE_FORM_PATH,
            StepName::Education => EDUCATION_FORM_PATH,
            StepName::Experience => EXPERIENCE_FORM_PATH,
            StepName::Subjects => SUBJECTS_FORM_PATH,
            StepName::Details => DETAILS_FORM_PATH,
            StepName::Complete | StepName::Unknown => PROFILE_FORM_PATH,
        }
    }
}
