use super::{Page, RouteSpec};
use crate::{
    guard::RolePolicy,
    profile::{
        DETAILS_FORM_PATH, EDUCATION_FORM_PATH, EXPERIENCE_FORM_PATH, PROFILE_FORM_PATH,
        SUBJECTS_FORM_PATH,
    },
    role::Role,
};

/// Authenticated Routes
///
/// Every entry requires a decodable token. Role policies narrow some of them
/// further; anything the policy rejects goes back to the home page.
pub fn authenticated_routes() -> Vec<RouteSpec> {
    let tutor_only = || RolePolicy::allow(&[Role::Tutor]);

    vec![
        // --- Job Board ---
        // Incomplete tutors see the onboarding interstitial here instead.
        RouteSpec::authenticated("/jobs", Page::JobBoard).completion_gated(),
        RouteSpec::authenticated("/jobs/{id}", Page::JobDetail).completion_gated(),
        // Only students post jobs.
        RouteSpec::role("/post-job", Page::PostJob, RolePolicy::allow(&[Role::Student])),
        // Tutors do not browse other tutors.
        RouteSpec::role("/teachers", Page::Teachers, RolePolicy::deny(&[Role::Tutor])),
        // --- Account ---
        RouteSpec::authenticated("/messages", Page::Messages),
        RouteSpec::authenticated("/wallet", Page::Wallet),
        RouteSpec::authenticated("/billing", Page::Billing),
        // --- Tutor Onboarding Forms ---
        RouteSpec::role(PROFILE_FORM_PATH, Page::TutorProfileForm, tutor_only()),
        RouteSpec::role(EDUCATION_FORM_PATH, Page::TutorEducationForm, tutor_only()),
        RouteSpec::role(EXPERIENCE_FORM_PATH, Page::TutorExperienceForm, tutor_only()),
        RouteSpec::role(SUBJECTS_FORM_PATH, Page::TutorSubjectsForm, tutor_only()),
        RouteSpec::role(DETAILS_FORM_PATH, Page::TutorDetailsForm, tutor_only()),
    ]
}
