//! Route Table
//!
//! The one place where paths are bound to pages and guard compositions. The
//! entries are grouped by access tier, mirroring how guards are layered:
//! `public` (no guard), `authenticated` (token required, optionally role
//! policies), and `admin` (back-office only).
//!
//! Adding a page means adding a `RouteSpec` here; guard logic stays untouched.
use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::guard::{Guard, RolePolicy};

pub mod admin;
pub mod authenticated;
pub mod public;

/// Page
///
/// Every view the gateway can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Page {
    Home,
    Login,
    Register,
    JobBoard,
    JobDetail,
    PostJob,
    Teachers,
    Messages,
    Wallet,
    Billing,
    TutorProfileForm,
    TutorEducationForm,
    TutorExperienceForm,
    TutorSubjectsForm,
    TutorDetailsForm,
    AdminDashboard,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "SkillBridge",
            Page::Login => "Sign in",
            Page::Register => "Create an account",
            Page::JobBoard => "Job board",
            Page::JobDetail => "Job details",
            Page::PostJob => "Post a job",
            Page::Teachers => "Find a teacher",
            Page::Messages => "Messages",
            Page::Wallet => "Wallet",
            Page::Billing => "Billing",
            Page::TutorProfileForm => "Your profile",
            Page::TutorEducationForm => "Your education",
            Page::TutorExperienceForm => "Your experience",
            Page::TutorSubjectsForm => "Your subjects",
            Page::TutorDetailsForm => "Your details",
            Page::AdminDashboard => "Admin dashboard",
        }
    }
}

/// RouteSpec
///
/// Declarative binding of a path to its page and guard. `completion_gated`
/// marks the pages that put incomplete tutors in front of the onboarding
/// interstitial; other tutor-accessible pages are not gated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// axum path syntax; `{name}` matches one non-empty segment.
    pub path: &'static str,
    pub page: Page,
    pub guard: Guard,
    pub completion_gated: bool,
}

impl RouteSpec {
    pub fn public(path: &'static str, page: Page) -> Self {
        Self {
            path,
            page,
            guard: Guard::Public,
            completion_gated: false,
        }
    }

    pub fn authenticated(path: &'static str, page: Page) -> Self {
        Self {
            guard: Guard::Authenticated,
            ..Self::public(path, page)
        }
    }

    pub fn role(path: &'static str, page: Page, policy: RolePolicy) -> Self {
        Self {
            guard: Guard::Role(policy),
            ..Self::public(path, page)
        }
    }

    pub fn completion_gated(mut self) -> Self {
        self.completion_gated = true;
        self
    }

    /// Segment-wise match against a request path (query already stripped).
    ///
    /// Matching is exact, the same rule the axum router applies to the page
    /// routes: `/jobs/` and `//jobs` are different paths from `/jobs`, and a
    /// path without its leading `/` matches nothing.
    pub fn matches(&self, path: &str) -> bool {
        let (Some(pattern), Some(candidate)) = (segments(self.path), segments(path)) else {
            return false;
        };

        pattern.len() == candidate.len()
            && pattern.iter().zip(&candidate).all(|(expected, actual)| {
                (expected.starts_with('{') && expected.ends_with('}') && !actual.is_empty())
                    || expected == actual
            })
    }
}

// `/` is the single empty segment; a trailing `/` adds an empty segment.
fn segments(path: &str) -> Option<Vec<&str>> {
    Some(path.strip_prefix('/')?.split('/').collect())
}

/// RouteTable
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteSpec>) -> Self {
        Self { routes }
    }

    /// First entry matching `path`. Query strings and fragments are ignored.
    pub fn resolve(&self, path: &str) -> Option<&RouteSpec> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        self.routes.iter().find(|spec| spec.matches(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteSpec> {
        self.routes.iter()
    }
}

/// The SkillBridge route table.
pub fn route_table() -> RouteTable {
    let mut routes = public::public_routes();
    routes.extend(authenticated::authenticated_routes());
    routes.extend(admin::admin_routes());
    RouteTable::new(routes)
}
