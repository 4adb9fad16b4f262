use super::{Page, RouteSpec};
use crate::{guard::RolePolicy, role::Role};

pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";

/// Admin Routes
///
/// Back-office pages. Non-admins are sent home.
pub fn admin_routes() -> Vec<RouteSpec> {
    vec![RouteSpec::role(
        ADMIN_DASHBOARD_PATH,
        Page::AdminDashboard,
        RolePolicy::allow(&[Role::Admin]),
    )]
}
