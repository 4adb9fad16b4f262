use super::{Page, RouteSpec};

/// Public Routes
///
/// Reachable with or without a token. The home page carries its own
/// admin redirect (see `Navigator`), so it is still listed without a guard.
pub fn public_routes() -> Vec<RouteSpec> {
    vec![
        // GET /
        // Public landing page; administrators are sent on to their dashboard.
        RouteSpec::public("/", Page::Home),
        // GET /login
        // Also shows the session-expired notice after a rejected token.
        RouteSpec::public("/login", Page::Login),
        // GET /register
        RouteSpec::public("/register", Page::Register),
    ]
}
