//! Minimal HTML shells for each navigation outcome. Page bodies are mounted
//! by the single-page application; the gateway only decides which shell to
//! serve.

use crate::routes::Page;

const NOTICE_SESSION_EXPIRED: &str = "Your session has expired. Please sign in again.";

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, head_extra: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | SkillBridge</title>\n{head_extra}</head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

pub fn page(page: Page) -> String {
    layout(
        page.title(),
        "",
        &format!(
            "<main id=\"app\" data-page=\"{:?}\"><h1>{}</h1></main>",
            page,
            page.title()
        ),
    )
}

/// The login page, optionally with the dismissible session-expired notice.
pub fn login(session_expired: bool) -> String {
    let notice = if session_expired {
        format!(
            "<div role=\"alert\" class=\"notice\">{NOTICE_SESSION_EXPIRED} \
             <a href=\"/login\" aria-label=\"Dismiss\">Dismiss</a></div>\n"
        )
    } else {
        String::new()
    };

    layout(
        Page::Login.title(),
        "",
        &format!(
            "{notice}<main id=\"app\" data-page=\"{:?}\"><h1>{}</h1></main>",
            Page::Login,
            Page::Login.title()
        ),
    )
}

/// Blocking interstitial shown to tutors with unfinished onboarding.
pub fn complete_profile(blocked: Page, action_path: &str) -> String {
    layout(
        "Complete your profile",
        "",
        &format!(
            "<main id=\"app\" data-page=\"{:?}\" data-blocked=\"true\">\n\
             <h1>Complete your profile</h1>\n\
             <p>Finish setting up your tutor profile to continue.</p>\n\
             <a class=\"primary\" href=\"{action_path}\">Continue</a>\n</main>",
            blocked
        ),
    )
}

/// Self-refreshing placeholder. The refresh goes to `refresh_url`, which
/// carries the attempt counter.
pub fn loading(retry_after_ms: u64, refresh_url: &str) -> String {
    let seconds = retry_after_ms.div_ceil(1000).max(1);
    let refresh_url = escape(refresh_url);
    layout(
        "Loading",
        &format!("<meta http-equiv=\"refresh\" content=\"{seconds}; url={refresh_url}\">\n"),
        "<main id=\"app\" aria-busy=\"true\"><p>Loading&hellip;</p></main>",
    )
}

pub fn not_found(path: &str) -> String {
    let path = escape(path);
    layout(
        "Not found",
        "",
        &format!("<main id=\"app\"><h1>Page not found</h1><p><code>{path}</code></p><a href=\"/\">Home</a></main>"),
    )
}
