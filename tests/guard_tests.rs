mod common;

use axum::http::{HeaderMap, HeaderValue, header};
use common::{admin_token, student_token, token_with_payload, tutor_token};
use skillbridge_web::{
    guard::{Access, Guard, RolePolicy},
    role::Role,
    session::{Session, expired_session_cookie},
};

fn protected_guards() -> Vec<Guard> {
    vec![
        Guard::Authenticated,
        Guard::Role(RolePolicy::default()),
        Guard::Role(RolePolicy::allow(&[Role::Student])),
        Guard::Role(RolePolicy::deny(&[Role::Tutor])),
    ]
}

// --- Authentication ---

#[test]
fn test_missing_token_is_unauthenticated_for_every_protected_guard() {
    let session = Session::anonymous();
    for guard in protected_guards() {
        assert_eq!(guard.evaluate(&session), Access::Unauthenticated, "{:?}", guard);
    }
}

#[test]
fn test_malformed_token_is_treated_as_missing() {
    let sessions = [
        Session::with_token("garbage"),
        Session::with_token(""),
        Session::with_token(token_with_payload(r#"{"roles":"ROLE_NOBODY"}"#)),
    ];

    for session in &sessions {
        for guard in protected_guards() {
            assert_eq!(guard.evaluate(session), Access::Unauthenticated);
        }
    }
}

#[test]
fn test_public_guard_allows_anonymous_visitors() {
    let access = Guard::Public.evaluate(&Session::anonymous());
    assert_eq!(access, Access::Allowed { viewer: None });
}

#[test]
fn test_authenticated_guard_allows_any_decodable_role() {
    for token in [student_token(), tutor_token(), admin_token()] {
        let access = Guard::Authenticated.evaluate(&Session::with_token(token));
        assert!(matches!(access, Access::Allowed { viewer: Some(_) }));
    }
}

// --- Role Policies ---

#[test]
fn test_deny_list_wins_over_allow_list() {
    let policy = RolePolicy::allow(&[Role::Student, Role::Tutor])
        .and_deny(&[Role::Student])
        .redirect_to("/fallback");

    let access = Guard::Role(policy).evaluate(&Session::with_token(student_token()));

    assert_eq!(
        access,
        Access::Forbidden {
            redirect_to: "/fallback".to_string()
        }
    );
}

#[test]
fn test_empty_allow_list_admits_every_role() {
    let guard = Guard::Role(RolePolicy::default());
    for token in [student_token(), tutor_token(), admin_token()] {
        assert!(matches!(
            guard.evaluate(&Session::with_token(token)),
            Access::Allowed { .. }
        ));
    }
}

#[test]
fn test_role_outside_allow_list_goes_home_by_default() {
    let guard = Guard::Role(RolePolicy::allow(&[Role::Admin]));

    let access = guard.evaluate(&Session::with_token(tutor_token()));

    assert_eq!(
        access,
        Access::Forbidden {
            redirect_to: "/".to_string()
        }
    );
}

#[test]
fn test_allowed_viewer_carries_decoded_role() {
    let guard = Guard::Role(RolePolicy::allow(&[Role::Tutor]));

    match guard.evaluate(&Session::with_token(tutor_token())) {
        Access::Allowed {
            viewer: Some(viewer),
        } => assert_eq!(viewer.role, Role::Tutor),
        other => panic!("expected allowed tutor, got {:?}", other),
    }
}

// --- Session Extraction ---

#[test]
fn test_session_prefers_cookie_over_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("theme=dark; token=from-cookie"),
    );
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer from-header"),
    );

    let session = Session::from_headers(&headers, "token");
    assert_eq!(session.token.as_deref(), Some("from-cookie"));
}

#[test]
fn test_session_falls_back_to_bearer_header() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("token="));
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_static("Bearer from-header"),
    );

    let session = Session::from_headers(&headers, "token");
    assert_eq!(session.token.as_deref(), Some("from-header"));
}

#[test]
fn test_session_without_credentials_is_anonymous() {
    let session = Session::from_headers(&HeaderMap::new(), "token");
    assert_eq!(session, Session::anonymous());
    assert!(!session.is_present());
}

#[test]
fn test_expired_session_cookie_clears_token() {
    let cookie = expired_session_cookie("token");

    assert_eq!(cookie.name(), "token");
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age().map(|age| age.whole_seconds()), Some(0));

    let header = cookie.to_string();
    assert!(header.starts_with("token=;"));
    assert!(header.contains("Max-Age=0"));
}

#[test]
fn test_session_cookie_is_percent_decoded() {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::COOKIE,
        HeaderValue::from_static("token=abc%2Edef%2Eghi; theme=dark"),
    );

    let session = Session::from_headers(&headers, "token");
    assert_eq!(session.token.as_deref(), Some("abc.def.ghi"));
}

#[test]
fn test_quoted_session_cookie_is_unquoted() {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_static("token=\"abc.def.ghi\""));

    let session = Session::from_headers(&headers, "token");
    assert_eq!(session.token.as_deref(), Some("abc.def.ghi"));
}
