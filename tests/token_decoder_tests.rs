mod common;

use common::{token_for, token_with_payload};
use skillbridge_web::{
    role::Role,
    token::{Claims, RolesClaim, TokenError, decode_payload, try_decode_payload},
};

// --- Malformed Input ---

#[test]
fn test_malformed_tokens_decode_to_none() {
    let not_json = token_with_payload("definitely not json");
    let malformed = [
        "",
        "   ",
        "single-segment",
        "two.segments",
        "a.b.c.d",
        "header.!!!.signature",
        "header.b.signature",
        not_json.as_str(),
    ];

    for token in malformed {
        assert!(
            decode_payload(token).is_none(),
            "token {:?} should not decode",
            token
        );
        assert!(Claims::from_token(token).is_none());
    }
}

#[test]
fn test_segment_count_is_reported() {
    let err = try_decode_payload("only.two").unwrap_err();
    assert!(matches!(err, TokenError::SegmentCount(2)));
}

#[test]
fn test_invalid_utf8_payload_is_rejected() {
    use base64::Engine;
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0x7b]);
    let token = format!("h.{}.s", payload);

    assert!(matches!(
        try_decode_payload(&token),
        Err(TokenError::Utf8(_))
    ));
    assert!(decode_payload(&token).is_none());
}

// --- Valid Input ---

#[test]
fn test_signed_token_decodes_to_its_claims() {
    let token = token_for("ROLE_STUDENT");

    let payload = decode_payload(&token).expect("token should decode");

    assert_eq!(
        payload,
        serde_json::json!({
            "sub": "ada@example.com",
            "roles": "ROLE_STUDENT",
            "iat": 1_700_000_000u64,
            "exp": 4_102_444_800u64,
        })
    );
}

#[test]
fn test_padded_payload_is_accepted() {
    use base64::Engine;
    // 4 bytes of JSON force two padding characters.
    let payload = base64::engine::general_purpose::URL_SAFE.encode("[1]\n");
    assert!(payload.ends_with("=="));

    let token = format!("h.{}.s", payload);
    assert_eq!(decode_payload(&token), Some(serde_json::json!([1])));
}

#[test]
fn test_unicode_payload_survives_decoding() {
    let token = token_with_payload(r#"{"name":"Zoë 李雷","roles":"ROLE_TUTOR"}"#);

    let payload = decode_payload(&token).unwrap();
    assert_eq!(payload["name"], "Zoë 李雷");
}

// --- Typed Claims ---

#[test]
fn test_claims_expose_role() {
    let claims = Claims::from_token(&token_for("ROLE_ADMIN")).unwrap();
    assert_eq!(claims.role(), Some(Role::Admin));
    assert_eq!(claims.sub, Some(serde_json::json!("ada@example.com")));
    assert!(claims.extra.contains_key("exp"));
}

#[test]
fn test_roles_claim_as_list_uses_first_known_role() {
    let token = token_with_payload(r#"{"roles":["ROLE_SUPPORT","ROLE_TUTOR"]}"#);
    let claims = Claims::from_token(&token).unwrap();

    assert!(matches!(claims.roles, Some(RolesClaim::Many(_))));
    assert_eq!(claims.role(), Some(Role::Tutor));
}

#[test]
fn test_unknown_or_missing_role_yields_none() {
    let unknown = Claims::from_token(&token_with_payload(r#"{"roles":"ROLE_ROOT"}"#)).unwrap();
    assert_eq!(unknown.role(), None);

    let missing = Claims::from_token(&token_with_payload(r#"{"sub":"x"}"#)).unwrap();
    assert_eq!(missing.role(), None);
}

#[test]
fn test_non_object_payload_has_no_claims() {
    let token = token_with_payload("[\"ROLE_ADMIN\"]");
    assert!(decode_payload(&token).is_some());
    assert!(Claims::from_token(&token).is_none());
}
