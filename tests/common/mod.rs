#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use base64::Engine;
use jsonwebtoken::{EncodingKey, Header, encode};
use skillbridge_web::{
    AppConfig, AppState, MockProfileService, ProfileState,
    profile::{StepName, UserId, UserProfile},
    role::Role,
};

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

/// Mints a signed token the way the SkillBridge backend does. The gateway
/// never checks the signature, but a realistic token keeps the tests honest.
pub fn token_for(role: &str) -> String {
    let claims = serde_json::json!({
        "sub": "ada@example.com",
        "roles": role,
        "iat": 1_700_000_000u64,
        "exp": 4_102_444_800u64,
    });
    let key = EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes());
    encode(&Header::default(), &claims, &key).unwrap()
}

/// Hand-assembled `header.payload.signature` with an arbitrary payload.
pub fn token_with_payload(payload: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    format!(
        "{}.{}.{}",
        engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        engine.encode(payload),
        engine.encode("signature")
    )
}

pub fn student_token() -> String {
    token_for(Role::Student.as_str())
}

pub fn tutor_token() -> String {
    token_for(Role::Tutor.as_str())
}

pub fn admin_token() -> String {
    token_for(Role::Admin.as_str())
}

pub fn tutor_profile(step: Option<StepName>) -> UserProfile {
    UserProfile {
        user_id: UserId::Numeric(7),
        role_name: Some(Role::Tutor),
        step_name: step,
    }
}

pub fn app_state(profiles: MockProfileService) -> AppState {
    app_state_with_timeout(profiles, Duration::from_secs(2))
}

pub fn app_state_with_timeout(profiles: MockProfileService, timeout: Duration) -> AppState {
    let config = AppConfig {
        profile_timeout: timeout,
        ..AppConfig::default()
    };
    AppState::new(Arc::new(profiles) as ProfileState, config)
}
