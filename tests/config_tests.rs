use serial_test::serial;
use skillbridge_web::{AppConfig, config::Env};
use std::{env, panic, time::Duration};

const CONFIG_VARS: [&str; 6] = [
    "APP_ENV",
    "SKILLBRIDGE_API_URL",
    "TOKEN_COOKIE",
    "PROFILE_TIMEOUT_MS",
    "API_TIMEOUT_MS",
    "LISTEN_ADDR",
];

// --- Setup/Teardown Utilities ---

/// Runs `test` with a clean configuration environment and restores the
/// original values afterwards, even if the test panics.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(&str, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var, env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals {
        unsafe {
            match original_value {
                Some(val) => env::set_var(key, val),
                None => env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_production_requires_api_url() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic without SKILLBRIDGE_API_URL"
    );
}

#[test]
#[serial]
fn test_local_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.api_base_url, "http://localhost:8080");
    assert_eq!(config.token_cookie, "token");
    assert_eq!(config.profile_timeout, Duration::from_millis(3000));
    assert_eq!(config.api_timeout, Duration::from_millis(10_000));
    assert_eq!(config.listen_addr, "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_production_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("SKILLBRIDGE_API_URL", "https://api.skillbridge.test/v1/");
            env::set_var("TOKEN_COOKIE", "sb_token");
            env::set_var("PROFILE_TIMEOUT_MS", "750");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.api_base_url, "https://api.skillbridge.test/v1");
    assert_eq!(config.token_cookie, "sb_token");
    assert_eq!(config.profile_timeout, Duration::from_millis(750));
}

#[test]
#[serial]
fn test_unparseable_timeout_uses_default() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("PROFILE_TIMEOUT_MS", "soon");
        }
        AppConfig::load()
    });

    assert_eq!(config.profile_timeout, Duration::from_millis(3000));
}

#[test]
#[serial]
fn test_api_timeout_never_undercuts_profile_timeout() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("PROFILE_TIMEOUT_MS", "5000");
            env::set_var("API_TIMEOUT_MS", "1000");
        }
        AppConfig::load()
    });

    assert_eq!(config.profile_timeout, Duration::from_millis(5000));
    assert_eq!(config.api_timeout, Duration::from_millis(5000));
}
