use std::sync::Mutex;

use corezoid::Credentials;
use corezoid::auth::{self, CredentialStore};
use corezoid::consts::{LOGIN_ENV_VAR, SECRET_ENV_VAR};

/// Tests in this file mutate process env; they take this lock first.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with the credential variables set (or removed) as given,
/// restoring a clean environment afterwards.
fn with_env<T>(login: Option<&str>, secret: Option<&str>, f: impl FnOnce() -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: every env mutation in this binary happens under ENV_LOCK.
    unsafe {
        match login {
            Some(v) => std::env::set_var(LOGIN_ENV_VAR, v),
            None => std::env::remove_var(LOGIN_ENV_VAR),
        }
        match secret {
            Some(v) => std::env::set_var(SECRET_ENV_VAR, v),
            None => std::env::remove_var(SECRET_ENV_VAR),
        }
    }
    let out = f();
    unsafe {
        std::env::remove_var(LOGIN_ENV_VAR);
        std::env::remove_var(SECRET_ENV_VAR);
    }
    out
}

#[test]
fn from_env_reads_both_variables() {
    let creds = with_env(Some("env-login"), Some("env-secret"), Credentials::from_env).unwrap();
    assert_eq!(creds.login(), "env-login");
    assert_eq!(creds.secret(), "env-secret");
}

#[test]
fn missing_login_variable_is_validation_error() {
    let err = with_env(None, Some("env-secret"), Credentials::from_env).unwrap_err();
    assert_eq!(err.field(), Some("api_login"));
}

#[test]
fn missing_secret_variable_is_validation_error() {
    let err = with_env(Some("env-login"), None, Credentials::from_env).unwrap_err();
    assert_eq!(err.field(), Some("api_secret"));
}

#[test]
fn empty_secret_variable_is_rejected() {
    let err = with_env(Some("env-login"), Some(""), Credentials::from_env).unwrap_err();
    assert_eq!(err.field(), Some("api_secret"));
}

#[test]
fn empty_login_variable_is_rejected() {
    let err = with_env(Some(""), Some("env-secret"), Credentials::from_env).unwrap_err();
    assert_eq!(err.field(), Some("api_login"));
}

#[test]
fn resolve_falls_back_to_env_when_profile_missing() {
    let store = CredentialStore::open(":memory:").unwrap();
    let creds = with_env(Some("env-login"), Some("env-secret"), || {
        auth::resolve(Some(&store), "default")
    })
    .unwrap();
    assert_eq!(creds.login(), "env-login");
}

#[test]
fn resolve_without_store_uses_env() {
    let creds = with_env(Some("env-login"), Some("env-secret"), || {
        auth::resolve(None, "default")
    })
    .unwrap();
    assert_eq!(creds.login(), "env-login");
}

#[test]
fn resolve_prefers_stored_profile_over_env() {
    let store = CredentialStore::open(":memory:").unwrap();
    store
        .set("default", &Credentials::new("stored", "s").unwrap())
        .unwrap();

    let creds = with_env(Some("env-login"), Some("env-secret"), || {
        auth::resolve(Some(&store), "default")
    })
    .unwrap();
    assert_eq!(creds.login(), "stored");
}

#[test]
fn resolve_fails_when_nothing_is_configured() {
    let store = CredentialStore::open(":memory:").unwrap();
    let err = with_env(None, None, || auth::resolve(Some(&store), "default")).unwrap_err();
    assert_eq!(err.field(), Some("api_login"));
}
