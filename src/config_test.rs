use std::collections::HashMap;

use super::*;

fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
    let env: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    AppConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_to_demo_mode() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.form, FormConfig::default());
    assert_eq!(cfg.form.debounce, Duration::from_millis(500));
    assert_eq!(
        cfg.auth,
        AuthConfig::Demo {
            identifier: "test@example.com".into(),
            secret: "Password123".into(),
            latency: Duration::from_millis(DEFAULT_DEMO_LATENCY_MS),
        }
    );
}

#[test]
fn parses_demo_overrides() {
    let cfg = config_from(&[
        ("LOGIN_DEBOUNCE_MS", "250"),
        ("AUTH_DEMO_IDENTIFIER", "demo@example.org"),
        ("AUTH_DEMO_SECRET", "Secret999"),
        ("AUTH_DEMO_LATENCY_MS", "0"),
    ])
    .unwrap();
    assert_eq!(cfg.form.debounce, Duration::from_millis(250));
    assert_eq!(
        cfg.auth,
        AuthConfig::Demo { identifier: "demo@example.org".into(), secret: "Secret999".into(), latency: Duration::ZERO }
    );
}

#[test]
fn invalid_numbers_fall_back_to_defaults() {
    let cfg = config_from(&[("LOGIN_DEBOUNCE_MS", "soon"), ("AUTH_DEMO_LATENCY_MS", "-1")]).unwrap();
    assert_eq!(cfg.form.debounce, Duration::from_millis(DEFAULT_DEBOUNCE_MS));
    assert!(matches!(cfg.auth, AuthConfig::Demo { latency, .. } if latency == Duration::from_millis(1000)));
}

#[test]
fn http_mode_requires_url() {
    let err = config_from(&[("AUTH_MODE", "http")]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { ref var } if var == "AUTH_URL"));

    let err = config_from(&[("AUTH_MODE", "http"), ("AUTH_URL", "  ")]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { .. }));
}

#[test]
fn http_mode_parses_url_and_timeout() {
    let cfg = config_from(&[
        ("AUTH_MODE", "http"),
        ("AUTH_URL", "https://auth.example.test/login"),
        ("AUTH_TIMEOUT_SECS", "3"),
    ])
    .unwrap();
    assert_eq!(
        cfg.auth,
        AuthConfig::Http { url: "https://auth.example.test/login".into(), timeout: Duration::from_secs(3) }
    );
}

#[test]
fn unknown_mode_is_rejected() {
    let err = config_from(&[("AUTH_MODE", "ldap")]).unwrap_err();
    assert!(err.to_string().contains("unknown AUTH_MODE: ldap"));
}

#[test]
fn build_demo_authenticator_starts_signed_out() {
    let cfg = config_from(&[]).unwrap();
    let auth = cfg.auth.build().unwrap();
    assert!(!auth.is_authenticated());
}
