use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use super::*;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
api_url = "https://clinica.example/api"
request_timeout_secs = 5
"#,
    )
    .expect("parse");

    assert_eq!(settings.api_url, "https://clinica.example/api");
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
    assert_eq!(settings.api_token, None);
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "request_timeout_secs = \"soon\"").is_err());
    assert_eq!(settings, Settings::default());
}

#[test]
fn prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[
            ("ADMIN_API_URL", "http://plain:3000"),
            ("APP__API_URL", "http://prefixed:3000"),
            ("ADMIN_API_TOKEN", "abc"),
        ]),
    );

    assert_eq!(settings.api_url, "http://prefixed:3000");
    assert_eq!(settings.api_token.as_deref(), Some("abc"));
}

#[test]
fn blank_token_and_bad_timeout_are_ignored() {
    let mut settings = Settings {
        api_token: Some("from-file".into()),
        ..Settings::default()
    };
    apply_env(
        &mut settings,
        env_from(&[("APP__API_TOKEN", "  "), ("APP__REQUEST_TIMEOUT_SECS", "never")]),
    );

    assert_eq!(settings.api_token, None);
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("admin_console_missing_{suffix}.toml"));

    let settings = load_settings(&path).expect("load");

    assert!(!settings.api_url.is_empty());
}

#[test]
fn reads_settings_file_from_disk() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("admin_console_{suffix}.toml"));
    fs::write(&path, "request_timeout_secs = 12\n").expect("write");

    let settings = load_settings(&path);
    fs::remove_file(&path).expect("cleanup");

    let settings = settings.expect("load");
    if env::var("APP__REQUEST_TIMEOUT_SECS").is_err() {
        assert_eq!(settings.request_timeout_secs, 12);
    }
}
