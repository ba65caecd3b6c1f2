use std::time::Duration;

use oauth2_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use oauth2_client::{ClientConfig, ClientCredentials, OAuth2Client, load_config_from};

#[test]
fn test_load_config_from_full_environment() {
    let config = load_config_from([
        ("OAUTH2_URL", "https://auth.example.com"),
        ("OAUTH2_KEY", " admin-key "),
        ("OAUTH2_CLIENT_ID", " my-app\n"),
        ("OAUTH2_CLIENT_SECRET", "\tmy-secret "),
    ])
    .expect("Failed to load config");

    assert_eq!(config.base_url(), "https://auth.example.com/");
    assert_eq!(config.admin_key(), "admin-key");
    assert_eq!(
        config.client_credentials(),
        &ClientCredentials {
            client_id: "my-app".to_string(),
            client_secret: "my-secret".to_string(),
        }
    );
    assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
}

#[test]
fn test_load_config_from_empty_environment() {
    let config = load_config_from(Vec::<(String, String)>::new()).expect("Failed to load config");

    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
    assert_eq!(config.admin_key(), "");
    assert_eq!(config.client_credentials(), &ClientCredentials::default());
}

#[test]
fn test_load_config_blank_url_uses_default() {
    let config = load_config_from([("OAUTH2_URL", "   ")]).expect("Failed to load config");
    assert_eq!(config.base_url(), "http://localhost:3000/");
}

#[test]
fn test_load_config_keeps_existing_trailing_slash() {
    let config =
        load_config_from([("OAUTH2_URL", "http://auth.local/api/")]).expect("Failed to load config");
    assert_eq!(config.base_url(), "http://auth.local/api/");
    assert_eq!(config.endpoint("oauth/token"), "http://auth.local/api/oauth/token");
}

#[test]
fn test_load_config_ignores_unrelated_variables() {
    let config = load_config_from([
        ("OAUTH2_KEY", "k"),
        ("OAUTH2_SOMETHING_ELSE", "x"),
        ("PATH", "/usr/bin"),
    ])
    .expect("Failed to load config");

    assert_eq!(config.admin_key(), "k");
    assert_eq!(config.base_url(), DEFAULT_BASE_URL);
}

#[test]
fn test_builder_applies_same_normalization() {
    let config = ClientConfig::new("http://auth.local")
        .with_admin_key("  k  ")
        .with_client_credentials(ClientCredentials::new(" id ", " secret "))
        .with_timeout(Duration::from_secs(3));

    assert_eq!(config.base_url(), "http://auth.local/");
    assert_eq!(config.admin_key(), "k");
    assert_eq!(config.client_credentials().client_id, "id");
    assert_eq!(config.client_credentials().client_secret, "secret");
    assert_eq!(config.timeout(), Duration::from_secs(3));
}

#[tokio::test]
async fn test_client_keeps_resolved_config() {
    let config = load_config_from([("OAUTH2_URL", "http://auth.local:8080")]).unwrap();
    let client = OAuth2Client::new(config).unwrap();

    assert_eq!(client.config().base_url(), "http://auth.local:8080/");
    assert!(!format!("{client:?}").is_empty());
}
