use std::fmt;
use std::time::Duration;

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::utils::ToStringSafe;

/// Used when `OAUTH2_URL` is unset or blank.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Prefix of the environment variables read by [`load_config`].
pub const ENV_PREFIX: &str = "OAUTH2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration build error: {0}")]
    Build(#[from] config::ConfigError),
}

/// Credentials of the application itself, sent as HTTP Basic auth to the token endpoints.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl ToStringSafe, client_secret: impl ToStringSafe) -> Self {
        Self {
            client_id: client_id.to_string_safe().trim().to_string(),
            client_secret: client_secret.to_string_safe().trim().to_string(),
        }
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Everything an [`crate::OAuth2Client`] needs, resolved once at construction.
///
/// The base URL always ends with exactly one `/` so relative endpoint paths can be
/// appended directly.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    admin_key: String,
    client_credentials: ClientCredentials,
    timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl ToStringSafe) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.to_string_safe()),
            admin_key: String::new(),
            client_credentials: ClientCredentials::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_admin_key(mut self, admin_key: impl ToStringSafe) -> Self {
        self.admin_key = admin_key.to_string_safe().trim().to_string();
        self
    }

    pub fn with_client_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.client_credentials = credentials;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn admin_key(&self) -> &str {
        &self.admin_key
    }

    pub fn client_credentials(&self) -> &ClientCredentials {
        &self.client_credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of an endpoint given relative to the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "admin_key",
                &if self.admin_key.is_empty() {
                    "<empty>"
                } else {
                    "<redacted>"
                },
            )
            .field("client_credentials", &self.client_credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Raw shape of the `OAUTH2_*` variables. Every value is optional; absent ones
/// resolve to empty strings and surface later as 401/403 from the server.
#[derive(Debug, Default, Deserialize)]
struct EnvConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    client_id: Option<String>,
    #[serde(default)]
    client_secret: Option<String>,
}

impl From<EnvConfig> for ClientConfig {
    fn from(env: EnvConfig) -> Self {
        ClientConfig::new(&env.url)
            .with_admin_key(&env.key)
            .with_client_credentials(ClientCredentials::new(&env.client_id, &env.client_secret))
    }
}

/// Appends a trailing `/` if missing and falls back to [`DEFAULT_BASE_URL`] for blank input.
pub fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();
    if url.is_empty() {
        url = DEFAULT_BASE_URL.to_string();
    }
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

/// Load the client configuration from the process environment.
///
/// A `.env` file in the working directory is loaded first when present; it never
/// overrides variables that are already set. The variables read are `OAUTH2_URL`,
/// `OAUTH2_KEY`, `OAUTH2_CLIENT_ID` and `OAUTH2_CLIENT_SECRET`.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(
            name = "config.dotenv_loaded",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            path = %path.display(),
            message = "Loaded .env file"
        );
    }
    build(Environment::with_prefix(ENV_PREFIX))
}

/// Same resolution rules as [`load_config`], but reading from the given variables
/// (full names, e.g. `OAUTH2_URL`) instead of the process environment.
pub fn load_config_from<I, K, V>(vars: I) -> Result<ClientConfig, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let vars: config::Map<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();
    build(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
}

fn build(source: Environment) -> Result<ClientConfig, ConfigError> {
    let cfg = Config::builder().add_source(source).build()?;
    let env: EnvConfig = cfg.try_deserialize()?;
    let config = ClientConfig::from(env);

    tracing::debug!(
        name = "config.resolved",
        target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
        base_url = %config.base_url(),
        has_admin_key = !config.admin_key().is_empty(),
        has_client_id = !config.client_credentials().client_id.is_empty(),
        message = "Resolved OAuth2 client configuration"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_base_url_uses_default() {
        assert_eq!(normalize_base_url(""), "http://localhost:3000/");
        assert_eq!(normalize_base_url("   "), "http://localhost:3000/");
    }

    #[test]
    fn trailing_slash_appended_once() {
        assert_eq!(
            normalize_base_url("https://auth.example.com"),
            "https://auth.example.com/"
        );
        assert_eq!(
            normalize_base_url("https://auth.example.com/api/"),
            "https://auth.example.com/api/"
        );
        assert_eq!(
            normalize_base_url(" https://auth.example.com/api "),
            "https://auth.example.com/api/"
        );
    }

    #[test]
    fn endpoint_joins_relative_paths() {
        let config = ClientConfig::new("http://127.0.0.1:9000/base");
        assert_eq!(
            config.endpoint("oauth/clients"),
            "http://127.0.0.1:9000/base/oauth/clients"
        );
        assert_eq!(config.endpoint("/userinfo"), "http://127.0.0.1:9000/base/userinfo");
    }

    #[test]
    fn credentials_are_trimmed() {
        let credentials = ClientCredentials::new(" id ", "\tsecret\n");
        assert_eq!(credentials.client_id, "id");
        assert_eq!(credentials.client_secret, "secret");
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let config = ClientConfig::default()
            .with_admin_key("super-secret-admin")
            .with_client_credentials(ClientCredentials::new("app", "super-secret-client"));
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret-admin"));
        assert!(!rendered.contains("super-secret-client"));
        assert!(rendered.contains("app"));
    }

    #[test]
    fn default_timeout_is_ten_seconds() {
        assert_eq!(ClientConfig::default().timeout(), Duration::from_secs(10));
    }
}
