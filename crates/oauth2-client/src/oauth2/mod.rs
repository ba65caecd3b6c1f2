//! The client handle and the endpoint operations.
//! Modules:
//! - clients: admin operations on registered OAuth2 clients (Bearer admin key)
//! - users: password grant, token revocation (Basic client credentials) and userinfo

use std::sync::Arc;

use hyper::Method;

use crate::config::{ClientConfig, load_config};
use crate::error::Result;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};
use crate::utils::{basic_auth_value, bearer_auth_value};

pub mod clients;
pub mod users;

/// Handle to one authorization server.
///
/// Holds no mutable state; clones share the configuration and the connection pool
/// and may be used concurrently.
#[derive(Clone)]
pub struct OAuth2Client {
    config: Arc<ClientConfig>,
    transport: HttpTransport,
}

impl OAuth2Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.timeout())?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    /// Build a client from the `OAUTH2_*` environment variables (see [`load_config`]).
    pub fn from_env() -> Result<Self> {
        Self::new(load_config()?)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn admin_request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(
            method,
            self.config.endpoint(path),
            bearer_auth_value(self.config.admin_key()),
        )
    }

    fn client_credentials_request(&self, method: Method, path: &str) -> ApiRequest {
        let credentials = self.config.client_credentials();
        ApiRequest::new(
            method,
            self.config.endpoint(path),
            basic_auth_value(&credentials.client_id, &credentials.client_secret),
        )
    }

    fn bearer_request(&self, method: Method, path: &str, token: &str) -> ApiRequest {
        ApiRequest::new(method, self.config.endpoint(path), bearer_auth_value(token))
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.transport.send(request).await
    }
}

impl std::fmt::Debug for OAuth2Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth2Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
