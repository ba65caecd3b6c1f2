//! HTTP plumbing: the shared TLS configuration, the pooled hyper client and the
//! one-shot request/response types every endpoint call goes through.
//!
//! Non-success statuses are never turned into errors here; callers inspect
//! [`ApiResponse::status`] and decide what the code means for their operation.

use std::error::Error as StdError;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::ext::ReasonPhrase;
use hyper::{Method, Request, StatusCode, Uri, header};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use once_cell::sync::OnceCell;
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig as TlsClientConfig, RootCertStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::{Duration, Instant, timeout};

use crate::error::{ClientError, Result};

const USER_AGENT: &str = concat!("oauth2-client/", env!("CARGO_PKG_VERSION"));
const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

type HyperClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Shared TLS configuration, built once per process.
static TLS_CONFIG: OnceCell<Arc<TlsClientConfig>> = OnceCell::new();

/// Get the shared TLS client configuration (webpki roots, no client auth).
///
/// Uses the process-wide default crypto provider when one is installed and falls back
/// to aws-lc-rs otherwise.
pub fn shared_tls_config() -> Result<Arc<TlsClientConfig>> {
    TLS_CONFIG
        .get_or_try_init(|| {
            let mut root_cert_store = RootCertStore::empty();
            root_cert_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

            let provider = CryptoProvider::get_default()
                .cloned()
                .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()));

            let config = TlsClientConfig::builder_with_provider(provider)
                .with_safe_default_protocol_versions()
                .map_err(|e| ClientError::Tls(e.to_string()))?
                .with_root_certificates(root_cert_store)
                .with_no_client_auth();

            Ok(Arc::new(config))
        })
        .cloned()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RequestBody {
    Empty,
    Json(Bytes),
    Form(Bytes),
}

/// A single request against the authorization server.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) url: String,
    authorization: String,
    pub(crate) body: RequestBody,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, url: String, authorization: String) -> Self {
        Self {
            method,
            url,
            authorization,
            body: RequestBody::Empty,
        }
    }

    pub(crate) fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let encoded =
            serde_json::to_vec(body).map_err(|e| ClientError::Request(e.to_string()))?;
        self.body = RequestBody::Json(Bytes::from(encoded));
        Ok(self)
    }

    /// Form-encodes `body`; field order follows the serialized order.
    pub(crate) fn form<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let encoded =
            serde_urlencoded::to_string(body).map_err(|e| ClientError::Request(e.to_string()))?;
        self.body = RequestBody::Form(Bytes::from(encoded));
        Ok(self)
    }

    fn into_hyper(self) -> Result<Request<Full<Bytes>>> {
        let uri = self
            .url
            .parse::<Uri>()
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.url)))?;

        let builder = Request::builder()
            .method(self.method)
            .uri(uri)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, CONTENT_TYPE_JSON)
            .header(header::AUTHORIZATION, self.authorization);

        let request = match self.body {
            RequestBody::Empty => builder.body(Full::new(Bytes::new())),
            RequestBody::Json(bytes) => builder
                .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
                .body(Full::new(bytes)),
            RequestBody::Form(bytes) => builder
                .header(header::CONTENT_TYPE, CONTENT_TYPE_FORM)
                .body(Full::new(bytes)),
        };
        request.map_err(|e| ClientError::Request(e.to_string()))
    }
}

/// Status, reason phrase and fully collected body of a response.
#[derive(Debug, Clone)]
pub(crate) struct ApiResponse {
    pub(crate) status: StatusCode,
    reason: Option<String>,
    body: Bytes,
}

impl ApiResponse {
    pub(crate) fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| ClientError::Json(e.to_string()))
    }

    pub(crate) fn into_unexpected(self) -> ClientError {
        tracing::debug!(
            name = "transport.unexpected_status",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            status = self.status.as_u16(),
            message = "Server answered with an unexpected status"
        );
        ClientError::unexpected(self.status, self.reason.as_deref())
    }
}

/// Pooled HTTP(S) client with a fixed per-request timeout. Cloning is cheap and
/// shares the underlying connection pool.
#[derive(Clone)]
pub(crate) struct HttpTransport {
    client: HyperClient,
    timeout: Duration,
}

impl HttpTransport {
    pub(crate) fn new(timeout: Duration) -> Result<Self> {
        let tls = shared_tls_config()?;
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config((*tls).clone())
            .https_or_http()
            .enable_http1()
            .build();
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Ok(Self { client, timeout })
    }

    /// Send `request` and collect the whole response. The timeout covers connecting,
    /// sending and reading the body.
    #[tracing::instrument(
        name = "transport_send",
        level = "debug",
        skip(self, request),
        fields(method = %request.method, url = %request.url)
    )]
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let started = Instant::now();
        let request = request.into_hyper()?;

        let exchange = async {
            let response = self
                .client
                .request(request)
                .await
                .map_err(|e| ClientError::Network(describe(&e)))?;
            let status = response.status();
            let reason = response
                .extensions()
                .get::<ReasonPhrase>()
                .and_then(|r| std::str::from_utf8(r.as_bytes()).ok())
                .map(str::to_string);
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| ClientError::Network(describe(&e)))?
                .to_bytes();
            Ok::<_, ClientError>(ApiResponse {
                status,
                reason,
                body,
            })
        };

        let response = timeout(self.timeout, exchange)
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;

        tracing::debug!(
            name = "transport.response",
            target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
            status = response.status.as_u16(),
            body_len = response.body.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            message = "Received response"
        );
        Ok(response)
    }
}

/// Error message including its source chain; hyper's top-level messages alone
/// ("client error (Connect)") say little.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
