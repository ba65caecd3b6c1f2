//! A thin client for an OAuth2 authorization server's HTTP API.
//!
//! Every operation issues exactly one request and maps the response status to a
//! result: success values, `None`/`false` for a defined absence (404 on client
//! lookup and deletion), or a [`ClientError`] for anything else. There is no token
//! caching and no retrying.
//!
//! ```no_run
//! # async fn run() -> oauth2_client::error::Result<()> {
//! use oauth2_client::{CreateClientOptions, OAuth2Client};
//!
//! let client = OAuth2Client::from_env()?;
//! let created = client
//!     .create_client(CreateClientOptions::with_name("reporting"))
//!     .await?;
//! let token = client.get_user_token("alice", "hunter2").await?;
//! let info = client.get_user_info(&token.access_token).await?;
//! # let _ = (created, info);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod oauth2;
pub mod response;
pub mod transport;
pub mod utils;

pub use config::{ClientConfig, ClientCredentials, load_config, load_config_from};
pub use error::ClientError;
pub use oauth2::OAuth2Client;
pub use response::{Client, CreateClientOptions, UserInfo, UserToken};
pub use utils::{ToStringSafe, to_string_safe};
