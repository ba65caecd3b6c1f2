//! Wire types exchanged with the authorization server.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::{ClientError, Result};
use crate::utils::ToStringSafe;

/// An OAuth2 client application registered with the authorization server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub client_id: String,
    /// Display name, if the client has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Options for [`crate::OAuth2Client::create_client`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateClientOptions {
    /// Display name; ignored when blank.
    pub name: Option<String>,
}

impl CreateClientOptions {
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
struct CreateClientData {
    name: String,
}

/// Request body of `POST oauth/clients`: `{"data":{"name":...}}` or `{}`.
#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct CreateClientBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<CreateClientData>,
}

impl From<&CreateClientOptions> for CreateClientBody {
    fn from(opts: &CreateClientOptions) -> Self {
        let name = opts.name.to_string_safe().trim().to_string();
        Self {
            data: (!name.is_empty()).then_some(CreateClientData { name }),
        }
    }
}

/// Access token obtained through the password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct UserToken {
    pub access_token: String,
    /// Absolute expiry instant, always in UTC.
    pub access_token_expires_at: OffsetDateTime,
}

impl UserToken {
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now >= self.access_token_expires_at
    }
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserToken")
            .field("access_token", &"<redacted>")
            .field("access_token_expires_at", &self.access_token_expires_at)
            .finish()
    }
}

/// Raw body of a successful `POST oauth/token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    access_token_expires_at: serde_json::Value,
}

impl TokenResponse {
    pub(crate) fn into_user_token(self) -> Result<UserToken> {
        Ok(UserToken {
            access_token: self.access_token.to_string_safe(),
            access_token_expires_at: parse_timestamp(&self.access_token_expires_at)?,
        })
    }
}

/// Result of `GET userinfo`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Interpret a timestamp sent by the server as a UTC instant.
///
/// Accepts RFC 3339 strings (any offset), date-times without an offset (taken as
/// UTC) and numbers of milliseconds since the Unix epoch.
pub fn parse_timestamp(value: &serde_json::Value) -> Result<OffsetDateTime> {
    match value {
        serde_json::Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(at) = OffsetDateTime::parse(raw, &Rfc3339) {
                return Ok(at.to_offset(UtcOffset::UTC));
            }
            let naive = format_description!(
                "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
            );
            PrimitiveDateTime::parse(raw, naive)
                .map(PrimitiveDateTime::assume_utc)
                .map_err(|e| ClientError::InvalidTimestamp(format!("{raw:?}: {e}")))
        }
        serde_json::Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(millis) => i128::from(millis),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i128)
                    .ok_or_else(|| ClientError::InvalidTimestamp(n.to_string()))?,
            };
            let nanos = millis
                .checked_mul(1_000_000)
                .ok_or_else(|| ClientError::InvalidTimestamp(n.to_string()))?;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map_err(|e| ClientError::InvalidTimestamp(format!("{n}: {e}")))
        }
        other => Err(ClientError::InvalidTimestamp(other.to_string())),
    }
}
