use hyper::{Method, StatusCode};
use serde::Serialize;

use super::OAuth2Client;
use crate::error::Result;
use crate::response::{TokenResponse, UserInfo, UserToken};

const TOKEN_PATH: &str = "oauth/token";
const REVOKE_PATH: &str = "oauth/token/revoke";
const USERINFO_PATH: &str = "userinfo";

#[derive(Serialize)]
struct PasswordGrantForm<'a> {
    grant_type: &'static str,
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RevokeForm<'a> {
    token: &'a str,
}

impl OAuth2Client {
    /// Exchange a user's credentials for an access token (password grant).
    ///
    /// Username and password are sent as given, empty values included.
    #[tracing::instrument(name = "get_user_token", skip(self, password))]
    pub async fn get_user_token(&self, username: &str, password: &str) -> Result<UserToken> {
        let form = PasswordGrantForm {
            grant_type: "password",
            username,
            password,
        };
        let request = self
            .client_credentials_request(Method::POST, TOKEN_PATH)
            .form(&form)?;
        let response = self.send(request).await?;

        match response.status {
            StatusCode::OK => response.json::<TokenResponse>()?.into_user_token(),
            _ => Err(response.into_unexpected()),
        }
    }

    #[tracing::instrument(name = "revoke_token", skip_all)]
    pub async fn revoke_token(&self, access_token: &str) -> Result<()> {
        let form = RevokeForm {
            token: access_token.trim(),
        };
        let request = self
            .client_credentials_request(Method::POST, REVOKE_PATH)
            .form(&form)?;
        let response = self.send(request).await?;

        match response.status {
            StatusCode::OK => Ok(()),
            _ => Err(response.into_unexpected()),
        }
    }

    /// Look up who `access_token` belongs to.
    #[tracing::instrument(name = "get_user_info", skip_all)]
    pub async fn get_user_info(&self, access_token: &str) -> Result<UserInfo> {
        let request = self.bearer_request(Method::GET, USERINFO_PATH, access_token.trim());
        let response = self.send(request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.into_unexpected()),
        }
    }
}
