use hyper::{Method, StatusCode};

use super::OAuth2Client;
use crate::error::Result;
use crate::response::{Client, CreateClientBody, CreateClientOptions};
use crate::utils::encode_path_segment;

const CLIENTS_PATH: &str = "oauth/clients";

/// `oauth/clients/{id}` with the trimmed id percent-encoded as one segment.
fn client_path(id: &str) -> String {
    format!("{CLIENTS_PATH}/{}", encode_path_segment(id.trim()))
}

impl OAuth2Client {
    /// Register a new client. A blank `opts.name` is left out of the request.
    #[tracing::instrument(name = "create_client", skip(self))]
    pub async fn create_client(&self, opts: CreateClientOptions) -> Result<Client> {
        let request = self
            .admin_request(Method::POST, CLIENTS_PATH)
            .json(&CreateClientBody::from(&opts))?;
        let response = self.send(request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.into_unexpected()),
        }
    }

    /// Fetch a client by id; `Ok(None)` when the server answers 404.
    #[tracing::instrument(name = "get_client", skip(self))]
    pub async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let request = self.admin_request(Method::GET, &client_path(id));
        let response = self.send(request).await?;

        match response.status {
            StatusCode::OK => response.json().map(Some),
            StatusCode::NOT_FOUND => {
                tracing::debug!(
                    name = "clients.get_client.not_found",
                    target = concat!(env!("CARGO_PKG_NAME"), "::", module_path!()),
                    client_id = %id.trim(),
                    message = "Client not found"
                );
                Ok(None)
            }
            _ => Err(response.into_unexpected()),
        }
    }

    /// Delete a client by id. Returns `false` if there was no such client.
    #[tracing::instrument(name = "delete_client", skip(self))]
    pub async fn delete_client(&self, id: &str) -> Result<bool> {
        let request = self.admin_request(Method::DELETE, &client_path(id));
        let response = self.send(request).await?;

        match response.status {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(response.into_unexpected()),
        }
    }

    #[tracing::instrument(name = "get_clients", skip(self))]
    pub async fn get_clients(&self) -> Result<Vec<Client>> {
        let request = self.admin_request(Method::GET, CLIENTS_PATH);
        let response = self.send(request).await?;

        match response.status {
            StatusCode::OK => response.json(),
            _ => Err(response.into_unexpected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_are_trimmed_and_encoded() {
        assert_eq!(client_path(" abc "), "oauth/clients/abc");
        assert_eq!(client_path("a/b c"), "oauth/clients/a%2Fb%20c");
        assert_eq!(client_path(""), "oauth/clients/");
    }
}
