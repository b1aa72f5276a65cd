use async_trait::async_trait;
use std::fmt;

use crate::{client::NetatmoClient, config::Credentials, error::ApiError};

use super::{CredentialSource, READ_STATION_SCOPE, Session};

/// Resource-owner password grant. The stored credentials never change.
#[derive(Clone)]
pub struct PasswordSource {
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
}

impl PasswordSource {
    pub fn new(
        client_id: String,
        client_secret: String,
        username: String,
        password: String,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            username,
            password,
        }
    }
}

impl fmt::Debug for PasswordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordSource")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialSource for PasswordSource {
    async fn authenticate(&self, client: &NetatmoClient) -> Result<Session, ApiError> {
        let token = client
            .request_token(&[
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("scope", READ_STATION_SCOPE),
            ])
            .await?;

        Ok(Session {
            access_token: token.access_token,
            credentials: Credentials::Password {
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
                username: self.username.clone(),
                password: self.password.clone(),
            },
        })
    }
}
