use async_trait::async_trait;
use std::fmt;
use tracing::{debug, info};

use crate::{client::NetatmoClient, config::Credentials, error::ApiError};

use super::{CredentialSource, Session};

/// OAuth2 refresh-token grant. Every exchange may hand out a new refresh
/// token, which replaces the old one in the returned [`Session`].
#[derive(Clone)]
pub struct RefreshTokenSource {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}

impl RefreshTokenSource {
    pub fn new(client_id: String, client_secret: String, refresh_token: String) -> Self {
        Self {
            client_id,
            client_secret,
            refresh_token,
        }
    }
}

impl fmt::Debug for RefreshTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshTokenSource")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialSource for RefreshTokenSource {
    async fn authenticate(&self, client: &NetatmoClient) -> Result<Session, ApiError> {
        let token = client
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.refresh_token.as_str()),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .await?;

        let refresh_token = match token.refresh_token {
            Some(rotated) if !rotated.is_empty() => {
                if rotated != self.refresh_token {
                    info!("refresh token rotated");
                }
                rotated
            }
            _ => {
                debug!("token endpoint kept the current refresh token");
                self.refresh_token.clone()
            }
        };

        Ok(Session {
            access_token: token.access_token,
            credentials: Credentials::RefreshToken {
                client_id: self.client_id.clone(),
                client_secret: self.client_secret.clone(),
                refresh_token,
            },
        })
    }
}
