use crate::{
    auth::{password::PasswordSource, refresh::RefreshTokenSource},
    client::NetatmoClient,
    config::Credentials,
    error::ApiError,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod password;
pub mod refresh;

/// OAuth2 scope needed to read weather station data.
pub const READ_STATION_SCOPE: &str = "read_station";

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    /// Credentials to use for the next run. Differs from the input only for
    /// grants that rotate their secret.
    pub credentials: Credentials,
}

impl Session {
    pub fn needs_persisting(&self) -> bool {
        self.credentials.rotates()
    }
}

#[async_trait]
pub trait CredentialSource: Send + Sync + Debug {
    async fn authenticate(&self, client: &NetatmoClient) -> Result<Session, ApiError>;
}

/// Construct the credential source matching the configured variant.
pub fn source_from_credentials(credentials: Credentials) -> Box<dyn CredentialSource> {
    match credentials {
        Credentials::RefreshToken {
            client_id,
            client_secret,
            refresh_token,
        } => Box::new(RefreshTokenSource::new(
            client_id,
            client_secret,
            refresh_token,
        )),
        Credentials::Password {
            client_id,
            client_secret,
            username,
            password,
        } => Box::new(PasswordSource::new(
            client_id,
            client_secret,
            username,
            password,
        )),
    }
}
