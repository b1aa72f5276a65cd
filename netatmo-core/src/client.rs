use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::ApiError,
    model::{DashboardData, Module, ModuleType, Station},
};

pub const DEFAULT_BASE_URL: &str = "https://api.netatmo.net/";

const TOKEN_PATH: &str = "oauth2/token";
const STATIONS_PATH: &str = "api/getstationsdata";

/// Thin client for the token and station-data endpoints.
#[derive(Debug, Clone)]
pub struct NetatmoClient {
    base_url: String,
    http: Client,
}

impl Default for NetatmoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NetatmoClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST the given grant parameters to the OAuth2 token endpoint.
    pub async fn request_token(
        &self,
        params: &[(&str, &str)],
    ) -> Result<TokenResponse, ApiError> {
        const ENDPOINT: &str = "token";

        debug!(url = %self.url(TOKEN_PATH), "requesting access token");
        let res = self
            .http
            .post(self.url(TOKEN_PATH))
            .form(params)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        let token: TokenResponse = read_json(ENDPOINT, res).await?;
        debug!(expires_in = ?token.expires_in, "access token received");
        Ok(token)
    }

    /// Fetch every station visible to the access token.
    pub async fn stations(&self, access_token: &str) -> Result<Vec<Station>, ApiError> {
        const ENDPOINT: &str = "getstationsdata";

        debug!(url = %self.url(STATIONS_PATH), "fetching station data");
        let res = self
            .http
            .get(self.url(STATIONS_PATH))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;

        let parsed: StationsDataResponse = read_json(ENDPOINT, res).await?;
        let stations: Vec<Station> = parsed
            .body
            .devices
            .into_iter()
            .map(Station::from)
            .collect();

        debug!(count = stations.len(), "station data received");
        Ok(stations)
    }
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    res: reqwest::Response,
) -> Result<T, ApiError> {
    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| ApiError::Transport { endpoint, source })?;

    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint,
            status,
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

/// Successful answer of the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StationsDataResponse {
    body: StationsBody,
}

#[derive(Debug, Deserialize)]
struct StationsBody {
    #[serde(default)]
    devices: Vec<WireDevice>,
}

#[derive(Debug, Deserialize)]
struct WireDevice {
    #[serde(rename = "_id")]
    id: String,
    station_name: Option<String>,
    module_name: Option<String>,
    #[serde(rename = "type")]
    module_type: ModuleType,
    dashboard_data: Option<DashboardData>,
    wifi_status: Option<i64>,
    last_status_store: Option<i64>,
    #[serde(default)]
    modules: Vec<WireModule>,
}

#[derive(Debug, Deserialize)]
struct WireModule {
    #[serde(rename = "_id")]
    id: String,
    module_name: Option<String>,
    #[serde(rename = "type")]
    module_type: ModuleType,
    dashboard_data: Option<DashboardData>,
    battery_percent: Option<i64>,
    rf_status: Option<i64>,
    last_message: Option<i64>,
}

impl From<WireModule> for Module {
    fn from(m: WireModule) -> Self {
        Module {
            name: m.module_name.unwrap_or_else(|| m.id.clone()),
            id: m.id,
            module_type: m.module_type,
            dashboard: m.dashboard_data,
            battery_percent: m.battery_percent,
            rf_status: m.rf_status,
            wifi_status: None,
            last_message: m.last_message,
        }
    }
}

impl From<WireDevice> for Station {
    fn from(d: WireDevice) -> Self {
        let device_name = d.module_name.unwrap_or_else(|| d.id.clone());
        let main = Module {
            id: d.id.clone(),
            name: device_name.clone(),
            module_type: d.module_type,
            dashboard: d.dashboard_data,
            battery_percent: None,
            rf_status: None,
            wifi_status: d.wifi_status,
            last_message: d.last_status_store,
        };

        let mut modules: Vec<Module> = d.modules.into_iter().map(Module::from).collect();
        modules.push(main);

        Station {
            id: d.id,
            name: d.station_name.unwrap_or(device_name),
            modules,
        }
    }
}
