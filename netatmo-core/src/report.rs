use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use tracing::{debug, info, warn};

use crate::{
    auth::{Session, source_from_credentials},
    classify::classify,
    client::NetatmoClient,
    config::ConfigFile,
    format::{SEPARATOR, status_header, write_details},
    model::Station,
};

/// Header, separator and module details of one station.
pub fn write_station<W: Write>(
    out: &mut W,
    station: &Station,
    now: DateTime<Utc>,
) -> io::Result<()> {
    let classified = classify(&station.modules);

    writeln!(out, "{}", status_header(&classified))?;
    writeln!(out, "{SEPARATOR}")?;
    write_details(out, &classified, now)
}

fn persist(config_file: &mut ConfigFile, session: &Session) -> Result<()> {
    config_file.config.set_credentials(&session.credentials);
    config_file.save().context("Failed to persist refreshed credentials")?;
    info!(path = %config_file.path().display(), "credentials saved");
    Ok(())
}

/// Authenticate, fetch every station and print its report to `out`.
///
/// Rotating credentials are written back to `config_file` as soon as the
/// token exchange succeeds, since the old refresh token is already spent,
/// and again after each station.
pub async fn run<W: Write>(
    config_file: &mut ConfigFile,
    client: &NetatmoClient,
    out: &mut W,
) -> Result<()> {
    let credentials = config_file
        .config
        .credentials()
        .with_context(|| format!("Invalid credentials in {}", config_file.path().display()))?;

    let source = source_from_credentials(credentials);
    debug!(?source, "authenticating");

    let session = source.authenticate(client).await.context("Authentication failed")?;
    if session.needs_persisting() {
        persist(config_file, &session)?;
    }

    let stations = client
        .stations(&session.access_token)
        .await
        .context("Failed to fetch station data")?;

    if stations.is_empty() {
        warn!("account has no weather station");
    }

    let now = Utc::now();
    for station in &stations {
        debug!(
            id = %station.id,
            station = %station.name,
            modules = station.modules.len(),
            "reporting station"
        );
        write_station(out, station, now).context("Failed to write report")?;

        if session.needs_persisting() {
            persist(config_file, &session)?;
        }
    }

    out.flush().context("Failed to write report")?;
    Ok(())
}
