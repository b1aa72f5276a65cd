use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failures while locating, validating or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config file found (looked in {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config field `{0}` is missing or empty")]
    MissingField(&'static str),

    #[error(
        "config holds both `refresh_token` and `username`/`password`; keep only one credential variant"
    )]
    AmbiguousCredentials,

    #[error("config holds neither `refresh_token` nor `username`/`password`")]
    MissingCredentials,

    #[error("`username` and `password` must be set together")]
    IncompletePassword,

    #[error("failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not write config file {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures talking to the weather API, token endpoint included.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse {endpoint} response")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
