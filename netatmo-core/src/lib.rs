//! Core library for the `netatmo` status CLI.
//!
//! This crate defines:
//! - Configuration discovery, credential validation and persistence
//! - Credential sources for the supported OAuth2 grants
//! - A thin client for the Netatmo token and station-data endpoints
//! - Classification and formatting of station modules for display
//!
//! It is used by `netatmo-cli`, but the formatting half has no I/O
//! dependencies and can be reused on its own.

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod report;

pub use auth::{CredentialSource, Session};
pub use client::NetatmoClient;
pub use config::{Config, ConfigFile, Credentials};
pub use error::{ApiError, ConfigError};
pub use model::{MeasureValue, Module, ModuleType, Station};
