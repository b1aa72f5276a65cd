use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration stored on disk.
///
/// Example TOML (refresh-token flow):
/// ```toml
/// client_id = "..."
/// client_secret = "..."
/// refresh_token = "..."
/// ```
///
/// The password flow replaces `refresh_token` with `username` and `password`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Validated credentials, one variant per supported grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    Password {
        client_id: String,
        client_secret: String,
        username: String,
        password: String,
    },
}

impl Credentials {
    /// Whether a successful authentication produces a value that must be written back.
    pub fn rotates(&self) -> bool {
        matches!(self, Credentials::RefreshToken { .. })
    }
}

fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Pick the credential variant. Exactly one of them must be configured.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let client_id = field(&self.client_id)
            .ok_or(ConfigError::MissingField("client_id"))?
            .to_string();
        let client_secret = field(&self.client_secret)
            .ok_or(ConfigError::MissingField("client_secret"))?
            .to_string();

        let refresh_token = field(&self.refresh_token);
        let login = match (field(&self.username), field(&self.password)) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            _ => return Err(ConfigError::IncompletePassword),
        };

        match (refresh_token, login) {
            (Some(_), Some(_)) => Err(ConfigError::AmbiguousCredentials),
            (None, None) => Err(ConfigError::MissingCredentials),
            (Some(refresh_token), None) => Ok(Credentials::RefreshToken {
                client_id,
                client_secret,
                refresh_token: refresh_token.to_string(),
            }),
            (None, Some((username, password))) => Ok(Credentials::Password {
                client_id,
                client_secret,
                username: username.to_string(),
                password: password.to_string(),
            }),
        }
    }

    /// Overwrite the credential fields with `credentials`.
    pub fn set_credentials(&mut self, credentials: &Credentials) {
        match credentials {
            Credentials::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => {
                self.client_id = Some(client_id.clone());
                self.client_secret = Some(client_secret.clone());
                self.refresh_token = Some(refresh_token.clone());
            }
            Credentials::Password {
                client_id,
                client_secret,
                username,
                password,
            } => {
                self.client_id = Some(client_id.clone());
                self.client_secret = Some(client_secret.clone());
                self.username = Some(username.clone());
                self.password = Some(password.clone());
            }
        }
    }
}

/// A config together with the file it was read from and is written back to.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    pub config: Config,
}

impl ConfigFile {
    /// Locations searched, in order: `./config.toml`, then `~/.config/netatmo/config.toml`.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dirs) = BaseDirs::new() {
            paths.push(
                dirs.home_dir()
                    .join(".config")
                    .join("netatmo")
                    .join(CONFIG_FILE_NAME),
            );
        }
        paths
    }

    /// First candidate that exists and is a regular file.
    pub fn discover() -> Result<PathBuf, ConfigError> {
        Self::discover_in(Self::candidate_paths())
    }

    pub fn discover_in(candidates: Vec<PathBuf>) -> Result<PathBuf, ConfigError> {
        match candidates.iter().position(|path| path.is_file()) {
            Some(index) => Ok(candidates[index].clone()),
            None => Err(ConfigError::NotFound { searched: candidates }),
        }
    }

    /// Discover and load the config file.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::discover()?;
        Self::load_from(path)
    }

    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        debug!(path = %path.display(), "reading config");

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        let config = Config::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the whole file with the current config.
    pub fn save(&self) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(&self.config)?;

        fs::write(&self.path, toml).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(path = %self.path.display(), "config written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        Config::from_toml(toml).expect("valid toml")
    }

    #[test]
    fn refresh_token_variant() {
        let cfg = config(
            r#"
            client_id = "id"
            client_secret = "secret"
            refresh_token = "rt"
            "#,
        );

        let creds = cfg.credentials().expect("refresh token credentials");
        assert_eq!(
            creds,
            Credentials::RefreshToken {
                client_id: "id".into(),
                client_secret: "secret".into(),
                refresh_token: "rt".into(),
            }
        );
        assert!(creds.rotates());
    }

    #[test]
    fn password_variant() {
        let cfg = config(
            r#"
            client_id = "id"
            client_secret = "secret"
            username = "me@example.com"
            password = "hunter2"
            "#,
        );

        let creds = cfg.credentials().expect("password credentials");
        assert!(matches!(
            creds,
            Credentials::Password { ref username, .. } if username == "me@example.com"
        ));
        assert!(!creds.rotates());
    }

    #[test]
    fn both_variants_are_rejected() {
        let cfg = config(
            r#"
            client_id = "id"
            client_secret = "secret"
            refresh_token = "rt"
            username = "me"
            password = "pw"
            "#,
        );

        let err = cfg.credentials().unwrap_err();
        assert!(matches!(err, ConfigError::AmbiguousCredentials));
    }

    #[test]
    fn neither_variant_is_rejected() {
        let cfg = config(
            r#"
            client_id = "id"
            client_secret = "secret"
            refresh_token = ""
            "#,
        );

        let err = cfg.credentials().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));
    }

    #[test]
    fn lone_username_is_rejected() {
        let cfg = config(
            r#"
            client_id = "id"
            client_secret = "secret"
            username = "me"
            "#,
        );

        assert!(matches!(
            cfg.credentials().unwrap_err(),
            ConfigError::IncompletePassword
        ));
    }

    #[test]
    fn client_fields_are_required() {
        let cfg = config(r#"refresh_token = "rt""#);
        let err = cfg.credentials().unwrap_err();
        assert!(err.to_string().contains("client_id"));
    }

    #[test]
    fn set_credentials_rotates_refresh_token_only() {
        let mut cfg = config(
            r#"
            client_id = "id"
            client_secret = "secret"
            refresh_token = "old"
            "#,
        );

        cfg.set_credentials(&Credentials::RefreshToken {
            client_id: "id".into(),
            client_secret: "secret".into(),
            refresh_token: "new".into(),
        });

        assert_eq!(cfg.refresh_token.as_deref(), Some("new"));
        assert_eq!(cfg.username, None);

        let written = toml::to_string_pretty(&cfg).expect("serializable");
        assert!(written.contains(r#"refresh_token = "new""#));
        assert!(!written.contains("username"));
    }

    #[test]
    fn candidates_start_with_working_directory() {
        let paths = ConfigFile::candidate_paths();
        assert_eq!(paths[0], PathBuf::from("config.toml"));
        if let Some(home) = paths.get(1) {
            assert!(home.ends_with(".config/netatmo/config.toml"));
        }
    }

    #[test]
    fn discover_reports_searched_paths_when_nothing_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let candidates = vec![dir.path().join("config.toml"), dir.path().join("other.toml")];

        match ConfigFile::discover_in(candidates.clone()) {
            Err(ConfigError::NotFound { searched }) => assert_eq!(searched, candidates),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn discover_skips_directories_and_keeps_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let as_dir = dir.path().join("cwd").join("config.toml");
        fs::create_dir_all(&as_dir).expect("create directory named config.toml");
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        fs::write(&first, "").expect("write first");
        fs::write(&second, "").expect("write second");

        let found = ConfigFile::discover_in(vec![as_dir, first.clone(), second])
            .expect("a regular file exists");
        assert_eq!(found, first);
    }

    #[test]
    fn save_into_missing_directory_is_a_write_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "client_id = \"id\"\n").expect("write config");
        let config_file = ConfigFile::load_from(&path).expect("load config");
        drop(dir);

        let err = config_file.save().unwrap_err();
        assert!(matches!(err, ConfigError::Write { .. }), "{err:?}");
    }
}
