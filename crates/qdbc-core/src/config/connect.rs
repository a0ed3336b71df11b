//! Connection options for a QuestDB server.
//!
//! Unset options fall back to the QuestDB defaults. As with the server's own
//! tooling, an empty string or a zero port counts as unset.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use url::Url;

use super::ConfigError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8812;
pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "quest";
pub const DEFAULT_DATABASE: &str = "main";

/// Flat connection configuration.
///
/// Known keys are typed fields; every other key lands in `options` and is
/// forwarded verbatim as a connection parameter. In YAML, option values may
/// be written as strings, numbers or booleans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawConnectConfig")]
pub struct ConnectConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable containing the password. Takes precedence over
    /// `password` when the variable is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Unrecognized options, passed through to the driver.
    #[serde(flatten)]
    pub options: BTreeMap<String, String>,
}

impl ConnectConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Build a configuration from a flat mapping of named options.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            config.set(key.into(), value.into())?;
        }
        Ok(config)
    }

    /// Set a single named option.
    pub fn set(&mut self, key: String, value: String) -> Result<(), ConfigError> {
        match key.as_str() {
            "host" => self.host = Some(value),
            "port" => {
                let port = value
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidOption {
                        key: key.clone(),
                        value: value.clone(),
                    })?;
                self.port = Some(port);
            }
            "username" => self.username = Some(value),
            "password" => self.password = Some(value),
            "password_env" => self.password_env = Some(value),
            "database" => self.database = Some(value),
            _ => {
                self.options.insert(key, value);
            }
        }
        Ok(())
    }

    /// Overlay `other` on top of `self`. Options set in `other` win.
    pub fn merge(mut self, other: ConnectConfig) -> Self {
        if other.host.is_some() {
            self.host = other.host;
        }
        if other.port.is_some() {
            self.port = other.port;
        }
        if other.username.is_some() {
            self.username = other.username;
        }
        if other.password.is_some() {
            self.password = other.password;
        }
        if other.password_env.is_some() {
            self.password_env = other.password_env;
        }
        if other.database.is_some() {
            self.database = other.database;
        }
        self.options.extend(other.options);
        self
    }

    pub fn host(&self) -> &str {
        non_empty(&self.host).unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        match self.port {
            Some(port) if port != 0 => port,
            _ => DEFAULT_PORT,
        }
    }

    pub fn username(&self) -> &str {
        non_empty(&self.username).unwrap_or(DEFAULT_USERNAME)
    }

    pub fn database(&self) -> &str {
        non_empty(&self.database).unwrap_or(DEFAULT_DATABASE)
    }

    /// Resolve the password, checking `password_env` first.
    pub fn password(&self) -> String {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
            && !password.is_empty()
        {
            return password;
        }
        non_empty(&self.password)
            .unwrap_or(DEFAULT_PASSWORD)
            .to_string()
    }

    /// `host:port/database`, safe to log.
    pub fn target(&self) -> String {
        format!("{}:{}/{}", self.host(), self.port(), self.database())
    }

    /// Build a `postgres://` URL with defaults applied and passthrough options
    /// appended as query parameters.
    pub fn connection_url(&self) -> Result<Url, ConfigError> {
        let host = self.host();
        let authority = if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port())
        } else {
            format!("{}:{}", host, self.port())
        };

        let mut url = Url::parse(&format!("postgres://{}", authority))?;
        let component_error = |component| ConfigError::UrlComponent {
            component,
            authority: authority.clone(),
        };
        url.set_username(self.username())
            .map_err(|_| component_error("username"))?;
        url.set_password(Some(&self.password()))
            .map_err(|_| component_error("password"))?;
        url.path_segments_mut()
            .map_err(|_| component_error("database"))?
            .push(self.database());

        if !self.options.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in &self.options {
                query.append_pair(key, value);
            }
        }

        tracing::debug!(
            target_db = %self.target(),
            passthrough = self.options.len(),
            "Built connection URL"
        );

        Ok(url)
    }
}

/// On-disk shape of [`ConnectConfig`], before option values are normalized.
#[derive(Deserialize)]
struct RawConnectConfig {
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    port: Option<u16>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    password_env: Option<String>,
    #[serde(default)]
    database: Option<String>,
    #[serde(flatten)]
    options: BTreeMap<String, serde_yaml::Value>,
}

impl TryFrom<RawConnectConfig> for ConnectConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConnectConfig) -> Result<Self, Self::Error> {
        let mut options = BTreeMap::new();
        for (key, value) in raw.options {
            let text = match value {
                serde_yaml::Value::Null => continue,
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                other => {
                    return Err(ConfigError::InvalidOption {
                        key,
                        value: format!("{:?}", other),
                    });
                }
            };
            options.insert(key, text);
        }

        Ok(Self {
            host: raw.host,
            port: raw.port,
            username: raw.username,
            password: raw.password,
            password_env: raw.password_env,
            database: raw.database,
            options,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
