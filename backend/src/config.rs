//! Process configuration, read once at startup from the environment.
//!
//! | Variable             | Default                                                  |
//! |----------------------|----------------------------------------------------------|
//! | `HOST`               | `localhost`                                              |
//! | `PORT`               | `8000`                                                   |
//! | `WORKERS`            | number of CPUs                                           |
//! | `MODEL_ENDPOINT`     | `http://localhost:8501/v1/models/potato_model:predict`   |
//! | `CLASS_LABELS`       | `Early_blight,Late_blight,healthy`                       |
//! | `MODEL_OUTPUT_WIDTH` | unset (width checked per response only)                  |
//! | `MAX_UPLOAD_BYTES`   | `10485760`                                               |

use std::str::FromStr;

use crate::error::ConfigError;
use crate::labels::ClassLabels;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL_ENDPOINT: &str = "http://localhost:8501/v1/models/potato_model:predict";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub model_endpoint: String,
    pub class_labels: ClassLabels,
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub max_upload_bytes: usize,
    /// Number of scores the model is known to emit, if configured.
    pub expected_outputs: Option<usize>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            model_endpoint: DEFAULT_MODEL_ENDPOINT.to_string(),
            class_labels: ClassLabels::default(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            workers: num_cpus::get(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            expected_outputs: None,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds and validates a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let model_endpoint = lookup("MODEL_ENDPOINT")
            .map(|v| v.trim().to_string())
            .unwrap_or(defaults.model_endpoint);
        if model_endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }

        let class_labels = match lookup("CLASS_LABELS") {
            Some(list) => ClassLabels::parse(&list)?,
            None => defaults.class_labels,
        };

        let config = Self {
            model_endpoint,
            class_labels,
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            workers: parse_var(&lookup, "WORKERS", defaults.workers)?,
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?,
            expected_outputs: match lookup("MODEL_OUTPUT_WIDTH") {
                Some(raw) => Some(parse_value("MODEL_OUTPUT_WIDTH", &raw)?),
                None => None,
            },
        };

        if config.workers == 0 {
            return Err(ConfigError::InvalidVar {
                name: "WORKERS",
                value: "0".to_string(),
            });
        }
        if config.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidVar {
                name: "MAX_UPLOAD_BYTES",
                value: "0".to_string(),
            });
        }
        if let Some(outputs) = config.expected_outputs {
            config.class_labels.validate_width(outputs)?;
        }

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(raw) => parse_value(name, &raw),
        None => Ok(default),
    }
}

fn parse_value<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidVar {
        name,
        value: raw.to_string(),
    })
}
