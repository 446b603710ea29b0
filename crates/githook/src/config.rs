//! Configuration for the webhook receiver.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ConfigError, TransportError};
use crate::transport::http::DEFAULT_TIMEOUT;
use crate::transport::{HttpTransport, StubTransport, Transport};

const ENV_PORT: &str = "GITHOOK_PORT";
const ENV_ENVIRONMENT: &str = "GITHOOK_ENV";
const ENV_TRANSPORT: &str = "GITHOOK_TRANSPORT";
const ENV_DEPLOYMENT_URL: &str = "GITHOOK_DEPLOYMENT_URL";
const ENV_TRANSPORT_TIMEOUT_SECS: &str = "GITHOOK_TRANSPORT_TIMEOUT_SECS";
const ENV_STRICT_DEPLOYMENT: &str = "GITHOOK_STRICT_DEPLOYMENT";
const ENV_LOG_FORMAT: &str = "GITHOOK_LOG_FORMAT";

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DEPLOYMENT_URL: &str = "http://localhost:8080/deploy";

/// Deployment environment the process runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Dev,
    Test,
    Prod,
}

impl Environment {
    /// Transport used when none is configured explicitly.
    #[must_use]
    pub const fn default_transport(self) -> TransportKind {
        match self {
            Self::Test => TransportKind::Stub,
            Self::Dev | Self::Prod => TransportKind::Http,
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "test" => Ok(Self::Test),
            "prod" | "production" => Ok(Self::Prod),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Prod => "prod",
        })
    }
}

/// Which [`Transport`] implementation to wire in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Http,
    Stub,
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "stub" => Ok(Self::Stub),
            other => Err(format!("unknown transport '{other}'")),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Stub => "stub",
        })
    }
}

/// Output format of the process logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Webhook receiver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,
    pub environment: Environment,
    /// Transport used for outbound calls, decided once at startup.
    pub transport: TransportKind,
    /// Target of the deployment hook.
    pub deployment_url: String,
    /// Timeout for a single outbound call.
    pub transport_timeout: Duration,
    /// Answer 502 when the deployment hook fails instead of 200.
    pub strict_deployment: bool,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        let environment = Environment::default();
        Self {
            port: DEFAULT_PORT,
            environment,
            transport: environment.default_transport(),
            deployment_url: DEFAULT_DEPLOYMENT_URL.to_string(),
            transport_timeout: DEFAULT_TIMEOUT,
            strict_deployment: false,
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unset or empty keys fall back to defaults; set keys that fail to parse
    /// are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get(ENV_PORT) {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::invalid(ENV_PORT, &v, e.to_string()))?,
            None => defaults.port,
        };

        let environment = match get(ENV_ENVIRONMENT) {
            Some(v) => v
                .parse::<Environment>()
                .map_err(|e| ConfigError::invalid(ENV_ENVIRONMENT, &v, e))?,
            None => defaults.environment,
        };

        let transport = match get(ENV_TRANSPORT) {
            Some(v) => v
                .parse::<TransportKind>()
                .map_err(|e| ConfigError::invalid(ENV_TRANSPORT, &v, e))?,
            None => environment.default_transport(),
        };

        let deployment_url = match get(ENV_DEPLOYMENT_URL) {
            Some(v) => {
                let v = v.trim().to_string();
                reqwest::Url::parse(&v)
                    .map_err(|e| ConfigError::invalid(ENV_DEPLOYMENT_URL, &v, e.to_string()))?;
                v
            }
            None => defaults.deployment_url,
        };

        let transport_timeout = match get(ENV_TRANSPORT_TIMEOUT_SECS) {
            Some(v) => {
                let secs = v.trim().parse::<u64>().map_err(|e| {
                    ConfigError::invalid(ENV_TRANSPORT_TIMEOUT_SECS, &v, e.to_string())
                })?;
                if secs == 0 {
                    return Err(ConfigError::invalid(
                        ENV_TRANSPORT_TIMEOUT_SECS,
                        &v,
                        "timeout must be at least one second",
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.transport_timeout,
        };

        let strict_deployment = match get(ENV_STRICT_DEPLOYMENT) {
            Some(v) => parse_flag(&v).ok_or_else(|| {
                ConfigError::invalid(ENV_STRICT_DEPLOYMENT, &v, "expected true/false or 1/0")
            })?,
            None => defaults.strict_deployment,
        };

        let log_format = match get(ENV_LOG_FORMAT) {
            Some(v) => v
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::invalid(ENV_LOG_FORMAT, &v, e))?,
            None => defaults.log_format,
        };

        Ok(Self {
            port,
            environment,
            transport,
            deployment_url,
            transport_timeout,
            strict_deployment,
            log_format,
        })
    }

    /// Build the configured transport.
    pub fn build_transport(&self) -> Result<Arc<dyn Transport>, TransportError> {
        Ok(match self.transport {
            TransportKind::Http => Arc::new(HttpTransport::new(self.transport_timeout)?),
            TransportKind::Stub => Arc::new(StubTransport::new()),
        })
    }
}

/// Boolean flag value: `true`/`false` or `1`/`0`, case-insensitive.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 4000);
        assert_eq!(config.transport, TransportKind::Http);
        assert_eq!(config.transport_timeout, Duration::from_secs(10));
        assert!(!config.strict_deployment);
    }

    #[test]
    fn test_test_environment_selects_stub() {
        let config = load(&[("GITHOOK_ENV", "test")]).unwrap();
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.transport, TransportKind::Stub);
    }

    #[test]
    fn test_explicit_transport_overrides_environment() {
        let config = load(&[("GITHOOK_ENV", "test"), ("GITHOOK_TRANSPORT", "http")]).unwrap();
        assert_eq!(config.transport, TransportKind::Http);

        let config =
            load(&[("GITHOOK_ENV", "production"), ("GITHOOK_TRANSPORT", "STUB")]).unwrap();
        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.transport, TransportKind::Stub);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("GITHOOK_PORT", "8088"),
            ("GITHOOK_DEPLOYMENT_URL", "https://deploy.example.com/hooks/42"),
            ("GITHOOK_TRANSPORT_TIMEOUT_SECS", "3"),
            ("GITHOOK_STRICT_DEPLOYMENT", "true"),
            ("GITHOOK_LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.deployment_url, "https://deploy.example.com/hooks/42");
        assert_eq!(config.transport_timeout, Duration::from_secs(3));
        assert!(config.strict_deployment);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = load(&[("GITHOOK_PORT", ""), ("GITHOOK_ENV", "  ")]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("GITHOOK_PORT", "not-a-port"),
            ("GITHOOK_PORT", "70000"),
            ("GITHOOK_ENV", "staging"),
            ("GITHOOK_TRANSPORT", "carrier-pigeon"),
            ("GITHOOK_DEPLOYMENT_URL", "no scheme here"),
            ("GITHOOK_TRANSPORT_TIMEOUT_SECS", "0"),
            ("GITHOOK_LOG_FORMAT", "xml"),
            ("GITHOOK_STRICT_DEPLOYMENT", "yes"),
            ("GITHOOK_STRICT_DEPLOYMENT", "on"),
        ] {
            let err = load(&[(key, value)]).unwrap_err();
            let ConfigError::InvalidValue { key: failed, .. } = err;
            assert_eq!(failed, key);
        }
    }

    #[test]
    fn test_strict_deployment_flag_forms() {
        for (value, expected) in [
            ("true", true),
            (" true", true),
            ("TRUE", true),
            ("1", true),
            ("false", false),
            ("False ", false),
            ("0", false),
        ] {
            let config = load(&[("GITHOOK_STRICT_DEPLOYMENT", value)]).unwrap();
            assert_eq!(config.strict_deployment, expected, "value {value:?}");
        }
    }

    #[test]
    fn test_build_transport_follows_kind() {
        let stub = Config {
            transport: TransportKind::Stub,
            ..Config::default()
        };
        assert_eq!(stub.build_transport().unwrap().name(), "stub");

        let http = Config::default();
        assert_eq!(http.build_transport().unwrap().name(), "http");
    }
}
