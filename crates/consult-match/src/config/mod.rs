use crate::workflows::matchability::{MatchingConfig, ScoreWeights, SkillMatchStrategy};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub directory: DirectoryConfig,
    pub matching: MatchingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::OutOfRange {
                key: "APP_LOG_FORMAT",
                expected: "'compact' or 'full'",
            })?,
            Err(_) => LogFormat::Compact,
        };

        let consultants_csv = env::var("APP_CONSULTANTS_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            directory: DirectoryConfig { consultants_csv },
            matching: load_matching()?,
        })
    }
}

fn load_matching() -> Result<MatchingConfig, ConfigError> {
    let defaults = MatchingConfig::default();

    let weights = ScoreWeights {
        skills: env_number("MATCH_WEIGHT_SKILLS", defaults.weights.skills)?,
        budget: env_number("MATCH_WEIGHT_BUDGET", defaults.weights.budget)?,
        volume: env_number("MATCH_WEIGHT_VOLUME", defaults.weights.volume)?,
    };
    if !weights.is_valid() {
        return Err(ConfigError::InvalidWeights);
    }

    let strategy = match env::var("MATCH_SKILL_STRATEGY") {
        Ok(raw) => SkillMatchStrategy::parse(&raw).ok_or(ConfigError::InvalidStrategy(raw))?,
        Err(_) => defaults.strategy,
    };

    let match_threshold = env_number("MATCH_SKILL_THRESHOLD", defaults.match_threshold)?;
    if !(0.0..=1.0).contains(&match_threshold) {
        return Err(ConfigError::OutOfRange {
            key: "MATCH_SKILL_THRESHOLD",
            expected: "a ratio between 0 and 1",
        });
    }

    let default_hourly_rate =
        env_number("MATCH_DEFAULT_HOURLY_RATE", defaults.default_hourly_rate)?;
    if !default_hourly_rate.is_finite() || default_hourly_rate < 0.0 {
        return Err(ConfigError::OutOfRange {
            key: "MATCH_DEFAULT_HOURLY_RATE",
            expected: "a finite, non-negative rate",
        });
    }

    Ok(MatchingConfig {
        weights,
        match_threshold,
        volume_saturation: env_number("MATCH_VOLUME_SATURATION", defaults.volume_saturation)?,
        default_hourly_rate,
        strategy,
        ..defaults
    })
}

fn env_number<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Line layout of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One short line per event.
    #[default]
    Compact,
    /// Default fmt layout with targets and span context, for local debugging.
    Full,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Some(Self::Compact),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

/// Where the consultant pool is read from when serving.
#[derive(Debug, Clone, Default)]
pub struct DirectoryConfig {
    pub consultants_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
    OutOfRange {
        key: &'static str,
        expected: &'static str,
    },
    InvalidWeights,
    InvalidStrategy(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a valid number"),
            ConfigError::OutOfRange { key, expected } => write!(f, "{key} must be {expected}"),
            ConfigError::InvalidWeights => {
                write!(f, "score weights must be finite and non-negative")
            }
            ConfigError::InvalidStrategy(value) => write!(
                f,
                "MATCH_SKILL_STRATEGY must be 'substring' or 'token' (found '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
