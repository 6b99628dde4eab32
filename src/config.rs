use std::env;
use std::time::Duration;

/// Default OneSignal REST endpoint for creating notifications
pub const DEFAULT_ONESIGNAL_API_URL: &str = "https://onesignal.com/api/v1/notifications";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub push: PushConfig,
    pub dispatch: DispatchConfig,
}

/// Database connection pool configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

/// Push provider configuration
///
/// Missing credentials are a valid state: notifications are still stored,
/// they just aren't pushed.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
    pub api_url: String,
    /// Upper bound for a single provider call
    pub timeout: Duration,
    pub android_channel_id: String,
    pub ios_sound: String,
}

/// Provider credentials, only available when both halves are configured
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushCredentials {
    pub app_id: String,
    pub api_key: String,
}

/// Dispatch pipeline options
#[derive(Debug, Clone, Default)]
pub struct DispatchConfig {
    /// When set, a request repeating the recipient, type and correlation id
    /// of a record created within this window is rejected as a duplicate
    pub dedup_window: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            database: DatabaseConfig::from_env()?,
            push: PushConfig::from_env()?,
            dispatch: DispatchConfig::from_env(),
        })
    }
}

impl DatabaseConfig {
    /// Load database configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = non_empty_var("DATABASE_URL").ok_or(ConfigError::MissingDatabaseUrl)?;

        Ok(Self {
            url,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10),
            min_connections: parse_var("DATABASE_MIN_CONNECTIONS", 1),
            acquire_timeout: Duration::from_secs(parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)),
            idle_timeout: Duration::from_secs(parse_var("DATABASE_IDLE_TIMEOUT_SECS", 600)),
            max_lifetime: Duration::from_secs(parse_var("DATABASE_MAX_LIFETIME_SECS", 1800)),
        })
    }
}

impl PushConfig {
    /// Load push provider configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = non_empty_var("ONESIGNAL_API_URL")
            .unwrap_or_else(|| DEFAULT_ONESIGNAL_API_URL.to_string());

        let parsed = url::Url::parse(&api_url).map_err(|_| ConfigError::InvalidPushUrl)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidPushUrl);
        }

        Ok(Self {
            app_id: non_empty_var("ONESIGNAL_APP_ID"),
            api_key: non_empty_var("ONESIGNAL_API_KEY"),
            api_url,
            timeout: Duration::from_secs(parse_var("PUSH_TIMEOUT_SECS", 5)),
            android_channel_id: non_empty_var("PUSH_ANDROID_CHANNEL_ID")
                .unwrap_or_else(|| "nonna_notifications".to_string()),
            ios_sound: non_empty_var("PUSH_IOS_SOUND").unwrap_or_else(|| "default".to_string()),
        })
    }

    /// Returns the credentials if both the app id and API key are set
    pub fn credentials(&self) -> Option<PushCredentials> {
        match (&self.app_id, &self.api_key) {
            (Some(app_id), Some(api_key)) => Some(PushCredentials {
                app_id: app_id.clone(),
                api_key: api_key.clone(),
            }),
            _ => None,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            api_url: DEFAULT_ONESIGNAL_API_URL.to_string(),
            timeout: Duration::from_secs(5),
            android_channel_id: "nonna_notifications".to_string(),
            ios_sound: "default".to_string(),
        }
    }
}

impl DispatchConfig {
    /// Load dispatch options from environment variables
    pub fn from_env() -> Self {
        let dedup_window = env::var("DISPATCH_DEDUP_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Self { dedup_window }
    }
}

/// Reads a variable, treating an empty value as unset
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parses a variable, falling back to the default when unset or invalid
fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    MissingDatabaseUrl,
    InvalidPushUrl,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "PORT must be a valid number"),
            ConfigError::MissingDatabaseUrl => {
                write!(f, "DATABASE_URL environment variable is required")
            }
            ConfigError::InvalidPushUrl => {
                write!(f, "ONESIGNAL_API_URL must be a valid http(s) URL")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
