use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jackett: JackettConfig,
    /// Optional; searches still run without a download client, they
    /// just stop at candidate selection.
    #[serde(default)]
    pub qbittorrent: Option<QBittorrentConfig>,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("cinefetch.db")
}

/// Jackett indexer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JackettConfig {
    /// Jackett server URL (e.g., "http://localhost:9117")
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// qBittorrent download client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QBittorrentConfig {
    /// WebUI URL (e.g., "http://localhost:8080")
    pub url: String,
    pub username: String,
    pub password: String,
    /// Save path override; the client default applies when unset.
    #[serde(default)]
    pub download_path: Option<String>,
    /// Category assigned to added torrents.
    #[serde(default = "default_category")]
    pub category: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

fn default_category() -> Option<String> {
    Some("movies".to_string())
}

/// Background job scheduler configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Interval between library sweeps, in seconds (default: 30 min).
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Delay between per-movie searches within a sweep, to go easy on
    /// the indexer.
    #[serde(default = "default_search_delay")]
    pub search_delay_secs: u64,
    /// Events older than this many days are purged after each sweep.
    #[serde(default = "default_event_retention")]
    pub event_retention_days: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            search_delay_secs: default_search_delay(),
            event_retention_days: default_event_retention(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    30 * 60
}

fn default_search_delay() -> u64 {
    2
}

fn default_event_retention() -> u32 {
    30
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub database: DatabaseConfig,
    pub jackett: SanitizedJackettConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qbittorrent: Option<SanitizedQBittorrentConfig>,
    pub scheduler: SchedulerConfig,
}

/// Sanitized Jackett config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedJackettConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized qBittorrent config (credentials hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedQBittorrentConfig {
    pub url: String,
    pub username: String,
    pub password_configured: bool,
    pub category: Option<String>,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            database: config.database.clone(),
            jackett: SanitizedJackettConfig {
                url: config.jackett.url.clone(),
                api_key_configured: !config.jackett.api_key.is_empty(),
                timeout_secs: config.jackett.timeout_secs,
            },
            qbittorrent: config.qbittorrent.as_ref().map(|q| {
                SanitizedQBittorrentConfig {
                    url: q.url.clone(),
                    username: q.username.clone(),
                    password_configured: !q.password.is_empty(),
                    category: q.category.clone(),
                    timeout_secs: q.timeout_secs,
                }
            }),
            scheduler: config.scheduler.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[jackett]
url = "http://localhost:9117"
api_key = "test-api-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.jackett.url, "http://localhost:9117");
        assert_eq!(config.jackett.timeout_secs, 30); // default
        assert_eq!(config.database.path.to_str().unwrap(), "cinefetch.db");
        assert!(config.qbittorrent.is_none());
        assert_eq!(config.scheduler.sweep_interval_secs, 1800);
        assert_eq!(config.scheduler.search_delay_secs, 2);
        assert_eq!(config.scheduler.event_retention_days, 30);
    }

    #[test]
    fn test_deserialize_missing_jackett_fails() {
        let toml = r#"
[database]
path = "/data/db.sqlite"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_with_qbittorrent() {
        let toml = r#"
[jackett]
url = "http://localhost:9117"
api_key = "key"

[qbittorrent]
url = "http://localhost:8080"
username = "admin"
password = "secret"
download_path = "/downloads/movies"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let qbt = config.qbittorrent.as_ref().unwrap();
        assert_eq!(qbt.url, "http://localhost:8080");
        assert_eq!(qbt.download_path.as_deref(), Some("/downloads/movies"));
        assert_eq!(qbt.category.as_deref(), Some("movies")); // default
    }

    #[test]
    fn test_deserialize_with_custom_scheduler() {
        let toml = r#"
[jackett]
url = "http://localhost:9117"
api_key = "key"

[scheduler]
sweep_interval_secs = 600
search_delay_secs = 5
event_retention_days = 7
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.scheduler.sweep_interval_secs, 600);
        assert_eq!(config.scheduler.search_delay_secs, 5);
        assert_eq!(config.scheduler.event_retention_days, 7);
    }

    #[test]
    fn test_sanitized_config_hides_secrets() {
        let config = Config {
            database: DatabaseConfig::default(),
            jackett: JackettConfig {
                url: "http://localhost:9117".to_string(),
                api_key: "secret-key".to_string(),
                timeout_secs: 60,
            },
            qbittorrent: Some(QBittorrentConfig {
                url: "http://localhost:8080".to_string(),
                username: "admin".to_string(),
                password: "secret".to_string(),
                download_path: None,
                category: Some("movies".to_string()),
                timeout_secs: 30,
            }),
            scheduler: SchedulerConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.jackett.api_key_configured);
        let qbt = sanitized.qbittorrent.as_ref().unwrap();
        assert!(qbt.password_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(!json.contains("\"secret\""));
    }
}
