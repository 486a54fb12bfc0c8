use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Jackett URL and API key are non-empty
/// - qBittorrent URL is non-empty when the section is present
/// - Scheduler intervals are non-zero
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.jackett.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "jackett.url cannot be empty".to_string(),
        ));
    }
    if config.jackett.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "jackett.api_key cannot be empty".to_string(),
        ));
    }

    if let Some(qbt) = &config.qbittorrent {
        if qbt.url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "qbittorrent.url cannot be empty".to_string(),
            ));
        }
    }

    if config.scheduler.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.sweep_interval_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, JackettConfig, SchedulerConfig};

    fn valid_config() -> Config {
        Config {
            database: DatabaseConfig::default(),
            jackett: JackettConfig {
                url: "http://localhost:9117".to_string(),
                api_key: "key".to_string(),
                timeout_secs: 30,
            },
            qbittorrent: None,
            scheduler: SchedulerConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_empty_jackett_url_fails() {
        let mut config = valid_config();
        config.jackett.url = String::new();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_empty_api_key_fails() {
        let mut config = valid_config();
        config.jackett.api_key = "  ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_sweep_interval_fails() {
        let mut config = valid_config();
        config.scheduler.sweep_interval_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
