//! API account configuration.
//!
//! Accounts are declared in a JSON config file (or environment variables)
//! and validated strictly at load time: a missing key or a zero daily limit
//! is an error here, not a surprise deep inside the pool.

mod loader;

pub use loader::{AccountConfig, ApiConfig, ConfigError, DEFAULT_DAILY_LIMIT};

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, json: &str) -> std::path::PathBuf {
        let path = dir.path().join("api_keys.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{
                "accounts": [
                    {"name": "Account 1", "api_key": "key1", "daily_limit": 50},
                    {"name": "Account 2", "api_key": "key2", "daily_limit": 25}
                ]
            }"#,
        );

        let config = ApiConfig::load(&path).unwrap();

        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0].name, "Account 1");
        assert_eq!(config.accounts[1].daily_limit, 25);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let result = ApiConfig::load(&path);

        assert!(matches!(result.unwrap_err(), ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_missing_daily_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{"accounts": [{"name": "Account 1", "api_key": "key1"}]}"#,
        );

        // daily_limit is required, not defaulted
        let result = ApiConfig::load(&path);

        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_rejects_zero_daily_limit() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{"accounts": [{"name": "Account 1", "api_key": "key1", "daily_limit": 0}]}"#,
        );

        let result = ApiConfig::load(&path);

        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidAccount { .. }
        ));
    }

    #[test]
    fn test_load_rejects_empty_api_key() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{"accounts": [{"name": "Account 1", "api_key": "  ", "daily_limit": 50}]}"#,
        );

        let result = ApiConfig::load(&path);

        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidAccount { .. }
        ));
    }

    #[test]
    fn test_write_example_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("example.json");

        ApiConfig::write_example(&path).unwrap();
        let config = ApiConfig::load(&path).unwrap();

        assert_eq!(config.accounts.len(), 2);
        assert!(config.accounts.iter().all(|a| a.daily_limit == 50));
    }

    #[test]
    fn test_discover_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"{"accounts": [{"name": "Only", "api_key": "k", "daily_limit": 10}]}"#,
        );

        let config = ApiConfig::discover(Some(&path)).unwrap();

        assert_eq!(config.accounts.len(), 1);
        assert_eq!(config.accounts[0].name, "Only");
    }

    #[test]
    fn test_discover_explicit_path_missing_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.json");

        let result = ApiConfig::discover(Some(&path));

        assert!(result.is_err());
    }
}
