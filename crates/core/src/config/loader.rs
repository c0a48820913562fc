use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `ANISYNC_CATALOG__RATE_LIMIT_PER_MINUTE`.
const ENV_PREFIX: &str = "ANISYNC_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from environment variables alone
pub fn load_config_from_env() -> Result<Config, ConfigError> {
    Figment::new()
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[engine]
per_page = 20
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.engine.per_page, 20);
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[catalog]
rate_limit_per_minute = "fast"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[catalog]
site_url = "https://mirror.example.org"

[crawl]
max_ids = 5
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.catalog.site_url, "https://mirror.example.org");
        assert_eq!(config.crawl.max_ids, Some(5));
        assert_eq!(config.catalog.rate_limit_per_minute, 30);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "anisync.toml",
                r#"
[catalog]
rate_limit_per_minute = 10
"#,
            )?;
            jail.set_env("ANISYNC_CATALOG__RATE_LIMIT_PER_MINUTE", "90");
            jail.set_env("ANISYNC_CACHE__ENABLED", "true");

            let config = load_config(Path::new("anisync.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.catalog.rate_limit_per_minute, 90);
            assert!(config.cache.enabled);
            Ok(())
        });
    }
}
