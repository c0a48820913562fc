use super::{types::Config, ConfigError};

/// Largest page size the catalog accepts.
const MAX_PER_PAGE: u32 = 50;

/// Validate configuration
/// Currently validates:
/// - Catalog endpoints are set and the rate limit is not 0
/// - Engine page size is within 1..=50 and the threshold within [0, 1]
/// - Enabled providers have an endpoint
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Catalog validation
    if config.catalog.api_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_url cannot be empty".to_string(),
        ));
    }
    if config.catalog.site_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.site_url cannot be empty".to_string(),
        ));
    }
    if config.catalog.rate_limit_per_minute == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.rate_limit_per_minute cannot be 0".to_string(),
        ));
    }

    // Engine validation
    if config.engine.per_page == 0 || config.engine.per_page > MAX_PER_PAGE {
        return Err(ConfigError::ValidationError(format!(
            "engine.per_page must be between 1 and {}",
            MAX_PER_PAGE
        )));
    }
    if !(0.0..=1.0).contains(&config.engine.compare_threshold) {
        return Err(ConfigError::ValidationError(
            "engine.compare_threshold must be between 0.0 and 1.0".to_string(),
        ));
    }

    // Provider validation
    let anify = &config.providers.anify;
    if anify.enabled && anify.api_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "providers.anify.api_url cannot be empty".to_string(),
        ));
    }

    Ok(())
}
