use super::{types::Config, ConfigError};

const MAX_MONTH_FIELD_WIDTH: usize = 64;

/// Validate configuration
/// Currently validates:
/// - Template path is not empty
/// - Scratch directory is not empty
/// - Month field width is within 1..=64
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.template.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "template.path cannot be empty".to_string(),
        ));
    }

    if config.generation.temp_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "generation.temp_dir cannot be empty".to_string(),
        ));
    }

    let width = config.generation.month_field_width;
    if width == 0 || width > MAX_MONTH_FIELD_WIDTH {
        return Err(ConfigError::ValidationError(format!(
            "generation.month_field_width must be between 1 and {}, got {}",
            MAX_MONTH_FIELD_WIDTH, width
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_template_path_fails() {
        let mut config = Config::default();
        config.template.path = PathBuf::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_month_width_zero_fails() {
        let mut config = Config::default();
        config.generation.month_field_width = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_month_width_too_large_fails() {
        let mut config = Config::default();
        config.generation.month_field_width = 65;
        assert!(validate_config(&config).is_err());
    }
}
