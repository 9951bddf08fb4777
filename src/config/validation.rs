//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("bot.nickname is required")]
    MissingNickname,
    #[error("bot.nickname must not contain spaces, got '{0}'")]
    InvalidNickname(String),
    #[error("bot.server is required")]
    MissingServer,
    #[error("bot.channel is required")]
    MissingChannel,
    #[error("bot.quotefile is required")]
    MissingQuotefile,
    #[error("bot.url_length must be greater than 0")]
    ZeroUrlLength,
    #[error("relay.color must be an mIRC colour between 0 and 15, got {0}")]
    InvalidColor(u8),
    #[error("relay.config_path is required")]
    MissingRelayConfigPath,
    #[error("relay.open_timeout_secs must be greater than 0")]
    ZeroOpenTimeout,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let bot = &config.bot;

    // Required fields
    if bot.nickname.is_empty() {
        errors.push(ValidationError::MissingNickname);
    } else if bot.nickname.contains(char::is_whitespace) {
        errors.push(ValidationError::InvalidNickname(bot.nickname.clone()));
    }
    if bot.server.is_empty() {
        errors.push(ValidationError::MissingServer);
    }
    if bot.channel.is_empty() {
        errors.push(ValidationError::MissingChannel);
    }
    if bot.quotefile.is_empty() {
        errors.push(ValidationError::MissingQuotefile);
    }
    if bot.url_length == 0 {
        errors.push(ValidationError::ZeroUrlLength);
    }

    // Relay validation
    if let Some(relay) = config.active_relay() {
        if eppo_proto::Color::from_code(relay.color).is_none() {
            errors.push(ValidationError::InvalidColor(relay.color));
        }
        if relay.config_path.is_empty() {
            errors.push(ValidationError::MissingRelayConfigPath);
        }
        if relay.open_timeout_secs == 0 {
            errors.push(ValidationError::ZeroOpenTimeout);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_valid_config() -> String {
        r##"
[bot]
nickname = "Janeppo"
server = "127.0.0.1:6667"
channel = "#eppo"
quotefile = "quotes.json"
"##
        .to_string()
    }

    #[test]
    fn test_valid_config_passes() {
        let config: Config = toml::from_str(&minimal_valid_config()).unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_all_errors_are_collected() {
        let toml = r#"
[bot]
nickname = ""
server = ""
channel = ""
quotefile = "quotes.json"
url_length = 0
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingNickname)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingServer)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::MissingChannel)));
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroUrlLength)));
    }

    #[test]
    fn test_nickname_with_space_fails() {
        let toml = minimal_valid_config().replace("\"Janeppo\"", "\"Jan Eppo\"");
        let config: Config = toml::from_str(&toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidNickname(_))));
    }

    #[test]
    fn test_invalid_relay_color_fails() {
        let toml = format!("{}\n[relay]\ncolor = 16\n", minimal_valid_config());
        let config: Config = toml::from_str(&toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::InvalidColor(16))));
    }

    #[test]
    fn test_zero_open_timeout_fails() {
        let toml = format!("{}\n[relay]\nopen_timeout_secs = 0\n", minimal_valid_config());
        let config: Config = toml::from_str(&toml).unwrap();
        let errors = validate(&config).unwrap_err();
        assert!(errors.iter().any(|e| matches!(e, ValidationError::ZeroOpenTimeout)));
    }

    #[test]
    fn test_disabled_relay_is_not_validated() {
        let toml = format!(
            "{}\n[relay]\nenabled = false\ncolor = 99\n",
            minimal_valid_config()
        );
        let config: Config = toml::from_str(&toml).unwrap();
        assert!(validate(&config).is_ok());
    }
}
