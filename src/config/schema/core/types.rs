use super::super::{
    BackendConfig, ComposerConfig, FunctionsConfig, GatewayConfig, ObservabilityConfig,
    OnboardingConfig,
};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const KNOWN_PROVIDERS: [&str; 4] = ["gemini", "google", "anthropic", "claude"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub functions: FunctionsConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub composer: ComposerConfig,

    #[serde(default)]
    pub onboarding: OnboardingConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.composer.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "composer.debounce_ms must be greater than 0".into(),
            ));
        }
        if self.composer.min_goal_chars == 0 {
            return Err(ConfigError::Validation(
                "composer.min_goal_chars must be greater than 0".into(),
            ));
        }
        for (name, route) in self.functions.routes() {
            if !KNOWN_PROVIDERS.contains(&route.provider.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "functions.{name}: unknown provider '{}'",
                    route.provider
                )));
            }
            if route.model.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "functions.{name}: model must not be empty"
                )));
            }
            if !(0.0..=2.0).contains(&route.temperature) {
                return Err(ConfigError::Validation(format!(
                    "functions.{name}: temperature must be within 0.0..=2.0"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn zero_debounce_is_rejected() {
        let mut config = Config::default();
        config.composer.debounce_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let mut config = Config::default();
        config.functions.goal_parse.provider = "openai".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("goal-parse"));
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = Config::default();
        config.functions.onboarding_chat.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.gateway.port, 54321);
        assert_eq!(config.composer.debounce_ms, 800);
        assert!(config.backend.url.is_none());
    }
}
