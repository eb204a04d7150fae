//! Configuration for the Generator

use branchcast_domain::{Stance, DEFAULT_SHORT_FORM_MAX_CHARS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Variant Generator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Article prefix sent to the model (characters)
    pub max_article_chars: usize,

    /// Cap on the short-form post (characters)
    pub short_form_max_chars: usize,

    /// Maximum time for a single LLM call (seconds)
    pub call_timeout_secs: u64,

    /// Maximum earlier variants shown to the model as "do not repeat" context
    pub prior_variants_limit: usize,

    /// Tone wording for supportive batches
    pub support_directive: String,

    /// Tone wording for critical batches
    pub oppose_directive: String,
}

impl GeneratorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Tone wording for a stance
    pub fn directive(&self, stance: Stance) -> &str {
        match stance {
            Stance::Support => &self.support_directive,
            Stance::Oppose => &self.oppose_directive,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_article_chars == 0 {
            return Err("max_article_chars must be greater than 0".to_string());
        }
        if self.short_form_max_chars == 0 {
            return Err("short_form_max_chars must be greater than 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.prior_variants_limit == 0 {
            return Err("prior_variants_limit must be greater than 0".to_string());
        }
        if self.support_directive.trim().is_empty() || self.oppose_directive.trim().is_empty() {
            return Err("stance directives must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_article_chars: 3_000,
            short_form_max_chars: DEFAULT_SHORT_FORM_MAX_CHARS,
            call_timeout_secs: 60,
            prior_variants_limit: 20,
            support_directive: "supportive and positive".to_string(),
            oppose_directive: "critical and opposing".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = GeneratorConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_prior_variants_limit_is_invalid() {
        let config = GeneratorConfig::from_toml("prior_variants_limit = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("prior_variants_limit"));
    }

    #[test]
    fn test_blank_directive_is_invalid() {
        let mut config = GeneratorConfig::default();
        config.oppose_directive = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_directive_by_stance() {
        let config = GeneratorConfig::default();
        assert_eq!(config.directive(Stance::Support), "supportive and positive");
        assert_eq!(config.directive(Stance::Oppose), "critical and opposing");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GeneratorConfig::from_toml("short_form_max_chars = 200").unwrap();
        assert_eq!(config.short_form_max_chars, 200);
        assert_eq!(config.max_article_chars, 3_000);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneratorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = GeneratorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.max_article_chars, parsed.max_article_chars);
        assert_eq!(config.call_timeout_secs, parsed.call_timeout_secs);
        assert_eq!(config.support_directive, parsed.support_directive);
    }
}
