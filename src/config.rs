use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::source::tokens::TOKEN_LENGTH;

/// Main configuration structure for Sourcedesk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcedeskConfig {
    /// Site identity and public URLs
    pub site: SiteConfig,
    /// The human who moderates submissions
    pub operator: OperatorConfig,
    /// Secret token settings
    pub tokens: TokenConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Display name, used in email subjects and bodies
    pub name: String,
    /// Absolute base URL all outbound links are rooted at
    pub base_url: String,
    /// Path of the contact page referenced from emails
    pub contact_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperatorConfig {
    /// Address moderation requests are sent to
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenConfig {
    /// Secret length in characters
    pub length: usize,
}

impl Default for SourcedeskConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig {
                name: "Sourcedesk".to_string(),
                base_url: "http://localhost".to_string(),
                contact_path: "contact".to_string(),
            },
            operator: OperatorConfig {
                email: "admin@localhost".to_string(),
            },
            tokens: TokenConfig {
                length: TOKEN_LENGTH,
            },
        }
    }
}

impl SourcedeskConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (sourcedesk.toml)
    /// 3. Environment variables (prefixed with SOURCEDESK_)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("sourcedesk.toml").exists() {
            builder = builder.add_source(File::with_name("sourcedesk"));
        }

        builder = builder.add_source(
            Environment::with_prefix("SOURCEDESK")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load configuration from a specific file, over the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(File::from(path.as_ref()))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<SourcedeskConfig, anyhow::Error>> =
    std::sync::LazyLock::new(SourcedeskConfig::load);

/// Get the global configuration
pub fn config() -> Result<&'static SourcedeskConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = SourcedeskConfig::default();
        assert_eq!(config.tokens.length, TOKEN_LENGTH);
        assert!(!config.site.name.is_empty());
        assert!(config.site.base_url.starts_with("http"));
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[site]\nname = \"Science Sources\"\nbase_url = \"https://sources.x.test\"\n\n[operator]\nemail = \"ops@x.test\""
        )
        .unwrap();

        let config = SourcedeskConfig::load_from(file.path()).unwrap();
        assert_eq!(config.site.name, "Science Sources");
        assert_eq!(config.site.base_url, "https://sources.x.test");
        assert_eq!(config.operator.email, "ops@x.test");
        // Untouched sections keep their defaults
        assert_eq!(config.site.contact_path, "contact");
        assert_eq!(config.tokens.length, TOKEN_LENGTH);
    }
}
