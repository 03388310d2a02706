use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_NBP_BASE_URL: &str = "https://api.nbp.pl";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NbpProviderConfig {
    pub base_url: String,
}

impl Default for NbpProviderConfig {
    fn default() -> Self {
        NbpProviderConfig {
            base_url: DEFAULT_NBP_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub nbp: Option<NbpProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            nbp: Some(NbpProviderConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DisplayConfig {
    /// Start with PLN as the base unit.
    #[serde(default)]
    pub inverse: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Loads the default config file, falling back to defaults when there is
    /// none.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("pl", "kurs", "kurs")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn nbp_base_url(&self) -> &str {
        self.providers
            .nbp
            .as_ref()
            .map_or(DEFAULT_NBP_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  nbp:
    base_url: "http://example.com/nbp"
display:
  inverse: true
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.nbp_base_url(), "http://example.com/nbp");
        assert!(config.display.inverse);
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.nbp_base_url(), DEFAULT_NBP_BASE_URL);
        assert!(!config.display.inverse);

        let yaml_str = r#"
providers:
  nbp: ~
"#;
        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert!(config.providers.nbp.is_none());
        assert_eq!(config.nbp_base_url(), DEFAULT_NBP_BASE_URL);
    }

    #[test]
    fn test_load_from_path() {
        let file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        fs::write(file.path(), "display:\n  inverse: true\n").expect("Failed to write config");

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert!(config.display.inverse);
        assert_eq!(config.nbp_base_url(), DEFAULT_NBP_BASE_URL);
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let missing = dir.path().join("nope.yaml");

        let err = AppConfig::load_from_path(&missing).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read config file"));
    }
}
