use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub images: ImageConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Largest dimension a stored photo may have, in pixels. Uploads larger
    /// than this are downsampled; smaller uploads keep their dimensions.
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_max_dimension() -> u32 {
    800
}

fn default_jpeg_quality() -> u8 {
    85
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Whether `init` creates the three demo family accounts.
    #[serde(default = "default_demo_accounts")]
    pub demo_accounts: bool,
}

fn default_demo_accounts() -> bool {
    true
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            demo_accounts: default_demo_accounts(),
        }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("famstory")
        .join("famstory.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            images: ImageConfig::default(),
            seed: SeedConfig::default(),
        }
    }
}

impl Config {
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let config_path = path_override.unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Create default config
            let config = Config::default();
            config.save(&config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self, config_path: &PathBuf) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;

        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("famstory")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.images.max_dimension, 800);
        assert!(config.seed.demo_accounts);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str("db_path = \"/tmp/album.db\"").unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/album.db"));
        assert_eq!(config.images.jpeg_quality, 85);
    }
}
