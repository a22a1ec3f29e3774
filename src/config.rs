// file: src/config.rs
// description: application configuration management with toml and env support
// reference: https://docs.rs/config

use crate::error::{ExportError, Result};
use crate::utils::validation::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_CDN_BASE_URL: &str = "https://cdn.bazarchic.com/i/tmp";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    pub name: String,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub cdn_base_url: String,
    pub full_batch_size: usize,
    pub sample_batch_size: usize,
    pub sample_size: usize,
    pub comprehensive_sample_size: usize,
    /// Fill empty DLC/DDM columns from description text.
    #[serde(default)]
    pub text_expiration_fallback: bool,
    #[serde(default)]
    pub write_manifest: bool,
}

impl Config {
    /// Layers, lowest priority first: built-in defaults, the TOML file (when it
    /// exists), `CATALOG_EXPORT__*` variables, then the plain `DB_*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = Self::default_config();
        let mut builder = config::Config::builder()
            .set_default("database.host", defaults.database.host)
            .and_then(|b| b.set_default("database.port", i64::from(defaults.database.port)))
            .and_then(|b| b.set_default("database.user", defaults.database.user))
            .and_then(|b| b.set_default("database.name", defaults.database.name))
            .and_then(|b| {
                b.set_default(
                    "database.connect_timeout_secs",
                    defaults.database.connect_timeout_secs as i64,
                )
            })
            .and_then(|b| {
                b.set_default(
                    "export.output_dir",
                    defaults.export.output_dir.display().to_string(),
                )
            })
            .and_then(|b| b.set_default("export.cdn_base_url", defaults.export.cdn_base_url))
            .and_then(|b| {
                b.set_default(
                    "export.full_batch_size",
                    defaults.export.full_batch_size as i64,
                )
            })
            .and_then(|b| {
                b.set_default(
                    "export.sample_batch_size",
                    defaults.export.sample_batch_size as i64,
                )
            })
            .and_then(|b| b.set_default("export.sample_size", defaults.export.sample_size as i64))
            .and_then(|b| {
                b.set_default(
                    "export.comprehensive_sample_size",
                    defaults.export.comprehensive_sample_size as i64,
                )
            })
            .map_err(|e| ExportError::Config(e.to_string()))?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        } else {
            builder = builder.add_source(
                config::File::from(Path::new("config/default.toml")).required(false),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CATALOG_EXPORT")
                .separator("__")
                .try_parsing(true),
        );

        builder = builder
            .set_override_option("database.host", std::env::var("DB_HOST").ok())
            .and_then(|b| b.set_override_option("database.user", std::env::var("DB_USER").ok()))
            .and_then(|b| {
                b.set_override_option("database.password", std::env::var("DB_PASSWORD").ok())
            })
            .and_then(|b| b.set_override_option("database.name", std::env::var("DB_NAME").ok()))
            .and_then(|b| b.set_override_option("database.port", std::env::var("DB_PORT").ok()))
            .map_err(|e| ExportError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| ExportError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| ExportError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: DEFAULT_DB_PORT,
                user: "root".to_string(),
                password: None,
                name: "bazarchic".to_string(),
                connect_timeout_secs: 10,
            },
            export: ExportConfig {
                output_dir: PathBuf::from("."),
                cdn_base_url: DEFAULT_CDN_BASE_URL.to_string(),
                full_batch_size: 50_000,
                sample_batch_size: 5_000,
                sample_size: 10_000,
                comprehensive_sample_size: 10_000,
                text_expiration_fallback: false,
                write_manifest: false,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.host.trim().is_empty() {
            return Err(ExportError::Config("database.host must be set".to_string()));
        }

        if self.database.name.trim().is_empty() {
            return Err(ExportError::Config("database.name must be set".to_string()));
        }

        if self.database.port == 0 {
            return Err(ExportError::Config(
                "database.port must be greater than 0".to_string(),
            ));
        }

        for (key, size) in [
            ("export.full_batch_size", self.export.full_batch_size),
            ("export.sample_batch_size", self.export.sample_batch_size),
        ] {
            Validator::validate_batch_size(size)
                .map_err(|e| ExportError::Config(format!("{}: {}", key, e)))?;
        }

        Validator::validate_url(&self.export.cdn_base_url)
            .map_err(|e| ExportError::Config(format!("export.cdn_base_url: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.database.port, DEFAULT_DB_PORT);
        assert!(!config.export.text_expiration_fallback);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = Config::default_config();
        config.export.full_batch_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_host_rejected() {
        let mut config = Config::default_config();
        config.database.host = "  ".to_string();
        assert!(matches!(config.validate(), Err(ExportError::Config(_))));
    }

    #[test]
    fn test_load_reads_toml_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("export.toml");
        fs::write(
            &path,
            "[export]\noutput_dir = \"/tmp/feeds\"\nsample_size = 25\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/feeds"));
        assert_eq!(config.export.sample_size, 25);
        assert_eq!(config.export.cdn_base_url, DEFAULT_CDN_BASE_URL);
    }
}
