// ============================================================
// CONFIGURATION
// ============================================================
// Layered settings: compiled defaults, then `fieldsift.toml` (or the file
// named by FIELDSIFT_CONFIG), then FIELDSIFT_* environment variables with
// `__` separating nested keys (FIELDSIFT_SERVER__PORT=8080).

use std::collections::BTreeMap;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::use_cases::column_mapper::{ColumnMapper, DEFAULT_FUZZY_THRESHOLD};
use crate::domain::error::{AppError, Result};
use crate::domain::record::TargetField;
use crate::domain::synonyms::{default_synonym_map, SynonymDictionary};

pub const CONFIG_PATH_ENV: &str = "FIELDSIFT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "fieldsift.toml";
pub const ENV_PREFIX: &str = "FIELDSIFT_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub mapping: MappingConfig,

    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// Upper bound for an upload body and for each extracted bundle entry
    #[validate(range(min = 1))]
    pub max_upload_bytes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MappingConfig {
    /// Similarity (0-100) a header must strictly exceed to match fuzzily
    #[validate(range(min = 0.0, max = 100.0))]
    pub fuzzy_threshold: f64,

    /// Synonyms per target field; entries here replace that field's defaults
    pub synonyms: BTreeMap<TargetField, Vec<String>>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            synonyms: default_synonym_map(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub include_status: bool,
}

impl AppConfig {
    /// Provider stack used by [`load`](Self::load)
    pub fn figment() -> Figment {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load and validate. Any failure is a configuration error and is
    /// expected to abort start-up.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.check()?;
        Ok(config)
    }

    /// Validate ranges and the synonym dictionary
    pub fn check(&self) -> Result<()> {
        self.validate()
            .map_err(|e| AppError::ConfigurationError(e.to_string()))?;
        self.synonym_dictionary()?;
        Ok(())
    }

    pub fn synonym_dictionary(&self) -> Result<SynonymDictionary> {
        SynonymDictionary::from_map(&self.mapping.synonyms)
    }

    pub fn build_mapper(&self) -> Result<ColumnMapper> {
        Ok(ColumnMapper::new(
            self.synonym_dictionary()?,
            self.mapping.fuzzy_threshold,
        ))
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.check().is_ok());
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.mapping.fuzzy_threshold, 80.0);
        assert!(!config.export.include_status);
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "fieldsift.toml",
                r#"
                [server]
                port = 8080

                [mapping.synonyms]
                address = ["Street", "Addr Line"]
                "#,
            )?;
            jail.set_env("FIELDSIFT_MAPPING__FUZZY_THRESHOLD", "85");
            jail.set_env("FIELDSIFT_EXPORT__INCLUDE_STATUS", "true");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.mapping.fuzzy_threshold, 85.0);
            assert!(config.export.include_status);

            let mapper = config.build_mapper().map_err(|e| e.to_string())?;
            assert_eq!(mapper.map_column("addr line"), Some(TargetField::Address));
            // Other fields keep their defaults
            assert_eq!(mapper.map_column("dob"), Some(TargetField::Date));
            Ok(())
        });
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        Jail::expect_with(|jail| {
            jail.set_env("FIELDSIFT_MAPPING__FUZZY_THRESHOLD", "150");
            let err = AppConfig::load().unwrap_err();
            assert!(matches!(err, AppError::ConfigurationError(_)));
            Ok(())
        });
    }

    #[test]
    fn test_empty_synonym_list_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("fieldsift.toml", "[mapping.synonyms]\ncontact = []\n")?;
            let err = AppConfig::load().unwrap_err();
            assert!(matches!(err, AppError::ConfigurationError(_)));
            Ok(())
        });
    }
}
