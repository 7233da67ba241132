use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FlatKnnError, Result};
use crate::types::BackendKind;

/// Environment variable naming a TOML config file.
pub const CONFIG_PATH_ENV: &str = "FLATKNN_CONFIG";

const OVERRIDE_KEYS: [&str; 3] = ["FLATKNN_BACKEND", "FLATKNN_LOG_LEVEL", "FLATKNN_LOG_FORMAT"];

/// The `FLATKNN_*` override variables that are set. Other variables are
/// never read, so unrelated non-UTF-8 values cannot break loading.
fn env_overrides() -> Result<Vec<(&'static str, String)>> {
    let mut vars = Vec::new();
    for key in OVERRIDE_KEYS {
        match std::env::var(key) {
            Ok(value) => vars.push((key, value)),
            Err(std::env::VarError::NotPresent) => {}
            Err(std::env::VarError::NotUnicode(_)) => {
                return Err(FlatKnnError::Config(format!("{key} is not valid UTF-8")));
            }
        }
    }
    Ok(vars)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Backend built on every data ingestion.
    pub backend: BackendKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Reads `.env` if present, then the TOML file at `path` (or at
    /// `$FLATKNN_CONFIG`), falling back to defaults when neither is given,
    /// and finally applies `FLATKNN_*` environment overrides.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match path
            .map(str::to_string)
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_overrides(env_overrides()?)?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply `FLATKNN_BACKEND`, `FLATKNN_LOG_LEVEL` and `FLATKNN_LOG_FORMAT`
    /// from a key/value source. Unrelated keys are ignored.
    pub fn apply_overrides<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                "FLATKNN_BACKEND" => {
                    self.index.backend = value.parse().map_err(FlatKnnError::Config)?;
                }
                "FLATKNN_LOG_LEVEL" => self.logging.level = value.to_string(),
                "FLATKNN_LOG_FORMAT" => self.logging.format = value.to_string(),
                _ => {}
            }
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.format.as_str() {
            "text" | "json" => Ok(()),
            other => Err(FlatKnnError::Config(format!(
                "unknown log format '{other}', expected 'text' or 'json'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.index.backend, BackendKind::Exhaustive);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.index.backend, BackendKind::Exhaustive);
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides([
                ("FLATKNN_BACKEND", "faiss"),
                ("FLATKNN_LOG_FORMAT", "json"),
                ("PATH", "/usr/bin"),
            ])
            .unwrap();
        assert_eq!(config.index.backend, BackendKind::Faiss);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_bad_overrides_rejected() {
        let mut config = Config::default();
        assert!(config.apply_overrides([("FLATKNN_BACKEND", "hnsw")]).is_err());
        assert!(config
            .apply_overrides([("FLATKNN_LOG_FORMAT", "xml")])
            .is_err());
    }
}
