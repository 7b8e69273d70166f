//! CLI configuration.
//!
//! Loaded from `restgql.toml` (or the file given with `--config`) with
//! environment overrides such as `RESTGQL__LOGGING__LEVEL=debug`.
//!
//! # Example Configuration
//!
//! ```toml
//! schema = "schema.graphql"
//! manifest = "manifest.json"
//!
//! [synthesis]
//! custom_scalars = ["Date"]
//! schema_scalars = false
//!
//! [router]
//! body_limit_bytes = 2097152
//!
//! [logging]
//! level = "info"
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use restgql_router::RouterConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_FILE: &str = "restgql.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// GraphQL SDL file.
    #[serde(default)]
    pub schema: Option<PathBuf>,

    /// Endpoint manifest file.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    #[serde(default)]
    pub synthesis: SynthesisConfig,

    #[serde(default)]
    pub router: RouterConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Names treated as scalars in addition to the built-ins.
    #[serde(default)]
    pub custom_scalars: Vec<String>,

    /// Treat `scalar` declarations found in the SDL as scalars.
    #[serde(default)]
    pub schema_scalars: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if self
            .synthesis
            .custom_scalars
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err("synthesis.custom_scalars must not contain blank names".into());
        }
        self.router.validate()?;
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file and `RESTGQL__*` environment
/// variables.
///
/// Without an explicit path, `restgql.toml` in the working directory is used
/// when it exists.
///
/// # Errors
///
/// Returns an error if an explicit file does not exist, the sources cannot be
/// merged, or the result fails validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, String> {
    let mut builder = Config::builder();
    match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("config file {} not found", p.display()));
            }
            builder = builder.add_source(File::from(p));
        }
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                builder = builder.add_source(File::from(default_path));
            }
        }
    }
    // Environment variable overrides, e.g., RESTGQL__SYNTHESIS__CUSTOM_SCALARS=Date,JSON
    builder = builder.add_source(
        Environment::with_prefix("RESTGQL")
            .try_parsing(true)
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("synthesis.custom_scalars"),
    );
    let cfg = builder
        .build()
        .map_err(|e| format!("config build error: {e}"))?;
    let merged: AppConfig = cfg
        .try_deserialize()
        .map_err(|e| format!("config deserialize error: {e}"))?;
    merged.validate()?;
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.level, "warn");
        assert!(config.synthesis.custom_scalars.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restgql.toml");
        std::fs::write(
            &path,
            r#"
            schema = "schema.graphql"
            manifest = "manifest.toml"

            [synthesis]
            custom_scalars = ["Date", "JSON"]

            [router]
            body_limit_bytes = 4096

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.schema, Some(PathBuf::from("schema.graphql")));
        assert_eq!(config.synthesis.custom_scalars, vec!["Date", "JSON"]);
        assert!(!config.synthesis.schema_scalars);
        assert_eq!(config.router.body_limit_bytes, 4096);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restgql.toml");

        std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(load_config(Some(&path)).unwrap_err().contains("logging.level"));

        std::fs::write(&path, "[router]\nbody_limit_bytes = 0\n").unwrap();
        assert!(load_config(Some(&path)).unwrap_err().contains("body_limit_bytes"));

        std::fs::write(&path, "[synthesis]\ncustom_scalars = [\" \"]\n").unwrap();
        assert!(load_config(Some(&path)).unwrap_err().contains("blank"));
    }
}
