//! Engine configuration
//!
//! Layered with figment: built-in defaults, then a TOML file, then
//! `RULES_`-prefixed environment variables.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Config file read when no explicit path is given
pub const DEFAULT_CONFIG_FILE: &str = "rules.toml";

/// Prefix for environment overrides (`RULES_SEED=7`)
pub const ENV_PREFIX: &str = "RULES_";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Spell table; the built-in table when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spells_path: Option<PathBuf>,
    /// Monster table; the built-in table when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monsters_path: Option<PathBuf>,
    /// Seed for replayable dice and encounters; thread-local RNG when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Filter used when `RUST_LOG` is not set
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spells_path: None,
            monsters_path: None,
            seed: None,
            log_filter: "tabletop_rules=info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Layered figment: defaults, TOML file, environment
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load configuration. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Ok(Self::figment(path).extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = Config::load(None).expect("defaults load");
            assert_eq!(config, Config::default());
            assert_eq!(config.log_filter, "tabletop_rules=info");
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "rules.toml",
                r#"
                    seed = 42
                    log_format = "json"
                    monsters_path = "data/monsters.json"
                "#,
            )?;
            let config = Config::load(None).expect("file loads");
            assert_eq!(config.seed, Some(42));
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.monsters_path, Some(PathBuf::from("data/monsters.json")));

            jail.set_env("RULES_SEED", "7");
            let config = Config::load(None).expect("env overrides");
            assert_eq!(config.seed, Some(7));
            assert_eq!(config.log_format, LogFormat::Json);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_path_and_bad_value() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "seed = \"many\"")?;
            let err = Config::load(Some(Path::new("custom.toml")));
            assert!(matches!(err, Err(crate::error::RulesError::Config(_))));
            Ok(())
        });
    }
}
