use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use fleet_core::{CompatibilityPredicate, ContextFingerprint, ExactContext, MatchingKeys};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub expiration: ExpirationConfig,
    #[serde(default)]
    pub compatibility: CompatibilityConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationConfig {
    /// How long a redundant idle worker may linger before it is asked to stop.
    pub idle_compatible_timeout_ms: u64,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self { idle_compatible_timeout_ms: 10_000 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityConfig {
    #[serde(default)]
    pub mode: CompatibilityMode,
    /// Attribute names compared in `keys` mode.
    #[serde(default)]
    pub keys: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompatibilityMode {
    #[default]
    Exact,
    Keys,
}

/// Predicate selected by configuration.
#[derive(Clone, Debug)]
pub enum FleetPredicate {
    Exact(ExactContext),
    Keys(MatchingKeys),
}

impl CompatibilityPredicate for FleetPredicate {
    fn is_compatible(&self, reference: &ContextFingerprint, candidate: &ContextFingerprint) -> bool {
        match self {
            FleetPredicate::Exact(p) => p.is_compatible(reference, candidate),
            FleetPredicate::Keys(p) => p.is_compatible(reference, candidate),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(cfg)
    }

    /// Loads `path` if it exists, otherwise returns defaults without writing anything.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let s = toml::to_string_pretty(self).with_context(|| "serialize toml")?;
        std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    pub fn idle_compatible_timeout(&self) -> Duration {
        Duration::from_millis(self.expiration.idle_compatible_timeout_ms)
    }

    pub fn predicate(&self) -> FleetPredicate {
        match self.compatibility.mode {
            CompatibilityMode::Exact => FleetPredicate::Exact(ExactContext),
            CompatibilityMode::Keys => FleetPredicate::Keys(MatchingKeys::new(self.compatibility.keys.iter().cloned())),
        }
    }

    pub fn config_path(root: &Path) -> PathBuf {
        root.join(".fleet").join("fleet.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_exact_and_ten_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.idle_compatible_timeout(), Duration::from_secs(10));
        assert!(matches!(cfg.predicate(), FleetPredicate::Exact(_)));
    }

    #[test]
    fn parses_keys_mode() {
        let cfg: Config = toml::from_str(
            r#"
            [expiration]
            idle_compatible_timeout_ms = 2500

            [compatibility]
            mode = "keys"
            keys = ["toolchain"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.idle_compatible_timeout(), Duration::from_millis(2_500));
        let p = cfg.predicate();
        let a = ContextFingerprint::new().with("toolchain", "17").with("flags", "x");
        let b = ContextFingerprint::new().with("toolchain", "17").with("flags", "y");
        assert!(p.is_compatible(&a, &b));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::config_path(dir.path());
        let mut cfg = Config::default();
        cfg.expiration.idle_compatible_timeout_ms = 42;
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn load_or_default_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Config::config_path(dir.path());
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
        assert!(!path.exists());
    }
}
