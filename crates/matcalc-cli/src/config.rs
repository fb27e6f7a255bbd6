//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `--config <path>` on the command line
//! 2. `$MATCALC_CONFIG` environment variable
//! 3. `~/.config/matcalc/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use matcalc_core::{NullspaceBasis, Settings, DEFAULT_ZERO_TOLERANCE};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub numeric: NumericConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

/// Numeric kernel settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NumericConfig {
    /// Singular values at or below this count as zero.
    pub zero_tolerance: f64,
    pub nullspace_basis: NullspaceBasis,
}

/// Output formatting.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Fixed decimals for rendered values. Default: shortest exact form.
    pub precision: Option<usize>,
}

/// Log destination. The TUI owns the terminal, so logs should go to a file
/// while it runs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub file: Option<String>,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            zero_tolerance: DEFAULT_ZERO_TOLERANCE,
            nullspace_basis: NullspaceBasis::Right,
        }
    }
}

impl Config {
    /// Session settings derived from this config.
    pub fn settings(&self) -> Settings {
        Settings {
            zero_tolerance: self.numeric.zero_tolerance,
            nullspace_basis: self.numeric.nullspace_basis,
            precision: self.display.precision,
        }
    }

    fn validate(&self) -> Result<()> {
        let tol = self.numeric.zero_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            bail!("numeric.zero_tolerance must be a non-negative number, got {tol}");
        }
        if matches!(self.display.precision, Some(p) if p > 17) {
            bail!("display.precision must be at most 17");
        }
        Ok(())
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = explicit.map(Path::to_path_buf).or_else(config_path);

    if let Some(p) = &path {
        if p.exists() {
            return load_config_from(p);
        }
        if explicit.is_some() {
            bail!("config file {} does not exist", p.display());
        }
    }

    Ok(Config::default())
}

/// Parse and validate a specific config file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(config)
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("MATCALC_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // 2. ~/.config/matcalc/config.toml
    directories::BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("matcalc")
            .join("config.toml")
    })
}

/// Show the active config path (for `matcalc config`).
pub fn show_config_path(explicit: Option<&Path>) -> String {
    match explicit.map(Path::to_path_buf).or_else(config_path) {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.numeric.zero_tolerance, 1e-12);
        assert_eq!(config.numeric.nullspace_basis, NullspaceBasis::Right);
        assert!(config.display.precision.is_none());
        assert_eq!(config.settings(), Settings::default());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[display]
precision = 4
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.display.precision, Some(4));
        // Other fields should be defaults
        assert_eq!(config.numeric.zero_tolerance, 1e-12);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[numeric]
zero_tolerance = 1e-9
nullspace_basis = "left"

[display]
precision = 3

[log]
file = "/tmp/matcalc.log"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let settings = config.settings();
        assert_eq!(settings.zero_tolerance, 1e-9);
        assert_eq!(settings.nullspace_basis, NullspaceBasis::Left);
        assert_eq!(settings.precision, Some(3));
        assert_eq!(config.log.file.as_deref(), Some("/tmp/matcalc.log"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[numeric]\nzero_tolerance = 1e-6\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.numeric.zero_tolerance, 1e-6);
    }

    #[test]
    fn test_rejects_negative_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[numeric]\nzero_tolerance = -1.0\n").unwrap();

        assert!(load_config_from(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(Some(path.as_path())).is_err());
    }
}
