//! Configuration management for fontfox
//!
//! This module provides configuration handling via environment variables
//! and runtime settings.

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Global configuration for fontfox runs
#[derive(Debug, Clone)]
pub struct FontfoxConfig {
    /// Font and scratch directories
    pub font_paths: FontPaths,
    /// Install behaviour switches
    pub behavior: Behavior,
    /// Platform registrar settings
    pub platform: Platform,
    /// Logging and output settings
    pub logging: Logging,
}

/// Directory configuration
#[derive(Debug, Clone)]
pub struct FontPaths {
    /// Override user font directory (FONTFOX_USER_FONT_DIR)
    pub user_font_dir_override: Option<PathBuf>,
    /// Parent of per-run scratch directories (FONTFOX_TEMP_DIR)
    pub temp_directory: PathBuf,
}

/// Install behaviour
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Report installs without performing them
    pub dry_run_mode: bool,
    /// Replace fonts that already exist in the user font directory
    pub overwrite_existing: bool,
}

/// Platform registrar settings
#[derive(Debug, Clone)]
pub struct Platform {
    /// AppleScript run after a font is opened in Font Book
    pub install_script: PathBuf,
}

/// Logging and output configuration
#[derive(Debug, Clone)]
pub struct Logging {
    /// Default log filter (trace, debug, info, warn, error)
    pub level: String,
    /// Emit the run report as JSON
    pub json_output: bool,
}

impl Default for FontfoxConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self::minimal())
    }
}

impl FontfoxConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            font_paths: FontPaths::from_env()?,
            behavior: Behavior::from_env()?,
            platform: Platform::from_env()?,
            logging: Logging::from_env()?,
        })
    }

    /// Create minimal default configuration
    pub fn minimal() -> Self {
        Self {
            font_paths: FontPaths::minimal(),
            behavior: Behavior::minimal(),
            platform: Platform::minimal(),
            logging: Logging::minimal(),
        }
    }

    /// Get effective user font directory
    pub fn user_font_dir(&self) -> PathBuf {
        self.font_paths
            .user_font_dir_override
            .clone()
            .unwrap_or_else(default_user_font_dir)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            anyhow::bail!("Log level must not be empty");
        }

        let temp = &self.font_paths.temp_directory;
        if temp.exists() && !temp.is_dir() {
            anyhow::bail!("Temporary directory is not a directory: {:?}", temp);
        }

        Ok(())
    }
}

impl FontPaths {
    pub fn from_env() -> Result<Self> {
        let user_font_dir_override = env::var_os("FONTFOX_USER_FONT_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let temp_directory = env::var_os("FONTFOX_TEMP_DIR")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_temp_directory);

        Ok(Self {
            user_font_dir_override,
            temp_directory,
        })
    }

    pub fn minimal() -> Self {
        Self {
            user_font_dir_override: None,
            temp_directory: default_temp_directory(),
        }
    }
}

impl Behavior {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            dry_run_mode: env_flag("FONTFOX_DRY_RUN", false)?,
            overwrite_existing: env_flag("FONTFOX_OVERWRITE", false)?,
        })
    }

    pub fn minimal() -> Self {
        Self {
            dry_run_mode: false,
            overwrite_existing: false,
        }
    }
}

impl Platform {
    pub fn from_env() -> Result<Self> {
        let install_script = env::var_os("FONTFOX_INSTALL_SCRIPT")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_install_script);

        Ok(Self { install_script })
    }

    pub fn minimal() -> Self {
        Self {
            install_script: default_install_script(),
        }
    }
}

impl Logging {
    pub fn from_env() -> Result<Self> {
        let level = env::var("FONTFOX_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());

        Ok(Self {
            level,
            json_output: env_flag("FONTFOX_JSON", false)?,
        })
    }

    pub fn minimal() -> Self {
        Self {
            level: "warn".to_string(),
            json_output: false,
        }
    }
}

/// Parse a boolean environment variable; unset means `default`
fn env_flag(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Ok(value) => parse_flag(&value).with_context(|| format!("Invalid value for {}", key)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {:?}", other),
    }
}

/// Expand a leading `~` component to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    path.to_path_buf()
}

/// Get default user font directory based on platform
fn default_user_font_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join("Library")
            .join("Fonts")
    }

    #[cfg(target_os = "windows")]
    {
        dirs::data_local_dir()
            .map(|dir| dir.join("Microsoft").join("Windows").join("Fonts"))
            .unwrap_or_else(|| PathBuf::from("C:\\Windows\\Fonts"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        dirs::font_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join(".local")
                .join("share")
                .join("fonts")
        })
    }
}

/// Get default scratch parent directory
fn default_temp_directory() -> PathBuf {
    env::temp_dir().join("fontfox")
}

fn default_install_script() -> PathBuf {
    PathBuf::from("install-font.scpt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FontfoxConfig::minimal();
        assert!(config.validate().is_ok());
        assert!(!config.behavior.dry_run_mode);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_user_font_dir() {
        let config = FontfoxConfig::minimal();
        assert!(!config.user_font_dir().as_os_str().is_empty());

        let mut config = FontfoxConfig::minimal();
        config.font_paths.user_font_dir_override = Some(PathBuf::from("/tmp/fontfox-fonts"));
        assert_eq!(config.user_font_dir(), PathBuf::from("/tmp/fontfox-fonts"));
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home(Path::new("/abs/fonts.zip")),
            PathBuf::from("/abs/fonts.zip")
        );
        assert_eq!(
            expand_home(Path::new("rel/~fonts.zip")),
            PathBuf::from("rel/~fonts.zip")
        );

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/fonts.zip")), home.join("fonts.zip"));
            assert_eq!(expand_home(Path::new("~")), home);
        }
    }

    #[test]
    fn test_validation() {
        let mut config = FontfoxConfig::minimal();
        assert!(config.validate().is_ok());

        config.logging.level = "  ".to_string();
        assert!(config.validate().is_err());

        let file = tempfile::NamedTempFile::new().expect("temp file");
        let mut config = FontfoxConfig::minimal();
        config.font_paths.temp_directory = file.path().to_path_buf();
        assert!(config.validate().is_err());
    }
}
