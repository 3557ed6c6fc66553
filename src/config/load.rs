//! The main config loading module for runa-ls.
//!
//! Handles loading and deserializing settings from `ls.toml`.
//!
//! Provides and manages the main [Config] struct, as well as the internal [RawConfig] used for
//! parsing and processing.
//!
//! Also implements default config generation for `rls --init`.

use crate::config::{General, InternalGeneral};
use crate::utils::get_home;

use serde::Deserialize;
use std::{fs, io, path::Path, path::PathBuf};

/// Raw configuration as read from the toml file
/// This struct is deserialized directly from the toml file.
/// It uses owned types and is then converted into the main [Config] struct.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
}

/// Main configuration struct for runa-ls
/// This struct holds the processed configuration options used by the lister.
#[derive(Debug)]
pub struct Config {
    general: InternalGeneral,
}

/// Conversion from RawConfig to Config
/// This handles any necessary processing of the raw values
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
        }
    }
}

impl Config {
    /// Load configuration from the default path
    /// If the file does not exist or fails to parse, returns the default configuration.
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no config at {}, using internal defaults", path.display());
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<RawConfig>(&content) {
                Ok(raw) => {
                    log::debug!("loaded config from {}", path.display());
                    raw.into()
                }
                Err(e) => {
                    eprintln!("rls: error parsing config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("cannot read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    /// Determine the default configuration file path.
    /// Checks the RLS_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/runa/ls.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("RLS_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("runa/ls.toml");
        }

        if let Some(home) = get_home() {
            return home.join(".config/runa/ls.toml");
        }
        PathBuf::from("ls.toml")
    }

    /// Generate a default configuration file at the specified path.
    /// If the file already exists, returns an error.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {:?}", path),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = r##"# ls.toml - default configuration for rls

# Note:
# Commented values are the internal defaults of rls.
# Command line flags always take precedence over these settings.

[general]
# sort = "name"            # "none", "name", "extension", "width", "size", "version", "time"
# time = "modified"        # "modified", "changed", "accessed", "birth"
# reverse = false
# dirs_first = false
# classify = false
# show_hidden = false
# collation = "auto"       # "auto", "locale", "bytes"
# tabsize = 0              # 0 pads with spaces only
# width = 80               # unset: detect the terminal width
"##;

        fs::write(path, content)?;
        println!("Default config generated at {:?}", path);
        Ok(())
    }
}

/// Default configuration options
impl Default for Config {
    fn default() -> Self {
        Config {
            general: InternalGeneral::from(General::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{SortBy, TimeField};
    use tempfile::tempdir;

    #[test]
    fn generated_config_parses() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("nested/ls.toml");
        Config::generate_default(&path)?;

        let config = Config::load_from(&path);
        assert_eq!(config.general().sort(), SortBy::Name);
        assert!(Config::generate_default(&path).is_err());
        Ok(())
    }

    #[test]
    fn invalid_config_falls_back() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("ls.toml");
        fs::write(&path, "[general]\nsort = 42\n")?;

        let config = Config::load_from(&path);
        assert_eq!(config.general().sort(), SortBy::Name);
        Ok(())
    }

    #[test]
    fn raw_config_reads_general() -> Result<(), Box<dyn std::error::Error>> {
        let raw: RawConfig = toml::from_str(
            r#"
            [general]
            sort = "time"
            time = "atime"
            "#,
        )?;
        let config = Config::from(raw);
        assert_eq!(config.general().sort(), SortBy::Time);
        assert_eq!(config.general().time(), TimeField::Accessed);
        Ok(())
    }
}
