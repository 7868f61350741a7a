use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::plan::TieBreak;

/// Main configuration for the keyframe splitter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool locations and limits
    pub tools: ToolsConfig,

    /// Split resolution and output naming
    pub split: SplitConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.tools.validate()?;
        self.split.validate()?;
        Ok(())
    }
}

/// External tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// ffprobe executable (looked up on PATH when bare)
    pub ffprobe: PathBuf,

    /// ffmpeg executable (looked up on PATH when bare)
    pub ffmpeg: PathBuf,

    /// Maximum time for the keyframe probe (seconds)
    pub probe_timeout_secs: u64,

    /// Maximum time for each segment extraction (seconds)
    pub split_timeout_secs: u64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from("ffprobe"),
            ffmpeg: PathBuf::from("ffmpeg"),
            probe_timeout_secs: 600,
            split_timeout_secs: 1800,
        }
    }
}

impl ToolsConfig {
    fn validate(&self) -> Result<()> {
        for (key, path) in [("tools.ffprobe", &self.ffprobe), ("tools.ffmpeg", &self.ffmpeg)] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: String::new(),
                }.into());
            }
        }

        for (key, secs) in [
            ("tools.probe_timeout_secs", self.probe_timeout_secs),
            ("tools.split_timeout_secs", self.split_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: secs.to_string()
                }.into());
            }
        }

        Ok(())
    }
}

/// Split configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Keyframe choice for timestamps between two keyframes
    pub tie_break: TieBreak,

    /// Inserted between the input stem and the part number, e.g. `movie-part2.mp4`
    pub part_suffix: String,

    /// Extension of the output files, without the dot
    pub extension: String,

    /// Overwrite existing output files
    pub overwrite: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            tie_break: TieBreak::Nearest,
            part_suffix: "-part".to_string(),
            extension: "mp4".to_string(),
            overwrite: true,
        }
    }
}

impl SplitConfig {
    fn validate(&self) -> Result<()> {
        if self.part_suffix.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                key: "split.part_suffix".to_string(),
                value: self.part_suffix.clone()
            }.into());
        }

        if self.extension.is_empty()
            || self.extension.starts_with('.')
            || self.extension.contains(['/', '\\'])
        {
            return Err(ConfigError::InvalidValue {
                key: "split.extension".to_string(),
                value: self.extension.clone()
            }.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.split.tie_break = TieBreak::PreferBefore;
        original_config.tools.ffmpeg = PathBuf::from("/opt/ffmpeg/bin/ffmpeg");

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(loaded_config, original_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[split]\ntie_break = \"prefer-after\"\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.split.tie_break, TieBreak::PreferAfter);
        assert_eq!(config.split.extension, "mp4");
        assert_eq!(config.tools, ToolsConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = Config::from_file(dir.path().join("nope.toml"));

        assert!(matches!(
            result,
            Err(crate::error::SplitterError::Config(ConfigError::FileNotFound { .. }))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.tools.split_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.split.extension = ".mkv".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.split.part_suffix = "/part".to_string();
        assert!(config.validate().is_err());
    }
}
