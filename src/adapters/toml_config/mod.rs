// TOML config adapter - Optional configuration file

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::model::ExtractionMode;
use crate::error::{SegcutError, SegcutResult};
use crate::utils::logging::LogFormat;

/// Config file picked up from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "segcut.toml";

/// Contents of `segcut.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegcutConfig {
    pub engine: EngineSection,
    pub defaults: DefaultsSection,
    pub logging: LoggingSection,
}

/// `[engine]`: media engine location and target codecs
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    pub ffmpeg: Option<PathBuf>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub crf: Option<u8>,
    pub preset: Option<String>,
}

/// `[defaults]`: per-run defaults
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultsSection {
    pub mode: Option<ExtractionMode>,
    pub temp_dir: Option<PathBuf>,
}

/// `[logging]`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

impl SegcutConfig {
    /// Load configuration.
    ///
    /// An explicitly named file must exist. Without one, `segcut.toml` in the
    /// working directory is read if present, otherwise defaults are used.
    pub fn load(explicit: Option<&Path>) -> SegcutResult<Self> {
        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(SegcutError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse one config file
    pub fn from_file(path: &Path) -> SegcutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SegcutError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            SegcutError::Config { message } => {
                SegcutError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Parse TOML text
    pub fn from_toml_str(content: &str) -> SegcutResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| SegcutError::config(format!("failed to parse TOML config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SegcutResult<()> {
        if let Some(crf) = self.engine.crf {
            if crf > 51 {
                return Err(SegcutError::config(format!(
                    "engine.crf must be between 0 and 51, got {}",
                    crf
                )));
            }
        }
        for (key, value) in [
            ("engine.video_codec", &self.engine.video_codec),
            ("engine.audio_codec", &self.engine.audio_codec),
            ("engine.preset", &self.engine.preset),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(SegcutError::config(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(SegcutConfig::from_toml_str("").unwrap(), SegcutConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = SegcutConfig::from_toml_str(
            r#"
            [engine]
            ffmpeg = "/usr/local/bin/ffmpeg"
            video_codec = "libx265"
            audio_codec = "libopus"
            crf = 20
            preset = "slow"

            [defaults]
            mode = "accurate"
            temp_dir = "scratch"

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.engine.ffmpeg,
            Some(PathBuf::from("/usr/local/bin/ffmpeg"))
        );
        assert_eq!(config.engine.video_codec.as_deref(), Some("libx265"));
        assert_eq!(config.engine.crf, Some(20));
        assert_eq!(config.defaults.mode, Some(ExtractionMode::Accurate));
        assert_eq!(config.defaults.temp_dir, Some(PathBuf::from("scratch")));
        assert_eq!(config.logging.level.as_deref(), Some("debug"));
        assert_eq!(config.logging.format, Some(LogFormat::Json));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = SegcutConfig::from_toml_str("[engine]\nthreads = 4\n").unwrap_err();
        assert!(matches!(err, SegcutError::Config { .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(SegcutConfig::from_toml_str("[defaults]\nmode = \"turbo\"\n").is_err());
        assert!(SegcutConfig::from_toml_str("[engine]\ncrf = 60\n").is_err());
        assert!(SegcutConfig::from_toml_str("[engine]\npreset = \" \"\n").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SegcutConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, SegcutError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("segcut.toml");
        std::fs::write(&path, "[defaults]\nmode = \"fast\"\n").unwrap();

        let config = SegcutConfig::load(Some(&path)).unwrap();
        assert_eq!(config.defaults.mode, Some(ExtractionMode::Fast));
    }
}
