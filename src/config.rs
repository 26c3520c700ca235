use crate::error::ConfigError;
use crate::types::document::{FontSize, TrackLabels};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const DEFAULT_HISTORY_DEPTH: usize = 20;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub history_depth: usize,
    pub label_a: String,
    pub label_b: String,
    pub default_font_size: f32,
    pub mask_second_column: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("bitext-data"),
            history_depth: DEFAULT_HISTORY_DEPTH,
            label_a: "Bangla".to_string(),
            label_b: "English".to_string(),
            default_font_size: FontSize::DEFAULT.value(),
            mask_second_column: true,
        }
    }
}

impl Config {
    pub fn labels(&self) -> TrackLabels {
        TrackLabels::new(&self.label_a, &self.label_b)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "history_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(FontSize::MIN..=FontSize::MAX).contains(&self.default_font_size) {
            return Err(ConfigError::Invalid {
                field: "default_font_size",
                reason: format!(
                    "{} is outside {}..={}",
                    self.default_font_size,
                    FontSize::MIN,
                    FontSize::MAX
                ),
            });
        }
        if self.label_a.trim().is_empty() || self.label_b.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "label_a/label_b",
                reason: "track labels must not be empty".to_string(),
            });
        }
        Ok(self)
    }
}

pub fn parse_config(path: &Path, contents: &str) -> Result<Config, ConfigError> {
    toml::from_str::<Config>(contents)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?
        .validate()
}

/// Loads the configuration, falling back to defaults when the file is absent.
pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    match fs::read_to_string(file_path) {
        Ok(contents) => parse_config(file_path, &contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!(
                "{} not found, using default configuration",
                file_path.display()
            );
            Ok(Config::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: file_path.to_path_buf(),
            source,
        }),
    }
}
