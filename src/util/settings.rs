//! Layered configuration: defaults, `settings.json`, `.env`, environment.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "CropAdvisor";
const APP_NAME: &str = "CropAdvisor";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_WEATHER_URL: &str = "http://api.openweathermap.org/data/2.5/";
pub const DEFAULT_MODEL_PATH: &str = "plant_disease_model.onnx";
pub const DEFAULT_LABELS_PATH: &str = "plant_disease_labels.txt";

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_WEATHER_URL: &str = "CROP_ADVISOR_WEATHER_URL";
pub const ENV_MODEL_PATH: &str = "CROP_ADVISOR_MODEL_PATH";
pub const ENV_LABELS_PATH: &str = "CROP_ADVISOR_LABELS_PATH";
pub const ENV_LAYOUT: &str = "CROP_ADVISOR_TENSOR_LAYOUT";
pub const ENV_NORMALIZATION: &str = "CROP_ADVISOR_NORMALIZATION";
pub const ENV_SCORES: &str = "CROP_ADVISOR_SCORES";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub weather: WeatherSettings,
    pub classifier: ClassifierSettings,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherSettings {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_URL.to_string(),
        }
    }
}

impl fmt::Debug for WeatherSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub layout: TensorLayout,
    pub normalization: Normalization,
    pub scores: ScoreMode,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            labels_path: PathBuf::from(DEFAULT_LABELS_PATH),
            layout: TensorLayout::default(),
            normalization: Normalization::default(),
            scores: ScoreMode::default(),
        }
    }
}

/// Memory layout of the model's image input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// Batch, height, width, channels (Keras exports).
    #[default]
    Nhwc,
    /// Batch, channels, height, width (PyTorch exports).
    Nchw,
}

impl TensorLayout {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "nhwc" => Some(Self::Nhwc),
            "nchw" => Some(Self::Nchw),
            _ => None,
        }
    }
}

/// Per-channel pixel normalization the model was trained with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Scale to [-1, 1].
    #[default]
    Inception,
    /// Subtract ImageNet mean, divide by std.
    ImageNet,
}

impl Normalization {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "inception" => Some(Self::Inception),
            "imagenet" => Some(Self::ImageNet),
            _ => None,
        }
    }
}

/// How raw model outputs become confidences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreMode {
    /// Keep outputs that already sum to one, softmax anything else.
    #[default]
    Auto,
    /// Always apply a softmax.
    Softmax,
    /// Report outputs unchanged, e.g. independent sigmoid scores.
    Raw,
}

impl ScoreMode {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "softmax" => Some(Self::Softmax),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Serde {
        path: PathBuf,
        #[source]
        source: SerdeError,
    },
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

fn settings_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
}

impl AppSettings {
    /// Builds the effective settings for this run.
    pub fn load() -> Result<Self, SettingsError> {
        let mut settings = match settings_file() {
            Some(path) => Self::from_file(&path)?.unwrap_or_default(),
            None => {
                tracing::warn!("no config directory available, using defaults");
                Self::default()
            }
        };

        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("loaded environment from {}", path.display()),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!("ignoring .env file: {err}"),
        }

        settings.apply_env(|key| std::env::var(key).ok())?;
        tracing::debug!(?settings, "settings resolved");
        Ok(settings)
    }

    /// Reads a settings file; `Ok(None)` when it does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>, SettingsError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no settings file at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let settings = serde_json::from_str(&data).map_err(|source| SettingsError::Serde {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(Some(settings))
    }

    /// Overrides fields from variables resolved by `lookup`; empty values are skipped.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.weather.api_key = Some(key);
        }
        if let Some(url) = get(ENV_WEATHER_URL) {
            self.weather.base_url = url;
        }
        if let Some(path) = get(ENV_MODEL_PATH) {
            self.classifier.model_path = PathBuf::from(path);
        }
        if let Some(path) = get(ENV_LABELS_PATH) {
            self.classifier.labels_path = PathBuf::from(path);
        }
        if let Some(raw) = get(ENV_LAYOUT) {
            self.classifier.layout =
                TensorLayout::parse(&raw).ok_or(SettingsError::InvalidValue {
                    key: ENV_LAYOUT,
                    value: raw,
                })?;
        }
        if let Some(raw) = get(ENV_NORMALIZATION) {
            self.classifier.normalization =
                Normalization::parse(&raw).ok_or(SettingsError::InvalidValue {
                    key: ENV_NORMALIZATION,
                    value: raw,
                })?;
        }
        if let Some(raw) = get(ENV_SCORES) {
            self.classifier.scores = ScoreMode::parse(&raw).ok_or(SettingsError::InvalidValue {
                key: ENV_SCORES,
                value: raw,
            })?;
        }
        Ok(())
    }
}
