//! Site configuration: defaults, an optional JSON file, then `FOLIO_*`
//! environment overrides.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::content::{self, Registry, RegistryError};
use crate::reveal::{RevealError, Threshold};

pub const CONFIG_ENV: &str = "FOLIO_CONFIG";
pub const THRESHOLD_ENV: &str = "FOLIO_REVEAL_THRESHOLD";
pub const SPLASH_ENV: &str = "FOLIO_SPLASH_MS";
pub const STATUS_RESET_ENV: &str = "FOLIO_STATUS_RESET_MS";
pub const CONTENT_ENV: &str = "FOLIO_CONTENT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("malformed config: {0}")]
    Parse(String),
    #[error("invalid {key} value {value:?}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Reveal(#[from] RevealError),
}

/// Email relay (EmailJS) coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub endpoint: String,
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.emailjs.com/api/v1.0/email/send".into(),
            service_id: "service_kk79a44".into(),
            template_id: "template_gsqbarq".into(),
            public_key: "YsVSI0X-oSRlKjjn5".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Visible fraction at which an item is revealed.
    pub reveal_threshold: f64,
    /// Splash screen duration before the page is shown.
    pub splash_ms: u64,
    /// How long the contact success/error banner stays up.
    pub status_reset_ms: u64,
    /// Hero word rotation period.
    pub word_interval_ms: u64,
    /// Blank gap before the next hero word appears.
    pub word_gap_ms: u64,
    pub relay: RelayConfig,
    /// Content file replacing the built-in registry.
    pub content_path: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: Threshold::DEFAULT.fraction(),
            splash_ms: 2000,
            status_reset_ms: 5000,
            word_interval_ms: 3000,
            word_gap_ms: 500,
            relay: RelayConfig::default(),
            content_path: None,
        }
    }
}

impl SiteConfig {
    /// Defaults, overlaid by the file named in `FOLIO_CONFIG` and by the
    /// `FOLIO_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => {
                debug!("{CONFIG_ENV} not set, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&data)?;
        info!(path = %path.display(), "loaded site config");
        Ok(config)
    }

    pub fn from_json(data: &[u8]) -> Result<Self, ConfigError> {
        serde_json::from_slice(data).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply overrides from `lookup` (the process environment in
    /// [`load`](Self::load)).
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        override_from(&lookup, THRESHOLD_ENV, &mut self.reveal_threshold)?;
        override_from(&lookup, SPLASH_ENV, &mut self.splash_ms)?;
        override_from(&lookup, STATUS_RESET_ENV, &mut self.status_reset_ms)?;
        if let Some(path) = lookup(CONTENT_ENV) {
            info!("{CONTENT_ENV} set, content from {path}");
            self.content_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Threshold::new(self.reveal_threshold)?;
        for (key, value) in [
            ("word_interval_ms", self.word_interval_ms),
            ("status_reset_ms", self.status_reset_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    value: value.to_string(),
                    reason: "must be positive".into(),
                });
            }
        }
        if self.word_gap_ms >= self.word_interval_ms {
            return Err(ConfigError::InvalidValue {
                key: "word_gap_ms".into(),
                value: self.word_gap_ms.to_string(),
                reason: "must be shorter than word_interval_ms".into(),
            });
        }
        Ok(())
    }

    pub fn threshold(&self) -> Threshold {
        Threshold::new(self.reveal_threshold).unwrap_or_default()
    }

    pub fn splash(&self) -> Duration {
        Duration::from_millis(self.splash_ms)
    }

    pub fn status_reset(&self) -> Duration {
        Duration::from_millis(self.status_reset_ms)
    }

    pub fn word_interval(&self) -> Duration {
        Duration::from_millis(self.word_interval_ms)
    }

    pub fn word_gap(&self) -> Duration {
        Duration::from_millis(self.word_gap_ms)
    }

    /// The content registry this configuration points at.
    pub fn registry(&self) -> Result<Arc<Registry>, RegistryError> {
        match &self.content_path {
            Some(path) => Registry::load(path).map(Arc::new),
            None => content::builtin().map(|r| Arc::new(r.clone())),
        }
    }
}

fn override_from<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    slot: &mut T,
) -> Result<(), ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    let value = raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }
    })?;
    info!("{key} set, overriding default");
    *slot = value;
    Ok(())
}
