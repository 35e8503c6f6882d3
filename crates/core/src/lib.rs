//! Core of the folio portfolio page: the static content registry, the
//! scroll-reveal tracker, per-section selection state, the contact form
//! controller, and the section layouts that turn all of it into render
//! commands.

pub mod config;
pub mod contact;
pub mod content;
pub mod hero;
pub mod model;
pub mod page;
pub mod reveal;
pub mod selection;
pub mod splash;
pub mod svg;
pub mod views;

use thiserror::Error;

pub use config::{ConfigError, RelayConfig, SiteConfig};
pub use contact::{ContactController, EmailRelay, RelayReply, RelayRequest, SubmitStatus};
pub use content::{Registry, RegistryError};
pub use page::{Effect, Page};

/// Anything that can stop the page from starting.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Load configuration and content in one step.
pub fn load() -> Result<(SiteConfig, std::sync::Arc<Registry>), Error> {
    let config = SiteConfig::load()?;
    let registry = config.registry()?;
    Ok((config, registry))
}
