//! Command implementations.
//!
//! Every command writes its report to the given writer so the output can be
//! checked in tests.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod render;

use std::sync::Arc;

use lustre_storefront::catalog::Catalog;
use lustre_storefront::config::StorefrontConfig;
use lustre_storefront::controller::{Components, Storefront};
use lustre_storefront::error::AppError;
use lustre_storefront::services::MockMailer;
use lustre_storefront::store::{FileStore, KeyValueStore};
use lustre_storefront::surface::DisplaySurface;
use tokio::sync::mpsc;

/// Result type for commands.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Configuration, catalog and store shared by every command.
pub struct Context {
    pub config: StorefrontConfig,
    pub catalog: Catalog,
    store: Arc<FileStore>,
}

impl Context {
    /// Load from the environment (and `.env`).
    ///
    /// # Errors
    ///
    /// Returns `AppError` if configuration, catalog or store loading fails.
    pub fn load() -> Result<Self, AppError> {
        Self::from_config(StorefrontConfig::from_env()?)
    }

    /// Load the catalog and open the store named by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the catalog seed or the data directory is unusable.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, AppError> {
        let catalog = Catalog::load(config.catalog_path.as_deref())?;
        let store = FileStore::open(&config.data_dir)?;
        tracing::debug!(store = %store.path().display(), "Opened store");
        Ok(Self {
            config,
            catalog,
            store: Arc::new(store),
        })
    }

    /// The store as a trait object for the cart.
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// A storefront over this context. No timer events are consumed, so
    /// only synchronous actions are meaningful.
    pub fn storefront(&self) -> Storefront {
        let (events, _) = mpsc::unbounded_channel();
        Storefront::new(
            Components {
                catalog: self.catalog.clone(),
                store: self.store(),
                mailer: Arc::new(MockMailer::new(
                    self.config.timings.send_delay,
                    self.config.mailer_mode(),
                )),
                surface: DisplaySurface::full(),
                store_name: self.config.store_name.clone(),
                timings: self.config.timings,
            },
            events,
        )
    }
}
