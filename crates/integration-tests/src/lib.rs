//! Integration tests for the Lustre storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lustre-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_session` - Session commands driven through a file-backed store
//! - `persistence` - Snapshot format and recovery from damaged storage
//!
//! Each test gets its own temporary data directory via [`TestContext`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use lustre_storefront::catalog::Catalog;
use lustre_storefront::config::StorefrontConfig;
use lustre_storefront::controller::{AppEvent, Storefront};
use lustre_storefront::session::{self, Flow};
use lustre_storefront::store::{FileStore, KeyValueStore};
use tempfile::TempDir;
use tokio::sync::mpsc::{self, UnboundedReceiver};

/// A storefront over a private temporary data directory.
pub struct TestContext {
    pub dir: TempDir,
    pub config: StorefrontConfig,
    pub shop: Storefront,
    pub events: UnboundedReceiver<AppEvent>,
}

impl TestContext {
    /// Start a storefront in a fresh data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        Self::in_dir(dir)
    }

    /// Start a storefront over an existing data directory, as a restarted
    /// session would.
    ///
    /// # Panics
    ///
    /// Panics if the storefront cannot be wired.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn in_dir(dir: TempDir) -> Self {
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            page_path: dir.path().join("index.html"),
            ..StorefrontConfig::default()
        };
        let (tx, events) = mpsc::unbounded_channel();
        let mut shop = Storefront::from_config(&config, tx).expect("wire storefront");
        shop.start();
        Self {
            dir,
            config,
            shop,
            events,
        }
    }

    /// Restart the session over the same data directory.
    #[must_use]
    pub fn restart(self) -> Self {
        Self::in_dir(self.dir)
    }

    /// Run session command lines in order, returning the last flow.
    ///
    /// # Panics
    ///
    /// Panics if a line does not parse.
    #[allow(clippy::expect_used)]
    pub fn run(&mut self, lines: &[&str]) -> Flow {
        let mut flow = Flow::Continue;
        for line in lines {
            if let Some(command) = session::parse_line(line).expect("valid command") {
                flow = session::apply(&mut self.shop, command);
            }
        }
        flow
    }

    /// Deliver the next timer or send event.
    ///
    /// # Panics
    ///
    /// Panics if the channel closed.
    #[allow(clippy::expect_used)]
    pub async fn next_event(&mut self) -> bool {
        let event = self.events.recv().await.expect("event channel open");
        self.shop.handle_event(event)
    }

    /// Ids of the products currently in the grid.
    #[must_use]
    pub fn shown_ids(&self) -> Vec<i32> {
        self.shop
            .view()
            .cards()
            .iter()
            .map(|c| c.id.as_i32())
            .collect()
    }

    /// The file store backing this session.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        Arc::new(FileStore::open(self.dir.path()).expect("open store"))
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in catalog.
///
/// # Panics
///
/// Panics if the embedded seed is corrupt.
#[must_use]
#[allow(clippy::expect_used)]
pub fn seeded_catalog() -> Catalog {
    Catalog::seeded().expect("embedded seed")
}
