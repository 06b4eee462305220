//! Directory of community discussion groups: the data-synchronization and
//! view-state layer between a remote store of groups and whoever displays them.
//!
//! - [`store`]: gateway to the remote collection (`GroupStore`), with MySQL and
//!   in-memory implementations.
//! - [`directory`]: the local list, its sync status and the reconciliation rules.
//! - [`filter`]: search text and category selection over the local list.
//! - [`admin`]: the admin-mode toggle guarding privileged controls.
//! - [`routes`]: actix-web JSON API standing in for the display layer.

use log::{error, info, warn};

use crate::directory::within;

pub mod admin;
pub mod config;
pub mod directory;
pub mod error;
pub mod filter;
pub mod models;
pub mod routes;
pub mod seed;
pub mod store;

pub use admin::{AdminGate, Attempt, GateState};
pub use config::{Config, StoreConfig};
pub use directory::{Directory, SyncStatus};
pub use error::DirectoryError;
pub use filter::{filter_groups, CategoryFilter};
pub use models::{Category, Group, GroupFields, GroupId, GroupPatch};
pub use store::{GroupStore, MemoryStore, SqlGroupStore};

/// Builds the directory described by `config`. Missing settings give a directory
/// stuck in `Failed(Configuration)` rather than an error, so the service still starts.
pub async fn open_directory(config: &Config) -> Directory<SqlGroupStore> {
    let store_config = match &config.store {
        Ok(store_config) => store_config,
        Err(e) => return Directory::unconfigured(e.clone()),
    };

    let store = match SqlGroupStore::connect_lazy(store_config, config.request_timeout) {
        Ok(store) => store,
        Err(e) => return Directory::unconfigured(e),
    };

    if config.migrate {
        if let Err(e) = within(config.request_timeout, store.run_migrations()).await {
            error!("Schema bootstrap failed: {}", e);
        }
    }
    if config.seed_demo {
        match within(config.request_timeout, seed::seed_demo_groups(&store)).await {
            Ok(count) => info!("Demo seed inserted {} groups", count),
            Err(e) => warn!("Demo seed skipped: {}", e),
        }
    }

    Directory::with_timeout(store, config.request_timeout)
}
