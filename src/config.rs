use std::{env, fmt::Display, str::FromStr, time::Duration};

use log::{info, warn};

use crate::error::DirectoryError;

pub const STORE_URL_KEY: &str = "DIRECTORY_STORE_URL";
pub const STORE_KEY_KEY: &str = "DIRECTORY_STORE_KEY";

/// Settings needed to reach the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
    pub table: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub admin_password: String,
    pub request_timeout: Duration,
    pub migrate: bool,
    pub seed_demo: bool,
    /// `Err` when the endpoint or access key is missing. Never retried.
    pub store: Result<StoreConfig, DirectoryError>,
}

impl Config {
    /// Reads `.env` if present, then the process environment.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let store = match (var(STORE_URL_KEY), var(STORE_KEY_KEY)) {
            (Some(url), Some(key)) => table_name(var("DIRECTORY_STORE_TABLE")).map(|table| StoreConfig {
                url,
                key,
                table,
                max_connections: try_load(&var, "DIRECTORY_MAX_CONNECTIONS", 5),
            }),
            (url, key) => {
                let mut missing = Vec::new();
                if url.is_none() {
                    missing.push(STORE_URL_KEY);
                }
                if key.is_none() {
                    missing.push(STORE_KEY_KEY);
                }
                warn!("Store settings missing: {}", missing.join(", "));
                Err(DirectoryError::Configuration(missing))
            }
        };

        Self {
            bind_address: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            admin_password: var("ADMIN_PASSWORD").unwrap_or_else(|| "admin".to_string()),
            request_timeout: Duration::from_secs(try_load(&var, "DIRECTORY_TIMEOUT_SECS", 10)),
            migrate: try_load(&var, "DIRECTORY_STORE_MIGRATE", false),
            seed_demo: try_load(&var, "DIRECTORY_SEED_DEMO", false),
            store,
        }
    }
}

fn try_load<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
    }
}

fn table_name(raw: Option<String>) -> Result<String, DirectoryError> {
    let table = raw.unwrap_or_else(|| "groups".to_string());
    if table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(table)
    } else {
        Err(DirectoryError::Configuration(vec!["DIRECTORY_STORE_TABLE"]))
    }
}
