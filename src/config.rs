use std::path::PathBuf;

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub network: NetworkConfig,
    pub table: TableConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Base URL of the document store's HTTP interface; the three
    /// collections live at /visits, /bookings, and /events under it.
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkConfig {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableConfig {
    pub page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub show_comparison: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            show_comparison: true,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("balai-monitor");

        let builder = Config::builder()
            // 1. Default values
            .set_default("store.base_url", "http://localhost:5000/api")?
            .set_default("network.request_timeout_secs", 30)?
            .set_default("network.connect_timeout_secs", 10)?
            .set_default("table.page_size", 10)?
            .set_default("dashboard.show_comparison", true)?
            // 2. Local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // 3. User config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))
            // 4. Environment variables (BALAI__STORE__BASE_URL=...)
            .add_source(Environment::with_prefix("BALAI").separator("__"));

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }
}
