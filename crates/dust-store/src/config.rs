//! Configuration for a durable ledger instance.
//!
//! Provides [`StoreConfig`] with defaults for the data directory and log
//! filter. The configuration is customized programmatically; the CLI maps
//! its flags onto it.

use std::path::PathBuf;

/// Configuration for a durable ledger instance.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "debug", "dust_store=trace").
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dust");

        Self {
            data_dir,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Path to the RocksDB ledger data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("ledgerdata")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_log_level_is_info() {
        let cfg = StoreConfig::default();
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn default_data_dir_ends_with_dust() {
        let cfg = StoreConfig::default();
        assert!(
            cfg.data_dir.ends_with("dust"),
            "data_dir should end with 'dust': {:?}",
            cfg.data_dir
        );
    }

    #[test]
    fn db_path_appends_ledgerdata() {
        let cfg = StoreConfig {
            data_dir: PathBuf::from("/tmp/dust-test"),
            ..StoreConfig::default()
        };
        assert_eq!(cfg.db_path(), PathBuf::from("/tmp/dust-test/ledgerdata"));
    }

    #[test]
    fn config_is_clone_and_debug() {
        let cfg = StoreConfig::default();
        let cfg2 = cfg.clone();
        let debug = format!("{cfg2:?}");
        assert!(debug.contains("StoreConfig"));
    }
}
