//! Configuration management for the Cadeado server
//!
//! Configuration is layered: optional YAML file, `CADEADO_*` environment
//! variables, then CLI overrides.

use clap::Parser;
use config::{Config, Environment};

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command()]
struct Cli {
    #[arg(short = 'c', long = "config")]
    config_file: Option<String>,
    #[arg(short = 'p', long = "port")]
    port: Option<u16>,
    #[arg(long = "backend")]
    backend: Option<String>,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    pub fn new() -> Self {
        let args = Cli::parse();
        let config_file = args
            .config_file
            .unwrap_or_else(|| "conf/application.yml".to_string());

        let mut config_builder = Config::builder()
            .add_source(config::File::with_name(&config_file).required(false))
            .add_source(
                Environment::with_prefix("cadeado")
                    .separator("_")
                    .try_parsing(true),
            );

        if let Some(v) = args.port {
            config_builder = config_builder
                .set_override("server.port", v as i64)
                .expect("Failed to set server port override");
        }
        if let Some(v) = args.backend {
            config_builder = config_builder
                .set_override("lock.backend", v)
                .expect("Failed to set lock backend override");
        }

        let app_config = config_builder
            .build()
            .expect("Failed to build configuration");

        Configuration { config: app_config }
    }

    /// Wrap an already-built `Config` (tests and embedding).
    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    // ========================================================================
    // Server Configuration
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.config
            .get_string("server.address")
            .unwrap_or("0.0.0.0".to_string())
    }

    pub fn server_port(&self) -> u16 {
        self.config.get_int("server.port").unwrap_or(8080) as u16
    }

    // ========================================================================
    // Lock Configuration
    // ========================================================================

    pub fn lock_backend(&self) -> String {
        self.config
            .get_string("lock.backend")
            .unwrap_or("token-lease".to_string())
    }

    pub fn lock_lease_ms(&self) -> u64 {
        self.config.get_int("lock.lease-ms").unwrap_or(60_000) as u64
    }

    pub fn lock_acquire_timeout_ms(&self) -> u64 {
        self.config
            .get_int("lock.acquire-timeout-ms")
            .unwrap_or(10_000) as u64
    }

    pub fn lock_poll_interval_ms(&self) -> u64 {
        self.config.get_int("lock.poll-interval-ms").unwrap_or(100) as u64
    }

    // ========================================================================
    // Store Configuration
    // ========================================================================

    pub fn store_expiry_scan_interval_ms(&self) -> u64 {
        self.config
            .get_int("store.expiry-scan-interval-ms")
            .unwrap_or(5_000) as u64
    }

    // ========================================================================
    // Logging Configuration
    // ========================================================================

    pub fn logs_path(&self) -> Option<String> {
        self.config.get_string("logs.path").ok()
    }
}
