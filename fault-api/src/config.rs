//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use fault_core::constants::DEFAULT_MODEL_DIR;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Directory holding `feature_list.json` and the model directory
    pub artifact_root: PathBuf,

    /// Model directory, relative to `artifact_root`
    pub model_dir: String,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            artifact_root: env::var("ARTIFACT_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),

            model_dir: env::var("MODEL_DIR")
                .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string()),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            artifact_root: PathBuf::from("."),
            model_dir: DEFAULT_MODEL_DIR.to_string(),
            environment: "development".to_string(),
        }
    }
}
