//! Runtime configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/crop_forest.json";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Serialized classifier artifact (MODEL_PATH)
    pub model_path: PathBuf,
    /// Optional JSON file merged over the built-in crop table (CROP_PROFILES_PATH)
    pub profiles_path: Option<PathBuf>,
    /// Bind address (HOST, PORT)
    pub host: IpAddr,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            profiles_path: None,
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from any key → value source; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            profiles_path: lookup("CROP_PROFILES_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
