use crate::fence::GeoFence;
use serde::Deserialize;

/// Complete Fenceline configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FencelineConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub map: MapConfig,
    /// Fences seeded into the catalog at startup. Bootstrapping regions
    /// is configuration, not engine knowledge.
    #[serde(default)]
    pub bootstrap_fences: Vec<GeoFence>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Map display defaults handed to UI collaborators
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_latitude")]
    pub default_center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub default_center_longitude: f64,
    #[serde(default = "default_zoom")]
    pub default_zoom: u8,
}

fn default_center_latitude() -> f64 {
    0.0
}

fn default_center_longitude() -> f64 {
    0.0
}

fn default_zoom() -> u8 {
    13
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_center_latitude: default_center_latitude(),
            default_center_longitude: default_center_longitude(),
            default_zoom: default_zoom(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<FencelineConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: FencelineConfig = toml::from_str(&contents)?;
    Ok(config)
}
