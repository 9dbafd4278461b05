use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Root of the Open Notify API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Where the rendered map is written
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub assets: AssetConfig,

    #[serde(default)]
    pub reference: ReferenceLocation,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetConfig {
    #[serde(default = "default_map_image")]
    pub map_image: PathBuf,

    #[serde(default = "default_iss_icon")]
    pub iss_icon: PathBuf,

    #[serde(default = "default_fonts_dir")]
    pub fonts_dir: PathBuf,
}

/// Fixed ground location whose next ISS pass gets labelled on the map
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReferenceLocation {
    #[serde(default = "default_reference_latitude")]
    pub latitude: f64,

    #[serde(default = "default_reference_longitude")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Keep serving the map until Ctrl-C
    #[serde(default = "default_viewer_enable")]
    pub enable: bool,

    #[serde(default = "default_viewer_port")]
    pub port: u16,

    /// URL prefix for the map directory (e.g. "map" -> /map/iss_map.png)
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

fn default_base_url() -> String {
    "http://api.open-notify.org".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_output_dir() -> String {
    "data/image_cache".to_string()
}

fn default_map_image() -> PathBuf {
    PathBuf::from("assets/map.gif")
}

fn default_iss_icon() -> PathBuf {
    PathBuf::from("assets/iss.gif")
}

fn default_fonts_dir() -> PathBuf {
    PathBuf::from("fonts")
}

// Indianapolis, IN
fn default_reference_latitude() -> f64 {
    39.768403
}

fn default_reference_longitude() -> f64 {
    -86.158068
}

fn default_viewer_enable() -> bool {
    true
}

fn default_viewer_port() -> u16 {
    3030
}

fn default_url_prefix() -> String {
    "map".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            output_dir: default_output_dir(),
            assets: AssetConfig::default(),
            reference: ReferenceLocation::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            map_image: default_map_image(),
            iss_icon: default_iss_icon(),
            fonts_dir: default_fonts_dir(),
        }
    }
}

impl Default for ReferenceLocation {
    fn default() -> Self {
        Self {
            latitude: default_reference_latitude(),
            longitude: default_reference_longitude(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            enable: default_viewer_enable(),
            port: default_viewer_port(),
            url_prefix: default_url_prefix(),
        }
    }
}

impl TrackerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: TrackerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        Ok(config)
    }
}

pub static CONFIG: OnceLock<TrackerConfig> = OnceLock::new();

/// Load `config.toml` into [`CONFIG`], falling back to defaults when it does not exist
pub fn read_config() -> anyhow::Result<&'static TrackerConfig> {
    let config = if Path::new(CONFIG_PATH).exists() {
        TrackerConfig::from_file(CONFIG_PATH)?
    } else {
        TrackerConfig::default()
    };

    Ok(CONFIG.get_or_init(|| config))
}
