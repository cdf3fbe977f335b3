//! Configuration system for the OperatorOS desktop core
//!
//! Loads configuration from TOML file at `~/.config/operator-os/config.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesktopConfig {
    pub windows: WindowDefaultsConfig,
    pub placement: PlacementConfig,
    pub autosave: AutosaveConfig,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            windows: WindowDefaultsConfig::default(),
            placement: PlacementConfig::default(),
            autosave: AutosaveConfig::default(),
        }
    }
}

impl DesktopConfig {
    /// Load configuration from file, or use defaults if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            info!("Config file not found at {:?}, using defaults", config_path);
            // Auto-generate default config file
            if let Err(e) = Self::save_default(&config_path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: DesktopConfig = toml::from_str(&content)
            .context("Failed to parse config file")?;

        info!("Configuration loaded from {:?}", config_path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("operator-os");

        Ok(config_dir.join("config.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &PathBuf) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let default_config = Self::default();
        let toml_string = toml::to_string_pretty(&default_config)
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string)
            .context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

/// Defaults applied when an app is opened without explicit geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowDefaultsConfig {
    /// Default window width in pixels
    pub default_width: u32,
    /// Default window height in pixels
    pub default_height: u32,
    /// Base position for the first staggered window
    pub stagger_base_x: i32,
    pub stagger_base_y: i32,
    /// Diagonal offset between successively opened windows
    pub stagger_offset: i32,
}

impl Default for WindowDefaultsConfig {
    fn default() -> Self {
        Self {
            default_width: 900,
            default_height: 600,
            stagger_base_x: 120,
            stagger_base_y: 96,
            stagger_offset: 32,
        }
    }
}

/// Placement geometry configuration
///
/// The top strip (menu bar chrome) and bottom strip (dock) are reserved:
/// constrained windows never come to rest inside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Reserved chrome strip at the top of the viewport, in pixels
    pub top_chrome: u32,
    /// Reserved dock strip at the bottom of the viewport, in pixels
    pub dock_height: u32,
    /// Gap between tiled windows and viewport edges, in pixels
    pub tile_padding: u32,
    /// Minimum visible extent a constrained window keeps on every edge
    pub min_visible: u32,
    /// Distance at which a dragged position snaps to a viewport edge
    pub snap_threshold: i32,
    /// Cascade start position
    pub cascade_start_x: i32,
    pub cascade_start_y: i32,
    /// Diagonal offset between cascaded windows
    pub cascade_offset: i32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            top_chrome: 32,
            dock_height: 80,
            tile_padding: 12,
            min_visible: 48,
            snap_threshold: 16,
            cascade_start_x: 60,
            cascade_start_y: 72,
            cascade_offset: 40,
        }
    }
}

/// Layout autosave configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Trailing-edge debounce delay in milliseconds
    pub delay_ms: u64,
    /// Layout name autosaves are written to
    pub layout_name: String,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            layout_name: "default".to_string(),
        }
    }
}
