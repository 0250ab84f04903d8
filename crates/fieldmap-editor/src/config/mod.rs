//! Editor configuration module
//!
//! Initial map view and the stroke and marker styling of the map layers.

mod manager;

pub use manager::{ConfigError, ConfigManager, SharedConfig, create_shared_config};

use fieldmap_core::{LatLng, MapStyle};
use serde::{Deserialize, Serialize};

/// Initial map view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapViewConfig {
    /// Map center
    pub center: LatLng,
    /// Zoom level
    pub zoom: u8,
}

impl Default for MapViewConfig {
    fn default() -> Self {
        Self {
            center: LatLng::new(55.505, 10.09),
            zoom: 13,
        }
    }
}

/// Complete editor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EditorConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Initial map view
    #[serde(default)]
    pub map_view: MapViewConfig,
    /// Stroke and marker styling
    #[serde(default)]
    pub style: MapStyle,
}

impl EditorConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }

    /// Styling handed to the map document
    pub fn map_style(&self) -> MapStyle {
        self.style.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::new();
        assert_eq!(config.version, EditorConfig::CURRENT_VERSION);
        assert_eq!(config.map_view.zoom, 13);
        assert_eq!(config.map_view.center, LatLng::new(55.505, 10.09));
        assert_eq!(config.style.fallback_color, "#3388ff");
        assert_eq!(config.style.edge_weight, 5.0);
        assert_eq!(config.style.marker.anchor(), [16.0, 16.0]);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EditorConfig = ron::from_str("(version: 1, map_view: (center: (lat: 56.0, lng: 9.5), zoom: 15))").unwrap();
        assert_eq!(config.map_view.zoom, 15);
        assert_eq!(config.style, MapStyle::default());
    }

    #[test]
    fn test_ron_roundtrip() {
        let mut config = EditorConfig::new();
        config.style.edge_opacity = 0.4;
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: EditorConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
