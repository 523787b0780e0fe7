use serde::{Deserialize, Serialize};

use crate::cli::{LayerOrder, PackMode};

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Atlas configuration file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths, directories or glob patterns, in packing order
    pub input: Vec<String>,
    /// Atlas image path; map files are written next to it
    pub output: String,
    /// Maximum atlas width in pixels
    pub max_width: u32,
    /// Maximum atlas height in pixels
    pub max_height: u32,
    /// Round atlas dimensions up to powers of two
    pub pot: bool,
    /// Shrink the atlas to the packed extent
    pub trim: bool,
    /// Leave hidden layers out of the atlas
    pub only_visible: bool,
    /// Glob patterns of layer names to mark as hidden
    pub hidden: Vec<String>,
    /// Padding added to the width and height of every layer
    pub padding: u32,
    /// Order in which layers are offered to the packer
    pub order: LayerOrder,
    /// Pack mode: "single" or "best"
    pub pack_mode: PackMode,
    /// Output RGB instead of RGBA (opaque atlas)
    pub opaque: bool,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output: "atlas.png".to_string(),
            max_width: 4096,
            max_height: 4096,
            pot: false,
            trim: true,
            only_visible: true,
            hidden: Vec::new(),
            padding: 0,
            order: LayerOrder::Input,
            pack_mode: PackMode::Single,
            opaque: false,
            compress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AtlasConfig =
            serde_json::from_str(r#"{ "input": ["layers/*.png"], "pot": true, "order": "max-side" }"#)
                .unwrap();

        assert_eq!(config.input, vec!["layers/*.png".to_string()]);
        assert!(config.pot);
        assert_eq!(config.order, LayerOrder::MaxSide);
        assert_eq!(config.max_width, 4096);
        assert_eq!(config.output, "atlas.png");
        assert!(config.trim);
        assert!(config.only_visible);
        assert_eq!(config.pack_mode, PackMode::Single);
    }

    #[test]
    fn test_compress_config_forms() {
        let level: AtlasConfig = serde_json::from_str(r#"{ "compress": 3 }"#).unwrap();
        assert_eq!(level.compress, Some(CompressConfig::Level(3)));

        let max: AtlasConfig = serde_json::from_str(r#"{ "compress": "max" }"#).unwrap();
        assert_eq!(max.compress, Some(CompressConfig::Max("max".to_string())));
    }

    #[test]
    fn test_unknown_order_is_rejected() {
        assert!(serde_json::from_str::<AtlasConfig>(r#"{ "order": "random" }"#).is_err());
    }
}
