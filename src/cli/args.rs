use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "skyatlas")]
#[command(version, about = "Pack layer images into a texture atlas", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a plain-text position map (x y width height "name" per line)
    Text(CommonArgs),
    /// Write a JSON position map
    Json(CommonArgs),
}

impl Command {
    pub fn args(&self) -> &CommonArgs {
        match self {
            Command::Text(args) | Command::Json(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Input image files or directories, packed in the order given
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Atlas image path; the format follows the extension [default: atlas.png]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Maximum atlas width in pixels [default: 4096]
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Maximum atlas height in pixels [default: 4096]
    #[arg(long)]
    pub max_height: Option<u32>,

    /// Round atlas dimensions up to powers of two
    #[arg(long)]
    pub pot: bool,

    /// Keep the full maximum size instead of trimming to the packed extent
    #[arg(long)]
    pub no_trim: bool,

    /// Also pack hidden layers
    #[arg(long)]
    pub all_layers: bool,

    /// Mark layers whose name matches this glob pattern as hidden (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub hidden: Vec<String>,

    /// Padding added to the width and height of every layer [default: 0]
    #[arg(short, long)]
    pub padding: Option<u32>,

    /// Order in which layers are offered to the packer [default: input]
    #[arg(long, value_enum)]
    pub order: Option<LayerOrder>,

    /// Pack mode: single (use one ordering) or best (try every ordering) [default: single]
    #[arg(long, value_enum)]
    pub pack_mode: Option<PackMode>,

    /// Output RGB instead of RGBA (opaque atlas)
    #[arg(long)]
    pub opaque: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackMode {
    /// Use the configured ordering only
    #[default]
    Single,
    /// Try every ordering and keep the most compact result
    Best,
}

/// Order in which layers are offered to the packer
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerOrder {
    /// Keep the order the layers were loaded in
    #[default]
    Input,
    /// Largest area first
    Area,
    /// Tallest first
    Height,
    /// Widest first
    Width,
    /// Longest side first
    MaxSide,
}

impl LayerOrder {
    pub const ALL: [LayerOrder; 5] = [
        LayerOrder::Input,
        LayerOrder::Area,
        LayerOrder::Height,
        LayerOrder::Width,
        LayerOrder::MaxSide,
    ];
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
