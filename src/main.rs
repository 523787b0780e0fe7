use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use skyatlas::atlas::AtlasBuilder;
use skyatlas::cli::{CliArgs, Command, CommonArgs, CompressionLevel, LayerOrder, PackMode};
use skyatlas::config::{CompressConfig, LoadedConfig};
use skyatlas::layer::load_layers;
use skyatlas::output::{save_atlas_image, sibling_path, write_json, write_map};

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();
    let args = cli.command.args();

    let merged = merge_config_with_args(args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("skyatlas v{}", env!("CARGO_PKG_VERSION"));

    if let Some(parent) = merged.output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let layers = load_layers(&merged.input, &merged.hidden)?;
    info!("Loaded {} layers", layers.len());

    let atlas = AtlasBuilder::new(merged.max_width, merged.max_height)
        .padding(merged.padding)
        .power_of_two(merged.pot)
        .trim(merged.trim)
        .only_visible(merged.only_visible)
        .order(merged.order)
        .pack_mode(merged.pack_mode)
        .build(layers)?;

    save_atlas_image(&atlas, &merged.output, merged.opaque, merged.compress)?;
    info!("Saved {}", merged.output.display());

    match &cli.command {
        Command::Text(_) => {
            let map_path = sibling_path(&merged.output, "_map.txt");
            write_map(&atlas.layers, &map_path)?;
            info!("Generated {}", map_path.display());
        }
        Command::Json(_) => {
            let map_path = sibling_path(&merged.output, ".json");
            let image_name = merged
                .output
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            write_json(&atlas, &image_name, &map_path)?;
            info!("Generated {}", map_path.display());
        }
    }

    info!("Done!");

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    max_width: u32,
    max_height: u32,
    pot: bool,
    trim: bool,
    only_visible: bool,
    hidden: Vec<String>,
    padding: u32,
    order: LayerOrder,
    pack_mode: PackMode,
    opaque: bool,
    compress: Option<CompressionLevel>,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CommonArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };
    let config = loaded_config.as_ref().map(|lc| &lc.config);

    // Determine input files: CLI args override config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    // Determine output path: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output())
            .unwrap_or_else(|| PathBuf::from("atlas.png"))
    });

    // For valued fields: CLI > config > default
    let max_width = args
        .max_width
        .unwrap_or_else(|| config.map_or(4096, |c| c.max_width));
    let max_height = args
        .max_height
        .unwrap_or_else(|| config.map_or(4096, |c| c.max_height));
    let padding = args
        .padding
        .unwrap_or_else(|| config.map_or(0, |c| c.padding));
    let order = args
        .order
        .unwrap_or_else(|| config.map_or(LayerOrder::Input, |c| c.order));
    let pack_mode = args
        .pack_mode
        .unwrap_or_else(|| config.map_or(PackMode::Single, |c| c.pack_mode));

    // Boolean flags: CLI presence wins, otherwise use config
    let pot = args.pot || config.is_some_and(|c| c.pot);
    let opaque = args.opaque || config.is_some_and(|c| c.opaque);
    let trim = !args.no_trim && config.is_none_or(|c| c.trim);
    let only_visible = !args.all_layers && config.is_none_or(|c| c.only_visible);

    // Hidden patterns accumulate from both sources
    let mut hidden = config.map(|c| c.hidden.clone()).unwrap_or_default();
    hidden.extend(args.hidden.iter().cloned());

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else {
        match config.and_then(|c| c.compress.as_ref()) {
            Some(CompressConfig::Level(n)) => Some(
                n.to_string()
                    .parse::<CompressionLevel>()
                    .map_err(|e| anyhow::anyhow!("{} in config file", e))?,
            ),
            Some(CompressConfig::Max(s)) => Some(
                s.parse::<CompressionLevel>()
                    .map_err(|e| anyhow::anyhow!("{} in config file", e))?,
            ),
            None => None,
        }
    };

    Ok(MergedConfig {
        input,
        output,
        max_width,
        max_height,
        pot,
        trim,
        only_visible,
        hidden,
        padding,
        order,
        pack_mode,
        opaque,
        compress,
        verbose: args.verbose,
    })
}
