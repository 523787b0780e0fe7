use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::Pattern;
use image::ImageReader;
use log::{debug, info};
use rayon::prelude::*;

use super::Layer;
use crate::error::AtlasError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tga"];

/// Image path with the directory its layer name is relative to
struct ImagePath {
    path: PathBuf,
    base: Option<PathBuf>,
}

/// Load layers from input paths (files or directories), in encounter order.
///
/// Files are taken in the order given; directories are walked recursively in
/// path order so repeated runs see the same sequence. A layer is hidden when
/// its name matches one of the `hidden` glob patterns.
pub fn load_layers(inputs: &[impl AsRef<Path>], hidden: &[String]) -> Result<Vec<Layer>> {
    let hidden = hidden
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| AtlasError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let image_paths = collect_image_paths(inputs)?;

    if image_paths.is_empty() {
        return Err(AtlasError::NoLayers.into());
    }

    info!("Loading {} images...", image_paths.len());

    // Collecting an indexed parallel iterator keeps input order
    let mut layers: Vec<Layer> = image_paths
        .par_iter()
        .map(|img_path| load_single_layer(&img_path.path, img_path.base.as_deref()))
        .collect::<Result<_>>()?;

    for layer in &mut layers {
        if hidden.iter().any(|p| p.matches(&layer.name)) {
            debug!("Layer '{}' is hidden", layer.name);
            layer.visible = false;
        }
    }

    Ok(layers)
}

fn collect_image_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(AtlasError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: None,
                });
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(base: &Path, dir: &Path, paths: &mut Vec<ImagePath>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_file() && is_supported_image(&path) {
            paths.push(ImagePath {
                path,
                base: Some(base.to_path_buf()),
            });
        } else if path.is_dir() {
            collect_from_directory(base, &path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Layer name: path relative to the input directory, or the file name,
/// without extension
fn layer_name(path: &Path, base: Option<&Path>) -> String {
    let relative = base
        .and_then(|base_dir| path.strip_prefix(base_dir).ok())
        .or_else(|| path.file_name().map(Path::new))
        .unwrap_or(path);

    relative
        .with_extension("")
        .to_string_lossy()
        .replace('\\', "/")
}

fn load_single_layer(path: &Path, base: Option<&Path>) -> Result<Layer> {
    let image = ImageReader::open(path)
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .with_guessed_format()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| AtlasError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    Ok(Layer {
        path: path.to_path_buf(),
        name: layer_name(path, base),
        visible: true,
        image,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("skyatlas-loader-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_layer_name_for_file() {
        assert_eq!(layer_name(Path::new("art/hero.png"), None), "hero");
    }

    #[test]
    fn test_layer_name_relative_to_directory() {
        assert_eq!(
            layer_name(Path::new("art/ui/button.png"), Some(Path::new("art"))),
            "ui/button"
        );
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(!is_supported_image(Path::new("a.txt")));
        assert!(!is_supported_image(Path::new("png")));
    }

    #[test]
    fn test_missing_input() {
        let err = load_layers(&[PathBuf::from("/definitely/not/here.png")], &[]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AtlasError>(),
            Some(AtlasError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_invalid_hidden_pattern() {
        let dir = scratch_dir("pattern");
        let err = load_layers(&[dir], &["[".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AtlasError>(),
            Some(AtlasError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_load_directory_in_path_order_with_hidden() {
        let dir = scratch_dir("order");
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        image::RgbaImage::new(3, 2).save(dir.join("b.png")).unwrap();
        image::RgbaImage::new(4, 5).save(dir.join("a.png")).unwrap();
        image::RgbaImage::new(1, 1).save(dir.join("sub/c.png")).unwrap();
        std::fs::write(dir.join("notes.txt"), "skip me").unwrap();

        let layers = load_layers(&[&dir], &["sub/*".to_string()]).unwrap();
        let names: Vec<_> = layers.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "sub/c"]);
        assert_eq!((layers[0].width(), layers[0].height()), (4, 5));
        assert!(layers[0].visible);
        assert!(!layers[2].visible);
    }
}
