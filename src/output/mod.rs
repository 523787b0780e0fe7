mod format;
mod json;
mod map;

use std::path::{Path, PathBuf};

pub use format::save_atlas_image;
pub use json::write_json;
pub use map::{format_map, write_map};

/// Path of a metadata file next to the atlas image: `dir/<stem><suffix>`
pub fn sibling_path(atlas_path: &Path, suffix: &str) -> PathBuf {
    let stem = atlas_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "atlas".to_string());
    atlas_path.with_file_name(format!("{}{}", stem, suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("out/sheet.png"), "_map.txt"),
            PathBuf::from("out/sheet_map.txt")
        );
        assert_eq!(
            sibling_path(Path::new("sheet.tga"), ".json"),
            PathBuf::from("sheet.json")
        );
    }
}
