use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::AtlasConfig;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: AtlasConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: AtlasConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve input patterns to actual file paths.
    ///
    /// Glob patterns are expanded in sorted order, and all paths are resolved
    /// relative to the config file directory.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            if is_glob_pattern(pattern) {
                let full_pattern = self.config_dir.join(pattern);
                let pattern_str = full_pattern.to_string_lossy();

                let paths = glob::glob(&pattern_str)
                    .with_context(|| format!("invalid glob pattern: {}", pattern))?;

                for entry in paths {
                    let path =
                        entry.with_context(|| format!("failed to read glob entry: {}", pattern))?;
                    results.push(path);
                }
            } else {
                results.push(self.config_dir.join(pattern));
            }
        }

        Ok(results)
    }

    /// Resolve the atlas output path relative to the config file directory.
    pub fn resolve_output(&self) -> PathBuf {
        self.config_dir.join(&self.config.output)
    }
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("layers/**/*.png"));
        assert!(is_glob_pattern("layer?.png"));
        assert!(is_glob_pattern("layer[0-9].png"));
        assert!(!is_glob_pattern("layer.png"));
        assert!(!is_glob_pattern("layers/hero.png"));
    }

    #[test]
    fn test_load_resolves_relative_to_config() {
        let dir = std::env::temp_dir().join(format!("skyatlas-config-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("art")).unwrap();
        std::fs::write(dir.join("art/b.png"), b"").unwrap();
        std::fs::write(dir.join("art/a.png"), b"").unwrap();
        let config_path = dir.join("atlas.json");
        std::fs::write(
            &config_path,
            r#"{ "input": ["art/*.png", "extra/hero.png"], "output": "out/sheet.png" }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&config_path).unwrap();
        assert_eq!(
            loaded.resolve_inputs().unwrap(),
            vec![
                dir.join("art/a.png"),
                dir.join("art/b.png"),
                dir.join("extra/hero.png")
            ]
        );
        assert_eq!(loaded.resolve_output(), dir.join("out/sheet.png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!("skyatlas-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = LoadedConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));

        let _ = std::fs::remove_file(&path);
    }
}
