use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "langtable.toml";

pub const DEFAULT_LANG_DIR: &str = "lang";
pub const DEFAULT_STORAGE_DIR: &str = ".";
pub const DEFAULT_VIEWS_DIR: &str = "resources/views";

/// Contents of `langtable.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LangtableConfig {
    /// Root of the `<lang>/<file>.json` trees.
    pub lang_dir: Option<String>,
    /// Where relative export and import file names are resolved.
    pub storage_dir: Option<String>,
    /// Templates scanned by `export-unused`.
    pub views_dir: Option<String>,
    pub view_suffix: Option<String>,
}

/// Configuration with every default filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub lang_dir: PathBuf,
    pub storage_dir: PathBuf,
    pub views_dir: PathBuf,
    pub view_suffix: String,
}

impl LangtableConfig {
    pub fn resolve(self) -> Settings {
        Settings {
            lang_dir: PathBuf::from(self.lang_dir.unwrap_or_else(|| DEFAULT_LANG_DIR.to_string())),
            storage_dir: PathBuf::from(
                self.storage_dir
                    .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string()),
            ),
            views_dir: PathBuf::from(
                self.views_dir
                    .unwrap_or_else(|| DEFAULT_VIEWS_DIR.to_string()),
            ),
            view_suffix: self
                .view_suffix
                .unwrap_or_else(|| langtable::scan::DEFAULT_VIEW_SUFFIX.to_string()),
        }
    }
}

impl Settings {
    /// `name` as given when absolute, otherwise inside the storage directory.
    pub fn storage_path(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.storage_dir.join(path)
        }
    }
}

/// Reads the configuration file.
///
/// An explicit path must exist. Without one, `langtable.toml` in the working
/// directory is used when present and an empty configuration otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<LangtableConfig, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let Ok(cwd) = std::env::current_dir() else {
                return Ok(LangtableConfig::default());
            };
            let path = cwd.join(CONFIG_FILE_NAME);
            if !path.is_file() {
                return Ok(LangtableConfig::default());
            }
            path
        }
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let config = parse_config(&content)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<LangtableConfig, toml::de::Error> {
    toml::from_str::<LangtableConfig>(content)
}

/// Fills every key unset in `a` from `b`.
pub fn merge(mut a: LangtableConfig, b: LangtableConfig) -> LangtableConfig {
    if a.lang_dir.is_none() {
        a.lang_dir = b.lang_dir;
    }
    if a.storage_dir.is_none() {
        a.storage_dir = b.storage_dir;
    }
    if a.views_dir.is_none() {
        a.views_dir = b.views_dir;
    }
    if a.view_suffix.is_none() {
        a.view_suffix = b.view_suffix;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = LangtableConfig::default().resolve();
        assert_eq!(settings.lang_dir, PathBuf::from("lang"));
        assert_eq!(settings.storage_dir, PathBuf::from("."));
        assert_eq!(settings.views_dir, PathBuf::from("resources/views"));
        assert_eq!(settings.view_suffix, ".blade.php");
    }

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config("lang_dir = \"resources/lang\"\nview_suffix = \".html\"\n").unwrap();
        assert_eq!(config.lang_dir.as_deref(), Some("resources/lang"));
        assert_eq!(config.view_suffix.as_deref(), Some(".html"));
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(parse_config("lang_dir = 3\n").is_err());
    }

    #[test]
    fn test_merge_prefers_first() {
        let flags = LangtableConfig {
            lang_dir: Some("from-flag".to_string()),
            ..Default::default()
        };
        let file = LangtableConfig {
            lang_dir: Some("from-file".to_string()),
            storage_dir: Some("storage".to_string()),
            ..Default::default()
        };
        let merged = merge(flags, file);
        assert_eq!(merged.lang_dir.as_deref(), Some("from-flag"));
        assert_eq!(merged.storage_dir.as_deref(), Some("storage"));
        assert!(merged.views_dir.is_none());
    }

    #[test]
    fn test_load_explicit_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "storage_dir = \"exports\"\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.storage_dir.as_deref(), Some("exports"));

        let missing = dir.path().join("missing.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_storage_path() {
        let settings = LangtableConfig {
            storage_dir: Some("storage".to_string()),
            ..Default::default()
        }
        .resolve();
        assert_eq!(
            settings.storage_path("translations.csv"),
            PathBuf::from("storage").join("translations.csv")
        );
        let absolute = std::env::temp_dir().join("out.csv");
        assert_eq!(settings.storage_path(absolute.to_str().unwrap()), absolute);
    }
}
