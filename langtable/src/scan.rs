//! Finding which translation keys templates actually use.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use lazy_static::lazy_static;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::Error;

lazy_static! {
    /// First string argument of `__()`, `@lang()`, `trans()` and `trans_choice()`.
    static ref TRANSLATION_CALL_REGEX: Regex = Regex::new(
        r#"(?:__|@lang|trans|trans_choice)\(\s*['"]([^'"]+)['"]\s*(?:,[^)]*)?\)"#
    )
    .unwrap();
}

/// Suffix of the template files [`ViewScanner`] reads by default.
pub const DEFAULT_VIEW_SUFFIX: &str = ".blade.php";

pub trait UsageScanner {
    /// Every translation key referenced anywhere, in `file.key` form.
    fn scan_used_keys(&self) -> Result<BTreeSet<String>, Error>;
}

/// Scans a directory tree of templates for translation helper calls.
#[derive(Debug, Clone)]
pub struct ViewScanner {
    root: PathBuf,
    suffix: String,
}

impl ViewScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: DEFAULT_VIEW_SUFFIX.to_string(),
        }
    }

    /// Only files whose name ends with `suffix` are read.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn matches_suffix(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(&self.suffix))
    }
}

impl UsageScanner for ViewScanner {
    fn scan_used_keys(&self) -> Result<BTreeSet<String>, Error> {
        if !self.root.is_dir() {
            return Err(Error::StoreUnavailable(format!(
                "views directory {} does not exist",
                self.root.display()
            )));
        }
        let mut used = BTreeSet::new();
        let mut scanned = 0usize;
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() || !self.matches_suffix(entry.path()) {
                continue;
            }
            let content = fs::read_to_string(entry.path())?;
            used.extend(used_keys_in(&content));
            scanned += 1;
        }
        tracing::info!(files = scanned, keys = used.len(), "scanned views for translation keys");
        Ok(used)
    }
}

/// Keys referenced by translation helpers in one template's text.
pub fn used_keys_in(content: &str) -> impl Iterator<Item = String> + '_ {
    TRANSLATION_CALL_REGEX
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
