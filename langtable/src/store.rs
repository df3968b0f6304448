//! Where language trees live between operations.
//!
//! The core never touches storage directly; it talks to a [`TreeStore`].
//! [`JsonDirStore`] keeps one JSON document per `(language, file)` on disk,
//! laid out as `<root>/<lang>/<file>.json`. [`MemoryStore`] keeps everything
//! in a map and can be told to fail for chosen pairs.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use unic_langid::LanguageIdentifier;

use crate::{error::Error, tree::Tree};

/// Extension of the files a [`JsonDirStore`] reads and writes.
pub const TREE_FILE_EXTENSION: &str = "json";

pub trait TreeStore {
    /// Loads the tree for `(file, language)`; an empty branch if absent.
    fn load_tree(&self, file: &str, language: &str) -> Result<Tree, Error>;

    /// Replaces the tree for `(file, language)`.
    fn save_tree(&mut self, file: &str, language: &str, tree: &Tree) -> Result<(), Error>;

    /// All languages with at least one file, sorted.
    fn languages(&self) -> Result<Vec<String>, Error>;

    /// All files for `language`, sorted.
    fn files(&self, language: &str) -> Result<Vec<String>, Error>;
}

/// Language directories of JSON documents.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<language>/<file>.json`.
    pub fn tree_path(&self, file: &str, language: &str) -> Result<PathBuf, Error> {
        ensure_plain_name(file, "file")?;
        ensure_plain_name(language, "language")?;
        Ok(self
            .root
            .join(language)
            .join(format!("{file}.{TREE_FILE_EXTENSION}")))
    }

    fn ensure_root(&self) -> Result<(), Error> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(Error::StoreUnavailable(format!(
                "language directory {} does not exist",
                self.root.display()
            )))
        }
    }
}

impl TreeStore for JsonDirStore {
    fn load_tree(&self, file: &str, language: &str) -> Result<Tree, Error> {
        self.ensure_root()?;
        let path = self.tree_path(file, language)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(file, language, "no existing tree, starting empty");
                return Ok(Tree::empty());
            }
            Err(e) => {
                return Err(Error::StoreUnavailable(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        if content.trim().is_empty() {
            return Ok(Tree::empty());
        }
        let tree = Tree::from_json(serde_json::from_str(&content)?)?;
        if !matches!(tree, Tree::Branch(_)) {
            return Err(Error::malformed(format!(
                "{} must contain a JSON object",
                path.display()
            )));
        }
        Ok(tree)
    }

    fn save_tree(&mut self, file: &str, language: &str, tree: &Tree) -> Result<(), Error> {
        self.ensure_root()?;
        let path = self.tree_path(file, language)?;
        let unavailable =
            |e: std::io::Error| Error::StoreUnavailable(format!("cannot write {}: {e}", path.display()));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }
        let mut content = serde_json::to_string_pretty(tree)?;
        content.push('\n');
        fs::write(&path, content).map_err(unavailable)?;
        tracing::debug!(path = %path.display(), "saved tree");
        Ok(())
    }

    /// Subdirectories of the root whose names parse as language identifiers.
    /// Anything else (a `vendor/` directory, say) is skipped.
    fn languages(&self) -> Result<Vec<String>, Error> {
        self.ensure_root()?;
        let mut languages = BTreeSet::new();
        let entries = fs::read_dir(&self.root).map_err(|e| {
            Error::StoreUnavailable(format!("cannot list {}: {e}", self.root.display()))
        })?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if is_language_code(&name) {
                languages.insert(name);
            } else {
                tracing::debug!(directory = %name, "skipping non-language directory");
            }
        }
        Ok(languages.into_iter().collect())
    }

    fn files(&self, language: &str) -> Result<Vec<String>, Error> {
        self.ensure_root()?;
        ensure_plain_name(language, "language")?;
        let dir = self.root.join(language);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::StoreUnavailable(format!(
                    "cannot list {}: {e}",
                    dir.display()
                )));
            }
        };
        let mut files = BTreeSet::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TREE_FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                files.insert(stem.to_string());
            }
        }
        Ok(files.into_iter().collect())
    }
}

/// Whether `name` looks like a language code (`en`, `pt_BR`, `zh-Hant`).
///
/// Only two- and three-letter primary subtags count; the longer forms BCP 47
/// reserves would let ordinary words like `vendor` through.
pub fn is_language_code(name: &str) -> bool {
    name.replace('_', "-")
        .parse::<LanguageIdentifier>()
        .is_ok_and(|id| (2..=3).contains(&id.language.as_str().len()))
}

/// File and language names become path components; keep them to one.
fn ensure_plain_name(name: &str, what: &str) -> Result<(), Error> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
    {
        return Err(Error::malformed(format!(
            "{what} name `{name}` is not a plain file name"
        )));
    }
    Ok(())
}

/// In-memory store keyed by `(file, language)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    trees: BTreeMap<(String, String), Tree>,
    failing: BTreeMap<(String, String), FailureKind>,
    saves: usize,
}

/// How a [`MemoryStore`] should fail for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The save is rejected; other pairs still work.
    Save,
    /// The whole store reports itself unavailable on save.
    Unavailable,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(mut self, file: &str, language: &str, tree: Tree) -> Self {
        self.trees
            .insert((file.to_string(), language.to_string()), tree);
        self
    }

    /// Makes saves for `(file, language)` fail with `kind`.
    pub fn fail_on(&mut self, file: &str, language: &str, kind: FailureKind) {
        self.failing
            .insert((file.to_string(), language.to_string()), kind);
    }

    pub fn tree(&self, file: &str, language: &str) -> Option<&Tree> {
        self.trees.get(&(file.to_string(), language.to_string()))
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl TreeStore for MemoryStore {
    fn load_tree(&self, file: &str, language: &str) -> Result<Tree, Error> {
        Ok(self.tree(file, language).cloned().unwrap_or_default())
    }

    fn save_tree(&mut self, file: &str, language: &str, tree: &Tree) -> Result<(), Error> {
        let key = (file.to_string(), language.to_string());
        match self.failing.get(&key) {
            Some(FailureKind::Save) => Err(Error::Io(std::io::Error::new(
                ErrorKind::PermissionDenied,
                format!("{language}/{file} is read-only"),
            ))),
            Some(FailureKind::Unavailable) => {
                Err(Error::StoreUnavailable("memory store offline".to_string()))
            }
            None => {
                self.trees.insert(key, tree.clone());
                self.saves += 1;
                Ok(())
            }
        }
    }

    fn languages(&self) -> Result<Vec<String>, Error> {
        let languages: BTreeSet<&str> = self.trees.keys().map(|(_, l)| l.as_str()).collect();
        Ok(languages.into_iter().map(str::to_string).collect())
    }

    fn files(&self, language: &str) -> Result<Vec<String>, Error> {
        Ok(self
            .trees
            .keys()
            .filter(|(_, l)| l == language)
            .map(|(f, _)| f.clone())
            .collect())
    }
}
