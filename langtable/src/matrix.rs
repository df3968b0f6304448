//! The language matrix: the flat interchange shape shared by every tabular
//! format.
//!
//! A matrix maps `file → key → language → value`, where `key` is the dotted
//! path of a leaf inside that file. All three levels keep insertion order so
//! row order in CSV, XML and spreadsheet output is deterministic.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use crate::{
    error::Error,
    path::{KeyPath, qualify},
    tree::{FlatMap, Tree},
};

/// Language that always leads the column order when present.
pub const DEFAULT_LANGUAGE: &str = "en";

/// `language → value` for one row.
pub type LanguageValues = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageMatrix {
    files: IndexMap<String, IndexMap<String, LanguageValues>>,
}

/// One row of a matrix, borrowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub file: &'a str,
    pub key: &'a str,
    pub values: &'a LanguageValues,
}

impl Row<'_> {
    /// The value for `language`, or `""` when the row has none.
    pub fn value_or_empty(&self, language: &str) -> &str {
        self.values.get(language).map(String::as_str).unwrap_or("")
    }
}

/// All imported values for one `(file, language)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayGroup {
    pub file: String,
    pub language: String,
    pub entries: FlatMap,
}

impl LanguageMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one cell, creating the file and row as needed.
    pub fn insert(
        &mut self,
        file: impl Into<String>,
        key: impl Into<String>,
        language: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.row_mut(file, key).insert(language.into(), value.into());
    }

    /// The row for `(file, key)`, created empty if absent.
    ///
    /// An empty row still encodes as a line with every language blank.
    pub fn row_mut(&mut self, file: impl Into<String>, key: impl Into<String>) -> &mut LanguageValues {
        self.files
            .entry(file.into())
            .or_default()
            .entry(key.into())
            .or_default()
    }

    pub fn get(&self, file: &str, key: &str, language: &str) -> Option<&str> {
        self.files
            .get(file)?
            .get(key)?
            .get(language)
            .map(String::as_str)
    }

    pub fn file(&self, file: &str) -> Option<&IndexMap<String, LanguageValues>> {
        self.files.get(file)
    }

    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Every row in file-then-key order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.files.iter().flat_map(|(file, keys)| {
            keys.iter().map(move |(key, values)| Row {
                file,
                key,
                values,
            })
        })
    }

    pub fn row_count(&self) -> usize {
        self.files.values().map(IndexMap::len).sum()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Flattens each language's tree for `file` and pivots the result into
    /// `key → language → value` rows.
    ///
    /// A tree key that could not be read back by an import fails the call
    /// with [`Error::InvalidPath`] naming `file.key`. Rows added before the
    /// failure stay in the matrix; callers discard it.
    pub fn add_file<'a, I>(&mut self, file: &str, trees: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (&'a str, &'a Tree)>,
    {
        for (language, tree) in trees {
            let flat = tree.flatten(&KeyPath::root()).map_err(|e| match e {
                Error::InvalidPath(key) => Error::invalid_path(qualify(file, &key)),
                other => other,
            })?;
            for (path, value) in flat {
                self.insert(file, path.join(), language, value);
            }
        }
        Ok(())
    }

    /// Every language in the matrix, de-duplicated, with [`DEFAULT_LANGUAGE`]
    /// first and the rest in first-seen order.
    pub fn languages(&self) -> Vec<String> {
        let mut seen: IndexMap<&str, ()> = IndexMap::new();
        for row in self.rows() {
            for language in row.values.keys() {
                seen.entry(language.as_str()).or_default();
            }
        }
        let mut languages: Vec<String> = Vec::with_capacity(seen.len() + 1);
        if seen.shift_remove(DEFAULT_LANGUAGE).is_some() {
            languages.push(DEFAULT_LANGUAGE.to_string());
        }
        languages.extend(seen.keys().map(|l| l.to_string()));
        languages
    }

    /// Drops every file except `file`.
    pub fn retain_file(&mut self, file: &str) {
        self.files.retain(|name, _| name == file);
    }

    /// Rows where at least one of `languages` is absent or blank.
    pub fn missing(&self, languages: &[String]) -> LanguageMatrix {
        self.filter_rows(|row| {
            languages.iter().any(|language| {
                row.values
                    .get(language)
                    .is_none_or(|value| value.trim().is_empty())
            })
        })
    }

    /// Rows whose `file.key` form does not appear in `used_keys`.
    pub fn unused(&self, used_keys: &BTreeSet<String>) -> LanguageMatrix {
        self.filter_rows(|row| !used_keys.contains(&qualify(row.file, row.key)))
    }

    /// Every `file.key` the matrix defines.
    pub fn qualified_keys(&self) -> BTreeSet<String> {
        self.rows().map(|row| qualify(row.file, row.key)).collect()
    }

    fn filter_rows<F>(&self, mut keep: F) -> LanguageMatrix
    where
        F: FnMut(&Row<'_>) -> bool,
    {
        let mut out = LanguageMatrix::new();
        for row in self.rows() {
            if keep(&row) {
                *out.row_mut(row.file, row.key) = row.values.clone();
            }
        }
        out
    }

    /// Regroups the matrix by `(file, language)`, the unit of import.
    ///
    /// Groups come out in first-seen order. Every key is parsed into a
    /// [`KeyPath`] here, so a bad key or an empty file id fails the whole
    /// call before any group is touched.
    pub fn overlay_groups(&self) -> Result<Vec<OverlayGroup>, Error> {
        let mut groups: IndexMap<(&str, &str), FlatMap> = IndexMap::new();
        for row in self.rows() {
            if row.file.is_empty() {
                return Err(Error::malformed(format!("row `{}` has no file", row.key)));
            }
            let path = KeyPath::split(row.key)?;
            for (language, value) in row.values {
                groups
                    .entry((row.file, language.as_str()))
                    .or_default()
                    .insert(path.clone(), value.clone());
            }
        }
        Ok(groups
            .into_iter()
            .map(|((file, language), entries)| OverlayGroup {
                file: file.to_string(),
                language: language.to_string(),
                entries,
            })
            .collect())
    }
}
