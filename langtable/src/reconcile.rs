//! Import: merging a decoded tabular document back into stored trees.
//!
//! The matrix is regrouped by `(file, language)`. Each group is reconciled on
//! its own: load the current tree, unflatten the imported rows into an
//! overlay, merge, save. A group that fails is logged and recorded in the
//! [`ImportReport`] while the remaining groups carry on; only an unavailable
//! store stops the run. Nothing is rolled back, and re-running the same
//! import is harmless since each group write is idempotent.
//!
//! Problems with the payload itself (bad keys, non-string values) are found
//! before the first group is touched and fail the whole import.

use crate::{
    error::Error,
    formats::FormatType,
    matrix::{LanguageMatrix, OverlayGroup},
    path::KeyPath,
    store::TreeStore,
    tree::{merge_trees, unflatten},
};

/// A group that was merged and saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutcome {
    pub file: String,
    pub language: String,
    pub keys: usize,
}

/// A group that could not be reconciled. `error` is always
/// [`Error::Reconciliation`].
#[derive(Debug)]
pub struct GroupFailure {
    pub file: String,
    pub language: String,
    /// Dotted keys the group would have written, in row order.
    pub keys: Vec<String>,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub succeeded: Vec<GroupOutcome>,
    pub failed: Vec<GroupFailure>,
}

impl ImportReport {
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Total keys written across successful groups.
    pub fn keys_merged(&self) -> usize {
        self.succeeded.iter().map(|g| g.keys).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Runs imports against one store.
pub struct ImportReconciler<'a, S: TreeStore + ?Sized> {
    store: &'a mut S,
}

impl<'a, S: TreeStore + ?Sized> ImportReconciler<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Decodes `bytes` as `format` and reconciles the result.
    pub fn import(&mut self, format: FormatType, bytes: &[u8]) -> Result<ImportReport, Error> {
        let matrix = format.decode(bytes)?;
        tracing::info!(
            %format,
            files = matrix.file_count(),
            rows = matrix.row_count(),
            "decoded import"
        );
        self.reconcile(&matrix)
    }

    /// Merges every `(file, language)` group of `matrix` into the store.
    pub fn reconcile(&mut self, matrix: &LanguageMatrix) -> Result<ImportReport, Error> {
        let groups = matrix.overlay_groups()?;
        let mut report = ImportReport::default();

        for group in &groups {
            match self.reconcile_group(group) {
                Ok(keys) => {
                    tracing::info!(
                        file = %group.file,
                        language = %group.language,
                        keys,
                        "merged"
                    );
                    report.succeeded.push(GroupOutcome {
                        file: group.file.clone(),
                        language: group.language.clone(),
                        keys,
                    });
                }
                Err(error) if error.is_fatal() => {
                    tracing::error!(
                        file = %group.file,
                        language = %group.language,
                        %error,
                        "store unavailable, aborting import"
                    );
                    return Err(error);
                }
                Err(error) => {
                    let keys: Vec<String> = group.entries.keys().map(KeyPath::join).collect();
                    tracing::warn!(
                        file = %group.file,
                        language = %group.language,
                        keys = %keys.join(", "),
                        %error,
                        "failed to reconcile group"
                    );
                    report.failed.push(GroupFailure {
                        file: group.file.clone(),
                        language: group.language.clone(),
                        keys,
                        error: Error::Reconciliation {
                            file: group.file.clone(),
                            language: group.language.clone(),
                            message: error.to_string(),
                        },
                    });
                }
            }
        }

        tracing::info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            "import finished"
        );
        Ok(report)
    }

    fn reconcile_group(&mut self, group: &OverlayGroup) -> Result<usize, Error> {
        let existing = self.store.load_tree(&group.file, &group.language)?;
        let overlay = unflatten(&group.entries);
        let merged = merge_trees(existing, overlay);
        self.store
            .save_tree(&group.file, &group.language, &merged)?;
        Ok(group.entries.len())
    }
}

/// Convenience wrapper around [`ImportReconciler::import`].
pub fn import<S>(store: &mut S, format: FormatType, bytes: &[u8]) -> Result<ImportReport, Error>
where
    S: TreeStore + ?Sized,
{
    ImportReconciler::new(store).import(format, bytes)
}
