//! Per-task evaluation: all three metrics over one cleaning run.
//!
//! A benchmark task is described by a [`TaskSpec`] - which rows carried
//! injected errors, which columns are protected, and optionally which
//! columns to score for drift. [`evaluate`] runs detection, corruption
//! and drift over one (original, cleaned) pair and returns the combined
//! [`EvaluationReport`]. The three computations are independent; the
//! report owns no state and persists nothing.

use serde::{Deserialize, Serialize};

use crate::{
    corruption::{corruption_rate, CorruptionReport},
    detection::{classify, DetectionMetrics},
    drift::{global_drift, DriftReport},
    error::{Error, Result},
    table::Table,
};

/// Ground-truth description of one benchmark task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Row indices where errors were deliberately injected.
    pub injected_rows: Vec<usize>,
    /// Columns that were never targets of error injection.
    pub protected_columns: Vec<String>,
    /// Columns to score for drift (`None` = all columns).
    pub drift_columns: Option<Vec<String>>,
}

impl TaskSpec {
    /// Create an empty task description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the injected row indices.
    #[must_use]
    pub fn with_injected_rows(mut self, rows: impl IntoIterator<Item = usize>) -> Self {
        self.injected_rows = rows.into_iter().collect();
        self
    }

    /// Set the protected columns.
    #[must_use]
    pub fn with_protected_columns<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.protected_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict drift scoring to a column subset.
    #[must_use]
    pub fn with_drift_columns<S: Into<String>>(
        mut self,
        columns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.drift_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Derive the boolean injected-row mask for a table of `rows` rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if any injected index is past
    /// the table end.
    pub fn injected_mask(&self, rows: usize) -> Result<Vec<bool>> {
        let mut mask = vec![false; rows];
        for &index in &self.injected_rows {
            if index >= rows {
                return Err(Error::IndexOutOfBounds { index, len: rows });
            }
            mask[index] = true;
        }
        Ok(mask)
    }
}

/// Combined scores for one cleaning run against one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Row-level detection statistics.
    pub detection: DetectionMetrics,
    /// Collateral damage to protected columns.
    pub corruption: CorruptionReport,
    /// Per-column and global distribution drift.
    pub drift: DriftReport,
}

/// Evaluate one cleaning run: detection, corruption and drift.
///
/// # Errors
///
/// Propagates alignment, column-lookup, bounds and column-type errors
/// from the three metric modules.
pub fn evaluate(original: &Table, cleaned: &Table, task: &TaskSpec) -> Result<EvaluationReport> {
    let mask = task.injected_mask(original.len())?;

    let counts = classify(original, cleaned, &mask)?;
    let detection = DetectionMetrics::from_counts(counts);

    let corruption = corruption_rate(
        original,
        cleaned,
        &task.protected_columns,
        &task.injected_rows,
    )?;

    let drift = global_drift(original, cleaned, task.drift_columns.as_deref())?;

    Ok(EvaluationReport {
        detection,
        corruption,
        drift,
    })
}
