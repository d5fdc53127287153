//! Corruption metrics: collateral damage to protected columns.
//!
//! Protected columns are a safety boundary - columns that carried no
//! injected error in the rows under evaluation. An agent that "fixes"
//! data by overwriting fields it should never touch scores here. Unlike
//! [`crate::detection`], comparison is cell-level: each individual
//! protected cell the agent changed counts as one edit.
//!
//! Two operations with deliberately different scoping:
//! - [`corruption_rate`] inspects only the injected rows - the agent is
//!   free to leave untouched rows alone, so the signal of interest is
//!   damage on rows it was actively editing;
//! - [`corruption_by_column`] scans every row of each protected column
//!   for a full-table breakdown view.

// Metric ratios require usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    table::Table,
    value::{equal_with_missing, Value},
};

/// Result of the injected-row-scoped corruption computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorruptionReport {
    /// Edits in protected cells per injected row. May exceed 1.0 when
    /// more than one protected column is corrupted in the same row.
    pub corruption_rate: f64,
    /// Number of protected cells the agent changed in injected rows.
    pub edits_in_protected: usize,
    /// Number of injected rows inspected.
    pub total_injected_rows: usize,
    /// Protected columns with at least one edit, sorted by name.
    pub protected_columns_affected: Vec<String>,
}

impl CorruptionReport {
    /// Report for a run with no injected rows: zero everywhere, by
    /// policy rather than a division-by-zero fault.
    fn empty() -> Self {
        Self {
            corruption_rate: 0.0,
            edits_in_protected: 0,
            total_injected_rows: 0,
            protected_columns_affected: Vec::new(),
        }
    }

    /// Whether any protected cell was touched.
    pub fn has_corruption(&self) -> bool {
        self.edits_in_protected > 0
    }
}

/// Edit count for one protected column over the whole table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEdits {
    /// Column name.
    pub column: String,
    /// Number of cells that differ from ground truth, over all rows.
    pub edits: usize,
}

/// Compute the corruption rate over protected columns in injected rows.
///
/// For each row index in `injected_rows` and each column in
/// `protected_columns`, the original cell is compared to the agent's
/// cell with the shared missing-aware equality; every differing cell is
/// one edit. The rate divides edits by the number of injected *rows*
/// (not cells compared).
///
/// # Errors
///
/// Returns `SchemaMismatch`/`RowCountMismatch` for misaligned tables,
/// `ColumnNotFound` for unknown protected columns,
/// `IndexOutOfBounds` for row indices past the table end, and
/// `UnsupportedColumnType` for incomparable columns.
pub fn corruption_rate<S: AsRef<str>>(
    original: &Table,
    cleaned: &Table,
    protected_columns: &[S],
    injected_rows: &[usize],
) -> Result<CorruptionReport> {
    original.check_aligned(cleaned)?;

    let columns = extract_protected(original, cleaned, protected_columns)?;

    let total_injected_rows = injected_rows.len();
    if total_injected_rows == 0 {
        return Ok(CorruptionReport::empty());
    }

    let rows = original.len();
    let mut edits_in_protected = 0;
    let mut affected: BTreeSet<&str> = BTreeSet::new();

    for &row in injected_rows {
        if row >= rows {
            return Err(Error::IndexOutOfBounds {
                index: row,
                len: rows,
            });
        }

        for (name, orig, clean) in &columns {
            if !equal_with_missing(&orig[row], &clean[row]) {
                edits_in_protected += 1;
                affected.insert(name.as_str());
            }
        }
    }

    Ok(CorruptionReport {
        corruption_rate: edits_in_protected as f64 / total_injected_rows as f64,
        edits_in_protected,
        total_injected_rows,
        protected_columns_affected: affected.into_iter().map(String::from).collect(),
    })
}

/// Count edits per protected column over *all* rows.
///
/// This is the unscoped breakdown used for visualization: different
/// semantics from [`corruption_rate`], not an optional filter on it.
/// Results follow the order of `protected_columns`.
///
/// # Errors
///
/// Same alignment/column errors as [`corruption_rate`].
pub fn corruption_by_column<S: AsRef<str>>(
    original: &Table,
    cleaned: &Table,
    protected_columns: &[S],
) -> Result<Vec<ColumnEdits>> {
    original.check_aligned(cleaned)?;

    let columns = extract_protected(original, cleaned, protected_columns)?;

    Ok(columns
        .into_iter()
        .map(|(column, orig, clean)| {
            let edits = orig
                .iter()
                .zip(clean.iter())
                .filter(|(a, b)| !equal_with_missing(a, b))
                .count();
            ColumnEdits { column, edits }
        })
        .collect())
}

type ProtectedColumns = Vec<(String, Vec<Value>, Vec<Value>)>;

/// Extract each protected column from both tables, preserving order.
fn extract_protected<S: AsRef<str>>(
    original: &Table,
    cleaned: &Table,
    protected_columns: &[S],
) -> Result<ProtectedColumns> {
    protected_columns
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let orig = original.column_values(name)?;
            let clean = cleaned.column_values(name)?;
            Ok((name.to_string(), orig, clean))
        })
        .collect()
}
