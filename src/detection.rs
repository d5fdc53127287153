//! Detection metrics for data-cleaning remediation.
//!
//! Classifies every row of the agent's output against ground truth into a
//! confusion matrix, then derives the standard detection statistics. The
//! unit of classification is the whole row: a single damaged cell makes
//! the row "not matching". The corruption metric in
//! [`crate::corruption`] deliberately uses the finer cell-level
//! comparison instead; the two granularities answer different questions
//! and are kept separate.
//!
//! # Example
//!
//! ```ignore
//! use limpar::detection::{classify, DetectionMetrics};
//!
//! let counts = classify(&original, &cleaned, &injected_mask)?;
//! let metrics = DetectionMetrics::from_counts(counts);
//! println!("F1 = {:.3}", metrics.f1);
//! ```

// Metric ratios require usize->f64 casts
#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    table::Table,
    value::equal_with_missing,
};

/// Confusion counts for row-level remediation outcomes.
///
/// Semantics relative to (was the row injected with an error, does the
/// agent's row match ground truth):
/// - TP: injected, matches - error correctly fixed
/// - FN: injected, differs - error missed or mis-fixed
/// - TN: clean, matches - clean row correctly untouched
/// - FP: clean, differs - clean row damaged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    /// Errors correctly fixed.
    #[serde(rename = "tp")]
    pub true_positives: usize,
    /// Clean rows damaged.
    #[serde(rename = "fp")]
    pub false_positives: usize,
    /// Clean rows correctly left alone.
    #[serde(rename = "tn")]
    pub true_negatives: usize,
    /// Errors missed or mis-fixed.
    #[serde(rename = "fn")]
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// Create counts directly.
    pub fn new(tp: usize, fp: usize, tn: usize, fn_: usize) -> Self {
        Self {
            true_positives: tp,
            false_positives: fp,
            true_negatives: tn,
            false_negatives: fn_,
        }
    }

    /// Total number of classified rows.
    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Classify every row into the confusion matrix.
///
/// `injected[i]` marks whether row `i` had a deliberately injected
/// error. A row matches ground truth only when every cell matches under
/// the shared missing-aware equality.
///
/// # Errors
///
/// Returns `SchemaMismatch`/`RowCountMismatch` for misaligned tables,
/// `MaskLengthMismatch` when the mask length differs from the row count,
/// and `UnsupportedColumnType` for columns outside the comparable type
/// set.
pub fn classify(original: &Table, cleaned: &Table, injected: &[bool]) -> Result<ConfusionCounts> {
    original.check_aligned(cleaned)?;

    let rows = original.len();
    if injected.len() != rows {
        return Err(Error::MaskLengthMismatch {
            mask_len: injected.len(),
            rows,
        });
    }

    // Extract once, column-major; row equality then walks the columns.
    let names = original.column_names();
    let mut original_columns = Vec::with_capacity(names.len());
    let mut cleaned_columns = Vec::with_capacity(names.len());
    for name in &names {
        original_columns.push(original.column_values(name)?);
        cleaned_columns.push(cleaned.column_values(name)?);
    }

    let mut counts = ConfusionCounts::default();

    for row in 0..rows {
        let matches = original_columns
            .iter()
            .zip(cleaned_columns.iter())
            .all(|(orig, clean)| equal_with_missing(&orig[row], &clean[row]));

        match (injected[row], matches) {
            (true, true) => counts.true_positives += 1,
            (true, false) => counts.false_negatives += 1,
            (false, true) => counts.true_negatives += 1,
            (false, false) => counts.false_positives += 1,
        }
    }

    Ok(counts)
}

/// Derived detection statistics.
///
/// Every ratio degrades to 0.0 on a zero denominator instead of failing:
/// a model evaluated on a degenerate task (no negatives, no injected
/// rows) must still produce a score, not crash the benchmark run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionMetrics {
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// tp / (tp + fp).
    pub precision: f64,
    /// tp / (tp + fn).
    pub recall: f64,
    /// tn / (tn + fp).
    pub specificity: f64,
    /// Alias of recall.
    pub true_positive_rate: f64,
    /// fp / (fp + tn).
    pub false_positive_rate: f64,
    /// The underlying confusion counts.
    pub support: ConfusionCounts,
}

impl DetectionMetrics {
    /// Derive all detection statistics from confusion counts.
    pub fn from_counts(counts: ConfusionCounts) -> Self {
        let tp = counts.true_positives as f64;
        let fp = counts.false_positives as f64;
        let tn = counts.true_negatives as f64;
        let fn_ = counts.false_negatives as f64;

        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = ratio(2.0 * precision * recall, precision + recall);
        let specificity = ratio(tn, tn + fp);
        let false_positive_rate = ratio(fp, fp + tn);

        Self {
            f1,
            precision,
            recall,
            specificity,
            true_positive_rate: recall,
            false_positive_rate,
            support: counts,
        }
    }
}

/// Ratio with the benchmark's zero-denominator policy: 0.0, never NaN.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
