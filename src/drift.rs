//! Distribution drift between original and cleaned columns.
//!
//! Cleaning should restore corrupted cells, not reshape columns. This
//! module measures, per column, how far the marginal distribution of
//! values moved between the ground-truth table and the agent's output,
//! and aggregates the per-column scores into a single global number.
//!
//! Each column is scored by exactly one of two paths, chosen once from
//! the *original* column's Arrow type:
//! - numeric columns: first-order Wasserstein distance between the two
//!   empirical distributions, normalized by the original value range and
//!   clipped to 1.0;
//! - everything else in the comparable set (strings, booleans): directed
//!   Kullback-Leibler divergence between category frequencies (missing
//!   cells form their own category), compressed to [0, 1] via
//!   `1 - e^(-KL)`.
//!
//! # Example
//!
//! ```ignore
//! use limpar::drift::global_drift;
//!
//! let report = global_drift(&original, &cleaned, None::<&[&str]>)?;
//! println!("global drift {:.3}", report.global_drift);
//! for col in &report.by_column {
//!     println!("  {} = {:.3} ({})", col.column, col.score, col.method.name());
//! }
//! ```

// Statistical computation requires casts, similar variable names, and float literals
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::suboptimal_flops)]

use std::collections::{BTreeMap, BTreeSet};

use arrow::datatypes::{DataType, Field};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    table::Table,
    value::Value,
};

/// Probability floor for categories observed on only one side.
///
/// Keeps the divergence well-defined (no log of zero) while contributing
/// effectively nothing for categories both sides share.
const CATEGORY_FLOOR: f64 = 1e-10;

/// How a column is compared, resolved once from its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Numeric column, compared with the Wasserstein distance.
    Continuous,
    /// String/boolean column, compared with KL divergence over category
    /// frequencies.
    Categorical,
}

impl ColumnKind {
    /// Resolve the comparison kind for a schema field.
    ///
    /// Numeric Arrow types are continuous; Utf8/LargeUtf8/Boolean are
    /// categorical. Anything else is an explicit error - there is no
    /// silent default path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedColumnType`] for types outside the
    /// closed set.
    pub fn of(field: &Field) -> Result<Self> {
        match field.data_type() {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::Float32
            | DataType::Float64 => Ok(Self::Continuous),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean => Ok(Self::Categorical),
            other => Err(Error::unsupported_column_type(field.name(), other)),
        }
    }
}

/// Statistical method that produced a drift score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftMethod {
    /// Directed KL divergence over category frequencies, normalized via
    /// `1 - e^(-KL)`.
    KlDivergence,
    /// First-order Wasserstein distance, normalized by the original
    /// column's value range and clipped to 1.0.
    Wasserstein,
}

impl DriftMethod {
    /// Stable tag for reports and serialized output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::KlDivergence => "kl_divergence",
            Self::Wasserstein => "wasserstein",
        }
    }
}

/// Per-column drift result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDrift {
    /// Column name.
    pub column: String,
    /// Drift score in [0, 1]; 0 means the distribution did not move.
    pub score: f64,
    /// Method used for this column.
    pub method: DriftMethod,
}

/// Drift over a set of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    /// Unweighted mean of the per-column scores (0.0 for zero columns).
    pub global_drift: f64,
    /// Per-column results, in the order the columns were requested.
    pub by_column: Vec<ColumnDrift>,
}

impl DriftReport {
    /// Build a report from per-column results, computing the mean.
    pub fn from_columns(by_column: Vec<ColumnDrift>) -> Self {
        let global_drift = if by_column.is_empty() {
            0.0
        } else {
            by_column.iter().map(|c| c.score).sum::<f64>() / by_column.len() as f64
        };

        Self {
            global_drift,
            by_column,
        }
    }

    /// Number of columns scored.
    pub fn num_columns(&self) -> usize {
        self.by_column.len()
    }

    /// Score for a specific column, if it was part of the report.
    pub fn column_score(&self, column: &str) -> Option<f64> {
        self.by_column
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.score)
    }

    /// Largest per-column score, or 0.0 for an empty report.
    pub fn max_drift(&self) -> f64 {
        self.by_column.iter().map(|c| c.score).fold(0.0, f64::max)
    }
}

/// Compute distribution drift for a single column.
///
/// The method is chosen from the original table's declared type for the
/// column (see [`ColumnKind::of`]).
///
/// # Errors
///
/// Returns alignment errors for mismatched tables, `ColumnNotFound` for
/// unknown columns, and `UnsupportedColumnType` when the column type has
/// no comparison path.
pub fn distribution_drift(original: &Table, cleaned: &Table, column: &str) -> Result<ColumnDrift> {
    original.check_aligned(cleaned)?;
    drift_for_column(original, cleaned, column)
}

/// Compute per-column drift and the global mean over a column set.
///
/// `columns` of `None` scores every column in the original table's
/// schema order; a subset is scored in the order given.
///
/// # Errors
///
/// Same errors as [`distribution_drift`].
pub fn global_drift<S: AsRef<str>>(
    original: &Table,
    cleaned: &Table,
    columns: Option<&[S]>,
) -> Result<DriftReport> {
    original.check_aligned(cleaned)?;

    let names: Vec<String> = match columns {
        Some(subset) => subset.iter().map(|s| s.as_ref().to_string()).collect(),
        None => original.column_names(),
    };

    let mut by_column = Vec::with_capacity(names.len());
    for name in &names {
        by_column.push(drift_for_column(original, cleaned, name)?);
    }

    Ok(DriftReport::from_columns(by_column))
}

/// Single-column drift with alignment already verified.
fn drift_for_column(original: &Table, cleaned: &Table, column: &str) -> Result<ColumnDrift> {
    let idx = original.column_index(column)?;
    let kind = ColumnKind::of(original.schema().field(idx))?;

    let orig_values = original.column_values(column)?;
    let clean_values = cleaned.column_values(column)?;

    let (score, method) = match kind {
        ColumnKind::Categorical => (
            categorical_drift(&orig_values, &clean_values),
            DriftMethod::KlDivergence,
        ),
        ColumnKind::Continuous => (
            continuous_drift(&orig_values, &clean_values),
            DriftMethod::Wasserstein,
        ),
    };

    Ok(ColumnDrift {
        column: column.to_string(),
        score,
        method,
    })
}

/// Normalized KL divergence between category frequencies.
///
/// Frequencies are taken over all rows, with missing cells counted as
/// their own category. Categories seen on only one side are floored at
/// [`CATEGORY_FLOOR`] on the other. The directed divergence
/// (original -> cleaned) is compressed to [0, 1] with `1 - e^(-KL)`.
fn categorical_drift(original: &[Value], cleaned: &[Value]) -> f64 {
    let n_orig = original.len();
    let n_clean = cleaned.len();
    if n_orig == 0 || n_clean == 0 {
        return 0.0;
    }

    // BTreeMap keeps the summation order deterministic, so identical
    // inputs always produce the identical score.
    let mut orig_counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for value in original {
        *orig_counts.entry(value.category()).or_insert(0) += 1;
    }
    let mut clean_counts: BTreeMap<Option<String>, usize> = BTreeMap::new();
    for value in cleaned {
        *clean_counts.entry(value.category()).or_insert(0) += 1;
    }

    let mut categories: BTreeSet<&Option<String>> = BTreeSet::new();
    for key in orig_counts.keys().chain(clean_counts.keys()) {
        categories.insert(key);
    }

    let mut kl = 0.0;
    for category in &categories {
        let p = orig_counts
            .get(*category)
            .map_or(CATEGORY_FLOOR, |&c| c as f64 / n_orig as f64);
        let q = clean_counts
            .get(*category)
            .map_or(CATEGORY_FLOOR, |&c| c as f64 / n_clean as f64);
        kl += p * (p / q).ln();
    }

    // The floor can leave a vanishing negative residue; the divergence
    // itself is non-negative.
    let kl = kl.max(0.0);

    1.0 - (-kl).exp()
}

/// Wasserstein distance normalized by the original value range.
///
/// Missing values are dropped independently per side, so the two samples
/// may have different sizes - the comparison is distributional, not
/// paired. A constant original column (zero range) and an empty side
/// both yield 0.0 by policy.
fn continuous_drift(original: &[Value], cleaned: &[Value]) -> f64 {
    let mut orig: Vec<f64> = original
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| v.is_finite())
        .collect();
    let mut clean: Vec<f64> = cleaned
        .iter()
        .filter_map(Value::as_f64)
        .filter(|v| v.is_finite())
        .collect();

    if orig.is_empty() || clean.is_empty() {
        return 0.0;
    }

    let distance = wasserstein_distance(&mut orig, &mut clean);

    let min = orig.iter().copied().fold(f64::INFINITY, f64::min);
    let max = orig.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return 0.0;
    }

    (distance / range).min(1.0)
}

/// Exact first-order Wasserstein distance between two empirical
/// distributions.
///
/// Integrates the absolute difference of the empirical CDFs over the
/// merged support: at each gap between consecutive observed values the
/// CDFs are constant, so the integral is a finite sum.
fn wasserstein_distance(a: &mut [f64], b: &mut [f64]) -> f64 {
    a.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    b.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));

    let n = a.len() as f64;
    let m = b.len() as f64;

    let mut all_values: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    all_values.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    all_values.dedup();

    let mut distance = 0.0;
    let mut i = 0;
    let mut j = 0;

    for k in 0..all_values.len().saturating_sub(1) {
        let x = all_values[k];
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }

        let cdf_a = i as f64 / n;
        let cdf_b = j as f64 / m;
        distance += (cdf_a - cdf_b).abs() * (all_values[k + 1] - x);
    }

    distance
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::{
        array::{Float64Array, Int64Array, RecordBatch, StringArray, TimestampNanosecondArray},
        datatypes::{DataType, Field, Schema, TimeUnit},
    };

    use super::*;

    fn numeric_table(values: Vec<Option<f64>>) -> Table {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "value",
            DataType::Float64,
            true,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Float64Array::from(values))],
        )
        .unwrap();
        Table::from_batch(batch).unwrap()
    }

    fn string_table(values: Vec<Option<&str>>) -> Table {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "category",
            DataType::Utf8,
            true,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(values))],
        )
        .unwrap();
        Table::from_batch(batch).unwrap()
    }

    // ========== ColumnKind dispatch tests ==========

    #[test]
    fn test_kind_numeric_is_continuous() {
        for dt in [DataType::Int32, DataType::Int64, DataType::Float64] {
            let field = Field::new("c", dt, true);
            assert_eq!(ColumnKind::of(&field).unwrap(), ColumnKind::Continuous);
        }
    }

    #[test]
    fn test_kind_string_and_bool_are_categorical() {
        for dt in [DataType::Utf8, DataType::LargeUtf8, DataType::Boolean] {
            let field = Field::new("c", dt, true);
            assert_eq!(ColumnKind::of(&field).unwrap(), ColumnKind::Categorical);
        }
    }

    #[test]
    fn test_kind_unsupported_type_errors() {
        let field = Field::new("ts", DataType::Timestamp(TimeUnit::Nanosecond, None), true);
        assert!(matches!(
            ColumnKind::of(&field),
            Err(Error::UnsupportedColumnType { .. })
        ));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(DriftMethod::KlDivergence.name(), "kl_divergence");
        assert_eq!(DriftMethod::Wasserstein.name(), "wasserstein");
    }

    // ========== categorical path tests ==========

    #[test]
    fn test_categorical_identical_is_zero() {
        let original = string_table(vec![Some("A"), Some("B"), Some("A"), Some("C")]);
        let cleaned = string_table(vec![Some("A"), Some("B"), Some("A"), Some("C")]);

        let drift = distribution_drift(&original, &cleaned, "category").unwrap();
        assert_eq!(drift.method, DriftMethod::KlDivergence);
        assert!(drift.score.abs() < 1e-9, "score = {}", drift.score);
    }

    #[test]
    fn test_categorical_change_increases_score() {
        let original = string_table(vec![Some("A"), Some("B"), Some("A"), Some("C")]);
        let cleaned = string_table(vec![Some("C"), Some("B"), Some("A"), Some("C")]);

        let drift = distribution_drift(&original, &cleaned, "category").unwrap();
        assert!(drift.score > 0.05, "score = {}", drift.score);
        assert!(drift.score <= 1.0);
    }

    #[test]
    fn test_categorical_vanished_category_is_large() {
        // Every "A" rewritten: the original's dominant category has
        // near-zero mass on the cleaned side, so p*ln(p/q) explodes and
        // the normalized score saturates.
        let original = string_table(vec![Some("A"), Some("A"), Some("A"), Some("B")]);
        let cleaned = string_table(vec![Some("B"), Some("B"), Some("B"), Some("B")]);

        let drift = distribution_drift(&original, &cleaned, "category").unwrap();
        assert!(drift.score > 0.99, "score = {}", drift.score);
        assert!(drift.score <= 1.0);
    }

    #[test]
    fn test_categorical_missing_is_its_own_category() {
        // Filling nulls changes the missing-category frequency and must
        // register as drift.
        let original = string_table(vec![None, None, Some("A"), Some("A")]);
        let cleaned = string_table(vec![Some("A"), Some("A"), Some("A"), Some("A")]);

        let drift = distribution_drift(&original, &cleaned, "category").unwrap();
        assert!(drift.score > 0.5, "score = {}", drift.score);
    }

    #[test]
    fn test_categorical_identical_with_missing_is_zero() {
        let original = string_table(vec![None, Some("A"), Some("B")]);
        let cleaned = string_table(vec![None, Some("A"), Some("B")]);

        let drift = distribution_drift(&original, &cleaned, "category").unwrap();
        assert!(drift.score.abs() < 1e-9);
    }

    // ========== continuous path tests ==========

    #[test]
    fn test_continuous_identical_is_zero() {
        let original = numeric_table(vec![Some(10.0), Some(20.0), Some(15.0), Some(25.0)]);
        let cleaned = numeric_table(vec![Some(10.0), Some(20.0), Some(15.0), Some(25.0)]);

        let drift = distribution_drift(&original, &cleaned, "value").unwrap();
        assert_eq!(drift.method, DriftMethod::Wasserstein);
        assert!(drift.score.abs() < 1e-12, "score = {}", drift.score);
    }

    #[test]
    fn test_continuous_outlier_pushes_toward_ceiling() {
        let original = numeric_table(vec![Some(10.0), Some(20.0), Some(15.0), Some(25.0)]);
        let cleaned = numeric_table(vec![Some(10.0), Some(20.0), Some(15.0), Some(1000.0)]);

        let drift = distribution_drift(&original, &cleaned, "value").unwrap();
        // W1 = (1000-25)/4 = 243.75, range = 15: clipped at the ceiling.
        assert!((drift.score - 1.0).abs() < f64::EPSILON, "score = {}", drift.score);
    }

    #[test]
    fn test_continuous_small_shift_is_proportional() {
        let original = numeric_table(vec![Some(10.0), Some(20.0), Some(15.0), Some(25.0)]);
        let cleaned = numeric_table(vec![Some(10.0), Some(20.0), Some(15.0), Some(28.0)]);

        let drift = distribution_drift(&original, &cleaned, "value").unwrap();
        // W1 = 3/4 over range 15.
        assert!((drift.score - 0.05).abs() < 1e-12, "score = {}", drift.score);
    }

    #[test]
    fn test_continuous_constant_column_is_zero() {
        let original = numeric_table(vec![Some(5.0), Some(5.0), Some(5.0)]);
        let cleaned = numeric_table(vec![Some(7.0), Some(7.0), Some(7.0)]);

        let drift = distribution_drift(&original, &cleaned, "value").unwrap();
        assert_eq!(drift.score, 0.0);
    }

    #[test]
    fn test_continuous_all_missing_is_zero() {
        let original = numeric_table(vec![None, None, None]);
        let cleaned = numeric_table(vec![Some(1.0), Some(2.0), Some(3.0)]);

        let drift = distribution_drift(&original, &cleaned, "value").unwrap();
        assert_eq!(drift.score, 0.0);
    }

    #[test]
    fn test_continuous_missing_dropped_independently() {
        // One side has a null; sample sizes differ but the comparison
        // still works distributionally.
        let original = numeric_table(vec![Some(10.0), Some(20.0), Some(30.0), None]);
        let cleaned = numeric_table(vec![Some(10.0), Some(20.0), Some(30.0), Some(20.0)]);

        let drift = distribution_drift(&original, &cleaned, "value").unwrap();
        assert!(drift.score >= 0.0 && drift.score <= 1.0);
    }

    #[test]
    fn test_continuous_integer_column() {
        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, false)]));
        let make = |vals: Vec<i64>| {
            Table::from_batch(
                RecordBatch::try_new(
                    Arc::clone(&schema),
                    vec![Arc::new(Int64Array::from(vals))],
                )
                .unwrap(),
            )
            .unwrap()
        };
        let original = make(vec![1, 2, 3, 4]);
        let cleaned = make(vec![1, 2, 3, 4]);

        let drift = distribution_drift(&original, &cleaned, "n").unwrap();
        assert_eq!(drift.method, DriftMethod::Wasserstein);
        assert!(drift.score.abs() < 1e-12);
    }

    // ========== wasserstein_distance tests ==========

    #[test]
    fn test_wasserstein_identical() {
        let mut a = vec![1.0, 2.0, 3.0];
        let mut b = vec![3.0, 1.0, 2.0];
        assert!(wasserstein_distance(&mut a, &mut b).abs() < 1e-12);
    }

    #[test]
    fn test_wasserstein_known_shift() {
        // Point masses at 0 and 10: distance is exactly the shift.
        let mut a = vec![0.0, 0.0];
        let mut b = vec![10.0, 10.0];
        assert!((wasserstein_distance(&mut a, &mut b) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_wasserstein_unequal_sizes() {
        // {0, 2} vs {1}: CDFs differ by 0.5 over [0, 1) and [1, 2).
        let mut a = vec![0.0, 2.0];
        let mut b = vec![1.0];
        assert!((wasserstein_distance(&mut a, &mut b) - 1.0).abs() < 1e-12);
    }

    // ========== global_drift tests ==========

    fn mixed_tables() -> (Table, Table) {
        let schema = Arc::new(Schema::new(vec![
            Field::new("category", DataType::Utf8, true),
            Field::new("value", DataType::Float64, true),
        ]));
        let make = |cats: Vec<&str>, vals: Vec<f64>| {
            Table::from_batch(
                RecordBatch::try_new(
                    Arc::clone(&schema),
                    vec![
                        Arc::new(StringArray::from(
                            cats.into_iter().map(Some).collect::<Vec<_>>(),
                        )),
                        Arc::new(Float64Array::from(
                            vals.into_iter().map(Some).collect::<Vec<_>>(),
                        )),
                    ],
                )
                .unwrap(),
            )
            .unwrap()
        };
        let original = make(vec!["A", "B", "A", "C"], vec![10.0, 20.0, 15.0, 25.0]);
        let cleaned = make(vec!["C", "B", "A", "C"], vec![10.0, 20.0, 15.0, 100.0]);
        (original, cleaned)
    }

    #[test]
    fn test_global_drift_no_change() {
        let (original, _) = mixed_tables();
        let report = global_drift(&original, &original.clone(), None::<&[&str]>).unwrap();
        assert!(report.global_drift < 0.01);
        assert_eq!(report.num_columns(), 2);
    }

    #[test]
    fn test_global_drift_is_mean_of_columns() {
        let (original, cleaned) = mixed_tables();

        let report = global_drift(&original, &cleaned, None::<&[&str]>).unwrap();
        let cat = distribution_drift(&original, &cleaned, "category").unwrap();
        let val = distribution_drift(&original, &cleaned, "value").unwrap();

        let expected = (cat.score + val.score) / 2.0;
        assert!((report.global_drift - expected).abs() < 1e-12);
        assert_eq!(report.column_score("category"), Some(cat.score));
        assert_eq!(report.column_score("value"), Some(val.score));
    }

    #[test]
    fn test_global_drift_subset_and_order() {
        let (original, cleaned) = mixed_tables();

        let report = global_drift(&original, &cleaned, Some(&["value", "category"])).unwrap();
        let names: Vec<&str> = report.by_column.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["value", "category"]);

        let only_value = global_drift(&original, &cleaned, Some(&["value"])).unwrap();
        assert_eq!(only_value.num_columns(), 1);
        let val = distribution_drift(&original, &cleaned, "value").unwrap();
        assert!((only_value.global_drift - val.score).abs() < 1e-12);
    }

    #[test]
    fn test_global_drift_unknown_column() {
        let (original, cleaned) = mixed_tables();
        let result = global_drift(&original, &cleaned, Some(&["ghost"]));
        assert!(matches!(result, Err(Error::ColumnNotFound { .. })));
    }

    #[test]
    fn test_drift_rejects_unsupported_type() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "ts",
            DataType::Timestamp(TimeUnit::Nanosecond, None),
            false,
        )]));
        let make = || {
            Table::from_batch(
                RecordBatch::try_new(
                    Arc::clone(&schema),
                    vec![Arc::new(TimestampNanosecondArray::from(vec![1, 2, 3]))],
                )
                .unwrap(),
            )
            .unwrap()
        };
        let result = distribution_drift(&make(), &make(), "ts");
        assert!(matches!(result, Err(Error::UnsupportedColumnType { .. })));
    }

    #[test]
    fn test_report_accessors() {
        let report = DriftReport::from_columns(vec![
            ColumnDrift {
                column: "a".into(),
                score: 0.2,
                method: DriftMethod::Wasserstein,
            },
            ColumnDrift {
                column: "b".into(),
                score: 0.6,
                method: DriftMethod::KlDivergence,
            },
        ]);
        assert!((report.global_drift - 0.4).abs() < 1e-12);
        assert!((report.max_drift() - 0.6).abs() < 1e-12);
        assert_eq!(report.column_score("missing"), None);
    }

    #[test]
    fn test_empty_report_is_zero() {
        let report = DriftReport::from_columns(Vec::new());
        assert_eq!(report.global_drift, 0.0);
        assert_eq!(report.max_drift(), 0.0);
    }
}
