//! Scalar cell values and missing-aware equality.
//!
//! Detection and corruption metrics both compare cells between the
//! ground-truth table and the agent's output. The comparison rules live
//! here as a single predicate, [`equal_with_missing`], so the semantics
//! (two missing values are equal, a missing value never equals a present
//! one) are defined in exactly one place.

use arrow::{
    array::{
        Array, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
        Int8Array, LargeStringArray, StringArray, UInt16Array, UInt32Array, UInt8Array,
    },
    datatypes::{DataType, Field},
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single scalar cell extracted from a table.
///
/// Arrow nulls and float NaN both map to [`Value::Null`] - the benchmark
/// treats "not a number" and "absent" as the same missing state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing/absent value.
    Null,
    /// Integer value (all integer widths are widened to i64).
    Int(i64),
    /// Floating-point value (never NaN; NaN is normalized to `Null`).
    Float(f64),
    /// Boolean value.
    Bool(bool),
    /// String value.
    Str(String),
}

impl Value {
    /// Check whether this cell is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell, if it holds a number.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Categorical key for this cell, or `None` when missing.
    ///
    /// Used by the categorical drift path, where every distinct rendered
    /// value is one category and missing cells form their own category.
    pub fn category(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Int(v) => Some(v.to_string()),
            Self::Float(v) => Some(v.to_string()),
            Self::Bool(v) => Some(v.to_string()),
            Self::Str(v) => Some(v.clone()),
        }
    }
}

/// Missing-aware, type-aware cell equality.
///
/// Rules:
/// - two missing values are equal;
/// - a missing value never equals a present value;
/// - integers and floats compare numerically (widened to f64), so a
///   column inferred as Int64 on one side and Float64 on the other still
///   compares by value;
/// - strings and booleans compare by value;
/// - values of incomparable kinds (e.g. string vs number) are unequal.
// Exact float equality is the contract: scores must be reproducible
// bit-for-bit, so no tolerance is applied here.
#[allow(clippy::cast_precision_loss, clippy::float_cmp)]
pub fn equal_with_missing(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => x == y,
        (Value::Int(x), Value::Float(y)) | (Value::Float(y), Value::Int(x)) => *x as f64 == *y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        _ => false,
    }
}

/// Extract every cell of an Arrow array as a [`Value`].
///
/// The supported type set is closed: integer widths up to Int64 (and
/// unsigned up to UInt32, which fit into i64), Float32/Float64, Utf8 and
/// LargeUtf8, and Boolean. Any other Arrow type is an
/// [`Error::UnsupportedColumnType`] - the metrics refuse to guess
/// comparison semantics for types they were never designed for.
///
/// # Errors
///
/// Returns `UnsupportedColumnType` for arrays outside the closed set.
pub fn array_values(array: &dyn Array, field: &Field) -> Result<Vec<Value>> {
    let unsupported = || Error::unsupported_column_type(field.name(), field.data_type());

    macro_rules! extract_int {
        ($arr_ty:ty) => {{
            let arr = array.as_any().downcast_ref::<$arr_ty>().ok_or_else(unsupported)?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::Int(i64::from(arr.value(i)))
                    }
                })
                .collect()
        }};
    }

    macro_rules! extract_float {
        ($arr_ty:ty) => {{
            let arr = array.as_any().downcast_ref::<$arr_ty>().ok_or_else(unsupported)?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        let v = f64::from(arr.value(i));
                        if v.is_nan() {
                            Value::Null
                        } else {
                            Value::Float(v)
                        }
                    }
                })
                .collect()
        }};
    }

    macro_rules! extract_str {
        ($arr_ty:ty) => {{
            let arr = array.as_any().downcast_ref::<$arr_ty>().ok_or_else(unsupported)?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::Str(arr.value(i).to_string())
                    }
                })
                .collect()
        }};
    }

    let values: Vec<Value> = match field.data_type() {
        DataType::Int8 => extract_int!(Int8Array),
        DataType::Int16 => extract_int!(Int16Array),
        DataType::Int32 => extract_int!(Int32Array),
        DataType::Int64 => extract_int!(Int64Array),
        DataType::UInt8 => extract_int!(UInt8Array),
        DataType::UInt16 => extract_int!(UInt16Array),
        DataType::UInt32 => extract_int!(UInt32Array),
        DataType::Float32 => extract_float!(Float32Array),
        DataType::Float64 => extract_float!(Float64Array),
        DataType::Utf8 => extract_str!(StringArray),
        DataType::LargeUtf8 => extract_str!(LargeStringArray),
        DataType::Boolean => {
            let arr = array
                .as_any()
                .downcast_ref::<BooleanArray>()
                .ok_or_else(unsupported)?;
            (0..arr.len())
                .map(|i| {
                    if arr.is_null(i) {
                        Value::Null
                    } else {
                        Value::Bool(arr.value(i))
                    }
                })
                .collect()
        }
        _ => return Err(unsupported()),
    };

    Ok(values)
}
