#![forbid(unsafe_code)]

//! Arrow interop: one `RecordBatch` per frame, one array per column.
//!
//! Arrow arrays are single-typed, while frame columns are not. Export infers
//! the array type from the non-missing cells: all-integer columns become
//! `Int64`, numeric columns with any float become `Float64` (integer cells
//! widened), all-text columns become `Utf8`, and all-missing columns become
//! an all-null `Float64`. A column mixing text with numbers has no faithful
//! Arrow rendering and is rejected. Missing cells map to Arrow nulls in both
//! directions.

use crate::error::FrameError;
use crate::frame::DataFrame;
use crate::value::Value;
use arrow_array::{
    Array, ArrayRef, Float64Array, Int64Array, LargeStringArray, RecordBatch, StringArray,
};
use arrow_schema::{ArrowError, DataType, Field, Schema};
use std::sync::Arc;

/// Export the frame as a `RecordBatch`, preserving column order.
pub fn frame_to_record_batch(frame: &DataFrame) -> Result<RecordBatch, FrameError> {
    let mut fields = Vec::with_capacity(frame.column_count());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(frame.column_count());
    for name in frame.column_names() {
        let values = frame.values(name)?;
        let (data_type, array) = column_to_array(name, values)?;
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }
    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).map_err(arrow_err)
}

/// Import a `RecordBatch`, reconstructing columns, order and missing
/// markers.
pub fn record_batch_to_frame(batch: &RecordBatch) -> Result<DataFrame, FrameError> {
    let schema = batch.schema();
    let mut columns = Vec::with_capacity(batch.num_columns());
    for (field, array) in schema.fields().iter().zip(batch.columns()) {
        columns.push((field.name().clone(), array_to_values(field.name(), array)?));
    }
    DataFrame::from_columns(columns)
}

fn column_to_array(name: &str, values: &[Value]) -> Result<(DataType, ArrayRef), FrameError> {
    let mut has_int = false;
    let mut has_float = false;
    let mut has_text = false;
    for value in values {
        match value {
            Value::Int(_) => has_int = true,
            Value::Float(_) => has_float = true,
            Value::Text(_) => has_text = true,
            Value::Missing => {}
        }
    }

    if has_text && (has_int || has_float) {
        return Err(FrameError::malformed(format!(
            "column `{name}` mixes text and numeric cells; no single arrow type fits"
        )));
    }

    if has_text {
        let array: StringArray = values
            .iter()
            .map(|v| match v {
                Value::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        return Ok((DataType::Utf8, Arc::new(array)));
    }
    if has_float {
        let array: Float64Array = values.iter().map(Value::as_f64).collect();
        return Ok((DataType::Float64, Arc::new(array)));
    }
    if has_int {
        let array: Int64Array = values
            .iter()
            .map(|v| match v {
                Value::Int(i) => Some(*i),
                _ => None,
            })
            .collect();
        return Ok((DataType::Int64, Arc::new(array)));
    }

    // All missing (or no rows at all): an all-null float column.
    let array: Float64Array = values.iter().map(|_| None::<f64>).collect();
    Ok((DataType::Float64, Arc::new(array)))
}

fn array_to_values(name: &str, array: &ArrayRef) -> Result<Vec<Value>, FrameError> {
    let unsupported = || {
        FrameError::malformed(format!(
            "column `{name}` has unsupported arrow type {}",
            array.data_type()
        ))
    };

    let values = match array.data_type() {
        DataType::Int64 => {
            let array = array
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(unsupported)?;
            collect_values(array, |a, i| Value::Int(a.value(i)))
        }
        DataType::Float64 => {
            let array = array
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(unsupported)?;
            collect_values(array, |a, i| Value::Float(a.value(i)))
        }
        DataType::Utf8 => {
            let array = array
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(unsupported)?;
            collect_values(array, |a, i| Value::Text(a.value(i).to_owned()))
        }
        DataType::LargeUtf8 => {
            let array = array
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .ok_or_else(unsupported)?;
            collect_values(array, |a, i| Value::Text(a.value(i).to_owned()))
        }
        DataType::Null => vec![Value::Missing; array.len()],
        _ => return Err(unsupported()),
    };
    Ok(values)
}

fn collect_values<A: Array>(array: &A, get: impl Fn(&A, usize) -> Value) -> Vec<Value> {
    (0..array.len())
        .map(|i| {
            if array.is_null(i) {
                Value::Missing
            } else {
                get(array, i)
            }
        })
        .collect()
}

fn arrow_err(err: ArrowError) -> FrameError {
    FrameError::Malformed {
        reason: err.to_string(),
    }
}
