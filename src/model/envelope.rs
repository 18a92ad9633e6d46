//! Normalization of listing/search response bodies
//!
//! The service answers either with a bare array of records or with the array
//! wrapped as `{"data": [...]}`. Callers go through [`unwrap_records`] once at
//! the input boundary and never inspect the shape themselves.

use serde_json::Value;

use super::DocumentRecord;
use crate::error::{InputError, Result};

/// Decode a response body into records
///
/// # Arguments
/// * `body` - Raw JSON text
///
/// # Returns
/// * `Result<Vec<DocumentRecord>>` - Records in response order, or an input error
pub fn unwrap_records(body: &str) -> Result<Vec<DocumentRecord>> {
    let value: Value = serde_json::from_str(body)?;
    let list = unwrap_data(value)?;
    Ok(serde_json::from_value(list)?)
}

/// Strip the optional `data` wrapper, leaving the inner array
pub fn unwrap_data(value: Value) -> Result<Value> {
    match value {
        list @ Value::Array(_) => Ok(list),
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Array(_)) => Ok(inner),
            Some(_) => Err(InputError::UnexpectedShape(
                "an object whose 'data' is not an array".to_string(),
            )
            .into()),
            None => Err(InputError::UnexpectedShape(
                "an object without 'data'".to_string(),
            )
            .into()),
        },
        other => Err(InputError::UnexpectedShape(describe(&other)).into()),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(_) => "a string".to_string(),
        Value::Array(_) => "an array".to_string(),
        Value::Object(_) => "an object".to_string(),
    }
}
