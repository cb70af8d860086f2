//! JSON writing helpers for export artifacts.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::ExportError;

/// Round every float in `value` to 7 significant digits, recursively.
///
/// Type-tree floats come out of the container with representation noise in
/// the low digits; canonicalizing them keeps re-exports byte-stable so the
/// downstream diffing stays quiet.
pub fn round_floats(value: Value) -> Value {
    match value {
        Value::Number(number) => match number.as_f64() {
            // Integers pass through untouched.
            Some(float) if !number.is_i64() && !number.is_u64() => {
                // 7 significant digits: one leading digit plus six decimals.
                let rounded: f64 = format!("{float:.6e}").parse().unwrap_or(float);
                serde_json::Number::from_f64(rounded)
                    .map(Value::Number)
                    .unwrap_or(Value::Number(number))
            }
            _ => Value::Number(number),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(round_floats).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, round_floats(item)))
                .collect(),
        ),
        other => other,
    }
}

/// Write `value` to `path` as indented JSON, floats canonicalized.
pub fn write_json(path: &Path, value: Value) -> Result<(), ExportError> {
    let text = serde_json::to_string_pretty(&round_floats(value))?;
    fs::write(path, text).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
