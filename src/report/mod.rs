//! JSON report persistence
//!
//! Small helper for saving scrape results to disk: serialize a value to
//! minified JSON, dropping top-level fields that carry no information
//! (null, false, or empty string), and write it to a file.

use crate::BrokerError;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Removes empty fields from the top level of a JSON object
///
/// A field is considered empty when its value is `null`, `false`, or `""`.
/// Non-object values are left untouched.
pub fn purge_empty_fields(value: &mut Value) {
    if let Value::Object(map) = value {
        map.retain(|_, field| match field {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::String(text) => !text.is_empty(),
            _ => true,
        });
    }
}

/// Serializes `data` to minified JSON and writes it to `path`
///
/// Empty top-level fields are purged first.
pub fn write_report<T: Serialize>(data: &T, path: &Path) -> Result<(), BrokerError> {
    tracing::info!("Saving report to {}...", path.display());

    let mut value = serde_json::to_value(data)?;
    purge_empty_fields(&mut value);

    let serialized = serde_json::to_string(&value)?;
    std::fs::write(path, serialized)?;

    tracing::info!("Report saved");
    Ok(())
}
