//! Loading object dumps into an [`InMemoryObjectSource`].
//!
//! Two layouts are accepted:
//!
//! - a JSON array of objects, each with a string `id`;
//! - one object per line, optionally prefixed by its id and a tab
//!   (`<id>\t<json>`), as served by object download endpoints.

use std::path::Path;

use serde_json::Value;
use strata_types::ObjectId;
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryObjectSource;

/// Parse a dump from text into `store`. Returns the number of objects read.
pub fn load_into(store: &InMemoryObjectSource, text: &str) -> StoreResult<usize> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        let values: Vec<Value> =
            serde_json::from_str(trimmed).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let count = values.len();
        for value in values {
            store.insert(value)?;
        }
        return Ok(count);
    }

    let mut count = 0;
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (declared, body) = match line.split_once('\t') {
            Some((id, body)) => (Some(ObjectId::new(id)?), body),
            None => (None, line),
        };
        let mut value: Value = serde_json::from_str(body).map_err(|e| {
            StoreError::Serialization(format!("line {}: {e}", line_no + 1))
        })?;
        if let (Some(id), Some(fields)) = (declared, value.as_object_mut()) {
            fields
                .entry("id")
                .or_insert_with(|| Value::String(id.to_string()));
        }
        store.insert(value)?;
        count += 1;
    }
    Ok(count)
}

/// Read a dump file into a new public source.
pub fn open(path: &Path) -> StoreResult<InMemoryObjectSource> {
    let text = std::fs::read_to_string(path)?;
    let store = InMemoryObjectSource::new();
    let count = load_into(&store, &text)?;
    info!(path = %path.display(), objects = count, "loaded object dump");
    Ok(store)
}
