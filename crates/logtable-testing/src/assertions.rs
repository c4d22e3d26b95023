//! Assertions over the JSON `{data, msg, ok}` reply envelope.

use anyhow::{Context, Result};
use serde_json::Value;

/// Assert that the reply reports success.
pub fn assert_ok(json: &Value) -> Result<()> {
    match json["ok"].as_bool() {
        Some(true) => Ok(()),
        Some(false) => anyhow::bail!("Expected ok reply, got: {}", json["msg"]),
        None => anyhow::bail!("Expected 'ok' field in JSON: {}", json),
    }
}

/// Assert that `data` is an array of `expected` elements.
pub fn assert_row_count(json: &Value, expected: usize) -> Result<()> {
    let rows = json["data"]
        .as_array()
        .context("Expected 'data' array in JSON")?;

    if rows.len() != expected {
        anyhow::bail!("Expected {} rows, got {}", expected, rows.len());
    }

    Ok(())
}

/// Extract the session table name from an ingest reply.
pub fn table_name(json: &Value) -> Result<String> {
    json["data"]["table_name"]
        .as_str()
        .or_else(|| json["data"].as_str())
        .map(str::to_string)
        .context("Expected table name in 'data'")
}

/// Timestamps of a query reply, in reply order.
pub fn timestamps(json: &Value) -> Result<Vec<String>> {
    json["data"]
        .as_array()
        .context("Expected 'data' array in JSON")?
        .iter()
        .map(|row| {
            row["timestamp"]
                .as_str()
                .map(str::to_string)
                .context("Row without 'timestamp'")
        })
        .collect()
}
