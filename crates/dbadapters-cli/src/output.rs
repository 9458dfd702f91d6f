//! Result rendering

use comfy_table::{Table, presets::UTF8_FULL};
use dbadapters::{DatabaseAdapter, QueryResult};
use std::sync::Arc;

use crate::args::Format;

#[cfg(test)]
mod tests;

pub fn adapters_table(adapters: &[Arc<dyn DatabaseAdapter>]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "NAME", "DEFAULT PORT", "MAX CONNECTIONS"]);
    for adapter in adapters {
        table.add_row(vec![
            adapter.id().to_string(),
            adapter.display_name().to_string(),
            adapter
                .default_port()
                .map(|p| p.to_string())
                .unwrap_or_default(),
            adapter.connection_limit().to_string(),
        ]);
    }
    table
}

/// Render every result set; batches print one block (or JSON value) per set
pub fn render(result: &QueryResult, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Table => Ok(result
            .result_sets()
            .map(render_table)
            .collect::<Vec<_>>()
            .join("\n\n")),
        Format::Json => {
            let value = if result.more_results.is_empty() {
                to_json(result)
            } else {
                serde_json::Value::Array(result.result_sets().map(to_json).collect())
            };
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

fn render_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return format!("{} row(s) affected", result.affected_rows);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(result.column_names());
    for row in &result.rows {
        table.add_row(row.values.iter().map(|v| v.to_string()));
    }
    format!(
        "{}\n{} row(s) in {} ms",
        table,
        result.row_count(),
        result.execution_time_ms
    )
}

/// Rows as an array of objects keyed by column name; statements without a
/// result set report their counters instead.
fn to_json(result: &QueryResult) -> serde_json::Value {
    if result.columns.is_empty() {
        return serde_json::json!({
            "affected_rows": result.affected_rows,
            "last_insert_id": result.last_insert_id,
        });
    }

    let keys = json_keys(&result.column_names());
    let rows = result
        .rows
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, serde_json::Value> = keys
                .iter()
                .zip(row.values.iter())
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect();
            serde_json::Value::Object(object)
        })
        .collect();
    serde_json::Value::Array(rows)
}

/// Object keys for the columns: repeated names get `_2`, `_3`... so no
/// value is overwritten
fn json_keys(names: &[&str]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let mut key = name.to_string();
        let mut n = 2;
        while keys.contains(&key) || (key != *name && names.contains(&key.as_str())) {
            key = format!("{}_{}", name, n);
            n += 1;
        }
        keys.push(key);
    }
    keys
}
