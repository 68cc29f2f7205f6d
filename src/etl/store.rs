//! SQLite persistence for the cleaned table and the training-side
//! dataset loader.
//!
//! The cleaned table is written to a single fixed-named relation with
//! replace semantics: the table is dropped and recreated on every run,
//! and all rows are inserted inside one transaction. Durability beyond
//! that is whatever SQLite's journal provides.

use std::path::Path;

use log::debug;
use rusqlite::Connection;
use rusqlite::types::Value;

use crate::error::{Result, TriageError};
use crate::etl::clean::CleanTable;

/// Fixed name of the persisted relation.
pub const MESSAGE_TABLE: &str = "messages";

/// Columns that are not labels, in stored order.
const FIXED_COLUMNS: [&str; 4] = ["id", "message", "original", "genre"];

/// The training-side view of the store: text features, multi-label
/// targets, and the ordered label names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub texts: Vec<String>,
    pub labels: Vec<Vec<u8>>,
    pub label_names: Vec<String>,
}

impl Dataset {
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Persist the cleaned table into the SQLite store at `db_path`,
/// overwriting the fixed-named table if it already exists.
pub fn save_table<P: AsRef<Path>>(table: &CleanTable, db_path: P) -> Result<()> {
    let mut conn = Connection::open(db_path.as_ref())?;
    let tx = conn.transaction()?;

    tx.execute(&format!("DROP TABLE IF EXISTS {MESSAGE_TABLE}"), [])?;

    let mut ddl = format!(
        "CREATE TABLE {MESSAGE_TABLE} (id INTEGER NOT NULL, message TEXT NOT NULL, \
         original TEXT, genre TEXT NOT NULL"
    );
    for name in &table.label_names {
        ddl.push_str(", ");
        ddl.push_str(&quote_identifier(name));
        ddl.push_str(" INTEGER NOT NULL");
    }
    ddl.push(')');
    tx.execute(&ddl, [])?;

    let column_count = FIXED_COLUMNS.len() + table.label_names.len();
    let placeholders = (1..=column_count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let insert = format!("INSERT INTO {MESSAGE_TABLE} VALUES ({placeholders})");

    {
        let mut stmt = tx.prepare(&insert)?;
        for row in &table.rows {
            let mut values: Vec<Value> = Vec::with_capacity(column_count);
            values.push(Value::Integer(row.id));
            values.push(Value::Text(row.message.clone()));
            values.push(match &row.original {
                Some(original) => Value::Text(original.clone()),
                None => Value::Null,
            });
            values.push(Value::Text(row.genre.clone()));
            for &label in &row.labels {
                values.push(Value::Integer(i64::from(label)));
            }
            stmt.execute(rusqlite::params_from_iter(values))?;
        }
    }

    tx.commit()?;
    debug!(
        "persisted {} rows into table {MESSAGE_TABLE} at {}",
        table.rows.len(),
        db_path.as_ref().display()
    );
    Ok(())
}

/// Load the persisted table back as a training dataset.
///
/// The label columns are everything except the fixed message columns, in
/// stored order.
pub fn load_dataset<P: AsRef<Path>>(db_path: P) -> Result<Dataset> {
    let conn = Connection::open(db_path.as_ref())?;
    let mut stmt = conn.prepare(&format!("SELECT * FROM {MESSAGE_TABLE}"))?;

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let message_index = columns
        .iter()
        .position(|name| name == "message")
        .ok_or_else(|| {
            TriageError::invalid_operation(format!(
                "table {MESSAGE_TABLE} has no message column"
            ))
        })?;

    let label_indices: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, name)| !FIXED_COLUMNS.contains(&name.as_str()))
        .map(|(index, _)| index)
        .collect();
    let label_names: Vec<String> = label_indices
        .iter()
        .map(|&index| columns[index].clone())
        .collect();

    let mut texts = Vec::new();
    let mut labels = Vec::new();
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        texts.push(row.get::<_, String>(message_index)?);
        let mut values = Vec::with_capacity(label_indices.len());
        for &index in &label_indices {
            values.push(row.get::<_, i64>(index)? as u8);
        }
        labels.push(values);
    }

    debug!(
        "loaded {} rows with {} labels from {}",
        texts.len(),
        label_names.len(),
        db_path.as_ref().display()
    );

    Ok(Dataset {
        texts,
        labels,
        label_names,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::etl::clean::CleanRow;

    fn sample_table() -> CleanTable {
        CleanTable {
            label_names: vec!["related".into(), "request".into(), "offer".into()],
            rows: vec![
                CleanRow {
                    id: 2,
                    message: "need water".into(),
                    original: Some("bezwen dlo".into()),
                    genre: "direct".into(),
                    labels: vec![1, 1, 0],
                },
                CleanRow {
                    id: 7,
                    message: "storm ahead".into(),
                    original: None,
                    genre: "news".into(),
                    labels: vec![1, 0, 0],
                },
            ],
        }
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("triage.db");

        let table = sample_table();
        save_table(&table, &db_path).unwrap();

        let dataset = load_dataset(&db_path).unwrap();
        assert_eq!(dataset.len(), table.len());
        assert_eq!(dataset.label_names, table.label_names);
        assert_eq!(dataset.texts[0], "need water");
        assert_eq!(dataset.labels[0], vec![1, 1, 0]);
        assert_eq!(dataset.labels[1], vec![1, 0, 0]);
    }

    #[test]
    fn test_save_replaces_existing_table() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("triage.db");

        save_table(&sample_table(), &db_path).unwrap();

        let mut smaller = sample_table();
        smaller.rows.truncate(1);
        save_table(&smaller, &db_path).unwrap();

        let dataset = load_dataset(&db_path).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_missing_table_fails() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("empty.db");
        Connection::open(&db_path).unwrap();

        assert!(load_dataset(&db_path).is_err());
    }
}
