//! Category cleaning: unpivot the delimited category string into numeric
//! label columns, drop the invalid sentinel and duplicate rows.
//!
//! Label names are derived from the first row's tokens. Every other row is
//! validated against that derived schema; a row with a different token
//! count or label order is a hard error naming the offending record,
//! never a silent column misalignment.

use std::collections::HashSet;

use log::debug;

use crate::error::{Result, TriageError};
use crate::etl::load::MergedRecord;

/// Label carrying the out-of-domain sentinel.
const RELATED_LABEL: &str = "related";

/// Sentinel value occasionally present in the `related` column of upstream
/// exports. Outside the expected {0, 1} domain; rows carrying it are
/// dropped without interpretation.
const RELATED_SENTINEL: u8 = 2;

/// One cleaned row: the message fields plus one numeric value per label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CleanRow {
    pub id: i64,
    pub message: String,
    pub original: Option<String>,
    pub genre: String,
    /// Label values, parallel to [`CleanTable::label_names`].
    pub labels: Vec<u8>,
}

/// The cleaned table: ordered label names plus the cleaned rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanTable {
    pub label_names: Vec<String>,
    pub rows: Vec<CleanRow>,
}

impl CleanTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Split a category string into `(name, value)` pairs.
fn split_tokens(record: &MergedRecord) -> Result<Vec<(&str, &str)>> {
    record
        .categories
        .split(';')
        .map(|token| {
            token.rsplit_once('-').ok_or_else(|| {
                TriageError::clean(format!(
                    "id {}: category token {token:?} is not of the form name-value",
                    record.id
                ))
            })
        })
        .collect()
}

/// Clean a merged record set.
///
/// Post-conditions: no duplicate rows, no row with `related` equal to the
/// sentinel, every label value numeric.
pub fn clean(records: Vec<MergedRecord>) -> Result<CleanTable> {
    let Some(first) = records.first() else {
        return Ok(CleanTable::default());
    };

    // The first row defines the label schema for the whole table.
    let label_names: Vec<String> = split_tokens(first)?
        .into_iter()
        .map(|(name, _)| name.to_string())
        .collect();

    let related_index = label_names.iter().position(|name| name == RELATED_LABEL);

    let mut rows = Vec::with_capacity(records.len());
    for record in &records {
        let tokens = split_tokens(record)?;
        if tokens.len() != label_names.len() {
            return Err(TriageError::clean(format!(
                "id {}: expected {} category tokens, found {}",
                record.id,
                label_names.len(),
                tokens.len()
            )));
        }

        let mut labels = Vec::with_capacity(tokens.len());
        for ((name, value), expected) in tokens.into_iter().zip(&label_names) {
            if name != expected {
                return Err(TriageError::clean(format!(
                    "id {}: category {name:?} out of order, expected {expected:?}",
                    record.id
                )));
            }
            let value: u8 = value.parse().map_err(|_| {
                TriageError::clean(format!(
                    "id {}: category {name:?} has non-numeric value {value:?}",
                    record.id
                ))
            })?;
            labels.push(value);
        }

        if let Some(index) = related_index
            && labels[index] == RELATED_SENTINEL
        {
            continue;
        }

        rows.push(CleanRow {
            id: record.id,
            message: record.message.clone(),
            original: record.original.clone(),
            genre: record.genre.clone(),
            labels,
        });
    }

    // Drop exact duplicates, keeping the first occurrence.
    let mut seen = HashSet::new();
    rows.retain(|row| seen.insert(row.clone()));

    debug!(
        "cleaned {} records into {} rows with {} labels",
        records.len(),
        rows.len(),
        label_names.len()
    );

    Ok(CleanTable { label_names, rows })
}
