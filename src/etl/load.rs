//! Loading and merging of the raw CSV exports.
//!
//! Two comma-delimited files feed the pipeline: a messages export
//! (`id,message,original,genre`) and a categories export
//! (`id,categories`). Both must carry a header row with an `id` column;
//! malformed input propagates as a CSV error.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single row of the messages export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Shared identifier, the join key.
    pub id: i64,
    /// Message text (translated to English where `original` is set).
    pub message: String,
    /// Untranslated source text, when the message was not in English.
    pub original: Option<String>,
    /// Source channel of the message (e.g. "direct", "news", "social").
    pub genre: String,
}

/// A single row of the categories export: the labels for one message,
/// encoded as a `;`-delimited string of `name-value` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub categories: String,
}

/// A message joined with its raw category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    pub id: i64,
    pub message: String,
    pub original: Option<String>,
    pub genre: String,
    pub categories: String,
}

/// Read the messages export.
pub fn load_messages<P: AsRef<Path>>(path: P) -> Result<Vec<MessageRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    debug!("loaded {} message records", records.len());
    Ok(records)
}

/// Read the categories export.
pub fn load_categories<P: AsRef<Path>>(path: P) -> Result<Vec<CategoryRecord>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    debug!("loaded {} category records", records.len());
    Ok(records)
}

/// Inner-join messages with categories on `id`.
///
/// Rows whose identifier has no match on the other side are silently
/// dropped. Message-side order is preserved. Identifiers are assumed
/// unique per side; if the categories export repeats an id, the last
/// occurrence wins.
pub fn merge(messages: Vec<MessageRecord>, categories: Vec<CategoryRecord>) -> Vec<MergedRecord> {
    let by_id: HashMap<i64, String> = categories
        .into_iter()
        .map(|record| (record.id, record.categories))
        .collect();

    messages
        .into_iter()
        .filter_map(|message| {
            by_id.get(&message.id).cloned().map(|categories| MergedRecord {
                id: message.id,
                message: message.message,
                original: message.original,
                genre: message.genre,
                categories,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_messages() {
        let file = write_csv(
            "id,message,original,genre\n\
             2,Weather update - a cold front,Un front froid,direct\n\
             7,Is the Hurricane over or is it not over,,direct\n",
        );

        let records = load_messages(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 2);
        assert_eq!(records[0].original.as_deref(), Some("Un front froid"));
        assert_eq!(records[1].original, None);
        assert_eq!(records[1].genre, "direct");
    }

    #[test]
    fn test_load_messages_missing_id_column_fails() {
        let file = write_csv("message,genre\nhello,direct\n");
        assert!(load_messages(file.path()).is_err());
    }

    #[test]
    fn test_load_categories() {
        let file = write_csv(
            "id,categories\n\
             2,related-1;request-0;offer-0\n",
        );

        let records = load_categories(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].categories, "related-1;request-0;offer-0");
    }

    #[test]
    fn test_merge_is_set_intersection() {
        let messages = vec![
            MessageRecord {
                id: 1,
                message: "one".into(),
                original: None,
                genre: "direct".into(),
            },
            MessageRecord {
                id: 2,
                message: "two".into(),
                original: None,
                genre: "news".into(),
            },
            MessageRecord {
                id: 3,
                message: "three".into(),
                original: None,
                genre: "social".into(),
            },
        ];
        let categories = vec![
            CategoryRecord {
                id: 2,
                categories: "related-1".into(),
            },
            CategoryRecord {
                id: 3,
                categories: "related-0".into(),
            },
            CategoryRecord {
                id: 9,
                categories: "related-1".into(),
            },
        ];

        let merged = merge(messages, categories);
        let ids: Vec<i64> = merged.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(merged[0].message, "two");
        assert_eq!(merged[0].categories, "related-1");
    }

    #[test]
    fn test_merge_empty_intersection() {
        let messages = vec![MessageRecord {
            id: 1,
            message: "one".into(),
            original: None,
            genre: "direct".into(),
        }];
        let categories = vec![CategoryRecord {
            id: 2,
            categories: "related-1".into(),
        }];

        assert!(merge(messages, categories).is_empty());
    }
}
