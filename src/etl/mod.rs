//! ETL stage: load and merge the raw CSV exports, clean the category
//! labels, and persist the result into the SQLite store.

pub mod clean;
pub mod load;
pub mod store;

pub use clean::{CleanRow, CleanTable, clean};
pub use load::{CategoryRecord, MergedRecord, MessageRecord, load_categories, load_messages, merge};
pub use store::{Dataset, load_dataset, save_table};
