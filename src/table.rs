//! Result table shaping.
//!
//! Converts the heterogeneous records returned by the query gateway into the
//! uniform column/row structure consumed by table views.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw record returned by the query engine: a field-name-to-value
/// mapping, in the order the engine returned the fields.
pub type Record = serde_json::Map<String, Value>;

/// Metadata about a column in a normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
}

impl ColumnDescriptor {
    /// Creates a new column descriptor with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A single result row with its synthetic identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Zero-based position of the record within its result set. Used only
    /// for list identity on the consumer side; never persisted and never
    /// meaningful across requests.
    pub id: usize,

    /// The record's cells, exactly as returned by the gateway.
    pub cells: Record,
}

impl Row {
    /// Returns the cell for `column`, if the record carries it.
    pub fn cell(&self, column: &str) -> Option<&Value> {
        self.cells.get(column)
    }
}

/// Uniform table shape produced from a non-empty record sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Column metadata, in derivation order.
    pub columns: Vec<ColumnDescriptor>,

    /// Rows in input order.
    pub rows: Vec<Row>,
}

impl ResultTable {
    /// Returns the column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Column derivation policy.
///
/// `FirstRow` is the source behavior: the column set is the key set of the
/// first record, and later records are trusted to share it. Rows are kept
/// exactly as returned either way; a record missing a column simply has no
/// cell for it (no null-filling, no coercion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SchemaInference {
    /// Columns are the first record's keys, in that record's key order.
    #[default]
    FirstRow,
    /// Columns additionally include keys first seen in later records,
    /// appended in first-seen order.
    UnionOfKeys,
}

/// Normalizes `records` with first-row schema inference.
pub fn normalize(records: Vec<Record>) -> Option<ResultTable> {
    normalize_with(records, SchemaInference::FirstRow)
}

/// Normalizes `records` under the given column derivation policy.
///
/// Returns `None` for the empty sequence; a zero-row result never produces a
/// zero-column table. Column order and row identities are deterministic and
/// depend only on input order: no sorting, no deduplication.
pub fn normalize_with(records: Vec<Record>, inference: SchemaInference) -> Option<ResultTable> {
    let mut columns: Vec<ColumnDescriptor> = records
        .first()?
        .keys()
        .map(|name| ColumnDescriptor::new(name.as_str()))
        .collect();

    if inference == SchemaInference::UnionOfKeys {
        for record in records.iter().skip(1) {
            for key in record.keys() {
                if !columns.iter().any(|c| c.name == *key) {
                    columns.push(ColumnDescriptor::new(key.as_str()));
                }
            }
        }
    }

    let rows = records
        .into_iter()
        .enumerate()
        .map(|(id, cells)| Row { id, cells })
        .collect();

    Some(ResultTable { columns, rows })
}
