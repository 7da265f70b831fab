use std::collections::VecDeque;
use std::sync::Arc;

use crate::types::{FetchMode, Value};

use super::row::{ColumnIndex, Row};

/// A row shaped by a [`FetchMode`].
#[derive(Debug, Clone)]
pub enum FetchedRow {
    Assoc(Row),
    Num(Vec<Value>),
    Column(Value),
}

impl FetchedRow {
    fn shape(row: Row, mode: FetchMode) -> Self {
        match mode {
            FetchMode::Assoc => FetchedRow::Assoc(row),
            FetchMode::Num => FetchedRow::Num(row.into_values()),
            FetchMode::Column => {
                FetchedRow::Column(row.into_values().into_iter().next().unwrap_or(Value::Null))
            }
        }
    }

    #[must_use]
    pub fn as_assoc(&self) -> Option<&Row> {
        if let FetchedRow::Assoc(row) = self {
            Some(row)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_num(&self) -> Option<&[Value]> {
        if let FetchedRow::Num(values) = self {
            Some(values)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_column(&self) -> Option<&Value> {
        if let FetchedRow::Column(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn into_assoc(self) -> Option<Row> {
        if let FetchedRow::Assoc(row) = self {
            Some(row)
        } else {
            None
        }
    }
}

/// Result of [`Database::query`](crate::Database::query), positioned before the first row.
///
/// Rows are handed out in the order the database produced them.
#[derive(Debug, Clone)]
pub struct Cursor {
    columns: Arc<ColumnIndex>,
    rows: VecDeque<Row>,
    rows_affected: usize,
    default_mode: FetchMode,
}

impl Cursor {
    pub(crate) fn new(column_names: Vec<String>, capacity: usize) -> Self {
        Self {
            columns: Arc::new(ColumnIndex::new(column_names)),
            rows: VecDeque::with_capacity(capacity),
            rows_affected: 0,
            default_mode: FetchMode::default(),
        }
    }

    pub(crate) fn push_values(&mut self, values: Vec<Value>) {
        self.rows.push_back(Row::new(Arc::clone(&self.columns), values));
    }

    pub(crate) fn set_rows_affected(&mut self, rows_affected: usize) {
        self.rows_affected = rows_affected;
    }

    pub(crate) fn with_default_mode(mut self, mode: FetchMode) -> Self {
        self.default_mode = mode;
        self
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Rows changed by the statement, when it was a write.
    #[must_use]
    pub fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    /// Rows not fetched yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Next row in the handle's default fetch mode.
    pub fn fetch(&mut self) -> Option<FetchedRow> {
        self.fetch_with_mode(self.default_mode)
    }

    pub fn fetch_with_mode(&mut self, mode: FetchMode) -> Option<FetchedRow> {
        self.rows.pop_front().map(|row| FetchedRow::shape(row, mode))
    }

    /// Remaining rows in the handle's default fetch mode.
    #[must_use]
    pub fn fetch_all(self) -> Vec<FetchedRow> {
        let mode = self.default_mode;
        self.fetch_all_with_mode(mode)
    }

    #[must_use]
    pub fn fetch_all_with_mode(self, mode: FetchMode) -> Vec<FetchedRow> {
        self.rows
            .into_iter()
            .map(|row| FetchedRow::shape(row, mode))
            .collect()
    }

    /// First column of every remaining row.
    #[must_use]
    pub fn fetch_column(self) -> Vec<Value> {
        self.rows
            .into_iter()
            .map(|row| row.into_values().into_iter().next().unwrap_or(Value::Null))
            .collect()
    }
}

impl Iterator for Cursor {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.rows.len(), Some(self.rows.len()))
    }
}

impl ExactSizeIterator for Cursor {}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor() -> Cursor {
        let mut c = Cursor::new(vec!["id".into(), "name".into()], 2);
        c.push_values(vec![Value::Int(1), Value::Text("a".into())]);
        c.push_values(vec![Value::Int(2), Value::Text("b".into())]);
        c
    }

    #[test]
    fn fetch_pulls_rows_in_order() {
        let mut c = cursor();
        let first = c.fetch().unwrap().into_assoc().unwrap();
        assert_eq!(first.get("id"), Some(&Value::Int(1)));
        assert_eq!(c.remaining(), 1);
        let second = c.fetch_with_mode(FetchMode::Num).unwrap();
        assert_eq!(
            second.as_num().unwrap(),
            &[Value::Int(2), Value::Text("b".into())]
        );
        assert!(c.fetch().is_none());
    }

    #[test]
    fn column_mode_keeps_first_column() {
        assert_eq!(cursor().fetch_column(), vec![Value::Int(1), Value::Int(2)]);
        let shaped = cursor().with_default_mode(FetchMode::Column).fetch_all();
        assert_eq!(shaped[1].as_column(), Some(&Value::Int(2)));
    }

    #[test]
    fn iterates_rows() {
        let names: Vec<String> = cursor()
            .map(|row| row["name"].as_text().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a", "b"]);
    }
}
