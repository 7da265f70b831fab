use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Value;

/// Column names of a result, shared by every row of that result.
#[derive(Debug, Default)]
pub struct ColumnIndex {
    names: Vec<String>,
    // when a name repeats, the last column with that name wins
    lookup: HashMap<String, usize>,
}

impl ColumnIndex {
    #[must_use]
    pub fn new(names: Vec<String>) -> Self {
        let lookup = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, lookup }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn position(&self, column_name: &str) -> Option<usize> {
        self.lookup.get(column_name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A row from a query result
///
/// This struct represents a single row from a query result,
/// with access to both the column names and the values.
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<ColumnIndex>,
    values: Vec<Value>,
}

impl Row {
    /// Create a new row
    ///
    /// # Arguments
    ///
    /// * `columns` - The column names, shared with the other rows of the result
    /// * `values` - The values for this row, in column order
    #[must_use]
    pub fn new(columns: Arc<ColumnIndex>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        self.columns.names()
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&Value> {
        self.columns
            .position(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// `(column name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl std::ops::Index<&str> for Row {
    type Output = Value;

    /// # Panics
    /// Panics if the row has no column with that name.
    fn index(&self, column_name: &str) -> &Value {
        match self.get(column_name) {
            Some(value) => value,
            None => panic!("no column named {column_name:?} in row"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(names: &[&str], values: Vec<Value>) -> Row {
        let columns = Arc::new(ColumnIndex::new(
            names.iter().map(|n| (*n).to_string()).collect(),
        ));
        Row::new(columns, values)
    }

    #[test]
    fn lookup_by_name_and_index() {
        let r = row(&["id", "mytext"], vec![Value::Int(1), Value::Text("bar".into())]);
        assert_eq!(r.get("mytext"), Some(&Value::Text("bar".into())));
        assert_eq!(r.get_by_index(0), Some(&Value::Int(1)));
        assert_eq!(r.get("nope"), None);
        assert_eq!(r["id"], Value::Int(1));
    }

    #[test]
    fn duplicate_names_resolve_to_last_column() {
        let r = row(&["a", "a"], vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(r.get("a"), Some(&Value::Int(2)));
        let pairs: Vec<_> = r.iter().collect();
        assert_eq!(pairs.len(), 2);
    }
}
