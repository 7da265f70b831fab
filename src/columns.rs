use crate::types::Value;

/// Ordered column name to value mapping fed to the statement builders.
///
/// Iteration order is insertion order; it decides the column order of the generated SQL.
/// Setting a column that is already present replaces its value and keeps its position.
///
/// ```rust
/// use sql_handle::prelude::*;
///
/// let cols = ColumnValues::new()
///     .with("mytext", "Bar")
///     .with("mydate", Value::Null);
/// let names: Vec<&str> = cols.columns().collect();
/// assert_eq!(names, ["mytext", "mydate"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    entries: Vec<(String, Value)>,
}

impl ColumnValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Builder-style `set`.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column's value, returning the previous value if the column was already present.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((column, value));
                None
            }
        }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, column: &str) -> Option<Value> {
        let idx = self.entries.iter().position(|(name, _)| name == column)?;
        Some(self.entries.remove(idx).1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnValues
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut cols = ColumnValues::new();
        for (column, value) in iter {
            cols.set(column, value);
        }
        cols
    }
}

impl IntoIterator for ColumnValues {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Build a [`ColumnValues`] in the order the pairs are written.
///
/// ```rust
/// use sql_handle::{column_values, prelude::*};
///
/// let cols = column_values! { "mytext" => "Bar", "mydate" => Value::Null };
/// assert_eq!(cols.len(), 2);
/// ```
#[macro_export]
macro_rules! column_values {
    () => {
        $crate::columns::ColumnValues::new()
    };
    ($($column:expr => $value:expr),+ $(,)?) => {{
        let mut cols = $crate::columns::ColumnValues::new();
        $(
            cols.set($column, $value);
        )+
        cols
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let cols = ColumnValues::new()
            .with("c", 3_i64)
            .with("a", 1_i64)
            .with("b", 2_i64);
        assert_eq!(cols.columns().collect::<Vec<_>>(), ["c", "a", "b"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut cols = ColumnValues::new().with("a", 1_i64).with("b", 2_i64);
        let prev = cols.set("a", "x");
        assert_eq!(prev, Some(Value::Int(1)));
        assert_eq!(cols.columns().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(cols.get("a"), Some(&Value::Text("x".into())));
        assert_eq!(cols.len(), 2);
    }

    #[test]
    fn remove_drops_entry() {
        let mut cols = column_values! { "a" => 1_i64, "b" => Value::Null };
        assert_eq!(cols.remove("a"), Some(Value::Int(1)));
        assert_eq!(cols.remove("a"), None);
        assert_eq!(cols.columns().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn collects_from_pairs() {
        let cols: ColumnValues = vec![("x", Value::Null), ("y", Value::Bool(true))]
            .into_iter()
            .collect();
        assert_eq!(cols.get("y"), Some(&Value::Bool(true)));
        assert!(column_values! {}.is_empty());
    }
}
