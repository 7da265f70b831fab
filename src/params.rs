use crate::types::Value;

/// Bind parameters for [`Database::query`](crate::Database::query) and friends.
///
/// A lone scalar becomes a one-element positional list, and an empty collection means
/// "no parameters": the statement is then executed directly instead of being prepared.
///
/// ```rust
/// use sql_handle::prelude::*;
///
/// assert!(Params::from(()).is_empty());
/// assert_eq!(Params::from(5_i64), Params::Positional(vec![Value::Int(5)]));
/// let named = Params::named([(":name", "alice")]);
/// assert_eq!(named.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    /// `?`, `?N` or `$N` placeholders, bound in order.
    Positional(Vec<Value>),
    /// `:name` placeholders. Names are stored exactly as given (usually with the leading `:`).
    Named(Vec<(String, Value)>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl Params {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    pub fn named<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(pairs) => pairs.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a named parameter, with or without its leading `:`.
    #[must_use]
    pub fn named_value(&self, name: &str) -> Option<&Value> {
        let Params::Named(pairs) = self else {
            return None;
        };
        let bare = name.trim_start_matches(':');
        pairs
            .iter()
            .find(|(key, _)| key.trim_start_matches(':') == bare)
            .map(|(_, value)| value)
    }
}

impl From<()> for Params {
    fn from((): ()) -> Self {
        Params::none()
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        Params::Positional(vec![value])
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<&[Value]> for Params {
    fn from(values: &[Value]) -> Self {
        Params::Positional(values.to_vec())
    }
}

impl<const N: usize> From<[Value; N]> for Params {
    fn from(values: [Value; N]) -> Self {
        Params::Positional(values.into())
    }
}

impl From<Option<Params>> for Params {
    fn from(params: Option<Params>) -> Self {
        params.unwrap_or_default()
    }
}

macro_rules! scalar_params {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Params {
                fn from(value: $ty) -> Self {
                    Params::Positional(vec![Value::from(value)])
                }
            }
        )+
    };
}

scalar_params!(i64, i32, f64, bool, &str, String, chrono::NaiveDateTime);
