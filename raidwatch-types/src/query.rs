//! Typed results of a single query against the management agent.

use std::fmt;

/// A single value returned by the management agent.
///
/// The agent only ever answers with integers or strings; anything it
/// cannot type is carried as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum QueryValue {
    Integer(i64),
    String(String),
}

impl QueryValue {
    /// Returns the integer, if this value is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            QueryValue::Integer(n) => Some(*n),
            QueryValue::String(_) => None,
        }
    }

    /// Returns the string, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Integer(_) => None,
            QueryValue::String(s) => Some(s),
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Integer(n) => write!(f, "{}", n),
            QueryValue::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        QueryValue::Integer(n)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::String(s)
    }
}

/// The result of one fetch.
///
/// A get yields a [`QueryResult::Scalar`], a walk yields an ordered
/// [`QueryResult::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum QueryResult {
    Scalar(QueryValue),
    List(Vec<QueryValue>),
}

impl QueryResult {
    /// The scalar value, or the first element of a list.
    pub fn into_scalar(self) -> Option<QueryValue> {
        match self {
            QueryResult::Scalar(v) => Some(v),
            QueryResult::List(values) => values.into_iter().next(),
        }
    }

    /// The list of values; a scalar becomes a one-element list.
    pub fn into_list(self) -> Vec<QueryValue> {
        match self {
            QueryResult::Scalar(v) => vec![v],
            QueryResult::List(values) => values,
        }
    }

    /// Number of values carried.
    pub fn len(&self) -> usize {
        match self {
            QueryResult::Scalar(_) => 1,
            QueryResult::List(values) => values.len(),
        }
    }

    /// True for an empty list.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_from_list_takes_first() {
        let result = QueryResult::List(vec![QueryValue::from(4), QueryValue::from("x")]);
        assert_eq!(result.into_scalar(), Some(QueryValue::Integer(4)));
        assert_eq!(QueryResult::List(vec![]).into_scalar(), None);
    }

    #[test]
    fn test_scalar_into_list() {
        let result = QueryResult::Scalar(QueryValue::from("EonStor"));
        assert_eq!(result.len(), 1);
        assert_eq!(result.into_list(), vec![QueryValue::String("EonStor".into())]);
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(QueryValue::from(7).as_integer(), Some(7));
        assert_eq!(QueryValue::from(7).as_str(), None);
        assert_eq!(QueryValue::from("7").as_integer(), None);
        assert_eq!(QueryValue::from("7").to_string(), "7");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_untagged_json() {
        let values: Vec<QueryValue> = serde_json::from_str(r#"[3, "Fan 1"]"#).unwrap();
        assert_eq!(values, vec![QueryValue::Integer(3), QueryValue::String("Fan 1".into())]);
    }
}
