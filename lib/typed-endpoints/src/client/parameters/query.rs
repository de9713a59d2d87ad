//! Search parameters and their sanitization.
//!
//! A [`SearchParams::Map`] is a plain key/value bag whose optional entries may be
//! unset. Before dispatch the bag is sanitized: falsy entries (`null`, `false`,
//! `0`, `""`) are dropped, otherwise they would be sent as `?q=` or `?q=null`.
//! Pre-built pairs and raw query strings are forwarded untouched.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::client::ClientError;

/// A scalar query parameter value.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum QueryValue {
    /// An absent value (`null` or unset).
    #[from(skip)]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(serde_json::Number),
    /// A string.
    String(String),
}

impl QueryValue {
    /// Truthiness as understood by JavaScript.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::String(value) => !value.is_empty(),
        }
    }

    fn to_query_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_string(),
            Self::Number(number) => number.to_string(),
            Self::String(value) => value.clone(),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// `NaN` is falsy and maps to [`QueryValue::Null`], infinities are sent as
/// `Infinity` and `-Infinity`.
impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            return Self::Null;
        }
        match serde_json::Number::from_f64(value) {
            Some(number) => Self::Number(number),
            None if value.is_sign_negative() => Self::String("-Infinity".to_string()),
            None => Self::String("Infinity".to_string()),
        }
    }
}

impl<T> From<Option<T>> for QueryValue
where
    T: Into<Self>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

macro_rules! query_value_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Number(value.into())
                }
            }
        )*
    };
}

query_value_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl TryFrom<Value> for QueryValue {
    type Error = ClientError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(value) => Ok(Self::Bool(value)),
            Value::Number(number) => Ok(Self::Number(number)),
            Value::String(value) => Ok(Self::String(value)),
            Value::Array(_) | Value::Object(_) => {
                Err(ClientError::UnsupportedQueryParameterValue { value })
            }
        }
    }
}

/// Search parameters appended to the request URL.
///
/// # Examples
///
/// ```rust
/// use typed_endpoints::{QueryValue, SearchParams};
///
/// let params = SearchParams::from_iter([
///     ("q", QueryValue::from("rust")),
///     ("page", QueryValue::from(None::<u32>)),
/// ]);
///
/// let sanitized = params.sanitize();
/// assert_eq!(sanitized.to_query_string().unwrap(), "q=rust");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SearchParams {
    /// A plain key/value bag, sanitized before dispatch.
    Map(IndexMap<String, QueryValue>),
    /// Pre-built name/value pairs, forwarded as-is.
    Pairs(Vec<(String, String)>),
    /// A raw query string, forwarded as-is.
    Raw(String),
}

impl SearchParams {
    /// Builds a [`SearchParams::Map`] from any value serializing to a JSON object.
    ///
    /// A unit value gives an empty map. Array and object fields are rejected.
    pub fn from_serialize<T>(value: &T) -> Result<Self, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let fields = match serde_json::to_value(value)? {
            Value::Null => return Ok(Self::Map(IndexMap::new())),
            Value::Object(fields) => fields,
            other => return Err(ClientError::UnsupportedQueryParameterValue { value: other }),
        };

        let map = fields
            .into_iter()
            .map(|(name, value)| QueryValue::try_from(value).map(|value| (name, value)))
            .collect::<Result<_, _>>()?;
        Ok(Self::Map(map))
    }

    /// Whether this is a plain key/value bag.
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }

    /// Drops the falsy entries of a [`SearchParams::Map`].
    ///
    /// Remaining entries keep their value and their order. Other variants are
    /// returned unchanged.
    #[must_use]
    pub fn sanitize(self) -> Self {
        let map = match self {
            Self::Map(map) => map,
            other => return other,
        };

        let (kept, dropped): (IndexMap<_, _>, IndexMap<_, _>) =
            map.into_iter().partition(|(_, value)| value.is_truthy());
        if !dropped.is_empty() {
            trace!(dropped = ?dropped.keys().collect::<Vec<_>>(), "drop falsy search params");
        }
        Self::Map(kept)
    }

    /// Serializes to a URL-encoded query string, without the leading `?`.
    pub fn to_query_string(&self) -> Result<String, ClientError> {
        match self {
            Self::Map(map) => {
                let pairs: Vec<_> = map
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.to_query_string()))
                    .collect();
                serde_urlencoded::to_string(pairs).map_err(ClientError::from)
            }
            Self::Pairs(pairs) => serde_urlencoded::to_string(pairs).map_err(ClientError::from),
            Self::Raw(raw) => Ok(raw.strip_prefix('?').unwrap_or(raw).to_string()),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for SearchParams
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self::Map(map)
    }
}

impl From<IndexMap<String, QueryValue>> for SearchParams {
    fn from(value: IndexMap<String, QueryValue>) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<(String, String)>> for SearchParams {
    fn from(value: Vec<(String, String)>) -> Self {
        Self::Pairs(value)
    }
}

impl From<String> for SearchParams {
    fn from(value: String) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for SearchParams {
    fn from(value: &str) -> Self {
        Self::Raw(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde::Serialize;

    use super::*;

    fn falsy_bag() -> SearchParams {
        SearchParams::from_iter([
            ("a", QueryValue::from("x")),
            ("b", QueryValue::Null),
            ("c", QueryValue::from(None::<String>)),
            ("d", QueryValue::from(0)),
            ("e", QueryValue::from(false)),
            ("f", QueryValue::from("")),
        ])
    }

    #[test]
    fn should_drop_falsy_entries_from_map() {
        let sanitized = falsy_bag().sanitize();

        let SearchParams::Map(map) = sanitized else {
            panic!("sanitizing a map keeps a map");
        };
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&QueryValue::from("x")));
    }

    #[rstest]
    #[case::nan(QueryValue::from(f64::NAN), None)]
    #[case::infinity(QueryValue::from(f64::INFINITY), Some("v=Infinity"))]
    #[case::negative_infinity(QueryValue::from(f64::NEG_INFINITY), Some("v=-Infinity"))]
    fn should_follow_javascript_for_non_finite_floats(
        #[case] value: QueryValue,
        #[case] expected: Option<&str>,
    ) {
        let sanitized = SearchParams::from_iter([("v", value)]).sanitize();

        let query = sanitized.to_query_string().expect("scalars serialize");
        assert_eq!(query, expected.unwrap_or_default());
    }

    #[test]
    fn should_keep_truthy_entries_and_their_types() {
        let params = SearchParams::from_iter([
            ("limit", QueryValue::from(20)),
            ("active", QueryValue::from(true)),
            ("ratio", QueryValue::from(0.5)),
            ("q", QueryValue::from("dogs")),
        ]);

        let sanitized = params.clone().sanitize();

        assert_eq!(sanitized, params);
    }

    #[test]
    fn should_pass_raw_string_through() {
        let raw = SearchParams::from("?b=&a=null");

        let sanitized = raw.clone().sanitize();

        assert_eq!(sanitized, raw);
    }

    #[test]
    fn should_pass_pairs_through() {
        let pairs = SearchParams::from(vec![
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), String::new()),
        ]);

        let sanitized = pairs.clone().sanitize();

        assert_eq!(sanitized, pairs);
    }

    #[test]
    fn should_serialize_sanitized_map() {
        let query = falsy_bag()
            .sanitize()
            .to_query_string()
            .expect("valid query");

        insta::assert_snapshot!(query, @"a=x");
    }

    #[test]
    fn should_serialize_unsanitized_map() {
        let query = falsy_bag().to_query_string().expect("valid query");

        insta::assert_snapshot!(query, @"a=x&b=&c=&d=0&e=false&f=");
    }

    #[test]
    fn should_serialize_pairs_with_encoding() {
        let pairs = SearchParams::from(vec![
            ("q".to_string(), "hello world".to_string()),
            ("tag".to_string(), "a&b".to_string()),
        ]);

        let query = pairs.to_query_string().expect("valid query");

        insta::assert_snapshot!(query, @"q=hello+world&tag=a%26b");
    }

    #[test]
    fn should_strip_question_mark_from_raw() {
        let raw = SearchParams::from("?limit=20");

        assert_eq!(raw.to_query_string().expect("raw"), "limit=20");
    }

    #[derive(Serialize)]
    struct DogsQuery {
        limit: u32,
        breed: Option<&'static str>,
    }

    #[test]
    fn should_build_map_from_struct() {
        let params = SearchParams::from_serialize(&DogsQuery {
            limit: 20,
            breed: None,
        })
        .expect("valid query");

        assert!(params.is_map());
        let query = params.sanitize().to_query_string().expect("valid query");
        assert_eq!(query, "limit=20");
    }

    #[test]
    fn should_reject_array_values() {
        #[derive(Serialize)]
        struct Tags {
            tags: Vec<&'static str>,
        }

        let result = SearchParams::from_serialize(&Tags {
            tags: vec!["a", "b"],
        });

        assert!(matches!(
            result,
            Err(ClientError::UnsupportedQueryParameterValue { .. })
        ));
    }

    #[test]
    fn should_build_empty_map_from_unit() {
        let params = SearchParams::from_serialize(&()).expect("unit");

        assert_eq!(params, SearchParams::Map(IndexMap::new()));
    }
}
