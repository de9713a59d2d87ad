use std::sync::LazyLock;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::Value;

use crate::client::ClientError;

/// Regular expression for matching path placeholders in the format `:param_name`.
static RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(?<name>[A-Za-z0-9_]+)").expect("a valid regex"));

/// Characters escaped by [`ParamEncoding::Segment`].
///
/// `:` is escaped as well, so a rendered value never reads as a placeholder.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// How a substituted value is written into the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamEncoding {
    /// The string form of the value, unchanged.
    ///
    /// A value containing `/` spans several segments.
    #[default]
    Raw,
    /// Percent-encoded so the value stays inside one path segment.
    ///
    /// `/`, `?`, `#`, `%`, `:`, space and controls are escaped. Numbers and
    /// plain identifiers are unchanged.
    Segment,
}

impl ParamEncoding {
    fn apply(self, value: &PathParam) -> String {
        let value = value.to_string();
        match self {
            Self::Raw => value,
            Self::Segment => utf8_percent_encode(&value, SEGMENT).to_string(),
        }
    }
}

/// A primitive value substituted into a path placeholder.
///
/// Numbers are rendered with their standard decimal representation.
/// Infinite floats become the strings `"Infinity"` and `"-Infinity"`.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::From)]
pub enum PathParam {
    /// A string value.
    String(String),
    /// A numeric value.
    Number(serde_json::Number),
    /// A float that is not a number, rendered as `NaN`.
    #[from(skip)]
    #[display("NaN")]
    NotANumber,
}

impl PathParam {
    /// Truthiness as understood by JavaScript: `""`, `0` and `NaN` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::String(value) => !value.is_empty(),
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::NotANumber => false,
        }
    }
}

impl From<&str> for PathParam {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<f64> for PathParam {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            return Self::NotANumber;
        }
        match serde_json::Number::from_f64(value) {
            Some(number) => Self::Number(number),
            None if value.is_sign_negative() => Self::String("-Infinity".to_string()),
            None => Self::String("Infinity".to_string()),
        }
    }
}

macro_rules! path_param_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for PathParam {
                fn from(value: $ty) -> Self {
                    Self::Number(value.into())
                }
            }
        )*
    };
}

path_param_from_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Values for the placeholders of an endpoint path, indexed by name.
///
/// # Examples
///
/// ```rust
/// use typed_endpoints::{PathParams, substitute};
///
/// let params = PathParams::new()
///     .with("userid", 12)
///     .with("commentid", 42);
///
/// assert_eq!(
///     substitute("/user/:userid/comment/:commentid", &params),
///     "/user/12/comment/42"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathParams {
    params: IndexMap<String, PathParam>,
}

impl PathParams {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, replacing any previous value with the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PathParam>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Inserts a parameter and returns the value it replaced, if any.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PathParam>,
    ) -> Option<PathParam> {
        self.params.insert(name.into(), value.into())
    }

    /// Looks up a parameter by name.
    pub fn get(&self, name: &str) -> Option<&PathParam> {
        self.params.get(name)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether no parameter was supplied.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathParam)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Builds the mapping from any value serializing to a JSON object.
    ///
    /// `null` fields are skipped, so `Option::None` means "not supplied". A unit
    /// value produces an empty mapping. Fields must be strings or numbers.
    pub fn from_serialize<T>(value: &T) -> Result<Self, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let fields = match serde_json::to_value(value)? {
            Value::Null => return Ok(Self::default()),
            Value::Object(fields) => fields,
            other => {
                return Err(ClientError::UnsupportedParameterValue {
                    message: "path parameters must serialize to an object".to_string(),
                    value: other,
                });
            }
        };

        let mut params = Self::default();
        for (name, value) in fields {
            match value {
                Value::Null => {}
                Value::String(value) => {
                    params.insert(name, PathParam::String(value));
                }
                Value::Number(value) => {
                    params.insert(name, PathParam::Number(value));
                }
                other => {
                    return Err(ClientError::UnsupportedParameterValue {
                        message: format!("path parameter '{name}' must be a string or a number"),
                        value: other,
                    });
                }
            }
        }
        Ok(params)
    }
}

impl<K, V> FromIterator<(K, V)> for PathParams
where
    K: Into<String>,
    V: Into<PathParam>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let params = iter
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        Self { params }
    }
}

/// How a placeholder decides that its parameter was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamLookup {
    /// The parameter name is present in the mapping, whatever its value.
    #[default]
    Present,
    /// The parameter is present and truthy.
    ///
    /// Legacy behavior: `0` and `""` leave the `:name` token in the path.
    Truthy,
}

impl ParamLookup {
    fn resolve<'p>(self, params: &'p PathParams, name: &str) -> Option<&'p PathParam> {
        let value = params.get(name)?;
        match self {
            Self::Present => Some(value),
            Self::Truthy => value.is_truthy().then_some(value),
        }
    }
}

/// An endpoint path with `:name` placeholders.
///
/// Each `:name` token (a colon followed by ASCII word characters) is matched
/// independently, so `:id` never captures part of `:idofcomment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("{template}")]
pub struct PathTemplate<'a> {
    template: &'a str,
    encoding: ParamEncoding,
}

impl<'a> PathTemplate<'a> {
    /// Wraps a template string, substituting values with [`ParamEncoding::Raw`].
    pub fn new(template: &'a str) -> Self {
        Self {
            template,
            encoding: ParamEncoding::Raw,
        }
    }

    /// Sets how substituted values are written.
    #[must_use]
    pub fn with_encoding(mut self, encoding: ParamEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The raw template.
    pub fn as_str(&self) -> &'a str {
        self.template
    }

    /// Names of the placeholders, in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = &'a str> + 'a {
        RE.captures_iter(self.template)
            .filter_map(|caps| caps.name("name"))
            .map(|name| name.as_str())
    }

    /// Substitutes every resolvable placeholder.
    ///
    /// Unresolved placeholders are kept verbatim and reported in
    /// [`RenderedPath::unresolved`]. Unused parameters are ignored.
    pub fn render(&self, params: &PathParams, lookup: ParamLookup) -> RenderedPath {
        let mut unresolved = Vec::new();
        let path = RE.replace_all(self.template, |caps: &Captures<'_>| {
            let token = caps.get(0).map_or("", |token| token.as_str());
            let name = caps.name("name").map_or("", |name| name.as_str());
            if let Some(value) = lookup.resolve(params, name) {
                self.encoding.apply(value)
            } else {
                if !unresolved.iter().any(|missing| missing == name) {
                    unresolved.push(name.to_string());
                }
                token.to_string()
            }
        });

        RenderedPath {
            path: path.into_owned(),
            unresolved,
        }
    }
}

impl<'a> From<&'a str> for PathTemplate<'a> {
    fn from(template: &'a str) -> Self {
        Self::new(template)
    }
}

/// Result of [`PathTemplate::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPath {
    path: String,
    unresolved: Vec<String>,
}

impl RenderedPath {
    /// The rendered path, possibly still containing placeholders.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Names of the placeholders left in the path.
    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// Whether every placeholder was substituted.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The rendered path, unresolved placeholders included.
    pub fn into_path(self) -> String {
        self.path
    }

    /// The rendered path, or [`ClientError::PathUnresolved`] if a placeholder is left.
    pub fn into_strict(self) -> Result<String, ClientError> {
        let Self { path, unresolved } = self;
        if unresolved.is_empty() {
            Ok(path)
        } else {
            Err(ClientError::PathUnresolved {
                path,
                missings: unresolved,
            })
        }
    }
}

/// Replaces each `:name` placeholder of `template` with the matching parameter.
///
/// A placeholder is substituted with the string form of its parameter as soon as
/// its name is present in `params`. Missing placeholders are left untouched and
/// never raise an error.
///
/// ```rust
/// use typed_endpoints::{PathParams, substitute};
///
/// let params = PathParams::new().with("id", 12).with("idofcomment", 42);
/// assert_eq!(
///     substitute("/user/:id/comment/:idofcomment", &params),
///     "/user/12/comment/42"
/// );
/// ```
pub fn substitute(template: &str, params: &PathParams) -> String {
    substitute_with(template, params, ParamLookup::Present)
}

/// Same as [`substitute`] with an explicit [`ParamLookup`].
pub fn substitute_with(template: &str, params: &PathParams, lookup: ParamLookup) -> String {
    PathTemplate::new(template).render(params, lookup).into_path()
}
