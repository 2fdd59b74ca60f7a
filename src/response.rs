//! The serialized form of an execution result.

use crate::node::SourceSpan;
use crate::Name;
use serde::Deserialize;
use serde::Serialize;

/// A JSON value at the transport boundary: raw variables in, response data out.
pub type JsonValue = serde_json_bytes::Value;

/// A JSON object at the transport boundary, preserving key order.
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, serde_json_bytes::Value>;

/// A GraphQL response: `data` and/or `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Response {
    // Serialized first so that a scanning client sees failures early
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub errors: Vec<GraphQLError>,

    #[serde(skip_serializing_if = "ResponseData::is_absent")]
    #[serde(default = "ResponseData::absent")]
    pub data: ResponseData,
}

/// The `data` entry of a [`Response`]
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Option<JsonMap>")]
pub enum ResponseData {
    /// Execution produced an object.
    /// [`Response::data`] is serialized as a JSON object.
    Object(JsonMap),

    /// Execution encountered a field error on a non-null field,
    /// and null propagated all the way to the root of the response.
    /// [`Response::data`] is serialized as JSON null.
    Null,

    /// A request error was encountered before execution could produce any
    /// partial tree. [`Response::data`] is skipped from serialization.
    Absent,
}

/// A request error that aborted the handling of a request before execution
/// started: a parse failure, a validation failure, a bad operation
/// selection, or a variable that could not be coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub(crate) message: String,
    pub(crate) location: Option<SourceSpan>,
}

/// A serializable error, as found in a GraphQL response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLError {
    /// The error message.
    pub message: String,

    /// Locations in the source document relevant to the error, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<GraphQLLocation>,

    /// If non-empty, the error is a field error for the particular field
    /// found at this path in [`Response::data`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub path: Vec<PathSegment>,
}

/// A source location for a [`GraphQLError`].
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLLocation {
    /// The line number for this location, starting at 1 for the first line.
    pub line: usize,
    /// The column number for this location, starting at 1.
    ///
    /// Node spans track line numbers only, so locations derived from a span
    /// report column 1; a parser rejection
    /// ([`ParseError`][crate::request::ParseError]) may carry an exact column.
    pub column: usize,
}

/// An element of [`GraphQLError::path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// The relevant key in an object value
    Field(Name),

    /// The index of the relevant item in a list value
    ListIndex(usize),
}

impl Serialize for Name {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Name::new(&value).map_err(serde::de::Error::custom)
    }
}

impl GraphQLLocation {
    /// Convert a node span to an error location.
    pub fn from_span(span: SourceSpan) -> Self {
        Self {
            line: span.start_line as usize,
            column: 1,
        }
    }
}

impl GraphQLError {
    pub fn new(message: impl ToString, location: Option<SourceSpan>) -> Self {
        Self {
            message: message.to_string(),
            locations: location
                .map(GraphQLLocation::from_span)
                .into_iter()
                .collect(),
            path: Vec::new(),
        }
    }
}

impl ResponseData {
    /// For serde `skip_serializing_if`
    fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// For serde `default`
    fn absent() -> Self {
        Self::Absent
    }
}

impl Serialize for ResponseData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ResponseData::Absent => Err(serde::ser::Error::custom(
                "ResponseData::Absent should have been skipped from serialization",
            )),
            ResponseData::Null => serializer.serialize_unit(),
            ResponseData::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<Option<JsonMap>> for ResponseData {
    fn from(value: Option<JsonMap>) -> Self {
        if let Some(data) = value {
            Self::Object(data)
        } else {
            Self::Null
        }
    }
}

impl RequestError {
    pub fn new(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            location: None,
        }
    }

    pub(crate) fn with_location(mut self, location: Option<SourceSpan>) -> Self {
        self.location = location;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<SourceSpan> {
        self.location
    }

    pub fn to_graphql_error(&self) -> GraphQLError {
        GraphQLError::new(&self.message, self.location)
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for Response {
    fn from(error: RequestError) -> Self {
        Self {
            errors: vec![error.to_graphql_error()],
            data: ResponseData::Absent,
        }
    }
}

impl From<Result<Response, RequestError>> for Response {
    fn from(result: Result<Response, RequestError>) -> Self {
        result.unwrap_or_else(|request_error| request_error.into())
    }
}
