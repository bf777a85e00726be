use crate::model::Endpoint;
use serde::Serialize;
use std::fmt;

/// Timestamped event attached to a span, e.g. "server received request".
#[derive(TypedBuilder, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Microseconds since the Unix epoch at which the event occurred.
    pub timestamp: u64,
    /// What happened, usually one of the values in
    /// [`conventions`](crate::conventions).
    #[builder(setter(into))]
    pub value: String,
    /// Elapsed microseconds, for events covering an interval.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Host that recorded the event.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
}

/// Key/value tag attached to a span, e.g. the reported thread duration.
#[derive(TypedBuilder, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryAnnotation {
    /// Tag key.
    #[builder(setter(into))]
    pub key: String,
    /// Tag value.
    #[builder(setter(into))]
    pub value: AnnotationValue,
    /// Host that recorded the tag.
    #[builder(setter(strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
}

/// Value of a [`BinaryAnnotation`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    /// String tag value.
    Str(String),
    /// Integer tag value.
    I64(i64),
}

impl From<&str> for AnnotationValue {
    fn from(value: &str) -> Self {
        AnnotationValue::Str(value.to_owned())
    }
}

impl From<String> for AnnotationValue {
    fn from(value: String) -> Self {
        AnnotationValue::Str(value)
    }
}

impl From<i64> for AnnotationValue {
    fn from(value: i64) -> Self {
        AnnotationValue::I64(value)
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Str(value) => f.write_str(value),
            AnnotationValue::I64(value) => write!(f, "{value}"),
        }
    }
}
