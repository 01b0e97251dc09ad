use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HTTP method of a request descriptor.
///
/// Names are matched case-insensitively. Anything outside the four supported
/// verbs is kept verbatim and only rejected when the request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Unsupported(String),
}

impl RequestMethod {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Unsupported(name) => name.as_str(),
        }
    }

    /// Whether the method carries a JSON body.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        matches!(self, RequestMethod::Post | RequestMethod::Put)
    }
}

impl From<&str> for RequestMethod {
    fn from(value: &str) -> Self {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "GET" => RequestMethod::Get,
            "POST" => RequestMethod::Post,
            "PUT" => RequestMethod::Put,
            "DELETE" => RequestMethod::Delete,
            _ => RequestMethod::Unsupported(normalized),
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(RequestMethod::from(value.as_str()))
    }
}

impl Serialize for RequestMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One entry of the request list, replayed by every worker.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RequestSpec {
    #[serde(rename = "url")]
    pub path: String,
    #[serde(default)]
    pub method: RequestMethod,
    #[serde(default)]
    /// Keeps the order given in the request list.
    pub query: Option<Map<String, Value>>,
    #[serde(default)]
    pub body: Option<Value>,
}

impl RequestSpec {
    /// Query parameters as string pairs, in request-list order.
    ///
    /// Strings are sent as-is, other scalars in their JSON form. Nulls are
    /// dropped and arrays repeat the key once per element.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let Some(query) = self.query.as_ref() else {
            return pairs;
        };
        for (key, value) in query {
            let items = match value {
                Value::Array(items) => items.as_slice(),
                Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Object(_) => {
                    std::slice::from_ref(value)
                }
            };
            for item in items {
                if let Some(rendered) = render_query_value(item) {
                    pairs.push((key.clone(), rendered));
                }
            }
        }
        pairs
    }
}

fn render_query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}

/// TOML request lists wrap the entries in a `[[requests]]` array.
#[derive(Debug, Deserialize)]
pub(crate) struct TomlRequestFile {
    #[serde(default)]
    pub(crate) requests: Vec<RequestSpec>,
}
