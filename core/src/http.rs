//! HTTP descriptor types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! builder and encoder shape an `HttpRequest`, a transport executes it, and
//! the classifier turns the exchange into a `ResponseEnvelope`. All fields
//! use owned types so descriptors can be handed between threads or stored
//! without lifetime concerns.

use std::fmt;
use std::time::Duration;

use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request headers keyed case-insensitively.
///
/// Setting a header replaces any existing value with the same name, keeping
/// the position of the first occurrence. The name is stored as last given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
            Some(entry) => *entry = (name, value),
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An HTTP request described as plain data.
///
/// Produced by [`crate::builder::build`] or a [`crate::CallFactory`], then
/// refined with the `with_*` methods and [`HttpRequest::encode`]. The query
/// string lives in `url`; [`HttpRequest::query_params`] reads it back.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
}

impl HttpRequest {
    /// Decoded query parameters in the order they appear in the URL.
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

/// A classified HTTP response.
///
/// `body` was decoded from exactly one channel: the error channel when
/// `status > 299`, the success channel otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: Vec<(String, Vec<String>)>,
    pub body: serde_json::Value,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        self.status <= 299
    }

    /// First value of the named response header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }
}

/// Renders the status line followed by one `Name: v1, v2` line per header.
impl fmt::Display for ResponseEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = ::http::StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("");
        writeln!(f, "{} {}", self.status, reason)?;
        for (name, values) in &self.headers {
            writeln!(f, "{name}: {}", values.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive_and_last_write_wins() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");
        headers.set("X-Trace", "1");
        headers.set("content-type", "application/json");

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        let names: Vec<&str> = headers.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["content-type", "X-Trace"]);
    }

    #[test]
    fn envelope_header_lookup() {
        let envelope = ResponseEnvelope {
            status: 200,
            headers: vec![(
                "Content-Type".to_string(),
                vec!["application/json".to_string()],
            )],
            body: serde_json::json!({}),
        };
        assert_eq!(envelope.content_type(), Some("application/json"));
        assert!(envelope.header("location").is_none());
        assert!(envelope.is_success());
    }

    #[test]
    fn envelope_display_lists_status_and_headers() {
        let envelope = ResponseEnvelope {
            status: 404,
            headers: vec![
                ("Content-Type".to_string(), vec!["application/json".to_string()]),
                ("Vary".to_string(), vec!["Accept".to_string(), "Origin".to_string()]),
            ],
            body: serde_json::json!({"error": "not found"}),
        };
        assert_eq!(
            envelope.to_string(),
            "404 Not Found\nContent-Type: application/json\nVary: Accept, Origin\n"
        );
        assert!(!envelope.is_success());
    }
}
