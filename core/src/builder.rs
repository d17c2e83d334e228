//! Request builder: URL parsing, query parameters, headers and timeouts.
//!
//! # Design
//! `build` is the only fallible step; every `with_*` method consumes the
//! descriptor and returns it, so a chain either yields a complete
//! `HttpRequest` or an error, never a half-built value.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use url::Url;

use crate::error::CallError;
use crate::http::{Headers, HttpMethod, HttpRequest};

/// Which timeout [`HttpRequest::with_timeout`] sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutKind {
    Connect,
    Read,
}

/// Parse `base_url` and start a descriptor for `method`.
pub fn build(base_url: &str, method: HttpMethod) -> Result<HttpRequest, CallError> {
    let url = Url::parse(base_url).map_err(|e| CallError::MalformedUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CallError::MalformedUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme `{}`", url.scheme()),
        });
    }
    Ok(HttpRequest {
        method,
        url,
        headers: Headers::new(),
        body: None,
        connect_timeout: None,
        read_timeout: None,
    })
}

impl HttpRequest {
    /// Append `params` to the query string in iteration order.
    ///
    /// Pass an ordered collection (slice, `Vec`, `BTreeMap`) when the query
    /// string must be deterministic. Keys and values are form-urlencoded,
    /// so pass them raw: an already-encoded value such as `a%20b` is encoded
    /// again and arrives as `a%2520b`.
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut params = params.into_iter().peekable();
        if params.peek().is_none() {
            return self;
        }
        self.url.query_pairs_mut().extend_pairs(params);
        self
    }

    pub fn with_timeout(mut self, value: Duration, kind: TimeoutKind) -> Self {
        match kind {
            TimeoutKind::Connect => self.connect_timeout = Some(value),
            TimeoutKind::Read => self.read_timeout = Some(value),
        }
        self
    }

    /// Set `Authorization: Basic base64(username:password)`.
    ///
    /// A `:` inside `username` makes the credentials ambiguous; that is a
    /// limitation of Basic auth itself and is not escaped here.
    pub fn with_authentication(self, username: &str, password: &str) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.with_header("Authorization", format!("Basic {encoded}"))
    }

    /// Set `Content-Type` verbatim. Supported values are checked by
    /// [`HttpRequest::encode`], not here.
    pub fn with_content_type(self, content_type: &str) -> Self {
        self.with_header("Content-Type", content_type)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> HttpRequest {
        build(url, HttpMethod::Get).unwrap()
    }

    #[test]
    fn build_parses_url_and_sets_method() {
        let req = build("http://localhost:3000/items", HttpMethod::Post).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url.as_str(), "http://localhost:3000/items");
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
        assert!(req.connect_timeout.is_none());
        assert!(req.read_timeout.is_none());
    }

    #[test]
    fn build_rejects_unparseable_url() {
        let err = build("not a url", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, CallError::MalformedUrl { ref url, .. } if url == "not a url"));
    }

    #[test]
    fn build_rejects_non_http_scheme() {
        let err = build("ftp://example.com/file", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, CallError::MalformedUrl { .. }));
    }

    #[test]
    fn params_keep_insertion_order() {
        let req = get("http://localhost:3000/search").with_params([
            ("zeta", "1"),
            ("alpha", "2"),
            ("mid", "3"),
        ]);
        assert_eq!(req.url.as_str(), "http://localhost:3000/search?zeta=1&alpha=2&mid=3");
        assert_eq!(req.url.query(), Some("zeta=1&alpha=2&mid=3"));
        assert_eq!(
            req.query_params(),
            vec![
                ("zeta".to_string(), "1".to_string()),
                ("alpha".to_string(), "2".to_string()),
                ("mid".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn params_have_no_trailing_separator() {
        let req = get("http://localhost:3000/").with_params(vec![("a", "b")]);
        let query = req.url.query().unwrap();
        assert_eq!(query, "a=b");
        assert!(!query.ends_with('&'));
    }

    #[test]
    fn params_are_encoded() {
        let req = get("http://localhost:3000/").with_params([("q", "a&b=c d")]);
        assert_eq!(req.url.query(), Some("q=a%26b%3Dc+d"));
        assert_eq!(req.query_params(), vec![("q".to_string(), "a&b=c d".to_string())]);
    }

    #[test]
    fn pre_encoded_params_are_encoded_again() {
        let req = get("http://localhost:3000/").with_params([("q", "a%20b")]);
        assert_eq!(req.url.query(), Some("q=a%2520b"));
        assert_eq!(req.query_params(), vec![("q".to_string(), "a%20b".to_string())]);
    }

    #[test]
    fn params_extend_existing_query() {
        let req = get("http://localhost:3000/?page=1").with_params([("size", "10")]);
        assert_eq!(req.url.query(), Some("page=1&size=10"));
    }

    #[test]
    fn empty_params_leave_url_unchanged() {
        let empty: [(&str, &str); 0] = [];
        let req = get("http://localhost:3000/items").with_params(empty);
        assert_eq!(req.url.as_str(), "http://localhost:3000/items");
        assert!(req.url.query().is_none());
    }

    #[test]
    fn timeouts_are_set_by_kind() {
        let req = get("http://localhost:3000/")
            .with_timeout(Duration::from_millis(250), TimeoutKind::Connect)
            .with_timeout(Duration::from_secs(5), TimeoutKind::Read);
        assert_eq!(req.connect_timeout, Some(Duration::from_millis(250)));
        assert_eq!(req.read_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn authentication_sets_basic_header() {
        let req = get("http://localhost:3000/").with_authentication("alice", "secret");
        assert_eq!(req.headers.get("Authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
    }

    #[test]
    fn authentication_does_not_escape_colons() {
        let req = get("http://localhost:3000/").with_authentication("a:b", "c");
        // base64("a:b:c")
        assert_eq!(req.headers.get("authorization"), Some("Basic YTpiOmM="));
    }

    #[test]
    fn content_type_last_write_wins() {
        let req = get("http://localhost:3000/")
            .with_content_type("text/plain")
            .with_content_type("application/json");
        assert_eq!(req.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn content_type_is_not_validated_when_set() {
        let req = get("http://localhost:3000/").with_content_type("application/xml");
        assert_eq!(req.headers.get("content-type"), Some("application/xml"));
    }
}
