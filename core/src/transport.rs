//! Blocking transport: executes an `HttpRequest` and hands back an
//! [`Exchange`] for the classifier.
//!
//! # Design
//! `UreqTransport` builds a fresh agent for every call, so no connection is
//! shared between calls and the descriptor's timeouts apply to that call
//! alone. Status codes are never turned into errors here; 4xx/5xx responses
//! flow to [`read_response`] like any other.

use crate::error::CallError;
use crate::http::{HttpRequest, ResponseEnvelope};
use crate::response::{read_response, Exchange};

/// Executes a request and returns the completed exchange.
pub trait Transport {
    type Exchange: Exchange;

    fn execute(&self, request: &HttpRequest) -> Result<Self::Exchange, CallError>;
}

/// Execute `request` and classify the response.
pub fn send<T: Transport>(transport: &T, request: &HttpRequest) -> Result<ResponseEnvelope, CallError> {
    read_response(transport.execute(request)?)
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::{UreqExchange, UreqTransport};

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::io::{self, Cursor, Read};

    use ureq::http::Response;
    use ureq::{Agent, Body, RequestBuilder};

    use crate::error::CallError;
    use crate::http::{Headers, HttpMethod, HttpRequest};
    use crate::response::{Channel, Exchange};

    use super::Transport;

    /// Transport backed by a per-call `ureq::Agent`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UreqTransport;

    impl UreqTransport {
        pub fn new() -> Self {
            Self
        }
    }

    impl Transport for UreqTransport {
        type Exchange = UreqExchange;

        fn execute(&self, request: &HttpRequest) -> Result<UreqExchange, CallError> {
            let agent: Agent = Agent::config_builder()
                .http_status_as_error(false)
                .timeout_connect(request.connect_timeout)
                .timeout_recv_response(request.read_timeout)
                .timeout_recv_body(request.read_timeout)
                .build()
                .new_agent();

            let url = request.url.as_str();
            log::debug!("{} {url}", request.method);

            let result = match (request.method, request.body.as_deref()) {
                (HttpMethod::Get, None) => apply_headers(agent.get(url), &request.headers).call(),
                (HttpMethod::Delete, None) => {
                    apply_headers(agent.delete(url), &request.headers).call()
                }
                (HttpMethod::Get, Some(body)) => apply_headers(agent.get(url), &request.headers)
                    .force_send_body()
                    .send(body),
                (HttpMethod::Delete, Some(body)) => {
                    apply_headers(agent.delete(url), &request.headers)
                        .force_send_body()
                        .send(body)
                }
                (HttpMethod::Post, Some(body)) => {
                    apply_headers(agent.post(url), &request.headers).send(body)
                }
                (HttpMethod::Post, None) => {
                    apply_headers(agent.post(url), &request.headers).send_empty()
                }
                (HttpMethod::Put, Some(body)) => {
                    apply_headers(agent.put(url), &request.headers).send(body)
                }
                (HttpMethod::Put, None) => apply_headers(agent.put(url), &request.headers).send_empty(),
            };

            let response = result.map_err(map_error)?;
            log::debug!("{} {url} -> {}", request.method, response.status().as_u16());
            Ok(UreqExchange { response })
        }
    }

    /// Content-Length is left to ureq, which derives it from the body.
    fn apply_headers<B>(mut builder: RequestBuilder<B>, headers: &Headers) -> RequestBuilder<B> {
        for (name, value) in headers.iter() {
            if name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            builder = builder.header(name, value);
        }
        builder
    }

    fn map_error(err: ureq::Error) -> CallError {
        match err {
            ureq::Error::Timeout(_) => CallError::Timeout(Box::new(err)),
            ureq::Error::Io(ref e) if e.kind() == io::ErrorKind::TimedOut => {
                CallError::Timeout(Box::new(err))
            }
            other => CallError::Network(Box::new(other)),
        }
    }

    /// ureq reports body-phase failures as an `io::Error` wrapping the
    /// `ureq::Error`; unwrap it so they map like request-phase failures.
    fn map_read_error(err: io::Error) -> CallError {
        if !err.get_ref().is_some_and(|inner| inner.is::<ureq::Error>()) {
            return match err.kind() {
                io::ErrorKind::TimedOut => CallError::Timeout(Box::new(err)),
                _ => CallError::Io(err),
            };
        }
        match err.into_inner().map(|inner| inner.downcast::<ureq::Error>()) {
            Some(Ok(inner)) => map_error(*inner),
            Some(Err(other)) => CallError::Network(other),
            None => CallError::Network("response body read failed".into()),
        }
    }

    /// A live ureq response. Opening a channel drains the body and releases
    /// the connection before the classifier sees any bytes.
    pub struct UreqExchange {
        response: Response<Body>,
    }

    impl Exchange for UreqExchange {
        type Body = Cursor<Vec<u8>>;

        fn status(&self) -> u16 {
            self.response.status().as_u16()
        }

        fn headers(&self) -> Vec<(String, Vec<String>)> {
            let mut out: Vec<(String, Vec<String>)> = Vec::new();
            for (name, value) in self.response.headers() {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                match out.iter_mut().find(|(n, _)| n == name.as_str()) {
                    Some((_, values)) => values.push(value),
                    None => out.push((name.as_str().to_string(), vec![value])),
                }
            }
            out
        }

        // ureq exposes a single stream; the status code alone picks the channel.
        fn open(self, _channel: Channel) -> Result<Self::Body, CallError> {
            let mut bytes = Vec::new();
            self.response
                .into_body()
                .into_reader()
                .read_to_end(&mut bytes)
                .map_err(map_read_error)?;
            Ok(Cursor::new(bytes))
        }
    }
}
