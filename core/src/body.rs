//! Body encoder: turns a [`Payload`] into request bytes according to the
//! descriptor's `Content-Type`.
//!
//! # Design
//! The header stays free-form; only at encode time is it parsed into the
//! closed [`ContentType`] set, and each variant is matched exhaustively
//! against the payload shapes it accepts. Bytes are produced in full before
//! the descriptor is touched, so a failed encode leaves it unchanged.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CallError;
use crate::http::HttpRequest;

/// Media types the encoder can produce a body for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Json,
    FormUrlEncoded,
}

impl ContentType {
    /// Parse a `Content-Type` header value, ignoring parameters such as
    /// `charset`. Returns `None` for unsupported media types.
    pub fn from_header(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or("").trim();
        if essence.eq_ignore_ascii_case("application/json") {
            Some(ContentType::Json)
        } else if essence.eq_ignore_ascii_case("text/plain")
            || essence.eq_ignore_ascii_case("application/text")
        {
            Some(ContentType::Text)
        } else if essence.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
            Some(ContentType::FormUrlEncoded)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text/plain",
            ContentType::Json => "application/json",
            ContentType::FormUrlEncoded => "application/x-www-form-urlencoded",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request body before encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Text as-is. For JSON it must hold a JSON object.
    Text(String),
    Json(Value),
    /// Ordered key/value pairs.
    Form(Vec<(String, String)>),
    Bytes(Vec<u8>),
}

impl Payload {
    /// Map a serializable record onto a JSON value field by field.
    pub fn record<T: Serialize + ?Sized>(record: &T) -> Result<Self, CallError> {
        serde_json::to_value(record)
            .map(Payload::Json)
            .map_err(|e| CallError::NotSerializable(e.to_string()))
    }

    fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Json(_) => "JSON value",
            Payload::Form(_) => "form pairs",
            Payload::Bytes(_) => "raw bytes",
        }
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<Value> for Payload {
    fn from(v: Value) -> Self {
        Payload::Json(v)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(b: Vec<u8>) -> Self {
        Payload::Bytes(b)
    }
}

impl From<Vec<(String, String)>> for Payload {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Payload::Form(pairs)
    }
}

impl HttpRequest {
    /// Encode `payload` as the body and return the sealed descriptor.
    pub fn encode(mut self, payload: impl Into<Payload>) -> Result<Self, CallError> {
        self.encode_body(payload)?;
        Ok(self)
    }

    /// Encode `payload` in place. On error `body` and `Content-Length` are
    /// left exactly as they were.
    pub fn encode_body(&mut self, payload: impl Into<Payload>) -> Result<(), CallError> {
        if self.body.is_some() {
            return Err(CallError::BodyAlreadySet);
        }
        let header = self
            .headers
            .get("Content-Type")
            .ok_or(CallError::MissingContentType)?;
        let content_type = ContentType::from_header(header)
            .ok_or_else(|| CallError::ContentTypeNotSupported(header.to_string()))?;

        let payload = payload.into();
        let data = match content_type {
            ContentType::Json => encode_json(payload)?,
            ContentType::Text => encode_text(payload)?,
            ContentType::FormUrlEncoded => encode_form(payload)?,
        };

        log::trace!("encoded {} byte {content_type} body", data.len());
        self.headers.set("Content-Length", data.len().to_string());
        self.body = Some(data);
        Ok(())
    }
}

fn encode_json(payload: Payload) -> Result<Vec<u8>, CallError> {
    let object = match payload {
        Payload::Text(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(other) => return Err(not_an_object(&other)),
            Err(e) => return Err(CallError::InvalidJson(e.to_string())),
        },
        Payload::Json(Value::Object(map)) => map,
        Payload::Json(other) => return Err(not_an_object(&other)),
        Payload::Form(pairs) => pairs
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect::<Map<String, Value>>(),
        Payload::Bytes(_) => {
            return Err(CallError::InvalidJson(
                "raw bytes are not a JSON object".to_string(),
            ))
        }
    };
    serde_json::to_vec(&Value::Object(object)).map_err(|e| CallError::InvalidJson(e.to_string()))
}

fn not_an_object(value: &Value) -> CallError {
    CallError::InvalidJson(format!("expected a JSON object, got `{value}`"))
}

fn encode_text(payload: Payload) -> Result<Vec<u8>, CallError> {
    match payload {
        Payload::Text(text) | Payload::Json(Value::String(text)) => Ok(text.into_bytes()),
        other => Err(CallError::NotSerializable(format!(
            "{} cannot be sent as text/plain",
            other.kind()
        ))),
    }
}

fn encode_form(payload: Payload) -> Result<Vec<u8>, CallError> {
    match payload {
        Payload::Form(pairs) => Ok(form_bytes(pairs)),
        Payload::Json(Value::Object(map)) => {
            let pairs = map
                .into_iter()
                .map(|(k, v)| form_value(&k, v).map(|v| (k, v)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(form_bytes(pairs))
        }
        Payload::Json(other) => Err(CallError::NotSerializable(format!(
            "`{other}` is not a set of form fields"
        ))),
        Payload::Text(text) => Ok(text.into_bytes()),
        Payload::Bytes(bytes) => Ok(bytes),
    }
}

fn form_value(key: &str, value: Value) -> Result<String, CallError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(CallError::NotSerializable(format!(
            "form field `{key}` is nested"
        ))),
    }
}

fn form_bytes(pairs: Vec<(String, String)>) -> Vec<u8> {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
        .into_bytes()
}
