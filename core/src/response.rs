//! Response classifier: routes a completed exchange to its success or error
//! channel and decodes that channel as JSON.

use std::io::Read;

use crate::error::CallError;
use crate::http::ResponseEnvelope;

/// The two mutually exclusive response streams of an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Success,
    Error,
}

impl Channel {
    /// Statuses above 299 are read from the error channel.
    pub fn for_status(status: u16) -> Self {
        if status > 299 {
            Channel::Error
        } else {
            Channel::Success
        }
    }
}

/// One completed request/response interaction.
///
/// Opening a channel consumes the exchange; dropping the returned reader
/// releases the underlying connection.
pub trait Exchange {
    type Body: Read;

    fn status(&self) -> u16;

    fn headers(&self) -> Vec<(String, Vec<String>)>;

    fn open(self, channel: Channel) -> Result<Self::Body, CallError>;
}

/// An exchange whose response has already been read into memory.
///
/// Both channels yield the same bytes; which one is opened depends only on
/// the status code.
#[derive(Debug, Clone)]
pub struct RawExchange {
    pub status: u16,
    pub headers: Vec<(String, Vec<String>)>,
    pub body: Vec<u8>,
}

impl RawExchange {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }
}

impl Exchange for RawExchange {
    type Body = std::io::Cursor<Vec<u8>>;

    fn status(&self) -> u16 {
        self.status
    }

    fn headers(&self) -> Vec<(String, Vec<String>)> {
        self.headers.clone()
    }

    fn open(self, _channel: Channel) -> Result<Self::Body, CallError> {
        Ok(std::io::Cursor::new(self.body))
    }
}

/// Read the channel selected by the status code to the end and parse it as
/// UTF-8 JSON. Bodies that are not valid UTF-8 JSON fail with `InvalidJson`;
/// there is no raw-text fallback.
pub fn read_response<E: Exchange>(exchange: E) -> Result<ResponseEnvelope, CallError> {
    let status = exchange.status();
    let headers = exchange.headers();
    let channel = Channel::for_status(status);
    log::debug!("classifying status {status} via {channel:?} channel");

    let mut bytes = Vec::new();
    exchange.open(channel)?.read_to_end(&mut bytes)?;

    let body = serde_json::from_slice(&bytes).map_err(|e| CallError::InvalidJson(e.to_string()))?;
    Ok(ResponseEnvelope {
        status,
        headers,
        body,
    })
}
