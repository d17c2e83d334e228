//! Synchronous HTTP call construction and response classification.
//!
//! # Overview
//! Builds `HttpRequest` descriptors for GET/POST/PUT/DELETE calls, encodes
//! bodies according to the declared content type, and turns a completed
//! exchange into a `ResponseEnvelope` whose JSON body comes from the success
//! or error channel depending on the status code.
//!
//! # Design
//! - One `CallFactory` parameterized by `HttpMethod`; verb identity is data.
//! - Building and parsing are pure. The network round trip sits behind the
//!   `Transport` trait, with a ureq implementation under the `ureq` feature.
//! - Every failure is a `CallError` returned to the caller. Nothing is
//!   retried.
//!
//! ```no_run
//! use callfactory_core::{send, UreqTransport, POST};
//!
//! # fn main() -> Result<(), callfactory_core::CallError> {
//! let request = POST
//!     .with_params("http://localhost:3000/items", [("dry_run", "true")])?
//!     .with_authentication("alice", "secret")
//!     .with_content_type("application/json")
//!     .encode(serde_json::json!({"name": "bolt"}))?;
//! let envelope = send(&UreqTransport::new(), &request)?;
//! println!("{envelope}");
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod builder;
pub mod error;
pub mod factory;
pub mod http;
pub mod response;
pub mod transport;

pub use body::{ContentType, Payload};
pub use builder::{build, TimeoutKind};
pub use error::{BoxError, CallError};
pub use factory::{CallFactory, DELETE, GET, POST, PUT};
pub use http::{Headers, HttpMethod, HttpRequest, ResponseEnvelope};
pub use response::{read_response, Channel, Exchange, RawExchange};
pub use transport::{send, Transport};
#[cfg(feature = "ureq")]
pub use transport::{UreqExchange, UreqTransport};
