//! Verb factories.
//!
//! One `CallFactory` parameterized by `HttpMethod` replaces a type per verb;
//! everything beyond fixing the method is delegated to the builder, encoder
//! and classifier.

use crate::builder::build;
use crate::error::CallError;
use crate::http::{HttpMethod, HttpRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallFactory {
    pub method: HttpMethod,
}

pub const GET: CallFactory = CallFactory::new(HttpMethod::Get);
pub const POST: CallFactory = CallFactory::new(HttpMethod::Post);
pub const PUT: CallFactory = CallFactory::new(HttpMethod::Put);
pub const DELETE: CallFactory = CallFactory::new(HttpMethod::Delete);

impl CallFactory {
    pub const fn new(method: HttpMethod) -> Self {
        Self { method }
    }

    pub fn call(&self, url: &str) -> Result<HttpRequest, CallError> {
        build(url, self.method)
    }

    pub fn with_params<I, K, V>(&self, url: &str, params: I) -> Result<HttpRequest, CallError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Ok(self.call(url)?.with_params(params))
    }
}
