//! Response processors: status check plus body conversion
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::response::Response;

/// Turns the outcome of a transport call into the caller's output type
pub trait Processor {
    /// The output type of the processor
    type Output;

    /// Process a transport result
    fn process<R: Response>(&self, response: Result<R>) -> Result<Self::Output>;
}

/// Fail with [`Error::Network`] carrying the raw body when the status is not a success
fn ensure_success<R: Response>(response: Result<R>) -> Result<R> {
    let resp = response?;
    if !resp.is_success() {
        return Err(Error::Network {
            request_id: resp.request_id().to_owned(),
            status: resp.status(),
            message: resp.body().to_owned(),
        });
    }
    Ok(resp)
}

/// Raw processor, returns the body text unparsed
pub struct Raw;

impl Processor for Raw {
    type Output = String;

    fn process<R: Response>(&self, response: Result<R>) -> Result<String> {
        let resp = ensure_success(response)?;
        Ok(resp.body().to_owned())
    }
}

/// JSON processor, decodes the body into `T` without further validation
pub struct Json<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Json<T> {
    /// Create a JSON processor for `T`
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for Json<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Processor for Json<T> {
    type Output = T;

    fn process<R: Response>(&self, response: Result<R>) -> Result<T> {
        let resp = ensure_success(response)?;
        Ok(serde_json::from_str(resp.body())?)
    }
}
