//! The response delivery contract consumers implement.

use crate::error::CallbackError;
use crate::http::{HeaderList, Request, Response};

/// Receiver for one request's response, delivered in exactly three steps:
/// `on_response_started`, then `on_response_body`, then
/// `on_response_completed`, once each and in that order.
///
/// The first two steps may fail, which aborts the whole batch; the final
/// step is a terminal notification with no failure signal.
pub trait RequestCallback {
    /// The response's status and headers are available.
    fn on_response_started(
        &mut self,
        request: &Request,
        response: &Response,
    ) -> Result<(), CallbackError>;

    /// The response body is available. The double delivers it as a single
    /// chunk; a real client may call this multiple times, so consumers
    /// should accumulate.
    fn on_response_body(
        &mut self,
        request: &Request,
        response: &Response,
        body: &[u8],
    ) -> Result<(), CallbackError>;

    /// The response is fully delivered. Terminal.
    fn on_response_completed(&mut self, request: &Request, response: &Response);
}

/// A `RequestCallback` that records what it observed, for assertions in
/// consumer tests.
#[derive(Debug, Default)]
pub struct RecordingCallback {
    status: Option<u16>,
    headers: HeaderList,
    body: Vec<u8>,
    completed: bool,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status observed in `on_response_started`, or `None` if it never ran.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn headers(&self) -> &HeaderList {
        &self.headers
    }

    /// All body bytes accumulated across `on_response_body` calls.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn completed(&self) -> bool {
        self.completed
    }
}

impl RequestCallback for RecordingCallback {
    fn on_response_started(
        &mut self,
        _request: &Request,
        response: &Response,
    ) -> Result<(), CallbackError> {
        self.status = Some(response.status());
        self.headers = response.headers().clone();
        Ok(())
    }

    fn on_response_body(
        &mut self,
        _request: &Request,
        _response: &Response,
        body: &[u8],
    ) -> Result<(), CallbackError> {
        self.body.extend_from_slice(body);
        Ok(())
    }

    fn on_response_completed(&mut self, _request: &Request, _response: &Response) {
        self.completed = true;
    }
}
