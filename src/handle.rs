//! One-shot request handles.
//!
//! # Design
//! A handle is a single-use ticket: it owns exactly one `Request`, carries
//! the byte counters the dispatcher fills in, and enforces that the request
//! is dispatched at most once. The counters are settable only from inside
//! the crate; consumers read them through accessors. The cancellation
//! listener is shared with the client through an `Rc<RefCell<..>>` cell so
//! a listener registered after a handle was enqueued still reaches it —
//! which also makes handles `!Send`, matching the single-threaded execution
//! model of the whole double.

use std::cell::RefCell;
use std::rc::Rc;

use crate::http::Request;

/// Cancellation listener cell shared between a client and its handles.
pub(crate) type ListenerCell = Rc<RefCell<Box<dyn FnMut()>>>;

/// A one-shot handle for a single enqueued request.
///
/// Created by [`MockableClient::enqueue_request`] and consumed (logically)
/// by [`MockableClient::perform_requests`]; dispatching the same handle a
/// second time is an error, never a silent no-op.
///
/// [`MockableClient::enqueue_request`]: crate::MockableClient::enqueue_request
/// [`MockableClient::perform_requests`]: crate::MockableClient::perform_requests
pub struct RequestHandle {
    request: Request,
    cancellation_listener: ListenerCell,
    performed: bool,
    sent_bytes: u64,
    received_bytes: u64,
}

impl RequestHandle {
    pub(crate) fn new(request: Request, cancellation_listener: ListenerCell) -> Self {
        Self {
            request,
            cancellation_listener,
            performed: false,
            sent_bytes: 0,
            received_bytes: 0,
        }
    }

    /// Bytes the double pretends to have sent for this request. An
    /// approximation for test observability (`uri length + body length`),
    /// not a wire-size measurement.
    pub fn total_sent_bytes(&self) -> u64 {
        self.sent_bytes
    }

    /// Bytes the double pretends to have received for this request
    /// (`100 + response body length` once a response was delivered).
    pub fn total_received_bytes(&self) -> u64 {
        self.received_bytes
    }

    /// Invoke the client's cancellation listener.
    ///
    /// Advisory only: dispatch is synchronous, so by the time a caller can
    /// cancel, any dispatch involving this handle has already completed.
    /// May be called any number of times.
    pub fn cancel(&self) {
        (self.cancellation_listener.borrow_mut())();
    }

    /// Whether this handle has already been through a dispatch batch.
    pub fn performed(&self) -> bool {
        self.performed
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub(crate) fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// Read-and-set the one-shot flag. Returns `true` only on the first
    /// invocation; this is the single-use enforcement point.
    pub(crate) fn mark_performed(&mut self) -> bool {
        let already_performed = self.performed;
        self.performed = true;
        !already_performed
    }

    pub(crate) fn set_sent_bytes(&mut self, bytes: u64) {
        self.sent_bytes = bytes;
    }

    pub(crate) fn set_received_bytes(&mut self, bytes: u64) {
        self.received_bytes = bytes;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    fn handle_with_listener(listener: ListenerCell) -> RequestHandle {
        let request = Request::new("https://example.com", Method::Get, Vec::new());
        RequestHandle::new(request, listener)
    }

    fn noop_listener() -> ListenerCell {
        Rc::new(RefCell::new(Box::new(|| {})))
    }

    #[test]
    fn counters_start_at_zero() {
        let handle = handle_with_listener(noop_listener());
        assert_eq!(handle.total_sent_bytes(), 0);
        assert_eq!(handle.total_received_bytes(), 0);
    }

    #[test]
    fn mark_performed_is_true_only_once() {
        let mut handle = handle_with_listener(noop_listener());
        assert!(handle.mark_performed());
        assert!(!handle.mark_performed());
        assert!(!handle.mark_performed());
    }

    #[test]
    fn cancel_invokes_the_listener_each_time() {
        let count = Rc::new(RefCell::new(0));
        let count_in_listener = Rc::clone(&count);
        let listener: ListenerCell = Rc::new(RefCell::new(Box::new(move || {
            *count_in_listener.borrow_mut() += 1;
        })));

        let handle = handle_with_listener(listener);
        handle.cancel();
        handle.cancel();
        assert_eq!(*count.borrow(), 2);
    }
}
