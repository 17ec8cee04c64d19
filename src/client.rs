//! The scripted client double and its dispatcher.
//!
//! # Design
//! `MockableClient` stands in for a real asynchronous HTTP client without
//! performing any network I/O: responses come from a caller-supplied
//! `ResponseProvider`, and the whole batch is driven synchronously to
//! completion by `perform_requests`. What makes it more than a naive stub
//! is that it enforces the same protocol discipline a real client would —
//! single-use handles, `Content-Length`-bounded body reads with an
//! exhaustion probe, and the strict three-step callback order — so code
//! exercised against the double also behaves against the real thing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::body::BodyError;
use crate::callback::RequestCallback;
use crate::error::{ClientError, ProviderError};
use crate::handle::{ListenerCell, RequestHandle};
use crate::http::{find_header, Request, Response, SimpleRequest, CONTENT_LENGTH};

/// Added to every response body length when accounting received bytes, so
/// that even empty-bodied responses move the counter (headers are always
/// received on a real connection).
const RECEIVED_HEADER_OVERHEAD: u64 = 100;

/// Source of scripted responses; the single injection point for a test's
/// predetermined behavior.
pub trait ResponseProvider {
    /// Produce the response for one fully-drained request, or fail the
    /// request (and with it the batch).
    fn perform_single_request(&mut self, request: SimpleRequest)
        -> Result<Response, ProviderError>;
}

/// Any `FnMut(SimpleRequest) -> Result<Response, ProviderError>` closure is
/// a provider, which keeps simple scripts inline in the test body.
impl<F> ResponseProvider for F
where
    F: FnMut(SimpleRequest) -> Result<Response, ProviderError>,
{
    fn perform_single_request(
        &mut self,
        request: SimpleRequest,
    ) -> Result<Response, ProviderError> {
        self(request)
    }
}

/// A scripted HTTP client double.
///
/// Enqueue requests to obtain one-shot handles, then drive them with
/// [`perform_requests`]. Execution is single-threaded and fully
/// synchronous; handles must not be shared across concurrent batches.
///
/// [`perform_requests`]: MockableClient::perform_requests
pub struct MockableClient<P> {
    provider: P,
    cancellation_listener: ListenerCell,
}

impl<P: ResponseProvider> MockableClient<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cancellation_listener: Rc::new(RefCell::new(Box::new(|| {}))),
        }
    }

    /// Register the listener invoked by [`RequestHandle::cancel`].
    ///
    /// The listener cell is shared, so handles enqueued before this call
    /// observe the new listener too. Cancellation is advisory: dispatch is
    /// synchronous and cannot be interrupted mid-batch.
    pub fn set_cancellation_listener(&self, listener: impl FnMut() + 'static) {
        *self.cancellation_listener.borrow_mut() = Box::new(listener);
    }

    /// Wrap a request in a fresh one-shot handle.
    pub fn enqueue_request(&self, request: Request) -> RequestHandle {
        RequestHandle::new(request, Rc::clone(&self.cancellation_listener))
    }

    /// Dispatch a batch of handle/callback pairs, strictly in order, each
    /// request fully to completion before the next starts.
    ///
    /// The first failure of any kind aborts the batch: entries after the
    /// failing one are never attempted, and already-delivered callbacks are
    /// not rolled back. Byte counters and the `performed` flag on the
    /// failing entry's handle may be partially set.
    pub fn perform_requests(
        &mut self,
        batch: Vec<(&mut RequestHandle, &mut dyn RequestCallback)>,
    ) -> Result<(), ClientError> {
        for (handle, callback) in batch {
            if !handle.mark_performed() {
                return Err(ClientError::HandleReuse);
            }

            let body = if handle.request().has_body() {
                drain_body(handle.request_mut())?
            } else {
                Vec::new()
            };

            // An approximation for test observability; callers can no more
            // predict a real client's exact wire size than this one's.
            handle.set_sent_bytes((handle.request().uri().len() + body.len()) as u64);

            let request = handle.request();
            let flattened = SimpleRequest {
                uri: request.uri().to_string(),
                method: request.method(),
                headers: request.extra_headers().clone(),
                body,
            };
            let response = self
                .provider
                .perform_single_request(flattened)
                .map_err(ClientError::Provider)?;

            tracing::debug!(uri = %handle.request().uri(), "delivering response headers");
            callback
                .on_response_started(handle.request(), &response)
                .map_err(|source| ClientError::Callback {
                    stage: "on_response_started",
                    source,
                })?;

            handle.set_received_bytes(RECEIVED_HEADER_OVERHEAD + response.body().len() as u64);

            tracing::debug!(uri = %handle.request().uri(), "delivering response body");
            callback
                .on_response_body(handle.request(), &response, response.body())
                .map_err(|source| ClientError::Callback {
                    stage: "on_response_body",
                    source,
                })?;

            tracing::debug!(uri = %handle.request().uri(), "delivering response completion");
            callback.on_response_completed(handle.request(), &response);
        }
        Ok(())
    }
}

/// Drain a request body under `Content-Length` discipline.
///
/// One bounded read must return exactly the declared length in a single
/// call, and a trailing 1-byte probe must report exhaustion. There is no
/// accumulation loop: a partial read means the producer under test got its
/// declaration wrong, which is exactly what this double exists to catch.
fn drain_body(request: &mut Request) -> Result<Vec<u8>, ClientError> {
    let declared = match find_header(request.extra_headers(), CONTENT_LENGTH) {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| ClientError::MalformedContentLength(value.to_string()))?,
        None => return Err(ClientError::MissingContentLength),
    };

    let mut body = vec![0u8; declared];
    let read = request.read_body(&mut body).map_err(ClientError::BodyRead)?;
    if read != declared {
        return Err(ClientError::ShortRead {
            expected: declared,
            actual: read,
        });
    }

    let mut probe = [0u8; 1];
    match request.read_body(&mut probe) {
        Err(BodyError::Exhausted) => Ok(body),
        Ok(n) => Err(ClientError::Overrun(format!(
            "probe read returned {n} byte(s)"
        ))),
        Err(err) => Err(ClientError::Overrun(format!("probe read failed: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{BodyReader, InMemoryBody};
    use crate::http::{HeaderList, Method};

    fn content_length(value: &str) -> HeaderList {
        vec![(CONTENT_LENGTH.to_string(), value.to_string())]
    }

    fn post_with_body(headers: HeaderList, body: impl Into<Vec<u8>>) -> Request {
        Request::with_body(
            "https://example.com/upload",
            Method::Post,
            headers,
            Box::new(InMemoryBody::new(body.into())),
        )
    }

    #[test]
    fn drain_returns_the_declared_bytes_exactly() {
        let mut req = post_with_body(content_length("3"), b"xyz".to_vec());
        assert_eq!(drain_body(&mut req).unwrap(), b"xyz");
    }

    #[test]
    fn drain_rejects_a_body_without_content_length() {
        let mut req = post_with_body(Vec::new(), b"xyz".to_vec());
        assert!(matches!(
            drain_body(&mut req),
            Err(ClientError::MissingContentLength)
        ));
    }

    #[test]
    fn drain_rejects_non_decimal_content_length() {
        for bad in ["abc", "-1", "3.5", ""] {
            let mut req = post_with_body(content_length(bad), b"xyz".to_vec());
            assert!(
                matches!(drain_body(&mut req), Err(ClientError::MalformedContentLength(v)) if v == bad),
                "value {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn drain_flags_a_short_read() {
        let mut req = post_with_body(content_length("5"), b"xyz".to_vec());
        assert!(matches!(
            drain_body(&mut req),
            Err(ClientError::ShortRead {
                expected: 5,
                actual: 3
            })
        ));
    }

    #[test]
    fn drain_flags_a_body_longer_than_declared() {
        let mut req = post_with_body(content_length("4"), b"abcde".to_vec());
        assert!(matches!(drain_body(&mut req), Err(ClientError::Overrun(_))));
    }

    struct BrokenBody;

    impl BodyReader for BrokenBody {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, BodyError> {
            Err(BodyError::Read("disk on fire".to_string()))
        }
    }

    #[test]
    fn drain_surfaces_a_failing_body_source() {
        let mut req = Request::with_body(
            "https://example.com/upload",
            Method::Post,
            content_length("3"),
            Box::new(BrokenBody),
        );
        assert!(matches!(
            drain_body(&mut req),
            Err(ClientError::BodyRead(BodyError::Read(_)))
        ));
    }

    struct ChattyProbeBody {
        body: InMemoryBody,
        probe_error: bool,
    }

    impl BodyReader for ChattyProbeBody {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, BodyError> {
            match self.body.read(buf) {
                Err(BodyError::Exhausted) if self.probe_error => {
                    Err(BodyError::Read("confused source".to_string()))
                }
                other => other,
            }
        }
    }

    #[test]
    fn drain_treats_a_failing_probe_as_overrun() {
        // A probe outcome other than Exhausted is fatal even when it is
        // itself an error.
        let mut req = Request::with_body(
            "https://example.com/upload",
            Method::Post,
            content_length("3"),
            Box::new(ChattyProbeBody {
                body: InMemoryBody::new(b"xyz".to_vec()),
                probe_error: true,
            }),
        );
        assert!(matches!(drain_body(&mut req), Err(ClientError::Overrun(_))));
    }
}
