//! A scripted HTTP client double for exercising consumers without a network.
//!
//! # Overview
//! `MockableClient` reproduces the contract a production asynchronous HTTP
//! client presents — one-shot request handles, `Content-Length`-bounded body
//! streaming with strict read-to-exhaustion checks, and an ordered
//! three-step response delivery — while sourcing every response from a
//! test-author-supplied `ResponseProvider` instead of the wire.
//!
//! # Design
//! - Execution is single-threaded and fully synchronous: `perform_requests`
//!   drives each batch entry to completion in order, fail-fast.
//! - The double actively validates the code under test: a body source that
//!   under- or over-delivers relative to its declared `Content-Length` fails
//!   the batch, catching off-by-one and over-declaration bugs a forgiving
//!   stub would hide.
//! - Byte counters on each handle follow fixed formulas
//!   (`sent = uri + body`, `received = 100 + response body`) so existing
//!   assertions stay stable across reimplementations.

pub mod body;
pub mod callback;
pub mod client;
pub mod error;
pub mod handle;
pub mod http;

pub use body::{BodyError, BodyReader, InMemoryBody};
pub use callback::{RecordingCallback, RequestCallback};
pub use client::{MockableClient, ResponseProvider};
pub use error::{CallbackError, ClientError, ProviderError};
pub use handle::RequestHandle;
pub use http::{find_header, HeaderList, Method, Request, Response, SimpleRequest, CONTENT_LENGTH};
