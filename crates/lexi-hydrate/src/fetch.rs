//! Search transport
//!
//! A [`Transport`] performs `GET <url>` and hands the body text to a
//! completion callback. It promises nothing about retries or timeouts; the
//! query flow adds its own timeout and discards stale completions.

use std::cell::RefCell;
use std::fmt;

use thiserror::Error;

/// Why a request produced no body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The request never got a response
	#[error("Network error: {0}")]
	Network(String),

	/// The server answered with a non-success status
	#[error("HTTP status {0}")]
	Status(u16),

	/// The body could not be read
	#[error("Unreadable body: {0}")]
	Body(String),

	/// No answer within the configured timeout
	#[error("Request timed out")]
	TimedOut,
}

/// Completion callback of one request.
pub type FetchCallback = Box<dyn FnOnce(Result<String, FetchError>) + 'static>;

/// Asynchronous `GET` returning body text.
pub trait Transport {
	/// Starts a request. `on_complete` runs at most once, possibly
	/// synchronously.
	fn fetch(&self, url: &str, on_complete: FetchCallback);
}

type Responder = Box<dyn Fn(&str) -> Option<Result<String, FetchError>>>;

struct PendingRequest {
	url: String,
	callback: Option<FetchCallback>,
}

/// Transport whose requests are answered by test code.
///
/// Requests wait until [`MockTransport::respond`] is called, unless a
/// responder installed with [`MockTransport::set_responder`] answers them
/// immediately.
///
/// ## Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use lexi_hydrate::fetch::{MockTransport, Transport};
///
/// let transport = MockTransport::new();
/// let body = Rc::new(RefCell::new(None));
/// let sink = body.clone();
/// transport.fetch("/api/search?value=a&field=text", Box::new(move |result| {
///     *sink.borrow_mut() = result.ok();
/// }));
///
/// assert_eq!(transport.requests(), vec!["/api/search?value=a&field=text".to_string()]);
/// transport.respond(0, Ok(r#"{"exact":[],"partial":[]}"#.to_string()));
/// assert!(body.borrow().is_some());
/// ```
#[derive(Default)]
pub struct MockTransport {
	requests: RefCell<Vec<PendingRequest>>,
	responder: RefCell<Option<Responder>>,
}

impl MockTransport {
	/// Creates a transport with no responder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Answers future requests with `responder`. Returning `None` leaves the
	/// request pending.
	pub fn set_responder<F>(&self, responder: F)
	where
		F: Fn(&str) -> Option<Result<String, FetchError>> + 'static,
	{
		*self.responder.borrow_mut() = Some(Box::new(responder));
	}

	/// URLs of every request so far, oldest first.
	pub fn requests(&self) -> Vec<String> {
		self.requests
			.borrow()
			.iter()
			.map(|request| request.url.clone())
			.collect()
	}

	/// Number of requests still waiting for an answer.
	pub fn pending(&self) -> usize {
		self.requests
			.borrow()
			.iter()
			.filter(|request| request.callback.is_some())
			.count()
	}

	/// Answers request number `index`. Returns `false` if it was already
	/// answered or does not exist.
	pub fn respond(&self, index: usize, result: Result<String, FetchError>) -> bool {
		let callback = self
			.requests
			.borrow_mut()
			.get_mut(index)
			.and_then(|request| request.callback.take());
		match callback {
			Some(callback) => {
				callback(result);
				true
			}
			None => false,
		}
	}

	/// Answers the most recent request.
	pub fn respond_latest(&self, result: Result<String, FetchError>) -> bool {
		let last = self.requests.borrow().len().checked_sub(1);
		last.is_some_and(|index| self.respond(index, result))
	}
}

impl Transport for MockTransport {
	fn fetch(&self, url: &str, on_complete: FetchCallback) {
		let immediate = self
			.responder
			.borrow()
			.as_ref()
			.and_then(|responder| responder(url));
		let index = {
			let mut requests = self.requests.borrow_mut();
			requests.push(PendingRequest {
				url: url.to_string(),
				callback: Some(on_complete),
			});
			requests.len() - 1
		};
		if let Some(result) = immediate {
			self.respond(index, result);
		}
	}
}

impl fmt::Debug for MockTransport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MockTransport")
			.field("requests", &self.requests.borrow().len())
			.field("pending", &self.pending())
			.finish()
	}
}

/// Transport over `window.fetch`, through gloo-net.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

#[cfg(target_arch = "wasm32")]
impl Transport for BrowserTransport {
	fn fetch(&self, url: &str, on_complete: FetchCallback) {
		let url = url.to_string();
		wasm_bindgen_futures::spawn_local(async move {
			on_complete(browser::fetch_text(&url).await);
		});
	}
}

#[cfg(target_arch = "wasm32")]
mod browser {
	use gloo_net::http::Request;

	use super::FetchError;

	pub(super) async fn fetch_text(url: &str) -> Result<String, FetchError> {
		let response = Request::get(url)
			.header("Accept", "application/json")
			.send()
			.await
			.map_err(|e| FetchError::Network(e.to_string()))?;

		if !response.ok() {
			return Err(FetchError::Status(response.status()));
		}

		response
			.text()
			.await
			.map_err(|e| FetchError::Body(e.to_string()))
	}
}
