//! Debounced search requests
//!
//! [`QueryFlow`] turns keystrokes into at most one request per pause in
//! typing and hands decoded items back to its widget:
//!
//! ```text
//! input ─▶ Debouncer ─▶ Transport::fetch ─▶ decode_results ─▶ deliver
//!                              │
//!                              └─ timeout ─▶ deliver (failed, no items)
//! ```
//!
//! Every request is tagged with a generation number. Typing again,
//! [`QueryFlow::cancel`] and a completed delivery all advance the
//! generation, so a response that arrives after being superseded is
//! dropped instead of overwriting newer results.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use lexi_core::json::{DecodeSource, decode_results};
use lexi_core::result::request_url;
use lexi_core::{Debouncer, ResultItem, Scheduler};

use crate::config::SearchSettings;
use crate::fetch::{FetchError, Transport};
use crate::{debug_log, warn_log};

/// Results of one completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
	/// Query the request was made for.
	pub query: String,
	/// Decoded items, `exact` first. Empty on failure.
	pub items: Vec<ResultItem>,
	/// Whether the request failed or timed out.
	pub failed: bool,
}

/// What [`QueryFlow::input`] did with a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryInput {
	/// A request is scheduled after the debounce delay.
	Scheduled,
	/// The query is shorter than the minimum length. Nothing is pending and
	/// the caller should clear its results.
	TooShort,
}

type DeliverFn = Box<dyn Fn(Delivery)>;

struct FlowState {
	transport: Rc<dyn Transport>,
	settings: SearchSettings,
	debounce: Debouncer,
	timeout: Debouncer,
	generation: Cell<u64>,
	in_flight: Cell<bool>,
	deliver: DeliverFn,
}

impl FlowState {
	fn advance(&self) -> u64 {
		let next = self.generation.get().wrapping_add(1);
		self.generation.set(next);
		next
	}
}

/// Debounced, stale-safe search requests of one widget.
pub struct QueryFlow {
	state: Rc<FlowState>,
}

impl QueryFlow {
	/// Creates a flow delivering into `deliver`.
	pub fn new<F>(
		transport: Rc<dyn Transport>,
		scheduler: Rc<dyn Scheduler>,
		settings: SearchSettings,
		deliver: F,
	) -> Self
	where
		F: Fn(Delivery) + 'static,
	{
		let debounce = Debouncer::new(Rc::clone(&scheduler), settings.debounce_ms);
		let timeout = Debouncer::new(scheduler, settings.fetch_timeout_ms);
		Self {
			state: Rc::new(FlowState {
				transport,
				settings,
				debounce,
				timeout,
				generation: Cell::new(0),
				in_flight: Cell::new(false),
				deliver: Box::new(deliver),
			}),
		}
	}

	/// Resolved settings.
	pub fn settings(&self) -> &SearchSettings {
		&self.state.settings
	}

	/// Schedules a request for `query`, replacing any pending one.
	///
	/// An in-flight request for an older query is invalidated immediately.
	pub fn input(&self, query: &str) -> QueryInput {
		self.cancel();
		if query.trim().chars().count() < self.state.settings.min_length.max(1) {
			return QueryInput::TooShort;
		}
		let weak = Rc::downgrade(&self.state);
		let query = query.to_string();
		self.state.debounce.schedule(move || {
			if let Some(state) = weak.upgrade() {
				start(&state, query);
			}
		});
		QueryInput::Scheduled
	}

	/// Requests `query` immediately, skipping the debounce.
	pub fn search_now(&self, query: &str) {
		self.cancel();
		start(&self.state, query.to_string());
	}

	/// Cancels the pending debounce and invalidates any in-flight request.
	pub fn cancel(&self) {
		self.state.debounce.cancel();
		self.state.timeout.cancel();
		self.state.in_flight.set(false);
		self.state.advance();
	}

	/// Whether a request is scheduled or waiting for its response.
	pub fn is_pending(&self) -> bool {
		self.state.debounce.is_pending() || self.state.in_flight.get()
	}
}

impl fmt::Debug for QueryFlow {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("QueryFlow")
			.field("endpoint", &self.state.settings.endpoint)
			.field("generation", &self.state.generation.get())
			.field("pending", &self.is_pending())
			.finish()
	}
}

fn start(state: &Rc<FlowState>, query: String) {
	let generation = state.advance();
	let url = request_url(&state.settings.endpoint, &query, &state.settings.field);
	debug_log!("search #{} -> {}", generation, url);
	state.in_flight.set(true);

	let weak = Rc::downgrade(state);
	let timed_out_query = query.clone();
	state.timeout.schedule(move || {
		if let Some(state) = weak.upgrade() {
			complete(&state, generation, timed_out_query, Err(FetchError::TimedOut));
		}
	});

	let weak: Weak<FlowState> = Rc::downgrade(state);
	state.transport.fetch(
		&url,
		Box::new(move |result| {
			if let Some(state) = weak.upgrade() {
				complete(&state, generation, query, result);
			}
		}),
	);
}

fn complete(state: &FlowState, generation: u64, query: String, result: Result<String, FetchError>) {
	if generation != state.generation.get() {
		debug_log!("discarding stale response #{} for {:?}", generation, query);
		return;
	}
	state.advance();
	state.timeout.cancel();
	state.in_flight.set(false);

	let delivery = match result {
		Ok(body) => {
			let decoded = decode_results(&body, &state.settings.schema, &state.settings.links());
			if decoded.source == DecodeSource::Fallback {
				warn_log!("malformed search response for {:?}, recovered {} items", query, decoded.items.len());
			}
			Delivery {
				query,
				items: decoded.items,
				failed: false,
			}
		}
		Err(error) => {
			warn_log!("search for {:?} failed: {}", query, error);
			Delivery {
				query,
				items: Vec::new(),
				failed: true,
			}
		}
	};
	(state.deliver)(delivery);
}
