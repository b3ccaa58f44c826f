//! Delayed callbacks and debouncing
//!
//! A [`Scheduler`] runs a callback after a delay and can cancel it. The
//! browser implementation lives in `lexi-hydrate`; [`ManualScheduler`] is a
//! virtual clock for tests and native use.
//!
//! A [`Debouncer`] owns one logical input stream. Every `schedule` call
//! cancels the previously scheduled callback first, so at most one timer per
//! stream is ever live, and a callback that fires after its cancellation is
//! ignored.
//!
//! ## Delays used by the widgets
//!
//! | Constant | Value | Use |
//! |----------|-------|-----|
//! | [`QUERY_DEBOUNCE_MS`] | 250 | keystrokes → search request |
//! | [`BLUR_CLOSE_MS`] | 100 | blur vs. click on an item |
//! | [`DISMISS_MS`] | 300 | close/fade animations |

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Query debounce delay.
pub const QUERY_DEBOUNCE_MS: u32 = 250;

/// Delay before a blurred widget closes, leaving room for an item click.
pub const BLUR_CLOSE_MS: u32 = 100;

/// Dismiss animation length.
pub const DISMISS_MS: u32 = 300;

/// Opaque handle of a scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Boxed one-shot callback.
pub type TimerCallback = Box<dyn FnOnce() + 'static>;

/// Schedules callbacks on the UI thread.
pub trait Scheduler {
	/// Runs `callback` once after `delay_ms`.
	fn schedule(&self, delay_ms: u32, callback: TimerCallback) -> TimerId;

	/// Cancels a scheduled callback. Unknown or already fired ids are ignored.
	fn cancel(&self, id: TimerId);
}

struct DebounceSlot {
	live: Cell<Option<TimerId>>,
	generation: Cell<u64>,
}

/// One debounced stream.
///
/// ## Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use lexi_core::timer::{Debouncer, ManualScheduler};
///
/// let clock = Rc::new(ManualScheduler::new());
/// let debounce = Debouncer::new(clock.clone(), 250);
/// let fired = Rc::new(Cell::new(0));
///
/// for _ in 0..3 {
///     let fired = fired.clone();
///     debounce.schedule(move || fired.set(fired.get() + 1));
///     clock.advance(50);
/// }
/// clock.advance(250);
/// assert_eq!(fired.get(), 1);
/// ```
pub struct Debouncer {
	scheduler: Rc<dyn Scheduler>,
	delay_ms: u32,
	slot: Rc<DebounceSlot>,
}

impl Debouncer {
	/// Creates a debouncer firing `delay_ms` after the last `schedule` call.
	pub fn new(scheduler: Rc<dyn Scheduler>, delay_ms: u32) -> Self {
		Self {
			scheduler,
			delay_ms,
			slot: Rc::new(DebounceSlot {
				live: Cell::new(None),
				generation: Cell::new(0),
			}),
		}
	}

	/// Delay in milliseconds.
	pub fn delay_ms(&self) -> u32 {
		self.delay_ms
	}

	/// Cancels the pending callback, then schedules `callback`.
	pub fn schedule<F>(&self, callback: F) -> TimerId
	where
		F: FnOnce() + 'static,
	{
		self.cancel();
		let generation = self.slot.generation.get();
		let slot = Rc::clone(&self.slot);
		let id = self.scheduler.schedule(
			self.delay_ms,
			Box::new(move || {
				if slot.generation.get() != generation {
					return;
				}
				slot.live.set(None);
				callback();
			}),
		);
		self.slot.live.set(Some(id));
		id
	}

	/// Cancels the pending callback, if any.
	pub fn cancel(&self) {
		self.slot.generation.set(self.slot.generation.get().wrapping_add(1));
		if let Some(id) = self.slot.live.take() {
			self.scheduler.cancel(id);
		}
	}

	/// Whether a callback is waiting to fire.
	pub fn is_pending(&self) -> bool {
		self.slot.live.get().is_some()
	}
}

impl fmt::Debug for Debouncer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Debouncer")
			.field("delay_ms", &self.delay_ms)
			.field("pending", &self.is_pending())
			.finish()
	}
}

/// Virtual clock scheduler.
///
/// Callbacks run only from [`ManualScheduler::advance`], in due-time order
/// (ties in scheduling order). Callbacks may schedule further callbacks; those
/// run in the same `advance` call when they fall due before its end.
#[derive(Default)]
pub struct ManualScheduler {
	now: Cell<u64>,
	next_id: Cell<u64>,
	queue: RefCell<BTreeMap<(u64, u64), TimerCallback>>,
}

impl ManualScheduler {
	/// Creates a scheduler at time 0.
	pub fn new() -> Self {
		Self::default()
	}

	/// Current virtual time in milliseconds.
	pub fn now(&self) -> u64 {
		self.now.get()
	}

	/// Number of callbacks waiting to fire.
	pub fn pending(&self) -> usize {
		self.queue.borrow().len()
	}

	/// Moves the clock forward, running every callback that falls due.
	pub fn advance(&self, ms: u64) {
		let target = self.now.get() + ms;
		loop {
			let due = {
				let mut queue = self.queue.borrow_mut();
				match queue.first_key_value() {
					Some((&(at, _), _)) if at <= target => queue.pop_first(),
					_ => None,
				}
			};
			let Some(((at, _), callback)) = due else {
				break;
			};
			self.now.set(at);
			callback();
		}
		self.now.set(target);
	}

	/// Runs everything that is pending, however far in the future.
	pub fn run_all(&self) {
		loop {
			let next_due = self.queue.borrow().keys().next().map(|&(at, _)| at);
			let Some(at) = next_due else {
				break;
			};
			self.advance(at.saturating_sub(self.now.get()));
		}
	}
}

impl Scheduler for ManualScheduler {
	fn schedule(&self, delay_ms: u32, callback: TimerCallback) -> TimerId {
		let seq = self.next_id.get();
		self.next_id.set(seq + 1);
		let due = self.now.get() + u64::from(delay_ms);
		self.queue.borrow_mut().insert((due, seq), callback);
		TimerId(seq)
	}

	fn cancel(&self, id: TimerId) {
		self.queue.borrow_mut().retain(|&(_, seq), _| seq != id.0);
	}
}

impl fmt::Debug for ManualScheduler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ManualScheduler")
			.field("now", &self.now.get())
			.field("pending", &self.pending())
			.finish()
	}
}
