//! Timers on the page
//!
//! Re-exports the platform-neutral scheduling types and adds
//! [`BrowserScheduler`], which runs callbacks through `window.setTimeout`.

pub use lexi_core::timer::{
	BLUR_CLOSE_MS, DISMISS_MS, Debouncer, ManualScheduler, QUERY_DEBOUNCE_MS, Scheduler,
	TimerCallback, TimerId,
};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScheduler;

#[cfg(target_arch = "wasm32")]
mod browser {
	use std::cell::{Cell, RefCell};
	use std::collections::HashMap;
	use std::fmt;
	use std::rc::Rc;

	use gloo_timers::callback::Timeout;

	use super::{Scheduler, TimerCallback, TimerId};

	/// [`Scheduler`] over `window.setTimeout`.
	///
	/// Pending timers are held as [`Timeout`]s; cancelling one drops it,
	/// which clears the browser timer and frees its callback.
	#[derive(Default)]
	pub struct BrowserScheduler {
		next_id: Cell<u64>,
		pending: Rc<RefCell<HashMap<u64, Timeout>>>,
	}

	impl BrowserScheduler {
		/// Creates a scheduler.
		pub fn new() -> Self {
			Self::default()
		}

		/// Number of timers that have neither fired nor been cancelled.
		pub fn pending(&self) -> usize {
			self.pending.borrow().len()
		}
	}

	impl fmt::Debug for BrowserScheduler {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.debug_struct("BrowserScheduler")
				.field("next_id", &self.next_id.get())
				.field("pending", &self.pending())
				.finish()
		}
	}

	impl Scheduler for BrowserScheduler {
		fn schedule(&self, delay_ms: u32, callback: TimerCallback) -> TimerId {
			let id = self.next_id.get();
			self.next_id.set(id + 1);

			let pending = Rc::clone(&self.pending);
			let timeout = Timeout::new(delay_ms, move || {
				let spent = pending.borrow_mut().remove(&id);
				callback();
				drop(spent);
			});
			self.pending.borrow_mut().insert(id, timeout);
			TimerId(id)
		}

		fn cancel(&self, id: TimerId) {
			let timeout = self.pending.borrow_mut().remove(&id.0);
			drop(timeout);
		}
	}
}
