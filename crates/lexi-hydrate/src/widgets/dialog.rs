//! Dialog: a modal panel opened from anywhere on the page
//!
//! The root needs an `id`; any element with `data-dialog-open="<id>"` opens
//! it, including openers inserted after hydration. Opening focuses the
//! first `[data-autofocus]` element, else the first `close` part, else the
//! root, and dispatches `open`, which makes the registry hydrate widgets
//! rendered inside the dialog.
//!
//! Closing (a `close` part, a click on the `backdrop` part itself, Escape)
//! plays a dismiss animation: the root gets `is-closing` and
//! `data-state="closing"` for the dismiss delay, then is hidden, focus
//! returns to the opener, and `close` is dispatched.

use std::cell::Cell;
use std::rc::Rc;

use lexi_core::Debouncer;

use super::{WidgetKind, bool_attr, impl_widget, part, parts, require_attribute};
use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::events::{self, CLOSE, ListenerSet, OPEN};

const CLOSING_CLASS: &str = "is-closing";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogState {
	Closed,
	Open,
	Closing,
}

impl DialogState {
	fn as_str(self) -> &'static str {
		match self {
			DialogState::Closed => "closed",
			DialogState::Open => "open",
			DialogState::Closing => "closing",
		}
	}
}

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	state: Cell<DialogState>,
	opener: Cell<Option<NodeId>>,
	dismiss: Debouncer,
}

/// A hydrated `dialog` root.
pub struct Dialog {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Dialog {
	/// Hydrates `root`. Requires an `id` attribute.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let id = require_attribute(dom.as_ref(), root, WidgetKind::Dialog, "id")?;
		let state = if dom.is_hidden(root) {
			DialogState::Closed
		} else {
			DialogState::Open
		};
		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			root,
			state: Cell::new(state),
			opener: Cell::new(None),
			dismiss: Debouncer::new(Rc::clone(ctx.scheduler()), ctx.settings().dismiss_ms),
		});
		dom.set_attribute(root, "data-state", state.as_str());
		dom.set_attribute(root, "aria-modal", bool_attr(true));

		let mut listeners = ListenerSet::new(Rc::clone(&dom));
		let opener_selector = format!(r#"[data-dialog-open="{id}"]"#);
		listeners.bind(dom.document(), "click", &inner, move |inner, event| {
			if let Some(opener) = inner.dom.closest(event.target(), &opener_selector) {
				inner.open(Some(opener));
			}
		});
		for close in parts(dom.as_ref(), root, "close") {
			listeners.bind(close, "click", &inner, |inner, _| inner.close());
		}
		if let Some(backdrop) = part(dom.as_ref(), root, "backdrop") {
			listeners.bind(backdrop, "click", &inner, move |inner, event| {
				if event.target() == backdrop {
					inner.close();
				}
			});
		}
		listeners.bind(root, "keydown", &inner, |inner, event| {
			if matches!(event.key_name(), Some("Escape" | "Esc"))
				&& inner.state.get() == DialogState::Open
			{
				event.stop_propagation();
				inner.close();
			}
		});

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the dialog is open (not closing or closed).
	pub fn is_open(&self) -> bool {
		self.inner.state.get() == DialogState::Open
	}

	/// Opens the dialog without an opener to return focus to.
	pub fn open(&self) {
		self.inner.open(None);
	}

	/// Starts the dismiss animation.
	pub fn close(&self) {
		self.inner.close();
	}
}

impl_widget!(Dialog, WidgetKind::Dialog);

impl Inner {
	fn set_state(&self, state: DialogState) {
		self.state.set(state);
		self.dom.set_attribute(self.root, "data-state", state.as_str());
	}

	fn open(&self, opener: Option<NodeId>) {
		if self.state.get() == DialogState::Open {
			return;
		}
		self.dismiss.cancel();
		if opener.is_some() {
			self.opener.set(opener);
		}
		self.dom.remove_class(self.root, CLOSING_CLASS);
		self.dom.set_hidden(self.root, false);
		self.set_state(DialogState::Open);

		let target = self
			.dom
			.query(self.root, "[data-autofocus]")
			.or_else(|| part(self.dom.as_ref(), self.root, "close"))
			.unwrap_or_else(|| {
				if !self.dom.has_attribute(self.root, "tabindex") {
					self.dom.set_attribute(self.root, "tabindex", "-1");
				}
				self.root
			});
		self.dom.focus(target);
		events::emit(self.dom.as_ref(), self.root, OPEN, "");
	}

	fn close(self: &Rc<Self>) {
		if self.state.get() != DialogState::Open {
			return;
		}
		self.set_state(DialogState::Closing);
		self.dom.add_class(self.root, CLOSING_CLASS);
		let weak = Rc::downgrade(self);
		self.dismiss.schedule(move || {
			if let Some(inner) = weak.upgrade() {
				inner.finish_close();
			}
		});
	}

	fn finish_close(&self) {
		self.dom.remove_class(self.root, CLOSING_CLASS);
		self.dom.set_hidden(self.root, true);
		self.set_state(DialogState::Closed);
		if let Some(opener) = self.opener.take() {
			self.dom.focus(opener);
		}
		events::emit(self.dom.as_ref(), self.root, CLOSE, "");
	}
}
