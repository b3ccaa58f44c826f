//! Search bar: a full-screen overlay around a typeahead
//!
//! The `trigger` part opens the `panel` and focuses the first `input` found
//! inside it (the nested typeahead's). The overlay closes on its `close`
//! part, on an Escape the typeahead did not consume, and when the typeahead
//! announces `submit` or `search-result-click`. Closing returns focus to the
//! trigger.

use std::cell::Cell;
use std::rc::Rc;

use super::{WidgetKind, bool_attr, impl_widget, part, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::events::{self, CLOSE, ListenerSet, OPEN, SEARCH_RESULT_CLICK, SUBMIT};

/// Class of an open overlay root.
const OPEN_CLASS: &str = "is-open";

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	trigger: NodeId,
	panel: NodeId,
	open: Cell<bool>,
}

/// A hydrated `search-bar` root.
pub struct SearchBar {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl SearchBar {
	/// Hydrates `root`. Requires `trigger` and `panel` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let trigger = require_part(dom.as_ref(), root, WidgetKind::SearchBar, "trigger")?;
		let panel = require_part(dom.as_ref(), root, WidgetKind::SearchBar, "panel")?;
		let inner = Rc::new(Inner {
			open: Cell::new(!dom.is_hidden(panel)),
			dom: Rc::clone(&dom),
			root,
			trigger,
			panel,
		});
		dom.set_attribute(trigger, "aria-expanded", bool_attr(inner.open.get()));

		let mut listeners = ListenerSet::new(Rc::clone(&dom));
		listeners.bind(trigger, "click", &inner, |inner, _| {
			if inner.open.get() {
				inner.close();
			} else {
				inner.show();
			}
		});
		if let Some(close) = part(dom.as_ref(), root, "close") {
			listeners.bind(close, "click", &inner, |inner, _| inner.close());
		}
		listeners.bind(root, "keydown", &inner, |inner, event| {
			if matches!(event.key_name(), Some("Escape" | "Esc")) && inner.open.get() {
				event.prevent_default();
				inner.close();
			}
		});
		for kind in [SUBMIT, SEARCH_RESULT_CLICK] {
			listeners.bind(root, kind, &inner, |inner, _| inner.close());
		}

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the overlay is open.
	pub fn is_open(&self) -> bool {
		self.inner.open.get()
	}
}

impl_widget!(SearchBar, WidgetKind::SearchBar);

impl Inner {
	fn show(&self) {
		if self.open.replace(true) {
			return;
		}
		self.dom.set_hidden(self.panel, false);
		self.dom.add_class(self.root, OPEN_CLASS);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(true));
		if let Some(input) = self.dom.query(self.panel, r#"[data-part="input"]"#) {
			self.dom.focus(input);
		}
		events::emit(self.dom.as_ref(), self.root, OPEN, "");
	}

	fn close(&self) {
		if !self.open.replace(false) {
			return;
		}
		self.dom.set_hidden(self.panel, true);
		self.dom.remove_class(self.root, OPEN_CLASS);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(false));
		self.dom.focus(self.trigger);
		events::emit(self.dom.as_ref(), self.root, CLOSE, "");
	}
}
