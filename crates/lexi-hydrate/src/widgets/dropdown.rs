//! Dropdown: trigger and panel disclosure
//!
//! The trigger toggles the panel. Escape closes it and refocuses the
//! trigger; a click anywhere outside the root closes it too.
//!
//! Dropdowns sharing a `data-group` behave like radio buttons: opening one
//! dispatches `open` with the group name as detail, and every other open
//! member of that group closes when it sees the event on the document.

use std::cell::Cell;
use std::rc::Rc;

use super::{WidgetKind, bool_attr, impl_widget, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::events::{self, CLOSE, ListenerSet, OPEN};

const OPEN_CLASS: &str = "is-open";

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	trigger: NodeId,
	panel: NodeId,
	group: Option<String>,
	open: Cell<bool>,
}

/// A hydrated `dropdown` root.
pub struct Dropdown {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Dropdown {
	/// Hydrates `root`. Requires `trigger` and `panel` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let trigger = require_part(dom.as_ref(), root, WidgetKind::Dropdown, "trigger")?;
		let panel = require_part(dom.as_ref(), root, WidgetKind::Dropdown, "panel")?;
		let inner = Rc::new(Inner {
			group: dom
				.attribute(root, "data-group")
				.filter(|group| !group.is_empty()),
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
		listeners.bind(root, "keydown", &inner, |inner, event| {
			if matches!(event.key_name(), Some("Escape" | "Esc")) && inner.open.get() {
				event.stop_propagation();
				inner.close();
				inner.dom.focus(inner.trigger);
			}
		});
		listeners.bind(dom.document(), "click", &inner, |inner, event| {
			if inner.open.get() && !inner.dom.contains(inner.root, event.target()) {
				inner.close();
			}
		});
		if inner.group.is_some() {
			listeners.bind(dom.document(), OPEN, &inner, |inner, event| {
				if event.target() != inner.root
					&& inner.open.get()
					&& event.detail() == inner.group.as_deref()
				{
					inner.close();
				}
			});
		}

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the panel is shown.
	pub fn is_open(&self) -> bool {
		self.inner.open.get()
	}
}

impl_widget!(Dropdown, WidgetKind::Dropdown);

impl Inner {
	fn show(&self) {
		if self.open.replace(true) {
			return;
		}
		self.set_visible(true);
		let group = self.group.as_deref().unwrap_or_default();
		events::emit(self.dom.as_ref(), self.root, OPEN, group);
	}

	fn close(&self) {
		if !self.open.replace(false) {
			return;
		}
		self.set_visible(false);
		let group = self.group.as_deref().unwrap_or_default();
		events::emit(self.dom.as_ref(), self.root, CLOSE, group);
	}

	fn set_visible(&self, visible: bool) {
		self.dom.set_hidden(self.panel, !visible);
		self.dom.toggle_class(self.root, OPEN_CLASS, visible);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(visible));
	}
}
