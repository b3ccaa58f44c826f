//! Popover: a non-modal floating panel
//!
//! Like a dropdown, but it closes when focus leaves it (after the blur-close
//! delay) instead of on outside clicks, and announces `open` and `close`.

use std::cell::Cell;
use std::rc::Rc;

use lexi_core::Debouncer;

use super::{WidgetKind, bool_attr, impl_widget, is_inside, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, CLOSE, ListenerSet, OPEN};

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	trigger: NodeId,
	panel: NodeId,
	open: Cell<bool>,
	blur: Debouncer,
}

/// A hydrated `popover` root.
pub struct Popover {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Popover {
	/// Hydrates `root`. Requires `trigger` and `panel` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let trigger = require_part(dom.as_ref(), root, WidgetKind::Popover, "trigger")?;
		let panel = require_part(dom.as_ref(), root, WidgetKind::Popover, "panel")?;
		let inner = Rc::new(Inner {
			open: Cell::new(!dom.is_hidden(panel)),
			blur: Debouncer::new(Rc::clone(ctx.scheduler()), ctx.settings().blur_close_ms),
			dom: Rc::clone(&dom),
			root,
			trigger,
			panel,
		});
		dom.set_attribute(trigger, "aria-expanded", bool_attr(inner.open.get()));

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(trigger, "click", &inner, |inner, _| inner.set_open(!inner.open.get()));
		listeners.bind(root, "keydown", &inner, |inner, event| {
			if matches!(event.key_name(), Some("Escape" | "Esc")) && inner.open.get() {
				event.stop_propagation();
				inner.set_open(false);
				inner.dom.focus(inner.trigger);
			}
		});
		listeners.bind(root, "focusout", &inner, Inner::on_focus_out);
		listeners.bind(root, "focusin", &inner, |inner, _| inner.blur.cancel());

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

impl_widget!(Popover, WidgetKind::Popover);

impl Inner {
	fn set_open(&self, open: bool) {
		self.blur.cancel();
		if self.open.replace(open) == open {
			return;
		}
		self.dom.set_hidden(self.panel, !open);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(open));
		let kind = if open { OPEN } else { CLOSE };
		events::emit(self.dom.as_ref(), self.root, kind, "");
	}

	fn on_focus_out(self: &Rc<Self>, event: &DomEvent) {
		if !self.open.get() || is_inside(self.dom.as_ref(), self.root, event.related_target()) {
			return;
		}
		let weak = Rc::downgrade(self);
		self.blur.schedule(move || {
			if let Some(inner) = weak.upgrade()
				&& !is_inside(inner.dom.as_ref(), inner.root, inner.dom.active_element())
			{
				inner.set_open(false);
			}
		});
	}
}
