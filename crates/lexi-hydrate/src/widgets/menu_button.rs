//! Menu button: a trigger that shows a nested menu
//!
//! ```html
//! <div data-widget="menu-button">
//!   <button data-part="trigger" aria-haspopup="menu">Actions</button>
//!   <ul data-widget="menu" role="menu" hidden>
//!     <li data-part="item" role="menuitem" data-value="rename">Rename</li>
//!   </ul>
//! </div>
//! ```
//!
//! Clicking the trigger toggles the menu. ArrowDown, Enter and Space open it
//! on the first item, ArrowUp on the last. The menu closes when it reports
//! `menu-item-select` or `close`, returning focus to the trigger, and when
//! focus leaves the widget.

use std::cell::Cell;
use std::rc::Rc;

use lexi_core::Debouncer;

use super::{WidgetKind, bool_attr, impl_widget, is_inside, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::{HydrateError, Result};
use crate::events::{self, CLOSE, ListenerSet, MENU_ITEM_SELECT, OPEN};

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	trigger: NodeId,
	menu: NodeId,
	open: Cell<bool>,
	blur: Debouncer,
}

/// A hydrated `menu-button` root.
pub struct MenuButton {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl MenuButton {
	/// Hydrates `root`. Requires a `trigger` part and a nested menu widget.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let trigger = require_part(dom.as_ref(), root, WidgetKind::MenuButton, "trigger")?;
		let menu = dom
			.query(root, r#"[data-widget="menu"]"#)
			.ok_or(HydrateError::MissingPart {
				widget: WidgetKind::MenuButton,
				part: "menu",
			})?;
		let inner = Rc::new(Inner {
			open: Cell::new(!dom.is_hidden(menu)),
			blur: Debouncer::new(Rc::clone(ctx.scheduler()), ctx.settings().blur_close_ms),
			dom: Rc::clone(&dom),
			root,
			trigger,
			menu,
		});
		dom.set_attribute(trigger, "aria-haspopup", "menu");
		dom.set_attribute(trigger, "aria-expanded", bool_attr(inner.open.get()));

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(trigger, "click", &inner, |inner, _| {
			if inner.open.get() {
				inner.hide(false);
			} else {
				inner.show("first");
			}
		});
		listeners.bind(trigger, "keydown", &inner, |inner, event| {
			let edge = match event.key_name() {
				Some("ArrowDown" | "Enter" | " ") => "first",
				Some("ArrowUp") => "last",
				_ => return,
			};
			event.prevent_default();
			inner.show(edge);
		});
		listeners.bind(root, MENU_ITEM_SELECT, &inner, |inner, _| inner.hide(true));
		listeners.bind(root, CLOSE, &inner, |inner, event| {
			if event.target() == inner.menu {
				inner.hide(true);
			}
		});
		listeners.bind(root, "focusout", &inner, Inner::on_focus_out);
		listeners.bind(root, "focusin", &inner, |inner, _| inner.blur.cancel());

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the menu is shown.
	pub fn is_open(&self) -> bool {
		self.inner.open.get()
	}
}

impl_widget!(MenuButton, WidgetKind::MenuButton);

impl Inner {
	fn show(&self, edge: &str) {
		self.blur.cancel();
		if !self.open.replace(true) {
			self.dom.set_hidden(self.menu, false);
			self.dom
				.set_attribute(self.trigger, "aria-expanded", bool_attr(true));
		}
		events::request(self.dom.as_ref(), self.menu, OPEN, edge);
	}

	fn hide(&self, refocus: bool) {
		self.blur.cancel();
		if !self.open.replace(false) {
			return;
		}
		self.dom.set_hidden(self.menu, true);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(false));
		if refocus {
			self.dom.focus(self.trigger);
		}
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
				inner.hide(false);
			}
		});
	}
}
