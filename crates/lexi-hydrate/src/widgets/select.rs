//! Select: a button-triggered listbox with a hidden form value
//!
//! ```html
//! <div data-widget="select">
//!   <button data-part="trigger"><span data-part="label">Language</span></button>
//!   <ul data-part="results" role="listbox" hidden>
//!     <li data-part="item" data-value="fr">French</li>
//!     <li data-part="item" data-value="de">German</li>
//!   </ul>
//!   <input data-part="hidden" type="hidden" name="language">
//! </div>
//! ```
//!
//! While closed, arrows, Enter and Space open the list with nothing
//! highlighted. Typing a character opens it and jumps to the next item whose
//! label starts with that character, compared ASCII case-insensitively;
//! repeating the character cycles through the matches. Committing writes the
//! value into `hidden`, the label into `label` and dispatches `select`.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::text::starts_with_ignore_ascii_case;
use lexi_core::{Debouncer, ListNav, NavKey, NavOutcome, NavPolicy};

use super::{WidgetKind, bool_attr, impl_widget, is_inside, item_value, part, parts, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, ListenerSet, SELECT};
use crate::listbox::Listbox;

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	trigger: NodeId,
	label: Option<NodeId>,
	hidden: NodeId,
	results: NodeId,
	listbox: RefCell<Listbox>,
	nav: RefCell<ListNav>,
	blur: Debouncer,
}

/// A hydrated `select` root.
pub struct Select {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Select {
	/// Hydrates `root`. Requires `trigger`, `results` and `hidden` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let kind = WidgetKind::Select;
		let dom = Rc::clone(ctx.dom());
		let trigger = require_part(dom.as_ref(), root, kind, "trigger")?;
		let results = require_part(dom.as_ref(), root, kind, "results")?;
		let hidden = require_part(dom.as_ref(), root, kind, "hidden")?;

		let mut listbox = Listbox::new(Rc::clone(&dom), results);
		listbox.set_items(parts(dom.as_ref(), root, "item"));
		let mut nav = ListNav::new(NavPolicy::Clamp);
		nav.replace_with_disabled(listbox.disabled_flags());
		dom.set_hidden(results, true);
		dom.set_attribute(trigger, "aria-expanded", bool_attr(false));
		dom.set_attribute(trigger, "aria-haspopup", "listbox");

		let inner = Rc::new(Inner {
			label: part(dom.as_ref(), root, "label"),
			blur: Debouncer::new(Rc::clone(ctx.scheduler()), ctx.settings().blur_close_ms),
			dom: Rc::clone(&dom),
			root,
			trigger,
			hidden,
			results,
			listbox: RefCell::new(listbox),
			nav: RefCell::new(nav),
		});

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(trigger, "click", &inner, |inner, _| {
			if inner.nav.borrow().is_open() {
				inner.close();
			} else {
				inner.open();
			}
		});
		listeners.bind(root, "keydown", &inner, Inner::on_key);
		listeners.bind(results, "click", &inner, |inner, event| {
			let index = inner.listbox.borrow().index_of(event.target());
			if let Some(index) = index {
				inner.commit(index);
			}
		});
		listeners.bind(results, "mouseover", &inner, |inner, event| {
			let index = inner.listbox.borrow().index_of(event.target());
			if let Some(index) = index {
				let outcome = inner.nav.borrow_mut().hover(index);
				inner.apply(outcome);
			}
		});
		listeners.bind(root, "focusout", &inner, Inner::on_focus_out);
		listeners.bind(root, "focusin", &inner, |inner, _| inner.blur.cancel());

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the list is open.
	pub fn is_open(&self) -> bool {
		self.inner.nav.borrow().is_open()
	}

	/// Highlighted item.
	pub fn highlighted(&self) -> Option<usize> {
		self.inner.nav.borrow().index()
	}

	/// Committed value.
	pub fn value(&self) -> String {
		self.inner.dom.value(self.inner.hidden)
	}
}

impl_widget!(Select, WidgetKind::Select);

/// A single printable character key, such as `"g"`.
fn typed_char(key: &str) -> Option<&str> {
	let mut chars = key.chars();
	match (chars.next(), chars.next()) {
		(Some(c), None) if !c.is_whitespace() && !c.is_control() => Some(key),
		_ => None,
	}
}

impl Inner {
	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(name) = event.key_name() else {
			return;
		};
		let open = self.nav.borrow().is_open();

		if let Some(typed) = typed_char(name) {
			event.prevent_default();
			if !open {
				self.open();
			}
			self.jump(typed);
			return;
		}
		if name == " " {
			event.prevent_default();
			let highlighted = self.nav.borrow().index();
			match highlighted {
				Some(index) if open => self.commit(index),
				_ => self.open(),
			}
			return;
		}

		let Some(key) = NavKey::from_key(name, false) else {
			return;
		};
		if !open {
			if key != NavKey::Escape {
				event.prevent_default();
				self.open();
			}
			return;
		}
		match key {
			NavKey::Escape => {
				event.stop_propagation();
				self.close();
				self.dom.focus(self.trigger);
			}
			NavKey::Enter => {
				event.prevent_default();
				let outcome = self.nav.borrow_mut().enter();
				if let NavOutcome::Commit(index) = outcome {
					self.commit(index);
				}
			}
			_ => {
				event.prevent_default();
				let outcome = self.nav.borrow_mut().handle_key(key);
				self.apply(outcome);
			}
		}
	}

	/// Moves to the next item after the highlight whose label starts with `typed`.
	fn jump(&self, typed: &str) {
		let target = {
			let nav = self.nav.borrow();
			let listbox = self.listbox.borrow();
			let count = listbox.len();
			let start = nav.index().map_or(0, |index| index + 1);
			(0..count).map(|offset| (start + offset) % count).find(|&index| {
				nav.is_enabled(index)
					&& listbox.item(index).is_some_and(|item| {
						let label = self.dom.text(item);
						starts_with_ignore_ascii_case(label.trim().as_bytes(), typed.as_bytes())
					})
			})
		};
		if let Some(index) = target {
			let outcome = self.nav.borrow_mut().select(Some(index));
			self.apply(outcome);
		}
	}

	fn apply(&self, outcome: NavOutcome) {
		if let NavOutcome::Moved { to, .. } = outcome {
			self.listbox.borrow_mut().highlight(to);
		}
	}

	fn open(&self) {
		if self.nav.borrow_mut().open() != NavOutcome::Opened {
			return;
		}
		self.dom.set_hidden(self.results, false);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(true));
	}

	fn close(&self) {
		self.blur.cancel();
		self.nav.borrow_mut().close();
		self.listbox.borrow_mut().highlight(None);
		self.dom.set_hidden(self.results, true);
		self.dom
			.set_attribute(self.trigger, "aria-expanded", bool_attr(false));
	}

	fn commit(&self, index: usize) {
		if self.nav.borrow_mut().commit(index) != NavOutcome::Commit(index) {
			return;
		}
		let Some(item) = self.listbox.borrow().item(index) else {
			return;
		};
		let value = item_value(self.dom.as_ref(), item);
		let label = self.dom.text(item).trim().to_string();
		self.dom.set_value(self.hidden, &value);
		if let Some(node) = self.label {
			self.dom.set_text(node, &label);
		}
		self.close();
		self.dom.focus(self.trigger);
		events::emit(self.dom.as_ref(), self.root, SELECT, &value);
	}

	fn on_focus_out(self: &Rc<Self>, event: &DomEvent) {
		if !self.nav.borrow().is_open()
			|| is_inside(self.dom.as_ref(), self.root, event.related_target())
		{
			return;
		}
		let weak = Rc::downgrade(self);
		self.blur.schedule(move || {
			if let Some(inner) = weak.upgrade()
				&& !is_inside(inner.dom.as_ref(), inner.root, inner.dom.active_element())
			{
				inner.close();
			}
		});
	}
}
