//! Combobox: an input filtering a static list
//!
//! Typing hides every `item` whose text does not contain the query, compared
//! ASCII case-insensitively. Arrows move a clamped highlight over the visible
//! items. Committing copies the item label into the input and dispatches
//! `select` with its value; Enter with nothing highlighted dispatches
//! `submit` with the typed text instead. A `menu-item-select` bubbling up
//! from a nested menu is adopted as if its value had been committed.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::text::{contains_ignore_ascii_case, trim_str};
use lexi_core::{Debouncer, ListNav, NavKey, NavOutcome, NavPolicy};

use super::{WidgetKind, bool_attr, impl_widget, is_inside, item_value, part, parts, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, ListenerSet, MENU_ITEM_SELECT, SELECT, SUBMIT};
use crate::listbox::{self, Listbox};

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	input: NodeId,
	results: NodeId,
	empty: Option<NodeId>,
	all: Vec<NodeId>,
	listbox: RefCell<Listbox>,
	nav: RefCell<ListNav>,
	blur: Debouncer,
}

/// A hydrated `combobox` root.
pub struct Combobox {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Combobox {
	/// Hydrates `root`. Requires `input` and `results` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let kind = WidgetKind::Combobox;
		let dom = Rc::clone(ctx.dom());
		let input = require_part(dom.as_ref(), root, kind, "input")?;
		let results = require_part(dom.as_ref(), root, kind, "results")?;
		dom.set_attribute(input, "aria-expanded", bool_attr(false));
		dom.set_hidden(results, true);

		let inner = Rc::new(Inner {
			empty: part(dom.as_ref(), root, "empty"),
			all: parts(dom.as_ref(), root, "item"),
			listbox: RefCell::new(Listbox::new(Rc::clone(&dom), results)),
			nav: RefCell::new(ListNav::new(NavPolicy::Clamp).with_free_text(true)),
			blur: Debouncer::new(Rc::clone(ctx.scheduler()), ctx.settings().blur_close_ms),
			dom: Rc::clone(&dom),
			root,
			input,
			results,
		});
		inner.filter(false);

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(input, "input", &inner, |inner, _| inner.filter(true));
		listeners.bind(input, "keydown", &inner, Inner::on_key);
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
		listeners.bind(root, MENU_ITEM_SELECT, &inner, |inner, event| {
			if let Some(value) = event.detail() {
				inner.adopt(value);
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

	/// Number of items matching the current text.
	pub fn visible_count(&self) -> usize {
		self.inner.listbox.borrow().len()
	}
}

impl_widget!(Combobox, WidgetKind::Combobox);

impl Inner {
	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(key) = event.key_name().and_then(|key| NavKey::from_key(key, false)) else {
			return;
		};
		let open = self.nav.borrow().is_open();
		match key {
			NavKey::Down | NavKey::Up if !open => {
				event.prevent_default();
				self.filter(true);
			}
			NavKey::Down | NavKey::Up => {
				event.prevent_default();
				let outcome = self.nav.borrow_mut().handle_key(key);
				self.apply(outcome);
			}
			NavKey::Enter => {
				event.prevent_default();
				let outcome = self.nav.borrow_mut().enter();
				match outcome {
					NavOutcome::Commit(index) => self.commit(index),
					NavOutcome::SubmitRaw => self.submit(),
					_ => {}
				}
			}
			NavKey::Escape if open => {
				event.stop_propagation();
				self.close();
			}
			NavKey::Escape | NavKey::Home | NavKey::End => {}
		}
	}

	/// Shows the items matching the input. Opens the list when `open` is set.
	fn filter(&self, open: bool) {
		let query = self.dom.value(self.input);
		let query = trim_str(&query);
		let visible: Vec<NodeId> = self
			.all
			.iter()
			.copied()
			.filter(|&item| {
				let matched = contains_ignore_ascii_case(self.dom.text(item).as_bytes(), query.as_bytes());
				self.dom.set_hidden(item, !matched);
				matched
			})
			.collect();
		let disabled = visible
			.iter()
			.map(|&item| listbox::is_disabled(self.dom.as_ref(), item))
			.collect();
		let empty = visible.is_empty();
		self.listbox.borrow_mut().set_items(visible);
		self.nav.borrow_mut().replace_with_disabled(disabled);

		if !open {
			return;
		}
		self.nav.borrow_mut().open();
		self.dom.set_hidden(self.results, empty);
		if let Some(node) = self.empty {
			self.dom.set_hidden(node, !empty);
		}
		self.dom
			.set_attribute(self.input, "aria-expanded", bool_attr(true));
	}

	fn apply(&self, outcome: NavOutcome) {
		if let NavOutcome::Moved { to, .. } = outcome {
			self.listbox.borrow_mut().highlight(to);
		}
	}

	fn close(&self) {
		self.blur.cancel();
		self.nav.borrow_mut().close();
		self.listbox.borrow_mut().highlight(None);
		self.dom.set_hidden(self.results, true);
		if let Some(node) = self.empty {
			self.dom.set_hidden(node, true);
		}
		self.dom
			.set_attribute(self.input, "aria-expanded", bool_attr(false));
	}

	fn commit(&self, index: usize) {
		if self.nav.borrow_mut().commit(index) != NavOutcome::Commit(index) {
			return;
		}
		let Some(item) = self.listbox.borrow().item(index) else {
			return;
		};
		let value = item_value(self.dom.as_ref(), item);
		self.dom.set_value(self.input, self.dom.text(item).trim());
		self.close();
		events::emit(self.dom.as_ref(), self.root, SELECT, &value);
	}

	fn submit(&self) {
		self.close();
		let query = self.dom.value(self.input);
		let query = query.trim();
		if !query.is_empty() {
			events::emit(self.dom.as_ref(), self.root, SUBMIT, query);
		}
	}

	fn adopt(&self, value: &str) {
		self.dom.set_value(self.input, value);
		self.close();
		events::emit(self.dom.as_ref(), self.root, SELECT, value);
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
