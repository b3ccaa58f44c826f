//! Menu: a static list of actions
//!
//! Items are the `item` parts. Navigation wraps at both ends. Enter, Space or
//! a click on an item dispatches `menu-item-select` with the item's value
//! (`data-value`, else its text) and closes the navigation state.
//!
//! A menu accepts a non-bubbling `open` request whose detail is `first` or
//! `last`; it highlights and focuses that item. Escape while navigating
//! dispatches `close`, which an enclosing menu button uses to hide it.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::{ListNav, NavKey, NavOutcome, NavPolicy, NavState};

use super::{WidgetKind, impl_widget, item_value, parts};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, CLOSE, ListenerSet, MENU_ITEM_SELECT, OPEN};
use crate::listbox::Listbox;

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	listbox: RefCell<Listbox>,
	nav: RefCell<ListNav>,
}

/// A hydrated `menu` root.
pub struct Menu {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Menu {
	/// Hydrates `root`. A menu without items is valid and inert.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let items = parts(dom.as_ref(), root, "item");
		for &item in &items {
			if !dom.has_attribute(item, "tabindex") {
				dom.set_attribute(item, "tabindex", "-1");
			}
		}
		let mut listbox = Listbox::new(Rc::clone(&dom), root);
		listbox.set_items(items);
		let mut nav = ListNav::new(NavPolicy::Wrap);
		nav.replace_with_disabled(listbox.disabled_flags());

		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			root,
			listbox: RefCell::new(listbox),
			nav: RefCell::new(nav),
		});

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(root, "keydown", &inner, Inner::on_key);
		listeners.bind(root, "click", &inner, |inner, event| {
			if let Some(index) = inner.index_of(event.target()) {
				inner.nav.borrow_mut().open();
				inner.commit(index);
			}
		});
		listeners.bind(root, "mouseover", &inner, |inner, event| {
			if let Some(index) = inner.index_of(event.target()) {
				let outcome = inner.nav.borrow_mut().hover(index);
				inner.apply(outcome, false);
			}
		});
		listeners.bind(root, "focusin", &inner, |inner, _| {
			inner.nav.borrow_mut().open();
		});
		listeners.bind(root, OPEN, &inner, |inner, event| {
			if event.target() == inner.root {
				inner.open_at(event.detail().unwrap_or_default());
			}
		});

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Navigation state.
	pub fn state(&self) -> NavState {
		self.inner.nav.borrow().state()
	}

	/// Highlighted item.
	pub fn highlighted(&self) -> Option<usize> {
		self.inner.nav.borrow().index()
	}
}

impl_widget!(Menu, WidgetKind::Menu);

impl Inner {
	fn index_of(&self, node: NodeId) -> Option<usize> {
		self.listbox.borrow().index_of(node)
	}

	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(name) = event.key_name() else {
			return;
		};
		if name == " " {
			event.prevent_default();
			let index = self.nav.borrow().index();
			if let Some(index) = index {
				self.commit(index);
			}
			return;
		}
		let Some(key) = NavKey::from_key(name, false) else {
			return;
		};
		match key {
			NavKey::Escape => {
				if self.nav.borrow_mut().close() == NavOutcome::Closed {
					self.listbox.borrow_mut().highlight(None);
					event.stop_propagation();
					events::emit(self.dom.as_ref(), self.root, CLOSE, "");
				}
			}
			NavKey::Enter => {
				event.prevent_default();
				let index = self.nav.borrow().index();
				if let Some(index) = index {
					self.commit(index);
				}
			}
			_ => {
				event.prevent_default();
				let outcome = {
					let mut nav = self.nav.borrow_mut();
					nav.open();
					nav.handle_key(key)
				};
				self.apply(outcome, true);
			}
		}
	}

	fn open_at(&self, detail: &str) {
		let outcome = {
			let mut nav = self.nav.borrow_mut();
			nav.open();
			match detail {
				"last" => nav.last(),
				"first" => nav.first(),
				_ => NavOutcome::Unchanged,
			}
		};
		self.apply(outcome, true);
	}

	fn apply(&self, outcome: NavOutcome, focus: bool) {
		if let NavOutcome::Moved { to, .. } = outcome {
			let target = {
				let mut listbox = self.listbox.borrow_mut();
				listbox.highlight(to);
				listbox.highlighted()
			};
			if focus && let Some(target) = target {
				self.dom.focus(target);
			}
		}
	}

	fn commit(&self, index: usize) {
		if self.nav.borrow_mut().commit(index) != NavOutcome::Commit(index) {
			return;
		}
		let item = {
			let mut listbox = self.listbox.borrow_mut();
			listbox.highlight(None);
			listbox.item(index)
		};
		if let Some(item) = item {
			let value = item_value(self.dom.as_ref(), item);
			events::emit(self.dom.as_ref(), self.root, MENU_ITEM_SELECT, &value);
		}
	}
}
