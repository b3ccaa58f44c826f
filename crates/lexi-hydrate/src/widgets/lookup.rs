//! Lookup: pick one record through a search
//!
//! Committing a suggestion writes its label into the input and its id into
//! the `hidden` part, then dispatches `lookup-select` with the value. Typing
//! invalidates the stored id. Escape restores the last committed label and id.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::{NavKey, ResultItem};

use super::suggest::{Entered, SearchBox};
use super::{WidgetKind, impl_widget, require_part};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, LOOKUP_SELECT, ListenerSet};

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	hidden: NodeId,
	search: Rc<SearchBox>,
	/// Label and id of the last commit
	committed: RefCell<(String, String)>,
}

/// A hydrated `lookup` root.
pub struct Lookup {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Lookup {
	/// Hydrates `root`. Requires `input`, `results` and `hidden` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let hidden = require_part(dom.as_ref(), root, WidgetKind::Lookup, "hidden")?;
		let search = SearchBox::new(ctx, WidgetKind::Lookup, root, false)?;
		let id = dom.value(hidden);
		let committed = if id.is_empty() {
			(String::new(), id)
		} else {
			(search.query(), id)
		};
		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			root,
			hidden,
			search,
			committed: RefCell::new(committed),
		});

		let mut listeners = ListenerSet::new(dom);
		inner.search.bind(&mut listeners);
		listeners.bind(inner.search.input(), "input", &inner, |inner, _| {
			inner.dom.set_value(inner.hidden, "");
		});
		listeners.bind(inner.search.input(), "keydown", &inner, Inner::on_key);
		listeners.bind(inner.search.results(), "click", &inner, |inner, event| {
			if let Some(item) = inner.search.commit_at(event.target()) {
				inner.select(&item);
			}
		});

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Id stored in the hidden field.
	pub fn selected_id(&self) -> String {
		self.inner.dom.value(self.inner.hidden)
	}
}

impl_widget!(Lookup, WidgetKind::Lookup);

impl Inner {
	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(key) = event.key_name().and_then(|key| NavKey::from_key(key, false)) else {
			return;
		};
		match key {
			NavKey::Down | NavKey::Up => {
				if self.search.arrow(key) {
					event.prevent_default();
				}
			}
			NavKey::Enter => {
				if !self.search.is_open() {
					return;
				}
				event.prevent_default();
				if let Entered::Commit(item) = self.search.enter() {
					self.select(&item);
				}
			}
			NavKey::Escape => {
				if self.search.escape() {
					let (label, id) = self.committed.borrow().clone();
					self.search.set_query(&label);
					self.dom.set_value(self.hidden, &id);
					event.prevent_default();
					event.stop_propagation();
				}
			}
			NavKey::Home | NavKey::End => {}
		}
	}

	fn select(&self, item: &ResultItem) {
		let id = item.id.to_string();
		self.search.set_query(&item.label);
		self.dom.set_value(self.hidden, &id);
		*self.committed.borrow_mut() = (item.label.clone(), id);
		events::emit(self.dom.as_ref(), self.root, LOOKUP_SELECT, &item.value);
	}
}
