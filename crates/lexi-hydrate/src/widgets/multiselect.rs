//! Multiselect lookup: pick several records as chips
//!
//! Each committed suggestion becomes a chip in the `chips` part:
//!
//! ```html
//! <span data-part="chip" data-id="5" data-value="café">
//!   café<button type="button" data-part="chip-remove" aria-label="Remove">×</button>
//! </span>
//! ```
//!
//! The `hidden` part holds the comma-joined chip ids. A suggestion whose id
//! is already chosen is ignored. Chips leave through their remove button,
//! Backspace in the empty input, or the optional `clear` part; each removal
//! dispatches `chip-remove` with the chip id. Chips already present in the
//! server markup are adopted.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::{NavKey, ResultItem};

use super::suggest::{Entered, SearchBox};
use super::{WidgetKind, impl_widget, item_value, part, parts, require_part};
use crate::builder::{button, span};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, CHIP_REMOVE, ListenerSet, MULTISELECT_LOOKUP_SELECT};
use crate::debug_log;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Chip {
	id: String,
	node: NodeId,
}

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	container: NodeId,
	hidden: NodeId,
	search: Rc<SearchBox>,
	chips: RefCell<Vec<Chip>>,
}

/// A hydrated `multiselect-lookup` root.
pub struct MultiselectLookup {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl MultiselectLookup {
	/// Hydrates `root`. Requires `input`, `results`, `chips` and `hidden` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let kind = WidgetKind::MultiselectLookup;
		let dom = Rc::clone(ctx.dom());
		let container = require_part(dom.as_ref(), root, kind, "chips")?;
		let hidden = require_part(dom.as_ref(), root, kind, "hidden")?;
		let search = SearchBox::new(ctx, kind, root, false)?;

		let chips = parts(dom.as_ref(), root, "chip")
			.into_iter()
			.map(|node| Chip {
				id: dom
					.attribute(node, "data-id")
					.unwrap_or_else(|| item_value(dom.as_ref(), node)),
				node,
			})
			.collect();
		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			root,
			container,
			hidden,
			search,
			chips: RefCell::new(chips),
		});
		inner.sync_hidden();

		let mut listeners = ListenerSet::new(dom.clone());
		inner.search.bind(&mut listeners);
		listeners.bind(inner.search.input(), "keydown", &inner, Inner::on_key);
		listeners.bind(inner.search.results(), "click", &inner, |inner, event| {
			if let Some(item) = inner.search.commit_at(event.target()) {
				inner.add(&item);
			}
		});
		listeners.bind(container, "click", &inner, |inner, event| {
			let dom = inner.dom.as_ref();
			if dom.closest(event.target(), r#"[data-part="chip-remove"]"#).is_none() {
				return;
			}
			if let Some(chip) = dom.closest(event.target(), r#"[data-part="chip"]"#) {
				inner.remove_node(chip);
			}
		});
		if let Some(clear) = part(dom.as_ref(), root, "clear") {
			listeners.bind(clear, "click", &inner, |inner, _| inner.clear());
		}

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Ids of the chosen chips, in order.
	pub fn selected_ids(&self) -> Vec<String> {
		self.inner.ids()
	}
}

impl_widget!(MultiselectLookup, WidgetKind::MultiselectLookup);

/// Identity of a suggestion: its id, or its value when the id is missing.
fn chip_id(item: &ResultItem) -> String {
	if item.id == 0 {
		item.value.clone()
	} else {
		item.id.to_string()
	}
}

impl Inner {
	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(name) = event.key_name() else {
			return;
		};
		if name == "Backspace" {
			if self.search.query().is_empty() {
				self.remove_last();
			}
			return;
		}
		let Some(key) = NavKey::from_key(name, false) else {
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
					self.add(&item);
				}
			}
			NavKey::Escape => {
				if self.search.escape() {
					self.search.set_query("");
					event.prevent_default();
					event.stop_propagation();
				}
			}
			NavKey::Home | NavKey::End => {}
		}
	}

	fn ids(&self) -> Vec<String> {
		self.chips
			.borrow()
			.iter()
			.map(|chip| chip.id.clone())
			.collect()
	}

	fn sync_hidden(&self) {
		self.dom.set_value(self.hidden, &self.ids().join(","));
	}

	fn add(&self, item: &ResultItem) {
		self.search.set_query("");
		let id = chip_id(item);
		if self.chips.borrow().iter().any(|chip| chip.id == id) {
			debug_log!("chip {} already chosen", id);
			return;
		}
		let node = span()
			.part("chip")
			.class("lexi-chip")
			.data("id", &id)
			.data("value", &item.value)
			.text(&item.label)
			.child(
				button()
					.part("chip-remove")
					.attr("type", "button")
					.attr("aria-label", &format!("Remove {}", item.label))
					.text("×"),
			)
			.mount(self.dom.as_ref(), self.container);
		self.chips.borrow_mut().push(Chip { id, node });
		self.sync_hidden();
		events::emit(
			self.dom.as_ref(),
			self.root,
			MULTISELECT_LOOKUP_SELECT,
			&item.value,
		);
	}

	fn remove_node(&self, node: NodeId) {
		let position = self.chips.borrow().iter().position(|chip| chip.node == node);
		if let Some(position) = position {
			self.remove_at(position);
		}
	}

	fn remove_last(&self) {
		let len = self.chips.borrow().len();
		if let Some(last) = len.checked_sub(1) {
			self.remove_at(last);
		}
	}

	fn remove_at(&self, position: usize) {
		let chip = self.chips.borrow_mut().remove(position);
		self.dom.remove(chip.node);
		self.sync_hidden();
		events::emit(self.dom.as_ref(), self.root, CHIP_REMOVE, &chip.id);
	}

	fn clear(&self) {
		while !self.chips.borrow().is_empty() {
			self.remove_last();
		}
		self.search.set_query("");
		self.search.clear();
	}
}
