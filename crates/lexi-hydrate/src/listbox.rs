//! Highlight rendering for one list of items
//!
//! [`Listbox`] is the DOM half of [`ListNav`](lexi_core::ListNav): it owns
//! the item nodes of a list and keeps exactly one of them (or none) in the
//! highlighted state:
//!
//! - the highlighted item has class `is-highlighted` and `aria-selected="true"`,
//! - every other item has `aria-selected="false"` and no highlight class.
//!
//! Replacing the items clears the old highlight unconditionally, even when
//! the old nodes are still attached.

use std::rc::Rc;

use crate::dom::{Dom, NodeId};

/// Class of the highlighted item.
pub const HIGHLIGHT_CLASS: &str = "is-highlighted";

/// Item nodes of one list plus the current highlight.
pub struct Listbox {
	dom: Rc<dyn Dom>,
	list: NodeId,
	items: Vec<NodeId>,
	highlighted: Option<NodeId>,
}

impl Listbox {
	/// Creates an empty listbox rendering into `list`.
	pub fn new(dom: Rc<dyn Dom>, list: NodeId) -> Self {
		Self {
			dom,
			list,
			items: Vec::new(),
			highlighted: None,
		}
	}

	/// The list element.
	pub fn list(&self) -> NodeId {
		self.list
	}

	/// Current items.
	pub fn items(&self) -> &[NodeId] {
		&self.items
	}

	/// Number of items.
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Returns true if there are no items.
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Item node at `index`.
	pub fn item(&self, index: usize) -> Option<NodeId> {
		self.items.get(index).copied()
	}

	/// Currently highlighted node.
	pub fn highlighted(&self) -> Option<NodeId> {
		self.highlighted
	}

	/// Index of the item containing `node` (the item itself or a descendant).
	pub fn index_of(&self, node: NodeId) -> Option<usize> {
		self.items
			.iter()
			.position(|&item| self.dom.contains(item, node))
	}

	/// Disabled flags read from `aria-disabled="true"`, `data-disabled` or
	/// `disabled` on each item.
	pub fn disabled_flags(&self) -> Vec<bool> {
		self.items
			.iter()
			.map(|&item| is_disabled(self.dom.as_ref(), item))
			.collect()
	}

	/// Replaces the items and clears any highlight.
	pub fn set_items(&mut self, items: Vec<NodeId>) {
		if let Some(previous) = self.highlighted.take() {
			self.unmark(previous);
		}
		for &item in &items {
			self.unmark(item);
		}
		self.items = items;
	}

	/// Highlights the item at `index`, or nothing with `None`.
	pub fn highlight(&mut self, index: Option<usize>) {
		let target = index.and_then(|i| self.item(i));
		if let Some(previous) = self.highlighted.take()
			&& Some(previous) != target
		{
			self.unmark(previous);
		}
		if let Some(target) = target {
			self.dom.add_class(target, HIGHLIGHT_CLASS);
			self.dom.set_attribute(target, "aria-selected", "true");
			self.scroll_into_view(target);
		}
		self.highlighted = target;
	}

	/// Scrolls the list by the minimum amount that shows `item` completely.
	pub fn scroll_into_view(&self, item: NodeId) {
		let list = self.dom.rect(self.list);
		let target = self.dom.rect(item);
		let top = self.dom.scroll_top(self.list);
		if target.top < list.top {
			self.dom.set_scroll_top(self.list, top - (list.top - target.top));
		} else if target.bottom() > list.bottom() {
			// an item taller than the list aligns to its top edge
			let delta = (target.bottom() - list.bottom()).min(target.top - list.top);
			self.dom.set_scroll_top(self.list, top + delta);
		}
	}

	fn unmark(&self, item: NodeId) {
		self.dom.remove_class(item, HIGHLIGHT_CLASS);
		self.dom.set_attribute(item, "aria-selected", "false");
	}
}

impl std::fmt::Debug for Listbox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Listbox")
			.field("list", &self.list)
			.field("items", &self.items.len())
			.field("highlighted", &self.highlighted)
			.finish()
	}
}

/// Whether an item is marked disabled.
pub fn is_disabled(dom: &dyn Dom, item: NodeId) -> bool {
	dom.attribute(item, "aria-disabled").as_deref() == Some("true")
		|| dom.has_attribute(item, "data-disabled")
		|| dom.has_attribute(item, "disabled")
}
