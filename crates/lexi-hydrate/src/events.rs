//! Custom events and listener ownership
//!
//! Composed widgets talk to each other only through the custom events named
//! here. The names and payload formats are a wire contract with existing
//! markup and stylesheets and must not change.
//!
//! | Event | Payload |
//! |-------|---------|
//! | [`LOOKUP_SELECT`] | selected value |
//! | [`MULTISELECT_LOOKUP_SELECT`] | selected value |
//! | [`SEARCH_RESULT_CLICK`] | selected value |
//! | [`SUBMIT`] | raw query text |
//! | [`TABLE_SORT_CHANGE`] | `columnId:asc` or `columnId:desc` |
//! | [`TABLE_PAGE_CHANGE`] | page number |
//! | [`TABLE_SELECTION_CHANGE`] | comma-joined row ids |
//! | [`TOGGLE_BUTTON_UPDATE`] | `"true"` or `"false"` |
//! | [`MENU_ITEM_SELECT`] | item value |
//! | [`SELECT`] | selected value |
//! | [`OPEN`] / [`CLOSE`] | widget-specific hint, often empty |
//! | [`CHIP_REMOVE`] | removed chip id |

use std::fmt;
use std::rc::{Rc, Weak};

use crate::dom::{Dom, DomEvent, ListenerId, NodeId};

/// A lookup committed a suggestion.
pub const LOOKUP_SELECT: &str = "lookup-select";
/// A multiselect lookup added a chip.
pub const MULTISELECT_LOOKUP_SELECT: &str = "multiselect-lookup-select";
/// A typeahead committed a suggestion.
pub const SEARCH_RESULT_CLICK: &str = "search-result-click";
/// A free-text query was submitted.
pub const SUBMIT: &str = "submit";
/// A table column sort changed.
pub const TABLE_SORT_CHANGE: &str = "table-sort-change";
/// A table page changed.
pub const TABLE_PAGE_CHANGE: &str = "table-page-change";
/// The set of selected table rows changed.
pub const TABLE_SELECTION_CHANGE: &str = "table-selection-change";
/// A toggle button changed its pressed state.
pub const TOGGLE_BUTTON_UPDATE: &str = "toggle-button-update";
/// A menu item was chosen.
pub const MENU_ITEM_SELECT: &str = "menu-item-select";
/// A select or combobox committed a value.
pub const SELECT: &str = "select";
/// A widget opened, or is asked to open.
pub const OPEN: &str = "open";
/// A widget closed, or is asked to close.
pub const CLOSE: &str = "close";
/// A chip was removed from a multiselect lookup.
pub const CHIP_REMOVE: &str = "chip-remove";

/// Dispatches a bubbling custom event from `target`.
///
/// Returns `false` when a listener canceled it.
pub fn emit(dom: &dyn Dom, target: NodeId, kind: &str, detail: &str) -> bool {
	dom.dispatch(&DomEvent::custom(kind, target, detail))
}

/// Dispatches a bubbling, cancelable custom event from `target`.
///
/// Returns `false` when a listener canceled it.
pub fn emit_cancelable(dom: &dyn Dom, target: NodeId, kind: &str, detail: &str) -> bool {
	dom.dispatch(&DomEvent::custom(kind, target, detail).cancelable(true))
}

/// Sends a non-bubbling request event (such as [`OPEN`]) to one widget root.
pub fn request(dom: &dyn Dom, target: NodeId, kind: &str, detail: &str) {
	dom.dispatch(&DomEvent::custom(kind, target, detail).bubbles(false));
}

/// Listeners owned by one widget instance.
///
/// Handlers hold the widget state weakly, so the document never keeps a
/// widget alive. Dropping the set removes every listener it registered.
pub struct ListenerSet {
	dom: Rc<dyn Dom>,
	ids: Vec<ListenerId>,
}

impl ListenerSet {
	/// Creates an empty set.
	pub fn new(dom: Rc<dyn Dom>) -> Self {
		Self {
			dom,
			ids: Vec::new(),
		}
	}

	/// Registers `handler` for `kind` on `node`, bound to `state`.
	///
	/// The handler is skipped once `state` has been dropped.
	pub fn bind<T, F>(&mut self, node: NodeId, kind: &str, state: &Rc<T>, handler: F)
	where
		T: 'static,
		F: Fn(&Rc<T>, &DomEvent) + 'static,
	{
		let weak: Weak<T> = Rc::downgrade(state);
		let id = self.dom.listen(
			node,
			kind,
			Rc::new(move |event: &DomEvent| {
				if let Some(state) = weak.upgrade() {
					handler(&state, event);
				}
			}),
		);
		self.ids.push(id);
	}

	/// Number of registered listeners.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Removes every listener.
	pub fn clear(&mut self) {
		for id in self.ids.drain(..) {
			self.dom.unlisten(id);
		}
	}
}

impl Drop for ListenerSet {
	fn drop(&mut self) {
		self.clear();
	}
}

impl fmt::Debug for ListenerSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ListenerSet")
			.field("listeners", &self.ids.len())
			.finish()
	}
}
