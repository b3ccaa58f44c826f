//! DOM scope handed to every widget
//!
//! Widgets never reach for `window` or `document` globals. They receive a
//! [`Dom`] and address nodes through copyable [`NodeId`] handles, which lets
//! the same widget code run against the browser ([`WebDom`], wasm only) and
//! against the in-memory tree used by tests ([`MemoryDom`]).
//!
//! ## Events
//!
//! Listeners receive a [`DomEvent`]. Native events (`click`, `keydown`,
//! `input`, `focusin`, ...) come from the browser or from test code; custom
//! events are created by widgets with [`DomEvent::custom`] and sent through
//! [`Dom::dispatch`]. A custom event carries its payload in
//! [`DomEvent::detail`] as a string.

mod memory;
mod selector;
#[cfg(target_arch = "wasm32")]
mod web;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

pub use memory::MemoryDom;
pub use selector::Selector;
#[cfg(target_arch = "wasm32")]
pub use web::WebDom;

/// Handle of one element inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
	/// Raw index, stable for the lifetime of the node.
	pub fn index(self) -> u32 {
		self.0
	}
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Handle of a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// Event listener callback.
pub type EventHandler = Rc<dyn Fn(&DomEvent) + 'static>;

/// Layout box in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
	/// Top edge.
	pub top: f64,
	/// Left edge.
	pub left: f64,
	/// Width.
	pub width: f64,
	/// Height.
	pub height: f64,
}

impl Rect {
	/// Creates a rect.
	pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
		Self {
			top,
			left,
			width,
			height,
		}
	}

	/// Bottom edge.
	pub fn bottom(&self) -> f64 {
		self.top + self.height
	}
}

/// An event as seen by listeners.
#[derive(Debug)]
pub struct DomEvent {
	kind: String,
	target: NodeId,
	key: Option<String>,
	detail: Option<String>,
	related_target: Option<NodeId>,
	bubbles: bool,
	cancelable: bool,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
}

impl DomEvent {
	/// Creates a bubbling, non-cancelable event.
	pub fn new(kind: impl Into<String>, target: NodeId) -> Self {
		Self {
			kind: kind.into(),
			target,
			key: None,
			detail: None,
			related_target: None,
			bubbles: true,
			cancelable: false,
			default_prevented: Cell::new(false),
			propagation_stopped: Cell::new(false),
		}
	}

	/// Creates a bubbling custom event carrying `detail`.
	pub fn custom(kind: impl Into<String>, target: NodeId, detail: impl Into<String>) -> Self {
		Self::new(kind, target).with_detail(detail)
	}

	/// Creates a `keydown` event.
	pub fn key(target: NodeId, key: impl Into<String>) -> Self {
		let mut event = Self::new("keydown", target).cancelable(true);
		event.key = Some(key.into());
		event
	}

	/// Sets the payload.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());
		self
	}

	/// Sets the related target (focus transitions).
	pub fn with_related_target(mut self, related: Option<NodeId>) -> Self {
		self.related_target = related;
		self
	}

	/// Sets whether the event bubbles.
	pub fn bubbles(mut self, bubbles: bool) -> Self {
		self.bubbles = bubbles;
		self
	}

	/// Sets whether listeners may cancel the event.
	pub fn cancelable(mut self, cancelable: bool) -> Self {
		self.cancelable = cancelable;
		self
	}

	/// Event type, e.g. `"click"` or `"menu-item-select"`.
	pub fn kind(&self) -> &str {
		&self.kind
	}

	/// Node the event was dispatched on.
	pub fn target(&self) -> NodeId {
		self.target
	}

	/// `KeyboardEvent.key` for key events.
	pub fn key_name(&self) -> Option<&str> {
		self.key.as_deref()
	}

	/// Custom event payload.
	pub fn detail(&self) -> Option<&str> {
		self.detail.as_deref()
	}

	/// Node gaining (for `focusout`) or losing (for `focusin`) focus.
	pub fn related_target(&self) -> Option<NodeId> {
		self.related_target
	}

	/// Whether the event bubbles.
	pub fn is_bubbling(&self) -> bool {
		self.bubbles
	}

	/// Whether the event may be canceled.
	pub fn is_cancelable(&self) -> bool {
		self.cancelable
	}

	/// Cancels the default action. Ignored on non-cancelable events.
	pub fn prevent_default(&self) {
		if self.cancelable {
			self.default_prevented.set(true);
		}
	}

	/// Whether a listener canceled the default action.
	pub fn is_default_prevented(&self) -> bool {
		self.default_prevented.get()
	}

	/// Stops the event from reaching further ancestors.
	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true);
	}

	/// Whether propagation was stopped.
	pub fn is_propagation_stopped(&self) -> bool {
		self.propagation_stopped.get()
	}
}

/// Operations widgets perform on the document.
///
/// Implementations must not hold internal borrows while invoking listeners:
/// listeners are free to call back into the DOM, including registering new
/// listeners or dispatching further events.
pub trait Dom {
	/// The document element (`<html>`). Document-level listeners go here.
	fn document(&self) -> NodeId;

	/// Descendants of `scope` matching `selector`, in document order.
	fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;

	/// First descendant of `scope` matching `selector`.
	fn query(&self, scope: NodeId, selector: &str) -> Option<NodeId> {
		self.query_all(scope, selector).into_iter().next()
	}

	/// Whether `node` itself matches `selector`.
	fn matches(&self, node: NodeId, selector: &str) -> bool;

	/// Nearest inclusive ancestor of `node` matching `selector`.
	fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
		let mut current = Some(node);
		while let Some(candidate) = current {
			if self.matches(candidate, selector) {
				return Some(candidate);
			}
			current = self.parent(candidate);
		}
		None
	}

	/// Parent element.
	fn parent(&self, node: NodeId) -> Option<NodeId>;

	/// Child elements.
	fn children(&self, node: NodeId) -> Vec<NodeId>;

	/// Whether `node` is `ancestor` or one of its descendants.
	fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		let mut current = Some(node);
		while let Some(candidate) = current {
			if candidate == ancestor {
				return true;
			}
			current = self.parent(candidate);
		}
		false
	}

	/// Lowercase tag name.
	fn tag_name(&self, node: NodeId) -> String;

	/// Attribute value.
	fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

	/// Sets an attribute.
	fn set_attribute(&self, node: NodeId, name: &str, value: &str);

	/// Removes an attribute.
	fn remove_attribute(&self, node: NodeId, name: &str);

	/// Whether the attribute is present.
	fn has_attribute(&self, node: NodeId, name: &str) -> bool {
		self.attribute(node, name).is_some()
	}

	/// Whether the class list contains `class`.
	fn has_class(&self, node: NodeId, class: &str) -> bool;

	/// Adds a class.
	fn add_class(&self, node: NodeId, class: &str);

	/// Removes a class.
	fn remove_class(&self, node: NodeId, class: &str);

	/// Text content.
	fn text(&self, node: NodeId) -> String;

	/// Replaces the children with a text node.
	fn set_text(&self, node: NodeId, text: &str);

	/// Current value of a form control.
	fn value(&self, node: NodeId) -> String;

	/// Sets the value of a form control.
	fn set_value(&self, node: NodeId, value: &str);

	/// Checked state of a checkbox.
	fn checked(&self, node: NodeId) -> bool;

	/// Sets the checked state of a checkbox.
	fn set_checked(&self, node: NodeId, checked: bool);

	/// Creates a detached element.
	fn create_element(&self, tag: &str) -> NodeId;

	/// Appends `child`, detaching it from its previous parent.
	fn append_child(&self, parent: NodeId, child: NodeId);

	/// Detaches `node` from the tree. The ids of `node` and its descendants
	/// must not be used afterwards; an implementation may hand them out again.
	fn remove(&self, node: NodeId);

	/// Removes every child of `node`.
	fn clear_children(&self, node: NodeId) {
		for child in self.children(node) {
			self.remove(child);
		}
	}

	/// Moves focus to `node`.
	fn focus(&self, node: NodeId);

	/// Removes focus from `node` if it has it.
	fn blur(&self, node: NodeId);

	/// Focused element.
	fn active_element(&self) -> Option<NodeId>;

	/// Layout box.
	fn rect(&self, node: NodeId) -> Rect;

	/// Vertical scroll offset.
	fn scroll_top(&self, node: NodeId) -> f64;

	/// Sets the vertical scroll offset.
	fn set_scroll_top(&self, node: NodeId, top: f64);

	/// Registers a listener for events of `kind` reaching `node`.
	fn listen(&self, node: NodeId, kind: &str, handler: EventHandler) -> ListenerId;

	/// Removes a listener. Unknown ids are ignored.
	fn unlisten(&self, id: ListenerId);

	/// Dispatches `event` at its target.
	///
	/// Returns `false` when a listener canceled the event.
	fn dispatch(&self, event: &DomEvent) -> bool;

	/// Navigates the page to `url`.
	fn navigate(&self, url: &str);

	/// Shows or hides `node` via the `hidden` attribute.
	fn set_hidden(&self, node: NodeId, hidden: bool) {
		if hidden {
			self.set_attribute(node, "hidden", "");
		} else {
			self.remove_attribute(node, "hidden");
		}
	}

	/// Whether `node` carries the `hidden` attribute.
	fn is_hidden(&self, node: NodeId) -> bool {
		self.has_attribute(node, "hidden")
	}

	/// Adds or removes a class.
	fn toggle_class(&self, node: NodeId, class: &str, on: bool) {
		if on {
			self.add_class(node, class);
		} else {
			self.remove_class(node, class);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_prevent_default_requires_cancelable() {
		let event = DomEvent::new("click", NodeId(1));
		event.prevent_default();
		assert!(!event.is_default_prevented());

		let event = DomEvent::new("submit", NodeId(1)).cancelable(true);
		event.prevent_default();
		assert!(event.is_default_prevented());
	}

	#[rstest]
	fn test_key_event_is_cancelable_keydown() {
		let event = DomEvent::key(NodeId(3), "ArrowDown");
		assert_eq!(event.kind(), "keydown");
		assert_eq!(event.key_name(), Some("ArrowDown"));
		assert!(event.is_cancelable());
	}

	#[rstest]
	fn test_rect_bottom() {
		assert_eq!(Rect::new(10.0, 0.0, 100.0, 24.0).bottom(), 34.0);
	}
}
