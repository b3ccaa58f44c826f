//! In-memory document
//!
//! [`MemoryDom`] implements [`Dom`] over a plain arena of nodes. It has no
//! layout engine: rects default to zero and are set explicitly with
//! [`MemoryDom::set_rect`]. Every dispatched event and every navigation is
//! recorded so tests can assert on the custom events widgets emit.

use std::cell::{Cell, RefCell};
use std::fmt;

use super::{Dom, DomEvent, EventHandler, ListenerId, NodeId, Rect, Selector};
use crate::warn_log;

#[derive(Debug, Default)]
struct NodeData {
	tag: String,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	attributes: Vec<(String, String)>,
	text: String,
	value: String,
	checked: bool,
	rect: Rect,
	scroll_top: f64,
}

struct Listener {
	id: ListenerId,
	node: NodeId,
	kind: String,
	handler: EventHandler,
}

/// An event observed by [`MemoryDom::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
	/// Event type.
	pub kind: String,
	/// Dispatch target.
	pub target: NodeId,
	/// Payload of custom events.
	pub detail: Option<String>,
	/// Whether a listener canceled it.
	pub canceled: bool,
}

/// Arena-backed [`Dom`].
///
/// ## Example
///
/// ```
/// use lexi_hydrate::dom::{Dom, MemoryDom};
///
/// let dom = MemoryDom::new();
/// let list = dom.create_element("ul");
/// dom.set_attribute(list, "data-part", "results");
/// dom.append_child(dom.body(), list);
///
/// assert_eq!(dom.query(dom.document(), r#"[data-part="results"]"#), Some(list));
/// ```
pub struct MemoryDom {
	nodes: RefCell<Vec<NodeData>>,
	listeners: RefCell<Vec<Listener>>,
	next_listener: Cell<u64>,
	active: Cell<Option<NodeId>>,
	recorded: RefCell<Vec<RecordedEvent>>,
	navigations: RefCell<Vec<String>>,
	root: NodeId,
	body: NodeId,
}

impl Default for MemoryDom {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryDom {
	/// Creates a document with `<html>` and `<body>`.
	pub fn new() -> Self {
		let dom = Self {
			nodes: RefCell::new(Vec::new()),
			listeners: RefCell::new(Vec::new()),
			next_listener: Cell::new(0),
			active: Cell::new(None),
			recorded: RefCell::new(Vec::new()),
			navigations: RefCell::new(Vec::new()),
			root: NodeId(0),
			body: NodeId(1),
		};
		let root = dom.create_element("html");
		let body = dom.create_element("body");
		dom.append_child(root, body);
		dom
	}

	/// The `<body>` element.
	pub fn body(&self) -> NodeId {
		self.body
	}

	/// Sets the layout box returned by [`Dom::rect`].
	pub fn set_rect(&self, node: NodeId, rect: Rect) {
		self.with_node_mut(node, |data| data.rect = rect);
	}

	/// Every event dispatched so far, oldest first.
	pub fn dispatched(&self) -> Vec<RecordedEvent> {
		self.recorded.borrow().clone()
	}

	/// Dispatched events of one type.
	pub fn dispatched_of(&self, kind: &str) -> Vec<RecordedEvent> {
		self.recorded
			.borrow()
			.iter()
			.filter(|event| event.kind == kind)
			.cloned()
			.collect()
	}

	/// Forgets recorded events and navigations.
	pub fn clear_records(&self) {
		self.recorded.borrow_mut().clear();
		self.navigations.borrow_mut().clear();
	}

	/// URLs passed to [`Dom::navigate`], oldest first.
	pub fn navigations(&self) -> Vec<String> {
		self.navigations.borrow().clone()
	}

	/// Number of live listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	fn with_node<R>(&self, node: NodeId, f: impl FnOnce(&NodeData) -> R) -> Option<R> {
		self.nodes.borrow().get(node.0 as usize).map(f)
	}

	fn with_node_mut<R>(&self, node: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> Option<R> {
		self.nodes.borrow_mut().get_mut(node.0 as usize).map(f)
	}

	fn detach(&self, node: NodeId) {
		let parent = self.with_node_mut(node, |data| data.parent.take()).flatten();
		if let Some(parent) = parent {
			self.with_node_mut(parent, |data| data.children.retain(|&child| child != node));
		}
	}

	fn matches_parsed(&self, node: NodeId, selector: &Selector) -> bool {
		let nodes = self.nodes.borrow();
		let Some(data) = nodes.get(node.0 as usize) else {
			return false;
		};
		selector.matches(&data.tag, |name| {
			data.attributes
				.iter()
				.find(|(key, _)| key == name)
				.map(|(_, value)| value.clone())
		})
	}

	fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
		let nodes = self.nodes.borrow();
		let mut out = Vec::new();
		let mut stack: Vec<NodeId> = nodes
			.get(scope.0 as usize)
			.map(|data| data.children.iter().rev().copied().collect())
			.unwrap_or_default();
		while let Some(node) = stack.pop() {
			out.push(node);
			if let Some(data) = nodes.get(node.0 as usize) {
				stack.extend(data.children.iter().rev().copied());
			}
		}
		out
	}

	fn handlers_for(&self, node: NodeId, kind: &str) -> Vec<(ListenerId, EventHandler)> {
		self.listeners
			.borrow()
			.iter()
			.filter(|listener| listener.node == node && listener.kind == kind)
			.map(|listener| (listener.id, listener.handler.clone()))
			.collect()
	}

	fn is_listening(&self, id: ListenerId) -> bool {
		self.listeners.borrow().iter().any(|listener| listener.id == id)
	}

	fn collect_text(&self, node: NodeId, out: &mut String) {
		let children = {
			let nodes = self.nodes.borrow();
			let Some(data) = nodes.get(node.0 as usize) else {
				return;
			};
			out.push_str(&data.text);
			data.children.clone()
		};
		for child in children {
			self.collect_text(child, out);
		}
	}
}

impl Dom for MemoryDom {
	fn document(&self) -> NodeId {
		self.root
	}

	fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
		let Some(parsed) = Selector::parse(selector) else {
			warn_log!("unsupported selector: {}", selector);
			return Vec::new();
		};
		self.descendants(scope)
			.into_iter()
			.filter(|&node| self.matches_parsed(node, &parsed))
			.collect()
	}

	fn matches(&self, node: NodeId, selector: &str) -> bool {
		match Selector::parse(selector) {
			Some(parsed) => self.matches_parsed(node, &parsed),
			None => {
				warn_log!("unsupported selector: {}", selector);
				false
			}
		}
	}

	fn parent(&self, node: NodeId) -> Option<NodeId> {
		self.with_node(node, |data| data.parent).flatten()
	}

	fn children(&self, node: NodeId) -> Vec<NodeId> {
		self.with_node(node, |data| data.children.clone())
			.unwrap_or_default()
	}

	fn tag_name(&self, node: NodeId) -> String {
		self.with_node(node, |data| data.tag.clone())
			.unwrap_or_default()
	}

	fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.with_node(node, |data| {
			data.attributes
				.iter()
				.find(|(key, _)| key == name)
				.map(|(_, value)| value.clone())
		})
		.flatten()
	}

	fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
		self.with_node_mut(node, |data| {
			match data.attributes.iter_mut().find(|(key, _)| key == name) {
				Some((_, existing)) => *existing = value.to_string(),
				None => data.attributes.push((name.to_string(), value.to_string())),
			}
			match name {
				"value" => data.value = value.to_string(),
				"checked" => data.checked = true,
				_ => {}
			}
		});
	}

	fn remove_attribute(&self, node: NodeId, name: &str) {
		self.with_node_mut(node, |data| {
			data.attributes.retain(|(key, _)| key != name);
			if name == "checked" {
				data.checked = false;
			}
		});
	}

	fn has_class(&self, node: NodeId, class: &str) -> bool {
		self.attribute(node, "class")
			.is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
	}

	fn add_class(&self, node: NodeId, class: &str) {
		if self.has_class(node, class) {
			return;
		}
		let classes = match self.attribute(node, "class") {
			Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing.trim(), class),
			_ => class.to_string(),
		};
		self.set_attribute(node, "class", &classes);
	}

	fn remove_class(&self, node: NodeId, class: &str) {
		let Some(existing) = self.attribute(node, "class") else {
			return;
		};
		let remaining: Vec<&str> = existing
			.split_ascii_whitespace()
			.filter(|c| *c != class)
			.collect();
		self.set_attribute(node, "class", &remaining.join(" "));
	}

	fn text(&self, node: NodeId) -> String {
		let mut out = String::new();
		self.collect_text(node, &mut out);
		out
	}

	fn set_text(&self, node: NodeId, text: &str) {
		self.clear_children(node);
		self.with_node_mut(node, |data| data.text = text.to_string());
	}

	fn value(&self, node: NodeId) -> String {
		self.with_node(node, |data| data.value.clone())
			.unwrap_or_default()
	}

	fn set_value(&self, node: NodeId, value: &str) {
		self.with_node_mut(node, |data| data.value = value.to_string());
	}

	fn checked(&self, node: NodeId) -> bool {
		self.with_node(node, |data| data.checked).unwrap_or(false)
	}

	fn set_checked(&self, node: NodeId, checked: bool) {
		self.with_node_mut(node, |data| data.checked = checked);
	}

	fn create_element(&self, tag: &str) -> NodeId {
		let mut nodes = self.nodes.borrow_mut();
		let id = NodeId(nodes.len() as u32);
		nodes.push(NodeData {
			tag: tag.to_ascii_lowercase(),
			..NodeData::default()
		});
		id
	}

	fn append_child(&self, parent: NodeId, child: NodeId) {
		if self.contains(child, parent) {
			warn_log!("refusing to append {} into its own subtree", child);
			return;
		}
		self.detach(child);
		self.with_node_mut(child, |data| data.parent = Some(parent));
		self.with_node_mut(parent, |data| data.children.push(child));
	}

	fn remove(&self, node: NodeId) {
		if let Some(active) = self.active.get()
			&& self.contains(node, active)
		{
			self.active.set(None);
		}
		self.detach(node);
	}

	fn focus(&self, node: NodeId) {
		let previous = self.active.get();
		if previous == Some(node) {
			return;
		}
		self.active.set(Some(node));
		if let Some(previous) = previous {
			self.dispatch(&DomEvent::new("blur", previous).bubbles(false));
			self.dispatch(&DomEvent::new("focusout", previous).with_related_target(Some(node)));
		}
		// a blur handler may have moved focus elsewhere
		if self.active.get() != Some(node) {
			return;
		}
		self.dispatch(&DomEvent::new("focus", node).bubbles(false));
		self.dispatch(&DomEvent::new("focusin", node).with_related_target(previous));
	}

	fn blur(&self, node: NodeId) {
		if self.active.get() != Some(node) {
			return;
		}
		self.active.set(None);
		self.dispatch(&DomEvent::new("blur", node).bubbles(false));
		self.dispatch(&DomEvent::new("focusout", node));
	}

	fn active_element(&self) -> Option<NodeId> {
		self.active.get()
	}

	fn rect(&self, node: NodeId) -> Rect {
		self.with_node(node, |data| data.rect).unwrap_or_default()
	}

	fn scroll_top(&self, node: NodeId) -> f64 {
		self.with_node(node, |data| data.scroll_top)
			.unwrap_or_default()
	}

	fn set_scroll_top(&self, node: NodeId, top: f64) {
		self.with_node_mut(node, |data| data.scroll_top = top.max(0.0));
	}

	fn listen(&self, node: NodeId, kind: &str, handler: EventHandler) -> ListenerId {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.listeners.borrow_mut().push(Listener {
			id,
			node,
			kind: kind.to_string(),
			handler,
		});
		id
	}

	fn unlisten(&self, id: ListenerId) {
		self.listeners.borrow_mut().retain(|listener| listener.id != id);
	}

	fn dispatch(&self, event: &DomEvent) -> bool {
		let slot = {
			let mut recorded = self.recorded.borrow_mut();
			recorded.push(RecordedEvent {
				kind: event.kind().to_string(),
				target: event.target(),
				detail: event.detail().map(str::to_string),
				canceled: false,
			});
			recorded.len() - 1
		};

		let path = if event.is_bubbling() {
			let mut path = vec![event.target()];
			let mut current = self.parent(event.target());
			while let Some(node) = current {
				path.push(node);
				current = self.parent(node);
			}
			path
		} else {
			vec![event.target()]
		};

		for node in path {
			for (id, handler) in self.handlers_for(node, event.kind()) {
				if self.is_listening(id) {
					handler(event);
				}
			}
			if event.is_propagation_stopped() {
				break;
			}
		}

		if let Some(record) = self.recorded.borrow_mut().get_mut(slot) {
			record.canceled = event.is_default_prevented();
		}
		!event.is_default_prevented()
	}

	fn navigate(&self, url: &str) {
		self.navigations.borrow_mut().push(url.to_string());
	}
}

impl fmt::Debug for MemoryDom {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryDom")
			.field("nodes", &self.nodes.borrow().len())
			.field("listeners", &self.listener_count())
			.field("active", &self.active.get())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};
	use std::rc::Rc;

	#[fixture]
	fn dom() -> MemoryDom {
		MemoryDom::new()
	}

	fn element(dom: &MemoryDom, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
		let node = dom.create_element(tag);
		for (name, value) in attrs {
			dom.set_attribute(node, name, value);
		}
		dom.append_child(parent, node);
		node
	}

	#[rstest]
	fn test_query_all_in_document_order(dom: MemoryDom) {
		let list = element(&dom, dom.body(), "ul", &[]);
		let a = element(&dom, list, "li", &[("data-part", "item")]);
		let nested = element(&dom, a, "span", &[("data-part", "item")]);
		let b = element(&dom, list, "li", &[("data-part", "item")]);
		assert_eq!(dom.query_all(list, r#"[data-part="item"]"#), vec![a, nested, b]);
		assert_eq!(dom.query_all(a, r#"[data-part="item"]"#), vec![nested]);
	}

	#[rstest]
	fn test_closest_is_inclusive(dom: MemoryDom) {
		let root = element(&dom, dom.body(), "div", &[("data-widget", "menu")]);
		let item = element(&dom, root, "li", &[]);
		assert_eq!(dom.closest(item, "[data-widget]"), Some(root));
		assert_eq!(dom.closest(root, "[data-widget]"), Some(root));
		assert_eq!(dom.closest(dom.body(), "[data-widget]"), None);
	}

	#[rstest]
	fn test_classes(dom: MemoryDom) {
		let node = element(&dom, dom.body(), "li", &[("class", "option")]);
		dom.add_class(node, "is-highlighted");
		dom.add_class(node, "is-highlighted");
		assert_eq!(dom.attribute(node, "class").as_deref(), Some("option is-highlighted"));
		dom.remove_class(node, "option");
		assert!(dom.has_class(node, "is-highlighted"));
		assert!(!dom.has_class(node, "option"));
	}

	#[rstest]
	fn test_text_concatenates_descendants(dom: MemoryDom) {
		let item = element(&dom, dom.body(), "li", &[]);
		let label = element(&dom, item, "span", &[]);
		dom.set_text(label, "café");
		let secondary = element(&dom, item, "small", &[]);
		dom.set_text(secondary, " French");
		assert_eq!(dom.text(item), "café French");
		dom.set_text(item, "plain");
		assert_eq!(dom.text(item), "plain");
		assert!(dom.children(item).is_empty());
	}

	#[rstest]
	fn test_dispatch_bubbles_and_stops(dom: MemoryDom) {
		let outer = element(&dom, dom.body(), "div", &[]);
		let inner = element(&dom, outer, "button", &[]);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let log = seen.clone();
		dom.listen(inner, "click", Rc::new(move |_| log.borrow_mut().push("inner")));
		let log = seen.clone();
		dom.listen(outer, "click", Rc::new(move |event| {
			log.borrow_mut().push("outer");
			event.stop_propagation();
		}));
		let log = seen.clone();
		dom.listen(dom.document(), "click", Rc::new(move |_| log.borrow_mut().push("document")));

		dom.dispatch(&DomEvent::new("click", inner));
		assert_eq!(*seen.borrow(), vec!["inner", "outer"]);
	}

	#[rstest]
	fn test_dispatch_reports_cancellation(dom: MemoryDom) {
		let node = element(&dom, dom.body(), "form", &[]);
		dom.listen(node, "submit", Rc::new(|event| event.prevent_default()));
		assert!(!dom.dispatch(&DomEvent::custom("submit", node, "abc").cancelable(true)));
		let recorded = dom.dispatched_of("submit");
		assert_eq!(recorded.len(), 1);
		assert!(recorded[0].canceled);
		assert_eq!(recorded[0].detail.as_deref(), Some("abc"));
	}

	#[rstest]
	fn test_listener_may_reenter(dom: MemoryDom) {
		let node = element(&dom, dom.body(), "div", &[]);
		let inner_dom = Rc::new(dom);
		let handle = inner_dom.clone();
		inner_dom.listen(node, "open", Rc::new(move |event| {
			handle.set_attribute(event.target(), "data-state", "open");
			handle.listen(event.target(), "close", Rc::new(|_| {}));
		}));
		inner_dom.dispatch(&DomEvent::new("open", node));
		assert_eq!(inner_dom.attribute(node, "data-state").as_deref(), Some("open"));
		assert_eq!(inner_dom.listener_count(), 2);
	}

	#[rstest]
	fn test_unlisten_during_dispatch_skips_listener(dom: MemoryDom) {
		let node = element(&dom, dom.body(), "div", &[]);
		let dom = Rc::new(dom);
		let hits = Rc::new(Cell::new(0));
		let second = Rc::new(Cell::new(None));

		let handle = dom.clone();
		let pending = second.clone();
		dom.listen(node, "click", Rc::new(move |_| {
			if let Some(id) = pending.get() {
				handle.unlisten(id);
			}
		}));
		let counter = hits.clone();
		second.set(Some(dom.listen(node, "click", Rc::new(move |_| counter.set(counter.get() + 1)))));

		dom.dispatch(&DomEvent::new("click", node));
		assert_eq!(hits.get(), 0);
	}

	#[rstest]
	fn test_focus_emits_transitions(dom: MemoryDom) {
		let first = element(&dom, dom.body(), "input", &[]);
		let second = element(&dom, dom.body(), "button", &[]);
		dom.focus(first);
		dom.focus(second);
		let kinds: Vec<String> = dom.dispatched().into_iter().map(|e| e.kind).collect();
		assert_eq!(kinds, vec!["focus", "focusin", "blur", "focusout", "focus", "focusin"]);
		assert_eq!(dom.active_element(), Some(second));
		dom.blur(second);
		assert_eq!(dom.active_element(), None);
	}

	#[rstest]
	fn test_remove_clears_focus_inside(dom: MemoryDom) {
		let panel = element(&dom, dom.body(), "div", &[]);
		let input = element(&dom, panel, "input", &[]);
		dom.focus(input);
		dom.remove(panel);
		assert_eq!(dom.active_element(), None);
		assert_eq!(dom.parent(panel), None);
	}

	#[rstest]
	fn test_append_refuses_cycles(dom: MemoryDom) {
		let outer = element(&dom, dom.body(), "div", &[]);
		let inner = element(&dom, outer, "div", &[]);
		dom.append_child(inner, outer);
		assert_eq!(dom.parent(outer), Some(dom.body()));
	}

	#[rstest]
	fn test_value_attribute_seeds_value(dom: MemoryDom) {
		let input = element(&dom, dom.body(), "input", &[("value", "chat")]);
		assert_eq!(dom.value(input), "chat");
		dom.set_value(input, "chatte");
		assert_eq!(dom.value(input), "chatte");
	}
}
