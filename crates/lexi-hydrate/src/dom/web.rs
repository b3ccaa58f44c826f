//! Browser document via web-sys
//!
//! Elements are mapped to [`NodeId`]s on first sight; the id is stored on the
//! element object itself (under a property private to each [`WebDom`]) so
//! the same element always maps to the same id.
//! Removing an element through [`Dom::remove`] releases the ids of the
//! element and its descendants, and released ids are handed out again.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	CustomEvent, CustomEventInit, Document, Element, Event, EventInit, FocusEvent, HtmlElement,
	HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, KeyboardEvent, Window,
};

use super::{Dom, DomEvent, EventHandler, ListenerId, NodeId, Rect};
use crate::{error_log, warn_log};

const NODE_KEY: &str = "__lexiNode";

// instances tag elements under distinct property names
static NEXT_DOCUMENT: AtomicU32 = AtomicU32::new(0);

type JsListener = Closure<dyn FnMut(Event)>;

/// Live elements by id. Ids below `elements.len() + free.len()` are either
/// live or free.
#[derive(Default)]
struct NodeTable {
	elements: HashMap<u32, Element>,
	free: Vec<u32>,
	// ids of elements that refused the node property
	untagged: Vec<u32>,
}

impl NodeTable {
	fn insert(&mut self, element: Element) -> Option<u32> {
		let id = match self.free.pop() {
			Some(id) => id,
			None => u32::try_from(self.elements.len()).ok()?,
		};
		self.elements.insert(id, element);
		Some(id)
	}

	fn release(&mut self, id: u32) {
		if self.elements.remove(&id).is_some() {
			self.untagged.retain(|&untagged| untagged != id);
			self.free.push(id);
		}
	}

	/// Identity lookup among the elements that could not be tagged.
	fn find_untagged(&self, element: &Element) -> Option<u32> {
		self.untagged
			.iter()
			.copied()
			.find(|id| self.elements.get(id).is_some_and(|known| known == element))
	}
}

struct Inner {
	window: Window,
	document: Document,
	node_key: JsValue,
	nodes: RefCell<NodeTable>,
	listeners: RefCell<HashMap<u64, (Element, String, JsListener)>>,
	next_listener: Cell<u64>,
}

impl Inner {
	/// The id stored on `element`, if it belongs to this document's table.
	fn tagged(&self, element: &Element) -> Option<u32> {
		let value = js_sys::Reflect::get(element, &self.node_key)
			.ok()?
			.as_f64()?;
		if value.fract() != 0.0 || !(0.0..=f64::from(u32::MAX)).contains(&value) {
			return None;
		}
		let id = value as u32;
		let nodes = self.nodes.borrow();
		nodes
			.elements
			.get(&id)
			.is_some_and(|known| known == element)
			.then_some(id)
	}

	fn node_id(&self, element: &Element) -> NodeId {
		if let Some(id) = self.tagged(element) {
			return NodeId(id);
		}
		if let Some(id) = self.nodes.borrow().find_untagged(element) {
			return NodeId(id);
		}
		let Some(id) = self.nodes.borrow_mut().insert(element.clone()) else {
			error_log!("node table full, <{}> left unmapped", element.tag_name());
			return NodeId(u32::MAX);
		};
		let tagged = js_sys::Reflect::set(element, &self.node_key, &JsValue::from_f64(f64::from(id)));
		if !matches!(tagged, Ok(true)) {
			warn_log!("could not tag <{}> as node {}", element.tag_name(), id);
			self.nodes.borrow_mut().untagged.push(id);
		}
		NodeId(id)
	}

	fn element(&self, node: NodeId) -> Option<Element> {
		self.nodes.borrow().elements.get(&node.0).cloned()
	}

	/// Forgets `element` and every mapped descendant, with their listeners.
	fn release_tree(&self, element: &Element) {
		let mut released = vec![element.clone()];
		if let Ok(list) = element.query_selector_all("*") {
			released.extend(
				(0..list.length())
					.filter_map(|i| list.item(i))
					.filter_map(|node| node.dyn_into::<Element>().ok()),
			);
		}

		for element in &released {
			let Some(id) = self
				.tagged(element)
				.or_else(|| self.nodes.borrow().find_untagged(element))
			else {
				continue;
			};
			self.nodes.borrow_mut().release(id);
			let _ = js_sys::Reflect::delete_property(element, &self.node_key);
		}

		let orphaned: Vec<_> = {
			let mut listeners = self.listeners.borrow_mut();
			let ids: Vec<u64> = listeners
				.iter()
				.filter(|(_, (target, _, _))| released.contains(target))
				.map(|(id, _)| *id)
				.collect();
			ids.into_iter()
				.filter_map(|id| listeners.remove(&id))
				.collect()
		};
		for (target, kind, closure) in orphaned {
			let _ = target.remove_event_listener_with_callback(&kind, closure.as_ref().unchecked_ref());
		}
	}

	fn to_dom_event(&self, event: &Event) -> Option<DomEvent> {
		let target = event.target()?.dyn_into::<Element>().ok()?;
		let mut dom_event = DomEvent::new(event.type_(), self.node_id(&target))
			.bubbles(event.bubbles())
			.cancelable(event.cancelable());
		if let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() {
			dom_event.key = Some(keyboard.key());
		}
		if let Some(custom) = event.dyn_ref::<CustomEvent>() {
			dom_event.detail = custom.detail().as_string();
		}
		if let Some(focus) = event.dyn_ref::<FocusEvent>() {
			dom_event.related_target = focus
				.related_target()
				.and_then(|related| related.dyn_into::<Element>().ok())
				.map(|related| self.node_id(&related));
		}
		Some(dom_event)
	}
}

/// [`Dom`] over the page document.
pub struct WebDom {
	inner: Rc<Inner>,
	root: NodeId,
}

impl WebDom {
	/// Binds to the global window. `None` outside a browser.
	pub fn new() -> Option<Self> {
		let window = web_sys::window()?;
		let document = window.document()?;
		let root_element = document.document_element()?;
		let inner = Rc::new(Inner {
			window,
			document,
			node_key: JsValue::from_str(&format!(
				"{NODE_KEY}{}",
				NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed)
			)),
			nodes: RefCell::new(NodeTable::default()),
			listeners: RefCell::new(HashMap::new()),
			next_listener: Cell::new(0),
		});
		let root = inner.node_id(&root_element);
		Some(Self { inner, root })
	}

	/// Maps a web-sys element to its id.
	pub fn node_of(&self, element: &Element) -> NodeId {
		self.inner.node_id(element)
	}

	/// Number of elements currently mapped to ids.
	pub fn mapped_nodes(&self) -> usize {
		self.inner.nodes.borrow().elements.len()
	}

	/// The web-sys element behind an id.
	pub fn element_of(&self, node: NodeId) -> Option<Element> {
		self.inner.element(node)
	}

	fn html_element(&self, node: NodeId) -> Option<HtmlElement> {
		self.inner
			.element(node)
			.and_then(|element| element.dyn_into::<HtmlElement>().ok())
	}
}

impl Dom for WebDom {
	fn document(&self) -> NodeId {
		self.root
	}

	fn query_all(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
		let Some(element) = self.inner.element(scope) else {
			return Vec::new();
		};
		let list = match element.query_selector_all(selector) {
			Ok(list) => list,
			Err(_) => {
				warn_log!("invalid selector: {}", selector);
				return Vec::new();
			}
		};
		(0..list.length())
			.filter_map(|i| list.item(i))
			.filter_map(|node| node.dyn_into::<Element>().ok())
			.map(|element| self.inner.node_id(&element))
			.collect()
	}

	fn matches(&self, node: NodeId, selector: &str) -> bool {
		self.inner
			.element(node)
			.is_some_and(|element| element.matches(selector).unwrap_or(false))
	}

	fn closest(&self, node: NodeId, selector: &str) -> Option<NodeId> {
		let element = self.inner.element(node)?;
		let found = element.closest(selector).ok()??;
		Some(self.inner.node_id(&found))
	}

	fn parent(&self, node: NodeId) -> Option<NodeId> {
		let parent = self.inner.element(node)?.parent_element()?;
		Some(self.inner.node_id(&parent))
	}

	fn children(&self, node: NodeId) -> Vec<NodeId> {
		let Some(element) = self.inner.element(node) else {
			return Vec::new();
		};
		let children = element.children();
		(0..children.length())
			.filter_map(|i| children.item(i))
			.map(|child| self.inner.node_id(&child))
			.collect()
	}

	fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
		match (self.inner.element(ancestor), self.inner.element(node)) {
			(Some(ancestor), Some(node)) => ancestor.contains(Some(&node)),
			_ => false,
		}
	}

	fn tag_name(&self, node: NodeId) -> String {
		self.inner
			.element(node)
			.map(|element| element.tag_name().to_ascii_lowercase())
			.unwrap_or_default()
	}

	fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
		self.inner.element(node)?.get_attribute(name)
	}

	fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
		if let Some(element) = self.inner.element(node) {
			let _ = element.set_attribute(name, value);
		}
	}

	fn remove_attribute(&self, node: NodeId, name: &str) {
		if let Some(element) = self.inner.element(node) {
			let _ = element.remove_attribute(name);
		}
	}

	fn has_class(&self, node: NodeId, class: &str) -> bool {
		self.inner
			.element(node)
			.is_some_and(|element| element.class_list().contains(class))
	}

	fn add_class(&self, node: NodeId, class: &str) {
		if let Some(element) = self.inner.element(node) {
			let _ = element.class_list().add_1(class);
		}
	}

	fn remove_class(&self, node: NodeId, class: &str) {
		if let Some(element) = self.inner.element(node) {
			let _ = element.class_list().remove_1(class);
		}
	}

	fn text(&self, node: NodeId) -> String {
		self.inner
			.element(node)
			.and_then(|element| element.text_content())
			.unwrap_or_default()
	}

	fn set_text(&self, node: NodeId, text: &str) {
		if let Some(element) = self.inner.element(node) {
			element.set_text_content(Some(text));
		}
	}

	fn value(&self, node: NodeId) -> String {
		let Some(element) = self.inner.element(node) else {
			return String::new();
		};
		if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
			input.value()
		} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
			select.value()
		} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
			area.value()
		} else {
			element.get_attribute("value").unwrap_or_default()
		}
	}

	fn set_value(&self, node: NodeId, value: &str) {
		let Some(element) = self.inner.element(node) else {
			return;
		};
		if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
			input.set_value(value);
		} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
			select.set_value(value);
		} else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
			area.set_value(value);
		} else {
			let _ = element.set_attribute("value", value);
		}
	}

	fn checked(&self, node: NodeId) -> bool {
		self.inner
			.element(node)
			.and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
			.is_some_and(|input| input.checked())
	}

	fn set_checked(&self, node: NodeId, checked: bool) {
		if let Some(input) = self
			.inner
			.element(node)
			.and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
		{
			input.set_checked(checked);
		}
	}

	fn create_element(&self, tag: &str) -> NodeId {
		let element = self
			.inner
			.document
			.create_element(tag)
			.unwrap_or_else(|e| panic!("failed to create <{tag}> element: {e:?}"));
		self.inner.node_id(&element)
	}

	fn append_child(&self, parent: NodeId, child: NodeId) {
		if let (Some(parent), Some(child)) = (self.inner.element(parent), self.inner.element(child)) {
			let _ = parent.append_child(&child);
		}
	}

	fn remove(&self, node: NodeId) {
		if let Some(element) = self.inner.element(node) {
			element.remove();
			self.inner.release_tree(&element);
		}
	}

	fn focus(&self, node: NodeId) {
		if let Some(element) = self.html_element(node) {
			let _ = element.focus();
		}
	}

	fn blur(&self, node: NodeId) {
		if let Some(element) = self.html_element(node) {
			let _ = element.blur();
		}
	}

	fn active_element(&self) -> Option<NodeId> {
		let active = self.inner.document.active_element()?;
		Some(self.inner.node_id(&active))
	}

	fn rect(&self, node: NodeId) -> Rect {
		self.inner
			.element(node)
			.map(|element| {
				let rect = element.get_bounding_client_rect();
				Rect::new(rect.top(), rect.left(), rect.width(), rect.height())
			})
			.unwrap_or_default()
	}

	fn scroll_top(&self, node: NodeId) -> f64 {
		self.inner
			.element(node)
			.map(|element| f64::from(element.scroll_top()))
			.unwrap_or_default()
	}

	fn set_scroll_top(&self, node: NodeId, top: f64) {
		if let Some(element) = self.inner.element(node) {
			element.set_scroll_top(top.round() as i32);
		}
	}

	fn listen(&self, node: NodeId, kind: &str, handler: EventHandler) -> ListenerId {
		let id = ListenerId(self.inner.next_listener.get());
		self.inner.next_listener.set(id.0 + 1);
		let Some(element) = self.inner.element(node) else {
			return id;
		};

		let weak: Weak<Inner> = Rc::downgrade(&self.inner);
		let closure: JsListener = Closure::new(move |event: Event| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			let Some(dom_event) = inner.to_dom_event(&event) else {
				return;
			};
			handler(&dom_event);
			if dom_event.is_default_prevented() {
				event.prevent_default();
			}
			if dom_event.is_propagation_stopped() {
				event.stop_propagation();
			}
		});
		let _ = element.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
		self.inner
			.listeners
			.borrow_mut()
			.insert(id.0, (element, kind.to_string(), closure));
		id
	}

	fn unlisten(&self, id: ListenerId) {
		let removed = self.inner.listeners.borrow_mut().remove(&id.0);
		if let Some((element, kind, closure)) = removed {
			let _ = element.remove_event_listener_with_callback(&kind, closure.as_ref().unchecked_ref());
		}
	}

	fn dispatch(&self, event: &DomEvent) -> bool {
		let Some(element) = self.inner.element(event.target()) else {
			return true;
		};
		let web_event: Result<Event, JsValue> = match event.detail() {
			Some(detail) => {
				let init = CustomEventInit::new();
				init.set_bubbles(event.is_bubbling());
				init.set_cancelable(event.is_cancelable());
				init.set_detail(&JsValue::from_str(detail));
				CustomEvent::new_with_event_init_dict(event.kind(), &init).map(Into::into)
			}
			None => {
				let init = EventInit::new();
				init.set_bubbles(event.is_bubbling());
				init.set_cancelable(event.is_cancelable());
				Event::new_with_event_init_dict(event.kind(), &init)
			}
		};
		match web_event {
			Ok(web_event) => element.dispatch_event(&web_event).unwrap_or(true),
			Err(_) => {
				warn_log!("could not create `{}` event", event.kind());
				true
			}
		}
	}

	fn navigate(&self, url: &str) {
		if self.inner.window.location().set_href(url).is_err() {
			warn_log!("navigation to {} failed", url);
		}
	}
}
