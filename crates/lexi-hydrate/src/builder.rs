//! Markup builder
//!
//! A fluent description of an element subtree that is materialized into a
//! [`Dom`] with [`ElementBuilder::build`] or [`ElementBuilder::mount`].
//! Widgets use it to render result items and chips; tests use it to lay out
//! the server markup a widget hydrates.
//!
//! ## Example
//!
//! ```
//! use lexi_hydrate::builder::{div, input, ul};
//! use lexi_hydrate::dom::{Dom, MemoryDom};
//!
//! let dom = MemoryDom::new();
//! let root = div()
//!     .widget("typeahead")
//!     .child(input().part("input").attr("type", "search"))
//!     .child(ul().part("results").hidden(true))
//!     .mount(&dom, dom.body());
//!
//! assert_eq!(dom.children(root).len(), 2);
//! ```

use crate::dom::{Dom, NodeId};

/// Most elements carry two or three attributes
const TYPICAL_ATTRIBUTE_COUNT: usize = 3;

/// Element description with a fluent API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementBuilder {
	tag: String,
	attributes: Vec<(String, String)>,
	classes: Vec<String>,
	text: Option<String>,
	children: Vec<ElementBuilder>,
}

impl ElementBuilder {
	/// Starts an element with the given tag.
	pub fn new(tag: &str) -> Self {
		Self {
			tag: tag.to_string(),
			attributes: Vec::with_capacity(TYPICAL_ATTRIBUTE_COUNT),
			classes: Vec::new(),
			text: None,
			children: Vec::new(),
		}
	}

	/// Adds space-separated classes.
	///
	/// Unlike `attr("class", ..)`, repeated calls accumulate.
	pub fn class(mut self, class: &str) -> Self {
		self.classes
			.extend(class.split_ascii_whitespace().map(str::to_string));
		self
	}

	/// Sets the id attribute.
	pub fn id(self, id: &str) -> Self {
		self.attr("id", id)
	}

	/// Sets an attribute, replacing a previous value.
	pub fn attr(mut self, name: &str, value: &str) -> Self {
		match self.attributes.iter_mut().find(|(key, _)| key == name) {
			Some((_, existing)) => *existing = value.to_string(),
			None => self.attributes.push((name.to_string(), value.to_string())),
		}
		self
	}

	/// Sets `data-<name>`.
	pub fn data(self, name: &str, value: &str) -> Self {
		self.attr(&format!("data-{name}"), value)
	}

	/// Marks the element as a widget root (`data-widget`).
	pub fn widget(self, kind: &str) -> Self {
		self.data("widget", kind)
	}

	/// Marks the element as a widget part (`data-part`).
	pub fn part(self, name: &str) -> Self {
		self.data("part", name)
	}

	/// Adds the `hidden` attribute when `hidden` is set.
	pub fn hidden(self, hidden: bool) -> Self {
		if hidden { self.attr("hidden", "") } else { self }
	}

	/// Sets text content. Children added later are appended after it.
	pub fn text(mut self, text: &str) -> Self {
		self.text = Some(text.to_string());
		self
	}

	/// Appends a child.
	pub fn child(mut self, child: ElementBuilder) -> Self {
		self.children.push(child);
		self
	}

	/// Appends several children.
	pub fn children<I>(mut self, children: I) -> Self
	where
		I: IntoIterator<Item = ElementBuilder>,
	{
		self.children.extend(children);
		self
	}

	/// Appends a child when `child` is `Some`.
	pub fn child_opt(self, child: Option<ElementBuilder>) -> Self {
		match child {
			Some(child) => self.child(child),
			None => self,
		}
	}

	/// Creates the subtree detached from the document.
	pub fn build(self, dom: &dyn Dom) -> NodeId {
		let node = dom.create_element(&self.tag);
		if !self.classes.is_empty() {
			dom.set_attribute(node, "class", &self.classes.join(" "));
		}
		for (name, value) in &self.attributes {
			dom.set_attribute(node, name, value);
		}
		if let Some(text) = &self.text {
			dom.set_text(node, text);
		}
		for child in self.children {
			let child = child.build(dom);
			dom.append_child(node, child);
		}
		node
	}

	/// Creates the subtree and appends it to `parent`.
	pub fn mount(self, dom: &dyn Dom, parent: NodeId) -> NodeId {
		let node = self.build(dom);
		dom.append_child(parent, node);
		node
	}
}

/// Macro for defining HTML element creation functions
macro_rules! define_element {
	($(#[$meta:meta])* $name:ident, $tag:literal) => {
		$(#[$meta])*
		pub fn $name() -> ElementBuilder {
			ElementBuilder::new($tag)
		}
	};
}

define_element!(
	/// Create a `<div>` element
	div, "div"
);

define_element!(
	/// Create a `<span>` element
	span, "span"
);

define_element!(
	/// Create a `<p>` element
	p, "p"
);

define_element!(
	/// Create a `<small>` element
	small, "small"
);

define_element!(
	/// Create a `<button>` element
	///
	/// ## Example
	///
	/// ```
	/// use lexi_hydrate::builder::button;
	///
	/// let trigger = button().part("trigger").attr("aria-expanded", "false").text("Menu");
	/// # let _ = trigger;
	/// ```
	button, "button"
);

define_element!(
	/// Create an `<input>` element
	input, "input"
);

define_element!(
	/// Create a `<label>` element
	label, "label"
);

define_element!(
	/// Create a `<ul>` element
	ul, "ul"
);

define_element!(
	/// Create a `<li>` element
	li, "li"
);

define_element!(
	/// Create an `<a>` element
	a, "a"
);

define_element!(
	/// Create an `<img>` element
	img, "img"
);

define_element!(
	/// Create a `<section>` element
	section, "section"
);

define_element!(
	/// Create a `<table>` element
	table, "table"
);

define_element!(
	/// Create a `<tr>` element
	tr, "tr"
);

define_element!(
	/// Create a `<th>` element
	th, "th"
);

define_element!(
	/// Create a `<td>` element
	td, "td"
);

define_element!(
	/// Create a `<script>` element
	script, "script"
);
