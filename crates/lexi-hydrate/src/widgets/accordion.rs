//! Accordion: independently collapsible sections
//!
//! ```html
//! <div data-widget="accordion">
//!   <div data-part="section">
//!     <button data-part="header" aria-expanded="false">Etymology</button>
//!     <div data-part="panel" hidden>..</div>
//!   </div>
//! </div>
//! ```
//!
//! Each section's `header` toggles its own `panel`; opening one section
//! never closes another. The section dispatches `open` or `close`.

use std::rc::Rc;

use super::{PART_ATTRIBUTE, WidgetKind, bool_attr, impl_widget, parts};
use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::events::{self, CLOSE, ListenerSet, OPEN};

#[derive(Debug, Clone, Copy)]
struct Section {
	node: NodeId,
	header: NodeId,
	panel: NodeId,
}

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	sections: Vec<Section>,
}

/// A hydrated `accordion` root.
pub struct Accordion {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Accordion {
	/// Hydrates `root`. Sections lacking a header or a panel are skipped.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let section_selector = format!(r#"[{PART_ATTRIBUTE}="section"]"#);
		// headers and panels belong to the closest section, not a nested one
		let within = |section: NodeId, name: &str| {
			parts(dom.as_ref(), root, name)
				.into_iter()
				.find(|&node| dom.closest(node, &section_selector) == Some(section))
		};
		let sections: Vec<Section> = parts(dom.as_ref(), root, "section")
			.into_iter()
			.filter_map(|node| {
				let section = Section {
					node,
					header: within(node, "header")?,
					panel: within(node, "panel")?,
				};
				Some(section)
			})
			.collect();

		for section in &sections {
			let expanded = !dom.is_hidden(section.panel);
			dom.set_attribute(section.header, "aria-expanded", bool_attr(expanded));
			dom.set_attribute(section.node, "data-state", state_name(expanded));
		}

		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			root,
			sections,
		});
		let mut listeners = ListenerSet::new(dom);
		for (index, section) in inner.sections.iter().enumerate() {
			listeners.bind(section.header, "click", &inner, move |inner, _| inner.toggle(index));
		}

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the section at `index` is expanded.
	pub fn is_expanded(&self, index: usize) -> bool {
		self.inner
			.sections
			.get(index)
			.is_some_and(|section| !self.inner.dom.is_hidden(section.panel))
	}

	/// Number of sections.
	pub fn len(&self) -> usize {
		self.inner.sections.len()
	}

	/// Returns true if no section was found.
	pub fn is_empty(&self) -> bool {
		self.inner.sections.is_empty()
	}
}

impl_widget!(Accordion, WidgetKind::Accordion);

fn state_name(expanded: bool) -> &'static str {
	if expanded { "open" } else { "closed" }
}

impl Inner {
	fn toggle(&self, index: usize) {
		let Some(section) = self.sections.get(index).copied() else {
			return;
		};
		let expanded = self.dom.is_hidden(section.panel);
		self.dom.set_hidden(section.panel, !expanded);
		self.dom
			.set_attribute(section.header, "aria-expanded", bool_attr(expanded));
		self.dom
			.set_attribute(section.node, "data-state", state_name(expanded));
		let kind = if expanded { OPEN } else { CLOSE };
		events::emit(self.dom.as_ref(), section.node, kind, "");
	}
}
