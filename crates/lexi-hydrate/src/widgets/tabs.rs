//! Tabs: a tab strip with automatic activation
//!
//! ```html
//! <div data-widget="tabs">
//!   <div role="tablist">
//!     <button data-part="tab" aria-controls="senses">Senses</button>
//!     <button data-part="tab" aria-controls="forms">Forms</button>
//!   </div>
//!   <section data-part="panel" id="senses">..</section>
//!   <section data-part="panel" id="forms" hidden>..</section>
//! </div>
//! ```
//!
//! A tab's panel is the `panel` part whose id matches its `aria-controls`,
//! else the panel at the same position. Arrow keys (Left/Right, or Up/Down
//! with `data-orientation="vertical"`), Home and End move between enabled
//! tabs, wrapping at both ends, and activate the tab they land on.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::{ListNav, NavKey, NavOutcome, NavPolicy};

use super::{WidgetKind, bool_attr, impl_widget, parts};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::ListenerSet;
use crate::listbox;

const ACTIVE_CLASS: &str = "is-active";

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	tabs: Vec<NodeId>,
	panels: Vec<Option<NodeId>>,
	horizontal: bool,
	nav: RefCell<ListNav>,
}

/// A hydrated `tabs` root.
pub struct Tabs {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Tabs {
	/// Hydrates `root`. A root without tabs is valid and inert.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let tabs = parts(dom.as_ref(), root, "tab");
		let all_panels = parts(dom.as_ref(), root, "panel");
		let panels = tabs
			.iter()
			.enumerate()
			.map(|(index, &tab)| {
				let controlled = dom.attribute(tab, "aria-controls").and_then(|id| {
					all_panels
						.iter()
						.copied()
						.find(|&panel| dom.attribute(panel, "id").as_deref() == Some(id.as_str()))
				});
				controlled.or_else(|| all_panels.get(index).copied())
			})
			.collect();
		let horizontal = dom.attribute(root, "data-orientation").as_deref() != Some("vertical");

		let mut nav = ListNav::new(NavPolicy::Wrap);
		nav.replace_with_disabled(
			tabs.iter()
				.map(|&tab| listbox::is_disabled(dom.as_ref(), tab))
				.collect(),
		);
		nav.open();
		let initial = tabs
			.iter()
			.position(|&tab| dom.attribute(tab, "aria-selected").as_deref() == Some("true"))
			.filter(|&index| nav.is_enabled(index))
			.or_else(|| (0..tabs.len()).find(|&index| nav.is_enabled(index)));

		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			root,
			tabs,
			panels,
			horizontal,
			nav: RefCell::new(nav),
		});
		if let Some(index) = initial {
			inner.nav.borrow_mut().select(Some(index));
		}
		inner.render(initial);

		let mut listeners = ListenerSet::new(dom);
		for &tab in &inner.tabs {
			listeners.bind(tab, "keydown", &inner, Inner::on_key);
			listeners.bind(tab, "click", &inner, move |inner, _| {
				if let Some(index) = inner.tabs.iter().position(|&node| node == tab) {
					inner.activate(index);
				}
			});
		}

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Index of the active tab.
	pub fn active(&self) -> Option<usize> {
		self.inner.nav.borrow().index()
	}
}

impl_widget!(Tabs, WidgetKind::Tabs);

impl Inner {
	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(key) = event
			.key_name()
			.and_then(|key| NavKey::from_key(key, self.horizontal))
		else {
			return;
		};
		if matches!(key, NavKey::Enter | NavKey::Escape) {
			return;
		}
		event.prevent_default();
		let outcome = self.nav.borrow_mut().handle_key(key);
		if let NavOutcome::Moved { to: Some(index), .. } = outcome {
			self.render(Some(index));
			self.dom.focus(self.tabs[index]);
		}
	}

	fn activate(&self, index: usize) {
		if !self.nav.borrow().is_enabled(index) {
			return;
		}
		self.nav.borrow_mut().select(Some(index));
		self.render(Some(index));
	}

	fn render(&self, active: Option<usize>) {
		for (index, &tab) in self.tabs.iter().enumerate() {
			let selected = active == Some(index);
			self.dom.set_attribute(tab, "aria-selected", bool_attr(selected));
			self.dom
				.set_attribute(tab, "tabindex", if selected { "0" } else { "-1" });
			self.dom.toggle_class(tab, ACTIVE_CLASS, selected);
		}
		for (index, panel) in self.panels.iter().enumerate() {
			if let Some(panel) = *panel {
				self.dom.set_hidden(panel, active != Some(index));
			}
		}
		crate::debug_log!("tabs {} active {:?}", self.root, active);
	}
}
