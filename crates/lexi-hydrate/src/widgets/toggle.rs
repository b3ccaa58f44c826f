//! Toggle buttons and toggle groups
//!
//! A `toggle-button` root is the button itself; a click flips
//! `aria-pressed` and dispatches `toggle-button-update` with `"true"` or
//! `"false"`. Disabled buttons ignore clicks.
//!
//! A `toggle-group` owns `toggle` parts. With `data-mode="single"` (the
//! default) pressing a button releases the others, and each released button
//! dispatches its own update; with `data-mode="multiple"` buttons are
//! independent. Focus roves over the group: one button is tabbable, arrow
//! keys move between enabled buttons wrapping at both ends.

use std::cell::RefCell;
use std::rc::Rc;

use lexi_core::{ListNav, NavKey, NavOutcome, NavPolicy};

use super::{WidgetKind, bool_attr, impl_widget, parts};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, ListenerSet, TOGGLE_BUTTON_UPDATE};
use crate::listbox;

const PRESSED_CLASS: &str = "is-pressed";

fn is_pressed(dom: &dyn Dom, node: NodeId) -> bool {
	dom.attribute(node, "aria-pressed").as_deref() == Some("true")
}

/// Writes the pressed state and announces it.
fn press(dom: &dyn Dom, node: NodeId, pressed: bool) {
	dom.set_attribute(node, "aria-pressed", bool_attr(pressed));
	dom.toggle_class(node, PRESSED_CLASS, pressed);
	events::emit(dom, node, TOGGLE_BUTTON_UPDATE, bool_attr(pressed));
}

struct ButtonInner {
	dom: Rc<dyn Dom>,
	root: NodeId,
}

/// A hydrated `toggle-button` root.
pub struct ToggleButton {
	inner: Rc<ButtonInner>,
	_listeners: ListenerSet,
}

impl ToggleButton {
	/// Hydrates `root`. A missing `aria-pressed` counts as released.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let pressed = is_pressed(dom.as_ref(), root);
		dom.set_attribute(root, "aria-pressed", bool_attr(pressed));
		dom.toggle_class(root, PRESSED_CLASS, pressed);

		let inner = Rc::new(ButtonInner {
			dom: Rc::clone(&dom),
			root,
		});
		let mut listeners = ListenerSet::new(dom);
		listeners.bind(root, "click", &inner, |inner, _| {
			let dom = inner.dom.as_ref();
			if listbox::is_disabled(dom, inner.root) {
				return;
			}
			press(dom, inner.root, !is_pressed(dom, inner.root));
		});

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the button is pressed.
	pub fn is_pressed(&self) -> bool {
		is_pressed(self.inner.dom.as_ref(), self.inner.root)
	}
}

impl_widget!(ToggleButton, WidgetKind::ToggleButton);

struct GroupInner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	toggles: Vec<NodeId>,
	single: bool,
	nav: RefCell<ListNav>,
}

/// A hydrated `toggle-group` root.
pub struct ToggleGroup {
	inner: Rc<GroupInner>,
	_listeners: ListenerSet,
}

impl ToggleGroup {
	/// Hydrates `root`. Unknown `data-mode` values mean `single`.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let toggles = parts(dom.as_ref(), root, "toggle");
		let single = dom.attribute(root, "data-mode").as_deref() != Some("multiple");

		let mut nav = ListNav::new(NavPolicy::Wrap);
		nav.replace_with_disabled(
			toggles
				.iter()
				.map(|&toggle| listbox::is_disabled(dom.as_ref(), toggle))
				.collect(),
		);
		nav.open();
		let focused = toggles
			.iter()
			.position(|&toggle| is_pressed(dom.as_ref(), toggle))
			.filter(|&index| nav.is_enabled(index))
			.or_else(|| (0..toggles.len()).find(|&index| nav.is_enabled(index)));
		nav.select(focused);

		for &toggle in &toggles {
			let pressed = is_pressed(dom.as_ref(), toggle);
			dom.set_attribute(toggle, "aria-pressed", bool_attr(pressed));
			dom.toggle_class(toggle, PRESSED_CLASS, pressed);
		}
		if dom.attribute(root, "role").is_none() {
			dom.set_attribute(root, "role", "group");
		}

		let inner = Rc::new(GroupInner {
			dom: Rc::clone(&dom),
			root,
			toggles,
			single,
			nav: RefCell::new(nav),
		});
		inner.rove(focused);

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(root, "click", &inner, |inner, event| {
			if let Some(index) = inner.index_of(event.target()) {
				inner.toggle(index);
			}
		});
		listeners.bind(root, "keydown", &inner, GroupInner::on_key);

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Indices of the pressed buttons.
	pub fn pressed(&self) -> Vec<usize> {
		let inner = &self.inner;
		inner
			.toggles
			.iter()
			.enumerate()
			.filter(|&(_, &toggle)| is_pressed(inner.dom.as_ref(), toggle))
			.map(|(index, _)| index)
			.collect()
	}
}

impl_widget!(ToggleGroup, WidgetKind::ToggleGroup);

impl GroupInner {
	fn index_of(&self, node: NodeId) -> Option<usize> {
		self.toggles
			.iter()
			.position(|&toggle| self.dom.contains(toggle, node))
	}

	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(key) = event.key_name().and_then(|key| NavKey::from_key(key, true)) else {
			return;
		};
		if matches!(key, NavKey::Enter | NavKey::Escape) {
			return;
		}
		event.prevent_default();
		let outcome = self.nav.borrow_mut().handle_key(key);
		if let NavOutcome::Moved { to: Some(index), .. } = outcome {
			self.rove(Some(index));
			self.dom.focus(self.toggles[index]);
		}
	}

	fn toggle(&self, index: usize) {
		if !self.nav.borrow().is_enabled(index) {
			return;
		}
		self.nav.borrow_mut().select(Some(index));
		self.rove(Some(index));

		let dom = self.dom.as_ref();
		let target = self.toggles[index];
		let pressed = !is_pressed(dom, target);
		if self.single && pressed {
			for &other in &self.toggles {
				if other != target && is_pressed(dom, other) {
					press(dom, other, false);
				}
			}
		}
		press(dom, target, pressed);
	}

	/// Makes the button at `index` the only tabbable one.
	fn rove(&self, index: Option<usize>) {
		for (position, &toggle) in self.toggles.iter().enumerate() {
			let tabbable = index == Some(position);
			self.dom
				.set_attribute(toggle, "tabindex", if tabbable { "0" } else { "-1" });
		}
		crate::debug_log!("toggle group {} focus {:?}", self.root, index);
	}
}
