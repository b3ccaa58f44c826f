//! Preference toggle: cycles a display preference
//!
//! ```html
//! <button data-widget="preference-toggle" data-preference="color-scheme" data-values="light,dark,sepia">
//!   Theme
//! </button>
//! ```
//!
//! Each click moves to the next value in `data-values` (wrapping), stores it
//! and mirrors it onto the document element as `data-<preference>`, where
//! stylesheets pick it up. Without `data-values`, `color-scheme` cycles
//! `light,dark` and `contrast` cycles `normal,high`.

use std::rc::Rc;

use super::{WidgetKind, impl_widget, require_attribute};
use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::events::ListenerSet;
use crate::prefs::{self, COLOR_SCHEME, CONTRAST, PreferenceStore};

fn default_values(key: &str) -> Vec<String> {
	let values: &[&str] = match key {
		COLOR_SCHEME => &["light", "dark"],
		CONTRAST => &["normal", "high"],
		_ => &[],
	};
	values.iter().map(|value| value.to_string()).collect()
}

struct Inner {
	dom: Rc<dyn Dom>,
	store: Rc<dyn PreferenceStore>,
	root: NodeId,
	key: String,
	values: Vec<String>,
}

/// A hydrated `preference-toggle` root.
pub struct PreferenceToggle {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl PreferenceToggle {
	/// Hydrates `root`. Requires `data-preference`.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let key = require_attribute(dom.as_ref(), root, WidgetKind::PreferenceToggle, "data-preference")?;
		let key = key.trim().to_string();
		let values: Vec<String> = match dom.attribute(root, "data-values") {
			Some(list) => list
				.split(',')
				.map(str::trim)
				.filter(|value| !value.is_empty())
				.map(str::to_string)
				.collect(),
			None => default_values(&key),
		};
		if values.is_empty() {
			crate::warn_log!("preference toggle {} has no values for {}", root, key);
		}

		let inner = Rc::new(Inner {
			dom: Rc::clone(&dom),
			store: Rc::clone(ctx.prefs()),
			root,
			key,
			values,
		});
		if let Some(current) = inner.current() {
			dom.set_attribute(root, "data-value", &current);
		}

		let mut listeners = ListenerSet::new(dom);
		listeners.bind(root, "click", &inner, |inner, _| inner.cycle());

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Current value: stored, else the root's `data-value`, else the first.
	pub fn value(&self) -> Option<String> {
		self.inner.current()
	}
}

impl_widget!(PreferenceToggle, WidgetKind::PreferenceToggle);

impl Inner {
	fn current(&self) -> Option<String> {
		self.store
			.get(&self.key)
			.or_else(|| self.dom.attribute(self.root, "data-value"))
			.or_else(|| self.values.first().cloned())
	}

	fn cycle(&self) {
		if self.values.is_empty() {
			return;
		}
		let position = self
			.current()
			.and_then(|current| self.values.iter().position(|value| *value == current));
		let next = match position {
			Some(index) => &self.values[(index + 1) % self.values.len()],
			None => &self.values[0],
		};
		self.store.set(&self.key, next);
		prefs::mirror(self.dom.as_ref(), &self.key, next);
		self.dom.set_attribute(self.root, "data-value", next);
		crate::info_log!("preference {} set to {}", self.key, next);
	}
}
