//! Hydration registry
//!
//! The registry finds widget roots, constructs one instance per root and
//! keeps the instances alive for as long as the page lives. It is the only
//! owner of widget instances.
//!
//! Hydration is idempotent: a root is hydrated at most once, whether the scan
//! runs twice over the same subtree or a server-rendered fragment is inserted
//! later. The guard is the set of hydrated [`NodeId`]s plus the
//! `data-hydrated="true"` marker written on each root, which also protects
//! roots hydrated by an earlier registry over the same document.
//!
//! ## Example
//!
//! ```
//! use lexi_hydrate::builder::button;
//! use lexi_hydrate::context::HydrateContext;
//! use lexi_hydrate::registry::HydrationRegistry;
//!
//! let ctx = HydrateContext::in_memory();
//! let dom = ctx.dom().clone();
//! button().widget("toggle-button").mount(dom.as_ref(), dom.document());
//!
//! let registry = HydrationRegistry::new(ctx);
//! assert_eq!(registry.init(), 1);
//! assert_eq!(registry.hydrate_within(dom.document()), 0);
//! assert_eq!(registry.len(), 1);
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use crate::config::{HydrateSettings, SETTINGS_SELECTOR};
use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::events::{ListenerSet, OPEN};
use crate::prefs;
use crate::widgets::{self, WIDGET_ATTRIBUTE, WIDGET_SELECTOR, Widget, WidgetKind};
use crate::{debug_log, error_log, info_log};

/// Attribute written on every hydrated root.
pub const HYDRATED_ATTRIBUTE: &str = "data-hydrated";

struct RegistryInner {
	ctx: RefCell<HydrateContext>,
	instances: RefCell<Vec<Box<dyn Widget>>>,
	hydrated: RefCell<HashSet<NodeId>>,
	listeners: RefCell<Option<ListenerSet>>,
}

/// Owns every hydrated widget of a document.
#[derive(Clone)]
pub struct HydrationRegistry {
	inner: Rc<RegistryInner>,
}

impl HydrationRegistry {
	/// Creates an empty registry over `ctx`.
	pub fn new(ctx: HydrateContext) -> Self {
		Self {
			inner: Rc::new(RegistryInner {
				ctx: RefCell::new(ctx),
				instances: RefCell::new(Vec::new()),
				hydrated: RefCell::new(HashSet::new()),
				listeners: RefCell::new(None),
			}),
		}
	}

	/// Boots the page: reads the settings island if there is one, mirrors
	/// stored preferences onto the document element, hydrates every root and
	/// starts listening for `open` events to hydrate revealed content.
	///
	/// Returns the number of widgets hydrated. Calling it again only picks up
	/// roots added since.
	pub fn init(&self) -> usize {
		let ctx = self.context();
		let dom = Rc::clone(ctx.dom());
		if dom.query(dom.document(), SETTINGS_SELECTOR).is_some() {
			let settings = HydrateSettings::from_document(dom.as_ref());
			*self.inner.ctx.borrow_mut() = ctx.clone().with_settings(settings);
		}
		prefs::apply_stored(dom.as_ref(), ctx.prefs().as_ref());

		if self.inner.listeners.borrow().is_none() {
			let mut listeners = ListenerSet::new(Rc::clone(&dom));
			listeners.bind(dom.document(), OPEN, &self.inner, |inner, event| {
				let registry = HydrationRegistry {
					inner: Rc::clone(inner),
				};
				registry.hydrate_within(event.target());
			});
			*self.inner.listeners.borrow_mut() = Some(listeners);
		}

		let count = self.hydrate_within(dom.document());
		info_log!("hydrated {} widgets", count);
		count
	}

	/// Hydrates `scope` and every widget root below it that is not hydrated
	/// yet. Failures are logged and skipped. Returns the number of new
	/// instances.
	pub fn hydrate_within(&self, scope: NodeId) -> usize {
		let ctx = self.context();
		let dom = Rc::clone(ctx.dom());
		let mut roots = Vec::new();
		if dom.matches(scope, WIDGET_SELECTOR) {
			roots.push(scope);
		}
		roots.extend(dom.query_all(scope, WIDGET_SELECTOR));

		let mut count = 0;
		for root in roots {
			if self.is_hydrated(root) {
				continue;
			}
			let Some(name) = dom.attribute(root, WIDGET_ATTRIBUTE) else {
				continue;
			};
			let kind = match name.trim().parse::<WidgetKind>() {
				Ok(kind) => kind,
				Err(error) => {
					error_log!("skipping {}: {}", root, error);
					continue;
				}
			};
			// constructed without any registry borrow held: hydrators may
			// dispatch events that re-enter the registry
			match widgets::hydrate(&ctx, kind, root) {
				Ok(widget) => {
					self.inner.hydrated.borrow_mut().insert(root);
					dom.set_attribute(root, HYDRATED_ATTRIBUTE, "true");
					self.inner.instances.borrow_mut().push(widget);
					debug_log!("hydrated {} at {}", kind, root);
					count += 1;
				}
				Err(error) => error_log!("{} at {} not hydrated: {}", kind, root, error),
			}
		}
		count
	}

	/// Whether `root` carries a live instance or the hydrated marker.
	pub fn is_hydrated(&self, root: NodeId) -> bool {
		if self.inner.hydrated.borrow().contains(&root) {
			return true;
		}
		let dom = Rc::clone(self.inner.ctx.borrow().dom());
		dom.attribute(root, HYDRATED_ATTRIBUTE).as_deref() == Some("true")
	}

	/// Number of live instances.
	pub fn len(&self) -> usize {
		self.inner.instances.borrow().len()
	}

	/// Returns true if nothing has been hydrated.
	pub fn is_empty(&self) -> bool {
		self.inner.instances.borrow().is_empty()
	}

	/// Number of live instances of `kind`.
	pub fn count(&self, kind: WidgetKind) -> usize {
		self.inner
			.instances
			.borrow()
			.iter()
			.filter(|widget| widget.kind() == kind)
			.count()
	}

	/// The context widgets are hydrated with.
	pub fn context(&self) -> HydrateContext {
		self.inner.ctx.borrow().clone()
	}
}

impl fmt::Debug for HydrationRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HydrationRegistry")
			.field("instances", &self.len())
			.field("hydrated", &self.inner.hydrated.borrow().len())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::{button, div, input, script, ul};
	use rstest::rstest;

	fn registry() -> (HydrationRegistry, Rc<dyn Dom>) {
		let ctx = HydrateContext::in_memory();
		let dom = Rc::clone(ctx.dom());
		(HydrationRegistry::new(ctx), dom)
	}

	#[rstest]
	fn test_init_hydrates_each_root_once() {
		let (registry, dom) = registry();
		button().widget("toggle-button").mount(dom.as_ref(), dom.document());
		div()
			.widget("dropdown")
			.child(button().part("trigger"))
			.child(div().part("panel").hidden(true))
			.mount(dom.as_ref(), dom.document());

		assert_eq!(registry.init(), 2);
		assert_eq!(registry.init(), 0);
		assert_eq!(registry.hydrate_within(dom.document()), 0);
		assert_eq!(registry.len(), 2);
		assert_eq!(registry.count(WidgetKind::Dropdown), 1);
	}

	#[rstest]
	fn test_failing_root_is_skipped() {
		let (registry, dom) = registry();
		let broken = div().widget("typeahead").mount(dom.as_ref(), dom.document());
		let unknown = div().widget("carousel").mount(dom.as_ref(), dom.document());
		button().widget("toggle-button").mount(dom.as_ref(), dom.document());

		assert_eq!(registry.init(), 1);
		assert!(!registry.is_hydrated(broken));
		assert!(!registry.is_hydrated(unknown));
		assert_eq!(dom.attribute(broken, HYDRATED_ATTRIBUTE), None);
	}

	#[rstest]
	fn test_marker_guards_across_registries() {
		let (first, dom) = registry();
		let root = button().widget("toggle-button").mount(dom.as_ref(), dom.document());
		assert_eq!(first.init(), 1);

		let second = HydrationRegistry::new(first.context());
		assert!(second.is_hydrated(root));
		assert_eq!(second.hydrate_within(dom.document()), 0);
	}

	#[rstest]
	fn test_open_event_hydrates_inserted_content() {
		let (registry, dom) = registry();
		let panel = div().mount(dom.as_ref(), dom.document());
		registry.init();

		div()
			.widget("typeahead")
			.child(input().part("input"))
			.child(ul().part("results"))
			.mount(dom.as_ref(), panel);
		assert_eq!(registry.count(WidgetKind::Typeahead), 0);

		crate::events::emit(dom.as_ref(), panel, OPEN, "");
		assert_eq!(registry.count(WidgetKind::Typeahead), 1);
	}

	#[rstest]
	fn test_init_reads_settings_island() {
		let (registry, dom) = registry();
		script()
			.attr("type", "application/json")
			.attr("data-hydrate-settings", "")
			.text(r#"{"endpoint": "/api/lookup"}"#)
			.mount(dom.as_ref(), dom.document());

		registry.init();
		assert_eq!(registry.context().settings().endpoint, "/api/lookup");
	}
}
