//! Test harness for widget behavior
//!
//! [`Harness`] bundles an in-memory document, a manual clock, a mock
//! transport and an in-memory preference store behind one
//! [`HydrateContext`], plus shorthands for the user interactions widget
//! tests script: clicks, keys, typing, focus moves and the passage of time.
//!
//! ## Example
//!
//! ```
//! use lexi_hydrate::builder::button;
//! use lexi_hydrate::testing::Harness;
//!
//! let h = Harness::new();
//! let root = h.mount(button().widget("toggle-button").attr("aria-pressed", "false"));
//! let _registry = h.hydrate();
//!
//! h.click(root);
//! assert_eq!(h.events("toggle-button-update"), vec!["true".to_string()]);
//! ```

use std::rc::Rc;

use crate::builder::ElementBuilder;
use crate::config::HydrateSettings;
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, MemoryDom, NodeId};
use crate::fetch::{FetchError, MockTransport};
use crate::prefs::MemoryStore;
use crate::registry::HydrationRegistry;
use crate::timer::ManualScheduler;
use crate::widgets;

/// In-memory page plus the handles to drive it.
pub struct Harness {
	/// The document.
	pub dom: Rc<MemoryDom>,
	/// Virtual clock driving every debounce and timeout.
	pub clock: Rc<ManualScheduler>,
	/// Transport recording search requests.
	pub transport: Rc<MockTransport>,
	/// Preference storage.
	pub prefs: Rc<MemoryStore>,
	ctx: HydrateContext,
}

impl Default for Harness {
	fn default() -> Self {
		Self::new()
	}
}

impl Harness {
	/// Creates a harness with default settings.
	pub fn new() -> Self {
		Self::with_settings(HydrateSettings::default())
	}

	/// Creates a harness with `settings`.
	pub fn with_settings(settings: HydrateSettings) -> Self {
		let dom = Rc::new(MemoryDom::new());
		let clock = Rc::new(ManualScheduler::new());
		let transport = Rc::new(MockTransport::new());
		let prefs = Rc::new(MemoryStore::new());
		let ctx = HydrateContext::new(
			dom.clone(),
			clock.clone(),
			transport.clone(),
			prefs.clone(),
		)
		.with_settings(settings);
		Self {
			dom,
			clock,
			transport,
			prefs,
			ctx,
		}
	}

	/// The shared context.
	pub fn ctx(&self) -> &HydrateContext {
		&self.ctx
	}

	/// Mounts `markup` into the body.
	pub fn mount(&self, markup: ElementBuilder) -> NodeId {
		markup.mount(self.dom.as_ref(), self.dom.body())
	}

	/// Initializes a registry over the whole document.
	pub fn hydrate(&self) -> HydrationRegistry {
		let registry = HydrationRegistry::new(self.ctx.clone());
		registry.init();
		registry
	}

	/// Hydrates `root` directly as `kind`, bypassing the registry.
	pub fn hydrate_one(
		&self,
		kind: widgets::WidgetKind,
		root: NodeId,
	) -> crate::error::Result<Box<dyn widgets::Widget>> {
		widgets::hydrate(&self.ctx, kind, root)
	}

	/// First part named `name` under `root`, at any depth.
	///
	/// # Panics
	///
	/// Panics if there is none.
	pub fn part(&self, root: NodeId, name: &str) -> NodeId {
		self.dom
			.query(root, &format!(r#"[data-part="{name}"]"#))
			.unwrap_or_else(|| panic!("no `{name}` part under {root}"))
	}

	/// Every part named `name` under `root`, at any depth.
	pub fn parts(&self, root: NodeId, name: &str) -> Vec<NodeId> {
		self.dom
			.query_all(root, &format!(r#"[data-part="{name}"]"#))
	}

	/// Clicks `node`. Returns `false` if a listener prevented the default.
	pub fn click(&self, node: NodeId) -> bool {
		self.dom
			.dispatch(&DomEvent::new("click", node).cancelable(true))
	}

	/// Presses `key` on `node`. Returns `false` if a listener prevented the
	/// default.
	pub fn key(&self, node: NodeId, key: &str) -> bool {
		self.dom.dispatch(&DomEvent::key(node, key))
	}

	/// Replaces the value of `input` and fires `input`.
	pub fn type_text(&self, input: NodeId, text: &str) {
		self.dom.set_value(input, text);
		self.dom.dispatch(&DomEvent::new("input", input));
	}

	/// Sets a checkbox and fires `change`.
	pub fn change(&self, checkbox: NodeId, checked: bool) {
		self.dom.set_checked(checkbox, checked);
		self.dom.dispatch(&DomEvent::new("change", checkbox));
	}

	/// Moves the pointer over `node`.
	pub fn hover(&self, node: NodeId) {
		self.dom.dispatch(&DomEvent::new("mouseover", node));
	}

	/// Focuses `node`.
	pub fn focus(&self, node: NodeId) {
		self.dom.focus(node);
	}

	/// Moves focus out of the document.
	pub fn blur(&self) {
		if let Some(active) = self.dom.active_element() {
			self.dom.blur(active);
		}
	}

	/// Advances the clock by `ms`, firing due timers.
	pub fn advance(&self, ms: u64) {
		self.clock.advance(ms);
	}

	/// Answers the most recent search request with `body`.
	pub fn respond(&self, body: &str) -> bool {
		self.transport.respond_latest(Ok(body.to_string()))
	}

	/// Fails the most recent search request.
	pub fn fail(&self, error: FetchError) -> bool {
		self.transport.respond_latest(Err(error))
	}

	/// Payloads of the dispatched `kind` events, oldest first.
	pub fn events(&self, kind: &str) -> Vec<String> {
		self.dom
			.dispatched_of(kind)
			.into_iter()
			.map(|event| event.detail.unwrap_or_default())
			.collect()
	}

	/// URLs the page navigated to, oldest first.
	pub fn navigations(&self) -> Vec<String> {
		self.dom.navigations()
	}
}
