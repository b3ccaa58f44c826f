//! Search-backed suggestion lists
//!
//! The typeahead, lookup and multiselect lookup share everything between the
//! keystroke and the highlighted suggestion: the debounced query flow, the
//! rendered result list, clamped keyboard navigation and blur handling.
//! [`SearchBox`] bundles that; each widget adds what happens on commit.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use lexi_core::{Debouncer, ListNav, NavKey, NavOutcome, NavPolicy, ResultItem};

use super::{WidgetKind, bool_attr, is_inside, part, require_part};
use crate::builder::{ElementBuilder, img, li, small, span};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::ListenerSet;
use crate::listbox::Listbox;
use crate::query::{QueryFlow, QueryInput};

/// Markup of one suggestion.
pub(crate) fn render_item(item: &ResultItem) -> ElementBuilder {
	let mut builder = li()
		.part("item")
		.class("lexi-result")
		.attr("role", "option")
		.attr("aria-selected", "false")
		.data("value", &item.value)
		.data("id", &item.id.to_string())
		.data("url", &item.target);
	if item.disabled {
		builder = builder.attr("aria-disabled", "true");
	}
	builder
		.child_opt(item.thumbnail.as_ref().map(|src| {
			img()
				.class("lexi-result__thumbnail")
				.attr("src", src)
				.attr("alt", "")
		}))
		.child(span().class("lexi-result__label").text(&item.label))
		.child_opt(
			item.secondary
				.as_ref()
				.map(|secondary| small().class("lexi-result__secondary").text(secondary)),
		)
}

/// Rendered suggestions plus their navigation state.
pub(crate) struct Suggestions {
	dom: Rc<dyn Dom>,
	owner: NodeId,
	results: NodeId,
	empty: Option<NodeId>,
	listbox: Listbox,
	nav: ListNav,
	items: Vec<ResultItem>,
}

impl Suggestions {
	pub(crate) fn new(
		dom: Rc<dyn Dom>,
		owner: NodeId,
		results: NodeId,
		empty: Option<NodeId>,
		free_text: bool,
	) -> Self {
		let listbox = Listbox::new(Rc::clone(&dom), results);
		Self {
			dom,
			owner,
			results,
			empty,
			listbox,
			nav: ListNav::new(NavPolicy::Clamp).with_free_text(free_text),
			items: Vec::new(),
		}
	}

	pub(crate) fn is_open(&self) -> bool {
		self.nav.is_open()
	}

	pub(crate) fn index(&self) -> Option<usize> {
		self.nav.index()
	}

	pub(crate) fn item(&self, index: usize) -> Option<&ResultItem> {
		self.items.get(index)
	}

	pub(crate) fn index_of(&self, node: NodeId) -> Option<usize> {
		self.listbox.index_of(node)
	}

	/// Replaces the suggestions and opens the list, or the empty state when
	/// there are none.
	pub(crate) fn show(&mut self, items: Vec<ResultItem>) {
		self.dom.clear_children(self.results);
		let nodes = items
			.iter()
			.map(|item| render_item(item).mount(self.dom.as_ref(), self.results))
			.collect();
		self.listbox.set_items(nodes);
		self.nav
			.replace_with_disabled(items.iter().map(|item| item.disabled).collect());
		self.items = items;

		if self.items.is_empty() && self.empty.is_none() {
			self.hide();
			return;
		}
		self.nav.open();
		self.reveal();
	}

	/// Reopens the current suggestions. No-op when there are none.
	pub(crate) fn reopen(&mut self) {
		if self.items.is_empty() || self.nav.is_open() {
			return;
		}
		self.nav.open();
		self.reveal();
	}

	/// Applies a navigation key.
	pub(crate) fn key(&mut self, key: NavKey) -> NavOutcome {
		if !self.nav.is_open() && matches!(key, NavKey::Down | NavKey::Up) {
			if self.items.is_empty() {
				return NavOutcome::Unchanged;
			}
			self.reopen();
			return NavOutcome::Opened;
		}
		let outcome = self.nav.handle_key(key);
		self.apply(outcome);
		outcome
	}

	pub(crate) fn hover(&mut self, index: usize) {
		let outcome = self.nav.hover(index);
		self.apply(outcome);
	}

	/// Commits `index`, returning its item and clearing the list.
	pub(crate) fn commit(&mut self, index: usize) -> Option<ResultItem> {
		match self.nav.commit(index) {
			NavOutcome::Commit(index) => {
				let item = self.items.get(index).cloned();
				self.clear();
				item
			}
			_ => None,
		}
	}

	/// Closes the list, keeping the suggestions. Returns whether it was open.
	pub(crate) fn close(&mut self) -> bool {
		let was_open = self.nav.close() == NavOutcome::Closed;
		self.hide();
		was_open
	}

	/// Closes the list and drops the suggestions.
	pub(crate) fn clear(&mut self) {
		self.nav.close();
		self.hide();
		self.dom.clear_children(self.results);
		self.listbox.set_items(Vec::new());
		self.nav.replace(0);
		self.items.clear();
	}

	fn apply(&mut self, outcome: NavOutcome) {
		match outcome {
			NavOutcome::Moved { to, .. } => self.listbox.highlight(to),
			NavOutcome::Commit(_) | NavOutcome::SubmitRaw | NavOutcome::Closed => self.hide(),
			NavOutcome::Opened | NavOutcome::Unchanged => {}
		}
	}

	fn reveal(&self) {
		let empty = self.items.is_empty();
		self.dom.set_hidden(self.results, empty);
		if let Some(node) = self.empty {
			self.dom.set_hidden(node, !empty);
		}
		self.dom
			.set_attribute(self.owner, "aria-expanded", bool_attr(true));
	}

	fn hide(&mut self) {
		self.listbox.highlight(None);
		self.dom.set_hidden(self.results, true);
		if let Some(node) = self.empty {
			self.dom.set_hidden(node, true);
		}
		self.dom
			.set_attribute(self.owner, "aria-expanded", bool_attr(false));
	}
}

/// What Enter did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Entered {
	/// A suggestion was chosen.
	Commit(ResultItem),
	/// Free text was submitted.
	SubmitRaw,
	/// Nothing happened.
	Nothing,
}

/// Input, result list and query flow of one search widget.
pub(crate) struct SearchBox {
	dom: Rc<dyn Dom>,
	root: NodeId,
	input: NodeId,
	results: NodeId,
	suggestions: RefCell<Suggestions>,
	flow: QueryFlow,
	blur: Debouncer,
}

impl SearchBox {
	/// Resolves the `input`, `results` and optional `empty` parts of `root`.
	pub(crate) fn new(
		ctx: &HydrateContext,
		kind: WidgetKind,
		root: NodeId,
		free_text: bool,
	) -> Result<Rc<Self>> {
		let dom = Rc::clone(ctx.dom());
		let input = require_part(dom.as_ref(), root, kind, "input")?;
		let results = require_part(dom.as_ref(), root, kind, "results")?;
		let empty = part(dom.as_ref(), root, "empty");
		let settings = ctx.settings().for_widget(dom.as_ref(), root);
		let blur = Debouncer::new(Rc::clone(ctx.scheduler()), settings.blur_close_ms);

		dom.set_attribute(input, "aria-expanded", bool_attr(false));
		dom.set_attribute(input, "autocomplete", "off");

		Ok(Rc::new_cyclic(|weak: &Weak<Self>| {
			let weak = weak.clone();
			let flow = QueryFlow::new(
				Rc::clone(ctx.transport()),
				Rc::clone(ctx.scheduler()),
				settings,
				move |delivery| {
					if let Some(search) = weak.upgrade() {
						search.suggestions.borrow_mut().show(delivery.items);
					}
				},
			);
			Self {
				suggestions: RefCell::new(Suggestions::new(
					Rc::clone(&dom),
					input,
					results,
					empty,
					free_text,
				)),
				dom,
				root,
				input,
				results,
				flow,
				blur,
			}
		}))
	}

	/// Binds typing, hovering and focus tracking.
	pub(crate) fn bind(self: &Rc<Self>, listeners: &mut ListenerSet) {
		listeners.bind(self.input, "input", self, |search, _| search.on_typing());
		listeners.bind(self.results, "mouseover", self, |search, event| {
			search.hover(event.target())
		});
		// keep focus in the input while a suggestion is clicked
		listeners.bind(self.results, "mousedown", self, |_, event| {
			event.prevent_default()
		});
		listeners.bind(self.root, "focusout", self, |search, event| {
			search.on_focus_out(event)
		});
		listeners.bind(self.root, "focusin", self, |search, _| search.on_focus_in());
	}

	pub(crate) fn input(&self) -> NodeId {
		self.input
	}

	pub(crate) fn results(&self) -> NodeId {
		self.results
	}

	pub(crate) fn flow(&self) -> &QueryFlow {
		&self.flow
	}

	pub(crate) fn query(&self) -> String {
		self.dom.value(self.input)
	}

	pub(crate) fn set_query(&self, query: &str) {
		self.dom.set_value(self.input, query);
	}

	pub(crate) fn is_open(&self) -> bool {
		self.suggestions.borrow().is_open()
	}

	pub(crate) fn highlighted(&self) -> Option<usize> {
		self.suggestions.borrow().index()
	}

	/// Applies an arrow key. Returns true when the key was consumed.
	pub(crate) fn arrow(&self, key: NavKey) -> bool {
		let outcome = self.suggestions.borrow_mut().key(key);
		outcome != NavOutcome::Unchanged || self.is_open()
	}

	/// Applies Enter.
	pub(crate) fn enter(&self) -> Entered {
		let (outcome, item) = {
			let mut suggestions = self.suggestions.borrow_mut();
			let outcome = suggestions.key(NavKey::Enter);
			let item = match outcome {
				NavOutcome::Commit(index) => suggestions.item(index).cloned(),
				_ => None,
			};
			if item.is_some() {
				suggestions.clear();
			}
			(outcome, item)
		};
		match (outcome, item) {
			(NavOutcome::Commit(_), Some(item)) => {
				self.flow.cancel();
				Entered::Commit(item)
			}
			(NavOutcome::SubmitRaw, _) => {
				self.flow.cancel();
				Entered::SubmitRaw
			}
			_ => Entered::Nothing,
		}
	}

	/// Commits the suggestion containing `node` (pointer click).
	pub(crate) fn commit_at(&self, node: NodeId) -> Option<ResultItem> {
		let item = {
			let mut suggestions = self.suggestions.borrow_mut();
			let index = suggestions.index_of(node)?;
			suggestions.commit(index)
		};
		if item.is_some() {
			self.flow.cancel();
		}
		item
	}

	/// Cancels pending work and closes the list. Returns whether it was open.
	pub(crate) fn escape(&self) -> bool {
		self.flow.cancel();
		self.blur.cancel();
		self.suggestions.borrow_mut().close()
	}

	/// Cancels pending work and drops the suggestions.
	pub(crate) fn clear(&self) {
		self.flow.cancel();
		self.suggestions.borrow_mut().clear();
	}

	fn on_typing(&self) {
		let query = self.query();
		if self.flow.input(&query) == QueryInput::TooShort {
			self.suggestions.borrow_mut().clear();
		}
	}

	fn hover(&self, node: NodeId) {
		let mut suggestions = self.suggestions.borrow_mut();
		if let Some(index) = suggestions.index_of(node) {
			suggestions.hover(index);
		}
	}

	fn on_focus_out(self: &Rc<Self>, event: &DomEvent) {
		if is_inside(self.dom.as_ref(), self.root, event.related_target()) {
			return;
		}
		self.flow.cancel();
		let weak = Rc::downgrade(self);
		self.blur.schedule(move || {
			if let Some(search) = weak.upgrade()
				&& !is_inside(search.dom.as_ref(), search.root, search.dom.active_element())
			{
				search.suggestions.borrow_mut().close();
			}
		});
	}

	fn on_focus_in(&self) {
		self.blur.cancel();
		if !self.query().trim().is_empty() {
			self.suggestions.borrow_mut().reopen();
		}
	}
}
