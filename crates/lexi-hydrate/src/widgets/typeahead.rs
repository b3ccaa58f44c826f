//! Typeahead: a search input with live suggestions
//!
//! Typing schedules a debounced search; results render into the `results`
//! part. Arrow keys move a clamped highlight, Enter either commits the
//! highlighted suggestion or submits the typed text, and both end in a page
//! navigation unless a listener cancels the event announcing it:
//!
//! | Action | Event (cancelable) | Navigation |
//! |--------|--------------------|------------|
//! | commit | `search-result-click` (value) | the item's result URL |
//! | submit | `submit` (query) | `<resultUrl>?value=<query>&field=<field>` |
//!
//! Committing a suggestion clears the query. Escape cancels pending work;
//! when the list is open it also closes it and clears the query, and stops
//! the key there. With the list closed Escape bubbles on untouched, so an
//! enclosing search bar can close instead.

use std::rc::Rc;

use lexi_core::NavKey;
use lexi_core::result::query_url;

use super::suggest::{Entered, SearchBox};
use super::{WidgetKind, impl_widget};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, ListenerSet, SEARCH_RESULT_CLICK, SUBMIT};
use crate::info_log;

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	search: Rc<SearchBox>,
	result_url: String,
	field: String,
}

/// A hydrated `typeahead` root.
pub struct Typeahead {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl Typeahead {
	/// Hydrates `root`. Requires `input` and `results` parts.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let search = SearchBox::new(ctx, WidgetKind::Typeahead, root, true)?;
		let settings = search.flow().settings();
		let inner = Rc::new(Inner {
			result_url: settings.result_url.clone(),
			field: settings.field.clone(),
			dom: Rc::clone(&dom),
			root,
			search,
		});

		let mut listeners = ListenerSet::new(dom);
		inner.search.bind(&mut listeners);
		listeners.bind(inner.search.input(), "keydown", &inner, Inner::on_key);
		listeners.bind(inner.search.results(), "click", &inner, |inner, event| {
			if let Some(item) = inner.search.commit_at(event.target()) {
				inner.follow(&item.value, &item.target);
			}
		});

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Whether the suggestion list is open.
	pub fn is_open(&self) -> bool {
		self.inner.search.is_open()
	}

	/// Highlighted suggestion.
	pub fn highlighted(&self) -> Option<usize> {
		self.inner.search.highlighted()
	}
}

impl_widget!(Typeahead, WidgetKind::Typeahead);

impl Inner {
	fn on_key(self: &Rc<Self>, event: &DomEvent) {
		let Some(key) = event.key_name().and_then(|key| NavKey::from_key(key, false)) else {
			return;
		};
		match key {
			NavKey::Down | NavKey::Up => {
				if self.search.arrow(key) {
					event.prevent_default();
				}
			}
			NavKey::Enter => {
				event.prevent_default();
				match self.search.enter() {
					Entered::Commit(item) => self.follow(&item.value, &item.target),
					Entered::SubmitRaw => self.submit(),
					Entered::Nothing => {}
				}
			}
			NavKey::Escape => {
				if self.search.escape() {
					self.search.set_query("");
					self.search.clear();
					event.prevent_default();
					event.stop_propagation();
				}
			}
			NavKey::Home | NavKey::End => {}
		}
	}

	fn follow(&self, value: &str, target: &str) {
		self.search.set_query("");
		if events::emit_cancelable(self.dom.as_ref(), self.root, SEARCH_RESULT_CLICK, value) {
			info_log!("opening result {}", target);
			self.dom.navigate(target);
		}
	}

	fn submit(&self) {
		let query = self.search.query().trim().to_string();
		if query.is_empty() {
			return;
		}
		if events::emit_cancelable(self.dom.as_ref(), self.root, SUBMIT, &query) {
			self.dom
				.navigate(&query_url(&self.result_url, &query, &self.field));
		}
	}
}
