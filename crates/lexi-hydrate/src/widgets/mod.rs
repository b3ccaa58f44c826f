//! Widget hydrators
//!
//! Every widget root carries `data-widget="<kind>"`. The elements a widget
//! needs carry `data-part="<name>"` and belong to the nearest widget root
//! above them, so a typeahead nested in a search bar never picks up the
//! search bar's parts and vice versa.
//!
//! ```html
//! <div data-widget="search-bar">
//!   <button data-part="trigger" aria-expanded="false">Search</button>
//!   <div data-part="panel" hidden>
//!     <div data-widget="typeahead">
//!       <input data-part="input" type="search">
//!       <ul data-part="results" role="listbox" hidden></ul>
//!       <p data-part="empty" hidden>No results</p>
//!     </div>
//!     <button data-part="close">Close</button>
//!   </div>
//! </div>
//! ```
//!
//! Each hydrator resolves its parts, binds its listeners and returns a
//! [`Widget`] handle. Dropping the handle removes the listeners.

use std::fmt;
use std::str::FromStr;

use crate::context::HydrateContext;
use crate::dom::{Dom, NodeId};
use crate::error::{HydrateError, Result};
use crate::registry::HYDRATED_ATTRIBUTE;

mod accordion;
mod combobox;
mod dialog;
mod dropdown;
mod lookup;
mod menu;
mod menu_button;
mod multiselect;
mod popover;
mod preference;
mod search_bar;
mod select;
mod suggest;
mod table;
mod tabs;
mod toggle;
mod typeahead;

pub use accordion::Accordion;
pub use combobox::Combobox;
pub use dialog::Dialog;
pub use dropdown::Dropdown;
pub use lookup::Lookup;
pub use menu::Menu;
pub use menu_button::MenuButton;
pub use multiselect::MultiselectLookup;
pub use popover::Popover;
pub use preference::PreferenceToggle;
pub use search_bar::SearchBar;
pub use select::Select;
pub use table::DataTable;
pub use tabs::Tabs;
pub use toggle::{ToggleButton, ToggleGroup};
pub use typeahead::Typeahead;

/// Attribute naming the widget kind of a root.
pub const WIDGET_ATTRIBUTE: &str = "data-widget";

/// Attribute naming a part of a widget.
pub const PART_ATTRIBUTE: &str = "data-part";

/// Selector of every widget root.
pub const WIDGET_SELECTOR: &str = "[data-widget]";

/// Widget kinds, named as in `data-widget`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
	/// Full-screen search overlay around a typeahead
	SearchBar,
	/// Search input with live suggestions
	Typeahead,
	/// Single-value picker backed by a search
	Lookup,
	/// Multi-value picker producing chips
	MultiselectLookup,
	/// Trigger and panel disclosure
	Dropdown,
	/// Listbox-backed select
	Select,
	/// Input filtering a static list
	Combobox,
	/// Static list of actions
	Menu,
	/// Trigger opening a nested menu
	MenuButton,
	/// Modal dialog
	Dialog,
	/// Non-modal floating panel
	Popover,
	/// Tab strip with panels
	Tabs,
	/// Two-state button
	ToggleButton,
	/// Set of toggle buttons
	ToggleGroup,
	/// Independently collapsible sections
	Accordion,
	/// Sortable, paginated, selectable table
	DataTable,
	/// Cycles a persisted display preference
	PreferenceToggle,
}

impl WidgetKind {
	/// Every kind, in hydration order.
	pub const ALL: [WidgetKind; 17] = [
		WidgetKind::SearchBar,
		WidgetKind::Typeahead,
		WidgetKind::Lookup,
		WidgetKind::MultiselectLookup,
		WidgetKind::Dropdown,
		WidgetKind::Select,
		WidgetKind::Combobox,
		WidgetKind::Menu,
		WidgetKind::MenuButton,
		WidgetKind::Dialog,
		WidgetKind::Popover,
		WidgetKind::Tabs,
		WidgetKind::ToggleButton,
		WidgetKind::ToggleGroup,
		WidgetKind::Accordion,
		WidgetKind::DataTable,
		WidgetKind::PreferenceToggle,
	];

	/// Value of `data-widget`.
	pub fn as_str(self) -> &'static str {
		match self {
			WidgetKind::SearchBar => "search-bar",
			WidgetKind::Typeahead => "typeahead",
			WidgetKind::Lookup => "lookup",
			WidgetKind::MultiselectLookup => "multiselect-lookup",
			WidgetKind::Dropdown => "dropdown",
			WidgetKind::Select => "select",
			WidgetKind::Combobox => "combobox",
			WidgetKind::Menu => "menu",
			WidgetKind::MenuButton => "menu-button",
			WidgetKind::Dialog => "dialog",
			WidgetKind::Popover => "popover",
			WidgetKind::Tabs => "tabs",
			WidgetKind::ToggleButton => "toggle-button",
			WidgetKind::ToggleGroup => "toggle-group",
			WidgetKind::Accordion => "accordion",
			WidgetKind::DataTable => "data-table",
			WidgetKind::PreferenceToggle => "preference-toggle",
		}
	}

	/// Parses a `data-widget` value.
	pub fn from_attr(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.as_str() == value.trim())
	}
}

impl fmt::Display for WidgetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for WidgetKind {
	type Err = HydrateError;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_attr(s).ok_or_else(|| HydrateError::UnknownWidget(s.to_string()))
	}
}

/// A hydrated widget instance.
pub trait Widget {
	/// Kind of the widget.
	fn kind(&self) -> WidgetKind;

	/// Root element.
	fn root(&self) -> NodeId;
}

/// Hydrates `root` as a widget of `kind`.
///
/// Fails with [`HydrateError::AlreadyHydrated`] when the root carries the
/// hydrated marker.
///
/// ## Example
///
/// ```
/// use lexi_hydrate::builder::button;
/// use lexi_hydrate::context::HydrateContext;
/// use lexi_hydrate::dom::Dom;
/// use lexi_hydrate::widgets::{self, WidgetKind};
///
/// let ctx = HydrateContext::in_memory();
/// let dom = ctx.dom().clone();
/// let root = button().widget("toggle-button").attr("aria-pressed", "false").build(dom.as_ref());
/// dom.append_child(dom.document(), root);
///
/// let widget = widgets::hydrate(&ctx, WidgetKind::ToggleButton, root).unwrap();
/// assert_eq!(widget.kind(), WidgetKind::ToggleButton);
/// ```
pub fn hydrate(ctx: &HydrateContext, kind: WidgetKind, root: NodeId) -> Result<Box<dyn Widget>> {
	if ctx.dom().attribute(root, HYDRATED_ATTRIBUTE).as_deref() == Some("true") {
		return Err(HydrateError::AlreadyHydrated(kind));
	}
	Ok(match kind {
		WidgetKind::SearchBar => Box::new(SearchBar::hydrate(ctx, root)?),
		WidgetKind::Typeahead => Box::new(Typeahead::hydrate(ctx, root)?),
		WidgetKind::Lookup => Box::new(Lookup::hydrate(ctx, root)?),
		WidgetKind::MultiselectLookup => Box::new(MultiselectLookup::hydrate(ctx, root)?),
		WidgetKind::Dropdown => Box::new(Dropdown::hydrate(ctx, root)?),
		WidgetKind::Select => Box::new(Select::hydrate(ctx, root)?),
		WidgetKind::Combobox => Box::new(Combobox::hydrate(ctx, root)?),
		WidgetKind::Menu => Box::new(Menu::hydrate(ctx, root)?),
		WidgetKind::MenuButton => Box::new(MenuButton::hydrate(ctx, root)?),
		WidgetKind::Dialog => Box::new(Dialog::hydrate(ctx, root)?),
		WidgetKind::Popover => Box::new(Popover::hydrate(ctx, root)?),
		WidgetKind::Tabs => Box::new(Tabs::hydrate(ctx, root)?),
		WidgetKind::ToggleButton => Box::new(ToggleButton::hydrate(ctx, root)?),
		WidgetKind::ToggleGroup => Box::new(ToggleGroup::hydrate(ctx, root)?),
		WidgetKind::Accordion => Box::new(Accordion::hydrate(ctx, root)?),
		WidgetKind::DataTable => Box::new(DataTable::hydrate(ctx, root)?),
		WidgetKind::PreferenceToggle => Box::new(PreferenceToggle::hydrate(ctx, root)?),
	})
}

/// Implements [`Widget`] for a hydrator holding `inner.root`.
macro_rules! impl_widget {
	($ty:ty, $kind:expr) => {
		impl $crate::widgets::Widget for $ty {
			fn kind(&self) -> $crate::widgets::WidgetKind {
				$kind
			}

			fn root(&self) -> $crate::dom::NodeId {
				self.inner.root
			}
		}
	};
}
pub(crate) use impl_widget;

/// Nearest widget root strictly above `node`.
pub(crate) fn owner(dom: &dyn Dom, node: NodeId) -> Option<NodeId> {
	dom.parent(node)
		.and_then(|parent| dom.closest(parent, WIDGET_SELECTOR))
}

/// Parts named `name` that belong to `root`, in document order.
pub(crate) fn parts(dom: &dyn Dom, root: NodeId, name: &str) -> Vec<NodeId> {
	dom.query_all(root, &format!(r#"[{PART_ATTRIBUTE}="{name}"]"#))
		.into_iter()
		.filter(|&node| owner(dom, node) == Some(root))
		.collect()
}

/// First part named `name` that belongs to `root`.
pub(crate) fn part(dom: &dyn Dom, root: NodeId, name: &str) -> Option<NodeId> {
	parts(dom, root, name).into_iter().next()
}

/// Like [`part`], failing with [`HydrateError::MissingPart`].
pub(crate) fn require_part(
	dom: &dyn Dom,
	root: NodeId,
	widget: WidgetKind,
	name: &'static str,
) -> Result<NodeId> {
	part(dom, root, name).ok_or(HydrateError::MissingPart { widget, part: name })
}

/// Non-empty attribute of `node`, failing with [`HydrateError::MissingAttribute`].
pub(crate) fn require_attribute(
	dom: &dyn Dom,
	node: NodeId,
	widget: WidgetKind,
	attribute: &'static str,
) -> Result<String> {
	dom.attribute(node, attribute)
		.filter(|value| !value.trim().is_empty())
		.ok_or(HydrateError::MissingAttribute { widget, attribute })
}

/// Value of an item: `data-value`, else its trimmed text.
pub(crate) fn item_value(dom: &dyn Dom, item: NodeId) -> String {
	dom.attribute(item, "data-value")
		.unwrap_or_else(|| dom.text(item).trim().to_string())
}

/// Whether `node` sits inside `root`, treating `None` as outside.
pub(crate) fn is_inside(dom: &dyn Dom, root: NodeId, node: Option<NodeId>) -> bool {
	node.is_some_and(|node| dom.contains(root, node))
}

/// `"true"` or `"false"`.
pub(crate) fn bool_attr(value: bool) -> &'static str {
	if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::{button, div, input, ul};
	use crate::dom::MemoryDom;
	use rstest::rstest;

	#[rstest]
	fn test_kind_names_round_trip() {
		for kind in WidgetKind::ALL {
			assert_eq!(WidgetKind::from_attr(kind.as_str()), Some(kind));
		}
		assert_eq!(WidgetKind::from_attr("carousel"), None);
		assert!(matches!(
			"carousel".parse::<WidgetKind>(),
			Err(HydrateError::UnknownWidget(name)) if name == "carousel"
		));
	}

	#[rstest]
	fn test_parts_skip_nested_widgets() {
		let dom = MemoryDom::new();
		let outer = div()
			.widget("search-bar")
			.child(button().part("trigger"))
			.child(
				div().part("panel").child(
					div()
						.widget("typeahead")
						.child(input().part("input"))
						.child(ul().part("results")),
				),
			)
			.child(button().part("close"))
			.mount(&dom, dom.body());
		let inner = dom.query(outer, r#"[data-widget="typeahead"]"#).unwrap();

		assert_eq!(parts(&dom, outer, "trigger").len(), 1);
		assert!(part(&dom, outer, "input").is_none());
		assert!(part(&dom, inner, "input").is_some());
		assert!(part(&dom, inner, "close").is_none());
		assert!(matches!(
			require_part(&dom, outer, WidgetKind::SearchBar, "results"),
			Err(HydrateError::MissingPart { part: "results", .. })
		));
	}

	#[rstest]
	fn test_require_attribute_rejects_blank() {
		let dom = MemoryDom::new();
		let root = div().id("  ").mount(&dom, dom.body());
		assert!(require_attribute(&dom, root, WidgetKind::Dialog, "id").is_err());
	}

	#[rstest]
	fn test_hydrate_refuses_marked_root() {
		let ctx = HydrateContext::in_memory();
		let dom = ctx.dom().clone();
		let root = button()
			.widget("toggle-button")
			.attr(HYDRATED_ATTRIBUTE, "true")
			.mount(dom.as_ref(), dom.document());

		assert!(matches!(
			hydrate(&ctx, WidgetKind::ToggleButton, root),
			Err(HydrateError::AlreadyHydrated(WidgetKind::ToggleButton))
		));
	}
}
