//! # Lexi
//!
//! Progressive hydration for server-rendered dictionary pages.
//!
//! The server renders complete, working HTML; lexi finds the widgets in it
//! (`data-widget="typeahead"`, `"menu"`, `"dialog"`, ...) and attaches
//! keyboard navigation, debounced search and disclosure behavior. Widgets
//! talk to each other and to the page only through custom DOM events.
//!
//! ## Crates
//!
//! - [`core`] (`lexi-core`): byte string primitives, the tolerant result
//!   decoder, the list navigation state machine and timers
//! - [`hydrate`] (`lexi-hydrate`): the document abstraction, the widget
//!   hydrators, the registry and the WASM entry point
//!
//! ## Feature Flags
//!
//! - `console_error_panic_hook` - readable panic messages in the browser
//! - `debug-hooks` - verbose debug logging in debug builds
//!
//! ## Quick Example
//!
//! ```rust
//! use lexi::prelude::*;
//! use lexi::hydrate::builder::{li, ul};
//! use lexi::hydrate::testing::Harness;
//!
//! let h = Harness::new();
//! let menu = h.mount(
//!     ul().widget("menu")
//!         .child(li().part("item").data("value", "copy"))
//!         .child(li().part("item").data("value", "cite")),
//! );
//! let registry = h.hydrate();
//! assert_eq!(registry.count(WidgetKind::Menu), 1);
//!
//! h.key(menu, "ArrowUp");
//! h.key(menu, "Enter");
//! assert_eq!(h.events(MENU_ITEM_SELECT), vec!["cite".to_string()]);
//! ```

pub mod core;
pub mod hydrate;

pub use lexi_core::{ListNav, NavKey, NavOutcome, NavPolicy, NavState, ResultItem, ResultSchema};
pub use lexi_hydrate::{
	Dom, HydrateContext, HydrateError, HydrateSettings, HydrationRegistry, Result, Widget,
	WidgetKind,
};

#[cfg(target_arch = "wasm32")]
pub use lexi_hydrate::hydrate_page;

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::{
		Dom, HydrateContext, HydrateError, HydrateSettings, HydrationRegistry, ListNav, NavKey,
		NavOutcome, NavPolicy, NavState, ResultItem, Widget, WidgetKind,
	};

	// Custom events dispatched by widgets
	pub use lexi_hydrate::events::{
		CHIP_REMOVE, CLOSE, LOOKUP_SELECT, MENU_ITEM_SELECT, MULTISELECT_LOOKUP_SELECT, OPEN,
		SEARCH_RESULT_CLICK, SELECT, SUBMIT, TABLE_PAGE_CHANGE, TABLE_SELECTION_CHANGE,
		TABLE_SORT_CHANGE, TOGGLE_BUTTON_UPDATE,
	};
}
