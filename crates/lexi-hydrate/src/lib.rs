//! Lexi Hydrate - progressive enhancement of server-rendered widgets
//!
//! The server renders complete, usable HTML. This crate finds the widget roots
//! in it and attaches keyboard navigation, debounced search, disclosure and
//! selection behavior, talking to the rest of the page only through custom
//! DOM events.
//!
//! ## Architecture
//!
//! - [`dom`]: the [`Dom`] trait over node handles, an in-memory document for
//!   native tests and a `web-sys` document for the browser
//! - [`builder`]: element builder used to render results and chips
//! - [`events`]: custom event names and per-widget listener ownership
//! - [`fetch`]: search transport
//! - [`query`]: debounced search requests with a stale-response guard
//! - [`listbox`]: highlight and scrolling of option lists
//! - [`widgets`]: the seventeen widget hydrators
//! - [`registry`]: idempotent discovery and ownership of widget instances
//! - [`config`], [`prefs`], [`context`], [`timer`], [`logging`]
//! - [`testing`]: a harness driving widgets without a browser
//!
//! ## Example
//!
//! ```
//! use lexi_hydrate::builder::{div, input, ul};
//! use lexi_hydrate::testing::Harness;
//! use lexi_hydrate::widgets::WidgetKind;
//!
//! let h = Harness::new();
//! let root = h.mount(
//!     div()
//!         .widget("typeahead")
//!         .child(input().part("input"))
//!         .child(ul().part("results").hidden(true)),
//! );
//! let registry = h.hydrate();
//! assert_eq!(registry.count(WidgetKind::Typeahead), 1);
//!
//! h.type_text(h.part(root, "input"), "chat");
//! h.advance(250);
//! assert_eq!(h.transport.requests(), vec!["/api/search?value=chat&field=text".to_string()]);
//! ```

#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod context;
pub mod dom;
pub mod error;
pub mod events;
pub mod fetch;
pub mod listbox;
pub mod logging;
pub mod prefs;
pub mod query;
pub mod registry;
pub mod testing;
pub mod timer;
pub mod widgets;

#[cfg(target_arch = "wasm32")]
pub mod launch;

pub use config::{HydrateSettings, SearchSettings};
pub use context::HydrateContext;
pub use dom::{Dom, DomEvent, MemoryDom, NodeId};
pub use error::{HydrateError, Result};
pub use fetch::{FetchError, MockTransport, Transport};
pub use prefs::{MemoryStore, PreferenceStore};
pub use registry::HydrationRegistry;
pub use widgets::{Widget, WidgetKind};

#[cfg(target_arch = "wasm32")]
pub use launch::hydrate_page;
