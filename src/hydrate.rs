//! Browser hydration of server-rendered widgets
//!
//! This module provides access to lexi-hydrate: the document abstraction,
//! the widget hydrators and the registry that discovers them.
//!
//! ## Architecture
//!
//! - **Document**: widgets talk to a [`Dom`](lexi_hydrate::Dom), in memory
//!   for tests or over web-sys in the browser
//! - **Widgets**: one hydrator per `data-widget` kind
//! - **Registry**: idempotent discovery, re-run when dialogs and panels open
//!
//! In the browser the module exports `hydratePage()`, which builds the
//! registry over the page document on first call.

pub use lexi_hydrate::*;
