//! # lexi-core
//!
//! Platform-neutral building blocks of the lexi hydration layer. Nothing in
//! this crate touches the DOM, so everything here runs and tests natively.
//!
//! ## Modules
//!
//! - [`text`]: locale-free byte string primitives (ASCII-only case folding)
//! - [`json`]: ad hoc array/field extraction and the tolerant typed decoder
//! - [`result`]: [`ResultItem`], [`ResultSchema`] and navigation URLs
//! - [`nav`]: the roving-selection state machine shared by list widgets
//! - [`timer`]: [`Scheduler`], [`Debouncer`] and a virtual-clock scheduler
//! - [`error`]: configuration errors
//!
//! ## Example
//!
//! ```
//! use lexi_core::json::decode_results;
//! use lexi_core::nav::{ListNav, NavKey, NavOutcome, NavPolicy};
//! use lexi_core::result::{LinkContext, ResultSchema};
//!
//! let body = r#"{"exact":[{"text":"chat","languageCode":"fr"}],"partial":[{"text":"chatte"}]}"#;
//! let decoded = decode_results(body, &ResultSchema::default(), &LinkContext::new("/results", "text"));
//!
//! let mut nav = ListNav::new(NavPolicy::Clamp);
//! nav.replace(decoded.items.len());
//! nav.open();
//! nav.handle_key(NavKey::Down);
//! assert_eq!(nav.handle_key(NavKey::Enter), NavOutcome::Commit(0));
//! assert_eq!(decoded.items[0].target, "/results/fr/chat/1");
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod json;
pub mod nav;
pub mod result;
pub mod text;
pub mod timer;

pub use error::CoreError;
pub use json::{DecodeSource, Decoded, decode_results};
pub use nav::{ListNav, NavKey, NavOutcome, NavPolicy, NavState};
pub use result::{LinkContext, ResultItem, ResultSchema};
pub use timer::{Debouncer, ManualScheduler, Scheduler, TimerCallback, TimerId};
