//! Logging abstraction layer for lexi-hydrate
//!
//! This module provides logging macros that work across WASM and native targets.
//! Hydration never surfaces errors to users, so these macros are the only
//! channel for transport failures, decode fallbacks and skipped widgets.
//!
//! ## Macro Overview
//!
//! | Macro | Debug Assertions | Feature Required | WASM | Non-WASM |
//! |-------|------------------|------------------|------|----------|
//! | `debug_log!` | Required | `debug-hooks` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | Required | None | `console.info` | `tracing::info!` |
//! | `warn_log!` | Not required | None | `console.warn` | `tracing::warn!` |
//! | `error_log!` | Not required | None | `console.error` | `tracing::error!` |
//!
//! Warnings and errors stay enabled in release builds: a widget that fails to
//! hydrate is otherwise invisible.
//!
//! ## Example
//!
//! ```ignore
//! use lexi_hydrate::{debug_log, info_log, warn_log, error_log};
//!
//! debug_log!("highlight {:?} -> {:?}", from, to);
//! info_log!("hydrated {} widgets", count);
//! warn_log!("search request failed: {}", error);
//! error_log!("typeahead at {:?} not hydrated: {}", root, error);
//! ```

#[doc(hidden)]
pub mod __private {
	#[cfg(not(target_arch = "wasm32"))]
	pub use tracing;
	#[cfg(target_arch = "wasm32")]
	pub use web_sys;
}

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
///
/// Without both, the arguments are type-checked and dropped.
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::debug!(target: "lexi_hydrate", "{}", format!($($arg)*));
	}};
}

/// Discards the message, still type-checking its arguments
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		let _ = || format!($($arg)*);
	}};
}

/// Logs an info message (requires `debug_assertions`)
///
/// # Example
///
/// ```ignore
/// info_log!("hydrated {} widgets", count);
/// ```
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::info!(target: "lexi_hydrate", "{}", format!($($arg)*));
	}};
}

/// Discards the message in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		let _ = || format!($($arg)*);
	}};
}

/// Logs a warning message
///
/// # Example
///
/// ```ignore
/// warn_log!("search request failed: {}", error);
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::warn!(target: "lexi_hydrate", "{}", format!($($arg)*));
	}};
}

/// Logs an error message
///
/// # Example
///
/// ```ignore
/// error_log!("dialog at {:?} not hydrated: {}", root, error);
/// ```
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::logging::__private::tracing::error!(target: "lexi_hydrate", "{}", format!($($arg)*));
	}};
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use crate::dom::{Dom, MemoryDom};
	use crate::widgets::WidgetKind;
	use crate::{debug_log, error_log, info_log, warn_log};

	#[rstest]
	fn test_macros_accept_widget_arguments() {
		let dom = MemoryDom::new();
		let root = dom.body();
		debug_log!("highlight {:?} -> {:?}", None::<usize>, Some(2));
		info_log!("hydrated {} under {}", WidgetKind::Menu, root);
		warn_log!("search request failed: {}", "status 503");
		error_log!("{} at {} not hydrated", WidgetKind::Dialog, dom.document());
	}

	#[rstest]
	fn test_macros_without_arguments() {
		debug_log!("rescan");
		info_log!("registry ready");
		warn_log!("no settings island");
		error_log!("no document");
	}
}
