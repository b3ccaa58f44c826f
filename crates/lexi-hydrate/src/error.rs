//! Error types for widget hydration
//!
//! Every error here is local to one widget instance. The registry logs it
//! and moves on to the next root; nothing is propagated to the page.

use thiserror::Error;

use crate::widgets::WidgetKind;

/// Error raised while hydrating a widget root.
#[derive(Debug, Error)]
pub enum HydrateError {
	/// A required `data-part` element was not found under the root
	#[error("{widget} is missing its `{part}` part")]
	MissingPart {
		/// Widget kind
		widget: WidgetKind,
		/// Part name
		part: &'static str,
	},

	/// A required attribute was not found on the root or a part
	#[error("{widget} is missing the `{attribute}` attribute")]
	MissingAttribute {
		/// Widget kind
		widget: WidgetKind,
		/// Attribute name
		attribute: &'static str,
	},

	/// The root was hydrated before
	#[error("{0} root is already hydrated")]
	AlreadyHydrated(WidgetKind),

	/// `data-widget` names no known widget kind
	#[error("Unknown widget kind: {0}")]
	UnknownWidget(String),

	/// The settings island is not valid settings JSON
	#[error("Invalid settings: {0}")]
	InvalidSettings(#[source] serde_json::Error),
}

/// Result type for hydration
pub type Result<T> = std::result::Result<T, HydrateError>;
