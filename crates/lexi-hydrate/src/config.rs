//! Hydration settings
//!
//! Page-wide settings come from an optional JSON island:
//!
//! ```html
//! <script type="application/json" data-hydrate-settings>
//!   {"endpoint": "/api/search", "resultUrl": "/results", "queryDebounceMs": 250}
//! </script>
//! ```
//!
//! Every field is optional. Search widgets may override the search-related
//! fields with data attributes on their root:
//!
//! | Attribute | Field |
//! |-----------|-------|
//! | `data-endpoint` | `endpoint` |
//! | `data-field` | `field` |
//! | `data-result-url` | `resultUrl` |
//! | `data-result-template` | `resultTemplate` |
//! | `data-debounce` | `queryDebounceMs` |
//! | `data-min-length` | `minQueryLength` |

use lexi_core::ResultSchema;
use lexi_core::error::parse_delay_ms;
use lexi_core::result::LinkContext;
use lexi_core::timer::{BLUR_CLOSE_MS, DISMISS_MS, QUERY_DEBOUNCE_MS};
use serde::{Deserialize, Serialize};

use crate::dom::{Dom, NodeId};
use crate::error::{HydrateError, Result};
use crate::warn_log;

/// Selector of the settings island.
pub const SETTINGS_SELECTOR: &str = "script[data-hydrate-settings]";

/// Default search endpoint.
pub const DEFAULT_ENDPOINT: &str = "/api/search";

/// Default display field.
pub const DEFAULT_FIELD: &str = "text";

/// Default base path of result pages.
pub const DEFAULT_RESULT_URL: &str = "/results";

/// Default fetch timeout.
pub const FETCH_TIMEOUT_MS: u32 = 10_000;

/// Page-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HydrateSettings {
	/// Search endpoint.
	pub endpoint: String,
	/// Display field sent as `field=` and read from each result.
	pub field: String,
	/// Base path of result pages.
	pub result_url: String,
	/// Item URL template override.
	pub result_template: Option<String>,
	/// Delay between the last keystroke and the request.
	pub query_debounce_ms: u32,
	/// Delay before a blurred widget closes.
	pub blur_close_ms: u32,
	/// Length of dismiss animations.
	pub dismiss_ms: u32,
	/// Requests still pending after this long count as failed.
	pub fetch_timeout_ms: u32,
	/// Shorter queries clear the results instead of searching.
	pub min_query_length: usize,
	/// Field names read from responses.
	pub schema: ResultSchema,
}

impl Default for HydrateSettings {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			field: DEFAULT_FIELD.to_string(),
			result_url: DEFAULT_RESULT_URL.to_string(),
			result_template: None,
			query_debounce_ms: QUERY_DEBOUNCE_MS,
			blur_close_ms: BLUR_CLOSE_MS,
			dismiss_ms: DISMISS_MS,
			fetch_timeout_ms: FETCH_TIMEOUT_MS,
			min_query_length: 1,
			schema: ResultSchema::default(),
		}
	}
}

impl HydrateSettings {
	/// Parses settings from JSON. Omitted fields keep their defaults.
	///
	/// ## Example
	///
	/// ```
	/// use lexi_hydrate::config::HydrateSettings;
	///
	/// let settings = HydrateSettings::from_json(r#"{"endpoint": "/lookup", "queryDebounceMs": 150}"#).unwrap();
	/// assert_eq!(settings.endpoint, "/lookup");
	/// assert_eq!(settings.query_debounce_ms, 150);
	/// assert_eq!(settings.field, "text");
	/// ```
	pub fn from_json(json: &str) -> Result<Self> {
		serde_json::from_str(json).map_err(HydrateError::InvalidSettings)
	}

	/// Reads the settings island of the document, falling back to defaults.
	pub fn from_document(dom: &dyn Dom) -> Self {
		let Some(island) = dom.query(dom.document(), SETTINGS_SELECTOR) else {
			return Self::default();
		};
		match Self::from_json(&dom.text(island)) {
			Ok(settings) => settings,
			Err(error) => {
				warn_log!("ignoring hydrate settings: {}", error);
				Self::default()
			}
		}
	}

	/// Settings of one search widget, with its data attribute overrides.
	pub fn for_widget(&self, dom: &dyn Dom, root: NodeId) -> SearchSettings {
		let attr = |name: &str| dom.attribute(root, name).filter(|value| !value.is_empty());

		let field = attr("data-field").unwrap_or_else(|| self.field.clone());
		let debounce_ms = match attr("data-debounce").map(|value| parse_delay_ms(&value)) {
			Some(Ok(delay)) => delay,
			Some(Err(error)) => {
				warn_log!("{}; using {} ms", error, self.query_debounce_ms);
				self.query_debounce_ms
			}
			None => self.query_debounce_ms,
		};
		let min_length = attr("data-min-length")
			.and_then(|value| value.trim().parse().ok())
			.unwrap_or(self.min_query_length);

		SearchSettings {
			endpoint: attr("data-endpoint").unwrap_or_else(|| self.endpoint.clone()),
			schema: self.schema.clone().with_text_field(field.clone()),
			field,
			result_url: attr("data-result-url").unwrap_or_else(|| self.result_url.clone()),
			result_template: attr("data-result-template").or_else(|| self.result_template.clone()),
			debounce_ms,
			blur_close_ms: self.blur_close_ms,
			fetch_timeout_ms: self.fetch_timeout_ms,
			min_length,
		}
	}
}

/// Resolved settings of one search widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
	/// Search endpoint.
	pub endpoint: String,
	/// Display field.
	pub field: String,
	/// Base path of result pages.
	pub result_url: String,
	/// Item URL template override.
	pub result_template: Option<String>,
	/// Query debounce.
	pub debounce_ms: u32,
	/// Blur-close delay.
	pub blur_close_ms: u32,
	/// Fetch timeout.
	pub fetch_timeout_ms: u32,
	/// Minimum query length.
	pub min_length: usize,
	/// Response field names.
	pub schema: ResultSchema,
}

impl SearchSettings {
	/// URL resolution inputs for decoded items.
	pub fn links(&self) -> LinkContext<'_> {
		LinkContext::new(&self.result_url, &self.field).template(self.result_template.as_deref())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::builder::{div, script};
	use crate::dom::MemoryDom;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let settings = HydrateSettings::default();
		assert_eq!(settings.endpoint, "/api/search");
		assert_eq!(settings.query_debounce_ms, 250);
		assert_eq!(settings.blur_close_ms, 100);
		assert_eq!(settings.dismiss_ms, 300);
		assert_eq!(settings.fetch_timeout_ms, 10_000);
	}

	#[rstest]
	fn test_from_document_reads_island() {
		let dom = MemoryDom::new();
		script()
			.attr("type", "application/json")
			.attr("data-hydrate-settings", "")
			.text(r#"{"resultUrl": "/dictionary", "schema": {"secondary": "lang"}}"#)
			.mount(&dom, dom.body());

		let settings = HydrateSettings::from_document(&dom);
		assert_eq!(settings.result_url, "/dictionary");
		assert_eq!(settings.schema.secondary, "lang");
		assert_eq!(settings.schema.text, "text");
	}

	#[rstest]
	fn test_from_json_reports_invalid_settings() {
		let err = HydrateSettings::from_json(r#"{"queryDebounceMs": "soon"}"#).unwrap_err();
		assert!(matches!(err, HydrateError::InvalidSettings(_)));
		assert!(err.to_string().starts_with("Invalid settings: "));
	}

	#[rstest]
	fn test_from_document_ignores_malformed_island() {
		let dom = MemoryDom::new();
		script()
			.attr("data-hydrate-settings", "")
			.text("{not json")
			.mount(&dom, dom.body());
		assert_eq!(HydrateSettings::from_document(&dom), HydrateSettings::default());
	}

	#[rstest]
	fn test_widget_overrides() {
		let dom = MemoryDom::new();
		let root = div()
			.widget("typeahead")
			.data("endpoint", "/api/lookup")
			.data("field", "headword")
			.data("debounce", "120ms")
			.data("min-length", "2")
			.mount(&dom, dom.body());

		let search = HydrateSettings::default().for_widget(&dom, root);
		assert_eq!(search.endpoint, "/api/lookup");
		assert_eq!(search.field, "headword");
		assert_eq!(search.schema.text, "headword");
		assert_eq!(search.debounce_ms, 120);
		assert_eq!(search.min_length, 2);
		assert_eq!(search.result_url, "/results");
	}

	#[rstest]
	fn test_bad_debounce_falls_back() {
		let dom = MemoryDom::new();
		let root = div().data("debounce", "soon").mount(&dom, dom.body());
		let search = HydrateSettings::default().for_widget(&dom, root);
		assert_eq!(search.debounce_ms, 250);
	}
}
