//! Search suggestions and the URLs they lead to
//!
//! A [`ResultItem`] is one suggestion produced by a search endpoint. Items are
//! built fresh from every response; nothing is carried over from a previous
//! generation.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::text;

/// Template used when an item carries a language code.
pub const DEFAULT_ITEM_TEMPLATE: &str = "{base}/{languageCode}/{value}/{homograph}";

/// Template used for free-text queries and items without a language code.
pub const DEFAULT_QUERY_TEMPLATE: &str = "{base}?{query}";

/// Field names read from each object of a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultSchema {
	/// Display text, also used as the item value.
	pub text: String,
	/// Secondary label (language name).
	pub secondary: String,
	/// Fallback secondary label when `secondary` is absent.
	pub description: String,
	/// Language code used in navigation URLs.
	pub language_code: String,
	/// Homograph number, defaults to 1.
	pub homograph: String,
	/// Numeric identifier, defaults to 0.
	pub id: String,
	/// Optional thumbnail reference.
	pub thumbnail: String,
	/// Optional disabled flag.
	pub disabled: String,
	/// Optional per-item URL template.
	pub url: String,
}

impl Default for ResultSchema {
	fn default() -> Self {
		Self {
			text: "text".to_string(),
			secondary: "language".to_string(),
			description: "description".to_string(),
			language_code: "languageCode".to_string(),
			homograph: "homograph".to_string(),
			id: "id".to_string(),
			thumbnail: "thumbnail".to_string(),
			disabled: "disabled".to_string(),
			url: "url".to_string(),
		}
	}
}

impl ResultSchema {
	/// Parses a schema from JSON, filling omitted names with defaults.
	pub fn from_json(json: &str) -> Result<Self, CoreError> {
		serde_json::from_str(json).map_err(CoreError::InvalidSchema)
	}

	/// Returns a copy whose display field is `field`.
	///
	/// The `field` query parameter of a search widget names the display field.
	pub fn with_text_field(mut self, field: impl Into<String>) -> Self {
		self.text = field.into();
		self
	}
}

/// One suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
	/// Numeric identifier (0 when absent or unparseable).
	pub id: i64,
	/// Value committed on selection.
	pub value: String,
	/// Display label.
	pub label: String,
	/// Secondary label (language or description).
	pub secondary: Option<String>,
	/// Language code.
	pub language_code: Option<String>,
	/// Homograph number (1 when absent or unparseable).
	pub homograph: i64,
	/// Thumbnail reference.
	pub thumbnail: Option<String>,
	/// Resolved navigation URL.
	pub target: String,
	/// Disabled items cannot be committed.
	pub disabled: bool,
}

/// Inputs needed to resolve navigation URLs.
#[derive(Debug, Clone, Copy)]
pub struct LinkContext<'a> {
	/// Base path of result pages, e.g. `/results`.
	pub base: &'a str,
	/// Display field name.
	pub field: &'a str,
	/// Template override for item URLs.
	pub template: Option<&'a str>,
}

impl<'a> LinkContext<'a> {
	/// Creates a link context with the default templates.
	pub fn new(base: &'a str, field: &'a str) -> Self {
		Self {
			base,
			field,
			template: None,
		}
	}

	/// Sets the item URL template.
	pub fn template(mut self, template: Option<&'a str>) -> Self {
		self.template = template;
		self
	}
}

/// Raw field values of one response object, before defaults are applied.
#[derive(Debug, Default, Clone)]
pub(crate) struct RawFields {
	pub text: Option<String>,
	pub secondary: Option<String>,
	pub description: Option<String>,
	pub language_code: Option<String>,
	pub homograph: Option<i64>,
	pub id: Option<i64>,
	pub thumbnail: Option<String>,
	pub disabled: bool,
	pub url: Option<String>,
}

impl ResultItem {
	/// Builds an item from extracted fields, applying the tolerant defaults.
	///
	/// Returns `None` when the object has no display text.
	pub(crate) fn from_raw(raw: RawFields, links: &LinkContext<'_>) -> Option<Self> {
		let text = raw.text.filter(|t| !t.is_empty())?;
		let language_code = raw.language_code.filter(|c| !c.is_empty());
		let homograph = raw.homograph.unwrap_or(1);
		let id = raw.id.unwrap_or(0);
		let secondary = raw
			.secondary
			.filter(|s| !s.is_empty())
			.or_else(|| raw.description.filter(|s| !s.is_empty()));

		let mut item = Self {
			id,
			value: text.clone(),
			label: text,
			secondary,
			language_code,
			homograph,
			thumbnail: raw.thumbnail.filter(|t| !t.is_empty()),
			target: String::new(),
			disabled: raw.disabled,
		};
		let template = raw.url.as_deref().or(links.template);
		item.target = item.resolve_target(links, template);
		Some(item)
	}

	fn resolve_target(&self, links: &LinkContext<'_>, template: Option<&str>) -> String {
		let template = match (template, &self.language_code) {
			(Some(template), _) => template,
			(None, Some(_)) => DEFAULT_ITEM_TEMPLATE,
			(None, None) => DEFAULT_QUERY_TEMPLATE,
		};
		let base = trim_trailing_slash(links.base);
		text::fill_template(template, |name| match name {
			"base" => Some(base.to_string()),
			"languageCode" => Some(self.language_code.clone().unwrap_or_default()),
			"value" => Some(urlencoding::encode(&self.value).into_owned()),
			"homograph" => Some(self.homograph.to_string()),
			"id" => Some(self.id.to_string()),
			"query" => Some(query_string(&self.value, links.field)),
			_ => None,
		})
	}
}

fn trim_trailing_slash(base: &str) -> &str {
	base.trim_end_matches('/')
}

/// Encodes `value=<query>&field=<field>`.
pub fn query_string(query: &str, field: &str) -> String {
	serde_urlencoded::to_string([("value", query), ("field", field)]).unwrap_or_else(|_| {
		format!(
			"value={}&field={}",
			urlencoding::encode(query),
			urlencoding::encode(field)
		)
	})
}

/// URL of the search request for `query`.
///
/// Appends with `&` when the endpoint already carries a query string.
pub fn request_url(endpoint: &str, query: &str, field: &str) -> String {
	let separator = if text::find_byte(endpoint.as_bytes(), b'?', 0).is_some() {
		'&'
	} else {
		'?'
	};
	format!("{endpoint}{separator}{}", query_string(query, field))
}

/// URL of the generic result page for a free-text query.
pub fn query_url(base: &str, query: &str, field: &str) -> String {
	request_url(trim_trailing_slash(base), query, field)
}

/// URL of an item result page: `<base>/<languageCode>/<text>/<homograph>`.
pub fn item_url(base: &str, language_code: &str, text: &str, homograph: i64) -> String {
	format!(
		"{}/{}/{}/{}",
		trim_trailing_slash(base),
		language_code,
		urlencoding::encode(text),
		homograph
	)
}
