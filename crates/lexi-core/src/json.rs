//! Tolerant readers for search responses
//!
//! Two layers live here:
//!
//! - A schema-specific ad hoc extractor ([`extract_array_objects`],
//!   [`field_value`], [`parse_int_or`]) that finds the objects of a named
//!   array by brace-depth counting and reads fields from their raw text.
//! - A typed decoder ([`decode_results`]) that parses the document with
//!   `serde_json` and builds [`ResultItem`]s, falling back to the ad hoc
//!   extractor when the document is not valid JSON.
//!
//! Neither layer reports errors. A missing field becomes its default, a
//! missing array becomes an empty list.
//!
//! ## Accepted limitations of the ad hoc extractor
//!
//! It is not a JSON parser. Truncated documents yield only the objects that
//! were closed before the cut, quoted values are returned with their escape
//! sequences intact, and a field name is matched wherever it appears inside
//! the object text, nested objects included.

use serde_json::{Map, Value};

use crate::result::{LinkContext, RawFields, ResultItem, ResultSchema};
use crate::text;

/// Arrays read from a search response, in concatenation order.
pub const RESULT_ARRAYS: [&str; 2] = ["exact", "partial"];

/// Returns the raw text of every object inside the array named `key`.
///
/// Locates `"key":`, skips to the following `[` and collects each balanced
/// `{...}` until the matching `]`. Braces inside string literals are ignored.
///
/// ```
/// use lexi_core::json::extract_array_objects;
///
/// let doc = r#"{"exact": [{"text":"a"}, {"text":"b"}], "partial": []}"#;
/// assert_eq!(extract_array_objects(doc, "exact"), vec![r#"{"text":"a"}"#, r#"{"text":"b"}"#]);
/// assert!(extract_array_objects(doc, "missing").is_empty());
/// ```
pub fn extract_array_objects<'a>(doc: &'a str, key: &str) -> Vec<&'a str> {
	let bytes = doc.as_bytes();
	let Some(open) = find_key_value(bytes, key).filter(|&pos| bytes[pos] == b'[') else {
		return Vec::new();
	};

	let mut objects = Vec::new();
	let mut depth = 0usize;
	let mut start = 0usize;
	let mut in_string = false;
	let mut escaped = false;

	for (offset, &byte) in bytes[open + 1..].iter().enumerate() {
		let pos = open + 1 + offset;
		if in_string {
			match byte {
				_ if escaped => escaped = false,
				b'\\' => escaped = true,
				b'"' => in_string = false,
				_ => {}
			}
			continue;
		}
		match byte {
			b'"' => in_string = true,
			b'{' => {
				if depth == 0 {
					start = pos;
				}
				depth += 1;
			}
			b'}' if depth > 0 => {
				depth -= 1;
				if depth == 0 {
					objects.push(&doc[start..=pos]);
				}
			}
			b']' if depth == 0 => break,
			_ => {}
		}
	}
	objects
}

/// Returns the value of `key` in one object's raw text.
///
/// Quoted values lose their surrounding quotes only (escape sequences are not
/// decoded). Unquoted values (numbers, booleans, `null`) are read up to the
/// next `,`, `}`, `]` or whitespace.
///
/// ```
/// use lexi_core::json::field_value;
///
/// let object = r#"{"text": "café", "homograph": 2}"#;
/// assert_eq!(field_value(object, "text").as_deref(), Some(r"café"));
/// assert_eq!(field_value(object, "homograph").as_deref(), Some("2"));
/// assert_eq!(field_value(object, "id"), None);
/// ```
pub fn field_value(object: &str, key: &str) -> Option<String> {
	let bytes = object.as_bytes();
	let start = find_key_value(bytes, key)?;

	if bytes[start] == b'"' {
		let mut escaped = false;
		for (offset, &byte) in bytes[start + 1..].iter().enumerate() {
			match byte {
				_ if escaped => escaped = false,
				b'\\' => escaped = true,
				b'"' => return Some(object[start + 1..start + 1 + offset].to_string()),
				_ => {}
			}
		}
		// Unterminated string: take the rest as a best effort.
		return Some(object[start + 1..].to_string());
	}

	let end = bytes[start..]
		.iter()
		.position(|&b| matches!(b, b',' | b'}' | b']') || b.is_ascii_whitespace())
		.map_or(bytes.len(), |pos| start + pos);
	let raw = &object[start..end];
	(!raw.is_empty()).then(|| raw.to_string())
}

/// Permissive integer reader.
///
/// Accepts surrounding whitespace and quotes, an optional sign and trailing
/// garbage (`"12px"` reads as 12, `"1.0"` as 1). Returns `default` when no
/// digit is present or the value overflows.
pub fn parse_int_or(value: &str, default: i64) -> i64 {
	let trimmed = text::trim(value.as_bytes());
	let unquoted = trimmed
		.strip_prefix(b"\"")
		.and_then(|rest| rest.strip_suffix(b"\""))
		.unwrap_or(trimmed);
	let unquoted = text::trim(unquoted);

	let (negative, digits) = match unquoted.first() {
		Some(b'-') => (true, &unquoted[1..]),
		Some(b'+') => (false, &unquoted[1..]),
		_ => (false, unquoted),
	};
	let run = digits.iter().take_while(|b| b.is_ascii_digit()).count();
	if run == 0 {
		return default;
	}

	let mut result: i64 = 0;
	for &digit in &digits[..run] {
		let Some(next) = result
			.checked_mul(10)
			.and_then(|r| r.checked_add(i64::from(digit - b'0')))
		else {
			return default;
		};
		result = next;
	}
	if negative { -result } else { result }
}

/// Position of the first non-whitespace byte after `"key":`.
///
/// Occurrences of `"key"` not followed by a colon (for example a string value
/// equal to the key) are skipped.
fn find_key_value(bytes: &[u8], key: &str) -> Option<usize> {
	let needle = format!("\"{key}\"");
	let mut from = 0;
	while let Some(pos) = text::index_of_from(bytes, needle.as_bytes(), from) {
		let after = skip_whitespace(bytes, pos + needle.len());
		if bytes.get(after) == Some(&b':') {
			let value = skip_whitespace(bytes, after + 1);
			return (value < bytes.len()).then_some(value);
		}
		from = pos + needle.len();
	}
	None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
	while bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace()) {
		pos += 1;
	}
	pos
}

/// Which reader produced a [`Decoded`] list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeSource {
	/// The document was valid JSON.
	Json,
	/// The document was malformed; the ad hoc extractor was used.
	Fallback,
}

/// Items decoded from one search response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
	/// Items of `exact` followed by items of `partial`.
	pub items: Vec<ResultItem>,
	/// Reader used.
	pub source: DecodeSource,
}

/// Decodes a search response into result items.
///
/// Objects without display text are skipped. Missing or malformed fields take
/// their defaults (`homograph` 1, `id` 0). This function never fails: a
/// document that is not JSON at all yields whatever the ad hoc extractor can
/// recover, usually nothing.
pub fn decode_results(doc: &str, schema: &ResultSchema, links: &LinkContext<'_>) -> Decoded {
	match serde_json::from_str::<Value>(doc) {
		Ok(value) => {
			let items = RESULT_ARRAYS
				.iter()
				.filter_map(|key| value.get(*key).and_then(Value::as_array))
				.flatten()
				.filter_map(Value::as_object)
				.filter_map(|object| ResultItem::from_raw(fields_from_object(object, schema), links))
				.collect();
			Decoded {
				items,
				source: DecodeSource::Json,
			}
		}
		Err(_) => {
			let items = RESULT_ARRAYS
				.iter()
				.flat_map(|key| extract_array_objects(doc, key))
				.filter_map(|object| ResultItem::from_raw(fields_from_raw(object, schema), links))
				.collect();
			Decoded {
				items,
				source: DecodeSource::Fallback,
			}
		}
	}
}

fn fields_from_object(object: &Map<String, Value>, schema: &ResultSchema) -> RawFields {
	let string = |name: &str| object.get(name).and_then(value_as_string);
	let int = |name: &str| object.get(name).and_then(value_as_int);
	RawFields {
		text: string(&schema.text),
		secondary: string(&schema.secondary),
		description: string(&schema.description),
		language_code: string(&schema.language_code),
		homograph: int(&schema.homograph),
		id: int(&schema.id),
		thumbnail: string(&schema.thumbnail),
		disabled: object.get(&schema.disabled).is_some_and(value_as_flag),
		url: string(&schema.url),
	}
}

fn fields_from_raw(object: &str, schema: &ResultSchema) -> RawFields {
	let string = |name: &str| field_value(object, name).filter(|v| v != "null");
	let int = |name: &str| {
		string(name)
			.map(|v| parse_int_or(&v, i64::MIN))
			.filter(|&n| n != i64::MIN)
	};
	RawFields {
		text: string(&schema.text),
		secondary: string(&schema.secondary),
		description: string(&schema.description),
		language_code: string(&schema.language_code),
		homograph: int(&schema.homograph),
		id: int(&schema.id),
		thumbnail: string(&schema.thumbnail),
		disabled: string(&schema.disabled).is_some_and(|v| flag_text(&v)),
		url: string(&schema.url),
	}
}

fn value_as_string(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn value_as_int(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok())),
		Value::String(s) => {
			let parsed = parse_int_or(s, i64::MIN);
			(parsed != i64::MIN).then_some(parsed)
		}
		_ => None,
	}
}

fn value_as_flag(value: &Value) -> bool {
	match value {
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_i64() == Some(1),
		Value::String(s) => flag_text(s),
		_ => false,
	}
}

fn flag_text(value: &str) -> bool {
	matches!(text::trim_str(value), "true" | "1")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const CAFE: &str = r#"{"exact":[{"text":"café","language":"French","languageCode":"fr","homograph":"1","id":"5"}],"partial":[]}"#;

	fn links() -> LinkContext<'static> {
		LinkContext::new("/results", "text")
	}

	#[rstest]
	fn test_extract_skips_braces_in_strings() {
		let doc = r#"{"exact":[{"text":"{not} an object"},{"text":"b"}]}"#;
		let objects = extract_array_objects(doc, "exact");
		assert_eq!(objects.len(), 2);
		assert_eq!(field_value(objects[0], "text").as_deref(), Some("{not} an object"));
	}

	#[rstest]
	fn test_extract_nested_objects_are_one_entry() {
		let doc = r#"{"exact":[{"text":"a","meta":{"x":1}}]}"#;
		assert_eq!(
			extract_array_objects(doc, "exact"),
			vec![r#"{"text":"a","meta":{"x":1}}"#]
		);
	}

	#[rstest]
	fn test_extract_key_as_value_is_ignored() {
		let doc = r#"{"label":"exact","exact":[{"text":"a"}]}"#;
		assert_eq!(extract_array_objects(doc, "exact").len(), 1);
	}

	#[rstest]
	#[case(r#"{"exact": [ {"text":"x""#, 0)]
	#[case(r#"{"exact": [ {"text":"x"}, {"text":"#, 1)]
	#[case(r#"{"exact": "#, 0)]
	#[case(r#"{"exact": 3}"#, 0)]
	#[case("", 0)]
	fn test_extract_truncated(#[case] doc: &str, #[case] expected: usize) {
		assert_eq!(extract_array_objects(doc, "exact").len(), expected);
	}

	#[rstest]
	#[case(r#"{"id": 12, "x": 1}"#, "id", Some("12"))]
	#[case(r#"{"id":12}"#, "id", Some("12"))]
	#[case(r#"{"ok": true }"#, "ok", Some("true"))]
	#[case(r#"{"text": "say \"hi\""}"#, "text", Some(r#"say \"hi\""#))]
	#[case(r#"{"text": "open"#, "text", Some("open"))]
	#[case(r#"{"text": }"#, "text", None)]
	fn test_field_value(#[case] object: &str, #[case] key: &str, #[case] expected: Option<&str>) {
		assert_eq!(field_value(object, key).as_deref(), expected);
	}

	#[rstest]
	#[case("5", 0, 5)]
	#[case(" \"7\" ", 0, 7)]
	#[case("-3", 0, -3)]
	#[case("12px", 0, 12)]
	#[case("1.0", 0, 1)]
	#[case("abc", 1, 1)]
	#[case("", 1, 1)]
	#[case("99999999999999999999", 0, 0)]
	fn test_parse_int_or(#[case] input: &str, #[case] default: i64, #[case] expected: i64) {
		assert_eq!(parse_int_or(input, default), expected);
	}

	#[rstest]
	fn test_decode_example_response() {
		let decoded = decode_results(CAFE, &ResultSchema::default(), &links());
		assert_eq!(decoded.source, DecodeSource::Json);
		assert_eq!(decoded.items.len(), 1);
		let item = &decoded.items[0];
		assert_eq!(item.value, "café");
		assert_eq!(item.label, "café");
		assert_eq!(item.secondary.as_deref(), Some("French"));
		assert_eq!(item.id, 5);
		assert_eq!(item.homograph, 1);
		assert_eq!(item.target, "/results/fr/caf%C3%A9/1");
	}

	#[rstest]
	fn test_decode_concatenates_exact_then_partial() {
		let doc = r#"{"partial":[{"text":"p"}],"exact":[{"text":"e"}]}"#;
		let decoded = decode_results(doc, &ResultSchema::default(), &links());
		let values: Vec<_> = decoded.items.iter().map(|i| i.value.as_str()).collect();
		assert_eq!(values, vec!["e", "p"]);
	}

	#[rstest]
	fn test_decode_tolerates_bad_fields() {
		let doc = r#"{"exact":[{"text":"w","homograph":"x","id":null,"disabled":"true"},{"id":3}]}"#;
		let decoded = decode_results(doc, &ResultSchema::default(), &links());
		assert_eq!(decoded.items.len(), 1);
		assert_eq!(decoded.items[0].homograph, 1);
		assert_eq!(decoded.items[0].id, 0);
		assert!(decoded.items[0].disabled);
	}

	#[rstest]
	#[case("2.5")]
	#[case("1e3")]
	#[case("18446744073709551615")]
	#[case("-9.2e18")]
	fn test_decode_non_integer_numbers_use_defaults(#[case] number: &str) {
		let doc = format!(r#"{{"exact":[{{"text":"w","homograph":{number},"id":{number}}}]}}"#);
		let decoded = decode_results(&doc, &ResultSchema::default(), &links());
		assert_eq!(decoded.items[0].homograph, 1);
		assert_eq!(decoded.items[0].id, 0);
	}

	#[rstest]
	fn test_decode_decodes_escapes_in_json_mode() {
		let doc = r#"{"exact":[{"text":"caf\u00e9"}]}"#;
		let decoded = decode_results(doc, &ResultSchema::default(), &links());
		assert_eq!(decoded.items[0].value, "café");
	}

	#[rstest]
	fn test_decode_truncated_uses_fallback() {
		let doc = r#"{"exact": [ {"text":"x"}, {"text":"y""#;
		let decoded = decode_results(doc, &ResultSchema::default(), &links());
		assert_eq!(decoded.source, DecodeSource::Fallback);
		assert_eq!(decoded.items.len(), 1);
		assert_eq!(decoded.items[0].value, "x");
	}

	#[rstest]
	fn test_decode_scenario_truncated_never_panics() {
		let decoded = decode_results(r#"{"exact": [ {"text":"x""#, &ResultSchema::default(), &links());
		assert!(decoded.items.len() <= 1);
	}

	#[rstest]
	fn test_decode_custom_text_field() {
		let doc = r#"{"exact":[{"headword":"chat","text":"ignored"}]}"#;
		let schema = ResultSchema::default().with_text_field("headword");
		let decoded = decode_results(doc, &schema, &links());
		assert_eq!(decoded.items[0].value, "chat");
	}
}
