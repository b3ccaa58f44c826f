//! Integration tests for response decoding
//!
//! Covers idempotence of extraction and totality on arbitrary input.

use lexi_core::json::{decode_results, extract_array_objects, field_value, parse_int_or};
use lexi_core::result::{LinkContext, ResultSchema};
use proptest::prelude::*;
use rstest::rstest;

const RESPONSE: &str = r#"{
	"exact": [
		{"text": "café", "language": "French", "languageCode": "fr", "homograph": "1", "id": "5"},
		{"text": "cafe", "language": "English", "languageCode": "en", "homograph": 2, "id": 9}
	],
	"partial": [
		{"text": "cafeteria", "description": "a restaurant", "thumbnail": "/img/cafeteria.png"}
	]
}"#;

fn links() -> LinkContext<'static> {
	LinkContext::new("/results", "text")
}

#[rstest]
fn test_extraction_is_idempotent() {
	let schema = ResultSchema::default();
	let first = decode_results(RESPONSE, &schema, &links());
	let second = decode_results(RESPONSE, &schema, &links());
	assert_eq!(first, second);
	assert_eq!(first.items.len(), 3);
}

#[rstest]
fn test_adhoc_and_typed_readers_agree_on_plain_values() {
	let objects = extract_array_objects(RESPONSE, "exact");
	let decoded = decode_results(RESPONSE, &ResultSchema::default(), &links());
	for (raw, item) in objects.iter().zip(&decoded.items) {
		assert_eq!(field_value(raw, "text").as_deref(), Some(item.value.as_str()));
		let homograph = field_value(raw, "homograph").map_or(1, |v| parse_int_or(&v, 1));
		assert_eq!(homograph, item.homograph);
	}
}

#[rstest]
fn test_partial_items_keep_optional_fields() {
	let decoded = decode_results(RESPONSE, &ResultSchema::default(), &links());
	let partial = &decoded.items[2];
	assert_eq!(partial.secondary.as_deref(), Some("a restaurant"));
	assert_eq!(partial.thumbnail.as_deref(), Some("/img/cafeteria.png"));
	assert_eq!(partial.language_code, None);
	assert_eq!(partial.target, "/results?value=cafeteria&field=text");
}

proptest! {
	#[test]
	fn extractor_never_panics(doc in ".{0,200}", key in "[a-z]{1,8}") {
		let objects = extract_array_objects(&doc, &key);
		for object in objects {
			prop_assert!(object.starts_with('{'), "expected object to start with '{{'");
			prop_assert!(object.ends_with('}'), "expected object to end with '}}'");
			let _ = field_value(object, "text");
		}
	}

	#[test]
	fn decoder_is_total_and_idempotent(doc in ".{0,200}") {
		let schema = ResultSchema::default();
		let first = decode_results(&doc, &schema, &links());
		let second = decode_results(&doc, &schema, &links());
		prop_assert_eq!(first, second);
	}

	#[test]
	fn truncated_responses_decode_to_a_prefix(cut in 0usize..RESPONSE.len()) {
		let end = (cut..=RESPONSE.len()).find(|&i| RESPONSE.is_char_boundary(i)).unwrap_or(RESPONSE.len());
		let truncated = &RESPONSE[..end];
		let full = decode_results(RESPONSE, &ResultSchema::default(), &links());
		let partial = decode_results(truncated, &ResultSchema::default(), &links());
		prop_assert!(partial.items.len() <= full.items.len());
		for (got, expected) in partial.items.iter().zip(&full.items) {
			prop_assert_eq!(&got.value, &expected.value);
		}
	}

	#[test]
	fn parse_int_or_roundtrips_plain_integers(n in any::<i32>()) {
		prop_assert_eq!(parse_int_or(&n.to_string(), 0), i64::from(n));
	}
}
