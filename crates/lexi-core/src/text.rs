//! Locale-free byte string primitives
//!
//! Every function in this module works on raw bytes. Matching is byte-exact
//! unless the name says otherwise, and case folding is limited to ASCII:
//! `"É"` and `"é"` are different needles here, on purpose, so that matching
//! results stay identical to the markup that was rendered on the server.
//!
//! None of these functions panic. Absent results are `None`, out-of-range
//! positions are clamped.
//!
//! ## Example
//!
//! ```
//! use lexi_core::text;
//!
//! assert_eq!(text::index_of(b"typeahead", b"ahead"), Some(4));
//! assert_eq!(text::substring(b"typeahead", 4, None), b"ahead");
//! assert!(text::contains_ignore_ascii_case(b"Caf\xc3\xa9 Noir", b"NOIR"));
//! ```

use std::cmp::Ordering;

/// Returns the position of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at position 0.
pub fn index_of(haystack: &[u8], needle: &[u8]) -> Option<usize> {
	index_of_from(haystack, needle, 0)
}

/// Returns the position of the first occurrence of `needle` at or after `from`.
pub fn index_of_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
	if from > haystack.len() {
		return None;
	}
	if needle.is_empty() {
		return Some(from);
	}
	if needle.len() > haystack.len() - from {
		return None;
	}
	haystack[from..]
		.windows(needle.len())
		.position(|window| window == needle)
		.map(|pos| pos + from)
}

/// Position of the first byte equal to `byte` at or after `from`.
pub fn find_byte(haystack: &[u8], byte: u8, from: usize) -> Option<usize> {
	haystack
		.get(from..)?
		.iter()
		.position(|&b| b == byte)
		.map(|pos| pos + from)
}

/// Byte-range slice. `to = None` means "to the end".
///
/// Out-of-range bounds are clamped and an inverted range yields an empty slice.
pub fn substring(s: &[u8], from: usize, to: Option<usize>) -> &[u8] {
	let end = to.unwrap_or(s.len()).min(s.len());
	let start = from.min(end);
	&s[start..end]
}

/// `&str` flavour of [`substring`] that never cuts through a UTF-8 sequence.
///
/// Bounds that land inside a multi-byte character are moved forward to the
/// next character boundary.
pub fn substring_str(s: &str, from: usize, to: Option<usize>) -> &str {
	let end = ceil_char_boundary(s, to.unwrap_or(s.len()).min(s.len()));
	let start = ceil_char_boundary(s, from.min(end));
	&s[start..end]
}

fn ceil_char_boundary(s: &str, mut index: usize) -> usize {
	while index < s.len() && !s.is_char_boundary(index) {
		index += 1;
	}
	index
}

/// Returns true if `s` begins with `prefix`.
pub fn starts_with(s: &[u8], prefix: &[u8]) -> bool {
	s.len() >= prefix.len() && &s[..prefix.len()] == prefix
}

/// Like [`starts_with`], folding ASCII letters only.
pub fn starts_with_ignore_ascii_case(s: &[u8], prefix: &[u8]) -> bool {
	s.len() >= prefix.len() && s[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Strips ASCII whitespace (space, tab, CR, LF, form feed) from both ends.
///
/// Non-ASCII whitespace such as U+00A0 is kept.
pub fn trim(s: &[u8]) -> &[u8] {
	let start = s
		.iter()
		.position(|b| !b.is_ascii_whitespace())
		.unwrap_or(s.len());
	let end = s
		.iter()
		.rposition(|b| !b.is_ascii_whitespace())
		.map_or(start, |pos| pos + 1);
	&s[start..end]
}

/// `&str` flavour of [`trim`].
pub fn trim_str(s: &str) -> &str {
	s.trim_matches(|c: char| c.is_ascii_whitespace())
}

/// Splits `s` on every occurrence of `separator`.
///
/// Empty fields are kept (`"a,,b"` yields three parts). An empty separator
/// returns the input as a single part.
pub fn split_on<'a>(s: &'a [u8], separator: &[u8]) -> Vec<&'a [u8]> {
	if separator.is_empty() {
		return vec![s];
	}
	let mut parts = Vec::new();
	let mut start = 0;
	while let Some(pos) = index_of_from(s, separator, start) {
		parts.push(&s[start..pos]);
		start = pos + separator.len();
	}
	parts.push(&s[start..]);
	parts
}

/// `&str` flavour of [`split_on`].
pub fn split_str<'a>(s: &'a str, separator: &str) -> Vec<&'a str> {
	if separator.is_empty() {
		return vec![s];
	}
	s.split(separator).collect()
}

/// Case-insensitive containment with ASCII-only folding.
///
/// Non-ASCII bytes must match exactly.
pub fn contains_ignore_ascii_case(haystack: &[u8], needle: &[u8]) -> bool {
	if needle.is_empty() {
		return true;
	}
	if needle.len() > haystack.len() {
		return false;
	}
	haystack
		.windows(needle.len())
		.any(|window| window.eq_ignore_ascii_case(needle))
}

/// Byte-exact equality.
pub fn eq(a: &[u8], b: &[u8]) -> bool {
	a == b
}

/// Lexicographic byte comparison.
pub fn compare(a: &[u8], b: &[u8]) -> Ordering {
	a.cmp(b)
}

/// Replaces `{name}` placeholders using `lookup`.
///
/// Unknown placeholders are left untouched, as is an unterminated `{`.
///
/// ```
/// use lexi_core::text::fill_template;
///
/// let url = fill_template("{base}/{code}", |name| match name {
///     "base" => Some("/results".to_string()),
///     "code" => Some("fr".to_string()),
///     _ => None,
/// });
/// assert_eq!(url, "/results/fr");
/// ```
pub fn fill_template<F>(template: &str, lookup: F) -> String
where
	F: Fn(&str) -> Option<String>,
{
	let bytes = template.as_bytes();
	let mut out = String::with_capacity(template.len());
	let mut cursor = 0;
	while let Some(open) = find_byte(bytes, b'{', cursor) {
		let Some(close) = find_byte(bytes, b'}', open + 1) else {
			break;
		};
		out.push_str(&template[cursor..open]);
		let name = &template[open + 1..close];
		match lookup(name) {
			Some(value) => out.push_str(&value),
			None => out.push_str(&template[open..=close]),
		}
		cursor = close + 1;
	}
	out.push_str(&template[cursor..]);
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(b"hello world", b"world", Some(6))]
	#[case(b"hello world", b"o", Some(4))]
	#[case(b"hello", b"", Some(0))]
	#[case(b"hello", b"xyz", None)]
	#[case(b"", b"a", None)]
	#[case(b"ab", b"abc", None)]
	fn test_index_of(#[case] haystack: &[u8], #[case] needle: &[u8], #[case] expected: Option<usize>) {
		assert_eq!(index_of(haystack, needle), expected);
	}

	#[rstest]
	fn test_index_of_from_past_end() {
		assert_eq!(index_of_from(b"abc", b"a", 10), None);
		assert_eq!(index_of_from(b"abcabc", b"a", 1), Some(3));
	}

	#[rstest]
	#[case(0, None, "typeahead")]
	#[case(4, None, "ahead")]
	#[case(0, Some(4), "type")]
	#[case(4, Some(100), "ahead")]
	#[case(50, None, "")]
	#[case(6, Some(2), "")]
	fn test_substring_clamps(#[case] from: usize, #[case] to: Option<usize>, #[case] expected: &str) {
		assert_eq!(substring(b"typeahead", from, to), expected.as_bytes());
	}

	#[rstest]
	fn test_substring_str_respects_char_boundaries() {
		// 'é' occupies bytes 3..5
		assert_eq!(substring_str("café!", 0, Some(4)), "café");
		assert_eq!(substring_str("café!", 4, None), "!");
	}

	#[rstest]
	#[case(b"  padded\t\n", b"padded")]
	#[case(b"\r\n", b"")]
	#[case(b"none", b"none")]
	#[case(b"\xc2\xa0nbsp", b"\xc2\xa0nbsp")]
	fn test_trim_ascii_only(#[case] input: &[u8], #[case] expected: &[u8]) {
		assert_eq!(trim(input), expected);
	}

	#[rstest]
	fn test_trim_str() {
		assert_eq!(trim_str("  café  "), "café");
		assert_eq!(trim_str("   "), "");
	}

	#[rstest]
	fn test_split_on_keeps_empty_fields() {
		assert_eq!(split_on(b"a,,b", b","), vec![&b"a"[..], &b""[..], &b"b"[..]]);
		assert_eq!(split_on(b"", b","), vec![&b""[..]]);
		assert_eq!(split_on(b"one", b""), vec![&b"one"[..]]);
		assert_eq!(split_on(b"a::b", b"::"), vec![&b"a"[..], &b"b"[..]]);
	}

	#[rstest]
	#[case("Café Noir", "noir", true)]
	#[case("Café Noir", "CAFÉ", false)]
	#[case("Café Noir", "café", true)]
	#[case("abc", "", true)]
	#[case("abc", "abcd", false)]
	fn test_contains_ignore_ascii_case(#[case] haystack: &str, #[case] needle: &str, #[case] expected: bool) {
		assert_eq!(
			contains_ignore_ascii_case(haystack.as_bytes(), needle.as_bytes()),
			expected
		);
	}

	#[rstest]
	fn test_starts_with_variants() {
		assert!(starts_with(b"menu-item", b"menu"));
		assert!(!starts_with(b"me", b"menu"));
		assert!(starts_with_ignore_ascii_case(b"Banana", b"b"));
		assert!(!starts_with_ignore_ascii_case(b"\xc3\x89clair", b"\xc3\xa9"));
	}

	#[rstest]
	fn test_eq_and_compare() {
		assert!(eq(b"x", b"x"));
		assert!(!eq(b"x", b"X"));
		assert_eq!(compare(b"a", b"b"), Ordering::Less);
	}

	#[rstest]
	fn test_fill_template_keeps_unknown_placeholders() {
		let out = fill_template("{a}-{b}-{", |name| (name == "a").then(|| "1".to_string()));
		assert_eq!(out, "1-{b}-{");
	}
}
