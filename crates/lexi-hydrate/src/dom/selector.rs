//! Selector subset understood by [`MemoryDom`](super::MemoryDom)
//!
//! Supports comma-separated lists of compound selectors built from a tag name
//! or `*`, `.class`, `#id`, `[attr]` and `[attr="value"]`. Combinators are not
//! supported; widgets scope queries through [`Dom::query_all`](super::Dom)
//! instead.

/// One `[attr]` or `[attr="value"]` test.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrTest {
	name: String,
	value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
	tag: Option<String>,
	id: Option<String>,
	classes: Vec<String>,
	attrs: Vec<AttrTest>,
}

/// Parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
	alternatives: Vec<Compound>,
}

impl Selector {
	/// Parses a selector list. Returns `None` on unsupported syntax.
	///
	/// ## Example
	///
	/// ```
	/// use lexi_hydrate::dom::Selector;
	///
	/// let selector = Selector::parse(r#"li.option[data-part="item"], [data-widget]"#).unwrap();
	/// assert!(selector.matches("li", |name| match name {
	///     "class" => Some("option is-highlighted".into()),
	///     "data-part" => Some("item".into()),
	///     _ => None,
	/// }));
	/// ```
	pub fn parse(input: &str) -> Option<Self> {
		let alternatives = input
			.split(',')
			.map(|part| parse_compound(part.trim()))
			.collect::<Option<Vec<_>>>()?;
		if alternatives.is_empty() {
			return None;
		}
		Some(Self { alternatives })
	}

	/// Whether an element with `tag` and attributes given by `attr` matches.
	pub fn matches<F>(&self, tag: &str, attr: F) -> bool
	where
		F: Fn(&str) -> Option<String>,
	{
		self.alternatives
			.iter()
			.any(|compound| compound_matches(compound, tag, &attr))
	}
}

fn compound_matches<F>(compound: &Compound, tag: &str, attr: &F) -> bool
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(expected) = &compound.tag
		&& !expected.eq_ignore_ascii_case(tag)
	{
		return false;
	}
	if let Some(id) = &compound.id
		&& attr("id").as_deref() != Some(id.as_str())
	{
		return false;
	}
	if !compound.classes.is_empty() {
		let class_attr = attr("class").unwrap_or_default();
		let present: Vec<&str> = class_attr.split_ascii_whitespace().collect();
		if !compound
			.classes
			.iter()
			.all(|class| present.contains(&class.as_str()))
		{
			return false;
		}
	}
	compound.attrs.iter().all(|test| match (&test.value, attr(&test.name)) {
		(_, None) => false,
		(None, Some(_)) => true,
		(Some(expected), Some(actual)) => *expected == actual,
	})
}

fn parse_compound(input: &str) -> Option<Compound> {
	if input.is_empty() {
		return None;
	}
	let bytes = input.as_bytes();
	let mut compound = Compound::default();
	let mut pos = 0;

	let tag_end = scan_ident(bytes, pos);
	if tag_end > pos {
		compound.tag = Some(input[pos..tag_end].to_ascii_lowercase());
		pos = tag_end;
	} else if bytes[0] == b'*' {
		pos = 1;
	}

	while pos < bytes.len() {
		match bytes[pos] {
			b'.' => {
				let end = scan_ident(bytes, pos + 1);
				if end == pos + 1 {
					return None;
				}
				compound.classes.push(input[pos + 1..end].to_string());
				pos = end;
			}
			b'#' => {
				let end = scan_ident(bytes, pos + 1);
				if end == pos + 1 {
					return None;
				}
				compound.id = Some(input[pos + 1..end].to_string());
				pos = end;
			}
			b'[' => {
				let close = pos + input[pos..].find(']')?;
				compound.attrs.push(parse_attr(&input[pos + 1..close])?);
				pos = close + 1;
			}
			_ => return None,
		}
	}
	Some(compound)
}

fn parse_attr(inner: &str) -> Option<AttrTest> {
	match inner.split_once('=') {
		None => {
			let name = inner.trim();
			(!name.is_empty()).then(|| AttrTest {
				name: name.to_string(),
				value: None,
			})
		}
		Some((name, value)) => {
			let name = name.trim();
			if name.is_empty() {
				return None;
			}
			let value = value.trim();
			let unquoted = value
				.strip_prefix('"')
				.and_then(|v| v.strip_suffix('"'))
				.or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
				.unwrap_or(value);
			Some(AttrTest {
				name: name.to_string(),
				value: Some(unquoted.to_string()),
			})
		}
	}
}

fn scan_ident(bytes: &[u8], from: usize) -> usize {
	let mut end = from;
	while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'-' || bytes[end] == b'_') {
		end += 1;
	}
	end
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn attrs(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[rstest]
	#[case("div", "div", true)]
	#[case("DIV", "div", true)]
	#[case("span", "div", false)]
	#[case("*", "section", true)]
	#[case(".menu", "div", true)]
	#[case(".menu.open", "div", false)]
	#[case("#search", "div", true)]
	#[case("[data-widget]", "div", true)]
	#[case(r#"[data-widget="menu"]"#, "div", true)]
	#[case("[data-widget='menu']", "div", true)]
	#[case("[data-widget=tabs]", "div", false)]
	#[case("li, div.menu", "div", true)]
	fn test_matches(#[case] selector: &str, #[case] tag: &str, #[case] expected: bool) {
		let selector = Selector::parse(selector).unwrap();
		let lookup = attrs(&[("class", "menu compact"), ("id", "search"), ("data-widget", "menu")]);
		assert_eq!(selector.matches(tag, lookup), expected);
	}

	#[rstest]
	#[case("")]
	#[case("div > span")]
	#[case("[=x]")]
	#[case("div.")]
	#[case("[data-part")]
	fn test_rejects_unsupported(#[case] selector: &str) {
		assert_eq!(Selector::parse(selector), None);
	}
}
