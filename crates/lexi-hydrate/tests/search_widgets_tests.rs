//! Integration tests for the search-driven widgets
//!
//! Covers typeahead, search bar, lookup and multiselect lookup against the
//! in-memory document, a manual clock and a mock transport.

use lexi_hydrate::builder::{button, div, input, p, ul};
use lexi_hydrate::dom::{Dom, DomEvent, NodeId};
use lexi_hydrate::events::{
	CHIP_REMOVE, CLOSE, LOOKUP_SELECT, MULTISELECT_LOOKUP_SELECT, OPEN, SEARCH_RESULT_CLICK, SUBMIT,
};
use lexi_hydrate::fetch::FetchError;
use lexi_hydrate::registry::HydrationRegistry;
use lexi_hydrate::testing::Harness;
use rstest::*;

const CHAT: &str = r#"{"exact":[{"text":"chat","language":"French","languageCode":"fr","homograph":"1","id":"3"}],"partial":[{"text":"chatte","languageCode":"fr","id":"4"},{"text":"château","languageCode":"fr","homograph":"2","id":"5"}]}"#;

struct Page {
	h: Harness,
	root: NodeId,
	input: NodeId,
	results: NodeId,
	_registry: HydrationRegistry,
}

impl Page {
	fn search(&self, text: &str, body: &str) {
		self.h.focus(self.input);
		self.h.type_text(self.input, text);
		self.h.advance(250);
		assert!(self.h.respond(body), "no request for {text:?}");
	}

	fn highlighted(&self) -> Vec<NodeId> {
		self.h
			.parts(self.results, "item")
			.into_iter()
			.filter(|&item| self.h.dom.has_class(item, "is-highlighted"))
			.collect()
	}
}

#[fixture]
fn typeahead() -> Page {
	let h = Harness::new();
	let root = h.mount(
		div()
			.widget("typeahead")
			.child(input().part("input").attr("type", "search"))
			.child(ul().part("results").hidden(true))
			.child(p().part("empty").hidden(true).text("No results")),
	);
	let registry = h.hydrate();
	Page {
		input: h.part(root, "input"),
		results: h.part(root, "results"),
		root,
		h,
		_registry: registry,
	}
}

#[rstest]
fn test_typeahead_renders_suggestions(typeahead: Page) {
	let page = typeahead;
	page.search("chat", CHAT);

	let items = page.h.parts(page.results, "item");
	assert_eq!(items.len(), 3);
	assert!(!page.h.dom.is_hidden(page.results));
	assert_eq!(page.h.dom.attribute(page.input, "aria-expanded").as_deref(), Some("true"));
	assert_eq!(page.h.dom.attribute(items[0], "data-value").as_deref(), Some("chat"));
	assert_eq!(
		page.h.dom.attribute(items[2], "data-url").as_deref(),
		Some("/results/fr/ch%C3%A2teau/2")
	);
	assert!(page.highlighted().is_empty());
}

#[rstest]
fn test_typeahead_arrow_keys_clamp(typeahead: Page) {
	let page = typeahead;
	page.search("chat", CHAT);
	let items = page.h.parts(page.results, "item");

	for _ in 0..5 {
		page.h.key(page.input, "ArrowDown");
	}
	assert_eq!(page.highlighted(), vec![items[2]]);
	assert_eq!(page.h.dom.attribute(items[2], "aria-selected").as_deref(), Some("true"));

	for _ in 0..5 {
		page.h.key(page.input, "ArrowUp");
	}
	assert!(page.highlighted().is_empty());
}

#[rstest]
fn test_typeahead_enter_commits_highlighted(typeahead: Page) {
	let page = typeahead;
	page.search("cha", CHAT);
	page.h.key(page.input, "ArrowDown");

	assert!(!page.h.key(page.input, "Enter"));
	assert_eq!(page.h.events(SEARCH_RESULT_CLICK), vec!["chat".to_string()]);
	assert_eq!(page.h.navigations(), vec!["/results/fr/chat/1".to_string()]);
	assert_eq!(page.h.dom.value(page.input), "");
	assert!(page.h.dom.is_hidden(page.results));
}

#[rstest]
fn test_typeahead_enter_without_highlight_submits(typeahead: Page) {
	let page = typeahead;
	page.search(" chat noir ", CHAT);

	page.h.key(page.input, "Enter");
	assert_eq!(page.h.events(SUBMIT), vec!["chat noir".to_string()]);
	assert_eq!(
		page.h.navigations(),
		vec!["/results?value=chat+noir&field=text".to_string()]
	);
}

#[rstest]
fn test_typeahead_canceled_click_does_not_navigate(typeahead: Page) {
	let page = typeahead;
	page.h.dom.listen(
		page.h.dom.document(),
		SEARCH_RESULT_CLICK,
		std::rc::Rc::new(|event: &DomEvent| event.prevent_default()),
	);
	page.search("chat", CHAT);
	let items = page.h.parts(page.results, "item");

	page.h.click(items[1]);
	assert_eq!(page.h.events(SEARCH_RESULT_CLICK), vec!["chatte".to_string()]);
	assert!(page.h.navigations().is_empty());
	assert_eq!(page.h.dom.value(page.input), "");
	assert!(page.h.parts(page.results, "item").is_empty());
}

#[rstest]
fn test_typeahead_hover_highlights(typeahead: Page) {
	let page = typeahead;
	page.search("chat", CHAT);
	let items = page.h.parts(page.results, "item");

	page.h.hover(items[1]);
	assert_eq!(page.highlighted(), vec![items[1]]);
	page.h.key(page.input, "ArrowDown");
	assert_eq!(page.highlighted(), vec![items[2]]);
}

#[rstest]
fn test_typeahead_coalesces_keystrokes(typeahead: Page) {
	let page = typeahead;
	page.h.focus(page.input);
	for text in ["a", "ab", "abc"] {
		page.h.type_text(page.input, text);
		page.h.advance(50);
	}
	assert!(page.h.transport.requests().is_empty());

	page.h.advance(250);
	assert_eq!(
		page.h.transport.requests(),
		vec!["/api/search?value=abc&field=text".to_string()]
	);
}

#[rstest]
fn test_typeahead_discards_stale_response(typeahead: Page) {
	let page = typeahead;
	page.h.focus(page.input);
	page.h.type_text(page.input, "ch");
	page.h.advance(250);
	page.h.type_text(page.input, "chat");
	page.h.advance(250);
	assert_eq!(page.h.transport.requests().len(), 2);

	page.h.transport.respond(1, Ok(CHAT.to_string()));
	page.h.transport
		.respond(0, Ok(r#"{"exact":[{"text":"chien"}],"partial":[]}"#.to_string()));

	let items = page.h.parts(page.results, "item");
	assert_eq!(items.len(), 3);
	assert_eq!(page.h.dom.attribute(items[0], "data-value").as_deref(), Some("chat"));
}

#[rstest]
fn test_typeahead_empty_results_show_empty_part(typeahead: Page) {
	let page = typeahead;
	page.search("zzz", r#"{"exact":[],"partial":[]}"#);

	let empty = page.h.part(page.root, "empty");
	assert!(!page.h.dom.is_hidden(empty));
	assert!(page.h.dom.is_hidden(page.results));
}

#[rstest]
fn test_typeahead_failed_request_shows_no_results(typeahead: Page) {
	let page = typeahead;
	page.h.focus(page.input);
	page.h.type_text(page.input, "chat");
	page.h.advance(250);
	page.h.fail(FetchError::Status(500));

	assert!(page.h.parts(page.results, "item").is_empty());
	assert!(!page.h.dom.is_hidden(page.h.part(page.root, "empty")));
}

#[rstest]
fn test_typeahead_escape_is_idempotent(typeahead: Page) {
	let page = typeahead;
	page.search("chat", CHAT);
	page.h.key(page.input, "ArrowDown");

	assert!(!page.h.key(page.input, "Escape"));
	assert_eq!(page.h.dom.value(page.input), "");
	assert!(page.h.dom.is_hidden(page.results));
	assert!(page.h.parts(page.results, "item").is_empty());

	page.h.dom.clear_records();
	assert!(page.h.key(page.input, "Escape"));
	assert_eq!(page.h.dom.value(page.input), "");
	assert!(page.h.dom.dispatched().iter().all(|event| event.kind == "keydown"));
}

#[rstest]
fn test_typeahead_escape_cancels_pending_search(typeahead: Page) {
	let page = typeahead;
	page.h.focus(page.input);
	page.h.type_text(page.input, "chat");
	page.h.key(page.input, "Escape");
	page.h.advance(1_000);

	assert!(page.h.transport.requests().is_empty());
}

#[rstest]
fn test_typeahead_blur_closes_after_delay(typeahead: Page) {
	let page = typeahead;
	let outside = page.h.mount(button().text("elsewhere"));
	page.search("chat", CHAT);

	page.h.focus(outside);
	page.h.advance(50);
	assert!(!page.h.dom.is_hidden(page.results));
	page.h.advance(50);
	assert!(page.h.dom.is_hidden(page.results));
}

#[rstest]
fn test_typeahead_focus_back_within_delay_keeps_list(typeahead: Page) {
	let page = typeahead;
	let outside = page.h.mount(button().text("elsewhere"));
	page.search("chat", CHAT);

	page.h.focus(outside);
	page.h.advance(50);
	page.h.focus(page.input);
	page.h.advance(200);
	assert!(!page.h.dom.is_hidden(page.results));
}

#[fixture]
fn search_bar() -> (Harness, NodeId, HydrationRegistry) {
	let h = Harness::new();
	let root = h.mount(
		div()
			.widget("search-bar")
			.child(button().part("trigger").text("Search"))
			.child(
				div()
					.part("panel")
					.hidden(true)
					.child(
						div()
							.widget("typeahead")
							.child(input().part("input"))
							.child(ul().part("results").hidden(true)),
					)
					.child(button().part("close").text("Close")),
			),
	);
	let registry = h.hydrate();
	(h, root, registry)
}

#[rstest]
fn test_search_bar_opens_and_focuses_input(search_bar: (Harness, NodeId, HydrationRegistry)) {
	let (h, root, _registry) = search_bar;
	let panel = h.part(root, "panel");
	let input = h.part(root, "input");

	h.click(h.part(root, "trigger"));
	assert!(!h.dom.is_hidden(panel));
	assert!(h.dom.has_class(root, "is-open"));
	assert_eq!(h.dom.active_element(), Some(input));
	assert_eq!(h.events(OPEN).len(), 1);
}

#[rstest]
fn test_search_bar_escape_closes_only_after_typeahead(
	search_bar: (Harness, NodeId, HydrationRegistry),
) {
	let (h, root, _registry) = search_bar;
	let input = h.part(root, "input");
	let trigger = h.part(root, "trigger");
	h.click(trigger);
	h.type_text(input, "chat");
	h.advance(250);
	h.respond(CHAT);

	h.key(input, "Escape");
	assert!(!h.dom.is_hidden(h.part(root, "panel")));
	assert!(h.events(CLOSE).is_empty());

	h.key(input, "Escape");
	assert!(h.dom.is_hidden(h.part(root, "panel")));
	assert_eq!(h.events(CLOSE).len(), 1);
	assert_eq!(h.dom.active_element(), Some(trigger));
}

#[rstest]
fn test_search_bar_closes_on_submit(search_bar: (Harness, NodeId, HydrationRegistry)) {
	let (h, root, _registry) = search_bar;
	let input = h.part(root, "input");
	h.click(h.part(root, "trigger"));
	h.type_text(input, "chat");
	h.key(input, "Enter");

	assert_eq!(h.events(SUBMIT), vec!["chat".to_string()]);
	assert!(h.dom.is_hidden(h.part(root, "panel")));
}

#[rstest]
fn test_search_bar_close_button(search_bar: (Harness, NodeId, HydrationRegistry)) {
	let (h, root, _registry) = search_bar;
	h.click(h.part(root, "trigger"));
	h.click(h.part(root, "close"));
	assert!(h.dom.is_hidden(h.part(root, "panel")));
}

fn lookup_page() -> (Harness, NodeId, HydrationRegistry) {
	let h = Harness::new();
	let root = h.mount(
		div()
			.widget("lookup")
			.child(input().part("input"))
			.child(ul().part("results").hidden(true))
			.child(input().part("hidden").attr("type", "hidden")),
	);
	let registry = h.hydrate();
	(h, root, registry)
}

#[rstest]
fn test_lookup_commit_fills_label_and_id() {
	let (h, root, _registry) = lookup_page();
	let input = h.part(root, "input");
	h.focus(input);
	h.type_text(input, "chat");
	h.advance(250);
	h.respond(CHAT);

	h.key(input, "ArrowDown");
	h.key(input, "ArrowDown");
	h.key(input, "Enter");

	assert_eq!(h.dom.value(input), "chatte");
	assert_eq!(h.dom.value(h.part(root, "hidden")), "4");
	assert_eq!(h.events(LOOKUP_SELECT), vec!["chatte".to_string()]);
}

#[rstest]
fn test_lookup_enter_without_highlight_does_nothing() {
	let (h, root, _registry) = lookup_page();
	let input = h.part(root, "input");
	h.focus(input);
	h.type_text(input, "chat");
	h.advance(250);
	h.respond(CHAT);

	h.key(input, "Enter");
	assert!(h.events(LOOKUP_SELECT).is_empty());
	assert!(h.navigations().is_empty());
}

#[rstest]
fn test_lookup_escape_restores_committed_choice() {
	let (h, root, _registry) = lookup_page();
	let input = h.part(root, "input");
	let hidden = h.part(root, "hidden");
	h.focus(input);
	h.type_text(input, "chat");
	h.advance(250);
	h.respond(CHAT);
	h.click(h.parts(root, "item")[0]);
	assert_eq!(h.dom.value(hidden), "3");

	h.type_text(input, "chi");
	assert_eq!(h.dom.value(hidden), "");
	h.advance(250);
	h.respond(r#"{"exact":[{"text":"chien","id":"8"}],"partial":[]}"#);
	h.key(input, "Escape");

	assert_eq!(h.dom.value(input), "chat");
	assert_eq!(h.dom.value(hidden), "3");
}

fn multiselect_page() -> (Harness, NodeId, HydrationRegistry) {
	let h = Harness::new();
	let root = h.mount(
		div()
			.widget("multiselect-lookup")
			.child(div().part("chips"))
			.child(input().part("input"))
			.child(ul().part("results").hidden(true))
			.child(input().part("hidden").attr("type", "hidden"))
			.child(button().part("clear").text("Clear")),
	);
	let registry = h.hydrate();
	(h, root, registry)
}

fn pick(h: &Harness, root: NodeId, index: usize) {
	let input = h.part(root, "input");
	h.focus(input);
	h.type_text(input, "cha");
	h.advance(250);
	h.respond(CHAT);
	h.click(h.parts(h.part(root, "results"), "item")[index]);
}

#[rstest]
fn test_multiselect_adds_chips_and_ignores_duplicates() {
	let (h, root, _registry) = multiselect_page();
	pick(&h, root, 0);
	pick(&h, root, 2);
	pick(&h, root, 0);

	assert_eq!(h.parts(root, "chip").len(), 2);
	assert_eq!(h.dom.value(h.part(root, "hidden")), "3,5");
	assert_eq!(
		h.events(MULTISELECT_LOOKUP_SELECT),
		vec!["chat".to_string(), "château".to_string()]
	);
	assert_eq!(h.dom.value(h.part(root, "input")), "");
}

#[rstest]
fn test_multiselect_remove_button_and_backspace() {
	let (h, root, _registry) = multiselect_page();
	pick(&h, root, 0);
	pick(&h, root, 1);
	pick(&h, root, 2);

	let first = h.parts(root, "chip")[0];
	h.click(h.part(first, "chip-remove"));
	assert_eq!(h.dom.value(h.part(root, "hidden")), "4,5");

	let input = h.part(root, "input");
	h.type_text(input, "");
	h.key(input, "Backspace");
	assert_eq!(h.dom.value(h.part(root, "hidden")), "4");
	assert_eq!(h.events(CHIP_REMOVE), vec!["3".to_string(), "5".to_string()]);
}

#[rstest]
fn test_multiselect_clear_removes_everything() {
	let (h, root, _registry) = multiselect_page();
	pick(&h, root, 0);
	pick(&h, root, 1);

	h.click(h.part(root, "clear"));
	assert!(h.parts(root, "chip").is_empty());
	assert_eq!(h.dom.value(h.part(root, "hidden")), "");
	assert_eq!(h.events(CHIP_REMOVE).len(), 2);
}

#[rstest]
fn test_multiselect_adopts_rendered_chips() {
	let h = Harness::new();
	let root = h.mount(
		div()
			.widget("multiselect-lookup")
			.child(
				div().part("chips").child(
					div()
						.part("chip")
						.data("id", "3")
						.text("chat")
						.child(button().part("chip-remove")),
				),
			)
			.child(input().part("input"))
			.child(ul().part("results").hidden(true))
			.child(input().part("hidden").attr("type", "hidden")),
	);
	let _registry = h.hydrate();
	assert_eq!(h.dom.value(h.part(root, "hidden")), "3");

	pick(&h, root, 0);
	assert_eq!(h.parts(root, "chip").len(), 1);
	assert!(h.events(MULTISELECT_LOOKUP_SELECT).is_empty());
}
