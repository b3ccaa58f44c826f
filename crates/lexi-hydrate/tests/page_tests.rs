//! Page-level tests: registry discovery, settings and preference toggles

use lexi_hydrate::builder::{button, div, input, script, ul};
use lexi_hydrate::config::HydrateSettings;
use lexi_hydrate::dom::{Dom, NodeId};
use lexi_hydrate::prefs::PreferenceStore;
use lexi_hydrate::registry::HYDRATED_ATTRIBUTE;
use lexi_hydrate::testing::Harness;
use lexi_hydrate::widgets::WidgetKind;
use rstest::*;

fn mixed_page(h: &Harness) -> Vec<NodeId> {
	vec![
		h.mount(button().widget("toggle-button")),
		h.mount(
			div()
				.widget("dropdown")
				.child(button().part("trigger"))
				.child(div().part("panel").hidden(true)),
		),
		h.mount(
			div()
				.widget("typeahead")
				.child(input().part("input"))
				.child(ul().part("results")),
		),
		h.mount(button().widget("preference-toggle").data("preference", "contrast")),
	]
}

#[rstest]
fn test_registry_marks_every_hydrated_root() {
	let h = Harness::new();
	let roots = mixed_page(&h);
	let registry = h.hydrate();

	assert_eq!(registry.len(), 4);
	for root in roots {
		assert_eq!(h.dom.attribute(root, HYDRATED_ATTRIBUTE).as_deref(), Some("true"));
		assert!(registry.is_hydrated(root));
	}
	assert_eq!(registry.count(WidgetKind::Typeahead), 1);
	assert_eq!(registry.count(WidgetKind::Menu), 0);
}

#[rstest]
fn test_registry_rescan_picks_up_only_new_roots() {
	let h = Harness::new();
	mixed_page(&h);
	let registry = h.hydrate();

	let late = h.mount(button().widget("toggle-button"));
	assert_eq!(registry.hydrate_within(h.dom.document()), 1);
	assert!(registry.is_hydrated(late));
	assert_eq!(registry.init(), 0);
	assert_eq!(registry.count(WidgetKind::ToggleButton), 2);
}

#[rstest]
fn test_hydrate_within_covers_scope_root() {
	let h = Harness::new();
	let registry = h.hydrate();
	let root = h.mount(button().widget("toggle-button"));

	assert_eq!(registry.hydrate_within(root), 1);
	assert!(registry.is_hydrated(root));
}

#[rstest]
fn test_premarked_roots_are_left_alone() {
	let h = Harness::new();
	let root = h.mount(button().widget("toggle-button").attr(HYDRATED_ATTRIBUTE, "true"));
	let registry = h.hydrate();

	assert!(registry.is_empty());
	h.click(root);
	assert!(h.events("toggle-button-update").is_empty());
}

#[rstest]
fn test_settings_island_overrides_endpoint() {
	let h = Harness::new();
	h.mount(
		script()
			.attr("type", "application/json")
			.attr("data-hydrate-settings", "")
			.text(r#"{"endpoint": "/api/lookup", "queryDebounceMs": 100}"#),
	);
	let root = h.mount(
		div()
			.widget("typeahead")
			.child(input().part("input"))
			.child(ul().part("results")),
	);
	let _registry = h.hydrate();

	h.type_text(h.part(root, "input"), "chat");
	h.advance(100);
	assert_eq!(
		h.transport.requests(),
		vec!["/api/lookup?value=chat&field=text".to_string()]
	);
}

#[rstest]
fn test_malformed_settings_island_keeps_defaults() {
	let h = Harness::new();
	h.mount(script().attr("data-hydrate-settings", "").text("{endpoint"));
	let registry = h.hydrate();
	assert_eq!(registry.context().settings().endpoint, "/api/search");
}

#[rstest]
fn test_harness_settings_reach_widgets() {
	let settings = HydrateSettings {
		field: "lemma".to_string(),
		..HydrateSettings::default()
	};
	let h = Harness::with_settings(settings);
	let root = h.mount(
		div()
			.widget("typeahead")
			.child(input().part("input"))
			.child(ul().part("results")),
	);
	let _registry = h.hydrate();

	h.type_text(h.part(root, "input"), "chat");
	h.advance(250);
	assert_eq!(
		h.transport.requests(),
		vec!["/api/search?value=chat&field=lemma".to_string()]
	);
}

#[rstest]
fn test_stored_preferences_are_mirrored_on_init() {
	let h = Harness::new();
	h.prefs.set("color-scheme", "dark");
	let root = h.mount(button().widget("preference-toggle").data("preference", "color-scheme"));
	let _registry = h.hydrate();

	let document = h.dom.document();
	assert_eq!(h.dom.attribute(document, "data-color-scheme").as_deref(), Some("dark"));
	assert_eq!(h.dom.attribute(root, "data-value").as_deref(), Some("dark"));

	h.click(root);
	assert_eq!(h.prefs.get("color-scheme").as_deref(), Some("light"));
	assert_eq!(h.dom.attribute(document, "data-color-scheme").as_deref(), Some("light"));
	assert_eq!(h.dom.attribute(root, "data-value").as_deref(), Some("light"));
}

#[rstest]
#[case(Some("sepia"), "light")]
#[case(Some("dark"), "sepia")]
#[case(Some("neon"), "light")]
#[case(None, "dark")]
fn test_preference_cycles_custom_values(#[case] current: Option<&str>, #[case] expected: &str) {
	let h = Harness::new();
	let markup = button()
		.widget("preference-toggle")
		.data("preference", "color-scheme")
		.data("values", "light, dark ,sepia");
	let root = h.mount(match current {
		Some(value) => markup.data("value", value),
		None => markup,
	});
	let _registry = h.hydrate();

	h.click(root);
	assert_eq!(h.prefs.get("color-scheme").as_deref(), Some(expected));
}

#[rstest]
fn test_contrast_defaults() {
	let h = Harness::new();
	let root = h.mount(button().widget("preference-toggle").data("preference", " contrast "));
	let _registry = h.hydrate();

	h.click(root);
	h.click(root);
	h.click(root);
	assert_eq!(h.prefs.get("contrast").as_deref(), Some("high"));
	assert_eq!(h.dom.attribute(h.dom.document(), "data-contrast").as_deref(), Some("high"));
}

#[rstest]
fn test_preference_without_values_is_inert() {
	let h = Harness::new();
	let root = h.mount(button().widget("preference-toggle").data("preference", "font-size"));
	let _registry = h.hydrate();

	h.click(root);
	assert_eq!(h.prefs.get("font-size"), None);
	assert!(!h.dom.has_attribute(h.dom.document(), "data-font-size"));
}

#[rstest]
fn test_preference_requires_key() {
	let h = Harness::new();
	let root = h.mount(button().widget("preference-toggle"));
	assert!(h.hydrate_one(WidgetKind::PreferenceToggle, root).is_err());
}
