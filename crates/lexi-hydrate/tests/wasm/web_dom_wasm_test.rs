//! Browser tests for the web-sys document and scheduler
//!
//! Run with `wasm-pack test --headless --chrome crates/lexi-hydrate`.

#[cfg(target_arch = "wasm32")]
mod browser_tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use gloo_timers::future::TimeoutFuture;
	use lexi_hydrate::builder::{button, div, input, li, ul};
	use lexi_hydrate::dom::{Dom, DomEvent, NodeId, WebDom};
	use lexi_hydrate::events::TOGGLE_BUTTON_UPDATE;
	use lexi_hydrate::fetch::{BrowserTransport, FetchError, Transport};
	use lexi_hydrate::prefs::MemoryStore;
	use lexi_hydrate::registry::HydrationRegistry;
	use lexi_hydrate::timer::{BrowserScheduler, Scheduler};
	use lexi_hydrate::{HydrateContext, MockTransport};
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn body(dom: &WebDom) -> NodeId {
		dom.query(dom.document(), "body").unwrap()
	}

	fn context(dom: Rc<WebDom>, transport: Rc<MockTransport>) -> HydrateContext {
		HydrateContext::new(
			dom,
			Rc::new(BrowserScheduler::new()),
			transport,
			Rc::new(MemoryStore::new()),
		)
	}

	#[wasm_bindgen_test]
	fn test_builder_mounts_real_elements() {
		let dom = WebDom::new().unwrap();
		let root = div()
			.widget("dropdown")
			.child(button().part("trigger").text("Open"))
			.mount(&dom, body(&dom));

		let trigger = dom.query(root, r#"[data-part="trigger"]"#).unwrap();
		assert_eq!(dom.tag_name(trigger), "button");
		assert_eq!(dom.text(trigger), "Open");
		assert_eq!(dom.closest(trigger, "[data-widget]"), Some(root));
		assert_eq!(dom.element_of(root).unwrap().tag_name().to_lowercase(), "div");
		dom.remove(root);
	}

	#[wasm_bindgen_test]
	fn test_node_ids_are_stable() {
		let dom = WebDom::new().unwrap();
		let root = div().mount(&dom, body(&dom));
		let element = dom.element_of(root).unwrap();

		assert_eq!(dom.node_of(&element), root);
		assert_eq!(dom.query(dom.document(), "body"), Some(body(&dom)));
		dom.remove(root);
	}

	#[wasm_bindgen_test]
	fn test_custom_event_carries_detail() {
		let dom = WebDom::new().unwrap();
		let root = div().mount(&dom, body(&dom));
		let child = div().mount(&dom, root);
		let seen = Rc::new(RefCell::new(Vec::new()));

		let sink = Rc::clone(&seen);
		let id = dom.listen(
			root,
			"table-sort-change",
			Rc::new(move |event: &DomEvent| {
				sink.borrow_mut().push(event.detail().map(str::to_string));
			}),
		);
		dom.dispatch(&DomEvent::custom("table-sort-change", child, "headword:asc"));
		dom.unlisten(id);
		dom.dispatch(&DomEvent::custom("table-sort-change", child, "headword:desc"));

		assert_eq!(*seen.borrow(), vec![Some("headword:asc".to_string())]);
		dom.remove(root);
	}

	#[wasm_bindgen_test]
	fn test_prevent_default_is_reported() {
		let dom = WebDom::new().unwrap();
		let root = div().mount(&dom, body(&dom));
		let id = dom.listen(root, "keydown", Rc::new(|event: &DomEvent| event.prevent_default()));

		assert!(!dom.dispatch(&DomEvent::key(root, "ArrowDown")));
		dom.unlisten(id);
		assert!(dom.dispatch(&DomEvent::key(root, "ArrowDown")));
		dom.remove(root);
	}

	#[wasm_bindgen_test]
	fn test_registry_hydrates_toggle_button() {
		let dom = Rc::new(WebDom::new().unwrap());
		let root = button()
			.widget("toggle-button")
			.attr("aria-pressed", "false")
			.mount(dom.as_ref(), body(&dom));
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&seen);
		dom.listen(
			root,
			TOGGLE_BUTTON_UPDATE,
			Rc::new(move |event: &DomEvent| {
				sink.borrow_mut().push(event.detail().unwrap_or_default().to_string());
			}),
		);

		let registry = HydrationRegistry::new(context(Rc::clone(&dom), Rc::new(MockTransport::new())));
		registry.hydrate_within(root);
		dom.dispatch(&DomEvent::new("click", root));

		assert_eq!(dom.attribute(root, "aria-pressed").as_deref(), Some("true"));
		assert_eq!(*seen.borrow(), vec!["true".to_string()]);
		dom.remove(root);
	}

	#[wasm_bindgen_test]
	async fn test_debounce_runs_on_browser_timers() {
		let dom = Rc::new(WebDom::new().unwrap());
		let transport = Rc::new(MockTransport::new());
		let root = div()
			.widget("typeahead")
			.data("debounce", "50")
			.child(input().part("input"))
			.child(ul().part("results"))
			.mount(dom.as_ref(), body(&dom));
		let registry = HydrationRegistry::new(context(Rc::clone(&dom), Rc::clone(&transport)));
		registry.hydrate_within(root);

		let field = dom.query(root, r#"[data-part="input"]"#).unwrap();
		for text in ["c", "ch", "cha"] {
			dom.set_value(field, text);
			dom.dispatch(&DomEvent::new("input", field));
		}
		assert!(transport.requests().is_empty());

		TimeoutFuture::new(120).await;
		assert_eq!(
			transport.requests(),
			vec!["/api/search?value=cha&field=text".to_string()]
		);
		dom.remove(root);
	}

	#[wasm_bindgen_test]
	fn test_removed_nodes_release_their_ids() {
		let dom = WebDom::new().unwrap();
		let root = ul()
			.children(["chat", "chatte", "chaton"].iter().map(|text| li().text(text)))
			.mount(&dom, body(&dom));
		let items = dom.children(root);
		let mapped = dom.mapped_nodes();

		dom.clear_children(root);
		assert_eq!(dom.mapped_nodes(), mapped - 3);
		assert!(items.iter().all(|&item| dom.element_of(item).is_none()));

		li().text("chien").mount(&dom, root);
		assert_eq!(dom.mapped_nodes(), mapped - 2);
		dom.remove(root);
		assert!(dom.element_of(root).is_none());
	}

	#[wasm_bindgen_test]
	fn test_second_document_ignores_foreign_ids() {
		let first = WebDom::new().unwrap();
		let list = ul().mount(&first, body(&first));
		div().mount(&first, list);

		let second = WebDom::new().unwrap();
		let element = first.element_of(list).unwrap();
		let id = second.node_of(&element);
		assert_eq!(second.element_of(id), Some(element.clone()));
		assert_eq!(first.node_of(&element), list);

		let mapped = first.mapped_nodes();
		first.remove(list);
		assert_eq!(first.mapped_nodes(), mapped - 2);
	}

	#[wasm_bindgen_test]
	fn test_frozen_element_keeps_one_id() {
		let dom = WebDom::new().unwrap();
		let element = web_sys::window()
			.and_then(|window| window.document())
			.and_then(|document| document.create_element("span").ok())
			.unwrap();
		let _ = js_sys::Object::freeze(&element);

		let id = dom.node_of(&element);
		assert_eq!(dom.node_of(&element), id);
		assert_eq!(dom.element_of(id), Some(element));
	}

	#[wasm_bindgen_test]
	async fn test_cancelled_timers_are_released() {
		let scheduler = BrowserScheduler::new();
		let fired = Rc::new(RefCell::new(Vec::new()));

		let mut last = None;
		for label in ["c", "ch", "cha"] {
			if let Some(previous) = last.take() {
				scheduler.cancel(previous);
			}
			let sink = Rc::clone(&fired);
			last = Some(scheduler.schedule(20, Box::new(move || sink.borrow_mut().push(label))));
		}
		assert_eq!(scheduler.pending(), 1);

		TimeoutFuture::new(80).await;
		assert_eq!(*fired.borrow(), vec!["cha"]);
		assert_eq!(scheduler.pending(), 0);
	}

	#[wasm_bindgen_test]
	async fn test_browser_transport_reports_status() {
		let result = Rc::new(RefCell::new(None));
		let sink = Rc::clone(&result);
		BrowserTransport.fetch(
			"/lexi-missing-endpoint?value=chat&field=text",
			Box::new(move |outcome| *sink.borrow_mut() = Some(outcome)),
		);

		for _ in 0..100 {
			if result.borrow().is_some() {
				break;
			}
			TimeoutFuture::new(20).await;
		}
		let outcome = result.borrow_mut().take();
		assert!(matches!(outcome, Some(Err(FetchError::Status(status))) if status >= 400));
	}
}
