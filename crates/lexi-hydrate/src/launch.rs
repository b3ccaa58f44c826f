//! WASM entry point
//!
//! Pages load the module and call `hydratePage()` once the document is
//! parsed (a deferred module script is enough). Calling it again re-scans
//! the document: roots hydrated before are left alone.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::context::HydrateContext;
use crate::dom::WebDom;
use crate::fetch::BrowserTransport;
use crate::prefs::LocalStorageStore;
use crate::registry::HydrationRegistry;
use crate::timer::BrowserScheduler;

thread_local! {
	static REGISTRY: RefCell<Option<HydrationRegistry>> = const { RefCell::new(None) };
}

/// Hydrates every widget root of the current document.
///
/// Returns the number of widgets hydrated by this call.
#[wasm_bindgen(js_name = hydratePage)]
pub fn hydrate_page() -> Result<u32, JsValue> {
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();

	let existing = REGISTRY.with(|registry| registry.borrow().clone());
	let registry = match existing {
		Some(registry) => registry,
		None => {
			let dom = WebDom::new().ok_or_else(|| JsValue::from_str("No document object"))?;
			let ctx = HydrateContext::new(
				Rc::new(dom),
				Rc::new(BrowserScheduler::new()),
				Rc::new(BrowserTransport),
				Rc::new(LocalStorageStore),
			);
			let registry = HydrationRegistry::new(ctx);
			// the registry lives as long as the page
			REGISTRY.with(|slot| *slot.borrow_mut() = Some(registry.clone()));
			registry
		}
	};
	let count = registry.init();
	Ok(u32::try_from(count).unwrap_or(u32::MAX))
}
