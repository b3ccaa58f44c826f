//! Persisted display preferences
//!
//! The only state that survives a page load. Each preference is stored under
//! its key and mirrored as `data-<key>` on the document element, where
//! stylesheets pick it up.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::dom::Dom;

/// Light/dark scheme preference.
pub const COLOR_SCHEME: &str = "color-scheme";

/// Contrast preference.
pub const CONTRAST: &str = "contrast";

/// Every preference key applied at hydration start.
pub const PREFERENCE_KEYS: [&str; 2] = [COLOR_SCHEME, CONTRAST];

/// Key/value store for preferences.
pub trait PreferenceStore {
	/// Stored value.
	fn get(&self, key: &str) -> Option<String>;

	/// Stores a value.
	fn set(&self, key: &str, value: &str);
}

/// Store kept in memory for the lifetime of the page.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}
}

impl PreferenceStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.values.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		self.values
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
	}
}

/// Store backed by `window.localStorage`.
///
/// Reads and writes fail silently when storage is unavailable (private
/// browsing, disabled cookies).
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
	fn storage() -> Option<web_sys::Storage> {
		web_sys::window()?.local_storage().ok()?
	}
}

#[cfg(target_arch = "wasm32")]
impl PreferenceStore for LocalStorageStore {
	fn get(&self, key: &str) -> Option<String> {
		Self::storage()?.get_item(key).ok()?
	}

	fn set(&self, key: &str, value: &str) {
		match Self::storage() {
			Some(storage) => {
				if storage.set_item(key, value).is_err() {
					crate::warn_log!("could not persist preference {}", key);
				}
			}
			None => crate::warn_log!("localStorage unavailable, {} not persisted", key),
		}
	}
}

/// Writes `data-<key>` on the document element.
pub fn mirror(dom: &dyn Dom, key: &str, value: &str) {
	dom.set_attribute(dom.document(), &format!("data-{key}"), value);
}

/// Mirrors every stored preference onto the document element.
pub fn apply_stored(dom: &dyn Dom, store: &dyn PreferenceStore) {
	for key in PREFERENCE_KEYS {
		if let Some(value) = store.get(key) {
			mirror(dom, key, &value);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::MemoryDom;
	use rstest::rstest;

	#[rstest]
	fn test_apply_stored_mirrors_known_keys() {
		let dom = MemoryDom::new();
		let store = MemoryStore::new();
		store.set(COLOR_SCHEME, "dark");
		store.set("font-size", "large");
		apply_stored(&dom, &store);

		assert_eq!(dom.attribute(dom.document(), "data-color-scheme").as_deref(), Some("dark"));
		assert_eq!(dom.attribute(dom.document(), "data-contrast"), None);
		assert_eq!(dom.attribute(dom.document(), "data-font-size"), None);
	}
}
