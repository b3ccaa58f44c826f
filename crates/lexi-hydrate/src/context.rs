//! Shared hydration context
//!
//! Everything a widget needs from its environment, passed explicitly instead
//! of being read from globals.

use std::fmt;
use std::rc::Rc;

use crate::config::HydrateSettings;
use crate::dom::{Dom, MemoryDom};
use crate::fetch::{MockTransport, Transport};
use crate::prefs::{MemoryStore, PreferenceStore};
use crate::timer::{ManualScheduler, Scheduler};

/// Handles shared by every widget instance.
///
/// Cloning is cheap: every field is reference counted.
#[derive(Clone)]
pub struct HydrateContext {
	dom: Rc<dyn Dom>,
	scheduler: Rc<dyn Scheduler>,
	transport: Rc<dyn Transport>,
	prefs: Rc<dyn PreferenceStore>,
	settings: Rc<HydrateSettings>,
}

impl HydrateContext {
	/// Creates a context with default settings.
	pub fn new(
		dom: Rc<dyn Dom>,
		scheduler: Rc<dyn Scheduler>,
		transport: Rc<dyn Transport>,
		prefs: Rc<dyn PreferenceStore>,
	) -> Self {
		Self {
			dom,
			scheduler,
			transport,
			prefs,
			settings: Rc::new(HydrateSettings::default()),
		}
	}

	/// A context over a fresh in-memory document, a manual clock and a
	/// transport that never answers.
	pub fn in_memory() -> Self {
		Self::new(
			Rc::new(MemoryDom::new()),
			Rc::new(ManualScheduler::new()),
			Rc::new(MockTransport::new()),
			Rc::new(MemoryStore::new()),
		)
	}

	/// Replaces the settings.
	pub fn with_settings(mut self, settings: HydrateSettings) -> Self {
		self.settings = Rc::new(settings);
		self
	}

	/// Document scope.
	pub fn dom(&self) -> &Rc<dyn Dom> {
		&self.dom
	}

	/// Timer source.
	pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
		&self.scheduler
	}

	/// Search transport.
	pub fn transport(&self) -> &Rc<dyn Transport> {
		&self.transport
	}

	/// Preference store.
	pub fn prefs(&self) -> &Rc<dyn PreferenceStore> {
		&self.prefs
	}

	/// Page-wide settings.
	pub fn settings(&self) -> &HydrateSettings {
		&self.settings
	}
}

impl fmt::Debug for HydrateContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("HydrateContext")
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}
