//! Roving selection over a list of items
//!
//! [`ListNav`] is the state machine shared by every widget with a results
//! list. It holds no DOM references: each transition returns a
//! [`NavOutcome`] and the caller applies the matching side effects
//! (highlight, commit, close, focus).
//!
//! ## States
//!
//! ```text
//!            open / focus / arrow / typed char
//!   Closed ─────────────────────────────────────▶ Open(None)
//!     ▲                                              │ ArrowDown/ArrowUp/Home/End/hover
//!     │  Escape / blur / commit                      ▼
//!     └──────────────────────────────────────── Open(Some(i))
//! ```
//!
//! The boundary policy is chosen per widget kind and must not be unified:
//! tab strips, toggle groups and menus wrap, search-style lists clamp.

/// What happens at the ends of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPolicy {
	/// `(i + 1) mod n` / `(i - 1) mod n`.
	Wrap,
	/// `min(i + 1, n - 1)` / `i - 1`, where stepping above the first item
	/// clears the highlight.
	Clamp,
}

/// Open/closed state with the current selection index.
///
/// `Open(None)` is the "-1" index: open, nothing highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
	/// Nothing is shown.
	Closed,
	/// The list is shown, with an optional highlighted item.
	Open(Option<usize>),
}

/// Keys understood by [`ListNav::handle_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
	/// Next item.
	Down,
	/// Previous item.
	Up,
	/// First item.
	Home,
	/// Last item.
	End,
	/// Commit or submit.
	Enter,
	/// Close.
	Escape,
}

impl NavKey {
	/// Maps a DOM `KeyboardEvent.key` value.
	///
	/// Horizontal arrows map to `Down`/`Up` only when `horizontal` is set
	/// (tab strips and toggle groups).
	pub fn from_key(key: &str, horizontal: bool) -> Option<Self> {
		match key {
			"ArrowDown" => Some(Self::Down),
			"ArrowUp" => Some(Self::Up),
			"ArrowRight" if horizontal => Some(Self::Down),
			"ArrowLeft" if horizontal => Some(Self::Up),
			"Home" => Some(Self::Home),
			"End" => Some(Self::End),
			"Enter" => Some(Self::Enter),
			"Escape" | "Esc" => Some(Self::Escape),
			_ => None,
		}
	}
}

/// Result of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
	/// Nothing changed.
	Unchanged,
	/// The list opened with nothing highlighted.
	Opened,
	/// The highlight moved. `from` is the previously highlighted item.
	Moved {
		/// Previous index.
		from: Option<usize>,
		/// New index.
		to: Option<usize>,
	},
	/// The item at this index was chosen. The machine is closed.
	Commit(usize),
	/// Enter with nothing highlighted on a free-text widget. The machine is closed.
	SubmitRaw,
	/// The list closed.
	Closed,
}

/// Selection state machine over `count` items.
#[derive(Debug, Clone)]
pub struct ListNav {
	state: NavState,
	count: usize,
	policy: NavPolicy,
	disabled: Vec<bool>,
	free_text: bool,
}

impl ListNav {
	/// Creates a closed machine over an empty list.
	pub fn new(policy: NavPolicy) -> Self {
		Self {
			state: NavState::Closed,
			count: 0,
			policy,
			disabled: Vec::new(),
			free_text: false,
		}
	}

	/// Enables Enter-without-highlight as a raw query submission.
	pub fn with_free_text(mut self, free_text: bool) -> Self {
		self.free_text = free_text;
		self
	}

	/// Current state.
	pub fn state(&self) -> NavState {
		self.state
	}

	/// Whether the list is open.
	pub fn is_open(&self) -> bool {
		matches!(self.state, NavState::Open(_))
	}

	/// Highlighted index, `None` when closed or nothing is highlighted.
	pub fn index(&self) -> Option<usize> {
		match self.state {
			NavState::Open(index) => index,
			NavState::Closed => None,
		}
	}

	/// Number of items.
	pub fn count(&self) -> usize {
		self.count
	}

	/// Boundary policy.
	pub fn policy(&self) -> NavPolicy {
		self.policy
	}

	/// Replaces the list. The highlight resets; the open state is kept.
	pub fn replace(&mut self, count: usize) {
		self.replace_with_disabled(vec![false; count]);
	}

	/// Replaces the list with per-item disabled flags.
	pub fn replace_with_disabled(&mut self, disabled: Vec<bool>) {
		self.count = disabled.len();
		self.disabled = disabled;
		if self.is_open() {
			self.state = NavState::Open(None);
		}
	}

	/// Whether the item at `index` can be highlighted and committed.
	pub fn is_enabled(&self, index: usize) -> bool {
		index < self.count && !self.disabled.get(index).copied().unwrap_or(false)
	}

	/// Closed → `Open(None)`. No-op when already open.
	pub fn open(&mut self) -> NavOutcome {
		if self.is_open() {
			return NavOutcome::Unchanged;
		}
		self.state = NavState::Open(None);
		NavOutcome::Opened
	}

	/// Any state → `Closed`. No-op when already closed.
	pub fn close(&mut self) -> NavOutcome {
		if !self.is_open() {
			return NavOutcome::Unchanged;
		}
		self.state = NavState::Closed;
		NavOutcome::Closed
	}

	/// Highlights `index` without opening or closing.
	///
	/// Ignored while closed, out of range, or on a disabled item.
	pub fn hover(&mut self, index: usize) -> NavOutcome {
		if !self.is_open() || !self.is_enabled(index) {
			return NavOutcome::Unchanged;
		}
		self.set_index(Some(index))
	}

	/// Highlights `index` (or clears with `None`) while open.
	pub fn select(&mut self, index: Option<usize>) -> NavOutcome {
		if !self.is_open() {
			return NavOutcome::Unchanged;
		}
		match index {
			Some(i) if !self.is_enabled(i) => NavOutcome::Unchanged,
			_ => self.set_index(index),
		}
	}

	/// Next enabled item under the policy.
	pub fn next(&mut self) -> NavOutcome {
		self.step_enabled(Direction::Forward)
	}

	/// Previous enabled item under the policy.
	pub fn prev(&mut self) -> NavOutcome {
		self.step_enabled(Direction::Backward)
	}

	/// First enabled item.
	pub fn first(&mut self) -> NavOutcome {
		let target = (0..self.count).find(|&i| self.is_enabled(i));
		self.jump(target)
	}

	/// Last enabled item.
	pub fn last(&mut self) -> NavOutcome {
		let target = (0..self.count).rev().find(|&i| self.is_enabled(i));
		self.jump(target)
	}

	/// Commits the highlighted item, or submits the raw query on free-text
	/// widgets. Both close the machine.
	pub fn enter(&mut self) -> NavOutcome {
		match self.state {
			NavState::Open(Some(index)) if self.is_enabled(index) => {
				self.state = NavState::Closed;
				NavOutcome::Commit(index)
			}
			NavState::Open(Some(_)) => NavOutcome::Unchanged,
			NavState::Open(None) | NavState::Closed if self.free_text => {
				self.state = NavState::Closed;
				NavOutcome::SubmitRaw
			}
			_ => NavOutcome::Unchanged,
		}
	}

	/// Commits `index` directly (pointer click).
	pub fn commit(&mut self, index: usize) -> NavOutcome {
		if !self.is_enabled(index) {
			return NavOutcome::Unchanged;
		}
		self.state = NavState::Closed;
		NavOutcome::Commit(index)
	}

	/// Applies a key.
	///
	/// While closed, arrows open the list without moving (`Open(None)`).
	pub fn handle_key(&mut self, key: NavKey) -> NavOutcome {
		if !self.is_open() {
			return match key {
				NavKey::Down | NavKey::Up | NavKey::Home | NavKey::End => self.open(),
				NavKey::Enter => self.enter(),
				NavKey::Escape => NavOutcome::Unchanged,
			};
		}
		match key {
			NavKey::Down => self.next(),
			NavKey::Up => self.prev(),
			NavKey::Home => self.first(),
			NavKey::End => self.last(),
			NavKey::Enter => self.enter(),
			NavKey::Escape => self.close(),
		}
	}

	fn jump(&mut self, target: Option<usize>) -> NavOutcome {
		if !self.is_open() || target.is_none() {
			return NavOutcome::Unchanged;
		}
		self.set_index(target)
	}

	fn set_index(&mut self, to: Option<usize>) -> NavOutcome {
		let from = self.index();
		if from == to {
			return NavOutcome::Unchanged;
		}
		self.state = NavState::Open(to);
		NavOutcome::Moved { from, to }
	}

	fn step_enabled(&mut self, direction: Direction) -> NavOutcome {
		if !self.is_open() || self.count == 0 {
			return NavOutcome::Unchanged;
		}
		let from = self.index();
		let mut candidate = from;
		for _ in 0..self.count {
			let next = step(candidate, self.count, self.policy, direction);
			if next == candidate {
				// clamped against the end
				return NavOutcome::Unchanged;
			}
			candidate = next;
			match candidate {
				None => return self.set_index(None),
				Some(i) if self.is_enabled(i) => return self.set_index(Some(i)),
				Some(_) => {}
			}
		}
		NavOutcome::Unchanged
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
	Forward,
	Backward,
}

/// One raw step, ignoring disabled items.
fn step(index: Option<usize>, count: usize, policy: NavPolicy, direction: Direction) -> Option<usize> {
	match (policy, direction, index) {
		(_, Direction::Forward, None) => Some(0),
		(NavPolicy::Wrap, Direction::Forward, Some(i)) => Some((i + 1) % count),
		(NavPolicy::Clamp, Direction::Forward, Some(i)) => Some((i + 1).min(count - 1)),
		(NavPolicy::Wrap, Direction::Backward, None) => Some(count - 1),
		(NavPolicy::Wrap, Direction::Backward, Some(i)) => Some((i + count - 1) % count),
		(NavPolicy::Clamp, Direction::Backward, None) => None,
		(NavPolicy::Clamp, Direction::Backward, Some(i)) => i.checked_sub(1),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn open(policy: NavPolicy, count: usize) -> ListNav {
		let mut nav = ListNav::new(policy);
		nav.replace(count);
		nav.open();
		nav
	}

	#[rstest]
	fn test_open_from_closed_has_no_highlight() {
		let mut nav = ListNav::new(NavPolicy::Clamp);
		nav.replace(3);
		assert_eq!(nav.handle_key(NavKey::Down), NavOutcome::Opened);
		assert_eq!(nav.state(), NavState::Open(None));
	}

	#[rstest]
	#[case(NavPolicy::Clamp, &[NavKey::Down, NavKey::Down, NavKey::Down, NavKey::Down], Some(2))]
	#[case(NavPolicy::Wrap, &[NavKey::Down, NavKey::Down, NavKey::Down, NavKey::Down], Some(0))]
	#[case(NavPolicy::Clamp, &[NavKey::Down, NavKey::Up], None)]
	#[case(NavPolicy::Clamp, &[NavKey::Up], None)]
	#[case(NavPolicy::Wrap, &[NavKey::Up], Some(2))]
	#[case(NavPolicy::Wrap, &[NavKey::Down, NavKey::Up], Some(2))]
	#[case(NavPolicy::Clamp, &[NavKey::End, NavKey::Down], Some(2))]
	#[case(NavPolicy::Wrap, &[NavKey::End, NavKey::Home], Some(0))]
	fn test_policy_boundaries(#[case] policy: NavPolicy, #[case] keys: &[NavKey], #[case] expected: Option<usize>) {
		let mut nav = open(policy, 3);
		for key in keys {
			nav.handle_key(*key);
		}
		assert_eq!(nav.index(), expected);
	}

	#[rstest]
	fn test_empty_list_stays_unhighlighted() {
		let mut nav = open(NavPolicy::Clamp, 0);
		for _ in 0..3 {
			assert_eq!(nav.handle_key(NavKey::Down), NavOutcome::Unchanged);
		}
		assert_eq!(nav.index(), None);
		assert_eq!(nav.handle_key(NavKey::End), NavOutcome::Unchanged);
	}

	#[rstest]
	fn test_replace_resets_index() {
		let mut nav = open(NavPolicy::Clamp, 5);
		nav.handle_key(NavKey::End);
		assert_eq!(nav.index(), Some(4));
		nav.replace(2);
		assert_eq!(nav.index(), None);
		assert_eq!(nav.count(), 2);
		assert!(nav.is_open());
	}

	#[rstest]
	fn test_enter_commits_and_closes() {
		let mut nav = open(NavPolicy::Wrap, 5);
		nav.select(Some(2));
		assert_eq!(nav.handle_key(NavKey::Enter), NavOutcome::Commit(2));
		assert_eq!(nav.state(), NavState::Closed);
	}

	#[rstest]
	fn test_enter_without_highlight() {
		let mut plain = open(NavPolicy::Clamp, 2);
		assert_eq!(plain.handle_key(NavKey::Enter), NavOutcome::Unchanged);
		assert!(plain.is_open());

		let mut free = ListNav::new(NavPolicy::Clamp).with_free_text(true);
		free.replace(2);
		free.open();
		assert_eq!(free.handle_key(NavKey::Enter), NavOutcome::SubmitRaw);
		assert!(!free.is_open());
	}

	#[rstest]
	fn test_escape_is_idempotent() {
		let mut nav = open(NavPolicy::Clamp, 2);
		assert_eq!(nav.handle_key(NavKey::Escape), NavOutcome::Closed);
		assert_eq!(nav.handle_key(NavKey::Escape), NavOutcome::Unchanged);
	}

	#[rstest]
	fn test_disabled_items_are_skipped() {
		let mut nav = ListNav::new(NavPolicy::Wrap);
		nav.replace_with_disabled(vec![false, true, false]);
		nav.open();
		nav.next();
		assert_eq!(nav.next(), NavOutcome::Moved { from: Some(0), to: Some(2) });
		assert_eq!(nav.hover(1), NavOutcome::Unchanged);
		assert_eq!(nav.commit(1), NavOutcome::Unchanged);
	}

	#[rstest]
	fn test_clamp_stops_before_trailing_disabled() {
		let mut nav = ListNav::new(NavPolicy::Clamp);
		nav.replace_with_disabled(vec![false, true]);
		nav.open();
		nav.next();
		assert_eq!(nav.next(), NavOutcome::Unchanged);
		assert_eq!(nav.index(), Some(0));
	}

	#[rstest]
	fn test_hover_does_not_open() {
		let mut nav = ListNav::new(NavPolicy::Clamp);
		nav.replace(3);
		assert_eq!(nav.hover(1), NavOutcome::Unchanged);
		assert!(!nav.is_open());
	}

	#[rstest]
	#[case("ArrowRight", true, Some(NavKey::Down))]
	#[case("ArrowRight", false, None)]
	#[case("Esc", false, Some(NavKey::Escape))]
	#[case("a", false, None)]
	fn test_from_key(#[case] key: &str, #[case] horizontal: bool, #[case] expected: Option<NavKey>) {
		assert_eq!(NavKey::from_key(key, horizontal), expected);
	}
}
