//! Data table: sortable headers, pagination and row selection
//!
//! ```html
//! <div data-widget="data-table" data-page-count="4">
//!   <table>
//!     <tr>
//!       <th><input type="checkbox" data-part="select-all"></th>
//!       <th data-part="sort" data-column="headword" aria-sort="ascending">Headword</th>
//!       <th data-part="sort" data-column="updated">Updated</th>
//!     </tr>
//!     <tr><td><input type="checkbox" data-part="row-select" data-row-id="17"></td>..</tr>
//!   </table>
//!   <nav>
//!     <a data-part="page" data-page="prev">Previous</a>
//!     <a data-part="page" data-page="1" aria-current="page">1</a>
//!     <a data-part="page" data-page="2">2</a>
//!     <a data-part="page" data-page="next">Next</a>
//!   </nav>
//! </div>
//! ```
//!
//! The table itself never reorders or fetches rows. It tracks the state,
//! reflects it in ARIA attributes and announces changes: `table-sort-change`
//! with `column:asc` or `column:desc`, `table-page-change` with the page
//! number and `table-selection-change` with the selected row ids joined by
//! commas, in row order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::{WidgetKind, bool_attr, impl_widget, part, parts};
use crate::context::HydrateContext;
use crate::dom::{Dom, DomEvent, NodeId};
use crate::error::Result;
use crate::events::{self, ListenerSet, TABLE_PAGE_CHANGE, TABLE_SELECTION_CHANGE, TABLE_SORT_CHANGE};

const SELECTED_CLASS: &str = "is-selected";

/// Sorted header, by position among the sortable headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnSort {
	header: usize,
	descending: bool,
}

impl ColumnSort {
	/// Reads the `aria-sort` value rendered on header `header`.
	fn from_aria(header: usize, value: &str) -> Option<Self> {
		let descending = match value.trim() {
			"ascending" => false,
			"descending" => true,
			_ => return None,
		};
		Some(Self { header, descending })
	}

	/// The sort after `header` is activated: ascending on a new column,
	/// reversed on the current one.
	fn activate(current: Option<Self>, header: usize) -> Self {
		let descending = current.is_some_and(|sort| sort.header == header && !sort.descending);
		Self { header, descending }
	}

	fn aria(self) -> &'static str {
		if self.descending { "descending" } else { "ascending" }
	}

	fn suffix(self) -> &'static str {
		if self.descending { "desc" } else { "asc" }
	}
}

/// Current page within a known page count (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pager {
	current: usize,
	total: usize,
}

impl Pager {
	fn new(current: usize, total: usize) -> Self {
		let mut pager = Self { current: 1, total };
		pager.set_page(current);
		pager
	}

	/// Moves to `page`, clamped to the known range. Returns whether it moved.
	fn set_page(&mut self, page: usize) -> bool {
		let page = page.max(1).min(self.total.max(1));
		if page == self.current {
			return false;
		}
		self.current = page;
		true
	}

	fn next_page(&mut self) -> bool {
		self.set_page(self.current + 1)
	}

	fn prev_page(&mut self) -> bool {
		self.set_page(self.current.saturating_sub(1))
	}
}

struct Inner {
	dom: Rc<dyn Dom>,
	root: NodeId,
	headers: Vec<NodeId>,
	sort: Cell<Option<ColumnSort>>,
	pages: Vec<NodeId>,
	pager: RefCell<Pager>,
	rows: Vec<NodeId>,
	select_all: Option<NodeId>,
}

/// A hydrated `data-table` root.
pub struct DataTable {
	inner: Rc<Inner>,
	_listeners: ListenerSet,
}

impl DataTable {
	/// Hydrates `root`. Every feature is optional: a table without `sort`,
	/// `page` or `row-select` parts simply has nothing to bind.
	pub fn hydrate(ctx: &HydrateContext, root: NodeId) -> Result<Self> {
		let dom = Rc::clone(ctx.dom());
		let headers: Vec<NodeId> = parts(dom.as_ref(), root, "sort")
			.into_iter()
			.filter(|&header| dom.has_attribute(header, "data-column"))
			.collect();
		let sort = headers.iter().enumerate().find_map(|(index, &header)| {
			ColumnSort::from_aria(index, &dom.attribute(header, "aria-sort")?)
		});

		let pages = parts(dom.as_ref(), root, "page");
		let total = dom
			.attribute(root, "data-page-count")
			.and_then(|count| count.trim().parse().ok())
			.unwrap_or_else(|| {
				pages
					.iter()
					.filter_map(|&page| page_number(dom.as_ref(), page))
					.max()
					.unwrap_or(1)
			});
		let current = pages
			.iter()
			.find(|&&page| dom.attribute(page, "aria-current").as_deref() == Some("page"))
			.and_then(|&page| page_number(dom.as_ref(), page))
			.unwrap_or(1);

		let rows = parts(dom.as_ref(), root, "row-select");
		let inner = Rc::new(Inner {
			select_all: part(dom.as_ref(), root, "select-all"),
			dom: Rc::clone(&dom),
			root,
			headers,
			sort: Cell::new(sort),
			pages,
			pager: RefCell::new(Pager::new(current, total)),
			rows,
		});
		inner.render_sort();
		inner.render_pages();
		inner.sync_selection();

		let mut listeners = ListenerSet::new(dom);
		for (index, &header) in inner.headers.iter().enumerate() {
			listeners.bind(header, "click", &inner, move |inner, _| inner.sort_by(index));
			listeners.bind(header, "keydown", &inner, move |inner, event| {
				if matches!(event.key_name(), Some("Enter" | " ")) {
					event.prevent_default();
					inner.sort_by(index);
				}
			});
		}
		for &page in &inner.pages {
			listeners.bind(page, "click", &inner, move |inner, event| {
				event.prevent_default();
				inner.go_to(page);
			});
		}
		listeners.bind(root, "change", &inner, Inner::on_change);

		Ok(Self {
			inner,
			_listeners: listeners,
		})
	}

	/// Sorted column as announced in `table-sort-change`, e.g.
	/// `headword:desc`.
	pub fn sort(&self) -> Option<String> {
		self.inner.sort_key(self.inner.sort.get()?)
	}

	/// Current page (1-indexed).
	pub fn page(&self) -> usize {
		self.inner.pager.borrow().current
	}

	/// Ids of the selected rows, in row order.
	pub fn selected_ids(&self) -> Vec<String> {
		self.inner.selected_ids()
	}
}

impl_widget!(DataTable, WidgetKind::DataTable);

/// Numeric `data-page` of a page link; `prev` and `next` yield `None`.
fn page_number(dom: &dyn Dom, page: NodeId) -> Option<usize> {
	dom.attribute(page, "data-page")?.trim().parse().ok()
}

impl Inner {
	fn column(&self, index: usize) -> Option<String> {
		self.dom.attribute(*self.headers.get(index)?, "data-column")
	}

	fn sort_key(&self, sort: ColumnSort) -> Option<String> {
		let column = self.column(sort.header)?;
		Some(format!("{column}:{}", sort.suffix()))
	}

	fn sort_by(&self, index: usize) {
		let sort = ColumnSort::activate(self.sort.get(), index);
		self.sort.set(Some(sort));
		self.render_sort();
		if let Some(detail) = self.sort_key(sort) {
			events::emit(self.dom.as_ref(), self.root, TABLE_SORT_CHANGE, &detail);
		}
	}

	fn render_sort(&self) {
		let sort = self.sort.get();
		for (index, &header) in self.headers.iter().enumerate() {
			let aria = match sort {
				Some(sort) if sort.header == index => sort.aria(),
				_ => "none",
			};
			self.dom.set_attribute(header, "aria-sort", aria);
		}
	}

	fn go_to(&self, link: NodeId) {
		let moved = {
			let mut pager = self.pager.borrow_mut();
			match self.dom.attribute(link, "data-page").as_deref().map(str::trim) {
				Some("prev") => pager.prev_page(),
				Some("next") => pager.next_page(),
				_ => match page_number(self.dom.as_ref(), link) {
					Some(page) => pager.set_page(page),
					None => false,
				},
			}
		};
		if !moved {
			return;
		}
		self.render_pages();
		let page = self.pager.borrow().current;
		events::emit(self.dom.as_ref(), self.root, TABLE_PAGE_CHANGE, &page.to_string());
	}

	fn render_pages(&self) {
		let pager = *self.pager.borrow();
		for &link in &self.pages {
			match self.dom.attribute(link, "data-page").as_deref().map(str::trim) {
				Some("prev") => {
					self.dom
						.set_attribute(link, "aria-disabled", bool_attr(pager.current <= 1));
				}
				Some("next") => {
					self.dom
						.set_attribute(link, "aria-disabled", bool_attr(pager.current >= pager.total));
				}
				_ => {
					if page_number(self.dom.as_ref(), link) == Some(pager.current) {
						self.dom.set_attribute(link, "aria-current", "page");
					} else {
						self.dom.remove_attribute(link, "aria-current");
					}
				}
			}
		}
	}

	fn on_change(self: &Rc<Self>, event: &DomEvent) {
		let target = event.target();
		if Some(target) == self.select_all {
			let checked = self.dom.checked(target);
			for &row in &self.rows {
				self.dom.set_checked(row, checked);
			}
		} else if !self.rows.contains(&target) {
			return;
		}
		self.sync_selection();
		let ids = self.selected_ids().join(",");
		events::emit(self.dom.as_ref(), self.root, TABLE_SELECTION_CHANGE, &ids);
	}

	/// Marks selected rows and derives the select-all box from the rows.
	fn sync_selection(&self) {
		let mut all = !self.rows.is_empty();
		for &checkbox in &self.rows {
			let checked = self.dom.checked(checkbox);
			all &= checked;
			if let Some(row) = self.dom.closest(checkbox, "tr") {
				self.dom.toggle_class(row, SELECTED_CLASS, checked);
			}
		}
		if let Some(select_all) = self.select_all {
			self.dom.set_checked(select_all, all);
		}
	}

	fn selected_ids(&self) -> Vec<String> {
		self.rows
			.iter()
			.filter(|&&checkbox| self.dom.checked(checkbox))
			.filter_map(|&checkbox| self.dom.attribute(checkbox, "data-row-id"))
			.collect()
	}
}
