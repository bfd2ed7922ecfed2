//! Table view model: which contacts are visible, and in what order.
//!
//! Everything here is a pure function of the collection plus a
//! [`TableState`]. Rows are filtered first, then the survivors are sorted with
//! a stable sort, so equal keys keep their collection order.

use std::cmp::Ordering;

use roster_core::Contact;

// ─── Columns ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
  FirstName,
  LastName,
  Email,
  Role,
  Status,
  BirthDate,
}

impl Column {
  pub const ALL: [Column; 6] = [
    Column::FirstName,
    Column::LastName,
    Column::Email,
    Column::Role,
    Column::Status,
    Column::BirthDate,
  ];

  pub fn title(self) -> &'static str {
    match self {
      Column::FirstName => "First Name",
      Column::LastName => "Last Name",
      Column::Email => "Email",
      Column::Role => "Role",
      Column::Status => "Status",
      Column::BirthDate => "Birth Date",
    }
  }

  /// The text shown in this column's cell.
  pub fn cell_text(self, c: &Contact) -> String {
    match self {
      Column::FirstName => c.first_name.clone(),
      Column::LastName => c.last_name.clone(),
      Column::Email => c.email.clone(),
      Column::Role => c.role.to_string(),
      Column::Status => c.status_text().to_string(),
      Column::BirthDate => c.birth_date_text(),
    }
  }

  /// Text compares case-sensitively, dates chronologically, `false < true`.
  pub fn compare(self, a: &Contact, b: &Contact) -> Ordering {
    match self {
      Column::FirstName => a.first_name.cmp(&b.first_name),
      Column::LastName => a.last_name.cmp(&b.last_name),
      Column::Email => a.email.cmp(&b.email),
      Column::Role => a.role.as_ref().cmp(b.role.as_ref()),
      Column::Status => a.is_active.cmp(&b.is_active),
      Column::BirthDate => a.birth_date.cmp(&b.birth_date),
    }
  }
}

// ─── Sorting ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
  Ascending,
  Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
  pub column:    Column,
  pub direction: SortDirection,
}

/// Case-insensitive substring filter on one column's displayed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
  pub column: Column,
  pub value:  String,
}

// ─── State ────────────────────────────────────────────────────────────────────

/// The user-controlled inputs to the view: sort, column filters, search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
  sort:    Option<SortSpec>,
  filters: Vec<ColumnFilter>,
  search:  String,
}

impl TableState {
  pub fn sort(&self) -> Option<SortSpec> { self.sort }

  /// Same column cycles none → ascending → descending → none; another column
  /// starts over at ascending.
  pub fn toggle_sort(&mut self, column: Column) {
    self.sort = match self.sort {
      Some(SortSpec { column: c, direction: SortDirection::Ascending }) if c == column => {
        Some(SortSpec { column, direction: SortDirection::Descending })
      }
      Some(SortSpec { column: c, direction: SortDirection::Descending }) if c == column => None,
      _ => Some(SortSpec { column, direction: SortDirection::Ascending }),
    };
  }

  pub fn sort_direction(&self, column: Column) -> Option<SortDirection> {
    self.sort.filter(|s| s.column == column).map(|s| s.direction)
  }

  /// Set the filter for `column`; an empty value removes it.
  pub fn set_filter(&mut self, column: Column, value: impl Into<String>) {
    let value = value.into();
    self.filters.retain(|f| f.column != column);
    if !value.is_empty() {
      self.filters.push(ColumnFilter { column, value });
    }
  }

  pub fn filter(&self, column: Column) -> Option<&str> {
    self
      .filters
      .iter()
      .find(|f| f.column == column)
      .map(|f| f.value.as_str())
  }

  pub fn filters(&self) -> &[ColumnFilter] { &self.filters }

  pub fn search(&self) -> &str { &self.search }

  pub fn set_search(&mut self, term: impl Into<String>) { self.search = term.into(); }

  /// True when any filter or search term is narrowing the rows.
  pub fn is_narrowed(&self) -> bool { !self.filters.is_empty() || !self.search.is_empty() }

  pub fn visible_rows<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
    visible_rows(contacts, self.sort, &self.filters, &self.search)
  }
}

// ─── Pure view function ───────────────────────────────────────────────────────

/// Everything the global search looks at, joined by spaces.
pub fn search_text(c: &Contact) -> String {
  Column::ALL
    .iter()
    .map(|col| col.cell_text(c))
    .collect::<Vec<_>>()
    .join(" ")
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
  haystack.to_lowercase().contains(needle_lower)
}

/// Filter, then stable-sort, `contacts`.
pub fn visible_rows<'a>(
  contacts: &'a [Contact],
  sort: Option<SortSpec>,
  filters: &[ColumnFilter],
  search: &str,
) -> Vec<&'a Contact> {
  let search = search.to_lowercase();
  let filters: Vec<(Column, String)> = filters
    .iter()
    .map(|f| (f.column, f.value.to_lowercase()))
    .collect();

  let mut rows: Vec<&Contact> = contacts
    .iter()
    .filter(|c| {
      filters
        .iter()
        .all(|(col, value)| contains_ci(&col.cell_text(c), value))
    })
    .filter(|c| search.is_empty() || contains_ci(&search_text(c), &search))
    .collect();

  if let Some(SortSpec { column, direction }) = sort {
    rows.sort_by(|a, b| match direction {
      SortDirection::Ascending => column.compare(a, b),
      SortDirection::Descending => column.compare(b, a),
    });
  }
  rows
}
