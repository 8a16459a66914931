//! Windowing over the visit table: date filter, sort, pagination.
//!
//! Everything here is a pure transform over a borrowed record slice;
//! the pipeline order is fixed (filter, then sort, then paginate) and
//! pages are 1-based to match the page buttons.

use chrono::NaiveDate;

use crate::records::NormalizedVisit;

/// Sort direction for the date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Inclusive date-range filter; either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    /// Whether a record with the given parsed date passes the filter.
    ///
    /// Records without a usable date only pass a fully open filter;
    /// once either bound is set they cannot be placed in the range.
    pub fn matches(&self, date: Option<NaiveDate>) -> bool {
        match date {
            Some(d) => {
                self.start.is_none_or(|s| d >= s) && self.end.is_none_or(|e| d <= e)
            }
            None => self.start.is_none() && self.end.is_none(),
        }
    }
}

/// One page of the visit table.
#[derive(Debug, Clone)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a NormalizedVisit>,
    /// 1-based page index this slice represents
    pub page: usize,
    pub total_pages: usize,
}

/// Number of pages needed for `len` rows at `page_size` rows per page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    len.div_ceil(page_size)
}

/// The auto-adjust rule: a page index left dangling by a filter change
/// is pulled back to the last page. A zero-page result leaves the
/// index alone so the caller can keep showing an empty table.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    if total_pages > 0 && page > total_pages {
        total_pages
    } else {
        page.max(1)
    }
}

/// Page-button window: at most 5 buttons centered on `current`,
/// shifted so the window never leaves `[1, total]`.
pub fn page_buttons(current: usize, total: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    if total <= 5 {
        return (1..=total).collect();
    }
    let start = current.saturating_sub(2).clamp(1, total - 4);
    (start..start + 5).collect()
}

/// Filter, sort, and slice the records into one table page.
///
/// Rows without a parseable date sort before dated rows ascending (and
/// after them descending), which keeps the order total without
/// inventing a date for them.
pub fn apply<'a>(
    records: &'a [NormalizedVisit],
    filter: &DateFilter,
    order: SortOrder,
    page: usize,
    page_size: usize,
) -> TablePage<'a> {
    let mut filtered: Vec<&NormalizedVisit> = records
        .iter()
        .filter(|r| filter.matches(r.date))
        .collect();

    match order {
        SortOrder::Asc => filtered.sort_by_key(|r| r.date),
        SortOrder::Desc => filtered.sort_by(|a, b| b.date.cmp(&a.date)),
    }

    let total = total_pages(filtered.len(), page_size);
    let page = page.max(1);
    let rows = if page_size == 0 || page > total {
        Vec::new()
    } else {
        let from = (page - 1) * page_size;
        let to = (from + page_size).min(filtered.len());
        filtered[from..to].to_vec()
    };

    TablePage {
        rows,
        page,
        total_pages: total,
    }
}
