//! View-state controller: search, filter, sort and paginate a collection.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use common::{AppError, AppResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use super::schema::{ListSchema, SortDirection};

/// Why a derived page has no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmptyState {
    /// The collection itself is empty
    NoEntities,
    /// Search or filters exclude every entity; clearing them helps
    NoMatches,
}

impl EmptyState {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyState::NoEntities => "Nothing here yet",
            EmptyState::NoMatches => "No results match the current search or filters",
        }
    }
}

/// Rows to render plus the pagination summary.
#[derive(Debug)]
pub struct ListView<'a, E> {
    pub rows: Vec<&'a E>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub empty: Option<EmptyState>,
}

impl<E> ListView<'_, E> {
    /// 1-based index range of the visible rows, for "Showing 21-25 of 25".
    pub fn showing(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.rows.len() - 1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size).max(1)
}

/// Query state of one list screen. Rows come from the store on every
/// [`ListController::derive`] call; the controller never holds entities.
pub struct ListController<E> {
    schema: ListSchema<E>,
    search: String,
    filters: BTreeMap<String, BTreeSet<String>>,
    sort: Option<SortState>,
    page: usize,
    page_size: usize,
    /// Filtered total seen by the last derivation
    total: usize,
}

impl<E> ListController<E> {
    pub fn new(schema: ListSchema<E>, page_size: usize) -> Self {
        let sort = schema.default_sort.map(|(key, direction)| SortState {
            key: key.to_string(),
            direction,
        });
        Self {
            schema,
            search: String::new(),
            filters: BTreeMap::new(),
            sort,
            page: 1,
            page_size: clamp_page_size(page_size),
            total: 0,
        }
    }

    pub fn schema(&self) -> &ListSchema<E> {
        &self.schema
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn selected(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.filters.get(key)
    }

    pub fn has_active_query(&self) -> bool {
        !self.search.trim().is_empty() || self.filters.values().any(|v| !v.is_empty())
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.page = 1;
        }
    }

    /// Add or remove one value of a filter dimension.
    pub fn toggle_filter(&mut self, key: &str, value: impl Into<String>) -> AppResult<()> {
        self.ensure_dimension(key)?;
        let value = value.into();
        let selected = self.filters.entry(key.to_string()).or_default();
        if !selected.remove(&value) {
            selected.insert(value);
        }
        if selected.is_empty() {
            self.filters.remove(key);
        }
        self.page = 1;
        Ok(())
    }

    /// Replace the whole selection of a dimension. An empty set clears it.
    pub fn set_filter<I, S>(&mut self, key: &str, values: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_dimension(key)?;
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), values);
        }
        self.page = 1;
        Ok(())
    }

    /// Clear search and every filter.
    pub fn clear_query(&mut self) {
        self.search.clear();
        self.filters.clear();
        self.page = 1;
    }

    /// Change the sort. The current page is kept.
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) -> AppResult<()> {
        if self.schema.sort_key(key).is_none() {
            return Err(AppError::validation(format!("Unknown sort key '{}'", key)));
        }
        self.sort = Some(SortState {
            key: key.to_string(),
            direction,
        });
        Ok(())
    }

    /// Sort by `key`, flipping direction when it is already the sort key.
    pub fn toggle_sort(&mut self, key: &str) -> AppResult<()> {
        let direction = match &self.sort {
            Some(s) if s.key == key && s.direction == SortDirection::Ascending => {
                SortDirection::Descending
            }
            _ => SortDirection::Ascending,
        };
        self.set_sort(key, direction)
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    /// Go to a page, clamped to the range known from the last derivation.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, page_count(self.total, self.page_size));
    }

    /// Change the page size, keeping the first visible item on screen.
    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = clamp_page_size(page_size);
        let first_index = (self.page - 1) * self.page_size;
        self.page_size = page_size;
        self.page = first_index / page_size + 1;
        self.set_page(self.page);
    }

    /// Run search, filters, sort and pagination over `items`, clamping the
    /// current page to the resulting range.
    pub fn derive<'a>(&mut self, items: &'a [E]) -> ListView<'a, E> {
        let mut rows: Vec<&E> = items
            .iter()
            .filter(|e| self.schema.matches(e, &self.search))
            .filter(|e| self.passes_filters(e))
            .collect();

        if let Some(sort) = &self.sort {
            if let Some(key) = self.schema.sort_key(&sort.key) {
                let mut keyed: Vec<_> = rows.into_iter().map(|e| ((key.extract)(e), e)).collect();
                // `sort_by` is stable and only the comparator is reversed, so
                // equal keys keep collection order in both directions.
                keyed.sort_by(|(a, _), (b, _)| sort.direction.apply(a.compare(b)));
                rows = keyed.into_iter().map(|(_, e)| e).collect();
            }
        }

        let total = rows.len();
        self.total = total;
        let total_pages = page_count(total, self.page_size);
        if self.page > total_pages {
            debug!("Clamping page {} to {}", self.page, total_pages);
            self.page = total_pages;
        }

        let start = (self.page - 1) * self.page_size;
        let rows: Vec<&E> = rows.into_iter().skip(start).take(self.page_size).collect();

        let empty = match (total, items.is_empty()) {
            (0, true) => Some(EmptyState::NoEntities),
            (0, false) => Some(EmptyState::NoMatches),
            _ => None,
        };

        ListView {
            rows,
            total,
            page: self.page,
            page_size: self.page_size,
            total_pages,
            empty,
        }
    }

    fn passes_filters(&self, entity: &E) -> bool {
        self.filters.iter().all(|(key, selected)| {
            match self.schema.dimension(key) {
                Some(dimension) => (dimension.values)(entity)
                    .iter()
                    .any(|v| selected.contains(v)),
                None => true,
            }
        })
    }

    fn ensure_dimension(&self, key: &str) -> AppResult<()> {
        if self.schema.dimension(key).is_none() {
            return Err(AppError::validation(format!("Unknown filter '{}'", key)));
        }
        Ok(())
    }
}

fn clamp_page_size(page_size: usize) -> usize {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size.min(MAX_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::SortValue;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: String,
        kind: String,
        tags: Vec<String>,
        score: Option<f64>,
    }

    fn row(id: i64, name: &str, kind: &str, tags: &[&str], score: Option<f64>) -> Row {
        Row {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            score,
        }
    }

    fn schema() -> ListSchema<Row> {
        ListSchema::<Row>::new()
            .search("name", |r| r.name.as_str())
            .filter("kind", "Kind", |r| vec![r.kind.clone()])
            .filter("tag", "Tag", |r| r.tags.clone())
            .sort("name", |r| SortValue::Text(r.name.clone()))
            .sort("score", |r| SortValue::Number(r.score))
    }

    fn numbered(count: i64) -> Vec<Row> {
        (1..=count)
            .map(|i| row(i, &format!("Row {}", i), if i <= 5 { "a" } else { "b" }, &[], None))
            .collect()
    }

    fn ids(view: &ListView<'_, Row>) -> Vec<i64> {
        view.rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_empty_search_keeps_order() {
        let items = vec![row(2, "b", "x", &[], None), row(1, "a", "x", &[], None)];
        let mut list = ListController::new(schema(), 10);
        assert_eq!(ids(&list.derive(&items)), vec![2, 1]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let items = vec![
            row(1, "Blue Cafe", "x", &[], None),
            row(2, "Harbor Grill", "x", &[], None),
            row(3, "CAFE Luna", "x", &[], None),
        ];
        let mut list = ListController::new(schema(), 10);
        list.set_search("cafe");
        assert_eq!(ids(&list.derive(&items)), vec![1, 3]);
    }

    #[test]
    fn test_filters_and_across_or_within() {
        let items = vec![
            row(1, "one", "a", &["wifi"], None),
            row(2, "two", "b", &["parking"], None),
            row(3, "three", "c", &["wifi"], None),
            row(4, "four", "a", &["parking"], None),
        ];
        let mut list = ListController::new(schema(), 10);

        list.set_filter("kind", ["a", "b"]).unwrap();
        assert_eq!(ids(&list.derive(&items)), vec![1, 2, 4]);

        list.toggle_filter("tag", "wifi").unwrap();
        assert_eq!(ids(&list.derive(&items)), vec![1]);

        list.toggle_filter("tag", "wifi").unwrap();
        list.set_filter("kind", Vec::<String>::new()).unwrap();
        assert_eq!(ids(&list.derive(&items)).len(), 4);
    }

    #[test]
    fn test_unknown_filter_rejected() {
        let mut list = ListController::new(schema(), 10);
        assert!(list.toggle_filter("colour", "red").is_err());
        assert!(list.set_sort("colour", SortDirection::Ascending).is_err());
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let items = vec![
            row(1, "x", "a", &[], Some(2.0)),
            row(2, "y", "a", &[], Some(1.0)),
            row(3, "z", "a", &[], Some(2.0)),
        ];
        let mut list = ListController::new(schema(), 10);

        list.set_sort("score", SortDirection::Ascending).unwrap();
        assert_eq!(ids(&list.derive(&items)), vec![2, 1, 3]);

        list.set_sort("score", SortDirection::Descending).unwrap();
        assert_eq!(ids(&list.derive(&items)), vec![1, 3, 2]);
    }

    #[test]
    fn test_toggle_sort_flips_direction() {
        let mut list = ListController::new(schema(), 10);
        list.toggle_sort("name").unwrap();
        assert_eq!(list.sort().unwrap().direction, SortDirection::Ascending);
        list.toggle_sort("name").unwrap();
        assert_eq!(list.sort().unwrap().direction, SortDirection::Descending);
    }

    #[test]
    fn test_paginated_narrowing_resets_page() {
        let items = numbered(25);
        let mut list = ListController::new(schema(), 10);
        list.derive(&items);
        list.set_page(3);

        let view = list.derive(&items);
        assert_eq!(view.page, 3);
        assert_eq!(view.showing(), Some((21, 25)));

        list.set_filter("kind", ["a"]).unwrap();
        let view = list.derive(&items);
        assert_eq!(view.total, 5);
        assert_eq!(view.page, 1);
    }

    #[test]
    fn test_page_clamped_when_collection_shrinks() {
        let mut list = ListController::new(schema(), 10);
        list.derive(&numbered(25));
        list.set_page(3);

        let shrunk = numbered(12);
        let view = list.derive(&shrunk);
        assert_eq!(view.page, 2);
        assert_eq!(ids(&view), vec![11, 12]);
    }

    #[test]
    fn test_page_always_in_range() {
        let items = numbered(25);
        let mut list = ListController::new(schema(), 10);
        list.derive(&items);

        list.set_page(99);
        assert_eq!(list.page(), 3);
        list.set_page(0);
        assert_eq!(list.page(), 1);

        list.derive(&[]);
        list.set_page(4);
        assert_eq!(list.page(), 1);
    }

    #[test]
    fn test_sort_change_keeps_page() {
        let items = numbered(25);
        let mut list = ListController::new(schema(), 10);
        list.derive(&items);
        list.set_page(2);
        list.set_sort("name", SortDirection::Descending).unwrap();
        assert_eq!(list.derive(&items).page, 2);
    }

    #[test]
    fn test_page_size_change_keeps_first_visible_item() {
        let items = numbered(25);
        let mut list = ListController::new(schema(), 10);
        list.derive(&items);
        list.set_page(3);

        list.set_page_size(5);
        let view = list.derive(&items);
        assert_eq!(view.page, 5);
        assert_eq!(view.rows[0].id, 21);
    }

    #[test]
    fn test_empty_states() {
        let mut list = ListController::new(schema(), 10);
        assert_eq!(list.derive(&[]).empty, Some(EmptyState::NoEntities));

        let items = numbered(3);
        list.set_search("nothing like this");
        assert_eq!(list.derive(&items).empty, Some(EmptyState::NoMatches));

        list.clear_query();
        assert_eq!(list.derive(&items).empty, None);
    }
}
