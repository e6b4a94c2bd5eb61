//! Per-entity list configuration: which fields search looks at, which
//! categorical filters exist and which keys the table can sort by.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

/// Text accessor used by free-text search.
pub type TextAccessor<E> = fn(&E) -> &str;

/// Extracts the values an entity has in one filter dimension.
pub type ValuesAccessor<E> = fn(&E) -> Vec<String>;

/// Extracts a comparable key from an entity.
pub type KeyAccessor<E> = fn(&E) -> SortValue;

/// A sortable value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    /// `None` is an unset number and sorts after every set one
    Number(Option<f64>),
    Date(DateTime<Utc>),
    Bool(bool),
}

impl SortValue {
    fn rank(&self) -> u8 {
        match self {
            SortValue::Text(_) => 0,
            SortValue::Number(_) => 1,
            SortValue::Date(_) => 2,
            SortValue::Bool(_) => 3,
        }
    }

    /// Total order used by the list controller (ascending).
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => match (a, b) {
                (Some(a), Some(b)) => a.total_cmp(b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Bool(a), SortValue::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Case-insensitive comparison; raw order breaks ties so "apple" and
/// "Apple" still compare deterministically.
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

pub struct SearchField<E> {
    pub name: &'static str,
    pub get: TextAccessor<E>,
}

pub struct FilterDimension<E> {
    pub key: &'static str,
    pub label: &'static str,
    pub values: ValuesAccessor<E>,
}

pub struct SortKey<E> {
    pub key: &'static str,
    pub extract: KeyAccessor<E>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Everything the list controller needs to know about one entity type.
pub struct ListSchema<E> {
    pub search: Vec<SearchField<E>>,
    pub filters: Vec<FilterDimension<E>>,
    pub sorts: Vec<SortKey<E>>,
    /// Sort applied when a screen opens
    pub default_sort: Option<(&'static str, SortDirection)>,
}

impl<E> ListSchema<E> {
    pub fn new() -> Self {
        Self {
            search: Vec::new(),
            filters: Vec::new(),
            sorts: Vec::new(),
            default_sort: None,
        }
    }

    pub fn search(mut self, name: &'static str, get: TextAccessor<E>) -> Self {
        self.search.push(SearchField { name, get });
        self
    }

    pub fn filter(mut self, key: &'static str, label: &'static str, values: ValuesAccessor<E>) -> Self {
        self.filters.push(FilterDimension { key, label, values });
        self
    }

    pub fn sort(mut self, key: &'static str, extract: KeyAccessor<E>) -> Self {
        self.sorts.push(SortKey { key, extract });
        self
    }

    pub fn default_sort(mut self, key: &'static str, direction: SortDirection) -> Self {
        self.default_sort = Some((key, direction));
        self
    }

    pub fn dimension(&self, key: &str) -> Option<&FilterDimension<E>> {
        self.filters.iter().find(|f| f.key == key)
    }

    pub fn sort_key(&self, key: &str) -> Option<&SortKey<E>> {
        self.sorts.iter().find(|s| s.key == key)
    }

    /// Case-insensitive substring match over the search fields. An empty
    /// term matches everything.
    pub fn matches(&self, entity: &E, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search
            .iter()
            .any(|field| (field.get)(entity).to_lowercase().contains(&needle))
    }
}

impl<E> Default for ListSchema<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_ordering_ignores_case() {
        let a = SortValue::Text("apple".into());
        let b = SortValue::Text("Banana".into());
        assert_eq!(a.compare(&b), Ordering::Less);
        assert_eq!(b.compare(&a), Ordering::Greater);
    }

    #[test]
    fn test_unset_numbers_sort_last() {
        let set = SortValue::Number(Some(1.0));
        let unset = SortValue::Number(None);
        assert_eq!(set.compare(&unset), Ordering::Less);
        assert_eq!(unset.compare(&unset), Ordering::Equal);
    }

    #[test]
    fn test_descending_reverses_comparator() {
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Descending.apply(Ordering::Equal), Ordering::Equal);
    }
}
