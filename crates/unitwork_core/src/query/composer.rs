//! Composable queries over one entity type.

use crate::entity::Entity;
use crate::error::CoreResult;
use crate::query::page::{Page, PageRequest};
use crate::query::path::{FieldPath, ResolvedPath, SortDirection};
use crate::scope::UnitOfWork;
use rust_decimal::Decimal;
use unitwork_store::{FieldValue, IncludeSet};

/// A query under composition.
///
/// Filters are host-language predicates ANDed in the order they were
/// added. Include and order paths are validated against declared
/// metadata when they are added, so a malformed path fails before any
/// store round-trip. Reads never see operations still pending on the
/// owning [`UnitOfWork`].
pub struct Query<'u, T: Entity> {
    uow: &'u UnitOfWork,
    filters: Vec<Box<dyn Fn(&T) -> bool + 'u>>,
    includes: Vec<String>,
    order: Option<(ResolvedPath, SortDirection)>,
}

impl<'u, T: Entity> Query<'u, T> {
    pub(crate) fn new(uow: &'u UnitOfWork) -> Self {
        Self {
            uow,
            filters: Vec::new(),
            includes: Vec::new(),
            order: None,
        }
    }

    /// Adds a predicate. All predicates must hold for a row to match.
    #[must_use]
    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + 'u) -> Self {
        self.filters.push(Box::new(predicate));
        self
    }

    /// Adds include directives from a comma-separated list of dotted
    /// navigation paths. Blank entries are ignored; an entry whose
    /// segments are not all declared navigations fails here.
    pub fn include(mut self, paths: &str) -> CoreResult<Self> {
        let registry = self.uow.registry();
        for raw in paths.split(',') {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let path = FieldPath::parse(raw)?;
            path.validate_navigation(T::schema(), registry)?;
            self.includes.push(raw.to_string());
        }
        Ok(self)
    }

    /// Sets the order clause from a dotted path ending in a scalar
    /// field. Replaces any previous order clause.
    pub fn order_by(mut self, path: &str, descending: bool) -> CoreResult<Self> {
        let resolved = FieldPath::parse(path)?.resolve(T::schema(), self.uow.registry())?;
        let direction = if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.order = Some((resolved, direction));
        Ok(self)
    }

    /// Runs the query and returns the first matching entity, if any.
    pub fn first(self) -> CoreResult<Option<T>> {
        let mut items = self.execute()?;
        if items.is_empty() {
            Ok(None)
        } else {
            Ok(Some(items.swap_remove(0)))
        }
    }

    /// Runs the query and returns every matching entity.
    pub fn all(self) -> CoreResult<Vec<T>> {
        self.execute()
    }

    /// Runs the query and returns only the number of matches.
    pub fn count(self) -> CoreResult<usize> {
        Ok(self.fetch_filtered()?.len())
    }

    /// Runs the query and returns one page of the result set.
    ///
    /// `total_count` and, when `aggregate` names a numeric field path,
    /// `aggregate_sum` are computed over the whole filtered set before
    /// the page window is cut, so they are identical for every page of
    /// the same query. A page past the end has empty items but the
    /// same totals.
    pub fn page(self, request: &PageRequest, aggregate: Option<&str>) -> CoreResult<Page<T>> {
        let registry = self.uow.registry();

        // Resolve every path up front: a bad order or aggregate path
        // fails before the scan.
        let order = match (&request.order_by, &self.order) {
            (Some(raw), _) => {
                let resolved = FieldPath::parse(raw)?.resolve(T::schema(), registry)?;
                let direction = if request.descending {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                Some((resolved, direction))
            }
            (None, Some((path, direction))) => Some((path.clone(), *direction)),
            (None, None) => None,
        };
        let aggregate = match aggregate {
            Some(raw) => Some(FieldPath::parse(raw)?.resolve(T::schema(), registry)?),
            None => None,
        };

        let mut items = self.fetch_filtered()?;
        let total_count = items.len();
        let aggregate_sum = aggregate.map(|path| sum_over(&path, &items));

        if let Some((path, direction)) = &order {
            sort_by_path(&mut items, path, *direction);
        }

        let window: Vec<T> = items
            .into_iter()
            .skip(request.offset())
            .take(request.page_size)
            .collect();
        tracing::debug!(
            entity = T::schema().type_name(),
            page = request.page_index,
            returned = window.len(),
            total_count,
            "page executed"
        );
        Ok(Page {
            items: window,
            total_count,
            aggregate_sum,
        })
    }

    fn execute(self) -> CoreResult<Vec<T>> {
        let order = self.order.clone();
        let mut items = self.fetch_filtered()?;
        if let Some((path, direction)) = &order {
            sort_by_path(&mut items, path, *direction);
        }
        Ok(items)
    }

    fn fetch_filtered(&self) -> CoreResult<Vec<T>> {
        let includes = IncludeSet::from_paths(self.includes.clone());
        let scanned = self.uow.session()?.scan(T::schema().table(), &includes)?;
        let mut items = Vec::with_capacity(scanned.len());
        for (key, row) in &scanned {
            let entity = T::from_row(key, row)?;
            if self.filters.iter().all(|predicate| predicate(&entity)) {
                items.push(entity);
            }
        }
        Ok(items)
    }
}

impl<T: Entity> std::fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("entity", &T::schema().type_name())
            .field("filters", &self.filters.len())
            .field("includes", &self.includes)
            .finish_non_exhaustive()
    }
}

/// Stable sort by the path value. Entities whose path does not
/// evaluate (unloaded navigation, absent field) sort first ascending.
fn sort_by_path<T: Entity>(items: &mut Vec<T>, path: &ResolvedPath, direction: SortDirection) {
    // Keys are computed once up front; the comparator never touches
    // the entities themselves.
    let mut keyed: Vec<(Option<FieldValue>, T)> = std::mem::take(items)
        .into_iter()
        .map(|item| (path.evaluate(&item), item))
        .collect();
    keyed.sort_by(|a, b| {
        let ordering = a.0.cmp(&b.0);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

fn sum_over<T: Entity>(path: &ResolvedPath, items: &[T]) -> Decimal {
    items
        .iter()
        .filter_map(|item| path.evaluate(item).and_then(|value| value.as_decimal()))
        .sum()
}
