//! Ordered, composable filter stages over an in-memory collection.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{FolioError, Result};

use super::criterion::{
    Criterion, FilterValue, FlagFilter, Predicate, Selection, Stage, TextField, owned_values_fn,
    values_fn,
};

type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

/// Computes the visible subset of a collection from a set of named criteria.
///
/// Criteria are kept sorted by [`Stage`] (search text, then choices, then
/// flags), preserving declaration order inside a stage. An entity is visible
/// iff every criterion matches it. When a sort stage is configured the visible
/// subset is stably re-ordered; otherwise collection order is kept.
pub struct FilterPipeline<E> {
    criteria: Vec<Criterion<E>>,
    sort: Option<Comparator<E>>,
}

impl<E> Default for FilterPipeline<E> {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
            sort: None,
        }
    }
}

impl<E> Clone for FilterPipeline<E> {
    fn clone(&self) -> Self {
        Self {
            criteria: self.criteria.clone(),
            sort: self.sort.clone(),
        }
    }
}

impl<E> fmt::Debug for FilterPipeline<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPipeline")
            .field("criteria", &self.criteria)
            .field("sorted", &self.sort.is_some())
            .finish()
    }
}

impl<E> FilterPipeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a case-insensitive substring search over `fields`.
    pub fn with_search(
        mut self,
        name: &str,
        fields: impl IntoIterator<Item = TextField<E>>,
    ) -> Self {
        self.push(Criterion::new(
            name,
            Predicate::Search {
                fields: fields.into_iter().collect(),
                query: String::new(),
                needle: String::new(),
            },
        ));
        self
    }

    /// Add a categorical filter over a single-valued field.
    pub fn with_choice<F>(self, name: &str, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a E) -> Option<&'a str> + Send + Sync + 'static,
    {
        self.with_choice_many(name, move |entity: &E| accessor(entity).into_iter().collect())
    }

    /// Add a categorical filter over a multi-valued field such as tags.
    pub fn with_choice_many<F>(mut self, name: &str, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a E) -> Vec<&'a str> + Send + Sync + 'static,
    {
        self.push(Criterion::new(
            name,
            Predicate::Choice {
                values: values_fn(accessor),
                selected: Selection::All,
            },
        ));
        self
    }

    /// Add a categorical filter over a value derived from the entity, such as
    /// a number rendered as text.
    pub fn with_choice_key<F>(mut self, name: &str, accessor: F) -> Self
    where
        F: Fn(&E) -> Option<String> + Send + Sync + 'static,
    {
        self.push(Criterion::new(
            name,
            Predicate::Choice {
                values: owned_values_fn(accessor),
                selected: Selection::All,
            },
        ));
        self
    }

    /// Add a boolean flag filter.
    pub fn with_flag<F>(mut self, name: &str, accessor: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.push(Criterion::new(
            name,
            Predicate::Flag {
                value: Arc::new(accessor),
                selected: FlagFilter::All,
            },
        ));
        self
    }

    /// Stably sort the visible subset with `compare`.
    pub fn sorted_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&E, &E) -> Ordering + Send + Sync + 'static,
    {
        self.sort = Some(Arc::new(compare));
        self
    }

    fn push(&mut self, criterion: Criterion<E>) {
        self.criteria.retain(|c| c.name() != criterion.name());
        let stage = criterion.stage();
        let at = self
            .criteria
            .iter()
            .position(|c| c.stage() > stage)
            .unwrap_or(self.criteria.len());
        self.criteria.insert(at, criterion);
    }

    pub fn criteria(&self) -> &[Criterion<E>] {
        &self.criteria
    }

    pub fn criterion(&self, name: &str) -> Option<&Criterion<E>> {
        self.criteria.iter().find(|c| c.name() == name)
    }

    fn criterion_mut(&mut self, name: &str) -> Result<&mut Criterion<E>> {
        self.criteria
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| FolioError::UnknownFilter(name.to_string()))
    }

    /// Name of the first search criterion, which receives debounced input.
    pub fn search_name(&self) -> Option<&str> {
        self.criteria
            .iter()
            .find(|c| c.stage() == Stage::Search)
            .map(|c| c.name())
    }

    pub fn set(&mut self, name: &str, value: FilterValue) -> Result<()> {
        self.criterion_mut(name)?.set(value)
    }

    pub fn set_from_str(&mut self, name: &str, raw: &str) -> Result<()> {
        self.criterion_mut(name)?.set_from_str(raw)
    }

    pub fn reset(&mut self) {
        for criterion in &mut self.criteria {
            criterion.reset();
        }
    }

    pub fn is_active(&self) -> bool {
        self.criteria.iter().any(Criterion::is_active)
    }

    pub fn matches(&self, entity: &E) -> bool {
        self.criteria.iter().all(|c| c.matches(entity))
    }

    /// Indices into `items` of the visible subset, in display order.
    pub fn visible_indices(&self, items: &[E]) -> Vec<usize> {
        let mut indices: Vec<usize> = items
            .iter()
            .enumerate()
            .filter(|(_, entity)| self.matches(entity))
            .map(|(i, _)| i)
            .collect();

        if let Some(compare) = &self.sort {
            indices.sort_by(|&a, &b| compare(&items[a], &items[b]));
        }
        indices
    }

    /// The visible subset of `items`.
    pub fn apply<'a>(&self, items: &'a [E]) -> Vec<&'a E> {
        self.visible_indices(items)
            .into_iter()
            .map(|i| &items[i])
            .collect()
    }
}
