//! Individual filter criteria and the values they hold.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{FolioError, Result};

pub(crate) type TextFn<E> = Arc<dyn for<'a> Fn(&'a E) -> Option<&'a str> + Send + Sync>;
pub(crate) type ValuesFn<E> = Arc<dyn for<'a> Fn(&'a E) -> Vec<Cow<'a, str>> + Send + Sync>;
pub(crate) type FlagFn<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Categorical filter value: everything, or one specific value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Parse user input. Empty input and `"all"` mean no filtering.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
            Selection::All
        } else {
            Selection::Only(raw.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl From<&str> for Selection {
    fn from(raw: &str) -> Self {
        Selection::parse(raw)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Only(value) => write!(f, "{value}"),
        }
    }
}

/// Boolean filter value: `true`, `false`, or no filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagFilter {
    #[default]
    All,
    Only(bool),
}

impl FlagFilter {
    pub fn is_all(&self) -> bool {
        matches!(self, FlagFilter::All)
    }
}

impl From<bool> for FlagFilter {
    fn from(value: bool) -> Self {
        FlagFilter::Only(value)
    }
}

impl From<Option<bool>> for FlagFilter {
    fn from(value: Option<bool>) -> Self {
        value.map(FlagFilter::Only).unwrap_or_default()
    }
}

impl FromStr for FlagFilter {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(FlagFilter::All),
            "true" | "yes" | "1" => Ok(FlagFilter::Only(true)),
            "false" | "no" | "0" => Ok(FlagFilter::Only(false)),
            _ => Err(FolioError::Other(format!(
                "invalid flag value '{s}', expected true, false or all"
            ))),
        }
    }
}

impl fmt::Display for FlagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagFilter::All => write!(f, "all"),
            FlagFilter::Only(value) => write!(f, "{value}"),
        }
    }
}

/// A value assigned to a named criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Choice(Selection),
    Flag(FlagFilter),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Text(text) => write!(f, "{text}"),
            FilterValue::Choice(selection) => write!(f, "{selection}"),
            FilterValue::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

/// Evaluation stage of a criterion. Stages run in declaration order of this
/// enum; all criteria AND together, so the order only affects short-circuiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Search,
    Choice,
    Flag,
}

impl Stage {
    fn expected(&self) -> &'static str {
        match self {
            Stage::Search => "text",
            Stage::Choice => "choice",
            Stage::Flag => "flag",
        }
    }
}

/// One text field a search criterion looks at.
pub struct TextField<E>(TextSource<E>);

enum TextSource<E> {
    One(TextFn<E>),
    Many(ValuesFn<E>),
}

impl<E> Clone for TextField<E> {
    fn clone(&self) -> Self {
        match &self.0 {
            TextSource::One(f) => TextField(TextSource::One(f.clone())),
            TextSource::Many(f) => TextField(TextSource::Many(f.clone())),
        }
    }
}

impl<E> TextField<E> {
    /// Whether the field contains `needle`, which must already be lowercase.
    fn contains(&self, entity: &E, needle: &str) -> bool {
        match &self.0 {
            TextSource::One(text) => {
                text(entity).is_some_and(|t| t.to_lowercase().contains(needle))
            }
            TextSource::Many(values) => values(entity)
                .iter()
                .any(|t| t.to_lowercase().contains(needle)),
        }
    }
}

/// Build a searchable text field from an accessor.
pub fn field<E, F>(accessor: F) -> TextField<E>
where
    F: for<'a> Fn(&'a E) -> Option<&'a str> + Send + Sync + 'static,
{
    TextField(TextSource::One(Arc::new(accessor)))
}

/// Build a searchable field over several values, such as a tag list. The
/// field matches when any value does.
pub fn field_many<E, F>(accessor: F) -> TextField<E>
where
    F: for<'a> Fn(&'a E) -> Vec<&'a str> + Send + Sync + 'static,
{
    TextField(TextSource::Many(values_fn(accessor)))
}

fn choice_values<E, F>(accessor: F) -> ValuesFn<E>
where
    F: for<'a> Fn(&'a E) -> Vec<Cow<'a, str>> + Send + Sync + 'static,
{
    Arc::new(accessor)
}

pub(crate) fn values_fn<E, F>(accessor: F) -> ValuesFn<E>
where
    F: for<'a> Fn(&'a E) -> Vec<&'a str> + Send + Sync + 'static,
{
    choice_values(move |entity: &E| {
        accessor(entity).into_iter().map(Cow::Borrowed).collect()
    })
}

/// Choice values computed from the entity rather than borrowed from it.
pub(crate) fn owned_values_fn<E, F>(accessor: F) -> ValuesFn<E>
where
    F: Fn(&E) -> Option<String> + Send + Sync + 'static,
{
    choice_values(move |entity: &E| accessor(entity).map(Cow::Owned).into_iter().collect())
}

pub(crate) enum Predicate<E> {
    Search {
        fields: Vec<TextField<E>>,
        query: String,
        needle: String,
    },
    Choice {
        values: ValuesFn<E>,
        selected: Selection,
    },
    Flag {
        value: FlagFn<E>,
        selected: FlagFilter,
    },
}

impl<E> Clone for Predicate<E> {
    fn clone(&self) -> Self {
        match self {
            Predicate::Search {
                fields,
                query,
                needle,
            } => Predicate::Search {
                fields: fields.clone(),
                query: query.clone(),
                needle: needle.clone(),
            },
            Predicate::Choice { values, selected } => Predicate::Choice {
                values: values.clone(),
                selected: selected.clone(),
            },
            Predicate::Flag { value, selected } => Predicate::Flag {
                value: value.clone(),
                selected: *selected,
            },
        }
    }
}

/// A named, independently settable predicate over entities of type `E`.
pub struct Criterion<E> {
    name: String,
    predicate: Predicate<E>,
}

impl<E> Clone for Criterion<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            predicate: self.predicate.clone(),
        }
    }
}

impl<E> fmt::Debug for Criterion<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Criterion")
            .field("name", &self.name)
            .field("stage", &self.stage())
            .field("value", &self.value())
            .finish()
    }
}

impl<E> Criterion<E> {
    pub(crate) fn new(name: &str, predicate: Predicate<E>) -> Self {
        Self {
            name: name.to_string(),
            predicate,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        match self.predicate {
            Predicate::Search { .. } => Stage::Search,
            Predicate::Choice { .. } => Stage::Choice,
            Predicate::Flag { .. } => Stage::Flag,
        }
    }

    /// Current value of the criterion.
    pub fn value(&self) -> FilterValue {
        match &self.predicate {
            Predicate::Search { query, .. } => FilterValue::Text(query.clone()),
            Predicate::Choice { selected, .. } => FilterValue::Choice(selected.clone()),
            Predicate::Flag { selected, .. } => FilterValue::Flag(*selected),
        }
    }

    /// Whether the criterion currently narrows anything.
    pub fn is_active(&self) -> bool {
        match &self.predicate {
            Predicate::Search { needle, .. } => !needle.is_empty(),
            Predicate::Choice { selected, .. } => !selected.is_all(),
            Predicate::Flag { selected, .. } => !selected.is_all(),
        }
    }

    pub fn matches(&self, entity: &E) -> bool {
        match &self.predicate {
            Predicate::Search { fields, needle, .. } => {
                needle.is_empty() || fields.iter().any(|field| field.contains(entity, needle))
            }
            Predicate::Choice { values, selected } => match selected {
                Selection::All => true,
                Selection::Only(wanted) => values(entity)
                    .iter()
                    .any(|value| unicase::eq(&**value, wanted.as_str())),
            },
            Predicate::Flag { value, selected } => match selected {
                FlagFilter::All => true,
                FlagFilter::Only(wanted) => value(entity) == *wanted,
            },
        }
    }

    pub(crate) fn set(&mut self, value: FilterValue) -> Result<()> {
        let stage = self.stage();
        match (&mut self.predicate, value) {
            (Predicate::Search { query, needle, .. }, FilterValue::Text(text)) => {
                *needle = text.trim().to_lowercase();
                *query = text;
            }
            (Predicate::Choice { selected, .. }, FilterValue::Choice(selection)) => {
                *selected = selection;
            }
            (Predicate::Flag { selected, .. }, FilterValue::Flag(flag)) => {
                *selected = flag;
            }
            _ => {
                return Err(FolioError::FilterKindMismatch {
                    name: self.name.clone(),
                    expected: stage.expected(),
                });
            }
        }
        Ok(())
    }

    /// Parse `raw` according to this criterion's kind and assign it.
    pub(crate) fn set_from_str(&mut self, raw: &str) -> Result<()> {
        let value = match self.stage() {
            Stage::Search => FilterValue::Text(raw.to_string()),
            Stage::Choice => FilterValue::Choice(Selection::parse(raw)),
            Stage::Flag => FilterValue::Flag(raw.parse().map_err(|_| {
                FolioError::FilterKindMismatch {
                    name: self.name.clone(),
                    expected: "flag (true, false or all)",
                }
            })?),
        };
        self.set(value)
    }

    pub(crate) fn reset(&mut self) {
        match &mut self.predicate {
            Predicate::Search { query, needle, .. } => {
                query.clear();
                needle.clear();
            }
            Predicate::Choice { selected, .. } => *selected = Selection::All,
            Predicate::Flag { selected, .. } => *selected = FlagFilter::All,
        }
    }
}
