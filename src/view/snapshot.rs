use std::sync::Arc;

use crate::filter::FilterValue;

/// Every reactive field of a list view, read at one instant.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    /// The full cached collection
    pub items: Arc<Vec<R>>,
    pub visible_count: usize,
    pub page_items: Vec<R>,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    /// Current value of every filter, in evaluation order
    pub filters: Vec<(String, FilterValue)>,
    pub search_input: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<R> ListSnapshot<R> {
    /// Number of the first item on the current page, 1-based. Zero when the
    /// page is empty.
    pub fn first_item_number(&self) -> usize {
        if self.page_items.is_empty() {
            0
        } else {
            (self.current_page - 1) * self.page_size + 1
        }
    }

    pub fn last_item_number(&self) -> usize {
        if self.page_items.is_empty() {
            0
        } else {
            self.first_item_number() + self.page_items.len() - 1
        }
    }

    /// Filters that currently narrow the visible set.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters.iter().filter_map(|(name, value)| {
            let active = match value {
                FilterValue::Text(text) => !text.trim().is_empty(),
                FilterValue::Choice(selection) => !selection.is_all(),
                FilterValue::Flag(flag) => !flag.is_all(),
            };
            active.then_some((name.as_str(), value))
        })
    }
}
