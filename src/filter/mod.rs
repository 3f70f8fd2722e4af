//! Client-side filtering for list views.
//!
//! A [`FilterPipeline`] holds named criteria (search text, categorical
//! choices, boolean flags) and computes the visible subset of a collection.
//! Evaluation is pure and synchronous, so it is safe to run on every change.

mod criterion;
mod pipeline;

pub use criterion::{
    Criterion, FilterValue, FlagFilter, Selection, Stage, TextField, field,
    field_many,
};
pub use pipeline::FilterPipeline;
