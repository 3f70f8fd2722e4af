pub mod api;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod entity;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod types;
pub mod view;

#[cfg(test)]
mod test_guards;

pub use api::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, MockTransport, ResourceClient};
pub use cache::{DataCache, LoadOutcome};
pub use config::Config;
pub use domain::{
    Course, Post, Preset, Project, ResourceKind, Series, Setting, group_courses_by_year,
};
pub use entity::{Entity, Resource, UpdateMethod};
pub use error::{FolioError, Result};
pub use filter::{Criterion, FilterPipeline, FilterValue, FlagFilter, Selection, Stage};
pub use pagination::Paginator;
pub use types::{PostStatus, ProjectStatus};
pub use view::{ListSnapshot, ListView};
