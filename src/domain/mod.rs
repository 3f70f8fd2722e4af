//! Portfolio records served by the content API.

mod course;
mod post;
mod project;
mod series;
mod setting;

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use crate::entity::Resource;
use crate::error::FolioError;
use crate::filter::FilterPipeline;

pub use course::{Course, CourseDraft, YearGroup, group_courses_by_year};
pub use post::{Post, PostDraft};
pub use project::{Project, ProjectDraft};
pub use series::{Series, SeriesDraft};
pub use setting::{Setting, SettingDraft};

/// Default list configuration for a resource.
pub trait Preset: Resource {
    const DEFAULT_PAGE_SIZE: usize = 12;

    /// Filter pipeline the resource's listing pages use.
    fn pipeline() -> FilterPipeline<Self>;
}

/// Resources known to the command-line host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Posts,
    Series,
    Projects,
    Courses,
    Settings,
}

pub const VALID_RESOURCES: &[&str] = &["posts", "series", "projects", "courses", "settings"];

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Posts,
        ResourceKind::Series,
        ResourceKind::Projects,
        ResourceKind::Courses,
        ResourceKind::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Posts => Post::PATH,
            ResourceKind::Series => Series::PATH,
            ResourceKind::Projects => Project::PATH,
            ResourceKind::Courses => Course::PATH,
            ResourceKind::Settings => Setting::PATH,
        }
    }

    pub fn default_page_size(&self) -> usize {
        match self {
            ResourceKind::Posts => Post::DEFAULT_PAGE_SIZE,
            ResourceKind::Series => Series::DEFAULT_PAGE_SIZE,
            ResourceKind::Projects => Project::DEFAULT_PAGE_SIZE,
            ResourceKind::Courses => Course::DEFAULT_PAGE_SIZE,
            ResourceKind::Settings => Setting::DEFAULT_PAGE_SIZE,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                FolioError::Other(format!(
                    "unknown resource '{s}'. Must be one of: {}",
                    VALID_RESOURCES.join(", ")
                ))
            })
    }
}

/// Patch body flipping a boolean field.
pub fn toggle_flag_patch(field: &str, current: bool) -> Value {
    json!({ field: !current })
}

/// URL-safe slug: lowercase alphanumerics separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flag_patch() {
        assert_eq!(toggle_flag_patch("featured", false), json!({ "featured": true }));
        assert_eq!(toggle_flag_patch("published", true), json!({ "published": false }));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  React   Server Components  "), "react-server-components");
        assert_eq!(slugify("C++ & Rust"), "c-rust");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!("Posts".parse::<ResourceKind>().unwrap(), ResourceKind::Posts);
        assert_eq!(" courses ".parse::<ResourceKind>().unwrap(), ResourceKind::Courses);
        let err = "users".parse::<ResourceKind>().unwrap_err();
        assert!(err.to_string().contains("posts, series, projects"));
    }

    #[test]
    fn test_default_page_sizes() {
        assert_eq!(ResourceKind::Posts.default_page_size(), 9);
        assert_eq!(ResourceKind::Projects.default_page_size(), 12);
        for (kind, name) in ResourceKind::ALL.iter().zip(VALID_RESOURCES) {
            assert_eq!(kind.as_str(), *name);
        }
    }
}
