use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Resource};
use crate::filter::{FilterPipeline, field};

use super::{Preset, slugify};

/// An ordered collection of posts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub post_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Entity for Series {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Series {
    type Draft = SeriesDraft;
    const PATH: &'static str = "series";
    const COLLECTION_KEY: &'static str = "series";
    const ENTITY_KEY: &'static str = "series";
}

impl Preset for Series {
    fn pipeline() -> FilterPipeline<Self> {
        FilterPipeline::new()
            .with_search(
                "search",
                [
                    field(|s: &Series| Some(s.title.as_str())),
                    field(|s: &Series| s.description.as_deref()),
                ],
            )
            .with_flag("published", |s: &Series| s.published)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDraft {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub published: bool,
}

impl SeriesDraft {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            slug: slugify(title),
            description: None,
            published: false,
        }
    }
}
