use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Resource};
use crate::filter::{FilterPipeline, field};
use crate::types::PostStatus;

use super::{Preset, slugify};

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Post {
    /// Date shown on post cards: publication date, else creation date.
    pub fn display_date(&self) -> Option<String> {
        self.published_at
            .or(self.created_at)
            .map(|ts| ts.strftime("%B %-d, %Y").to_string())
    }

    /// Estimated reading time in whole minutes, at least one.
    pub fn reading_minutes(&self) -> usize {
        let words = self
            .content
            .as_deref()
            .map(|text| text.split_whitespace().count())
            .unwrap_or(0);
        words.div_ceil(WORDS_PER_MINUTE).max(1)
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }
}

impl Entity for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Post {
    type Draft = PostDraft;
    const PATH: &'static str = "posts";
    const COLLECTION_KEY: &'static str = "posts";
    const ENTITY_KEY: &'static str = "post";
}

impl Preset for Post {
    const DEFAULT_PAGE_SIZE: usize = 9;

    fn pipeline() -> FilterPipeline<Self> {
        FilterPipeline::new()
            .with_search(
                "search",
                [
                    field(|p: &Post| Some(p.title.as_str())),
                    field(|p: &Post| p.excerpt.as_deref()),
                ],
            )
            .with_choice("status", |p: &Post| Some(p.status.as_str()))
            .with_choice("category", |p: &Post| p.category_id.as_deref())
            .with_choice("series", |p: &Post| p.series_id.as_deref())
            .with_choice_many("tag", |p: &Post| p.tags.iter().map(String::as_str).collect())
            .with_flag("featured", |p: &Post| p.featured)
    }
}

/// Body for `POST /posts`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    pub tags: Vec<String>,
    pub featured: bool,
}

impl PostDraft {
    /// A draft post with a slug derived from the title.
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            slug: slugify(title),
            excerpt: None,
            content: None,
            status: PostStatus::Draft,
            category_id: None,
            series_id: None,
            tags: Vec::new(),
            featured: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterValue;
    use serde_json::json;

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_deserialize_camel_case() {
        let p = post(json!({
            "id": "p1",
            "title": "Hello",
            "slug": "hello",
            "status": "PUBLISHED",
            "categoryId": "c1",
            "tags": ["rust"],
            "featured": true,
            "publishedAt": "2024-03-05T10:00:00Z",
            "createdAt": "2024-03-01T10:00:00Z"
        }));
        assert_eq!(p.status, PostStatus::Published);
        assert_eq!(p.category_id.as_deref(), Some("c1"));
        assert!(p.is_published());
    }

    #[test]
    fn test_minimal_record_uses_defaults() {
        let p = post(json!({ "id": "p1", "title": "Hello" }));
        assert_eq!(p.status, PostStatus::Draft);
        assert!(p.tags.is_empty());
        assert_eq!(p.display_date(), None);
    }

    #[test]
    fn test_display_date_prefers_published_at() {
        let p = post(json!({
            "id": "p1",
            "title": "Hello",
            "publishedAt": "2024-03-05T10:00:00Z",
            "createdAt": "2024-01-20T10:00:00Z"
        }));
        assert_eq!(p.display_date().as_deref(), Some("March 5, 2024"));

        let draft = post(json!({
            "id": "p2",
            "title": "Draft",
            "createdAt": "2024-01-20T10:00:00Z"
        }));
        assert_eq!(draft.display_date().as_deref(), Some("January 20, 2024"));
    }

    #[test]
    fn test_reading_minutes() {
        let mut p = post(json!({ "id": "p1", "title": "Hello" }));
        assert_eq!(p.reading_minutes(), 1);
        p.content = Some("word ".repeat(401));
        assert_eq!(p.reading_minutes(), 3);
    }

    #[test]
    fn test_preset_filters_by_tag_and_status() {
        let posts = vec![
            post(json!({ "id": "1", "title": "A", "status": "PUBLISHED", "tags": ["rust", "async"] })),
            post(json!({ "id": "2", "title": "B", "status": "DRAFT", "tags": ["rust"] })),
            post(json!({ "id": "3", "title": "C", "status": "PUBLISHED", "tags": ["css"] })),
        ];
        let mut pipeline = Post::pipeline();
        pipeline.set_from_str("tag", "Rust").unwrap();
        pipeline
            .set("status", FilterValue::Choice("PUBLISHED".into()))
            .unwrap();
        let ids: Vec<&str> = pipeline.apply(&posts).iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let mut draft = PostDraft::new("Hello World");
        draft.category_id = Some("c1".to_string());
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["slug"], "hello-world");
        assert_eq!(value["status"], "DRAFT");
        assert_eq!(value["categoryId"], "c1");
        assert!(value.get("excerpt").is_none());
    }
}
