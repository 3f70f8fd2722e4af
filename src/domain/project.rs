use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Resource, UpdateMethod};
use crate::filter::{FilterPipeline, field, field_many};
use crate::types::ProjectStatus;

use super::Preset;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub order: i32,
}

impl Project {
    pub fn tech_summary(&self) -> String {
        self.tech_stack.join(", ")
    }
}

impl Entity for Project {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Project {
    type Draft = ProjectDraft;
    const PATH: &'static str = "projects";
    const COLLECTION_KEY: &'static str = "projects";
    const ENTITY_KEY: &'static str = "project";
    const UPDATE_METHOD: UpdateMethod = UpdateMethod::Patch;
}

impl Preset for Project {
    fn pipeline() -> FilterPipeline<Self> {
        FilterPipeline::new()
            .with_search(
                "search",
                [
                    field(|p: &Project| Some(p.title.as_str())),
                    field(|p: &Project| p.description.as_deref()),
                    field_many(|p: &Project| p.tech_stack.iter().map(String::as_str).collect()),
                ],
            )
            .with_choice("status", |p: &Project| Some(p.status.as_str()))
            .with_choice_many("tech", |p: &Project| {
                p.tech_stack.iter().map(String::as_str).collect()
            })
            .with_flag("featured", |p: &Project| p.featured)
            .sorted_by(|a: &Project, b: &Project| a.order.cmp(&b.order))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tech_stack: Vec<String>,
    pub status: ProjectStatus,
    pub featured: bool,
    pub order: i32,
}

impl ProjectDraft {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            tech_stack: Vec::new(),
            status: ProjectStatus::Planned,
            featured: false,
            order: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn projects() -> Vec<Project> {
        serde_json::from_value(json!([
            { "id": "a", "title": "CMS", "techStack": ["Next.js", "Prisma"], "status": "COMPLETED", "order": 3 },
            { "id": "b", "title": "Shell", "techStack": ["Rust"], "status": "IN_PROGRESS", "featured": true, "order": 1 },
            { "id": "c", "title": "Blog engine", "description": "Static site in Rust", "techStack": ["Rust", "Tokio"], "order": 2 }
        ]))
        .unwrap()
    }

    #[test]
    fn test_preset_sorts_by_order() {
        let data = projects();
        let ids: Vec<&str> = Project::pipeline().apply(&data).iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_search_matches_tech_stack() {
        let data = projects();
        let mut pipeline = Project::pipeline();
        pipeline.set_from_str("search", "prisma").unwrap();
        let ids: Vec<&str> = pipeline.apply(&data).iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn test_tech_and_status_choices() {
        let data = projects();
        let mut pipeline = Project::pipeline();
        pipeline.set_from_str("tech", "rust").unwrap();
        assert_eq!(pipeline.apply(&data).len(), 2);
        pipeline.set_from_str("status", "in_progress").unwrap();
        assert_eq!(pipeline.apply(&data)[0].id, "b");
    }

    #[test]
    fn test_updates_use_patch() {
        assert_eq!(Project::UPDATE_METHOD, UpdateMethod::Patch);
        assert_eq!(ProjectDraft::new("x").status, ProjectStatus::Planned);
    }
}
