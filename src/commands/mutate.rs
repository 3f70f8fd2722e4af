use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::json;

use super::ls::require_loaded;
use super::{CommandOutput, connect};
use crate::api::ApiTransport;
use crate::config::Config;
use crate::domain::{
    Course, Post, PostDraft, Preset, Project, ResourceKind, Series, Setting, toggle_flag_patch,
};
use crate::entity::Entity;
use crate::error::{FolioError, Result};
use crate::types::PostStatus;
use crate::view::ListView;

/// Records with a `featured` flag.
pub(crate) trait Featurable: Preset {
    fn featured(&self) -> bool;
}

impl Featurable for Post {
    fn featured(&self) -> bool {
        self.featured
    }
}

impl Featurable for Project {
    fn featured(&self) -> bool {
        self.featured
    }
}

pub(crate) async fn create_post<T: ApiTransport>(
    transport: Arc<T>,
    config: &Config,
    draft: PostDraft,
) -> Result<CommandOutput> {
    let view = ListView::<Post, T>::for_resource(transport, ResourceKind::Posts, config);
    let created = view.create_item(&draft).await?;

    Ok(match created {
        Some(post) => {
            let text = format!(
                "Created post {} [{}] {}",
                post.id.cyan(),
                post.status,
                post.title
            );
            CommandOutput::new(json!({
                "id": post.id,
                "title": post.title,
                "slug": post.slug,
                "status": post.status,
                "action": "created",
            }))
            .with_text(text)
        }
        None => CommandOutput::new(json!({
            "id": null,
            "title": draft.title,
            "slug": draft.slug,
            "status": draft.status,
            "action": "created",
        }))
        .with_text(format!("Created post {}", draft.title)),
    })
}

/// Create a blog post
pub async fn cmd_create_post(
    title: &str,
    excerpt: Option<String>,
    status: PostStatus,
    tags: Vec<String>,
    output_json: bool,
) -> Result<()> {
    if title.trim().is_empty() {
        return Err(FolioError::Other("post title cannot be empty".to_string()));
    }
    let mut draft = PostDraft::new(title.trim());
    draft.excerpt = excerpt;
    draft.status = status;
    draft.tags = tags;

    let config = Config::load()?;
    let transport = connect(&config)?;
    create_post(transport, &config, draft)
        .await?
        .print(output_json)
}

pub(crate) async fn remove<R, T>(
    transport: Arc<T>,
    config: &Config,
    kind: ResourceKind,
    id: &str,
) -> Result<CommandOutput>
where
    R: Preset,
    T: ApiTransport,
{
    let view = ListView::<R, T>::for_resource(transport, kind, config);
    view.delete_item(id).await?;
    Ok(CommandOutput::new(json!({
        "resource": kind.as_str(),
        "id": id,
        "action": "deleted",
    }))
    .with_text(format!("Deleted {} {}", R::PATH, id.cyan())))
}

/// Delete a record
pub async fn cmd_rm(kind: ResourceKind, id: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let transport = connect(&config)?;
    let output = match kind {
        ResourceKind::Posts => remove::<Post, _>(transport, &config, kind, id).await?,
        ResourceKind::Series => remove::<Series, _>(transport, &config, kind, id).await?,
        ResourceKind::Projects => remove::<Project, _>(transport, &config, kind, id).await?,
        ResourceKind::Courses => remove::<Course, _>(transport, &config, kind, id).await?,
        ResourceKind::Settings => remove::<Setting, _>(transport, &config, kind, id).await?,
    };
    output.print(output_json)
}

pub(crate) async fn toggle_featured<R, T>(
    transport: Arc<T>,
    config: &Config,
    kind: ResourceKind,
    id: &str,
) -> Result<CommandOutput>
where
    R: Featurable,
    T: ApiTransport,
{
    let view = ListView::<R, T>::for_resource(transport, kind, config);
    require_loaded(view.refresh().await)?;

    let current = view
        .items()
        .iter()
        .find(|item| item.id() == id)
        .map(|item| item.featured())
        .ok_or_else(|| FolioError::NotFound(format!("{}/{}", R::PATH, id)))?;

    view.update_item(id, toggle_flag_patch("featured", current))
        .await?;

    // Reconciled (or reloaded) state is authoritative.
    let featured = view
        .items()
        .iter()
        .find(|item| item.id() == id)
        .map(|item| item.featured())
        .unwrap_or(!current);

    let label = if featured {
        "featured".green().to_string()
    } else {
        "not featured".dimmed().to_string()
    };
    Ok(CommandOutput::new(json!({
        "resource": R::PATH,
        "id": id,
        "featured": featured,
    }))
    .with_text(format!("{} {} is now {}", R::PATH, id.cyan(), label)))
}

/// Toggle the featured flag of a post or project
pub async fn cmd_feature(kind: ResourceKind, id: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let transport = connect(&config)?;
    let output = match kind {
        ResourceKind::Posts => toggle_featured::<Post, _>(transport, &config, kind, id).await?,
        ResourceKind::Projects => toggle_featured::<Project, _>(transport, &config, kind, id).await?,
        other => {
            return Err(FolioError::Other(format!(
                "{other} cannot be featured. Must be one of: posts, projects"
            )));
        }
    };
    output.print(output_json)
}
