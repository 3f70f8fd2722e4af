use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};
use tabled::builder::Builder;
use tabled::settings::Style;

use super::{CommandOutput, connect};
use crate::api::ApiTransport;
use crate::cache::LoadOutcome;
use crate::config::Config;
use crate::domain::{Course, Post, Preset, Project, ResourceKind, Series, Setting};
use crate::error::{FolioError, Result};
use crate::view::{ListSnapshot, ListView};

/// Options for `folio ls`
pub struct LsOptions {
    pub resource: ResourceKind,
    pub search: Option<String>,
    pub filters: Vec<(String, String)>,
    pub page: i64,
    pub page_size: Option<usize>,
    pub json: bool,
}

/// A record that can be shown as a table row.
pub(crate) trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
}

fn yes_no(value: bool) -> String {
    let text = if value { "yes" } else { "" };
    text.to_string()
}

impl TableRow for Post {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Status", "Tags", "Featured", "Date"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.status.to_string(),
            self.tags.join(", "),
            yes_no(self.featured),
            self.display_date().unwrap_or_default(),
        ]
    }
}

impl TableRow for Series {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Posts", "Published"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.post_count.to_string(),
            yes_no(self.published),
        ]
    }
}

impl TableRow for Project {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Status", "Tech", "Featured"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.status.to_string(),
            self.tech_summary(),
            yes_no(self.featured),
        ]
    }
}

impl TableRow for Course {
    const HEADERS: &'static [&'static str] = &["ID", "Title", "Institution", "Year", "Grade", "Completed"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.institution.clone(),
            self.year.to_string(),
            self.grade.clone().unwrap_or_default(),
            yes_no(self.completed),
        ]
    }
}

impl TableRow for Setting {
    const HEADERS: &'static [&'static str] = &["ID", "Key", "Value", "Category", "Public"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.key.clone(),
            self.value_text(),
            self.category.clone().unwrap_or_default(),
            yes_no(self.public),
        ]
    }
}

pub(crate) fn render_table<R: TableRow>(rows: &[R]) -> String {
    let mut builder = Builder::default();
    builder.push_record(R::HEADERS.iter().copied());
    for row in rows {
        builder.push_record(row.cells());
    }
    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Turn a failed load into an error the CLI can report.
pub(crate) fn require_loaded(outcome: LoadOutcome) -> Result<usize> {
    match outcome {
        LoadOutcome::Applied { count } => Ok(count),
        LoadOutcome::Failed { message } => Err(FolioError::Other(message)),
        LoadOutcome::Superseded | LoadOutcome::Detached => {
            Err(FolioError::Other("load was cancelled".to_string()))
        }
    }
}

/// Apply `--search` and `--filter` options, naming the available filters when
/// one is unknown.
fn apply_filters<R, T>(view: &ListView<R, T>, options: &LsOptions) -> Result<()>
where
    R: Preset,
    T: ApiTransport,
{
    if let Some(search) = &options.search {
        view.set_filter_str("search", search)?;
    }
    for (name, value) in &options.filters {
        view.set_filter_str(name, value).map_err(|e| match e {
            FolioError::UnknownFilter(name) => FolioError::Other(format!(
                "unknown filter '{name}' for {}. Available: {}",
                options.resource,
                view.filter_names().join(", ")
            )),
            other => other,
        })?;
    }
    Ok(())
}

fn snapshot_json<R: serde::Serialize>(
    resource: ResourceKind,
    snapshot: &ListSnapshot<R>,
) -> Result<Value> {
    let filters: Map<String, Value> = snapshot
        .active_filters()
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect();
    let items = snapshot
        .page_items
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(json!({
        "resource": resource.as_str(),
        "page": snapshot.current_page,
        "total_pages": snapshot.total_pages,
        "page_size": snapshot.page_size,
        "visible_count": snapshot.visible_count,
        "total_count": snapshot.items.len(),
        "filters": filters,
        "items": items,
    }))
}

fn snapshot_text<R: TableRow>(resource: ResourceKind, snapshot: &ListSnapshot<R>) -> String {
    if snapshot.page_items.is_empty() {
        return format!("No {resource} found").dimmed().to_string();
    }
    let footer = format!(
        "Page {} of {} · showing {}-{} of {} {}",
        snapshot.current_page,
        snapshot.total_pages,
        snapshot.first_item_number(),
        snapshot.last_item_number(),
        snapshot.visible_count,
        resource,
    );
    format!("{}\n{}", render_table(&snapshot.page_items), footer.dimmed())
}

pub(crate) async fn list_resource<R, T>(
    transport: Arc<T>,
    config: &Config,
    options: &LsOptions,
) -> Result<CommandOutput>
where
    R: Preset + TableRow,
    T: ApiTransport,
{
    let view = ListView::<R, T>::for_resource(transport, options.resource, config);
    if let Some(size) = options.page_size {
        view.set_page_size(size);
    }
    apply_filters(&view, options)?;
    require_loaded(view.refresh().await)?;
    view.go_to_page(options.page);

    let snapshot = view.snapshot();
    Ok(CommandOutput::new(snapshot_json(options.resource, &snapshot)?)
        .with_text(snapshot_text(options.resource, &snapshot)))
}

/// List a resource with filters and pagination
pub async fn cmd_ls(options: LsOptions) -> Result<()> {
    let config = Config::load()?;
    let transport = connect(&config)?;

    let output = match options.resource {
        ResourceKind::Posts => list_resource::<Post, _>(transport, &config, &options).await?,
        ResourceKind::Series => list_resource::<Series, _>(transport, &config, &options).await?,
        ResourceKind::Projects => list_resource::<Project, _>(transport, &config, &options).await?,
        ResourceKind::Courses => list_resource::<Course, _>(transport, &config, &options).await?,
        ResourceKind::Settings => list_resource::<Setting, _>(transport, &config, &options).await?,
    };
    output.print(options.json)
}
