use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::{Value, json};

use super::ls::require_loaded;
use super::{CommandOutput, connect};
use crate::api::ApiTransport;
use crate::config::Config;
use crate::domain::{Course, ResourceKind, group_courses_by_year};
use crate::error::Result;
use crate::view::ListView;

pub(crate) async fn course_timeline<T: ApiTransport>(
    transport: Arc<T>,
    config: &Config,
) -> Result<CommandOutput> {
    let view = ListView::<Course, T>::for_resource(transport, ResourceKind::Courses, config);
    require_loaded(view.refresh().await)?;

    let courses = view.visible_items();
    let groups = group_courses_by_year(&courses);

    let json_groups: Vec<Value> = groups
        .iter()
        .map(|group| {
            json!({
                "year": group.year,
                "courses": group.courses,
            })
        })
        .collect();

    let mut text = String::new();
    if groups.is_empty() {
        text.push_str(&"No courses found".dimmed().to_string());
    }
    for (i, group) in groups.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        text.push_str(&format!("{}\n", group.year.to_string().cyan().bold()));
        for course in &group.courses {
            let mut line = format!("  {} {}", "•".dimmed(), course.title);
            line.push_str(&format!(" {}", course.institution.dimmed()));
            if let Some(semester) = &course.semester {
                line.push_str(&format!(" ({semester})"));
            }
            if let Some(grade) = &course.grade {
                line.push_str(&format!(" {}", grade.green()));
            }
            if !course.completed {
                line.push_str(&format!(" {}", "in progress".yellow()));
            }
            text.push_str(&line);
            text.push('\n');
        }
    }

    Ok(CommandOutput::new(json!({ "years": json_groups })).with_text(text.trim_end()))
}

/// Show the education timeline grouped by year
pub async fn cmd_courses(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let transport = connect(&config)?;
    course_timeline(transport, &config).await?.print(output_json)
}
