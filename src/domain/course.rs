use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Resource};
use crate::filter::{FilterPipeline, field};

use super::Preset;

/// A course on the education timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub institution: String,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Entity for Course {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Course {
    type Draft = CourseDraft;
    const PATH: &'static str = "courses";
    const COLLECTION_KEY: &'static str = "courses";
    const ENTITY_KEY: &'static str = "course";
}

impl Preset for Course {
    fn pipeline() -> FilterPipeline<Self> {
        FilterPipeline::new()
            .with_search(
                "search",
                [
                    field(|c: &Course| Some(c.title.as_str())),
                    field(|c: &Course| Some(c.institution.as_str())),
                ],
            )
            .with_choice_key("year", |c: &Course| Some(c.year.to_string()))
            .with_choice("institution", |c: &Course| Some(c.institution.as_str()))
            .with_flag("completed", |c: &Course| c.completed)
            .sorted_by(|a: &Course, b: &Course| b.year.cmp(&a.year))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub institution: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub completed: bool,
}

/// Courses taken in one year.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub courses: Vec<&'a Course>,
}

/// Group courses by year, newest year first. Courses keep their relative
/// order inside a year.
pub fn group_courses_by_year<'a, I>(courses: I) -> Vec<YearGroup<'a>>
where
    I: IntoIterator<Item = &'a Course>,
{
    let mut groups: Vec<YearGroup<'a>> = Vec::new();
    for course in courses {
        match groups.iter_mut().find(|g| g.year == course.year) {
            Some(group) => group.courses.push(course),
            None => groups.push(YearGroup {
                year: course.year,
                courses: vec![course],
            }),
        }
    }
    groups.sort_by(|a, b| b.year.cmp(&a.year));
    groups
}
