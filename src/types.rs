use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::FolioError;

pub const FOLIO_DIR: &str = ".folio";

/// Root directory holding `.folio/`, honoring `FOLIO_ROOT` when set.
pub fn folio_root() -> PathBuf {
    match std::env::var("FOLIO_ROOT") {
        Ok(root) if !root.is_empty() => PathBuf::from(root).join(FOLIO_DIR),
        _ => PathBuf::from(FOLIO_DIR),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Published => "PUBLISHED",
            PostStatus::Archived => "ARCHIVED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DRAFT" => Ok(PostStatus::Draft),
            "PUBLISHED" => Ok(PostStatus::Published),
            "ARCHIVED" => Ok(PostStatus::Archived),
            _ => Err(FolioError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_POST_STATUSES: &[&str] = &["DRAFT", "PUBLISHED", "ARCHIVED"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "PLANNED",
            ProjectStatus::InProgress => "IN_PROGRESS",
            ProjectStatus::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "PLANNED" => Ok(ProjectStatus::Planned),
            "IN_PROGRESS" => Ok(ProjectStatus::InProgress),
            "COMPLETED" => Ok(ProjectStatus::Completed),
            _ => Err(FolioError::InvalidStatus(s.to_string())),
        }
    }
}

pub const VALID_PROJECT_STATUSES: &[&str] = &["PLANNED", "IN_PROGRESS", "COMPLETED"];
