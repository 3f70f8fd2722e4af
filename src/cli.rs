use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::domain::{ResourceKind, VALID_RESOURCES};
use crate::types::{PostStatus, VALID_POST_STATUSES};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse and manage portfolio content")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a resource with filters and pagination
    #[command(visible_alias = "l")]
    Ls {
        /// Resource: posts, series, projects, courses, settings
        #[arg(value_parser = parse_resource)]
        resource: ResourceKind,

        /// Case-insensitive text search
        #[arg(short, long)]
        search: Option<String>,

        /// Filter as name=value (repeatable), e.g. status=published
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Page number (clamped to the available pages)
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        page: i64,

        /// Items per page (default: per-resource setting)
        #[arg(long)]
        page_size: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the education timeline grouped by year
    Courses {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create content
    Create {
        #[command(subcommand)]
        action: CreateAction,
    },

    /// Delete a record
    Rm {
        /// Resource: posts, series, projects, courses, settings
        #[arg(value_parser = parse_resource)]
        resource: ResourceKind,

        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Toggle the featured flag of a post or project
    Feature {
        /// Resource: posts or projects
        #[arg(value_parser = parse_featurable)]
        resource: ResourceKind,

        /// Record ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CreateAction {
    /// Create a blog post
    Post {
        /// Post title
        title: String,

        /// Short summary shown on cards
        #[arg(short, long)]
        excerpt: Option<String>,

        /// Status: draft, published, archived (default: draft)
        #[arg(short, long, default_value = "draft", value_parser = parse_post_status)]
        status: PostStatus,

        /// Tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (api.base_url, api.prefix, api.timeout_secs, search.debounce_ms, pages.<resource>)
        key: String,
        /// Value to set
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Commands {
    /// Execute the command, dispatching to the appropriate handler.
    pub async fn run(self) -> crate::error::Result<()> {
        use crate::commands::{
            LsOptions, cmd_config_get, cmd_config_set, cmd_config_show, cmd_courses,
            cmd_create_post, cmd_feature, cmd_ls, cmd_rm,
        };

        match self {
            Commands::Ls {
                resource,
                search,
                filters,
                page,
                page_size,
                json,
            } => {
                cmd_ls(LsOptions {
                    resource,
                    search,
                    filters,
                    page,
                    page_size,
                    json,
                })
                .await
            }

            Commands::Courses { json } => cmd_courses(json).await,

            Commands::Create { action } => match action {
                CreateAction::Post {
                    title,
                    excerpt,
                    status,
                    tags,
                    json,
                } => cmd_create_post(&title, excerpt, status, tags, json).await,
            },

            Commands::Rm { resource, id, json } => cmd_rm(resource, &id, json).await,

            Commands::Feature { resource, id, json } => cmd_feature(resource, &id, json).await,

            Commands::Config { action } => match action {
                ConfigAction::Show { json } => cmd_config_show(json),
                ConfigAction::Set { key, value, json } => cmd_config_set(&key, &value, json),
                ConfigAction::Get { key, json } => cmd_config_get(&key, json),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_resource(s: &str) -> Result<ResourceKind, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid resource. Must be one of: {}",
            VALID_RESOURCES.join(", ")
        )
    })
}

fn parse_featurable(s: &str) -> Result<ResourceKind, String> {
    match parse_resource(s)? {
        kind @ (ResourceKind::Posts | ResourceKind::Projects) => Ok(kind),
        other => Err(format!("{other} cannot be featured. Must be one of: posts, projects")),
    }
}

fn parse_post_status(s: &str) -> Result<PostStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            VALID_POST_STATUSES.join(", ")
        )
    })
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("Invalid filter '{s}'. Expected name=value"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("Invalid filter '{s}'. Filter name cannot be empty"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "folio", &mut io::stdout());
}
