use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("failed to load {resource}: {message}")]
    Fetch { resource: String, message: String },

    #[error("failed to {operation} {resource}: {message}")]
    Mutation {
        resource: String,
        operation: &'static str,
        message: String,
    },

    #[error("unexpected response shape from {resource}: {detail}")]
    ShapeMismatch { resource: String, detail: String },

    #[error("API error: {message}")]
    Api { status: Option<u16>, message: String },

    #[error("'{0}' not found")]
    NotFound(String),

    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("filter '{name}' expects a {expected} value")]
    FilterKindMismatch { name: String, expected: &'static str },

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl FolioError {
    /// Wrap a transport-level error as a failed load of `resource`.
    pub fn into_fetch(self, resource: &str) -> Self {
        match self {
            err @ (FolioError::Fetch { .. } | FolioError::ShapeMismatch { .. }) => err,
            other => FolioError::Fetch {
                resource: resource.to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Wrap a transport-level error as a failed mutation of `resource`.
    pub fn into_mutation(self, resource: &str, operation: &'static str) -> Self {
        match self {
            err @ FolioError::Mutation { .. } => err,
            other => FolioError::Mutation {
                resource: resource.to_string(),
                operation,
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
