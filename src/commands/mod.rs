mod config;
mod courses;
mod ls;
mod mutate;

pub use config::{cmd_config_get, cmd_config_set, cmd_config_show};
pub use courses::cmd_courses;
pub use ls::{LsOptions, cmd_ls};
pub use mutate::{cmd_create_post, cmd_feature, cmd_rm};

use std::sync::Arc;

use serde_json::Value;

use crate::api::HttpTransport;
use crate::config::Config;
use crate::error::Result;

/// Output of a command: a JSON document plus an optional human-readable form.
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when `as_json` is set, otherwise the text form (falling back
    /// to JSON when there is none).
    pub fn print(self, as_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !as_json => println!("{text}"),
            _ => print_json(&self.json)?,
        }
        Ok(())
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// HTTP transport for the configured API.
pub(crate) fn connect(config: &Config) -> Result<Arc<HttpTransport>> {
    let transport = HttpTransport::new(&config.api_base_url(), config.api_timeout())?;
    Ok(Arc::new(transport))
}
