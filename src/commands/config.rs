//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Read one value
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::config::{API_URL_ENV, Config};
use crate::error::{FolioError, Result};

/// Reject underscore spellings of dotted keys, suggesting the dotted form.
fn validate_config_key(key: &str) -> Result<&str> {
    if !key.contains('.')
        && let Some(pos) = key.find('_')
    {
        let dotted = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return Err(FolioError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dotted}'"
        )));
    }
    Ok(key)
}

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let base_url = config.api_base_url();
    let overridden = base_url != config.api.base_url;

    let json_output = json!({
        "api": {
            "base_url": base_url,
            "base_url_from_env": overridden,
            "prefix": config.api.prefix,
            "timeout_secs": config.api.timeout_secs,
        },
        "search": {
            "debounce_ms": config.search.debounce_ms,
        },
        "pages": config.pages,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text = String::new();
    text.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text.push_str(&format!("{}:\n", "api".cyan()));
    text.push_str(&format!("  base_url: {base_url}"));
    if overridden {
        text.push_str(&format!(" {}", format!("(from {API_URL_ENV})").dimmed()));
    }
    text.push('\n');
    text.push_str(&format!("  prefix: {}\n", config.api.prefix));
    text.push_str(&format!("  timeout_secs: {}\n\n", config.api.timeout_secs));

    text.push_str(&format!("{}:\n", "search".cyan()));
    text.push_str(&format!("  debounce_ms: {}\n\n", config.search.debounce_ms));

    if config.pages.is_empty() {
        text.push_str(&format!(
            "{}: {}\n",
            "pages".cyan(),
            "defaults".dimmed()
        ));
    } else {
        text.push_str(&format!("{}:\n", "pages".cyan()));
        for (resource, size) in &config.pages {
            text.push_str(&format!("  {resource}: {size}\n"));
        }
    }

    text.push_str(&format!(
        "\n{}: {}",
        "Config file".dimmed(),
        Config::config_path().display()
    ));

    CommandOutput::new(json_output).with_text(text).print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let key = validate_config_key(key)?;
    let mut config = Config::load()?;
    let previous = config.get(key)?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?.unwrap_or_default();

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "previous_value": previous,
        "success": true,
    }))
    .with_text(format!("Set {} = {}", key.cyan(), stored))
    .print(output_json)
}

/// Get a configuration value
pub fn cmd_config_get(key: &str, output_json: bool) -> Result<()> {
    let key = validate_config_key(key)?;
    let config = Config::load()?;
    let value = config.get(key)?;

    let text = match &value {
        Some(value) => value.clone(),
        None => "not set".dimmed().to_string(),
    };
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(text)
        .print(output_json)
}
