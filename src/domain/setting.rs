use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{Entity, Resource};
use crate::filter::{FilterPipeline, field};

use super::Preset;

/// A site setting. `value` is arbitrary JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub public: bool,
}

impl Setting {
    /// Compact text form of the value; strings are shown without quotes.
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl Entity for Setting {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Resource for Setting {
    type Draft = SettingDraft;
    const PATH: &'static str = "settings";
    const COLLECTION_KEY: &'static str = "settings";
    const ENTITY_KEY: &'static str = "setting";
}

impl Preset for Setting {
    fn pipeline() -> FilterPipeline<Self> {
        FilterPipeline::new()
            .with_search(
                "search",
                [
                    field(|s: &Setting| Some(s.key.as_str())),
                    field(|s: &Setting| s.description.as_deref()),
                ],
            )
            .with_choice("category", |s: &Setting| s.category.as_deref())
            .with_flag("public", |s: &Setting| s.public)
            .sorted_by(|a: &Setting, b: &Setting| a.key.cmp(&b.key))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingDraft {
    pub key: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_text() {
        let mut setting: Setting =
            serde_json::from_value(json!({ "id": "1", "key": "site.title", "value": "Folio" }))
                .unwrap();
        assert_eq!(setting.value_text(), "Folio");
        setting.value = json!({ "dark": true });
        assert_eq!(setting.value_text(), r#"{"dark":true}"#);
        setting.value = Value::Null;
        assert_eq!(setting.value_text(), "");
    }

    #[test]
    fn test_preset_sorts_by_key_and_filters_category() {
        let settings: Vec<Setting> = serde_json::from_value(json!([
            { "id": "1", "key": "social.github", "category": "social", "public": true },
            { "id": "2", "key": "seo.title", "category": "seo", "public": true },
            { "id": "3", "key": "social.email", "category": "Social" }
        ]))
        .unwrap();
        let mut pipeline = Setting::pipeline();
        pipeline.set_from_str("category", "social").unwrap();
        let keys: Vec<&str> = pipeline.apply(&settings).iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["social.email", "social.github"]);
    }
}
