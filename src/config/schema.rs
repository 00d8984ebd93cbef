//! Configuration schema

use crate::datetime::DEFAULT_FORMAT;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};

/// Persisted configuration: the rule set and the `${date}` format.
///
/// Missing keys fall back to their defaults, so a partial file is merged
/// over the defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Rules keyed by name, in priority order
    #[serde(default)]
    pub user_rules: RuleSet,

    /// Moment-style format for `${date}`
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_rules: RuleSet::default(),
            datetime_format: default_datetime_format(),
        }
    }
}

fn default_datetime_format() -> String {
    DEFAULT_FORMAT.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert!(config.user_rules.is_empty());
        assert_eq!(config.datetime_format, "YYYYMMDD-HHmmss");
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "userRules": {
                "json": {
                    "name": "json",
                    "desc": "JSON payloads",
                    "folder": "./plots",
                    "filenameFormat": "${date}",
                    "pattern": "^\\{",
                    "template": "```json\n${content}\n```"
                },
                "urls": {
                    "name": "urls",
                    "folder": "Links",
                    "filenameFormat": "${notename}-${date}",
                    "pattern": "^https?://"
                }
            },
            "datetimeFormat": "YYYYMMDD"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.datetime_format, "YYYYMMDD");
        assert_eq!(config.user_rules.names(), vec!["json", "urls"]);

        let json_rule = config.user_rules.get("json").unwrap();
        assert_eq!(json_rule.pattern, "^\\{");
        assert_eq!(json_rule.template.as_deref(), Some("```json\n${content}\n```"));
        assert!(config.user_rules.get("urls").unwrap().template.is_none());
    }

    #[test]
    fn test_serialized_keys() {
        let config = Config::default();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, serde_json::json!({"userRules": {}, "datetimeFormat": "YYYYMMDD-HHmmss"}));
    }
}
