//! Ordered, name-keyed rule storage

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Rule;
use crate::error::PasteError;

/// Rules keyed by name. Iteration order is insertion order and is the match
/// priority.
///
/// Renaming removes the old key and inserts the new one, so a renamed rule
/// drops to the lowest priority. Editing without renaming keeps its place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Rule>", into = "IndexMap<String, Rule>")]
pub struct RuleSet {
    rules: IndexMap<String, Rule>,
}

impl From<IndexMap<String, Rule>> for RuleSet {
    fn from(map: IndexMap<String, Rule>) -> Self {
        let rules = map
            .into_iter()
            .map(|(key, mut rule)| {
                if rule.name != key {
                    warn!("Rule stored under '{}' is named '{}', using the key", key, rule.name);
                    rule.name = key.clone();
                }
                (key, rule)
            })
            .collect();
        Self { rules }
    }
}

impl From<RuleSet> for IndexMap<String, Rule> {
    fn from(set: RuleSet) -> Self {
        set.rules
    }
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, or overwrite the rule with the same name in place
    pub fn insert(&mut self, rule: Rule) -> Option<Rule> {
        self.rules.insert(rule.name.clone(), rule)
    }

    /// Replace the rule stored under `original_name`.
    ///
    /// When the name changes the original key is removed first and the rule is
    /// appended at the end.
    pub fn update(&mut self, original_name: &str, rule: Rule) {
        if rule.name != original_name {
            self.rules.shift_remove(original_name);
        }
        self.insert(rule);
    }

    /// Rename a rule. Returns false if `old` does not exist.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let Some(mut rule) = self.rules.get(old).cloned() else {
            return false;
        };
        rule.name = new.to_string();
        self.update(old, rule);
        true
    }

    /// Delete a rule, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        self.rules.shift_remove(name)
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    /// Rule at a priority position
    pub fn get_index(&self, index: usize) -> Option<&Rule> {
        self.rules.get_index(index).map(|(_, rule)| rule)
    }

    /// Priority position of a rule
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.get_index_of(name)
    }

    /// Rules in priority order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    /// Rule names in priority order
    pub fn names(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compile every pattern, reporting the first rule that fails
    pub fn validate(&self) -> Result<(), PasteError> {
        for rule in self.iter() {
            rule.validate()?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = indexmap::map::Values<'a, String, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> Rule {
        Rule::new(name, "", "folder", "${date}")
    }

    #[test]
    fn test_rename_moves_to_end() {
        let mut set = RuleSet::new();
        set.insert(rule("C"));
        set.insert(rule("A"));

        assert!(set.rename("A", "B"));
        assert_eq!(set.names(), vec!["C", "B"]);
        assert_eq!(set.get("B").unwrap().name, "B");
        assert!(set.get("A").is_none());
    }

    #[test]
    fn test_rename_lowers_priority() {
        let mut set = RuleSet::new();
        set.insert(rule("A"));
        set.insert(rule("C"));

        set.rename("A", "B");
        assert_eq!(set.names(), vec!["C", "B"]);
        assert_eq!(set.position("B"), Some(1));
    }

    #[test]
    fn test_edit_without_rename_keeps_position() {
        let mut set = RuleSet::new();
        set.insert(rule("A"));
        set.insert(rule("B"));

        let mut edited = rule("A");
        edited.pattern = "^x".to_string();
        set.update("A", edited);

        assert_eq!(set.names(), vec!["A", "B"]);
        assert_eq!(set.get("A").unwrap().pattern, "^x");
    }

    #[test]
    fn test_insert_existing_name_overwrites_in_place() {
        let mut set = RuleSet::new();
        set.insert(rule("A"));
        set.insert(rule("B"));

        let previous = set.insert(rule("A").with_template("${content}"));
        assert!(previous.is_some());
        assert_eq!(set.names(), vec!["A", "B"]);
        assert!(set.get("A").unwrap().template.is_some());
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut set = RuleSet::new();
        for name in ["A", "B", "C"] {
            set.insert(rule(name));
        }
        assert!(set.remove("B").is_some());
        assert!(set.remove("missing").is_none());
        assert_eq!(set.names(), vec!["A", "C"]);
    }

    #[test]
    fn test_rename_missing_rule() {
        let mut set = RuleSet::new();
        assert!(!set.rename("nope", "other"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_json_order_round_trips_document_order() {
        let json = r#"{
            "zeta": {"name":"zeta","folder":"z","filenameFormat":"z","pattern":"z"},
            "alpha": {"name":"alpha","folder":"a","filenameFormat":"a","pattern":"a"}
        }"#;
        let set: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.names(), vec!["zeta", "alpha"]);

        let out = serde_json::to_string(&set).unwrap();
        assert!(out.find("zeta").unwrap() < out.find("alpha").unwrap());
    }

    #[test]
    fn test_key_wins_over_inner_name() {
        let json = r#"{"key":{"name":"other","folder":"f","filenameFormat":"x","pattern":""}}"#;
        let set: RuleSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.get("key").unwrap().name, "key");
    }

    #[test]
    fn test_validate_reports_bad_rule() {
        let mut set = RuleSet::new();
        set.insert(rule("ok"));
        let mut bad = rule("bad");
        bad.pattern = "[".to_string();
        set.insert(bad);

        let err = set.validate().unwrap_err();
        assert!(err.to_string().contains("'bad'"));
    }
}
