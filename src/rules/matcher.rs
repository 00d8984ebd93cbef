//! First-match rule selection

use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, trace};

use super::{Rule, RuleSet};
use crate::error::PasteError;

// Thread-local cache of compiled patterns.
// Capped at 256 entries; cleared entirely when the cap is exceeded.
const CACHE_MAX_ENTRIES: usize = 256;

std::thread_local! {
    static REGEX_CACHE: std::cell::RefCell<HashMap<String, Regex>> = std::cell::RefCell::new(HashMap::new());
}

/// Compile a rule's pattern, reusing a cached regex when possible
pub(crate) fn compile(rule: &Rule) -> Result<Regex, PasteError> {
    REGEX_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(r) = cache.get(&rule.pattern) {
            return Ok(r.clone());
        }
        if cache.len() >= CACHE_MAX_ENTRIES {
            cache.clear();
        }
        let r = Regex::new(&rule.pattern).map_err(|source| PasteError::InvalidRulePattern {
            rule: rule.name.clone(),
            source,
        })?;
        cache.insert(rule.pattern.clone(), r.clone());
        Ok(r)
    })
}

/// Selects the first rule, in priority order, whose pattern matches a text
pub struct RuleMatcher<'a> {
    rules: &'a RuleSet,
}

impl<'a> RuleMatcher<'a> {
    /// Create a matcher over the given rule set
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Return the first matching rule.
    ///
    /// An invalid pattern aborts the scan instead of being skipped, so a later
    /// and less specific rule can never match in its place.
    pub fn find(&self, text: &str) -> Result<Option<&'a Rule>, PasteError> {
        for rule in self.rules.iter() {
            let regex = compile(rule)?;
            if regex.is_match(text) {
                debug!("Rule '{}' matched pasted text", rule.name);
                return Ok(Some(rule));
            }
            trace!("Rule '{}' did not match", rule.name);
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(defs: &[(&str, &str)]) -> RuleSet {
        let mut set = RuleSet::new();
        for (name, pattern) in defs {
            set.insert(Rule::new(*name, *pattern, "f", "x"));
        }
        set
    }

    #[test]
    fn test_first_match_wins() {
        let set = rules(&[("digits", r"^\d+$"), ("any", ""), ("json", r"^\{")]);
        let matcher = RuleMatcher::new(&set);

        assert_eq!(matcher.find("123").unwrap().unwrap().name, "digits");
        assert_eq!(matcher.find("{}").unwrap().unwrap().name, "any");
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let set = rules(&[("any", "")]);
        let matcher = RuleMatcher::new(&set);

        assert!(matcher.find("").unwrap().is_some());
        assert!(matcher.find("hello\nworld").unwrap().is_some());
    }

    #[test]
    fn test_no_match_and_empty_set() {
        let set = rules(&[("json", r"^\{")]);
        assert!(RuleMatcher::new(&set).find("plain").unwrap().is_none());

        let empty = RuleSet::new();
        assert!(RuleMatcher::new(&empty).find("anything").unwrap().is_none());
    }

    #[test]
    fn test_invalid_pattern_is_fatal() {
        let set = rules(&[("broken", "("), ("any", "")]);
        let err = RuleMatcher::new(&set).find("text").unwrap_err();
        assert!(matches!(err, PasteError::InvalidRulePattern { ref rule, .. } if rule == "broken"));
    }

    #[test]
    fn test_invalid_pattern_after_match_is_not_reached() {
        let set = rules(&[("any", ""), ("broken", "(")]);
        assert_eq!(RuleMatcher::new(&set).find("t").unwrap().unwrap().name, "any");
    }
}
