//! Paste decision engine - match, template, resolve

use tracing::debug;

use super::{Decision, PasteContext, PastePlan, PathResolver, embed_marker};
use crate::error::PasteError;
use crate::rules::template::{Variable, substitute};
use crate::rules::{RuleMatcher, RuleSet};

/// Decides, for one paste, whether the text goes into a new note.
///
/// A decision is a single linear pass: the first matching rule is used and
/// no other candidate is tried afterwards.
pub struct PasteEngine<'a> {
    rules: &'a RuleSet,
    datetime_format: &'a str,
}

impl<'a> PasteEngine<'a> {
    /// Create an engine over a rule set and a moment-style datetime format
    pub fn new(rules: &'a RuleSet, datetime_format: &'a str) -> Self {
        Self {
            rules,
            datetime_format,
        }
    }

    /// Produce a plan for `text`, or [`Decision::NoMatch`].
    ///
    /// Fails fast with [`PasteError::NoActiveDocument`] when there is no
    /// context, before any rule is evaluated.
    pub fn decide(&self, text: &str, context: Option<&PasteContext>) -> Result<Decision, PasteError> {
        let context = context.ok_or(PasteError::NoActiveDocument)?;

        let Some(rule) = RuleMatcher::new(self.rules).find(text)? else {
            debug!("No rule matched, leaving paste to the default behavior");
            return Ok(Decision::NoMatch);
        };

        let content = match rule.effective_template() {
            Some(template) => substitute(template, &[(Variable::Content, text)]),
            None => text.to_string(),
        };

        let resolver = PathResolver::new(self.datetime_format);
        let folder = resolver.folder(rule, context);
        let base_name = resolver.file_name(rule, context);
        debug!(
            "Rule '{}' resolved to folder '{}' and note '{}'",
            rule.name, folder, base_name
        );

        Ok(Decision::Plan(PastePlan {
            rule: rule.name.clone(),
            embed: embed_marker(&base_name),
            folder,
            base_name,
            content,
        }))
    }
}
