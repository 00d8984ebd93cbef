//! Target folder and file name resolution

use super::PasteContext;
use crate::datetime;
use crate::rules::template::{Variable, substitute};
use crate::rules::Rule;

/// Prefix marking a folder template as relative to the active note
pub const RELATIVE_PREFIX: &str = "./";

/// Resolves a rule's folder and file name templates against a paste context
pub struct PathResolver<'a> {
    datetime_format: &'a str,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver formatting `${date}` with a moment-style format
    pub fn new(datetime_format: &'a str) -> Self {
        Self { datetime_format }
    }

    /// Base name of the note to create
    pub fn file_name(&self, rule: &Rule, context: &PasteContext) -> String {
        let date = datetime::format(&context.now, self.datetime_format);
        substitute(
            &rule.filename_format,
            &[
                (Variable::NoteName, context.note_name.as_str()),
                (Variable::Date, date.as_str()),
            ],
        )
    }

    /// Vault-relative folder of the note to create.
    ///
    /// The relative check looks at the template as written, not at the
    /// substituted value: a note name starting with `./` never makes an
    /// absolute folder relative.
    pub fn folder(&self, rule: &Rule, context: &PasteContext) -> String {
        let substituted = substitute(
            &rule.folder,
            &[(Variable::NoteName, context.note_name.as_str())],
        );

        if rule.folder.starts_with(RELATIVE_PREFIX) {
            let relative = substituted
                .strip_prefix(RELATIVE_PREFIX)
                .unwrap_or(&substituted);
            normalize(&join(&context.active_folder, relative))
        } else {
            normalize(&substituted)
        }
    }
}

/// Join two vault-relative paths with `/`
pub fn join(base: &str, path: &str) -> String {
    match (base.is_empty(), path.is_empty()) {
        (true, _) => path.to_string(),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base.trim_end_matches('/'), path),
    }
}

/// Normalize a vault-relative path.
///
/// Backslashes become `/`, empty and `.` segments are dropped and `..` pops
/// the previous segment. `..` at the vault root is dropped. The vault root
/// itself is the empty string.
pub fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}
