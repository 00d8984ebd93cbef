//! `${name}` template substitution
//!
//! The vocabulary is fixed: `${content}`, `${notename}` and `${date}`.
//! Each call replaces only the first occurrence of every supplied variable;
//! a repeated token keeps its later occurrences verbatim. Unknown tokens are
//! never touched and there is no escape syntax.

/// Variables a template may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// The pasted text
    Content,
    /// Base name of the active note
    NoteName,
    /// Current date/time in the configured format
    Date,
}

impl Variable {
    /// Name used inside `${...}`
    pub fn name(self) -> &'static str {
        match self {
            Variable::Content => "content",
            Variable::NoteName => "notename",
            Variable::Date => "date",
        }
    }

    /// The literal token, e.g. `${date}`
    pub fn token(self) -> String {
        format!("${{{}}}", self.name())
    }
}

/// Substitute variables into `template`, in the order given.
pub fn substitute(template: &str, values: &[(Variable, &str)]) -> String {
    let mut result = template.to_string();
    for (variable, value) in values {
        result = result.replacen(&variable.token(), value, 1);
    }
    result
}
