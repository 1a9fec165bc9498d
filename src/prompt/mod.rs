//! Prompt assembly: fills the commit-message template with repository state.

use crate::repo_info::RepoInfo;

/// The built-in commit-message template.
const EMBEDDED_TEMPLATE: &str = include_str!("commit_message.md");

/// Placeholder names recognized in a template, written as `{name}`.
pub const PLACEHOLDERS: [&str; 5] =
    ["readme_content", "git_ls_files", "git_diff", "message", "description"];

/// A prompt template, loaded once and passed to [`assemble`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    /// The template shipped with the binary.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_source(EMBEDDED_TEMPLATE)
    }

    /// A template from arbitrary text.
    #[must_use]
    pub fn from_source(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    /// The raw template text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::embedded()
    }
}

/// Builds the prompt for `info` and an optional free-text `description`.
///
/// Substitution is a single left-to-right pass: text coming from the
/// repository is never scanned for placeholders, and braces that do not
/// form a known placeholder are copied as-is.
#[must_use]
pub fn assemble(template: &PromptTemplate, info: &RepoInfo, description: &str) -> String {
    let description = description.trim();
    let mut out = String::with_capacity(template.source.len() + info.diff.len());
    let mut rest = template.source.as_str();
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let placeholder = after.find('}').and_then(|close| {
            field(info, description, &after[..close]).map(|value| (value, close))
        });
        match placeholder {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn field<'a>(info: &'a RepoInfo, description: &'a str, name: &str) -> Option<&'a str> {
    match name {
        "readme_content" => Some(&info.readme_content),
        "git_ls_files" => Some(&info.file_list),
        "git_diff" => Some(&info.diff),
        "message" => Some(&info.message),
        "description" => Some(description),
        _ => None,
    }
}
