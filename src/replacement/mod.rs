use crate::error::TesterError;
use crate::parser::template::{template_token, TemplateToken};
use crate::validation::CompiledPattern;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

pub mod diff;

/// `group_index` value of a reference made by name.
pub const NAMED_REFERENCE_INDEX: i64 = -1;

/// One group reference found in a replacement template.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BackreferenceInfo {
    /// The token exactly as written, e.g. `$1` or `${year}`.
    pub token: String,
    /// The referenced group number, or [NAMED_REFERENCE_INDEX] for named references.
    pub group_index: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Character offset of the token in the template.
    pub position: usize,
    pub description: String,
}

/// Lists the group references of a replacement template, in order. `$$` is an
/// escaped dollar sign and is not reported.
pub fn analyze_backreferences(template: &str) -> Vec<BackreferenceInfo> {
    let mut references = vec![];
    let mut rest = template;
    let mut position = 0;

    while let Some(dollar) = rest.find('$') {
        position += rest[..dollar].chars().count();
        rest = &rest[dollar..];

        match template_token(rest) {
            Ok((remaining, (token, text))) => {
                if let Some(reference) = describe_token(token, text, position) {
                    references.push(reference);
                }
                position += text.chars().count();
                rest = remaining;
            }
            Err(_) => {
                position += 1;
                rest = &rest[1..];
            }
        }
    }
    references
}

fn describe_token(token: TemplateToken, text: &str, position: usize) -> Option<BackreferenceInfo> {
    let (group_index, name, description) = match token {
        TemplateToken::Dollar => return None,
        TemplateToken::Numbered(0) => (0, None, "Entire match".to_string()),
        TemplateToken::Numbered(index) => (index as i64, None, format!("Capture group {index}")),
        TemplateToken::Named(name) => (
            NAMED_REFERENCE_INDEX,
            Some(name.to_string()),
            format!("Named capture group '{name}'"),
        ),
    };
    Some(BackreferenceInfo {
        token: text.to_string(),
        group_index,
        name,
        position,
        description,
    })
}

/// Substitutes the template into `text` using the engine. Only the first match
/// is replaced unless the pattern is global.
pub fn apply_replacement(
    compiled: &CompiledPattern,
    text: &str,
    template: &str,
) -> Result<String, TesterError> {
    let limit = if compiled.flags().global { 0 } else { 1 };
    compiled
        .regex()
        .try_replacen(text, limit, template)
        .map(Cow::into_owned)
        .map_err(|err| TesterError::Replacement(err.to_string()))
}
