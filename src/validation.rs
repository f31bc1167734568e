use crate::config::DEFAULT_BACKTRACK_LIMIT;
use crate::error::TesterError;
use crate::flags::{flags_to_string, FlagSet};
use fancy_regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// Bounds the size of the compiled automata the engine delegates to.
const REGEX_COMPLEXITY_LIMIT: usize = 10 * (1 << 20);

/// Outcome of [validate_pattern].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A pattern that compiled with a given flag set. This can only be created by
/// [compile_pattern], so holding one means validation already passed.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    regex: Arc<Regex>,
    flags: FlagSet,
    flags_string: String,
    group_names: Arc<Vec<Option<String>>>,
}

impl CompiledPattern {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn shared_regex(&self) -> Arc<Regex> {
        Arc::clone(&self.regex)
    }

    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    pub fn flags_string(&self) -> &str {
        &self.flags_string
    }

    /// Names of every capture slot, slot 0 (the whole match) included.
    pub fn group_names(&self) -> &[Option<String>] {
        &self.group_names
    }

    pub(crate) fn shared_group_names(&self) -> Arc<Vec<Option<String>>> {
        Arc::clone(&self.group_names)
    }
}

/// Checks that `pattern` compiles with `flags`, without running it.
pub fn validate_pattern(pattern: &str, flags: &FlagSet) -> ValidationResult {
    // This is the same as `compile_pattern`, but drops the compiled regex
    match compile_pattern(pattern, flags, DEFAULT_BACKTRACK_LIMIT) {
        Ok(_) => ValidationResult {
            is_valid: true,
            error: None,
        },
        Err(err) => ValidationResult {
            is_valid: false,
            error: Some(err.to_string()),
        },
    }
}

pub fn compile_pattern(
    pattern: &str,
    flags: &FlagSet,
    backtrack_limit: usize,
) -> Result<CompiledPattern, TesterError> {
    if pattern.trim().is_empty() {
        return Err(TesterError::EmptyPattern);
    }
    if flags.unicode && flags.unicode_sets {
        return Err(TesterError::Compile(
            "Invalid flags: 'u' and 'v' cannot be combined".to_string(),
        ));
    }

    let prefix = inline_flag_prefix(flags);
    let source = format!("{}{}", prefix, pattern);
    let regex = RegexBuilder::new(&source)
        .backtrack_limit(backtrack_limit)
        .delegate_size_limit(REGEX_COMPLEXITY_LIMIT)
        .build()
        .map_err(|err| TesterError::Compile(compile_error_message(err, prefix.len())))?;

    let group_names = regex
        .capture_names()
        .map(|name| name.map(str::to_string))
        .collect();

    Ok(CompiledPattern {
        regex: Arc::new(regex),
        flags: *flags,
        flags_string: flags_to_string(flags),
        group_names: Arc::new(group_names),
    })
}

/// Parse positions are reported against the pattern the user typed, not the
/// flag-prefixed source.
fn compile_error_message(err: fancy_regex::Error, prefix_len: usize) -> String {
    match err {
        fancy_regex::Error::ParseError(position, kind) => {
            fancy_regex::Error::ParseError(position.saturating_sub(prefix_len), kind).to_string()
        }
        other => other.to_string(),
    }
}

/// `i`, `m` and `s` change how the engine parses the pattern, so they are
/// passed as an inline group. The rest are handled by the executor.
fn inline_flag_prefix(flags: &FlagSet) -> String {
    let mut inline = String::new();
    if flags.case_insensitive {
        inline.push('i');
    }
    if flags.multiline {
        inline.push('m');
    }
    if flags.dot_all {
        inline.push('s');
    }
    if inline.is_empty() {
        inline
    } else {
        format!("(?{inline})")
    }
}
