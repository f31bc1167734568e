use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

const QUANTIFIER_DENSITY_LIMIT: usize = 5;

lazy_static! {
    static ref UNBOUNDED_WILDCARD: Regex = Regex::new(r"\.[*+]").unwrap();
    // `(?:`, `(?=`, `(?<name>` and friends, whose `?` is not a quantifier
    static ref GROUP_PREFIX: Regex = Regex::new(r"\(\?(?:P?<[=!]?|[:=!>])").unwrap();
    static ref NESTED_QUANTIFIERS: Regex = Regex::new(
        r"\([^()]*[*+?][^()]*[*+?][^()]*\)|\([^()]*[*+][^()]*\)[*+{]"
    )
    .unwrap();
    static ref ALTERNATION_WITH_QUANTIFIER: Regex =
        Regex::new(r"\([^()]*\|[^()]*\)[*+?{]").unwrap();
    static ref NESTED_CHARACTER_CLASSES: Regex = Regex::new(r"\[[^\]]*\[").unwrap();
    static ref LOOKAROUND_WITH_QUANTIFIER: Regex = Regex::new(r"\(\?[=!][^)]*[*+]").unwrap();
}

/// A construct in the pattern text that is known to be slow on some inputs.
/// These are heuristics over the source text: they may fire on safe patterns
/// and miss unsafe ones.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PerformanceWarning {
    UnboundedWildcard,
    NestedQuantifiers,
    AlternationWithQuantifier,
    QuantifierDensity,
    UnanchoredUnbounded,
    NestedCharacterClasses,
    LookaroundWithQuantifier,
}

impl PerformanceWarning {
    pub fn message(self) -> &'static str {
        match self {
            PerformanceWarning::UnboundedWildcard => {
                "Unbounded wildcard (.* or .+) can cause excessive backtracking"
            }
            PerformanceWarning::NestedQuantifiers => {
                "Nested quantifiers can cause catastrophic backtracking"
            }
            PerformanceWarning::AlternationWithQuantifier => {
                "Quantified alternation can cause exponential backtracking"
            }
            PerformanceWarning::QuantifierDensity => {
                "Many quantifiers in one pattern can slow down matching"
            }
            PerformanceWarning::UnanchoredUnbounded => {
                "Unanchored pattern with unbounded quantifiers is tried at every position"
            }
            PerformanceWarning::NestedCharacterClasses => {
                "Nested character classes are usually a mistake"
            }
            PerformanceWarning::LookaroundWithQuantifier => {
                "Quantifiers inside lookarounds can be slow"
            }
        }
    }
}

/// Scans the pattern source for risky constructs. Every check runs
/// independently, so any number of warnings may be returned.
pub fn check_performance(pattern: &str) -> Vec<PerformanceWarning> {
    let mut warnings = vec![];

    if UNBOUNDED_WILDCARD.is_match(pattern) {
        warnings.push(PerformanceWarning::UnboundedWildcard);
    }
    if NESTED_QUANTIFIERS.is_match(&GROUP_PREFIX.replace_all(pattern, "(")) {
        warnings.push(PerformanceWarning::NestedQuantifiers);
    }
    if ALTERNATION_WITH_QUANTIFIER.is_match(pattern) {
        warnings.push(PerformanceWarning::AlternationWithQuantifier);
    }
    let quantifiers = pattern.chars().filter(|c| is_quantifier(*c)).count();
    if quantifiers > QUANTIFIER_DENSITY_LIMIT {
        warnings.push(PerformanceWarning::QuantifierDensity);
    }
    let unbounded = pattern.contains('*') || pattern.contains('+');
    if unbounded && !pattern.starts_with('^') && !pattern.ends_with('$') {
        warnings.push(PerformanceWarning::UnanchoredUnbounded);
    }
    if NESTED_CHARACTER_CLASSES.is_match(pattern) {
        warnings.push(PerformanceWarning::NestedCharacterClasses);
    }
    if LOOKAROUND_WITH_QUANTIFIER.is_match(pattern) {
        warnings.push(PerformanceWarning::LookaroundWithQuantifier);
    }

    warnings
}

/// Same as [check_performance], as display strings.
pub fn performance_warning_messages(pattern: &str) -> Vec<String> {
    check_performance(pattern)
        .into_iter()
        .map(|warning| warning.message().to_string())
        .collect()
}

fn is_quantifier(c: char) -> bool {
    matches!(c, '*' | '+' | '?' | '{')
}
