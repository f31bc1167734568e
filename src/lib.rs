// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod codegen;
mod config;
mod decoration;
mod error;
mod executor;
mod explain;
mod export;
mod flags;
mod heuristics;
mod observability;
mod parser;
mod replacement;
mod str_utils;
mod test_cases;
mod tester;
mod validation;

// This is the public API of the regex tester core library
pub use codegen::{generate_code, CodeLanguage};
pub use config::{
    DiffConfig, DisplayOptions, TesterConfig, DEFAULT_BACKTRACK_LIMIT, DEFAULT_MAX_INPUT_CHARS,
    DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_MATCHES, DEFAULT_TIMEOUT_MS,
};
pub use decoration::{
    group_decorations, match_decorations, offset_to_position, Decoration, Position, Range,
    MATCH_STYLE_CLASS,
};
pub use error::{ErrorKind, TesterError};
pub use executor::{find_matches, MatchExecutor, MatchOutcome, MatchRecord, NamedGroups};
pub use explain::{explain_regex, PatternComponent, PatternExplanation};
pub use export::{
    export_matches_to_csv, export_matches_to_json, export_matches_to_text, export_matches_to_xml,
    import_matches_from_json, ExportedMatch, MatchExport,
};
pub use flags::{flags_to_string, Flag, FlagSet};
pub use heuristics::{check_performance, performance_warning_messages, PerformanceWarning};
pub use observability::labels::Labels;
pub use parser::capture_groups::{parse_capture_groups, CaptureGroupInfo};
pub use parser::lexer::PatternLexer;
pub use replacement::diff::{generate_replacement_diff, DiffKind, DiffSpan};
pub use replacement::{
    analyze_backreferences, apply_replacement, BackreferenceInfo, NAMED_REFERENCE_INDEX,
};
pub use test_cases::{InMemoryTestCaseStore, NewTestCase, TestCase, TestCaseError, TestCaseStore};
pub use tester::{test_regex, RegexTester, TestRequest, TestResult};
pub use validation::{compile_pattern, validate_pattern, CompiledPattern, ValidationResult};
