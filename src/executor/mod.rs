use crate::config::TesterConfig;
use crate::error::TesterError;
use crate::flags::FlagSet;
use crate::str_utils::{get_next_char_index, CharIndexer};
use crate::validation::{compile_pattern, CompiledPattern};
use fancy_regex::{Captures, Regex, RuntimeError};
use log::{debug, warn};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

mod record;

pub use record::{MatchRecord, NamedGroups};

/// Matches found by one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    pub matches: Vec<MatchRecord>,
    /// Whether matches past `max_matches` were dropped.
    pub truncated: bool,
    /// Matches the engine produced, including the dropped ones.
    pub total_found: usize,
}

/// Runs compiled patterns against test strings within the limits of a
/// [TesterConfig].
pub struct MatchExecutor {
    config: TesterConfig,
}

impl MatchExecutor {
    pub fn new(config: TesterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesterConfig {
        &self.config
    }

    pub fn execute(
        &self,
        compiled: &CompiledPattern,
        text: &str,
    ) -> Result<MatchOutcome, TesterError> {
        let length = text.chars().count();
        if length > self.config.max_input_chars {
            return Err(TesterError::InputTooLarge {
                length,
                limit: self.config.max_input_chars,
            });
        }

        let deadline = Instant::now() + self.config.timeout;
        if compiled.flags().global {
            self.execute_global(compiled, text, deadline)
        } else {
            self.execute_single(compiled, text, deadline)
        }
    }

    /// Finds every match. The deadline is checked between searches, each
    /// search is bounded by the engine's backtrack limit.
    fn execute_global(
        &self,
        compiled: &CompiledPattern,
        text: &str,
        deadline: Instant,
    ) -> Result<MatchOutcome, TesterError> {
        let regex = compiled.regex();
        let sticky = compiled.flags().sticky;
        let mut indexer = CharIndexer::new(text);
        let mut outcome = MatchOutcome::default();
        let mut cursor = 0;

        loop {
            if Instant::now() >= deadline {
                warn!("match deadline exceeded after {} matches", outcome.total_found);
                return Err(TesterError::Timeout(self.config.timeout_ms()));
            }

            let captures = match regex
                .captures_from_pos(text, cursor)
                .map_err(|err| self.execution_error(err))?
            {
                Some(captures) => captures,
                None => break,
            };
            let Some(whole) = captures.get(0) else {
                break;
            };
            if sticky && whole.start() != cursor {
                break;
            }

            outcome.total_found += 1;
            if outcome.total_found > self.config.max_iterations {
                warn!(
                    "pattern exceeded {} iterations, discarding matches",
                    self.config.max_iterations
                );
                return Err(TesterError::TooManyIterations(self.config.max_iterations));
            }

            if outcome.matches.len() < self.config.max_matches {
                outcome.matches.push(build_record(
                    &captures,
                    compiled.group_names(),
                    &mut indexer,
                ));
            } else {
                outcome.truncated = true;
            }

            cursor = whole.end();
            if whole.start() == whole.end() {
                // empty match, step over one character
                match get_next_char_index(text, cursor) {
                    Some(next) => cursor = next,
                    None => break,
                }
            }
        }

        if outcome.truncated {
            debug!(
                "kept {} of {} matches",
                outcome.matches.len(),
                outcome.total_found
            );
        }
        Ok(outcome)
    }

    /// Finds the first match. A single engine call cannot be interrupted, so it
    /// runs on a worker thread and we stop waiting for it at the deadline.
    fn execute_single(
        &self,
        compiled: &CompiledPattern,
        text: &str,
        deadline: Instant,
    ) -> Result<MatchOutcome, TesterError> {
        let regex = compiled.shared_regex();
        let group_names = compiled.shared_group_names();
        let sticky = compiled.flags().sticky;
        let timeout_ms = self.config.timeout_ms();
        let content: Arc<str> = Arc::from(text);

        let (sender, receiver) = mpsc::channel();
        thread::Builder::new()
            .name("regex-tester-match".to_string())
            .spawn(move || {
                let result = find_first(&regex, &content, &group_names, sticky, timeout_ms);
                // the receiver is gone if the caller already timed out
                let _ = sender.send(result);
            })
            .map_err(|err| TesterError::Execution(err.to_string()))?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        match receiver.recv_timeout(remaining) {
            Ok(result) => result.map(|record| {
                let total_found = usize::from(record.is_some());
                MatchOutcome {
                    matches: record.into_iter().collect(),
                    truncated: false,
                    total_found,
                }
            }),
            Err(RecvTimeoutError::Timeout) => {
                warn!("single match did not finish within {timeout_ms}ms");
                Err(TesterError::Timeout(timeout_ms))
            }
            Err(RecvTimeoutError::Disconnected) => Err(TesterError::Execution(
                "match worker exited without a result".to_string(),
            )),
        }
    }

    fn execution_error(&self, err: fancy_regex::Error) -> TesterError {
        map_execution_error(err, self.config.timeout_ms())
    }
}

fn find_first(
    regex: &Regex,
    text: &str,
    group_names: &[Option<String>],
    sticky: bool,
    timeout_ms: u64,
) -> Result<Option<MatchRecord>, TesterError> {
    let captures = regex
        .captures(text)
        .map_err(|err| map_execution_error(err, timeout_ms))?;
    let Some(captures) = captures else {
        return Ok(None);
    };
    match captures.get(0) {
        Some(whole) if !sticky || whole.start() == 0 => Ok(Some(build_record(
            &captures,
            group_names,
            &mut CharIndexer::new(text),
        ))),
        _ => Ok(None),
    }
}

fn map_execution_error(err: fancy_regex::Error, timeout_ms: u64) -> TesterError {
    match err {
        fancy_regex::Error::RuntimeError(RuntimeError::BacktrackLimitExceeded) => {
            TesterError::Timeout(timeout_ms)
        }
        other => TesterError::Execution(other.to_string()),
    }
}

fn build_record(
    captures: &Captures,
    group_names: &[Option<String>],
    indexer: &mut CharIndexer,
) -> MatchRecord {
    let (text, start) = captures
        .get(0)
        .map(|whole| (whole.as_str().to_string(), whole.start()))
        .unwrap_or_default();

    let numbered_groups = (1..captures.len())
        .map(|i| captures.get(i).map(|group| group.as_str().to_string()))
        .collect();

    let mut named_groups = NamedGroups::new();
    for (i, name) in group_names.iter().enumerate() {
        if let Some(name) = name {
            named_groups.insert(
                name.clone(),
                captures.get(i).map(|group| group.as_str().to_string()),
            );
        }
    }

    MatchRecord {
        full_match: text.clone(),
        text,
        index: indexer.char_index(start),
        numbered_groups,
        named_groups,
    }
}

/// Validates `pattern` and runs it. The executor never trusts that the caller
/// validated first.
pub fn find_matches(
    pattern: &str,
    flags: &FlagSet,
    text: &str,
    config: &TesterConfig,
) -> Result<MatchOutcome, TesterError> {
    let compiled = compile_pattern(pattern, flags, config.backtrack_limit)?;
    MatchExecutor::new(config.clone()).execute(&compiled, text)
}

#[cfg(test)]
mod test {
    use super::{find_matches, MatchExecutor};
    use crate::config::TesterConfig;
    use crate::error::TesterError;
    use crate::flags::FlagSet;
    use crate::validation::compile_pattern;
    use std::time::{Duration, Instant};

    fn global() -> FlagSet {
        FlagSet {
            global: true,
            ..FlagSet::default()
        }
    }

    fn run(pattern: &str, flags: FlagSet, text: &str) -> Result<super::MatchOutcome, TesterError> {
        find_matches(pattern, &flags, text, &TesterConfig::default())
    }

    #[test]
    fn finds_all_matches_in_global_mode() {
        let outcome = run(
            r"\b\w+@\w+\.\w+\b",
            global(),
            "Contact a@b.com or c@d.org",
        )
        .unwrap();
        assert_eq!(outcome.matches.len(), 2);
        assert_eq!(outcome.matches[0].text, "a@b.com");
        assert_eq!(outcome.matches[0].index, 8);
        assert_eq!(outcome.matches[1].text, "c@d.org");
        assert_eq!(outcome.matches[1].index, 19);
        assert_eq!(outcome.matches[1].full_match, "c@d.org");
    }

    #[test]
    fn single_mode_returns_first_match_only() {
        let outcome = run(r"\d+", FlagSet::default(), "a 12 b 345").unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].text, "12");
        assert_eq!(outcome.matches[0].index, 2);

        let outcome = run(r"\d+", FlagSet::default(), "no digits").unwrap();
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.total_found, 0);
    }

    #[test]
    fn zero_length_matches_terminate() {
        let outcome = run("a*", global(), "bbb").unwrap();
        assert_eq!(outcome.matches.len(), 4);
        assert!(outcome.matches.iter().all(|m| m.text.is_empty()));
        let indices: Vec<usize> = outcome.matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn zero_length_matches_step_over_multibyte_characters() {
        let outcome = run("x*", global(), "éü").unwrap();
        let indices: Vec<usize> = outcome.matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn iteration_cap_fails_closed() {
        let text = "a".repeat(10_001);
        assert_eq!(
            run("a", global(), &text),
            Err(TesterError::TooManyIterations(10_000))
        );
    }

    #[test]
    fn exactly_at_iteration_cap_is_fine() {
        let text = "a".repeat(10_000);
        let outcome = run("a", global(), &text).unwrap();
        assert_eq!(outcome.matches.len(), 1_000);
        assert_eq!(outcome.total_found, 10_000);
    }

    #[test]
    fn result_cap_truncates() {
        let text = "a".repeat(1_500);
        let outcome = run("a", global(), &text).unwrap();
        assert_eq!(outcome.matches.len(), 1_000);
        assert!(outcome.truncated);
        assert_eq!(outcome.total_found, 1_500);
    }

    #[test]
    fn oversized_input_is_rejected_up_front() {
        let text = "a".repeat(100_001);
        let start = Instant::now();
        assert_eq!(
            run("(a+)+$", global(), &text),
            Err(TesterError::InputTooLarge {
                length: 100_001,
                limit: 100_000
            })
        );
        assert!(start.elapsed() < Duration::from_millis(500));

        let text = "a".repeat(100_000);
        assert!(run("b", global(), &text).is_ok());
    }

    #[test]
    fn groups_are_extracted() {
        let outcome = run(
            r"(?<year>\d{4})-(\d{2})(x)?",
            FlagSet::default(),
            "on 2024-05",
        )
        .unwrap();
        let record = &outcome.matches[0];
        assert_eq!(record.text, "2024-05");
        assert_eq!(
            record.numbered_groups,
            vec![Some("2024".to_string()), Some("05".to_string()), None]
        );
        assert_eq!(record.named_groups.len(), 1);
        assert_eq!(record.named_groups.get("year"), Some("2024"));
    }

    #[test]
    fn sticky_requires_match_at_cursor() {
        let sticky = FlagSet {
            global: true,
            sticky: true,
            ..FlagSet::default()
        };
        let outcome = run("a", sticky, "aab a").unwrap();
        assert_eq!(outcome.matches.len(), 2);

        let sticky_single = FlagSet {
            sticky: true,
            ..FlagSet::default()
        };
        assert!(run("b", sticky_single, "ab").unwrap().matches.is_empty());
        assert_eq!(run("a", sticky_single, "ab").unwrap().matches.len(), 1);
    }

    #[test]
    fn indices_are_characters() {
        let outcome = run("b", global(), "ééb").unwrap();
        assert_eq!(outcome.matches[0].index, 2);
    }

    #[test]
    fn catastrophic_backtracking_times_out() {
        let config = TesterConfig::default().with_backtrack_limit(10_000);
        let compiled = compile_pattern(
            "(?i)(a|b|ab)*(?=c)",
            &FlagSet::default(),
            config.backtrack_limit,
        )
        .unwrap();
        let text = "ab".repeat(28);
        assert_eq!(
            MatchExecutor::new(config).execute(&compiled, &text),
            Err(TesterError::Timeout(2000))
        );
    }

    #[test]
    fn single_match_stops_waiting_at_deadline() {
        let config = TesterConfig::default()
            .with_backtrack_limit(usize::MAX)
            .with_timeout(Duration::from_millis(100));
        let compiled = compile_pattern(
            "(?i)(a|b|ab)*(?=c)",
            &FlagSet::default(),
            config.backtrack_limit,
        )
        .unwrap();
        let text = "ab".repeat(40);

        let start = Instant::now();
        let result = MatchExecutor::new(config).execute(&compiled, &text);
        assert_eq!(result, Err(TesterError::Timeout(100)));
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn global_mode_respects_deadline() {
        let config = TesterConfig::default().with_timeout(Duration::ZERO);
        let compiled = compile_pattern("a", &global(), config.backtrack_limit).unwrap();
        assert_eq!(
            MatchExecutor::new(config).execute(&compiled, "aaa"),
            Err(TesterError::Timeout(0))
        );
    }

    #[test]
    fn invalid_pattern_fails_closed() {
        assert!(matches!(
            run("(", global(), "abc"),
            Err(TesterError::Compile(_))
        ));
        assert_eq!(run("", global(), "abc"), Err(TesterError::EmptyPattern));
    }
}
