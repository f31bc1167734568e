use crate::config::TesterConfig;
use crate::error::{ErrorKind, TesterError};
use crate::executor::{MatchExecutor, MatchRecord};
use crate::flags::{flags_to_string, FlagSet};
use crate::observability::labels::{Labels, NO_LABEL};
use crate::replacement::apply_replacement;
use crate::replacement::diff::{generate_replacement_diff, DiffSpan};
use crate::validation::compile_pattern;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

mod metrics;

pub use self::metrics::Metrics;

/// One invocation of the tester, as the editor sends it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestRequest {
    pub pattern: String,
    pub test_string: String,
    #[serde(default)]
    pub flags: FlagSet,
    #[serde(default)]
    pub replacement: Option<String>,
    /// Overrides the configured timeout for this request only.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl TestRequest {
    pub fn new(pattern: impl Into<String>, test_string: impl Into<String>, flags: FlagSet) -> Self {
        Self {
            pattern: pattern.into(),
            test_string: test_string.into(),
            flags,
            replacement: None,
            timeout_ms: None,
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Everything the display layer needs from one test run.
///
/// When a fatal error happened `is_valid` is false and `matches` is empty. A
/// failed replacement is the exception: matches are kept, `error` is set and
/// `replaced_text` is absent.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    pub matches: Vec<MatchRecord>,
    pub match_count: usize,
    /// Whether matches past the result cap were left out of `matches`.
    #[serde(default)]
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced_text: Option<String>,
    pub execution_time_ms: u64,
    pub flags_string: String,
}

/// Runs validation, matching and replacement for test requests, within the
/// limits of its [TesterConfig].
pub struct RegexTester {
    executor: MatchExecutor,
    metrics: Metrics,
}

impl RegexTester {
    pub fn new(config: TesterConfig) -> Self {
        Self::with_labels(config, &NO_LABEL)
    }

    /// Same as [RegexTester::new], with labels attached to every metric.
    pub fn with_labels(config: TesterConfig, labels: &Labels) -> Self {
        Self {
            executor: MatchExecutor::new(config),
            metrics: Metrics::new(labels),
        }
    }

    pub fn config(&self) -> &TesterConfig {
        self.executor.config()
    }

    /// Tests one request. This never fails: every error is folded into the
    /// returned [TestResult].
    pub fn test(&self, request: &TestRequest) -> TestResult {
        let start = Instant::now();
        self.metrics.tests.increment(1);

        let mut result = TestResult::default();
        if let Err(err) = self.run(request, &mut result) {
            self.fold_error(&mut result, &err);
        }
        result.flags_string = flags_to_string(&request.flags);
        result.execution_time_ms = start.elapsed().as_millis() as u64;

        self.metrics.matches.increment(result.match_count as u64);
        if result.truncated {
            self.metrics.truncated.increment(1);
        }
        self.metrics
            .execution_time
            .record(start.elapsed().as_secs_f64() * 1000.0);
        result
    }

    fn run(&self, request: &TestRequest, result: &mut TestResult) -> Result<(), TesterError> {
        let compiled = compile_pattern(
            &request.pattern,
            &request.flags,
            self.config().backtrack_limit,
        )?;

        let outcome = match request.timeout_ms {
            Some(timeout_ms) => MatchExecutor::new(
                self.config()
                    .clone()
                    .with_timeout(Duration::from_millis(timeout_ms)),
            )
            .execute(&compiled, &request.test_string)?,
            None => self.executor.execute(&compiled, &request.test_string)?,
        };

        result.is_valid = true;
        result.match_count = outcome.matches.len();
        result.matches = outcome.matches;
        result.truncated = outcome.truncated;

        if let Some(template) = &request.replacement {
            result.replaced_text = Some(apply_replacement(
                &compiled,
                &request.test_string,
                template,
            )?);
        }
        Ok(())
    }

    /// A fatal error discards everything `run` recorded. A non-fatal one only
    /// sets the error fields.
    fn fold_error(&self, result: &mut TestResult, err: &TesterError) {
        self.metrics.record_failure(err.kind());
        if err.is_fatal() {
            debug!("test run failed: {err}");
            *result = TestResult::default();
        } else {
            debug!("keeping matches after a failed step: {err}");
        }
        result.error = Some(err.to_string());
        result.error_kind = Some(err.kind());
    }

    /// Diff between the test string and the replaced text of `result`, if a
    /// replacement was produced.
    pub fn replacement_diff(&self, test_string: &str, result: &TestResult) -> Option<Vec<DiffSpan>> {
        result
            .replaced_text
            .as_deref()
            .map(|replaced| generate_replacement_diff(test_string, replaced, &self.config().diff))
    }
}

impl Default for RegexTester {
    fn default() -> Self {
        RegexTester::new(TesterConfig::default())
    }
}

/// Tests `pattern` against `test_string` with the default limits.
pub fn test_regex(
    pattern: &str,
    test_string: &str,
    flags: &FlagSet,
    replacement: Option<&str>,
) -> TestResult {
    let mut request = TestRequest::new(pattern, test_string, *flags);
    request.replacement = replacement.map(str::to_string);
    RegexTester::default().test(&request)
}
