use crate::error::ErrorKind;
use crate::observability::labels::{Labels, NO_LABEL};
use ahash::AHashMap;
use metrics::{counter, histogram, Counter, Histogram};
use strum::IntoEnumIterator;

pub struct Metrics {
    pub tests: Counter,
    pub matches: Counter,
    pub truncated: Counter,
    /// Milliseconds spent per test run.
    pub execution_time: Histogram,
    failures: AHashMap<ErrorKind, Counter>,
}

impl Metrics {
    pub fn new(labels: &Labels) -> Self {
        let failures = ErrorKind::iter()
            .map(|kind| {
                (
                    kind,
                    counter!("regex_tester.failures", labels.with_error_kind(kind)),
                )
            })
            .collect();

        Metrics {
            tests: counter!("regex_tester.tests", labels.clone()),
            matches: counter!("regex_tester.matches", labels.clone()),
            truncated: counter!("regex_tester.truncated", labels.clone()),
            execution_time: histogram!("regex_tester.execution_time", labels.clone()),
            failures,
        }
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.increment(1);
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics::new(&NO_LABEL)
    }
}
