use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_MAX_INPUT_CHARS: usize = 100_000;
pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
pub const DEFAULT_MAX_MATCHES: usize = 1_000;
pub const DEFAULT_BACKTRACK_LIMIT: usize = 1_000_000;
pub const DEFAULT_DIFF_SIZE_LIMIT: usize = 5_000;
pub const DEFAULT_DIFF_LOOKAHEAD: usize = 100;
pub const DEFAULT_DIFF_MAX_ITERATIONS: usize = 10_000;

/// Limits applied to a single test run. Every field has a default, so a
/// partial (or empty) JSON object deserializes.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct TesterConfig {
    /// Wall-clock budget for matching.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_ms")]
    pub timeout: Duration,

    /// Test strings longer than this (in characters) are rejected before matching.
    pub max_input_chars: usize,

    /// Search attempts allowed in global mode before the run fails.
    pub max_iterations: usize,

    /// Matches kept in the result. Anything past this is dropped silently.
    pub max_matches: usize,

    /// Backtracking steps the engine may take for one search.
    pub backtrack_limit: usize,

    pub diff: DiffConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DiffConfig {
    /// Past this many characters (either side) no alignment is attempted.
    pub size_limit: usize,
    pub lookahead: usize,
    pub max_iterations: usize,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_matches: DEFAULT_MAX_MATCHES,
            backtrack_limit: DEFAULT_BACKTRACK_LIMIT,
            diff: DiffConfig::default(),
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            size_limit: DEFAULT_DIFF_SIZE_LIMIT,
            lookahead: DEFAULT_DIFF_LOOKAHEAD,
            max_iterations: DEFAULT_DIFF_MAX_ITERATIONS,
        }
    }
}

impl TesterConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = max_matches;
        self
    }

    pub fn with_backtrack_limit(mut self, backtrack_limit: usize) -> Self {
        self.backtrack_limit = backtrack_limit;
        self
    }

    pub fn with_diff(mut self, diff: DiffConfig) -> Self {
        self.diff = diff;
        self
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// What the plain-text export includes for each match.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplayOptions {
    pub show_groups: bool,
    pub show_positions: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_groups: true,
            show_positions: true,
        }
    }
}
