use crate::flags::FlagSet;
use crate::tester::TestResult;
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A saved pattern together with the input it was tested on.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub name: String,
    pub pattern: String,
    pub test_string: String,
    #[serde(default)]
    pub flags: FlagSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_match_count: Option<usize>,
    pub created_at: DateTime<Utc>,
}

impl TestCase {
    /// Whether `result` has the expected number of matches. `None` when no
    /// expectation was saved.
    pub fn check(&self, result: &TestResult) -> Option<bool> {
        self.expected_match_count
            .map(|expected| result.is_valid && result.match_count == expected)
    }
}

/// The fields a caller provides. The id and the timestamp are assigned by the
/// store.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTestCase {
    pub name: String,
    pub pattern: String,
    pub test_string: String,
    #[serde(default)]
    pub flags: FlagSet,
    #[serde(default)]
    pub replace_string: Option<String>,
    #[serde(default)]
    pub expected_match_count: Option<usize>,
}

#[derive(Debug, Error)]
pub enum TestCaseError {
    #[error("No test case with id '{0}'")]
    NotFound(String),

    #[error("A test case with id '{0}' already exists")]
    DuplicateId(String),

    #[error("Invalid test case data: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait TestCaseStore {
    fn create(&mut self, test_case: NewTestCase) -> TestCase;

    /// Replaces the saved case with the same id. The creation time is kept.
    fn update(&mut self, test_case: TestCase) -> Result<TestCase, TestCaseError>;

    fn delete(&mut self, id: &str) -> Result<TestCase, TestCaseError>;

    fn get(&self, id: &str) -> Option<&TestCase>;

    /// Every saved case, oldest first.
    fn list(&self) -> Vec<&TestCase>;
}

/// Keeps test cases in memory. The whole store can be saved to and loaded
/// from a JSON array.
#[derive(Debug, Default)]
pub struct InMemoryTestCaseStore {
    cases: AHashMap<String, TestCase>,
    order: Vec<String>,
    next_id: u64,
}

impl InMemoryTestCaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn save(&self) -> Result<String, TestCaseError> {
        Ok(serde_json::to_string(&self.list())?)
    }

    /// Rebuilds a store from the output of [InMemoryTestCaseStore::save].
    pub fn load(json: &str) -> Result<Self, TestCaseError> {
        let cases: Vec<TestCase> = serde_json::from_str(json)?;
        let mut store = Self::new();
        for case in cases {
            if store.cases.contains_key(&case.id) {
                return Err(TestCaseError::DuplicateId(case.id));
            }
            store.order.push(case.id.clone());
            store.cases.insert(case.id.clone(), case);
        }
        store.next_id = store.order.len() as u64;
        Ok(store)
    }

    fn generate_id(&mut self, created_at: &DateTime<Utc>) -> String {
        loop {
            self.next_id += 1;
            let id = format!("tc-{}-{}", created_at.timestamp_millis(), self.next_id);
            if !self.cases.contains_key(&id) {
                return id;
            }
        }
    }
}

impl TestCaseStore for InMemoryTestCaseStore {
    fn create(&mut self, test_case: NewTestCase) -> TestCase {
        let created_at = Utc::now();
        let id = self.generate_id(&created_at);
        let case = TestCase {
            id: id.clone(),
            name: test_case.name,
            pattern: test_case.pattern,
            test_string: test_case.test_string,
            flags: test_case.flags,
            replace_string: test_case.replace_string,
            expected_match_count: test_case.expected_match_count,
            created_at,
        };
        self.order.push(id.clone());
        self.cases.insert(id, case.clone());
        case
    }

    fn update(&mut self, mut test_case: TestCase) -> Result<TestCase, TestCaseError> {
        let existing = self
            .cases
            .get_mut(&test_case.id)
            .ok_or_else(|| TestCaseError::NotFound(test_case.id.clone()))?;
        test_case.created_at = existing.created_at;
        *existing = test_case.clone();
        Ok(test_case)
    }

    fn delete(&mut self, id: &str) -> Result<TestCase, TestCaseError> {
        let case = self
            .cases
            .remove(id)
            .ok_or_else(|| TestCaseError::NotFound(id.to_string()))?;
        self.order.retain(|existing| existing != id);
        Ok(case)
    }

    fn get(&self, id: &str) -> Option<&TestCase> {
        self.cases.get(id)
    }

    fn list(&self) -> Vec<&TestCase> {
        self.order
            .iter()
            .filter_map(|id| self.cases.get(id))
            .collect()
    }
}
