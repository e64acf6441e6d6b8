//! Concurrent fan-out of authenticated GET requests.
//!
//! One credential is obtained up front and shared by every branch. Each
//! branch is tagged with its task name and all of them are joined, so one
//! failing endpoint only shows up as a failure entry next to the others'
//! data.

use std::collections::{BTreeMap, HashSet};

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{ApiClient, ApiError, PortfolioCategory};
use crate::auth::CredentialManager;
use crate::error::{Error, Result};

/// One named request in a fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTask {
    pub name: String,
    pub path: String,
}

impl FetchTask {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Tasks for the five balance categories.
    pub fn portfolios() -> Vec<FetchTask> {
        PortfolioCategory::ALL
            .iter()
            .map(|c| FetchTask::new(c.name(), c.path()))
            .collect()
    }
}

pub type FetchOutcome = std::result::Result<Value, ApiError>;

/// Outcome of every task in one fan-out, keyed by task name.
#[derive(Debug, Default)]
pub struct FetchResults {
    outcomes: BTreeMap<String, FetchOutcome>,
}

impl FetchResults {
    pub fn get(&self, name: &str) -> Option<&FetchOutcome> {
        self.outcomes.get(name)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FetchOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn successes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.iter()
            .filter_map(|(name, outcome)| outcome.as_ref().ok().map(|v| (name, v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ApiError)> {
        self.iter()
            .filter_map(|(name, outcome)| outcome.as_ref().err().map(|e| (name, e)))
    }

    /// JSON object of all results with failed tasks rendered as `null`.
    pub fn to_json_lossy(&self) -> Value {
        let map = self
            .iter()
            .map(|(name, outcome)| {
                let value = outcome.as_ref().cloned().unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect();
        Value::Object(map)
    }

    pub fn into_inner(self) -> BTreeMap<String, FetchOutcome> {
        self.outcomes
    }
}

impl IntoIterator for FetchResults {
    type Item = (String, FetchOutcome);
    type IntoIter = std::collections::btree_map::IntoIter<String, FetchOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}

fn check_unique(tasks: &[FetchTask]) -> Result<()> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.name.as_str()) {
            return Err(Error::DuplicateTask(task.name.clone()));
        }
    }
    Ok(())
}

/// Fetch every task concurrently with one shared credential.
///
/// Only a duplicate task name or a failure to obtain the credential fails
/// the call; per-task errors are returned inside [`FetchResults`].
pub async fn fetch_all(
    api: &ApiClient,
    credentials: &CredentialManager,
    tasks: &[FetchTask],
) -> Result<FetchResults> {
    check_unique(tasks)?;
    if tasks.is_empty() {
        return Ok(FetchResults::default());
    }

    let credential = credentials.ensure_valid_credential().await?;
    let token = credential.token();

    debug!(count = tasks.len(), "Dispatching fetch tasks");

    let branches = tasks.iter().map(|task| async move {
        let outcome = api.get_json(&task.path, token).await;
        (task.name.clone(), outcome)
    });

    let mut outcomes = BTreeMap::new();
    for (name, outcome) in join_all(branches).await {
        if let Err(ref e) = outcome {
            warn!(task = %name, error = %e, http_status = e.is_status(), "Fetch task failed");
        }
        outcomes.insert(name, outcome);
    }

    Ok(FetchResults { outcomes })
}
