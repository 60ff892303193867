//! Shared fixtures: an in-memory remote tracker and a migrated SQLite store.

#![allow(dead_code)]

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracksync::store::{DbStore, NewProject, Project};
use tracksync::tracker::{
    NewRemoteIssue, NewRemoteLabel, RateLimitInfo, RemoteIssue, RemoteIssueUpdate, RemoteLabel,
    RemoteTracker, Result, TrackerError,
};
use tracksync::{GithubState, RepoId, connect_and_migrate};

pub const REPO: &str = "octo/widgets";

#[derive(Default)]
struct MockState {
    issues: BTreeMap<i64, RemoteIssue>,
    labels: Vec<RemoteLabel>,
    /// Serve an empty label listing.
    hide_labels: bool,
    next_number: i64,
    /// Titles whose creation fails with a server error.
    failing_titles: Vec<String>,
    /// Issue numbers whose updates fail with a server error.
    failing_updates: Vec<i64>,
    /// Errors returned by the next calls, whatever they are.
    injected: VecDeque<TrackerError>,
    calls: Vec<&'static str>,
}

/// Remote tracker held in memory.
pub struct MockTracker {
    repo: RepoId,
    credentials: bool,
    state: Mutex<MockState>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self {
            repo: REPO.parse().unwrap(),
            credentials: true,
            state: Mutex::new(MockState {
                next_number: 1,
                ..MockState::default()
            }),
        }
    }

    pub fn without_credentials() -> Self {
        Self {
            credentials: false,
            ..Self::new()
        }
    }

    /// Add a remote issue and return its number.
    pub fn insert_issue(
        &self,
        title: &str,
        state: GithubState,
        labels: &[&str],
        updated_at: DateTime<Utc>,
    ) -> i64 {
        let mut st = self.state.lock().unwrap();
        let number = st.next_number;
        st.next_number += 1;
        st.issues.insert(
            number,
            RemoteIssue {
                number,
                title: title.to_string(),
                body: None,
                state,
                labels: labels.iter().map(|s| s.to_string()).collect(),
                assignees: vec!["octocat".to_string()],
                updated_at,
                is_pull_request: false,
            },
        );
        number
    }

    /// Add a pull request, which the issues endpoint also lists.
    pub fn insert_pull_request(&self, title: &str) -> i64 {
        let number = self.insert_issue(title, GithubState::Open, &[], Utc::now());
        self.edit_issue(number, |issue| issue.is_pull_request = true);
        number
    }

    pub fn edit_issue(&self, number: i64, edit: impl FnOnce(&mut RemoteIssue)) {
        let mut st = self.state.lock().unwrap();
        edit(st.issues.get_mut(&number).expect("unknown remote issue"));
    }

    pub fn issue(&self, number: i64) -> RemoteIssue {
        self.state.lock().unwrap().issues[&number].clone()
    }

    pub fn issue_count(&self) -> usize {
        self.state.lock().unwrap().issues.len()
    }

    pub fn add_label(&self, name: &str, color: &str) {
        self.state.lock().unwrap().labels.push(RemoteLabel {
            name: name.to_string(),
            color: color.to_string(),
        });
    }

    pub fn labels(&self) -> Vec<RemoteLabel> {
        self.state.lock().unwrap().labels.clone()
    }

    pub fn hide_labels(&self) {
        self.state.lock().unwrap().hide_labels = true;
    }

    pub fn fail_create_for(&self, title: &str) {
        self.state.lock().unwrap().failing_titles.push(title.to_string());
    }

    pub fn fail_update_for(&self, number: i64) {
        self.state.lock().unwrap().failing_updates.push(number);
    }

    pub fn allow_updates(&self) {
        self.state.lock().unwrap().failing_updates.clear();
    }

    /// Make the next call fail with `err`.
    pub fn inject_error(&self, err: TrackerError) {
        self.state.lock().unwrap().injected.push_back(err);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| **c == name).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn begin(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, MockState>> {
        let mut st = self.state.lock().unwrap();
        st.calls.push(call);
        match st.injected.pop_front() {
            Some(err) => Err(err),
            None => Ok(st),
        }
    }

    fn check_repo(&self, repo: &RepoId) -> Result<()> {
        if *repo == self.repo {
            Ok(())
        } else {
            Err(TrackerError::not_found(repo.to_string()))
        }
    }
}

#[async_trait]
impl RemoteTracker for MockTracker {
    fn has_credentials(&self) -> bool {
        self.credentials
    }

    async fn list_issues(&self, repo: &RepoId) -> Result<Vec<RemoteIssue>> {
        let st = self.begin("list_issues")?;
        self.check_repo(repo)?;
        Ok(st.issues.values().cloned().collect())
    }

    async fn create_issue(&self, repo: &RepoId, issue: &NewRemoteIssue) -> Result<i64> {
        let mut st = self.begin("create_issue")?;
        self.check_repo(repo)?;
        if st.failing_titles.contains(&issue.title) {
            return Err(TrackerError::api(Some(502), "Bad Gateway"));
        }

        let number = st.next_number;
        st.next_number += 1;
        st.issues.insert(
            number,
            RemoteIssue {
                number,
                title: issue.title.clone(),
                body: issue.body.clone(),
                state: GithubState::Open,
                labels: issue.labels.clone(),
                assignees: Vec::new(),
                updated_at: Utc::now(),
                is_pull_request: false,
            },
        );
        Ok(number)
    }

    async fn update_issue(
        &self,
        repo: &RepoId,
        number: i64,
        update: &RemoteIssueUpdate,
    ) -> Result<()> {
        let mut st = self.begin("update_issue")?;
        self.check_repo(repo)?;
        if st.failing_updates.contains(&number) {
            return Err(TrackerError::api(Some(500), "boom"));
        }
        let issue = st
            .issues
            .get_mut(&number)
            .ok_or_else(|| TrackerError::not_found(format!("issue #{number}")))?;
        issue.title = update.title.clone();
        issue.body = update.body.clone();
        issue.labels = update.labels.clone();
        issue.state = update.state;
        issue.updated_at = Utc::now();
        Ok(())
    }

    async fn list_labels(&self, repo: &RepoId) -> Result<Vec<RemoteLabel>> {
        let st = self.begin("list_labels")?;
        self.check_repo(repo)?;
        if st.hide_labels {
            return Ok(Vec::new());
        }
        Ok(st.labels.clone())
    }

    async fn create_label(&self, repo: &RepoId, label: &NewRemoteLabel) -> Result<()> {
        let mut st = self.begin("create_label")?;
        self.check_repo(repo)?;
        if st
            .labels
            .iter()
            .any(|l| l.name.eq_ignore_ascii_case(&label.name))
        {
            return Err(TrackerError::already_exists(format!("label {}", label.name)));
        }
        st.labels.push(RemoteLabel {
            name: label.name.clone(),
            color: label.color.clone(),
        });
        Ok(())
    }

    async fn validate_repo(&self, repo: &RepoId) -> Result<()> {
        let _st = self.begin("validate_repo")?;
        self.check_repo(repo)
    }

    async fn rate_limit(&self) -> Result<RateLimitInfo> {
        let _st = self.begin("rate_limit")?;
        Ok(RateLimitInfo {
            limit: 5000,
            remaining: 4999,
            reset_at: Utc::now(),
        })
    }
}

/// Migrated in-memory store.
pub async fn setup_store() -> Arc<DbStore> {
    let db = connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Arc::new(DbStore::new(db))
}

/// Project linked to [`REPO`].
pub async fn create_project(store: &DbStore) -> Project {
    create_project_with_repo(store, Some(REPO)).await
}

pub async fn create_project_with_repo(store: &DbStore, repo: Option<&str>) -> Project {
    store
        .create_project(NewProject {
            name: "Board".to_string(),
            description: None,
            github_repo: repo.map(String::from),
        })
        .await
        .expect("Failed to create project")
}
