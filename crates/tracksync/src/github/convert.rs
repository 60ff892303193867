//! Conversion from GitHub wire types to tracker types.

use crate::entity::github_state::GithubState;
use crate::tracker::{RemoteIssue, RemoteLabel};

use super::types::{GitHubIssue, GitHubLabel};

/// Map the `state` string; anything but `closed` is open.
pub fn github_state(state: &str) -> GithubState {
    if state.eq_ignore_ascii_case("closed") {
        GithubState::Closed
    } else {
        GithubState::Open
    }
}

/// Wire value of a state for issue updates.
pub fn state_param(state: GithubState) -> &'static str {
    match state {
        GithubState::Open => "open",
        GithubState::Closed => "closed",
    }
}

/// Convert a GitHub issue to a [`RemoteIssue`].
pub fn to_remote_issue(issue: GitHubIssue) -> RemoteIssue {
    RemoteIssue {
        number: issue.number,
        title: issue.title,
        body: issue.body,
        state: github_state(&issue.state),
        labels: issue.labels.into_iter().map(|l| l.name).collect(),
        assignees: issue.assignees.into_iter().map(|u| u.login).collect(),
        updated_at: issue.updated_at,
        is_pull_request: issue.pull_request.is_some(),
    }
}

/// Convert a GitHub label to a [`RemoteLabel`].
pub fn to_remote_label(label: GitHubLabel) -> RemoteLabel {
    RemoteLabel {
        name: label.name,
        color: label.color.unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_issue_payload() {
        let issue: GitHubIssue = serde_json::from_value(serde_json::json!({
            "number": 12,
            "title": "Crash on save",
            "body": null,
            "state": "closed",
            "labels": [{"name": "type:bug", "color": "d73a4a"}, {"name": "ui"}],
            "assignees": [{"login": "octocat"}],
            "updated_at": "2026-10-01T12:00:00Z"
        }))
        .unwrap();

        let remote = to_remote_issue(issue);
        assert_eq!(remote.number, 12);
        assert_eq!(remote.state, GithubState::Closed);
        assert_eq!(remote.labels, vec!["type:bug", "ui"]);
        assert_eq!(remote.assignees, vec!["octocat"]);
        assert!(remote.body.is_none());
        assert!(!remote.is_pull_request);
    }

    #[test]
    fn flags_pull_requests() {
        let issue: GitHubIssue = serde_json::from_value(serde_json::json!({
            "number": 3,
            "title": "Add feature",
            "state": "open",
            "updated_at": "2026-10-01T12:00:00Z",
            "pull_request": {"url": "https://api.github.com/repos/o/r/pulls/3"}
        }))
        .unwrap();

        let remote = to_remote_issue(issue);
        assert!(remote.is_pull_request);
        assert_eq!(remote.state, GithubState::Open);
    }

    #[test]
    fn state_param_round_trips() {
        for state in [GithubState::Open, GithubState::Closed] {
            assert_eq!(github_state(state_param(state)), state);
        }
    }
}
