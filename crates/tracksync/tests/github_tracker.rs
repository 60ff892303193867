//! HTTP-level tests for the GitHub tracker against a local mock server.

#![cfg(feature = "github")]

use std::time::Duration;

use serde_json::json;
use tracksync::GithubState;
use tracksync::github::{GitHubConfig, GitHubTracker};
use tracksync::tracker::{
    NewRemoteIssue, NewRemoteLabel, RateLimitGuard, RemoteIssueUpdate, RemoteTracker,
    TrackerError,
};
use tracksync::RepoId;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tracker(server: &MockServer) -> GitHubTracker {
    GitHubTracker::new(GitHubConfig {
        token: Some("ghp_test".to_string()),
        api_url: server.uri(),
        requests_per_second: None,
    })
    .expect("client should build")
}

fn repo() -> RepoId {
    "octo/widgets".parse().unwrap()
}

fn issue_json(number: i64, state: &str) -> serde_json::Value {
    json!({
        "number": number,
        "title": format!("Issue {number}"),
        "body": null,
        "state": state,
        "labels": [{"name": "type:bug", "color": "d73a4a"}],
        "assignees": [{"login": "octocat"}],
        "updated_at": "2024-05-01T12:00:00Z"
    })
}

#[tokio::test]
async fn test_list_issues_follows_link_pagination() {
    let server = MockServer::start().await;
    let next = format!(
        "<{}/repos/octo/widgets/issues?state=all&per_page=100&page=2>; rel=\"next\"",
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue_json(2, "closed"),
            {
                "number": 3,
                "title": "Bump deps",
                "state": "open",
                "updated_at": "2024-05-01T12:00:00Z",
                "pull_request": {"url": "https://example.invalid/pulls/3"}
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues"))
        .and(query_param("state", "all"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("link", next.as_str())
                .set_body_json(json!([issue_json(1, "open")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let issues = tracker(&server).list_issues(&repo()).await.unwrap();

    assert_eq!(issues.len(), 3);
    assert_eq!(issues[0].number, 1);
    assert_eq!(issues[0].state, GithubState::Open);
    assert_eq!(issues[0].labels, vec!["type:bug"]);
    assert_eq!(issues[0].assignees, vec!["octocat"]);
    assert_eq!(issues[1].state, GithubState::Closed);
    assert!(issues[2].is_pull_request);
}

#[tokio::test]
async fn test_exhausted_quota_maps_to_throttled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/labels"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1714564800")
                .set_body_json(json!({"message": "API rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let err = tracker(&server).list_labels(&repo()).await.unwrap_err();

    match err {
        TrackerError::Throttled { reset_at, .. } => {
            assert_eq!(reset_at.map(|r| r.timestamp()), Some(1_714_564_800));
        }
        other => panic!("expected throttled error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_secondary_limit_carries_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/issues"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let issue = NewRemoteIssue {
        title: "Login fails".to_string(),
        body: None,
        labels: Vec::new(),
    };
    let err = tracker(&server)
        .create_issue(&repo(), &issue)
        .await
        .unwrap_err();

    match err {
        TrackerError::Throttled { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(30)));
        }
        other => panic!("expected throttled error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_duplicate_label_maps_to_already_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/labels"))
        .and(body_json(json!({"name": "type:bug", "color": "d73a4a"})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"resource": "Label", "code": "already_exists", "field": "name"}]
        })))
        .mount(&server)
        .await;

    let label = NewRemoteLabel {
        name: "type:bug".to_string(),
        color: "d73a4a".to_string(),
    };
    let err = tracker(&server)
        .create_label(&repo(), &label)
        .await
        .unwrap_err();

    assert!(err.is_already_exists(), "{err:?}");
}

#[tokio::test]
async fn test_other_validation_failure_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/labels"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"resource": "Label", "code": "invalid", "field": "color"}]
        })))
        .mount(&server)
        .await;

    let label = NewRemoteLabel {
        name: "ui".to_string(),
        color: "zzzzzz".to_string(),
    };
    let err = tracker(&server)
        .create_label(&repo(), &label)
        .await
        .unwrap_err();

    match err {
        TrackerError::Api { status, message } => {
            assert_eq!(status, Some(422));
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_issue_sends_payload_and_returns_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/issues"))
        .and(body_json(json!({
            "title": "Login fails",
            "body": "Steps to reproduce",
            "labels": ["type:bug", "priority:high"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"number": 42})))
        .expect(1)
        .mount(&server)
        .await;

    let issue = NewRemoteIssue {
        title: "Login fails".to_string(),
        body: Some("Steps to reproduce".to_string()),
        labels: vec!["type:bug".to_string(), "priority:high".to_string()],
    };
    let number = tracker(&server).create_issue(&repo(), &issue).await.unwrap();

    assert_eq!(number, 42);
}

#[tokio::test]
async fn test_update_issue_patches_state_and_labels() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo/widgets/issues/7"))
        .and(body_json(json!({
            "title": "Done thing",
            "body": null,
            "labels": ["type:task", "priority:medium"],
            "state": "closed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(7, "closed")))
        .expect(1)
        .mount(&server)
        .await;

    let update = RemoteIssueUpdate {
        title: "Done thing".to_string(),
        body: None,
        labels: vec!["type:task".to_string(), "priority:medium".to_string()],
        state: GithubState::Closed,
    };
    tracker(&server)
        .update_issue(&repo(), 7, &update)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_missing_issue_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/repos/octo/widgets/issues/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let update = RemoteIssueUpdate {
        title: "Gone".to_string(),
        body: None,
        labels: Vec::new(),
        state: GithubState::Open,
    };
    let err = tracker(&server)
        .update_issue(&repo(), 99, &update)
        .await
        .unwrap_err();

    assert!(matches!(err, TrackerError::NotFound { .. }), "{err:?}");
}

#[tokio::test]
async fn test_bad_token_maps_to_auth_required() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/labels"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let err = tracker(&server).list_labels(&repo()).await.unwrap_err();

    assert!(matches!(err, TrackerError::AuthRequired), "{err:?}");
}

#[tokio::test]
async fn test_permission_denied_repo_is_not_throttling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Must have admin rights to Repository.",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let guarded = RateLimitGuard::new(tracker(&server));
    let err = guarded.validate_repo(&repo()).await.unwrap_err();

    assert!(
        matches!(err, TrackerError::Api { status: Some(403), .. }),
        "{err:?}"
    );
}
