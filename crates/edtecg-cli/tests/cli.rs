//! CLI integration tests against a mock API server.

mod common;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::TestEnv;

// The CLI blocks on a child process; keep the mock server on its own workers.

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "secret"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A1", "refreshToken": "R1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    let stdout = env.run_success(&["auth", "login", "--username", "alice", "--password", "secret"]);

    assert!(stdout.contains("Logged in successfully"));
    assert_eq!(env.stored(), json!({"accessToken": "A1", "refreshToken": "R1"}));

    let stdout = env.run_success(&["auth", "whoami"]);
    assert!(stdout.contains("Authenticated"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_failure_exits_nonzero() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    let output = env.run(&["auth", "login", "--username", "alice", "--password", "wrong"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid credentials"));
    assert_eq!(env.stored(), json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_protected_command_requires_login() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flashcard/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri());
    let output = env.run(&["flashcards", "list"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_token_is_refreshed_and_persisted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flashcard/collections"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flashcard/collections"))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Verbs", "numberOfFlashcards": 2, "userId": 1, "flashcards": []}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .and(body_json(json!({"refreshToken": "R1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"accessToken": "A2", "refreshToken": "R2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri()).with_tokens("A1", "R1");
    let stdout = env.run_success(&["flashcards", "list"]);

    assert!(stdout.contains("Verbs"));
    assert_eq!(env.stored(), json!({"accessToken": "A2", "refreshToken": "R2"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_refresh_clears_store() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mock/all"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri()).with_tokens("A1", "R1");
    let output = env.run(&["mocks", "list"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("edtecg auth login"));
    assert_eq!(env.stored(), json!({}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_removes_credentials() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&server.uri()).with_tokens("A1", "R1");

    let stdout = env.run_success(&["auth", "logout"]);

    assert!(stdout.contains("Logged out"));
    assert!(!env.store.exists());
    assert!(!env.run(&["auth", "whoami"]).status.success());
}
