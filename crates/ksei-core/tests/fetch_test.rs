mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use ksei_core::api::{ApiError, PortfolioCategory};
use ksei_core::auth::{AuthError, Identity};
use ksei_core::store::{CredentialStore, MemoryCredentialStore};
use ksei_core::{Error, FetchTask, KseiClient};
use serde_json::json;
use wiremock::matchers::{bearer_token, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{challenge_mock, client_config, jwt_expiring_in, login_mock, REFERER};

fn client(server: &MockServer) -> KseiClient {
    KseiClient::new(&client_config(server), Identity::new("investor", "secret"))
        .expect("client builds")
}

async fn mount_category(server: &MockServer, token: &str, category: PortfolioCategory, status: u16) {
    let response = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({ "category": category.name(), "total": 100 }))
    } else {
        ResponseTemplate::new(status).set_body_string("unavailable")
    };
    Mock::given(method("GET"))
        .and(path(category.path()))
        .and(bearer_token(token))
        .and(header("referer", REFERER))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_one_failing_category_does_not_affect_others() {
    let server = MockServer::start().await;
    let token = jwt_expiring_in(3600, "investor");
    challenge_mock(1).mount(&server).await;
    login_mock(&token, 1).mount(&server).await;

    for category in PortfolioCategory::ALL {
        let status = if category == PortfolioCategory::Bond { 503 } else { 200 };
        mount_category(&server, &token, category, status).await;
    }

    let results = client(&server)
        .get_all_portfolios()
        .await
        .expect("fan-out itself succeeds");

    assert_eq!(results.len(), 5);
    assert_eq!(results.successes().count(), 4);
    let failures: Vec<_> = results.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "bond");
    assert!(matches!(failures[0].1, ApiError::ServerError(_)));

    let cash = results.get("cash").expect("cash present").as_ref().expect("cash ok");
    assert_eq!(cash, &json!({ "category": "cash", "total": 100 }));

    let lossy = results.to_json_lossy();
    assert!(lossy["bond"].is_null());
    assert_eq!(lossy["equity"]["total"], 100);
}

#[tokio::test]
async fn test_result_keys_match_submitted_tasks() {
    let server = MockServer::start().await;
    let token = jwt_expiring_in(3600, "investor");
    challenge_mock(1).mount(&server).await;
    login_mock(&token, 1).mount(&server).await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/not-json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let config = client_config(&server).with_timeout(Duration::from_millis(500));
    let client = KseiClient::new(&config, Identity::new("investor", "secret")).expect("client");

    let tasks = vec![
        FetchTask::new("ok", "/ok"),
        FetchTask::new("missing", "/missing"),
        FetchTask::new("not_json", "/not-json"),
        FetchTask::new("slow", "/slow"),
    ];
    let results = client.fetch_all(&tasks).await.expect("fan-out succeeds");

    let submitted: BTreeSet<_> = tasks.iter().map(|t| t.name.as_str()).collect();
    let returned: BTreeSet<_> = results.names().collect();
    assert_eq!(submitted, returned);

    assert_eq!(results.get("ok").expect("ok").as_ref().expect("ok value"), &json!([1, 2, 3]));
    assert!(matches!(results.get("missing"), Some(Err(ApiError::NotFound(_)))));
    assert!(matches!(results.get("not_json"), Some(Err(ApiError::InvalidResponse(_)))));
    assert!(matches!(results.get("slow"), Some(Err(ApiError::NetworkError(_)))));
}

#[tokio::test]
async fn test_login_failure_fails_whole_fetch() {
    let server = MockServer::start().await;
    challenge_mock(1).mount(&server).await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/myportofolio/summary-detail/kas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .get_all_portfolios()
        .await
        .expect_err("no credential, no fan-out");
    assert!(matches!(err, Error::Auth(AuthError::Login(ApiError::Unauthorized))));
}

#[tokio::test]
async fn test_credential_shared_across_branches_and_calls() {
    let server = MockServer::start().await;
    let token = jwt_expiring_in(3600, "investor");
    challenge_mock(1).mount(&server).await;
    login_mock(&token, 1).mount(&server).await;

    Mock::given(method("GET"))
        .and(bearer_token(token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(6)
        .mount(&server)
        .await;

    let client = client(&server);
    let tasks: Vec<_> = (0..3)
        .map(|i| FetchTask::new(format!("task-{}", i), format!("/data/{}", i)))
        .collect();

    let first = client.fetch_all(&tasks).await.expect("first fan-out");
    let second = client.fetch_all(&tasks).await.expect("second fan-out");
    assert_eq!(first.successes().count(), 3);
    assert_eq!(second.successes().count(), 3);
}

#[tokio::test]
async fn test_duplicate_task_names_rejected_before_login() {
    let server = MockServer::start().await;
    challenge_mock(0).mount(&server).await;
    login_mock("unused", 0).mount(&server).await;

    let tasks = vec![FetchTask::new("cash", "/a"), FetchTask::new("cash", "/b")];
    let err = client(&server).fetch_all(&tasks).await.expect_err("duplicate");
    assert!(matches!(err, Error::DuplicateTask(ref name) if name == "cash"));
}

#[tokio::test]
async fn test_empty_task_list_needs_no_login() {
    let server = MockServer::start().await;
    challenge_mock(0).mount(&server).await;
    login_mock("unused", 0).mount(&server).await;

    let results = client(&server).fetch_all(&[]).await.expect("empty fan-out");
    assert!(results.is_empty());
}

#[tokio::test]
async fn test_single_getters_pass_json_through() {
    let server = MockServer::start().await;
    let token = jwt_expiring_in(3600, "investor");
    challenge_mock(0).mount(&server).await;
    login_mock(&token, 0).mount(&server).await;

    let summary = json!({ "data": [{ "nama": "Kas", "total": 12.5 }], "status": "200" });
    Mock::given(method("GET"))
        .and(path("/myportofolio/summary"))
        .and(bearer_token(token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary.clone()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/myaccount/global-identity/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Investor" })))
        .expect(1)
        .mount(&server)
        .await;

    // A persisted token means no login at all
    let store = Arc::new(MemoryCredentialStore::new());
    store.set("investor", &token).expect("seed store");
    let client = client(&server).with_store(store);

    assert_eq!(client.get_portfolio_summary().await.expect("summary"), summary);
    assert_eq!(
        client.get_global_identity().await.expect("identity"),
        json!({ "name": "Investor" })
    );
}

#[tokio::test]
async fn test_single_getter_surfaces_status_error() {
    let server = MockServer::start().await;
    let token = jwt_expiring_in(3600, "investor");
    challenge_mock(1).mount(&server).await;
    login_mock(&token, 1).mount(&server).await;
    Mock::given(method("GET"))
        .and(path("/myportofolio/summary-detail/ekuitas"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_equity_balances()
        .await
        .expect_err("server error surfaces");
    assert!(matches!(err, Error::Api(ApiError::ServerError(_))));
}
