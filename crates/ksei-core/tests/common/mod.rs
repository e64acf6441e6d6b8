#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use ksei_core::api::ApiClient;
use ksei_core::store::{CredentialStore, StoreError};
use ksei_core::ClientConfig;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REFERER: &str = "https://akses.ksei.co.id";
pub const SERVER_HASH: &str = "server-issued-hash";

/// Unsigned JWT whose `exp` is `offset_secs` from now.
pub fn jwt_expiring_in(offset_secs: i64, subject: &str) -> String {
    let exp = Utc::now().timestamp() + offset_secs;
    jwt_with_claims(&json!({ "sub": subject, "exp": exp }).to_string())
}

pub fn jwt_with_claims(claims: &str) -> String {
    format!(
        "{}.{}.c2lnbmF0dXJl",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims)
    )
}

pub fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig::default()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_secs(5))
}

pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(&client_config(server)).expect("client builds")
}

pub fn challenge_mock(expected_calls: u64) -> Mock {
    Mock::given(method("GET"))
        .and(path("/activation/generated"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "200",
            "data": [{ "pass": SERVER_HASH }]
        })))
        .expect(expected_calls)
}

pub fn login_mock(token: &str, expected_calls: u64) -> Mock {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "validation": token })))
        .expect(expected_calls)
}

/// Store whose reads and writes always fail.
#[derive(Default)]
pub struct BrokenStore {
    pub writes: AtomicUsize,
}

impl CredentialStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "store unavailable",
        )))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "store unavailable",
        )))
    }

    fn name(&self) -> &str {
        "broken"
    }
}
