mod common;

use cashfree_node::{ConnectorError, PayoutAuthenticator, PayoutCredentials, TokenCache};
use base64::{engine::general_purpose, Engine as _};
use common::{
    init_tracing, mount_authorize, payout_credentials, received_header, received_paths,
    test_keys, TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_TOKEN,
};
use rsa::Oaep;
use sha1::Sha1;
use secrecy::{ExposeSecret, Secret};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn authenticator(server: &MockServer) -> PayoutAuthenticator {
    PayoutAuthenticator::new(reqwest::Client::new()).with_base_url(server.uri())
}

#[tokio::test]
async fn get_auth_token_returns_token_on_success() {
    init_tracing();
    let server = MockServer::start().await;
    mount_authorize(&server, TEST_TOKEN, 1).await;

    let token = authenticator(&server)
        .get_auth_token(&payout_credentials())
        .await
        .expect("Failed to get auth token");

    assert_eq!(token.expose_secret(), TEST_TOKEN);
}

#[tokio::test]
async fn get_auth_token_trims_credentials_before_sending() {
    init_tracing();
    let server = MockServer::start().await;
    mount_authorize(&server, TEST_TOKEN, 1).await;

    let mut credentials = payout_credentials();
    credentials.client_id = format!("  {}\n", TEST_CLIENT_ID);
    credentials.client_secret = Secret::new(format!(" {} ", TEST_CLIENT_SECRET));

    let token = authenticator(&server)
        .get_auth_token(&credentials)
        .await
        .expect("Failed to get auth token");

    assert_eq!(token.expose_secret(), TEST_TOKEN);
}

#[tokio::test]
async fn signature_header_decrypts_to_trimmed_client_id_and_current_epoch() {
    init_tracing();
    let server = MockServer::start().await;
    mount_authorize(&server, TEST_TOKEN, 1).await;

    let mut credentials = payout_credentials();
    credentials.client_id = format!("  {}\t", TEST_CLIENT_ID);

    let before = chrono::Utc::now().timestamp();
    authenticator(&server)
        .get_auth_token(&credentials)
        .await
        .expect("Failed to get auth token");
    let after = chrono::Utc::now().timestamp();

    let signatures = received_header(&server, "/payout/v1/authorize", "X-Cf-Signature").await;
    assert_eq!(signatures.len(), 1);

    let ciphertext = general_purpose::STANDARD
        .decode(&signatures[0])
        .expect("signature is not base64");
    let plaintext = test_keys()
        .private_key
        .decrypt(Oaep::new::<Sha1>(), &ciphertext)
        .expect("signature does not decrypt with RSA-OAEP/SHA-1");
    let subject = String::from_utf8(plaintext).unwrap();

    let (client_id, epoch) = subject.rsplit_once('.').unwrap();
    assert_eq!(client_id, TEST_CLIENT_ID);
    assert!(!epoch.is_empty() && epoch.chars().all(|c| c.is_ascii_digit()));

    let epoch: i64 = epoch.parse().unwrap();
    assert!(epoch >= before - 5 && epoch <= after + 5);
}

#[tokio::test]
async fn upstream_error_status_is_authorization_error() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payout/v1/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ERROR",
            "message": "bad sig",
            "subCode": "400"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = authenticator(&server)
        .get_auth_token(&payout_credentials())
        .await
        .unwrap_err();

    match &err {
        ConnectorError::Authorization(message) => {
            assert!(message.contains("bad sig"));
            assert!(message.contains("400"));
        }
        other => panic!("expected authorization error, got {:?}", other),
    }
}

#[tokio::test]
async fn http_failure_status_is_authorization_error() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payout/v1/authorize"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = authenticator(&server)
        .get_auth_token(&payout_credentials())
        .await
        .unwrap_err();

    match &err {
        ConnectorError::Authorization(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("upstream exploded"));
        }
        other => panic!("expected authorization error, got {:?}", other),
    }
}

#[tokio::test]
async fn unexpected_response_shape_includes_raw_body() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payout/v1/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"PENDING"}"#))
        .mount(&server)
        .await;

    let err = authenticator(&server)
        .get_auth_token(&payout_credentials())
        .await
        .unwrap_err();

    assert!(err.to_string().contains(r#"{"status":"PENDING"}"#));
}

#[tokio::test]
async fn missing_credentials_fail_without_network_calls() {
    init_tracing();
    let server = MockServer::start().await;
    let authenticator = authenticator(&server);

    let blank = |id: &str, secret: &str, key: &str| PayoutCredentials {
        client_id: id.to_string(),
        client_secret: Secret::new(secret.to_string()),
        public_key: Secret::new(key.to_string()),
        ..payout_credentials()
    };

    let cases = [
        (blank("", TEST_CLIENT_SECRET, "key"), "client_id"),
        (blank(TEST_CLIENT_ID, "", "key"), "client_secret"),
        (blank(TEST_CLIENT_ID, TEST_CLIENT_SECRET, "  "), "public_key"),
        (blank("", "", ""), "client_id"),
        (blank(TEST_CLIENT_ID, " ", ""), "client_secret"),
    ];

    for (credentials, expected) in cases {
        match authenticator.get_auth_token(&credentials).await {
            Err(ConnectorError::MissingCredential { field }) => assert_eq!(field, expected),
            other => panic!("expected missing {}, got {:?}", expected, other),
        }
    }

    assert!(received_paths(&server).await.is_empty());
}

#[tokio::test]
async fn malformed_public_key_fails_without_network_calls() {
    init_tracing();
    let server = MockServer::start().await;

    let mut credentials = payout_credentials();
    credentials.public_key =
        Secret::new("-----BEGIN PUBLIC KEY-----\nbm90IGEga2V5\n-----END PUBLIC KEY-----".to_string());

    let result = authenticator(&server).get_auth_token(&credentials).await;

    assert!(matches!(result, Err(ConnectorError::Signature(_))));
    assert!(received_paths(&server).await.is_empty());
}

#[tokio::test]
async fn every_call_runs_a_fresh_exchange_without_cache() {
    init_tracing();
    let server = MockServer::start().await;
    mount_authorize(&server, TEST_TOKEN, 2).await;

    let authenticator = authenticator(&server);
    authenticator
        .get_auth_token(&payout_credentials())
        .await
        .unwrap();
    authenticator
        .get_auth_token(&payout_credentials())
        .await
        .unwrap();
}

#[tokio::test]
async fn token_cache_reuses_valid_token() {
    init_tracing();
    let server = MockServer::start().await;
    mount_authorize(&server, TEST_TOKEN, 1).await;

    let authenticator = authenticator(&server).with_token_cache(TokenCache::new(600));
    let first = authenticator
        .get_auth_token(&payout_credentials())
        .await
        .unwrap();
    let second = authenticator
        .get_auth_token(&payout_credentials())
        .await
        .unwrap();

    assert_eq!(first.expose_secret(), TEST_TOKEN);
    assert_eq!(second.expose_secret(), TEST_TOKEN);
}

#[tokio::test]
async fn token_cache_never_serves_expired_token() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payout/v1/authorize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "SUCCESS",
            "data": { "token": "short_lived", "expiry": chrono::Utc::now().timestamp() - 1 }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let authenticator = authenticator(&server).with_token_cache(TokenCache::new(600));
    authenticator
        .get_auth_token(&payout_credentials())
        .await
        .unwrap();
    authenticator
        .get_auth_token(&payout_credentials())
        .await
        .unwrap();
}
