#![allow(dead_code)]

use cashfree_node::config::{NodeConfig, TokenCacheConfig, DEFAULT_API_VERSION};
use cashfree_node::models::CreateCashgramRequest;
use cashfree_node::{CashfreeNode, Environment, PaymentCredentials, PayoutAuth, PayoutCredentials};
use rsa::pkcs8::{EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::HttpConfig;
use std::sync::OnceLock;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLIENT_ID: &str = "CF_TEST_CLIENT";
pub const TEST_CLIENT_SECRET: &str = "cf_test_secret";
pub const TEST_TOKEN: &str = "abc123";
pub const TEST_APP_ID: &str = "app_test_123";
pub const TEST_SECRET_KEY: &str = "pg_test_secret";

pub struct TestKeys {
    pub private_key: RsaPrivateKey,
    pub public_pem: String,
}

/// One RSA key pair per test binary.
pub fn test_keys() -> &'static TestKeys {
    static KEYS: OnceLock<TestKeys> = OnceLock::new();
    KEYS.get_or_init(|| {
        let mut rng = rand::thread_rng();
        let private_key = RsaPrivateKey::new(&mut rng, 1024).expect("Failed to generate RSA key");
        let public_pem = private_key
            .to_public_key()
            .to_public_key_pem(LineEnding::LF)
            .expect("Failed to encode public key");
        TestKeys {
            private_key,
            public_pem,
        }
    })
}

pub fn init_tracing() {
    service_core::observability::init_test_tracing();
}

pub fn payout_credentials() -> PayoutCredentials {
    PayoutCredentials {
        client_id: TEST_CLIENT_ID.to_string(),
        client_secret: Secret::new(TEST_CLIENT_SECRET.to_string()),
        public_key: Secret::new(test_keys().public_pem.clone()),
        environment: Environment::Sandbox,
    }
}

pub fn signed_auth() -> PayoutAuth {
    PayoutAuth::SignedExchange(payout_credentials())
}

pub fn payment_credentials() -> PaymentCredentials {
    PaymentCredentials {
        app_id: TEST_APP_ID.to_string(),
        secret_key: Secret::new(TEST_SECRET_KEY.to_string()),
        api_version: DEFAULT_API_VERSION.to_string(),
        environment: Environment::Sandbox,
    }
}

pub fn cashgram_request(cashgram_id: &str) -> CreateCashgramRequest {
    CreateCashgramRequest {
        cashgram_id: cashgram_id.to_string(),
        amount: 10.0,
        name: "Asha Rao".to_string(),
        email: "asha@example.com".to_string(),
        phone: "9999999999".to_string(),
        link_expiry: "2030/12/31".to_string(),
        remarks: Some("sample cashgram".to_string()),
        notify_customer: true,
    }
}

pub fn cashgram_body(cashgram_id: &str) -> Value {
    json!({
        "cashgramId": cashgram_id,
        "amount": 10.0,
        "name": "Asha Rao",
        "email": "asha@example.com",
        "phone": "9999999999",
        "linkExpiry": "2030/12/31",
        "remarks": "sample cashgram",
        "notifyCustomer": 1
    })
}

pub fn authorize_success(token: &str) -> Value {
    json!({
        "status": "SUCCESS",
        "subCode": "200",
        "message": "Token generated",
        "data": { "token": token, "expiry": chrono::Utc::now().timestamp() + 600 }
    })
}

/// Mount a successful authorize endpoint that checks the credential headers.
pub async fn mount_authorize(server: &MockServer, token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/payout/v1/authorize"))
        .and(header("X-Client-Id", TEST_CLIENT_ID))
        .and(header("X-Client-Secret", TEST_CLIENT_SECRET))
        .and(header_exists("X-Cf-Signature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(authorize_success(token)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Paths of every request the server saw, in arrival order.
pub async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

/// Last value of header `name` on each request the server saw for `path`.
pub async fn received_header(server: &MockServer, path: &str, name: &str) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == path)
        .filter_map(|request| {
            request
                .headers
                .iter()
                .find(|(header, _)| header.as_str().eq_ignore_ascii_case(name))
                .map(|(_, values)| values.last().as_str().to_string())
        })
        .collect()
}

pub fn node_config(payout: Option<PayoutAuth>, payments: Option<PaymentCredentials>) -> NodeConfig {
    NodeConfig {
        payout,
        payments,
        http: HttpConfig {
            connect_timeout_secs: 5,
            request_timeout_secs: 10,
        },
        token_cache: TokenCacheConfig::default(),
        service_name: "cashfree-node-test".to_string(),
        log_level: "debug".to_string(),
    }
}

/// A node whose payout and gateway calls both go to `server`.
pub fn spawn_node(server: &MockServer, config: NodeConfig) -> CashfreeNode {
    CashfreeNode::new(config)
        .expect("Failed to build node")
        .with_base_urls(&server.uri(), &format!("{}/pg", server.uri()))
}
