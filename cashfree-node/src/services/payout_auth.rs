//! Payout bearer-token acquisition.
//!
//! Runs the signed exchange against `/payout/v1/authorize`, or hands back a
//! pre-issued token, depending on the configured [`PayoutAuth`] mode.

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use tracing::instrument;

use crate::config::{Environment, PayoutAuth, PayoutCredentials};
use crate::error::ConnectorError;
use crate::models::AuthorizeResponse;
use crate::services::metrics;
use crate::services::signature::{build_signing_subject, sign_subject};
use crate::services::token_cache::{CacheKey, TokenCache};

pub const CLIENT_ID_HEADER: &str = "X-Client-Id";
pub const CLIENT_SECRET_HEADER: &str = "X-Client-Secret";
pub const SIGNATURE_HEADER: &str = "X-Cf-Signature";
pub const AUTHORIZE_PATH: &str = "/payout/v1/authorize";

/// Trimmed, non-empty credential fields.
#[derive(Debug)]
pub struct ValidatedCredentials<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub public_key: &'a str,
}

/// Check `client_id`, `client_secret` and `public_key` in that order and
/// report the first one that is blank.
pub fn validate_credentials(
    credentials: &PayoutCredentials,
) -> Result<ValidatedCredentials<'_>, ConnectorError> {
    let client_id = credentials.client_id.trim();
    if client_id.is_empty() {
        return Err(ConnectorError::MissingCredential { field: "client_id" });
    }

    let client_secret = credentials.client_secret.expose_secret().trim();
    if client_secret.is_empty() {
        return Err(ConnectorError::MissingCredential {
            field: "client_secret",
        });
    }

    let public_key = credentials.public_key.expose_secret().trim();
    if public_key.is_empty() {
        return Err(ConnectorError::MissingCredential {
            field: "public_key",
        });
    }

    Ok(ValidatedCredentials {
        client_id,
        client_secret,
        public_key,
    })
}

#[derive(Clone)]
pub struct PayoutAuthenticator {
    client: Client,
    base_url: Option<String>,
    cache: Option<TokenCache>,
}

impl PayoutAuthenticator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            cache: None,
        }
    }

    /// Override the environment's payout host (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn with_token_cache(mut self, cache: TokenCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Drop any cached token for `auth`. Pre-issued tokens are never cached.
    pub async fn invalidate(&self, auth: &PayoutAuth) {
        if let (Some(cache), PayoutAuth::SignedExchange(credentials)) = (&self.cache, auth) {
            let key = CacheKey::new(credentials.environment, credentials.client_id.trim());
            cache.invalidate(&key).await;
            tracing::debug!(client_id = %key.client_id, "Invalidated cached payout token");
        }
    }

    pub fn base_url(&self, environment: Environment) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| environment.payout_base_url().to_string())
    }

    pub fn authorize_url(&self, environment: Environment) -> String {
        format!("{}{}", self.base_url(environment), AUTHORIZE_PATH)
    }

    /// Produce a bearer token for whichever auth mode is configured.
    pub async fn resolve_token(&self, auth: &PayoutAuth) -> Result<Secret<String>, ConnectorError> {
        match auth {
            PayoutAuth::PreIssuedToken { token, .. } => {
                let token = token.expose_secret().trim();
                if token.is_empty() {
                    return Err(ConnectorError::MissingCredential { field: "token" });
                }
                Ok(Secret::new(token.to_string()))
            }
            PayoutAuth::SignedExchange(credentials) => self.get_auth_token(credentials).await,
        }
    }

    /// Exchange client credentials and a fresh signature for a bearer token.
    ///
    /// Credentials are validated before anything touches the network. With a
    /// token cache attached, a still-valid token for the same client and
    /// environment is returned without a new exchange.
    #[instrument(
        skip(self, credentials),
        fields(client_id = %credentials.client_id.trim(), environment = ?credentials.environment)
    )]
    pub async fn get_auth_token(
        &self,
        credentials: &PayoutCredentials,
    ) -> Result<Secret<String>, ConnectorError> {
        let validated = validate_credentials(credentials)?;
        let key = CacheKey::new(credentials.environment, validated.client_id);

        if let Some(cache) = &self.cache {
            if let Some(token) = cache.get(&key).await {
                tracing::debug!("Using cached payout token");
                return Ok(token);
            }
        }

        let (token, expiry) = self.exchange(&validated, credentials.environment).await?;

        if let Some(cache) = &self.cache {
            cache.insert(key, token.clone(), expiry).await;
        }

        Ok(token)
    }

    async fn exchange(
        &self,
        credentials: &ValidatedCredentials<'_>,
        environment: Environment,
    ) -> Result<(Secret<String>, Option<i64>), ConnectorError> {
        let subject = build_signing_subject(credentials.client_id);
        let signature = sign_subject(&subject, credentials.public_key)?;

        let url = self.authorize_url(environment);

        let response = self
            .client
            .post(&url)
            .header(CLIENT_ID_HEADER, credentials.client_id)
            .header(CLIENT_SECRET_HEADER, credentials.client_secret)
            .header(SIGNATURE_HEADER, signature)
            .send()
            .await
            .map_err(|e| {
                metrics::record_authorization("error");
                tracing::error!(error = %e, url = %url, "Payout authorize request failed to send");
                ConnectorError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            metrics::record_authorization("rejected");
            tracing::error!(status = %status, "Payout authorization rejected");
            return Err(ConnectorError::Authorization(format!(
                "authorize returned status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let result = interpret_authorize_body(&body);
        match &result {
            Ok(_) => {
                metrics::record_authorization("success");
                tracing::info!("Payout token obtained");
            }
            Err(e) => {
                metrics::record_authorization("rejected");
                tracing::error!(error = %e, "Payout authorization failed");
            }
        }
        result
    }
}

/// Map a 2xx authorize body to a token (and its expiry, if given).
fn interpret_authorize_body(body: &str) -> Result<(Secret<String>, Option<i64>), ConnectorError> {
    let parsed: Option<AuthorizeResponse> = serde_json::from_str(body).ok();

    match parsed {
        Some(response) if response.status.as_deref() == Some("SUCCESS") => {
            let data = response.data.as_ref();
            match data.and_then(|d| d.token.as_deref()).filter(|t| !t.is_empty()) {
                Some(token) => Ok((
                    Secret::new(token.to_string()),
                    data.and_then(|d| d.expiry),
                )),
                None => Err(ConnectorError::Authorization(format!(
                    "unexpected authorize response: {}",
                    body
                ))),
            }
        }
        Some(response) if response.status.as_deref() == Some("ERROR") => {
            Err(ConnectorError::Authorization(format!(
                "Cashfree API error: {} (subCode: {})",
                response.message.as_deref().unwrap_or("no message"),
                response.sub_code_text()
            )))
        }
        _ => Err(ConnectorError::Authorization(format!(
            "unexpected authorize response: {}",
            body
        ))),
    }
}
