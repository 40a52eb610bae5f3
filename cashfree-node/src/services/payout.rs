//! Cashgram payout client.
//!
//! Every call authorizes first (signed exchange, pre-issued token, or a
//! still-valid cached token) and then hits the payout endpoint with
//! `Authorization: Bearer <token>`. Responses are returned unchanged.

use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use tracing::instrument;
use validator::Validate;

use crate::config::{Environment, PayoutAuth};
use crate::error::ConnectorError;
use crate::models::{CreateCashgramRequest, DeactivateCashgramRequest};
use crate::services::metrics;
use crate::services::payout_auth::PayoutAuthenticator;
use crate::services::token_cache::TokenCache;

pub const CREATE_CASHGRAM_PATH: &str = "/payout/v1/createCashgram";
pub const DEACTIVATE_CASHGRAM_PATH: &str = "/payout/v1/deactivateCashgram";
pub const CASHGRAM_STATUS_PATH: &str = "/payout/v1/getCashgramStatus";

#[derive(Clone)]
pub struct PayoutClient {
    client: Client,
    authenticator: PayoutAuthenticator,
    base_url: Option<String>,
}

impl PayoutClient {
    pub fn new(client: Client) -> Self {
        Self {
            authenticator: PayoutAuthenticator::new(client.clone()),
            client,
            base_url: None,
        }
    }

    /// Point both the authorize call and the payout calls at `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        self.authenticator = self.authenticator.with_base_url(base_url.clone());
        self.base_url = Some(base_url);
        self
    }

    pub fn with_token_cache(mut self, cache: TokenCache) -> Self {
        self.authenticator = self.authenticator.with_token_cache(cache);
        self
    }

    pub fn endpoint_url(&self, environment: Environment, path: &str) -> String {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| environment.payout_base_url());
        format!("{}{}", base, path)
    }

    /// Create a cashgram.
    #[instrument(skip(self, auth, request), fields(cashgram_id = %request.cashgram_id))]
    pub async fn create_cashgram(
        &self,
        auth: &PayoutAuth,
        request: &CreateCashgramRequest,
    ) -> Result<Value, ConnectorError> {
        request.validate()?;

        let token = self.authenticator.resolve_token(auth).await?;
        let url = self.endpoint_url(auth.environment(), CREATE_CASHGRAM_PATH);

        let response = self
            .send_authorized(
                "createCashgram",
                auth,
                self.client.post(&url).json(request),
                &token,
            )
            .await?;

        tracing::info!(
            cashgram_id = %request.cashgram_id,
            amount = request.amount,
            "Cashgram created"
        );
        Ok(response)
    }

    /// Deactivate a cashgram so its link can no longer be redeemed.
    #[instrument(skip(self, auth))]
    pub async fn deactivate_cashgram(
        &self,
        auth: &PayoutAuth,
        cashgram_id: &str,
    ) -> Result<Value, ConnectorError> {
        let request = DeactivateCashgramRequest {
            cashgram_id: cashgram_id.trim().to_string(),
        };
        request.validate()?;

        let token = self.authenticator.resolve_token(auth).await?;
        let url = self.endpoint_url(auth.environment(), DEACTIVATE_CASHGRAM_PATH);

        let response = self
            .send_authorized(
                "deactivateCashgram",
                auth,
                self.client.post(&url).json(&request),
                &token,
            )
            .await?;

        tracing::info!(cashgram_id = %request.cashgram_id, "Cashgram deactivated");
        Ok(response)
    }

    /// Fetch the current status of a cashgram.
    #[instrument(skip(self, auth))]
    pub async fn get_cashgram_status(
        &self,
        auth: &PayoutAuth,
        cashgram_id: &str,
    ) -> Result<Value, ConnectorError> {
        let cashgram_id = cashgram_id.trim();
        if cashgram_id.is_empty() {
            return Err(ConnectorError::InvalidRequest(
                "cashgramId must not be empty".to_string(),
            ));
        }

        let token = self.authenticator.resolve_token(auth).await?;
        let url = self.endpoint_url(auth.environment(), CASHGRAM_STATUS_PATH);

        self.send_authorized(
            "getCashgramStatus",
            auth,
            self.client.get(&url).query(&[("cashgramId", cashgram_id)]),
            &token,
        )
        .await
    }

    async fn send_authorized(
        &self,
        operation: &'static str,
        auth: &PayoutAuth,
        request: RequestBuilder,
        token: &Secret<String>,
    ) -> Result<Value, ConnectorError> {
        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                metrics::record_payout_operation(operation, "error");
                tracing::error!(error = %e, operation, "Payout request failed to send");
                ConnectorError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, operation, "Payout response received");

        if status == StatusCode::UNAUTHORIZED {
            self.authenticator.invalidate(auth).await;
        }

        if !status.is_success() {
            metrics::record_payout_operation(operation, "failed");
            tracing::error!(status = %status, operation, "Payout operation failed");
            return Err(ConnectorError::Operation {
                operation,
                status: status.as_u16(),
                body,
            });
        }

        metrics::record_payout_operation(operation, "success");
        Ok(serde_json::from_str(&body)?)
    }
}
