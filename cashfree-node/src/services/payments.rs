//! Cashfree payment gateway client.
//!
//! Orders, payment links and refunds. Each call carries the app credentials
//! and API version as headers and forwards the body as-is; the upstream JSON
//! is returned unchanged.

use reqwest::{Client, RequestBuilder, Url};
use secrecy::ExposeSecret;
use serde_json::Value;
use service_core::http::{new_request_id, REQUEST_ID_HEADER};
use tracing::instrument;
use validator::Validate;

use crate::config::PaymentCredentials;
use crate::error::ConnectorError;
use crate::models::{CreateOrderRequest, CreatePaymentLinkRequest, CreateRefundRequest};
use crate::services::metrics;

pub const CLIENT_ID_HEADER: &str = "x-client-id";
pub const CLIENT_SECRET_HEADER: &str = "x-client-secret";
pub const API_VERSION_HEADER: &str = "x-api-version";

/// Payment gateway client for orders, payment links and refunds.
#[derive(Clone)]
pub struct PaymentGatewayClient {
    client: Client,
    base_url: Option<String>,
}

impl PaymentGatewayClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Override the environment's gateway base URL (used against mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Resolve `segments` under the gateway base. Each segment is
    /// percent-encoded on its own, so an ID can never add path levels or a
    /// query string.
    pub fn endpoint_url(
        &self,
        credentials: &PaymentCredentials,
        segments: &[&str],
    ) -> Result<Url, ConnectorError> {
        let base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| credentials.environment.payment_gateway_base_url());

        let mut url = Url::parse(base)
            .map_err(|e| ConnectorError::Config(format!("invalid gateway base URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| ConnectorError::Config(format!("gateway base URL {} cannot take a path", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Create a new order.
    #[instrument(skip(self, credentials, request), fields(amount = request.order_amount))]
    pub async fn create_order(
        &self,
        credentials: &PaymentCredentials,
        request: &CreateOrderRequest,
    ) -> Result<Value, ConnectorError> {
        request.validate()?;
        let url = self.endpoint_url(credentials, &["orders"])?;
        self.send("createOrder", credentials, self.client.post(url).json(request))
            .await
    }

    /// Fetch an existing order by ID.
    #[instrument(skip(self, credentials))]
    pub async fn get_order(
        &self,
        credentials: &PaymentCredentials,
        order_id: &str,
    ) -> Result<Value, ConnectorError> {
        let order_id = require_id("order_id", order_id)?;
        let url = self.endpoint_url(credentials, &["orders", order_id])?;
        self.send("getOrder", credentials, self.client.get(url)).await
    }

    /// Create a payment link.
    #[instrument(skip(self, credentials, request), fields(link_id = %request.link_id))]
    pub async fn create_payment_link(
        &self,
        credentials: &PaymentCredentials,
        request: &CreatePaymentLinkRequest,
    ) -> Result<Value, ConnectorError> {
        request.validate()?;
        let url = self.endpoint_url(credentials, &["links"])?;
        self.send(
            "createPaymentLink",
            credentials,
            self.client.post(url).json(request),
        )
        .await
    }

    #[instrument(skip(self, credentials))]
    pub async fn get_payment_link(
        &self,
        credentials: &PaymentCredentials,
        link_id: &str,
    ) -> Result<Value, ConnectorError> {
        let link_id = require_id("link_id", link_id)?;
        let url = self.endpoint_url(credentials, &["links", link_id])?;
        self.send("getPaymentLink", credentials, self.client.get(url))
            .await
    }

    #[instrument(skip(self, credentials))]
    pub async fn cancel_payment_link(
        &self,
        credentials: &PaymentCredentials,
        link_id: &str,
    ) -> Result<Value, ConnectorError> {
        let link_id = require_id("link_id", link_id)?;
        let url = self.endpoint_url(credentials, &["links", link_id, "cancel"])?;
        self.send("cancelPaymentLink", credentials, self.client.post(url))
            .await
    }

    /// Refund (part of) a paid order.
    #[instrument(skip(self, credentials, request), fields(refund_id = %request.refund_id))]
    pub async fn create_refund(
        &self,
        credentials: &PaymentCredentials,
        order_id: &str,
        request: &CreateRefundRequest,
    ) -> Result<Value, ConnectorError> {
        let order_id = require_id("order_id", order_id)?;
        request.validate()?;
        let url = self.endpoint_url(credentials, &["orders", order_id, "refunds"])?;
        self.send(
            "createRefund",
            credentials,
            self.client.post(url).json(request),
        )
        .await
    }

    #[instrument(skip(self, credentials))]
    pub async fn get_refund(
        &self,
        credentials: &PaymentCredentials,
        order_id: &str,
        refund_id: &str,
    ) -> Result<Value, ConnectorError> {
        let order_id = require_id("order_id", order_id)?;
        let refund_id = require_id("refund_id", refund_id)?;
        let url = self.endpoint_url(credentials, &["orders", order_id, "refunds", refund_id])?;
        self.send("getRefund", credentials, self.client.get(url))
            .await
    }

    #[instrument(skip(self, credentials))]
    pub async fn list_refunds(
        &self,
        credentials: &PaymentCredentials,
        order_id: &str,
    ) -> Result<Value, ConnectorError> {
        let order_id = require_id("order_id", order_id)?;
        let url = self.endpoint_url(credentials, &["orders", order_id, "refunds"])?;
        self.send("listRefunds", credentials, self.client.get(url))
            .await
    }

    async fn send(
        &self,
        operation: &'static str,
        credentials: &PaymentCredentials,
        request: RequestBuilder,
    ) -> Result<Value, ConnectorError> {
        let app_id = credentials.app_id.trim();
        if app_id.is_empty() {
            return Err(ConnectorError::MissingCredential { field: "app_id" });
        }
        let secret_key = credentials.secret_key.expose_secret().trim();
        if secret_key.is_empty() {
            return Err(ConnectorError::MissingCredential {
                field: "secret_key",
            });
        }

        let request_id = new_request_id();

        let response = request
            .header(CLIENT_ID_HEADER, app_id)
            .header(CLIENT_SECRET_HEADER, secret_key)
            .header(API_VERSION_HEADER, credentials.api_version.as_str())
            .header(REQUEST_ID_HEADER, request_id.as_str())
            .send()
            .await
            .map_err(|e| {
                metrics::record_gateway_operation(operation, "error");
                tracing::error!(error = %e, operation, request_id = %request_id, "Gateway request failed to send");
                ConnectorError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, operation, request_id = %request_id, "Gateway response received");

        if status.is_success() {
            metrics::record_gateway_operation(operation, "success");
            Ok(serde_json::from_str(&body)?)
        } else {
            metrics::record_gateway_operation(operation, "failed");
            tracing::error!(
                status = %status,
                operation,
                request_id = %request_id,
                "Gateway operation failed"
            );
            Err(ConnectorError::Operation {
                operation,
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn require_id<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ConnectorError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConnectorError::InvalidRequest(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, DEFAULT_API_VERSION};
    use secrecy::Secret;

    fn credentials(environment: Environment) -> PaymentCredentials {
        PaymentCredentials {
            app_id: "app_123".to_string(),
            secret_key: Secret::new("secret_456".to_string()),
            api_version: DEFAULT_API_VERSION.to_string(),
            environment,
        }
    }

    #[test]
    fn test_endpoint_url_per_environment() {
        let client = PaymentGatewayClient::new(Client::new());
        assert_eq!(
            client
                .endpoint_url(&credentials(Environment::Sandbox), &["orders", "ord_1"])
                .unwrap()
                .as_str(),
            "https://sandbox.cashfree.com/pg/orders/ord_1"
        );
        assert_eq!(
            client
                .endpoint_url(&credentials(Environment::Production), &["orders", "ord_1"])
                .unwrap()
                .as_str(),
            "https://api.cashfree.com/pg/orders/ord_1"
        );
    }

    #[test]
    fn test_endpoint_url_escapes_ids() {
        let client = PaymentGatewayClient::new(Client::new()).with_base_url("http://127.0.0.1:9000/pg/");
        let creds = credentials(Environment::Sandbox);

        let url = client
            .endpoint_url(&creds, &["orders", "ord_1/refunds/ref_9"])
            .unwrap();
        assert_eq!(url.path(), "/pg/orders/ord_1%2Frefunds%2Fref_9");

        let url = client.endpoint_url(&creds, &["orders", "ord_2?x=1"]).unwrap();
        assert_eq!(url.path(), "/pg/orders/ord_2%3Fx=1");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        let client = PaymentGatewayClient::new(Client::new()).with_base_url("not a url");
        assert!(matches!(
            client.endpoint_url(&credentials(Environment::Sandbox), &["orders"]),
            Err(ConnectorError::Config(_))
        ));
    }

    #[test]
    fn test_require_id() {
        assert_eq!(require_id("order_id", " ord_1 ").unwrap(), "ord_1");
        assert!(matches!(
            require_id("order_id", "  "),
            Err(ConnectorError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_app_credentials() {
        let client = PaymentGatewayClient::new(Client::new()).with_base_url("http://127.0.0.1:1");
        let mut creds = credentials(Environment::Sandbox);
        creds.secret_key = Secret::new(" ".to_string());

        assert!(matches!(
            client.get_order(&creds, "ord_1").await,
            Err(ConnectorError::MissingCredential {
                field: "secret_key"
            })
        ));
    }
}
