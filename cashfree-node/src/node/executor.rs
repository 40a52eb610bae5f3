//! Batch execution of node operations.
//!
//! Items run strictly one after another: each item's authorize-then-invoke
//! cycle completes before the next starts, so output order always matches
//! input order. With `continue_on_fail` a failed item becomes
//! `{"error": "<message>"}`; without it the first failure aborts the batch.

use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::http::build_client;

use crate::config::{NodeConfig, PaymentCredentials, PayoutAuth};
use crate::error::ConnectorError;
use crate::node::operation::{
    CashgramOperation, NodeOperation, OrderOperation, PaymentLinkOperation, RefundOperation,
};
use crate::services::{PaymentGatewayClient, PayoutClient, TokenCache};

#[derive(Clone)]
pub struct CashfreeNode {
    payouts: PayoutClient,
    payments: PaymentGatewayClient,
    payout_auth: Option<PayoutAuth>,
    payment_credentials: Option<PaymentCredentials>,
}

impl CashfreeNode {
    pub fn new(config: NodeConfig) -> Result<Self, AppError> {
        let user_agent = format!("{}/{}", config.service_name, env!("CARGO_PKG_VERSION"));
        let client = build_client(&config.http, &user_agent)?;

        let mut payouts = PayoutClient::new(client.clone());
        if config.token_cache.enabled {
            tracing::info!(
                ttl_secs = config.token_cache.ttl_secs,
                "Payout token cache enabled"
            );
            payouts = payouts.with_token_cache(TokenCache::new(config.token_cache.ttl_secs));
        }

        match &config.payout {
            Some(auth @ PayoutAuth::PreIssuedToken { .. }) => {
                tracing::info!(environment = ?auth.environment(), "Payouts use a pre-issued token")
            }
            Some(auth @ PayoutAuth::SignedExchange(_)) => {
                tracing::info!(environment = ?auth.environment(), "Payouts use signed token exchange")
            }
            None => tracing::warn!("Payout credentials not configured - cashgram operations disabled"),
        }

        if let Some(payments) = &config.payments {
            tracing::info!(
                environment = ?payments.environment,
                api_version = %payments.api_version,
                "Payment gateway configured"
            );
        } else {
            tracing::warn!("Payment gateway credentials not configured - order, link and refund operations disabled");
        }

        Ok(Self {
            payouts,
            payments: PaymentGatewayClient::new(client),
            payout_auth: config.payout,
            payment_credentials: config.payments,
        })
    }

    /// Send payout and gateway calls to the given base URLs instead of the
    /// environment's hosts.
    pub fn with_base_urls(mut self, payout_base: &str, gateway_base: &str) -> Self {
        self.payouts = self.payouts.with_base_url(payout_base);
        self.payments = self.payments.with_base_url(gateway_base);
        self
    }

    /// Run every item in order.
    pub async fn execute(
        &self,
        items: &[Value],
        continue_on_fail: bool,
    ) -> Result<Vec<Value>, ConnectorError> {
        let mut results = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            match self.execute_item(item).await {
                Ok(result) => results.push(result),
                Err(e) if continue_on_fail => {
                    tracing::warn!(item = index, error = %e, "Item failed, continuing");
                    results.push(json!({ "error": e.to_string() }));
                }
                Err(e) => {
                    tracing::error!(item = index, error = %e, "Item failed, aborting batch");
                    return Err(e);
                }
            }
        }

        Ok(results)
    }

    async fn execute_item(&self, item: &Value) -> Result<Value, ConnectorError> {
        let operation = NodeOperation::deserialize_item(item)?;
        self.run(&operation).await
    }

    /// Run a single operation.
    pub async fn run(&self, operation: &NodeOperation) -> Result<Value, ConnectorError> {
        tracing::debug!(operation = operation.name(), "Running operation");

        match operation {
            NodeOperation::Cashgram(op) => {
                let auth = self.payout_auth()?;
                match op {
                    CashgramOperation::Create(request) => {
                        self.payouts.create_cashgram(auth, request).await
                    }
                    CashgramOperation::Deactivate { cashgram_id } => {
                        self.payouts.deactivate_cashgram(auth, cashgram_id).await
                    }
                    CashgramOperation::GetStatus { cashgram_id } => {
                        self.payouts.get_cashgram_status(auth, cashgram_id).await
                    }
                }
            }
            NodeOperation::Order(op) => {
                let credentials = self.payment_credentials()?;
                match op {
                    OrderOperation::Create(request) => {
                        self.payments.create_order(credentials, request).await
                    }
                    OrderOperation::Get { order_id } => {
                        self.payments.get_order(credentials, order_id).await
                    }
                }
            }
            NodeOperation::PaymentLink(op) => {
                let credentials = self.payment_credentials()?;
                match op {
                    PaymentLinkOperation::Create(request) => {
                        self.payments.create_payment_link(credentials, request).await
                    }
                    PaymentLinkOperation::Get { link_id } => {
                        self.payments.get_payment_link(credentials, link_id).await
                    }
                    PaymentLinkOperation::Cancel { link_id } => {
                        self.payments.cancel_payment_link(credentials, link_id).await
                    }
                }
            }
            NodeOperation::Refund(op) => {
                let credentials = self.payment_credentials()?;
                match op {
                    RefundOperation::Create { order_id, refund } => {
                        self.payments
                            .create_refund(credentials, order_id, refund)
                            .await
                    }
                    RefundOperation::Get {
                        order_id,
                        refund_id,
                    } => {
                        self.payments
                            .get_refund(credentials, order_id, refund_id)
                            .await
                    }
                    RefundOperation::List { order_id } => {
                        self.payments.list_refunds(credentials, order_id).await
                    }
                }
            }
        }
    }

    fn payout_auth(&self) -> Result<&PayoutAuth, ConnectorError> {
        self.payout_auth.as_ref().ok_or_else(|| {
            ConnectorError::Config("payout credentials are not configured".to_string())
        })
    }

    fn payment_credentials(&self) -> Result<&PaymentCredentials, ConnectorError> {
        self.payment_credentials.as_ref().ok_or_else(|| {
            ConnectorError::Config("payment gateway credentials are not configured".to_string())
        })
    }
}

impl NodeOperation {
    /// Parse one input item; malformed items are request errors.
    pub fn deserialize_item(item: &Value) -> Result<Self, ConnectorError> {
        serde_json::from_value(item.clone())
            .map_err(|e| ConnectorError::InvalidRequest(format!("invalid item: {}", e)))
    }
}
