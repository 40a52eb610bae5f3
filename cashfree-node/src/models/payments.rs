//! Payment gateway request bodies (orders, payment links, refunds).
//!
//! These are forwarded verbatim; responses are returned as raw JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Request to create a Cashfree order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    /// Merchant order ID; generated by Cashfree when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[validate(range(min = 1.0))]
    pub order_amount: f64,
    #[serde(default = "default_currency")]
    pub order_currency: String,
    #[validate(nested)]
    pub customer_details: CustomerDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_meta: Option<OrderMeta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
    /// ISO 8601 expiry time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_expiry_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_tags: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerDetails {
    #[validate(length(min = 1))]
    pub customer_id: String,
    #[validate(length(min = 1))]
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_methods: Option<String>,
}

/// Request to create a payment link.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePaymentLinkRequest {
    #[validate(length(min = 1))]
    pub link_id: String,
    #[validate(range(min = 1.0))]
    pub link_amount: f64,
    #[serde(default = "default_currency")]
    pub link_currency: String,
    #[validate(length(min = 1))]
    pub link_purpose: String,
    #[validate(nested)]
    pub customer_details: LinkCustomerDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_partial_payments: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_minimum_partial_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_expiry_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_notify: Option<LinkNotify>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_auto_reminders: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_notes: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_meta: Option<LinkMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LinkCustomerDetails {
    #[validate(length(min = 1))]
    pub customer_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkNotify {
    #[serde(default)]
    pub send_sms: bool,
    #[serde(default)]
    pub send_email: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_intent: Option<bool>,
}

/// Request to refund (part of) a paid order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRefundRequest {
    #[validate(range(min = 1.0))]
    pub refund_amount: f64,
    #[validate(length(min = 3, max = 40))]
    pub refund_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_speed: Option<RefundSpeed>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefundSpeed {
    Standard,
    Instant,
}

fn default_currency() -> String {
    "INR".to_string()
}
