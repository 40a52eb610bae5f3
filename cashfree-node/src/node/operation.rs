//! Resource/operation selector for one input item.
//!
//! Items arrive as JSON objects tagged with `resource` and `operation`, the
//! remaining keys being that operation's parameters. Parameter keys are
//! camelCase for every resource; request bodies nested under them keep the
//! upstream API's own field names.
//!
//! ```json
//! { "resource": "cashgram", "operation": "deactivate", "cashgramId": "CG_1" }
//! { "resource": "refund", "operation": "get", "orderId": "ord_1", "refundId": "rf_1" }
//! ```

use serde::Deserialize;

use crate::models::{CreateCashgramRequest, CreateOrderRequest, CreatePaymentLinkRequest, CreateRefundRequest};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "resource", rename_all = "camelCase")]
pub enum NodeOperation {
    Order(OrderOperation),
    PaymentLink(PaymentLinkOperation),
    Refund(RefundOperation),
    Cashgram(CashgramOperation),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum OrderOperation {
    Create(CreateOrderRequest),
    Get { order_id: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PaymentLinkOperation {
    Create(CreatePaymentLinkRequest),
    Get { link_id: String },
    Cancel { link_id: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RefundOperation {
    Create {
        order_id: String,
        refund: CreateRefundRequest,
    },
    Get {
        order_id: String,
        refund_id: String,
    },
    List {
        order_id: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CashgramOperation {
    Create(CreateCashgramRequest),
    Deactivate { cashgram_id: String },
    GetStatus { cashgram_id: String },
}

impl NodeOperation {
    /// `resource.operation`, for logs and error markers.
    pub fn name(&self) -> &'static str {
        match self {
            NodeOperation::Order(OrderOperation::Create(_)) => "order.create",
            NodeOperation::Order(OrderOperation::Get { .. }) => "order.get",
            NodeOperation::PaymentLink(PaymentLinkOperation::Create(_)) => "paymentLink.create",
            NodeOperation::PaymentLink(PaymentLinkOperation::Get { .. }) => "paymentLink.get",
            NodeOperation::PaymentLink(PaymentLinkOperation::Cancel { .. }) => "paymentLink.cancel",
            NodeOperation::Refund(RefundOperation::Create { .. }) => "refund.create",
            NodeOperation::Refund(RefundOperation::Get { .. }) => "refund.get",
            NodeOperation::Refund(RefundOperation::List { .. }) => "refund.list",
            NodeOperation::Cashgram(CashgramOperation::Create(_)) => "cashgram.create",
            NodeOperation::Cashgram(CashgramOperation::Deactivate { .. }) => "cashgram.deactivate",
            NodeOperation::Cashgram(CashgramOperation::GetStatus { .. }) => "cashgram.getStatus",
        }
    }
}
