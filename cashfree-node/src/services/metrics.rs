//! Connector counters, recorded through the `metrics` facade.
//!
//! The host process installs the recorder/exporter; without one these are no-ops.

pub const PAYOUT_AUTHORIZE_TOTAL: &str = "cashfree_payout_authorize_total";
pub const PAYOUT_OPERATIONS_TOTAL: &str = "cashfree_payout_operations_total";
pub const GATEWAY_OPERATIONS_TOTAL: &str = "cashfree_gateway_operations_total";

/// Record one authorize exchange by outcome (`success`, `rejected`, `error`).
pub fn record_authorization(outcome: &'static str) {
    metrics::counter!(PAYOUT_AUTHORIZE_TOTAL, "outcome" => outcome).increment(1);
}

/// Record a payout operation (`createCashgram`, ...) by outcome.
pub fn record_payout_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        PAYOUT_OPERATIONS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a payment gateway pass-through call by outcome.
pub fn record_gateway_operation(operation: &'static str, outcome: &'static str) {
    metrics::counter!(
        GATEWAY_OPERATIONS_TOTAL,
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
