//! Payout (cashgram) request and response bodies.
//!
//! Field names follow the payout API's camelCase wire format.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /payout/v1/createCashgram`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCashgramRequest {
    /// Merchant-chosen unique cashgram ID.
    #[validate(length(min = 1, max = 50))]
    pub cashgram_id: String,
    /// Amount in rupees (minimum 1.00).
    #[validate(range(min = 1.0))]
    pub amount: f64,
    /// Recipient name.
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    /// Link expiry date, `YYYY/MM/DD`.
    #[validate(length(min = 1))]
    pub link_expiry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, with = "notify_flag")]
    pub notify_customer: bool,
}

/// Body of `POST /payout/v1/deactivateCashgram`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeactivateCashgramRequest {
    #[validate(length(min = 1))]
    pub cashgram_id: String,
}

/// Response of `POST /payout/v1/authorize`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeResponse {
    pub status: Option<String>,
    /// Returned as a string by the API, occasionally as a number.
    pub sub_code: Option<serde_json::Value>,
    pub message: Option<String>,
    pub data: Option<AuthorizeData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeData {
    pub token: Option<String>,
    /// Token expiry as unix epoch seconds.
    pub expiry: Option<i64>,
}

impl AuthorizeResponse {
    pub fn sub_code_text(&self) -> String {
        match &self.sub_code {
            Some(serde_json::Value::String(code)) => code.clone(),
            Some(other) => other.to_string(),
            None => "unknown".to_string(),
        }
    }
}

/// The payout API takes `notifyCustomer` as `1`/`0`.
mod notify_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Int(u8),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => value,
            Flag::Int(value) => value != 0,
        })
    }
}
