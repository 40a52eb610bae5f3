//! cashfree-node: Cashfree payment gateway and payout operations for
//! workflow automation hosts.
//!
//! The payout side authorizes every call with a bearer token obtained by
//! signing `<client_id>.<epoch>` with the account's RSA public key
//! (OAEP, SHA-1) and exchanging it at `/payout/v1/authorize`.
pub mod config;
pub mod error;
pub mod models;
pub mod node;
pub mod services;

pub use config::{Environment, NodeConfig, PaymentCredentials, PayoutAuth, PayoutCredentials};
pub use error::ConnectorError;
pub use node::{CashfreeNode, NodeOperation};
pub use services::{PaymentGatewayClient, PayoutAuthenticator, PayoutClient, TokenCache};
