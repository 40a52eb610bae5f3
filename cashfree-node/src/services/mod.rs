pub mod metrics;
pub mod payments;
pub mod payout;
pub mod payout_auth;
pub mod signature;
pub mod token_cache;

pub use payments::PaymentGatewayClient;
pub use payout::PayoutClient;
pub use payout_auth::PayoutAuthenticator;
pub use signature::{build_signing_subject, sign_subject};
pub use token_cache::TokenCache;
