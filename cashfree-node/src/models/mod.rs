pub mod payments;
pub mod payout;

pub use payments::{
    CreateOrderRequest, CreatePaymentLinkRequest, CreateRefundRequest, CustomerDetails,
    LinkCustomerDetails, LinkMeta, LinkNotify, OrderMeta, RefundSpeed,
};
pub use payout::{
    AuthorizeData, AuthorizeResponse, CreateCashgramRequest, DeactivateCashgramRequest,
};
