pub mod executor;
pub mod operation;

pub use executor::CashfreeNode;
pub use operation::{
    CashgramOperation, NodeOperation, OrderOperation, PaymentLinkOperation, RefundOperation,
};
