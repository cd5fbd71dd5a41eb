pub mod booking_service;
pub mod ledger_service;
pub mod payment_service;
pub mod pricing_service;

pub use booking_service::*;
pub use ledger_service::*;
pub use payment_service::*;
pub use pricing_service::*;
