pub mod bookings;
pub mod payments;
pub mod pricing;

pub use bookings::*;
pub use payments::*;
pub use pricing::*;
