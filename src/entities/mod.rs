pub mod admin_package_assignments;
pub mod admin_payments;
pub mod bookings;
pub mod package_purchases;
pub mod packages;
pub mod pricing_calculations;
pub mod pricing_rules;
pub mod slots;
pub mod tutor_pricing_overrides;

pub use admin_package_assignments as assignment_entity;
pub use admin_payments as payment_entity;
pub use bookings as booking_entity;
pub use package_purchases as purchase_entity;
pub use packages as package_entity;
pub use pricing_calculations as calculation_entity;
pub use pricing_rules as rule_entity;
pub use slots as slot_entity;
pub use tutor_pricing_overrides as override_entity;

pub use admin_package_assignments::AssignmentStatus;
pub use admin_payments::{PaymentMethod, PaymentStatus};
pub use bookings::BookingStatus;
pub use pricing_rules::LessonType;
