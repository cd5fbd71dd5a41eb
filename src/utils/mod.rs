pub mod duration;

pub use duration::{band_hours, billable_hours};
