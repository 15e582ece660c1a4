//! Built-in risk factors.

pub mod account_age;
pub mod complaints;
pub mod time_of_day;
pub mod zone;

pub use account_age::AccountAgeFactor;
pub use complaints::ComplaintFactor;
pub use time_of_day::TimeOfDayFactor;
pub use zone::ZoneFactor;
