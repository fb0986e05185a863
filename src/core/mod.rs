pub mod catalogue;
pub mod credits;
pub mod overlap;
pub mod prerequisites;
pub mod progress;
pub mod registration;
pub mod schedule;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{Course, ParsedSchedule, PendingCourse, RegisteredCourse};
pub use crate::domain::ports::{Clock, Storage};
pub use crate::utils::error::{RegistrationError, Result};
