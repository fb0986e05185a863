pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::session::{Session, SessionReport};
pub use config::cli::LocalStorage;
pub use config::toml_config::SessionConfig;
pub use crate::core::{
    catalogue::{Catalogue, CourseQuery},
    prerequisites::CompletedCourses,
    registration::RegistrationEngine,
};
pub use utils::error::{RegistrarError, RegistrationError, Result};
