pub mod calculations;
pub mod config;
pub mod error;
pub mod models;

pub use config::TaxYearRegistry;
pub use error::{CalculationError, ConfigurationError, ValidationError};
pub use models::*;
