pub mod error;
pub mod instrument;
pub mod logger;
pub mod validation;
