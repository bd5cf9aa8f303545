pub mod engine;
pub mod ingestion;
pub mod pipeline;
pub mod processors;

pub use crate::domain::model::{Dataset, Record};
pub use crate::domain::ports::{Source, Step};
pub use crate::utils::error::Result;
