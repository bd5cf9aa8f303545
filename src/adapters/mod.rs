// Adapters layer: concrete Source implementations.

pub mod retry;
pub mod simulated;

pub use retry::{RetryConfig, RetryingSource};
pub use simulated::SimulatedSource;
