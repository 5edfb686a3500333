pub mod executor;

pub use executor::{OrchestrationError, PurchaseExecutor, TickOutcome};
