//! Search request assembly and execution
//!
//! Builds the validated request envelope, hands it to a search
//! collaborator, and shapes the collaborator's response for reporting.

mod executor;
mod models;

pub use executor::{from_settings, CommandExecutor, DryRunExecutor, SearchExecutor};
pub use models::*;
