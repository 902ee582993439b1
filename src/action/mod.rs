//! Hosting pipeline integration
//!
//! Runs one resolve-and-search invocation and reports its outcome
//! through the pipeline's output and failure channels.

mod output;
mod runner;

pub use output::{escape_data, escape_property, ActionOutput, GithubActions};
pub use runner::{publish, run, Outcome, Report, UNKNOWN_ERROR_MESSAGE};
