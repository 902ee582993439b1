//! Cortex Search action: resolves search parameters from action inputs
//! and environment variables, validates them into a typed request, and
//! hands that request to a search collaborator.
//!
//! Parameters are read from the primary source (action inputs) and, when
//! blank there, from the fallback source (the process environment).

pub mod action;
pub mod config;
pub mod params;
pub mod search;

pub use action::{run, ActionOutput, GithubActions, Outcome};
pub use config::Settings;
pub use params::{ActionInputs, EnvSource, MapSource, ParamSource, Parameter, ResolveError, Sources};
pub use search::{ParsedRequest, ResultPayload, SearchExecutor, SearchResponse};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
