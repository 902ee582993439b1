//! Top-level orchestration: resolve, execute once, report

use super::output::ActionOutput;
use crate::config::ResolverSettings;
use crate::params::Sources;
use crate::search::{ParsedRequest, ResultPayload, SearchExecutor};
use std::io::{self, Write};
use tracing::{error, info};

/// Failure message used when an error carries no text
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error when running Cortex Search";

/// Result of one action invocation
#[derive(Debug)]
pub enum Outcome {
    Success(Report),
    Failure {
        /// Human-readable message for the pipeline failure signal
        message: String,
        /// Full error chain for diagnostics
        detail: String,
    },
}

/// Everything needed to report a successful search
#[derive(Debug)]
pub struct Report {
    pub request: ParsedRequest,
    pub payload: ResultPayload,
    pub pretty_json: String,
    pub compact_json: String,
}

impl Report {
    /// Console lines: banner, service, limit, optional fields, then the payload
    pub fn console_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "Cortex Search succeeded ✅".to_string(),
            format!("Service: {}", self.request.service_name),
            format!("Limit: {}", self.request.limit),
        ];
        if let Some(fields) = self.request.non_empty_fields() {
            lines.push(format!("Fields: {}", fields.join(", ")));
        }
        lines.push(format!("Response JSON: {}", self.pretty_json));
        lines
    }
}

/// Resolve the request, run the search once, and shape the payload
///
/// Never fails: every error becomes [`Outcome::Failure`].
pub async fn run(
    sources: &Sources<'_>,
    settings: &ResolverSettings,
    executor: &dyn SearchExecutor,
) -> Outcome {
    match try_run(sources, settings, executor).await {
        Ok(report) => Outcome::Success(report),
        Err(e) => {
            error!("Cortex Search failed: {:#}", e);
            let message = e.to_string();
            Outcome::Failure {
                message: if message.trim().is_empty() {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                } else {
                    message
                },
                detail: format!("{:?}", e),
            }
        }
    }
}

async fn try_run(
    sources: &Sources<'_>,
    settings: &ResolverSettings,
    executor: &dyn SearchExecutor,
) -> anyhow::Result<Report> {
    let request = ParsedRequest::resolve(sources, settings)?;

    info!(
        "Searching service '{}' (limit {}) with {} executor",
        request.service_name,
        request.limit,
        executor.name()
    );
    let response = executor.execute(&request).await?;

    let payload = ResultPayload::new(request.query.clone(), response);
    let pretty_json = payload.to_pretty_json()?;
    let compact_json = payload.to_compact_json()?;

    Ok(Report {
        request,
        payload,
        pretty_json,
        compact_json,
    })
}

/// Report an outcome to the console and the hosting pipeline
///
/// Success prints the report to `console` and publishes the compact
/// payload as `output_name`. Failure raises the pipeline failure signal,
/// then prints the banner and detail to `errors`.
pub fn publish(
    outcome: &Outcome,
    output: &mut dyn ActionOutput,
    output_name: &str,
    console: &mut dyn Write,
    errors: &mut dyn Write,
) -> io::Result<()> {
    match outcome {
        Outcome::Success(report) => {
            for line in report.console_lines() {
                writeln!(console, "{}", line)?;
            }
            if let Err(e) = output.set_output(output_name, &report.compact_json) {
                error!("Failed to publish output '{}': {:#}", output_name, e);
                writeln!(errors, "Cortex Search failed:")?;
                writeln!(errors, "{:?}", e)?;
                output.set_failed(&e.to_string());
            }
        }
        Outcome::Failure { message, detail } => {
            output.set_failed(message);
            writeln!(errors, "Cortex Search failed:")?;
            writeln!(errors, "{}", detail)?;
        }
    }
    Ok(())
}
