//! Search collaborators that execute a resolved request

use super::models::{ParsedRequest, SearchResponse};
use crate::config::ExecutorSettings;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

/// Executes a validated search request
///
/// Errors are reported to the caller unchanged.
#[async_trait]
pub trait SearchExecutor: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Run the search
    async fn execute(&self, request: &ParsedRequest) -> Result<SearchResponse>;
}

/// Build the executor described by the settings
pub fn from_settings(settings: &ExecutorSettings) -> Box<dyn SearchExecutor> {
    match settings.command {
        Some(ref command) if !command.is_empty() => Box::new(CommandExecutor::new(command.clone())),
        _ => Box::new(DryRunExecutor),
    }
}

/// Echoes the validated request envelope back as the response
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

#[async_trait]
impl SearchExecutor for DryRunExecutor {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn execute(&self, request: &ParsedRequest) -> Result<SearchResponse> {
        info!("Dry run: no search command configured, echoing request");
        Ok(SearchResponse::new(serde_json::to_value(request)?))
    }
}

/// Runs an external program: request JSON on stdin, response JSON on stdout
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    command: Vec<String>,
}

impl CommandExecutor {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

#[async_trait]
impl SearchExecutor for CommandExecutor {
    fn name(&self) -> &str {
        "command"
    }

    async fn execute(&self, request: &ParsedRequest) -> Result<SearchResponse> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| anyhow!("Search command is empty"))?;

        let envelope = serde_json::to_vec(request)?;

        info!(
            "Executing search on service '{}' via `{}`",
            request.service_name, program
        );

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start search command `{}`", program))?;

        // Feed stdin while draining stdout, or a streaming command blocks
        // on a full pipe once the envelope outgrows the pipe buffer
        let stdin = child.stdin.take();
        let feed = async move {
            if let Some(mut stdin) = stdin {
                match stdin.write_all(&envelope).await {
                    // A command may answer without reading its input
                    Err(e) if e.kind() != ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok(())
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        fed?;
        debug!(
            "Search command exited with {} ({} bytes of output)",
            output.status,
            output.stdout.len()
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Search command `{}` failed with {}: {}",
                program,
                output.status,
                stderr.trim()
            );
        }

        serde_json::from_slice(&output.stdout)
            .with_context(|| format!("Search command `{}` returned invalid JSON", program))
    }
}
