//! Reporting outputs and failures to the hosting pipeline

use crate::params::ParamSource;
use anyhow::{bail, Context, Result};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Write side of the hosting pipeline
pub trait ActionOutput {
    /// Publish a named output value
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;

    /// Mark the step as failed with a human-readable message
    fn set_failed(&mut self, message: &str);
}

/// GitHub Actions runner integration
///
/// Outputs go to the file named by `GITHUB_OUTPUT`, or to the legacy
/// `::set-output` workflow command when that variable is unset.
pub struct GithubActions<W: Write = io::Stdout> {
    output_file: Option<PathBuf>,
    stdout: W,
    failed: bool,
}

impl GithubActions {
    /// Configure from the runner environment, writing commands to stdout
    pub fn from_env(env: &dyn ParamSource) -> Self {
        Self::new(
            env.get("GITHUB_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
            io::stdout(),
        )
    }
}

impl<W: Write> GithubActions<W> {
    pub fn new(output_file: Option<PathBuf>, stdout: W) -> Self {
        Self {
            output_file,
            stdout,
            failed: false,
        }
    }

    /// Whether `set_failed` was called
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Process exit status for the step
    pub fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    /// Consume the integration, returning the command writer
    pub fn into_inner(self) -> W {
        self.stdout
    }

    fn append_to_file(path: &Path, name: &str, value: &str) -> Result<()> {
        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        if name.contains(&delimiter) || value.contains(&delimiter) {
            bail!("Unexpected input: output '{}' contains the delimiter", name);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Unable to open output file {}", path.display()))?;
        write!(file, "{name}<<{delimiter}\n{value}\n{delimiter}\n")?;
        Ok(())
    }
}

impl<W: Write> ActionOutput for GithubActions<W> {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        match self.output_file {
            Some(ref path) => Self::append_to_file(path, name, value),
            None => {
                writeln!(self.stdout)?;
                writeln!(
                    self.stdout,
                    "::set-output name={}::{}",
                    escape_property(name),
                    escape_data(value)
                )?;
                Ok(())
            }
        }
    }

    fn set_failed(&mut self, message: &str) {
        self.failed = true;
        // Nothing else can carry the message if stdout is gone
        let _ = writeln!(self.stdout, "::error::{}", escape_data(message));
    }
}

/// Escape a workflow command message
pub fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a workflow command property value
pub fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}
