//! Cortex Search action
//!
//! This is the main entry point for the action step.

use cortex_search_action::{
    action::{self, GithubActions},
    config, search, ActionInputs, ActionOutput, EnvSource, Sources,
};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> ExitCode {
    let env = EnvSource;
    let mut output = GithubActions::from_env(&env);

    // Load configuration
    let settings_path = config::locate(&env);
    let settings = match config::load_from(settings_path.as_deref(), &env) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Cortex Search failed:");
            eprintln!("{:?}", e);
            output.set_failed(&e.to_string());
            return output.exit_code();
        }
    };

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(&settings.logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    info!("Starting Cortex Search action v{}", cortex_search_action::VERSION);
    match settings_path {
        Some(path) => info!("Loaded settings from: {}", path.display()),
        None => debug!("No settings file found, using defaults"),
    }

    let inputs = ActionInputs::new(env);
    let sources = Sources::new(&inputs, &env);
    let executor = search::from_settings(&settings.executor);

    let outcome = action::run(&sources, &settings.resolver, executor.as_ref()).await;

    if let Err(e) = action::publish(
        &outcome,
        &mut output,
        &settings.output.name,
        &mut io::stdout(),
        &mut io::stderr(),
    ) {
        error!("Failed to write report: {}", e);
        // A failed outcome has already raised its own message
        if !output.failed() {
            output.set_failed(&format!("Failed to write report: {}", e));
        }
    }

    output.exit_code()
}
