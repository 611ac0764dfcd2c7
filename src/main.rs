//! Pocket IDE - session and build orchestration core
//!
//! This is the binary entry point. All logic lives in the workspace crates.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use pide_app::{Engine, EngineOptions, Message};
use pide_core::ResultExt;
use pide_project::{has_gradle_wrapper, GradleRunner, NullLanguageService};

/// Pocket IDE - session and build orchestration core
#[derive(Parser, Debug)]
#[command(name = "pide")]
#[command(about = "Session and build orchestration core for a mobile IDE", long_about = None)]
struct Args {
    /// Path to the project to open
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Classpath entry pushed to the language service (repeatable)
    #[arg(long = "classpath", value_name = "PATH")]
    class_paths: Vec<String>,

    /// Skip the automatic debug build after opening
    #[arg(long)]
    no_auto_build: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    pide_core::logging::init().context("Failed to initialize logging")?;

    let project_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    if !project_path.is_dir() {
        eprintln!("Not a directory: {}", project_path.display());
        std::process::exit(1);
    }

    let runner = if has_gradle_wrapper(&project_path) {
        Some(GradleRunner::new(&project_path))
    } else {
        eprintln!(
            "No Gradle wrapper in {}; build actions will be unavailable.",
            project_path.display()
        );
        None
    };

    let options = EngineOptions {
        auto_build: !args.no_auto_build,
        preferences_path: None,
    };
    let engine = Engine::new(
        &project_path,
        runner,
        NullLanguageService,
        args.class_paths,
        options,
    );

    // Ctrl-C closes the project without the confirmation step
    let handle = engine.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = handle.send(Message::ForceClose).await;
        }
    });

    info!("Opening project: {}", project_path.display());
    engine.run().await?;
    Ok(())
}
