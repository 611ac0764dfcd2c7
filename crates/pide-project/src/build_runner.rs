//! Build runner capability and the Gradle wrapper implementation

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use pide_core::prelude::*;

/// The catalog of build actions the core can request.
///
/// Everything except daemon control maps to one Gradle invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTask {
    /// Debug assembly. `auto` marks builds triggered by the core itself
    /// (project open, sync banner) rather than an explicit user action.
    AssembleDebug { auto: bool },
    AssembleRelease,
    Clean,
    CleanAndRebuild,
    Build,
    Bundle,
    Lint,
    LintDebug,
    LintRelease,
    /// Regenerates resource classes after markup files were saved, so code
    /// completion sees up-to-date generated sources.
    UpdateResourceClasses,
}

impl BuildTask {
    /// Gradle command-line arguments for this task
    pub fn gradle_args(&self) -> &'static [&'static str] {
        match self {
            BuildTask::AssembleDebug { .. } => &["assembleDebug"],
            BuildTask::AssembleRelease => &["assembleRelease"],
            BuildTask::Clean => &["clean"],
            BuildTask::CleanAndRebuild => &["clean", "build"],
            BuildTask::Build => &["build"],
            BuildTask::Bundle => &["bundle"],
            BuildTask::Lint => &["lint"],
            BuildTask::LintDebug => &["lintDebug"],
            BuildTask::LintRelease => &["lintRelease"],
            BuildTask::UpdateResourceClasses => &[":app:processDebugResources"],
        }
    }

    /// Short label for status text
    pub fn label(&self) -> &'static str {
        match self {
            BuildTask::AssembleDebug { .. } => "assembleDebug",
            BuildTask::AssembleRelease => "assembleRelease",
            BuildTask::Clean => "clean",
            BuildTask::CleanAndRebuild => "clean build",
            BuildTask::Build => "build",
            BuildTask::Bundle => "bundle",
            BuildTask::Lint => "lint",
            BuildTask::LintDebug => "lintDebug",
            BuildTask::LintRelease => "lintRelease",
            BuildTask::UpdateResourceClasses => "processDebugResources",
        }
    }
}

/// Completion report for one build task
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl BuildOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// Build execution capability.
///
/// The session core only ever drives builds through this trait; the
/// coordinator owns the single-build gating, so implementations do not need
/// to guard against concurrent `run` calls.
#[trait_variant::make(BuildRunner: Send)]
pub trait LocalBuildRunner {
    /// Run one build task to completion and report the outcome.
    async fn run(&self, task: BuildTask) -> Result<BuildOutcome>;

    /// Stop all background build daemons. Allowed even mid-build.
    async fn stop_all_daemons(&self) -> Result<()>;

    /// Human-readable daemon status text for the status sheet.
    async fn daemon_status(&self) -> Result<String>;

    /// Release runner resources. Safe to call at any time; any in-flight
    /// task is abandoned by the caller, not awaited.
    async fn exit(&self) -> Result<()>;
}

/// Runs build tasks through the project's Gradle wrapper script.
#[derive(Debug, Clone)]
pub struct GradleRunner {
    project_path: PathBuf,
}

impl GradleRunner {
    pub fn new(project_path: impl Into<PathBuf>) -> Self {
        Self {
            project_path: project_path.into(),
        }
    }

    fn wrapper(&self) -> PathBuf {
        self.project_path.join("gradlew")
    }

    async fn invoke(&self, args: &[&str]) -> Result<std::process::Output> {
        let wrapper = self.wrapper();
        if !wrapper.exists() {
            return Err(Error::build_runner(format!(
                "Gradle wrapper not found: {}",
                wrapper.display()
            )));
        }

        // The wrapper script is not necessarily executable on device
        // storage, so it is run through `sh` rather than directly.
        let output = Command::new("sh")
            .arg(&wrapper)
            .args(args)
            .current_dir(&self.project_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(output)
    }
}

impl BuildRunner for GradleRunner {
    async fn run(&self, task: BuildTask) -> Result<BuildOutcome> {
        info!("Running build task: {}", task.label());
        let output = self.invoke(task.gradle_args()).await?;

        if output.status.success() {
            Ok(BuildOutcome::success())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(BuildOutcome::failure(tail_lines(&stderr, 20)))
        }
    }

    async fn stop_all_daemons(&self) -> Result<()> {
        info!("Stopping all Gradle daemons");
        self.invoke(&["--stop"]).await?;
        Ok(())
    }

    async fn daemon_status(&self) -> Result<String> {
        let output = self.invoke(&["--status"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn exit(&self) -> Result<()> {
        debug!("Build runner released for {}", self.project_path.display());
        Ok(())
    }
}

/// Last `n` lines of command output, for compact failure messages
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

/// Distinguishes a path to a plausible Gradle project
pub fn has_gradle_wrapper(project_path: &Path) -> bool {
    project_path.join("gradlew").exists()
}
