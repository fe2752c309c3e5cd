use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use super::expand::expand;
use crate::domain::{
    DeploymentOutcome,
    ServiceRule,
};

pub const DEFAULT_SHELL: &str = "/bin/sh";

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to launch {shell}: {source}")]
    Launch {
        shell: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{status}")]
    Exit { status: String, output: Vec<u8> },
}

impl ExecError {
    pub fn output(&self) -> &[u8] {
        match self {
            Self::Launch { .. } => &[],
            Self::Exit { output, .. } => output,
        }
    }
}

/// Runs a command string and returns its combined stdout/stderr.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<Vec<u8>, ExecError>;
}

pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, command: &str) -> Result<Vec<u8>, ExecError> {
        // Folding stderr into stdout inside the shell keeps both streams
        // interleaved in write order on a single pipe.
        let script = format!("exec 2>&1\n{command}");

        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| ExecError::Launch {
                shell: self.shell.clone(),
                source,
            })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        if output.status.success() {
            Ok(combined)
        } else {
            Err(ExecError::Exit {
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}

pub struct Executor {
    runner: Arc<dyn CommandRunner>,
}

impl Executor {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self::new(Arc::new(ShellRunner::new(shell)))
    }

    pub fn command_for(rule: &ServiceRule, reference: &str) -> String {
        expand(rule.conditions(), reference, rule.command_template())
    }

    pub async fn execute(&self, rule: &ServiceRule, reference: &str) -> DeploymentOutcome {
        tracing::info!(service = rule.name(), reference, "Deploying");

        let command = Self::command_for(rule, reference);
        tracing::info!(service = rule.name(), command = %command, "Executing shell");

        let output = match self.runner.run(&command).await {
            Ok(output) => output,
            Err(e) => {
                let message = failure_message(&e);
                tracing::error!(
                    service = rule.name(),
                    error = %e,
                    output = %String::from_utf8_lossy(e.output()),
                    "Deployment command failed"
                );
                return DeploymentOutcome::Failed(message);
            }
        };

        tracing::info!(
            service = rule.name(),
            output = %String::from_utf8_lossy(&output),
            "Shell output"
        );

        match rule.result_message_template() {
            Some(template) => {
                DeploymentOutcome::Succeeded(expand(rule.conditions(), reference, template))
            }
            None => DeploymentOutcome::Succeeded(default_success_message(rule.name(), reference)),
        }
    }
}

pub fn default_success_message(name: &str, reference: &str) -> String {
    format!("Successfully deployed {} from {}", name, reference)
}

fn failure_message(error: &ExecError) -> String {
    format!(
        "[{} ERROR] [exec shell] {}\n[output] {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        error,
        String::from_utf8_lossy(error.output())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingRunner;

    fn web_rule(message: Option<&str>) -> ServiceRule {
        ServiceRule::new(
            "web",
            "acme/web",
            r"^refs/tags/v(\d+)$",
            "echo deploy-$1",
            message.map(str::to_string),
        )
        .unwrap()
    }

    #[test]
    fn test_command_for_expands_captures() {
        let rule = web_rule(None);
        assert_eq!(Executor::command_for(&rule, "refs/tags/v12"), "echo deploy-12");
    }

    #[tokio::test]
    async fn test_success_without_template_uses_default_message() {
        let runner = Arc::new(RecordingRunner::succeeding());
        let executor = Executor::new(runner.clone());

        let outcome = executor.execute(&web_rule(None), "refs/tags/v12").await;

        assert_eq!(
            outcome,
            DeploymentOutcome::Succeeded("Successfully deployed web from refs/tags/v12".into())
        );
        assert_eq!(runner.commands(), vec!["echo deploy-12"]);
    }

    #[tokio::test]
    async fn test_success_with_template_expands_message() {
        let executor = Executor::new(Arc::new(RecordingRunner::succeeding()));

        let outcome = executor
            .execute(&web_rule(Some("Rolled out web v$1")), "refs/tags/v7")
            .await;

        assert_eq!(outcome.message(), "Rolled out web v7");
    }

    #[tokio::test]
    async fn test_real_shell_success() {
        let executor = Executor::with_shell(DEFAULT_SHELL);

        let outcome = executor.execute(&web_rule(None), "refs/tags/v12").await;

        assert!(outcome.is_success());
        assert_eq!(outcome.message(), "Successfully deployed web from refs/tags/v12");
    }

    #[tokio::test]
    async fn test_real_shell_non_zero_exit_reports_output() {
        let rule = ServiceRule::new(
            "web",
            "acme/web",
            r"^refs/tags/v(\d+)$",
            "echo out-$1; echo err-$1 >&2; exit 3",
            Some("never used".to_string()),
        )
        .unwrap();
        let executor = Executor::with_shell(DEFAULT_SHELL);

        let outcome = executor.execute(&rule, "refs/tags/v5").await;

        assert!(!outcome.is_success());
        let message = outcome.message();
        assert!(message.contains("ERROR"));
        assert!(message.contains("exit status: 3"));
        assert!(message.contains("out-5"));
        assert!(message.contains("err-5"));
        assert!(!message.contains("never used"));
    }

    #[tokio::test]
    async fn test_shell_output_is_combined() {
        let runner = ShellRunner::default();

        let output = runner.run("echo one; echo two >&2; echo three").await.unwrap();

        assert_eq!(String::from_utf8_lossy(&output), "one\ntwo\nthree\n");
    }

    #[tokio::test]
    async fn test_launch_failure_is_an_outcome() {
        let executor = Executor::with_shell("/nonexistent/quayhook-shell");

        let outcome = executor.execute(&web_rule(None), "refs/tags/v1").await;

        assert!(!outcome.is_success());
        assert!(outcome.message().contains("failed to launch /nonexistent/quayhook-shell"));
    }
}
