// ─── Process Invocation ───
// Final executable + argument vector. Spawning is the caller's business.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::path::path_str;

use super::classpath::ResolvedLibrary;

const REDACTED: &str = "****";

/// Every concrete piece of a launch before it is put in process order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLaunchSpec {
    pub main_class: String,
    pub classpath: String,
    pub jvm_arguments: Vec<String>,
    pub game_arguments: Vec<String>,
    /// Native jars the caller must extract into the natives directory.
    pub native_libraries: Vec<ResolvedLibrary>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    pub executable: PathBuf,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
}

impl ProcessInvocation {
    /// `java <jvm args> <main class> <game args>`, run from `working_directory`.
    pub fn assemble(
        spec: &ResolvedLaunchSpec,
        java_path: &Path,
        working_directory: &Path,
    ) -> Self {
        let mut arguments =
            Vec::with_capacity(spec.jvm_arguments.len() + 1 + spec.game_arguments.len());
        arguments.extend(spec.jvm_arguments.iter().cloned());
        arguments.push(spec.main_class.clone());
        arguments.extend(spec.game_arguments.iter().cloned());

        Self {
            executable: java_path.to_path_buf(),
            arguments,
            working_directory: working_directory.to_path_buf(),
        }
    }

    /// Ready-to-spawn command. Nothing is started here.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.args(&self.arguments).current_dir(&self.working_directory);
        cmd
    }

    /// Shell-like rendering for logs. Not meant to be executed.
    pub fn command_line(&self) -> String {
        self.redacted_command_line(&[])
    }

    /// Like `command_line`, with every occurrence of each non-empty secret
    /// replaced by `****`.
    pub fn redacted_command_line(&self, secrets: &[&str]) -> String {
        std::iter::once(path_str(&self.executable))
            .chain(self.arguments.iter().cloned())
            .map(|part| {
                let masked = secrets
                    .iter()
                    .filter(|secret| !secret.is_empty())
                    .fold(part, |acc, secret| acc.replace(secret, REDACTED));
                shell_escape(&masked)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=' | '+')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
