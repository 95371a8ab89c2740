//! Shared test doubles for end-to-end conversion scenarios.
//!
//! [`ScriptProfile`] is a [`LanguageProfile`] whose "toolchain" is a handful
//! of `sh` one-liners: candidates and tests are plain text files, and a test
//! is itself a shell script the test command executes. This lets the full
//! sandbox algorithm run against a real subprocess toolchain without
//! depending on an actual compiler being installed.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use converter::core::cancel::CancellationToken;
use converter::error::Result;
use converter::llm::{LlmClient, Message};
use converter::profile::LanguageProfile;

pub struct ScriptProfile;

impl LanguageProfile for ScriptProfile {
    fn name(&self) -> &str {
        "script"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }

    fn fence_tag(&self) -> &str {
        "txt"
    }

    fn default_prelude(&self) -> &str {
        ""
    }

    fn declares_module(&self, _body: &str) -> bool {
        true
    }

    fn init_command(&self, workspace_root: &Path) -> Command {
        let mut cmd = Command::new("true");
        cmd.current_dir(workspace_root);
        cmd
    }

    fn normalize_imports_command(&self, workspace_root: &Path, _file_path: &Path) -> Command {
        let mut cmd = Command::new("true");
        cmd.current_dir(workspace_root);
        cmd
    }

    fn resolve_dependencies_command(&self, workspace_root: &Path) -> Command {
        let mut cmd = Command::new("true");
        cmd.current_dir(workspace_root);
        cmd
    }

    fn format_command(&self, workspace_root: &Path, _file_path: &Path) -> Command {
        let mut cmd = Command::new("true");
        cmd.current_dir(workspace_root);
        cmd
    }

    fn build_command(&self, workspace_root: &Path, target_package: &str) -> Command {
        let marker = self.package_boundary_marker(target_package);
        let script = format!(
            "if grep -q COMPILE_FAIL ./candidate.txt; then echo '{marker}' >&2; \
             echo 'undefined: MyResponse' >&2; exit 1; else exit 0; fi"
        );
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script).current_dir(workspace_root.join(target_package));
        cmd
    }

    fn test_command(&self, workspace_root: &Path, target_package: &str) -> Command {
        let locator = self.failure_locator_prefix("candidate");
        let script = format!(
            "if sh ./candidate_test.txt; then exit 0; else echo '{locator}:1: assertion failed'; exit 1; fi"
        );
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script).current_dir(workspace_root.join(target_package));
        cmd
    }

    fn package_boundary_marker(&self, target_package: &str) -> String {
        format!("# {target_package}")
    }

    fn failure_locator_prefix(&self, filename: &str) -> String {
        format!("        {filename}_test.txt")
    }

    fn read_module_identity(&self, _workspace_root: &Path) -> anyhow::Result<String> {
        Ok("script".to_string())
    }

    fn qualify_target(&self, _module_identity: &str, target_path: &Path) -> String {
        target_path.to_string_lossy().to_string()
    }
}

/// A test assertion: `sh -c "grep -q <needle> ./candidate.txt"`. Wrapped as a
/// fenced test block, its exit code drives pass/fail.
pub fn assertion_test(needle: &str) -> String {
    converter::sandbox::fence::wrap_in_fence(&format!("grep -q {needle} ./candidate.txt"), "txt")
}

pub fn candidate(body: &str) -> String {
    converter::sandbox::fence::wrap_in_fence(body, "txt")
}

/// An [`LlmClient`] that plays back a fixed script of replies, one per call,
/// in order.
pub struct ScriptedLlm {
    replies: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).rev().collect()),
        }
    }
}

impl LlmClient for ScriptedLlm {
    fn chat(&self, _messages: &[Message], _cancel: &CancellationToken) -> Result<String> {
        Ok(self.replies.lock().unwrap().pop().expect("scripted llm ran out of replies"))
    }
}

pub fn exemplars_dir() -> PathBuf {
    std::env::temp_dir()
}
