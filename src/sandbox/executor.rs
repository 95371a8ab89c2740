//! Turns a candidate (code, tests, options) into an [`ExecutionResult`] by
//! exercising a real toolchain in an isolated workspace.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, instrument, warn};

use crate::core::cancel::CancellationToken;
use crate::core::scoring;
use crate::io::process::run_command;
use crate::profile::LanguageProfile;
use crate::sandbox::fence::{ensure_prelude, extract_fenced};
use crate::sandbox::parser::{parse_compile_errors, parse_test_failures};
use crate::sandbox::workspace::Workspace;

const DEFAULT_FILENAME: &str = "candidate";

/// Outcome of executing one candidate against a set of tests.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub is_passing: bool,
    pub feedback: String,
    pub score: f64,
}

/// Per-execution knobs.
#[derive(Debug, Clone)]
pub struct SandboxOptions {
    /// Workspace root; `None` means create a fresh temp directory.
    pub project_path: Option<PathBuf>,
    /// Subdirectory within the workspace that hosts the candidate.
    pub target_path: PathBuf,
    /// Base filename for the candidate source file.
    pub filename: String,
    /// Whether to initialize a fresh project descriptor in `project_path`.
    pub create_project: bool,
    /// Truncate captured stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self {
            project_path: None,
            target_path: PathBuf::from("."),
            filename: DEFAULT_FILENAME.to_string(),
            create_project: true,
            output_limit_bytes: 200_000,
        }
    }
}

/// Compiles and tests a candidate against a concrete toolchain.
pub struct Sandbox<P: LanguageProfile> {
    profile: P,
}

impl<P: LanguageProfile> Sandbox<P> {
    pub fn new(profile: P) -> Self {
        Self { profile }
    }

    /// Prepare the workspace, write and normalize the candidate, build, then
    /// run each test in order.
    #[instrument(skip_all, fields(target = %options.target_path.display()))]
    pub fn execute(
        &self,
        code: &str,
        tests: &[String],
        options: &SandboxOptions,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let workspace = match &options.project_path {
            Some(path) => Workspace::borrowed(path.clone()),
            None => Workspace::create_temp(&std::env::temp_dir())?,
        };
        let result = self.execute_in_workspace(code, tests, options, cancel, &workspace);
        workspace.teardown()?;
        result
    }

    fn execute_in_workspace(
        &self,
        code: &str,
        tests: &[String],
        options: &SandboxOptions,
        cancel: &CancellationToken,
        workspace: &Workspace,
    ) -> Result<ExecutionResult> {
        if cancel.is_cancelled() {
            bail!("execution cancelled before it started");
        }

        let target_dir = workspace.root.join(&options.target_path);
        if target_dir.exists() {
            fs::remove_dir_all(&target_dir)
                .with_context(|| format!("clear target dir {}", target_dir.display()))?;
        }
        fs::create_dir_all(&target_dir)
            .with_context(|| format!("create target dir {}", target_dir.display()))?;

        if options.create_project {
            self.run_step(
                self.profile.init_command(&workspace.root),
                options,
                cancel,
                "init project",
            )?;
        }

        let module_identity = self
            .profile
            .read_module_identity(&workspace.root)
            .context("read module identity")?;
        let target_package = self.profile.qualify_target(&module_identity, &options.target_path);

        let extension = self.profile.file_extension();
        let code_path = target_dir.join(format!("{}.{extension}", options.filename));
        let candidate = self.prepare_source(code);
        self.write_and_normalize(&code_path, &candidate, &workspace.root, options, cancel)?;

        let compile_errors = self.build(&workspace.root, &target_package, options, cancel)?;
        if !compile_errors.is_empty() {
            debug!(count = compile_errors.len(), "candidate failed to compile");
            return Ok(ExecutionResult {
                is_passing: false,
                feedback: compile_errors.join("\n"),
                score: scoring::score(false, false, 0, tests.len() as u32),
            });
        }

        self.run_tests(&target_dir, &workspace.root, &target_package, options, tests, cancel)
    }

    fn prepare_source(&self, code: &str) -> String {
        let extracted = extract_fenced(code);
        ensure_prelude(&extracted, self.profile.default_prelude(), |body| {
            self.profile.declares_module(body)
        })
    }

    fn write_and_normalize(
        &self,
        path: &std::path::Path,
        contents: &str,
        workspace_root: &std::path::Path,
        options: &SandboxOptions,
        cancel: &CancellationToken,
    ) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("write candidate {}", path.display()))?;
        self.run_step(
            self.profile.format_command(workspace_root, path),
            options,
            cancel,
            "format",
        )?;
        self.run_step(
            self.profile.normalize_imports_command(workspace_root, path),
            options,
            cancel,
            "normalize imports",
        )?;
        self.run_step(
            self.profile.resolve_dependencies_command(workspace_root),
            options,
            cancel,
            "resolve dependencies",
        )?;
        Ok(())
    }

    fn build(
        &self,
        workspace_root: &std::path::Path,
        target_package: &str,
        options: &SandboxOptions,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let output = run_command(
            self.profile.build_command(workspace_root, target_package),
            None,
            cancel,
            options.output_limit_bytes,
        )
        .context("run build command")?;

        if output.status.success() {
            return Ok(Vec::new());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let marker = self.profile.package_boundary_marker(target_package);
        Ok(parse_compile_errors(&stderr, &marker))
    }

    fn run_tests(
        &self,
        target_dir: &std::path::Path,
        workspace_root: &std::path::Path,
        target_package: &str,
        options: &SandboxOptions,
        tests: &[String],
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        let extension = self.profile.file_extension();
        let test_path = target_dir.join(format!("{}_test.{extension}", options.filename));

        let mut passed_feedback = String::from("passed:\n");
        let mut failed_feedback = String::from("failed:\n");
        let mut passing_tests = 0u32;
        let mut saw_compile_error = false;

        for test in tests {
            let candidate_test = self.prepare_source(test);
            self.write_and_normalize(&test_path, &candidate_test, workspace_root, options, cancel)?;

            let output = run_command(
                self.profile.test_command(workspace_root, target_package),
                None,
                cancel,
                options.output_limit_bytes,
            )
            .context("run test command")?;

            let stderr = String::from_utf8_lossy(&output.stderr);
            let marker = self.profile.package_boundary_marker(target_package);
            let late_compile_errors = parse_compile_errors(&stderr, &marker);
            if !late_compile_errors.is_empty() {
                saw_compile_error = true;
                failed_feedback.push_str(&format!("{test}\n{}\n", late_compile_errors.join("\n")));
                continue;
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            let locator = self.profile.failure_locator_prefix(&options.filename);
            let failures = parse_test_failures(&stdout, &locator);

            if output.status.success() && failures.is_empty() {
                passing_tests += 1;
                passed_feedback.push_str(&format!("{test}\n"));
            } else {
                failed_feedback.push_str(&format!("{test}\n{}\n", failures.join("\n")));
            }
        }

        let total_tests = tests.len() as u32;
        let is_passing = !saw_compile_error && passing_tests == total_tests;
        if !is_passing && passing_tests == 0 && total_tests > 0 {
            warn!(total_tests, "every test failed for this candidate");
        }

        Ok(ExecutionResult {
            is_passing,
            feedback: format!("{passed_feedback}\n{failed_feedback}"),
            score: scoring::score(is_passing, !saw_compile_error, passing_tests, total_tests),
        })
    }

    fn run_step(
        &self,
        cmd: std::process::Command,
        options: &SandboxOptions,
        cancel: &CancellationToken,
        label: &str,
    ) -> Result<()> {
        let output = run_command(cmd, None, cancel, options.output_limit_bytes)
            .with_context(|| format!("run {label}"))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{label} failed: {stderr}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vacuous_pass_with_no_tests_and_no_compile_errors() {
        assert_eq!(scoring::score(true, true, 0, 0), 1.0);
    }
}
