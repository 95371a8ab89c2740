//! Language profiles: the toolchain commands and patterns that parameterize
//! the sandbox and generator for a concrete source/target runtime pair.
//!
//! The core never hardcodes a language. Everything it needs to shell out to a
//! toolchain or parse that toolchain's output comes from a [`LanguageProfile`].

use std::process::Command;

/// Per-target toolchain commands, filenames, and output-parsing patterns.
///
/// Each `*_command` builder returns a ready-to-run [`Command`] rooted at the
/// given working directory; the sandbox is responsible for timeouts and
/// output capture (see [`crate::io::process`]).
pub trait LanguageProfile: Send + Sync {
    /// Human-readable name, used in log fields and error messages.
    fn name(&self) -> &str;

    /// File extension for source and test files, without a leading dot.
    fn file_extension(&self) -> &str;

    /// Tag used in fenced code blocks, e.g. `"go"` for ```` ```go ````.
    fn fence_tag(&self) -> &str;

    /// Module/package prelude prepended when a candidate lacks one.
    fn default_prelude(&self) -> &str;

    /// Whether `body` already declares a module/package identity, so
    /// [`Self::default_prelude`] should not be prepended.
    fn declares_module(&self, body: &str) -> bool;

    /// Command that initializes a fresh project descriptor in `workspace_root`.
    fn init_command(&self, workspace_root: &std::path::Path) -> Command;

    /// Command that normalizes imports in `file_path` (e.g. `goimports -w`).
    fn normalize_imports_command(&self, workspace_root: &std::path::Path, file_path: &std::path::Path) -> Command;

    /// Command that resolves dependencies for the module, adding anything
    /// missing and removing anything unused. There is no separate pruning
    /// step: for Go, `go mod tidy` already does both in one pass.
    fn resolve_dependencies_command(&self, workspace_root: &std::path::Path) -> Command;

    /// Command that formats `file_path` in place.
    fn format_command(&self, workspace_root: &std::path::Path, file_path: &std::path::Path) -> Command;

    /// Command that builds `target_package` (a fully qualified import path).
    fn build_command(&self, workspace_root: &std::path::Path, target_package: &str) -> Command;

    /// Command that runs tests for `target_package`.
    fn test_command(&self, workspace_root: &std::path::Path, target_package: &str) -> Command;

    /// Prefix marking the start of a compile-error block in build stderr,
    /// e.g. a line mentioning the target package.
    fn package_boundary_marker(&self, target_package: &str) -> String;

    /// Prefix marking a test-failure locator line in test stdout, e.g. eight
    /// spaces followed by `<filename>_test.<ext>`.
    fn failure_locator_prefix(&self, filename: &str) -> String;

    /// Read the module identity from the workspace manifest (e.g. the
    /// `module` line of `go.mod`), used to build fully qualified import
    /// paths for the build/test commands.
    fn read_module_identity(&self, workspace_root: &std::path::Path) -> anyhow::Result<String>;

    /// Build the fully qualified import path for `target_path` within
    /// `module_identity`.
    fn qualify_target(&self, module_identity: &str, target_path: &std::path::Path) -> String;
}

/// Toolchain commands for the system this spec was distilled from: Go source
/// converted to an equivalent Go program against a different runtime target
/// (lambda handler -> HTTP handler). Ships as a worked example of the trait;
/// other targets plug in their own profile.
pub struct GoProfile;

impl LanguageProfile for GoProfile {
    fn name(&self) -> &str {
        "go"
    }

    fn file_extension(&self) -> &str {
        "go"
    }

    fn fence_tag(&self) -> &str {
        "go"
    }

    fn default_prelude(&self) -> &str {
        "package lats\n\n"
    }

    fn declares_module(&self, body: &str) -> bool {
        body.starts_with("package ")
    }

    fn init_command(&self, workspace_root: &std::path::Path) -> Command {
        let mut cmd = Command::new("go");
        cmd.arg("mod")
            .arg("init")
            .arg(module_name(workspace_root))
            .current_dir(workspace_root);
        cmd
    }

    fn normalize_imports_command(
        &self,
        workspace_root: &std::path::Path,
        file_path: &std::path::Path,
    ) -> Command {
        let mut cmd = Command::new("goimports");
        cmd.arg("-w").arg(file_path).current_dir(workspace_root);
        cmd
    }

    fn resolve_dependencies_command(&self, workspace_root: &std::path::Path) -> Command {
        let mut cmd = Command::new("go");
        cmd.arg("mod").arg("tidy").current_dir(workspace_root);
        cmd
    }

    fn format_command(&self, workspace_root: &std::path::Path, file_path: &std::path::Path) -> Command {
        let mut cmd = Command::new("gofmt");
        cmd.arg("-w").arg(file_path).current_dir(workspace_root);
        cmd
    }

    fn build_command(&self, workspace_root: &std::path::Path, target_package: &str) -> Command {
        let mut cmd = Command::new("go");
        cmd.arg("build").arg(target_package).current_dir(workspace_root);
        cmd
    }

    fn test_command(&self, workspace_root: &std::path::Path, target_package: &str) -> Command {
        let mut cmd = Command::new("go");
        cmd.arg("test").arg(target_package).current_dir(workspace_root);
        cmd
    }

    fn package_boundary_marker(&self, target_package: &str) -> String {
        format!("# {target_package}")
    }

    fn failure_locator_prefix(&self, filename: &str) -> String {
        format!("        {filename}_test.go")
    }

    fn read_module_identity(&self, workspace_root: &std::path::Path) -> anyhow::Result<String> {
        let go_mod = std::fs::read_to_string(workspace_root.join("go.mod"))?;
        go_mod
            .lines()
            .find_map(|line| line.strip_prefix("module "))
            .map(|m| m.trim().to_string())
            .ok_or_else(|| anyhow::anyhow!("go.mod has no module line"))
    }

    fn qualify_target(&self, module_identity: &str, target_path: &std::path::Path) -> String {
        let target = target_path.to_string_lossy();
        if target.is_empty() || target == "." {
            module_identity.to_string()
        } else {
            format!("{module_identity}/{target}")
        }
    }
}

fn module_name(workspace_root: &std::path::Path) -> String {
    workspace_root
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("lats-candidate")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_profile_reports_expected_static_facts() {
        let profile = GoProfile;
        assert_eq!(profile.name(), "go");
        assert_eq!(profile.file_extension(), "go");
        assert_eq!(profile.fence_tag(), "go");
        assert_eq!(profile.default_prelude(), "package lats\n\n");
    }

    #[test]
    fn failure_locator_matches_go_test_output_shape() {
        let profile = GoProfile;
        assert_eq!(
            profile.failure_locator_prefix("candidate"),
            "        candidate_test.go"
        );
    }
}
