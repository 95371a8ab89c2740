//! Per-conversion knobs.

use std::path::PathBuf;

/// Options accepted by one call to [`crate::search::controller::SearchController::convert`].
#[derive(Debug, Clone)]
pub struct ConverterOptions {
    /// Generate an additional test battery at the root.
    pub generate_tests: bool,
    /// Initialize a fresh project descriptor in each attempt's workspace.
    pub create_project: bool,
    /// Workspace root; `None` means each attempt gets a fresh temp directory.
    pub project_path: Option<PathBuf>,
    /// Subdirectory within the workspace that hosts the candidate.
    pub target_path: PathBuf,
    /// Base filename for the candidate source file.
    pub main_file: String,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            generate_tests: false,
            create_project: true,
            project_path: None,
            target_path: PathBuf::from("."),
            main_file: "candidate".to_string(),
        }
    }
}

/// The terminal output of a conversion.
#[derive(Debug, Clone)]
pub struct ConverterResponse {
    pub code: String,
    pub tests: Vec<String>,
    pub total_iterations: u32,
    /// Cumulative node count across the whole tree.
    pub total_attempts: u32,
    pub selected_node: String,
    pub total_time: std::time::Duration,
    /// True iff some node reached score `1.0`.
    pub found: bool,
}
