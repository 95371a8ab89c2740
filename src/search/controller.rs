//! Builds and expands the candidate tree.

use std::time::Instant;

use tracing::{debug, instrument};

use crate::core::cancel::CancellationToken;
use crate::core::node::{NodeId, Tree};
use crate::core::selector::is_new_best;
use crate::error::Result;
use crate::generator::generator::{Generator, is_affirmative};
use crate::profile::LanguageProfile;
use crate::sandbox::executor::{ExecutionResult, Sandbox, SandboxOptions};
use crate::search::options::{ConverterOptions, ConverterResponse};

/// Owns the candidate tree for exactly one conversion; discarded afterward.
pub struct SearchController<P: LanguageProfile> {
    sandbox: Sandbox<P>,
    generator: Generator,
    max_iterations: u32,
    max_children: u32,
    output_limit_bytes: usize,
}

impl<P: LanguageProfile> SearchController<P> {
    pub fn new(sandbox: Sandbox<P>, generator: Generator, max_iterations: u32, max_children: u32) -> Self {
        Self {
            sandbox,
            generator,
            max_iterations,
            max_children,
            output_limit_bytes: 200_000,
        }
    }

    /// Override the per-command output capture limit.
    pub fn with_sandbox_limits(mut self, output_limit_bytes: usize) -> Self {
        self.output_limit_bytes = output_limit_bytes;
        self
    }

    /// Expand the root, then keep filling in the best-so-far node's children
    /// until one passes or the iteration/children bounds are exhausted.
    #[instrument(skip_all, fields(max_iterations = self.max_iterations, max_children = self.max_children))]
    pub fn convert(
        &self,
        source: &str,
        seed_tests: Vec<String>,
        options: &ConverterOptions,
        cancel: &CancellationToken,
    ) -> Result<ConverterResponse> {
        let started = Instant::now();
        let mut tree = Tree::new();

        let root = self.expand(&mut tree, source, None, &seed_tests, options, cancel)?;
        if tree[root].is_passing() {
            return Ok(self.finish(&tree, root, started, true));
        }

        let mut current = root;
        let mut best = root;
        let mut depth = 0u32;

        while depth <= self.max_iterations {
            while tree[current].children.len() < self.max_children as usize {
                let child = self.expand(&mut tree, source, Some(current), &seed_tests, options, cancel)?;
                if tree[child].is_passing() {
                    return Ok(self.finish(&tree, child, started, true));
                }
                if is_new_best(tree[best].score, tree[child].score) {
                    best = child;
                }
            }
            // Depth increments only after the current node's children are
            // filled, so `max_iterations = N` runs `N + 1` depths. Intentional.
            current = best;
            depth += 1;
        }

        debug!(iterations = self.max_iterations, "search exhausted without a passing node");
        Ok(self.finish(&tree, best, started, false))
    }

    /// Generate and execute one candidate, attach it to the tree, and return
    /// its id. `parent = None` builds the root.
    fn expand(
        &self,
        tree: &mut Tree,
        source: &str,
        parent: Option<NodeId>,
        seed_tests: &[String],
        options: &ConverterOptions,
        cancel: &CancellationToken,
    ) -> Result<NodeId> {
        let code = match parent {
            None => self.generator.generate_code(source, cancel)?,
            Some(p) => self.generator.generate_code_with_reflection(
                source,
                &tree[p].code,
                &tree[p].feedback,
                &tree[p].self_reflection,
                cancel,
            )?,
        };

        let mut tests = match (parent, options.generate_tests) {
            (None, false) => seed_tests.to_vec(),
            (None, true) => {
                let mut combined = seed_tests.to_vec();
                combined.extend(self.generator.generate_tests(source, &code, cancel)?);
                combined
            }
            (Some(p), _) => tree[p].tests.clone(),
        };

        let sandbox_options = self.sandbox_options_for(options);
        let mut result = self.sandbox.execute(&code, &tests, &sandbox_options, cancel)?;
        let mut self_reflection = String::new();

        if !result.is_passing {
            self_reflection = self.generator.generate_self_reflection(&code, &result.feedback, cancel)?;
            let judgment = self.generator.query_implementation_is_good(&self_reflection, cancel)?;

            if is_affirmative(&judgment) {
                let rehab = self.rehabilitate(&code, seed_tests, &sandbox_options, cancel)?;
                if rehab.is_passing {
                    tests = seed_tests.to_vec();
                    result = rehab;
                    self_reflection = String::new();
                } else {
                    result = rehab;
                    self_reflection =
                        self.generator.generate_self_reflection(&code, &result.feedback, cancel)?;
                }
            }
        }

        let node = match parent {
            None => {
                let id = tree.insert_root(code, tests);
                tree[id].feedback = result.feedback;
                tree[id].self_reflection = self_reflection;
                tree[id].score = result.score;
                id
            }
            Some(p) => tree.append_child(p, code, tests, result.feedback, self_reflection, result.score),
        };
        Ok(node)
    }

    /// Re-execute against seed tests only, once per node, when the generator
    /// judges the failing tests (not the implementation) to be at fault.
    fn rehabilitate(
        &self,
        code: &str,
        seed_tests: &[String],
        sandbox_options: &SandboxOptions,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult> {
        Ok(self.sandbox.execute(code, seed_tests, sandbox_options, cancel)?)
    }

    fn sandbox_options_for(&self, options: &ConverterOptions) -> SandboxOptions {
        SandboxOptions {
            project_path: options.project_path.clone(),
            target_path: options.target_path.clone(),
            filename: options.main_file.clone(),
            create_project: options.create_project,
            output_limit_bytes: self.output_limit_bytes,
        }
    }

    fn finish(&self, tree: &Tree, node: NodeId, started: Instant, found: bool) -> ConverterResponse {
        ConverterResponse {
            code: tree[node].code.clone(),
            tests: tree[node].tests.clone(),
            total_iterations: tree[node].iteration,
            total_attempts: tree.len() as u32,
            selected_node: tree[node].id.clone(),
            total_time: started.elapsed(),
            found,
        }
    }
}
