//! Thin CLI front-end over the conversion engine.
//!
//! `convert` reads a source file and zero or more seed test files, wraps
//! each in a fenced block, and runs one conversion to completion.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use converter::core::cancel::CancellationToken;
use converter::generator::Generator;
use converter::io::config::load_config;
use converter::llm::HttpLlmClient;
use converter::sandbox::Sandbox;
use converter::sandbox::fence::wrap_in_fence;
use converter::{ConverterOptions, GoProfile, SearchController};

#[derive(Parser)]
#[command(name = "convert", version, about = "Convert source code to a new runtime target")]
struct Cli {
    /// Target language profile.
    #[arg(short, long, default_value = "go")]
    language: String,

    /// Generate an additional test battery at the root.
    #[arg(short = 'g', long, default_value_t = true)]
    generate_tests: bool,

    /// Path to the source file to convert.
    #[arg(short = 'c', long)]
    code_path: PathBuf,

    /// Path to a seed test file; may be repeated.
    #[arg(short = 't', long = "test-path")]
    test_paths: Vec<PathBuf>,

    /// Path to `converter.toml`; missing file falls back to defaults.
    #[arg(long, default_value = "converter.toml")]
    config_path: PathBuf,
}

fn main() -> Result<()> {
    converter::logging::init();
    let cli = Cli::parse();

    if cli.language != "go" {
        anyhow::bail!("unsupported language: {}", cli.language);
    }

    let config = load_config(&cli.config_path)?;

    let code = std::fs::read_to_string(&cli.code_path)
        .with_context(|| format!("read code file {}", cli.code_path.display()))?;
    let code = wrap_in_fence(&code, "go");

    let mut tests = Vec::with_capacity(cli.test_paths.len());
    for path in &cli.test_paths {
        let test = std::fs::read_to_string(path)
            .with_context(|| format!("read test file {}", path.display()))?;
        tests.push(wrap_in_fence(&test, "go"));
    }

    let llm = HttpLlmClient::new(
        &config.llm.endpoint,
        &config.llm.api_key,
        &config.llm.api_version,
        &config.llm.deployment,
    );
    let generator = Generator::new(Box::new(llm), "Go", &config.prompt_exemplars_dir);
    let sandbox = Sandbox::new(GoProfile);
    let controller = SearchController::new(sandbox, generator, config.max_iterations, config.max_children)
        .with_sandbox_limits(config.sandbox.output_limit_bytes);

    let options = ConverterOptions {
        generate_tests: cli.generate_tests,
        ..ConverterOptions::default()
    };

    let response = controller.convert(&code, tests, &options, &CancellationToken::new())?;

    if response.found {
        println!("Found a solution in {} iterations", response.total_iterations);
    } else {
        println!("Couldn't find a solution after {} iterations", response.total_iterations);
    }
    println!("Total time: {:?}", response.total_time);
    println!("Showing code for node {}", response.selected_node);
    println!();
    println!("{}", response.code);

    Ok(())
}
