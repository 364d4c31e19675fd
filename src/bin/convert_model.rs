use anyhow::{bail, Context, Result};
use clap::Parser;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// One-shot artifact converter: loads a legacy (unoptimized) ONNX model and
/// re-saves it with the runtime's graph optimizations applied. Run once per
/// artifact; the service itself never calls this.
#[derive(Parser)]
#[command(name = "convert-model")]
#[command(about = "Re-save a legacy model artifact in the runtime's optimized format")]
struct Args {
    /// Legacy model artifact to convert
    input: PathBuf,

    /// Destination path (defaults to `<input>.opt.onnx`)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    if !args.input.exists() {
        bail!("input model not found: {}", args.input.display());
    }

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("opt.onnx"));

    tracing::info!(
        "Converting {} -> {}",
        args.input.display(),
        output.display()
    );

    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_optimized_model_path(&output)?
        .commit_from_file(&args.input)
        .with_context(|| format!("failed to load legacy model {}", args.input.display()))?;

    for input in &session.inputs {
        tracing::info!("  input  '{}'", input.name);
    }
    for out in &session.outputs {
        tracing::info!("  output '{}'", out.name);
    }

    tracing::info!("Optimized model written to {}", output.display());

    Ok(())
}
