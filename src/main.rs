use anyhow::Result;
use clap::Parser;
use glaucoma_screen::{config::Config, web::serve};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glaucoma-screen")]
#[command(about = "Glaucoma screening web service backed by ONNX models")]
struct Args {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:5005")]
    bind: String,

    /// Number of worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Model directory path
    #[arg(long, default_value = "models")]
    models_dir: String,

    /// Template directory path
    #[arg(long, default_value = "templates")]
    templates_dir: String,

    /// Enable development mode
    #[arg(long)]
    dev: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting glaucoma screening service...");
    tracing::info!("Bind address: {}", args.bind);
    tracing::info!("Models directory: {}", args.models_dir);

    let config = Config::new(
        args.bind,
        args.models_dir,
        args.templates_dir,
        args.workers,
        args.dev,
    )?;

    serve(config).await?;

    Ok(())
}
