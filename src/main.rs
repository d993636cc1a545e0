use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vision_annotate::app::{App, DEFAULT_IMAGE};

#[derive(Debug, Parser)]
#[command(name = "vision-annotate")]
#[command(about = "Analyze an image with a cloud vision service and annotate the detections")]
struct CliArgs {
    /// Path to the input image file.
    #[arg(value_name = "IMAGE", default_value = DEFAULT_IMAGE)]
    image: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vision_annotate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    // Failures are reported on the console; the process still exits cleanly.
    match App::new() {
        Ok(app) => match app.run(&args.image).await {
            Ok(_) => info!("Analysis completed successfully"),
            Err(e) => error!("Analysis run failed: {}", e),
        },
        Err(e) => error!("Failed to initialize application: {}", e),
    }

    Ok(())
}
