use iss_tracker::config;
use iss_tracker::orchestrator::Tracker;
use iss_tracker::renderer::MapRenderer;
use iss_tracker::viewer;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = config::read_config()?;

    // Initialize logging
    let _logging_guard = iss_tracker::logging::init_logging(
        &config.log_dir,
        "iss-tracker",
        &config.log_level,
    )?;

    tracing::info!("ISS tracker starting against {}", config.base_url);

    let tracker = Tracker::from_config(config)?;
    let report = tracker.run(&mut std::io::stdout()).await?;

    // Keep the map open until the user dismisses it
    if let Some(map) = &report.map {
        println!("Map saved to {}", map.display());
        if config.viewer.enable {
            println!(
                "View the map at {}",
                viewer::map_url(&config.viewer, MapRenderer::OUTPUT_FILE)
            );
            println!("Press Ctrl-C to exit...");
            viewer::serve_until_dismissed(&config.viewer, tracker.map_dir()).await?;
        }
    }

    tracing::info!("ISS tracker finished");
    Ok(())
}
