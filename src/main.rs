use pairpulse::app::{Config, Dashboard};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let config = match Config::discover() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("pairpulse starting");

    tokio::select! {
        result = Dashboard::run(config) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("pairpulse stopped");
}
