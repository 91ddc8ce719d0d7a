use solar_client::prelude::*;

#[tokio::main]
async fn main() {
    let options = Options::new();

    let config = match Config::from_options(&options) {
        Ok(config) => config,
        Err(err) => {
            solar_client::init_logging(if options.verbose { "debug" } else { "info" });
            error!("Failed to load config: {:#}", err);
            std::process::exit(1);
        }
    };
    solar_client::init_logging(config.loglevel());

    let channels = Channels::new();

    // Handle Ctrl+C
    let shutdown_tx = channels.shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        if let Err(e) = shutdown_tx.send(()) {
            error!("Failed to send shutdown signal: {}", e);
        }
    });

    match solar_client::app(options, config, channels).await {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            error!("Application error: {:#}", err);
            std::process::exit(1);
        }
    }
}
