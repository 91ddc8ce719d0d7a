pub mod channels;      // Shutdown and listener broadcast channels
pub mod command;       // CLI command parsing
pub mod config;        // Configuration management
pub mod controller;    // Charge controller protocol, session and value interpretation
pub mod coordinator;   // Runs one command against a session
pub mod error;         // Error handling and types
pub mod options;       // Command line options parsing
pub mod prelude;       // Common imports and types

const CARGO_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

use crate::prelude::*;
use std::io::Write;

/// Sets up env_logger with `level` as the default filter; `RUST_LOG` still
/// takes precedence. Safe to call more than once, later calls are ignored.
pub fn init_logging(level: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.module_path().unwrap_or(""),
                record.args()
            )
        })
        .write_style(env_logger::WriteStyle::Never)
        .try_init();

    if let Err(e) = result {
        debug!("logger already initialised: {}", e);
    }
}

/// Runs the command named in `options` to completion, or until a shutdown
/// is broadcast on `channels`. Returns whether the command succeeded.
pub async fn app(options: Options, config: Config, channels: Channels) -> Result<bool> {
    info!("solar-client {} starting", CARGO_PKG_VERSION);
    config.log_summary();

    let session = Session::websocket(config.url(), config.mac())?.with_timeouts(config.timeouts());

    let mut shutdown_rx = channels.shutdown.subscribe();
    let mut coordinator = Coordinator::new(session, channels);

    let success = tokio::select! {
        success = coordinator.run(&options.command, options.value) => success,
        _ = shutdown_rx.recv() => {
            println!("\nExiting...");
            true
        }
    };

    Ok(success)
}
