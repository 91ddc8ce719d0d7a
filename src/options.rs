use clap::builder::PossibleValuesParser;
use clap::Parser;

use crate::command::Command;

/// Solar Charge Controller Client - query and control a charge controller over websocket
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Websocket URL [default: ws://device.gz529.com/]
    #[clap(long = "url")]
    pub url: Option<String>,

    /// Device MAC address
    #[clap(long = "mac", required = true)]
    pub mac: String,

    /// Command to execute
    #[clap(long = "command", required = true, value_parser = PossibleValuesParser::new(Command::NAMES))]
    pub command: String,

    /// Value for the command (required for set-charge-mode)
    #[clap(long = "value", allow_negative_numbers = true)]
    pub value: Option<i64>,

    /// Enable verbose logging
    #[clap(long = "verbose")]
    pub verbose: bool,

    /// Optional YAML config file with connection settings
    #[clap(short = 'c', long = "config")]
    pub config_file: Option<String>,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}
