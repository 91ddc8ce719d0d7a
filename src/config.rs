use crate::prelude::*;
use crate::controller::session::{Timeouts, DEFAULT_URL};

use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_url")]
    pub url: String,

    /// Device MAC address. Always supplied on the command line.
    #[serde(skip)]
    pub mac: String,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    /// Seconds allowed for each connect attempt (socket open, then handshake)
    #[serde(default = "Config::default_connect_timeout")]
    pub connect_timeout: f64,

    /// Seconds to wait for the reply to a command
    #[serde(default = "Config::default_command_timeout")]
    pub command_timeout: f64,

    /// Seconds between connect attempts
    #[serde(default = "Config::default_retry_delay")]
    pub retry_delay: f64,

    #[serde(default = "Config::default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            mac: String::new(),
            loglevel: Self::default_loglevel(),
            connect_timeout: Self::default_connect_timeout(),
            command_timeout: Self::default_command_timeout(),
            retry_delay: Self::default_retry_delay(),
            max_attempts: Self::default_max_attempts(),
        }
    }
}

impl Config {
    pub fn new(file: &str) -> Result<Self> {
        let content = std::fs::read_to_string(file)
            .map_err(|err| file_error_with_source!(err, "error reading {}", file))?;

        let config: Self = serde_yaml::from_str(&content)
            .map_err(|err| file_error_with_source!(err, "error parsing {}", file))?;

        Ok(config)
    }

    /// Config file (if any) overlaid with command line flags, validated.
    pub fn from_options(options: &Options) -> Result<Self> {
        let mut config = match &options.config_file {
            Some(file) => Self::new(file)?,
            None => Self::default(),
        };

        if let Some(url) = &options.url {
            config.url = url.clone();
        }
        config.mac = options.mac.clone();
        if options.verbose {
            config.loglevel = "debug".to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn log_summary(&self) {
        info!("Configuration:");
        info!("  URL: {}", self.url);
        info!("  MAC: {}", self.mac);
        info!("  Connect timeout: {}s", self.connect_timeout);
        info!("  Command timeout: {}s", self.command_timeout);
        info!("  Retry delay: {}s", self.retry_delay);
        info!("  Max attempts: {}", self.max_attempts);
        info!("  Log level: {}", self.loglevel);
    }

    pub fn validate(&self) -> Result<()> {
        match url::Url::parse(&self.url) {
            Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
            Ok(url) => bail!("url must use ws:// or wss://, got {}://", url.scheme()),
            Err(e) => return Err(file_error!("Invalid websocket URL {}: {}", self.url, e)),
        }

        if self.mac.trim().is_empty() {
            bail!("mac cannot be empty");
        }

        for (name, secs) in [
            ("connect_timeout", self.connect_timeout),
            ("command_timeout", self.command_timeout),
        ] {
            if !secs.is_finite() || secs <= 0.0 {
                bail!("{} must be a positive number of seconds, got {}", name, secs);
            }
        }
        if !self.retry_delay.is_finite() || self.retry_delay < 0.0 {
            bail!("retry_delay cannot be negative, got {}", self.retry_delay);
        }

        for (name, secs) in [
            ("connect_timeout", self.connect_timeout),
            ("command_timeout", self.command_timeout),
            ("retry_delay", self.retry_delay),
        ] {
            if let Err(e) = Duration::try_from_secs_f64(secs) {
                bail!("{} of {} seconds is out of range: {}", name, secs, e);
            }
        }

        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }

        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn loglevel(&self) -> &str {
        &self.loglevel
    }

    pub fn connect_timeout(&self) -> Duration {
        seconds(self.connect_timeout)
    }

    pub fn command_timeout(&self) -> Duration {
        seconds(self.command_timeout)
    }

    pub fn retry_delay(&self) -> Duration {
        seconds(self.retry_delay)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: self.connect_timeout(),
            command: self.command_timeout(),
            retry_delay: self.retry_delay(),
            max_attempts: self.max_attempts(),
        }
    }

    fn default_url() -> String {
        DEFAULT_URL.to_string()
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_connect_timeout() -> f64 {
        Timeouts::default().connect.as_secs_f64()
    }

    fn default_command_timeout() -> f64 {
        Timeouts::default().command.as_secs_f64()
    }

    fn default_retry_delay() -> f64 {
        Timeouts::default().retry_delay.as_secs_f64()
    }

    fn default_max_attempts() -> u32 {
        Timeouts::default().max_attempts
    }
}

// out of range values are rejected by validate(); clamp for unvalidated configs
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
}
