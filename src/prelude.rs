pub use anyhow::{anyhow, bail, Result};
pub use log::{debug, error, info, trace, warn};
pub use serde_json::{json, Value};
pub use std::str::FromStr;
pub use tokio::sync::broadcast;

pub use crate::channels::Channels;
pub use crate::command::Command;
pub use crate::config::{self, Config};
pub use crate::controller::{
    self,
    message::{Action, ChargeMode, PropertyRecord, Response},
    session::{Session, Timeouts},
};
pub use crate::coordinator::{self, Coordinator};
pub use crate::error::ClientError;
pub use crate::options::Options;
pub use crate::{file_error, file_error_with_source};
