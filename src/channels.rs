use crate::prelude::*;
use crate::controller::session::ChannelData;

#[derive(Debug, Clone)]
pub struct Channels {
    /// Fired once on Ctrl+C; anything long-running subscribes to it.
    pub shutdown: broadcast::Sender<()>,
    /// Unsolicited frames picked up by the session listener.
    pub from_controller: broadcast::Sender<ChannelData>,
}

impl Default for Channels {
    fn default() -> Self {
        Self::new()
    }
}

impl Channels {
    pub fn new() -> Self {
        Self {
            shutdown: Self::channel(),
            from_controller: Self::channel(),
        }
    }

    fn channel<T: Clone>() -> broadcast::Sender<T> {
        broadcast::channel(256).0
    }
}
