use crate::prelude::*;
use crate::controller::message::{Handshake, Request};
use crate::controller::transport::{Connector, Transport, WebSocketConnector};

use serde_json::Map;
use std::time::Duration;

pub const DEFAULT_URL: &str = "ws://device.gz529.com/";

const CONNECTION_TIMEOUT_SECS: u64 = 5; // per attempt: socket open, then handshake
const COMMAND_TIMEOUT_SECS: u64 = 10; // waiting for the reply to a command
const RETRY_DELAY_SECS: u64 = 2; // pause between connect attempts
const MAX_ATTEMPTS: u32 = 3;

/// Frames seen by the listener that were not a reply to any command.
#[derive(PartialEq, Debug, Clone)]
pub enum ChannelData {
    Message(Value),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub command: Duration,
    pub retry_delay: Duration,
    pub max_attempts: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(CONNECTION_TIMEOUT_SECS),
            command: Duration::from_secs(COMMAND_TIMEOUT_SECS),
            retry_delay: Duration::from_secs(RETRY_DELAY_SECS),
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// A single connection to the controller server.
///
/// Only one command may be outstanding at a time: replies carry no request
/// id, so the next frame after a command is taken to be its reply. Every
/// operation that reads from the socket takes `&mut self`, which keeps the
/// listener and command replies from interleaving.
pub struct Session {
    url: String,
    mac: String,
    connector: Box<dyn Connector>,
    transport: Option<Box<dyn Transport>>,
    client_id: Option<String>,
    connected: bool,
    timeouts: Timeouts,
}

impl Session {
    pub fn new<U, M>(url: U, mac: M, connector: Box<dyn Connector>) -> Result<Self, ClientError>
    where
        U: Into<String>,
        M: Into<String>,
    {
        let mac = mac.into();
        if mac.trim().is_empty() {
            return Err(ClientError::InvalidDeviceId);
        }

        Ok(Self {
            url: url.into(),
            mac,
            connector,
            transport: None,
            client_id: None,
            connected: false,
            timeouts: Timeouts::default(),
        })
    }

    pub fn websocket<U, M>(url: U, mac: M) -> Result<Self, ClientError>
    where
        U: Into<String>,
        M: Into<String>,
    {
        Self::new(url, mac, Box::new(WebSocketConnector))
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn is_connected(&self) -> bool {
        self.connected && self.transport.is_some()
    }

    /// Opens the connection and waits for the handshake, trying up to
    /// `max_attempts` times. Each attempt is bounded by `timeout`.
    pub async fn connect(&mut self, timeout: Duration, max_attempts: u32) -> bool {
        if self.transport.is_some() {
            self.disconnect().await;
        }

        for attempt in 1..=max_attempts {
            info!("Connection attempt {} of {} to {}...", attempt, max_attempts, self.url);

            match self.attempt(timeout).await {
                Ok((transport, client_id)) => {
                    info!("Connected successfully. Client ID: {}", client_id);
                    self.transport = Some(transport);
                    self.client_id = Some(client_id);
                    self.connected = true;
                    return true;
                }
                Err(err) => error!("Connection attempt {} failed: {}", attempt, err),
            }

            if attempt < max_attempts {
                info!("Retrying in {:?}...", self.timeouts.retry_delay);
                tokio::time::sleep(self.timeouts.retry_delay).await;
            }
        }

        error!("Failed to connect after {} attempts", max_attempts);
        false
    }

    async fn attempt(&self, timeout: Duration) -> Result<(Box<dyn Transport>, String), ClientError> {
        let mut transport = match tokio::time::timeout(timeout, self.connector.connect(&self.url)).await {
            Ok(result) => result?,
            Err(_) => return Err(ClientError::ConnectionTimeout(timeout)),
        };
        debug!("Websocket connection open.");

        match Self::handshake(transport.as_mut(), timeout).await {
            Ok(client_id) => Ok((transport, client_id)),
            Err(err) => {
                Self::close_transport(transport, timeout).await;
                Err(err)
            }
        }
    }

    async fn handshake(transport: &mut dyn Transport, timeout: Duration) -> Result<String, ClientError> {
        let frame = match tokio::time::timeout(timeout, transport.recv()).await {
            Ok(Ok(Some(frame))) => frame,
            Ok(Ok(None)) => {
                return Err(ClientError::Transport("connection closed before handshake".to_owned()))
            }
            Ok(Err(err)) => return Err(err),
            Err(_) => return Err(ClientError::ConnectionTimeout(timeout)),
        };
        debug!("Received handshake from server: {}", frame);

        Handshake::parse(&frame)
    }

    pub async fn send_command(
        &mut self,
        action: &str,
        params: Map<String, Value>,
    ) -> Result<Response, ClientError> {
        self.send_request(Request::with_params(action, params)).await
    }

    /// Sends one command and waits for the next frame as its reply.
    ///
    /// A timeout or transport failure leaves the socket in an unknown state,
    /// so the session is disconnected before the error is returned.
    pub async fn send_request(&mut self, request: Request) -> Result<Response, ClientError> {
        let command_timeout = self.timeouts.command;

        let transport = match (self.connected, self.transport.as_mut()) {
            (true, Some(transport)) => transport,
            _ => return Err(ClientError::NotConnected),
        };

        let command = serde_json::to_string(&request.envelope(&self.mac))
            .map_err(|err| ClientError::CommandError(err.to_string()))?;
        debug!("Sending command: {}", command);

        let reply = match transport.send(command).await {
            Ok(()) => match tokio::time::timeout(command_timeout, transport.recv()).await {
                Ok(Ok(Some(frame))) => Ok(frame),
                Ok(Ok(None)) => Err(ClientError::Transport("connection closed by server".to_owned())),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(ClientError::CommandTimeout(command_timeout)),
            },
            Err(err) => Err(err),
        };

        let frame = match reply {
            Ok(frame) => frame,
            Err(err) => {
                warn!("{} failed ({}), dropping connection", request.action, err);
                self.invalidate().await;
                return Err(err);
            }
        };
        debug!("Received response: {}", frame);

        serde_json::from_str::<Response>(&frame)
            .map_err(|err| ClientError::CommandError(format!("unparsable response {:?}: {}", frame, err)))
    }

    /// Closes the connection. Safe to call any number of times.
    pub async fn disconnect(&mut self) {
        if self.transport.is_none() && !self.connected {
            return;
        }

        self.invalidate().await;
        info!("Disconnected from server");
    }

    async fn invalidate(&mut self) {
        if let Some(transport) = self.transport.take() {
            Self::close_transport(transport, self.timeouts.connect).await;
        }
        self.connected = false;
        self.client_id = None;
    }

    async fn close_transport(mut transport: Box<dyn Transport>, timeout: Duration) {
        match tokio::time::timeout(timeout, transport.close()).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => debug!("Error while closing websocket: {}", err),
            Err(_) => debug!("Timed out closing websocket after {:?}", timeout),
        }
    }

    /// Best-effort reader for unsolicited frames. Publishes each decoded frame
    /// on `sink` until shutdown, the peer closes, or the first error.
    pub async fn listen(
        &mut self,
        shutdown: &mut broadcast::Receiver<()>,
        sink: &broadcast::Sender<ChannelData>,
    ) -> Result<(), ClientError> {
        let result = self.listen_loop(shutdown, sink).await;
        let _ = sink.send(ChannelData::Closed);

        if let Err(err) = &result {
            error!("Error in message listener: {}", err);
        }
        result
    }

    async fn listen_loop(
        &mut self,
        shutdown: &mut broadcast::Receiver<()>,
        sink: &broadcast::Sender<ChannelData>,
    ) -> Result<(), ClientError> {
        while self.connected {
            let Some(transport) = self.transport.as_mut() else {
                break;
            };

            let frame = tokio::select! {
                _ = shutdown.recv() => {
                    debug!("listener received shutdown signal");
                    return Ok(());
                }
                frame = transport.recv() => frame,
            };

            match frame {
                Ok(Some(text)) => {
                    let message: Value = serde_json::from_str(&text)?;
                    debug!("Received message: {}", message);
                    // nobody subscribed is fine
                    let _ = sink.send(ChannelData::Message(message));
                }
                Ok(None) => {
                    info!("Server closed the connection");
                    self.invalidate().await;
                }
                Err(err) => {
                    self.invalidate().await;
                    return Err(err);
                }
            }
        }

        Ok(())
    }
}
