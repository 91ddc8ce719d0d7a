use crate::prelude::*;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite, MaybeTlsStream, WebSocketStream};

/// A message-oriented, full-duplex connection carrying JSON text frames.
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, text: String) -> Result<(), ClientError>;

    /// Next text frame, or `None` once the peer has closed the connection.
    async fn recv(&mut self) -> Result<Option<String>, ClientError>;

    async fn close(&mut self) -> Result<(), ClientError>;
}

/// Opens transports. The session owns one and calls it on every connect attempt.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, ClientError>;
}

// WebSocket {{{
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketConnector;

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, ClientError> {
        let (stream, response) = connect_async(url).await.map_err(transport_error)?;
        debug!("websocket open to {} (HTTP {})", url, response.status());

        Ok(Box::new(WebSocketTransport { stream }))
    }
}

pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn send(&mut self, text: String) -> Result<(), ClientError> {
        self.stream
            .send(tungstenite::Message::Text(text))
            .await
            .map_err(transport_error)
    }

    async fn recv(&mut self) -> Result<Option<String>, ClientError> {
        use tungstenite::Message;

        while let Some(message) = self.stream.next().await {
            match message.map_err(transport_error)? {
                Message::Text(text) => return Ok(Some(text)),
                Message::Binary(bytes) => {
                    return String::from_utf8(bytes)
                        .map(Some)
                        .map_err(|err| ClientError::Decode(format!("binary frame is not UTF-8: {}", err)));
                }
                Message::Close(frame) => {
                    debug!("websocket closed by peer: {:?}", frame);
                    return Ok(None);
                }
                // tungstenite answers pings itself
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }

        Ok(None)
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.stream.close(None).await.map_err(transport_error)
    }
}

fn transport_error(err: tungstenite::Error) -> ClientError {
    ClientError::Transport(err.to_string())
} // }}}
