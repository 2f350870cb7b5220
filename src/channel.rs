//! Live channel to the backend over WebSocket.
//!
//! A [`LiveChannel`] is only an address; connecting is an explicit second
//! step. What travels over the socket is up to the caller, so the connection
//! exposes text frames and a JSON convenience on top.

use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use crate::error::ClientError;

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Unconnected handle bound to a `ws://` or `wss://` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiveChannel {
    url: Url,
}

impl LiveChannel {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Open the socket.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the handshake fails.
    pub async fn connect(&self) -> Result<LiveConnection, ClientError> {
        tracing::debug!(url = %self.url, "connecting live channel");
        let (socket, _) = connect_async(self.url.as_str()).await?;
        Ok(LiveConnection { socket })
    }
}

/// An open live channel.
pub struct LiveConnection {
    socket: Socket,
}

impl LiveConnection {
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the frame cannot be written.
    pub async fn send_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.socket.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Serialize `value` and send it as one text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if `value` does not serialize, or
    /// [`ClientError::WebSocket`] if the frame cannot be written.
    pub async fn send_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ClientError> {
        let text = serde_json::to_string(value)?;
        self.send_text(&text).await
    }

    /// Next text frame; `None` once the peer closes. Control and binary
    /// frames are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] on a protocol or I/O failure.
    pub async fn next_text(&mut self) -> Result<Option<String>, ClientError> {
        while let Some(message) = self.socket.next().await {
            match message? {
                Message::Text(text) => return Ok(Some(text.as_str().to_owned())),
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Like [`LiveConnection::next_text`] but treats a closed channel as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ChannelClosed`] when the peer has closed.
    pub async fn expect_text(&mut self) -> Result<String, ClientError> {
        self.next_text().await?.ok_or(ClientError::ChannelClosed)
    }

    /// Send a close frame and drop the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::WebSocket`] if the close handshake fails.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.socket.close(None).await?;
        Ok(())
    }
}
