//! Coordinator control channel
//!
//! WebSocket connection to the coordinator. Messages are opaque text both
//! ways; the session decides what to send and how to interpret what
//! arrives. Shutdown sends a normal-closure frame and waits a bounded
//! interval for the peer's acknowledgment before tearing the socket down.

use crate::config::AgentConfig;
use crate::error::AgentError;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

/// How long to wait for the peer to acknowledge a clean close
const CLOSE_ACK_WAIT: Duration = Duration::from_secs(1);

/// Bidirectional message channel to the coordinator
pub struct ControlChannel {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl std::fmt::Debug for ControlChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlChannel").finish_non_exhaustive()
    }
}

impl ControlChannel {
    /// Dial the coordinator's agent endpoint and authenticate
    pub async fn connect(config: &AgentConfig) -> Result<Self, AgentError> {
        let url = config.channel_url();
        info!("Connecting to {}", url);

        let mut request = url.into_client_request()?;
        let authorization = HeaderValue::from_str(&config.authorization()).map_err(|_| {
            AgentError::InvalidConfig("auth token contains invalid header characters".to_string())
        })?;
        request.headers_mut().insert(AUTHORIZATION, authorization);

        let (socket, _response) = connect_async(request).await?;
        info!("Control channel established");
        Ok(Self { socket })
    }

    /// Send one text message
    pub async fn send_text(&mut self, text: String) -> Result<(), AgentError> {
        self.socket.send(Message::text(text)).await?;
        Ok(())
    }

    /// The next inbound message; `None` once the stream has ended
    pub async fn next(&mut self) -> Option<Result<Message, AgentError>> {
        match self.socket.next().await {
            Some(Ok(message)) => Some(Ok(message)),
            Some(Err(err)) => Some(Err(err.into())),
            None => None,
        }
    }

    /// Close the channel cleanly.
    ///
    /// Sends a normal-closure frame, then drains the socket until the
    /// peer's close arrives or the bounded wait elapses. Either way the
    /// socket is gone when this returns.
    pub async fn close(&mut self) {
        let frame = CloseFrame {
            code: CloseCode::Normal,
            reason: "Client shutting down".into(),
        };
        if let Err(err) = self.socket.send(Message::Close(Some(frame))).await {
            warn!("write close: {}", err);
            return;
        }

        let acknowledged = tokio::time::timeout(CLOSE_ACK_WAIT, async {
            while let Some(message) = self.socket.next().await {
                match message {
                    Ok(Message::Close(_)) | Err(_) => break,
                    Ok(_) => continue,
                }
            }
        })
        .await;

        match acknowledged {
            Ok(()) => debug!("Peer acknowledged close"),
            Err(_) => warn!(
                "No close acknowledgment within {:?}, tearing down",
                CLOSE_ACK_WAIT
            ),
        }
    }
}
