use super::packet::{EnginePacket, SocketPacket, DEFAULT_NAMESPACE};
use super::types::{ChannelEvent, ProgressMessage};
use crate::config::ClientConfig;
use crate::error::ChannelError;
use futures_util::{SinkExt, StreamExt};
use std::sync::mpsc::{channel, Receiver, Sender, TryIter};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Long-lived subscription to the server's progress events.
///
/// Created once when the window opens. Events are queued on a std channel so
/// the UI thread can drain them without blocking; dropping the subscription
/// stops the listener task.
pub struct ProgressChannel {
    events: Receiver<ChannelEvent>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl ProgressChannel {
    pub fn subscribe(runtime: &Handle, config: &ClientConfig) -> Self {
        Self::subscribe_to(
            runtime,
            config.progress_url(),
            config.progress_event.clone(),
            config.connect_timeout,
        )
    }

    pub fn subscribe_to(
        runtime: &Handle,
        url: Url,
        event: String,
        connect_timeout: Duration,
    ) -> Self {
        let (event_sender, events) = channel();
        let (shutdown, shutdown_signal) = oneshot::channel::<()>();

        runtime.spawn(async move {
            let _ = event_sender.send(ChannelEvent::Connecting);

            let reason = tokio::select! {
                _ = shutdown_signal => {
                    debug!("progress channel shut down");
                    None
                }
                result = run_session(&url, &event, connect_timeout, &event_sender) => match result {
                    Ok(()) => {
                        info!("progress channel closed by server");
                        None
                    }
                    Err(e) => {
                        warn!(url = %url, "progress channel failed: {}", e);
                        Some(e.to_string())
                    }
                },
            };

            let _ = event_sender.send(ChannelEvent::Disconnected(reason));
        });

        Self {
            events,
            shutdown: Some(shutdown),
        }
    }

    /// Events received since the last call, in arrival order.
    pub fn drain(&self) -> TryIter<'_, ChannelEvent> {
        self.events.try_iter()
    }

    /// Blocks until the next event or until `wait` elapses.
    pub fn next_event(&self, wait: Duration) -> Option<ChannelEvent> {
        self.events.recv_timeout(wait).ok()
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

async fn run_session(
    url: &Url,
    event: &str,
    connect_timeout: Duration,
    events: &Sender<ChannelEvent>,
) -> Result<(), ChannelError> {
    info!(url = %url, "connecting progress channel");

    let (mut ws, _) = timeout(connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_| ChannelError::Timeout(connect_timeout))??;

    let handshake = match next_packet(&mut ws, connect_timeout).await? {
        Some(EnginePacket::Open(handshake)) => handshake,
        Some(other) => {
            return Err(ChannelError::Protocol(format!(
                "expected open packet, got {:?}",
                other
            )))
        }
        None => return Ok(()),
    };
    debug!(sid = %handshake.sid, "engine.io session opened");

    let connect = EnginePacket::Message(SocketPacket::connect(DEFAULT_NAMESPACE).encode());
    ws.send(Message::Text(connect.encode())).await?;

    let liveness = handshake.liveness_window();
    while let Some(packet) = next_packet(&mut ws, liveness).await? {
        match packet {
            EnginePacket::Ping(data) => {
                ws.send(Message::Text(EnginePacket::Pong(data).encode()))
                    .await?;
            }
            EnginePacket::Message(body) => match SocketPacket::decode(&body) {
                Ok(packet) if packet.namespace() != DEFAULT_NAMESPACE => {
                    debug!("ignoring packet for namespace {}", packet.namespace())
                }
                Ok(SocketPacket::Connect { .. }) => {
                    info!("progress channel connected");
                    let _ = events.send(ChannelEvent::Connected);
                }
                Ok(SocketPacket::Event { name, args, .. }) if name == event => {
                    let message = ProgressMessage::from_args(&args);
                    debug!(message = %message.message, "progress");
                    let _ = events.send(ChannelEvent::Progress(message));
                }
                Ok(SocketPacket::ConnectError { payload, .. }) => {
                    return Err(ChannelError::Rejected(payload.to_string()));
                }
                Ok(SocketPacket::Disconnect { .. }) => return Ok(()),
                Ok(other) => debug!("ignoring packet {:?}", other),
                Err(e) => warn!("skipping socket.io packet: {}", e),
            },
            EnginePacket::Close => return Ok(()),
            EnginePacket::Open(_)
            | EnginePacket::Pong(_)
            | EnginePacket::Upgrade
            | EnginePacket::Noop => {}
        }
    }

    Ok(())
}

/// Next Engine.IO packet, or `None` once the socket is closed.
async fn next_packet(ws: &mut WsStream, wait: Duration) -> Result<Option<EnginePacket>, ChannelError> {
    loop {
        let frame = match timeout(wait, ws.next()).await {
            Err(_) => return Err(ChannelError::Timeout(wait)),
            Ok(None) => return Ok(None),
            Ok(Some(frame)) => frame?,
        };

        match frame {
            Message::Text(text) => return Ok(Some(EnginePacket::decode(&text)?)),
            Message::Close(_) => return Ok(None),
            // websocket-level ping/pong is answered by tungstenite
            _ => continue,
        }
    }
}
