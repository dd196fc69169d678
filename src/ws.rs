// src/ws.rs

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::error::{Result, SdkError};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Delay before the driver retries a dropped connection.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Buffered events per receiver before slow subscribers start lagging.
const EVENT_BUFFER: usize = 256;

/// A subscribable event channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Blocks,
    Transactions,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Blocks => write!(f, "blocks"),
            Channel::Transactions => write!(f, "transactions"),
        }
    }
}

/// Frames the client sends to the server.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ClientFrame<'a> {
    Auth {
        #[serde(rename = "apiKey")]
        api_key: &'a str,
    },
    Subscribe {
        channel: Channel,
    },
    Unsubscribe {
        channel: Channel,
    },
}

/// Events pushed by the server. Anything unrecognized is ignored so new
/// server-side event types don't break older SDKs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
enum StreamEvent {
    Block(serde_json::Value),
    Transaction(serde_json::Value),
    #[serde(other)]
    Unknown,
}

impl StreamEvent {
    fn channel(&self) -> Option<Channel> {
        match self {
            StreamEvent::Block(_) => Some(Channel::Blocks),
            StreamEvent::Transaction(_) => Some(Channel::Transactions),
            StreamEvent::Unknown => None,
        }
    }

    fn into_payload(self) -> Option<serde_json::Value> {
        match self {
            StreamEvent::Block(payload) | StreamEvent::Transaction(payload) => Some(payload),
            StreamEvent::Unknown => None,
        }
    }
}

enum WsCommand {
    Subscribe(Channel),
    Unsubscribe(Channel),
    Shutdown,
}

/// Handle to the driver task. Cloning shares the same connection.
pub(crate) struct WsHandle {
    cmd_tx: mpsc::UnboundedSender<WsCommand>,
    events: broadcast::Receiver<StreamEvent>,
}

impl Clone for WsHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events: self.events.resubscribe(),
        }
    }
}

impl WsHandle {
    pub(crate) fn subscribe<T>(&self, channel: Channel) -> Subscription<T> {
        // Fire-and-forget: if the driver is gone the subscription just
        // yields no events.
        let _ = self.cmd_tx.send(WsCommand::Subscribe(channel));
        Subscription {
            rx: self.events.resubscribe(),
            channel,
            cmd_tx: self.cmd_tx.clone(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn shutdown(&self) {
        let _ = self.cmd_tx.send(WsCommand::Shutdown);
    }
}

/// Live event stream for one channel, produced by
/// [`subscribe_blocks`](crate::SelfClient::subscribe_blocks) and
/// [`subscribe_transactions`](crate::SelfClient::subscribe_transactions).
///
/// Dropping the subscription unsubscribes from the channel once the last
/// subscriber is gone.
pub struct Subscription<T> {
    rx: broadcast::Receiver<StreamEvent>,
    channel: Channel,
    cmd_tx: mpsc::UnboundedSender<WsCommand>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Subscription<T> {
    /// Waits for the next event on this channel. Returns `None` once the
    /// connection is closed for good.
    pub async fn next(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if event.channel() != Some(self.channel) {
                        continue;
                    }
                    let Some(payload) = event.into_payload() else {
                        continue;
                    };
                    match serde_json::from_value(payload) {
                        Ok(value) => return Some(value),
                        Err(e) => warn!("Failed to decode {} event: {}", self.channel, e),
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        "Subscriber on {} lagging, {} events dropped",
                        self.channel, skipped
                    );
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(WsCommand::Unsubscribe(self.channel));
    }
}

/// Spawns the websocket driver task and returns a handle to it.
///
/// The driver owns the socket; the handle talks to it over a command
/// channel, so the client never blocks on websocket I/O.
pub(crate) fn spawn(url: String, api_key: Option<String>, auto_reconnect: bool) -> WsHandle {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = broadcast::channel(EVENT_BUFFER);

    let driver = WsDriver {
        url,
        api_key,
        auto_reconnect,
        cmd_rx,
        events: event_tx,
        active: HashMap::new(),
    };
    tokio::spawn(driver.run());

    WsHandle {
        cmd_tx,
        events: event_rx,
    }
}

enum SessionEnd {
    Reconnect,
    Shutdown,
}

struct WsDriver {
    url: String,
    api_key: Option<String>,
    auto_reconnect: bool,
    cmd_rx: mpsc::UnboundedReceiver<WsCommand>,
    events: broadcast::Sender<StreamEvent>,
    /// Subscriber counts per channel; the wire subscription is held while
    /// the count is non-zero.
    active: HashMap<Channel, usize>,
}

impl WsDriver {
    async fn run(mut self) {
        loop {
            match connect_async(self.url.as_str()).await {
                Ok((stream, _)) => {
                    info!("WebSocket connected to {}", self.url);
                    if let SessionEnd::Shutdown = self.session(stream).await {
                        return;
                    }
                }
                Err(e) => warn!("WebSocket connection to {} failed: {}", self.url, e),
            }

            if !self.auto_reconnect {
                return;
            }
            if let SessionEnd::Shutdown = self.backoff().await {
                return;
            }
        }
    }

    /// Waits out the reconnect delay while still tracking subscription
    /// changes that arrive in the meantime.
    async fn backoff(&mut self) -> SessionEnd {
        let delay = tokio::time::sleep(RECONNECT_DELAY);
        tokio::pin!(delay);
        let WsDriver { cmd_rx, active, .. } = self;
        loop {
            tokio::select! {
                _ = &mut delay => return SessionEnd::Reconnect,
                cmd = cmd_rx.recv() => match cmd {
                    Some(WsCommand::Subscribe(channel)) => {
                        *active.entry(channel).or_insert(0) += 1;
                    }
                    Some(WsCommand::Unsubscribe(channel)) => {
                        release(active, channel);
                    }
                    Some(WsCommand::Shutdown) | None => return SessionEnd::Shutdown,
                },
            }
        }
    }

    async fn session(&mut self, stream: WsStream) -> SessionEnd {
        let (mut sink, mut source) = stream.split();

        if let Some(key) = self.api_key.clone() {
            if send_frame(&mut sink, &ClientFrame::Auth { api_key: &key })
                .await
                .is_err()
            {
                return SessionEnd::Reconnect;
            }
        }

        // Restore subscriptions that survived a reconnect.
        let channels: Vec<Channel> = self.active.keys().copied().collect();
        for channel in channels {
            if send_frame(&mut sink, &ClientFrame::Subscribe { channel })
                .await
                .is_err()
            {
                return SessionEnd::Reconnect;
            }
        }

        let WsDriver { cmd_rx, active, events, url, .. } = self;
        loop {
            tokio::select! {
                msg = source.next() => match msg {
                    Some(Ok(Message::Text(text))) => dispatch(events, &text),
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("WebSocket connection to {} closed", url);
                        return SessionEnd::Reconnect;
                    }
                    Some(Ok(_)) => {} // ping/pong/binary
                    Some(Err(e)) => {
                        warn!("WebSocket read error: {}", e);
                        return SessionEnd::Reconnect;
                    }
                },
                cmd = cmd_rx.recv() => match cmd {
                    Some(WsCommand::Subscribe(channel)) => {
                        let count = active.entry(channel).or_insert(0);
                        *count += 1;
                        if *count == 1 {
                            let _ = send_frame(&mut sink, &ClientFrame::Subscribe { channel }).await;
                        }
                    }
                    Some(WsCommand::Unsubscribe(channel)) => {
                        if release(active, channel) {
                            let _ = send_frame(&mut sink, &ClientFrame::Unsubscribe { channel }).await;
                        }
                    }
                    Some(WsCommand::Shutdown) | None => {
                        let _ = sink.send(Message::Close(None)).await;
                        return SessionEnd::Shutdown;
                    }
                },
            }
        }
    }
}

/// Drops one subscriber from a channel; true when it was the last.
fn release(active: &mut HashMap<Channel, usize>, channel: Channel) -> bool {
    if let Some(count) = active.get_mut(&channel) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            active.remove(&channel);
            return true;
        }
    }
    false
}

fn dispatch(events: &broadcast::Sender<StreamEvent>, text: &str) {
    match serde_json::from_str::<StreamEvent>(text) {
        Ok(StreamEvent::Unknown) => debug!("Ignoring unrecognized websocket message"),
        Ok(event) => {
            // Send only fails when no subscriber is listening.
            let _ = events.send(event);
        }
        Err(e) => warn!("Failed to parse websocket message: {}", e),
    }
}

async fn send_frame(sink: &mut WsSink, frame: &ClientFrame<'_>) -> Result<()> {
    let json = serde_json::to_string(frame)?;
    sink.send(Message::Text(json))
        .await
        .map_err(|e| SdkError::WebSocket(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_frame_matches_wire_format() {
        let frame = serde_json::to_value(ClientFrame::Auth { api_key: "k" }).unwrap();
        assert_eq!(frame, json!({"type": "auth", "apiKey": "k"}));
    }

    #[test]
    fn subscribe_frames_match_wire_format() {
        let frame = serde_json::to_value(ClientFrame::Subscribe {
            channel: Channel::Blocks,
        })
        .unwrap();
        assert_eq!(frame, json!({"type": "subscribe", "channel": "blocks"}));

        let frame = serde_json::to_value(ClientFrame::Unsubscribe {
            channel: Channel::Transactions,
        })
        .unwrap();
        assert_eq!(frame, json!({"type": "unsubscribe", "channel": "transactions"}));
    }

    #[test]
    fn block_event_parses_with_payload() {
        let event: StreamEvent =
            serde_json::from_value(json!({"type": "block", "data": {"height": 1}})).unwrap();
        assert_eq!(event.channel(), Some(Channel::Blocks));
        assert_eq!(event.into_payload(), Some(json!({"height": 1})));
    }

    #[test]
    fn unknown_event_types_are_ignored() {
        let event: StreamEvent =
            serde_json::from_value(json!({"type": "heartbeat", "data": {}})).unwrap();
        assert!(matches!(event, StreamEvent::Unknown));
    }
}
