use crate::agent::{AgentPhase, NegotiationAgent};
use crate::config::ClientConfig;
use crate::engine::{EngineEvent, NegotiationEngine};
use crate::error::ClientError;
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tandem_core::{Frame, FrameError, SignalMessage};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

mod keepalive;

pub(crate) use keepalive::Keepalive;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A participant's link to the signaling server.
///
/// Owns the socket and the [`NegotiationAgent`] it feeds. Outbound signals
/// and keepalive pings share a single writer task.
pub struct SignalingConnection {
    keepalive_interval: Duration,
    ws: WsStream,
    agent: NegotiationAgent,
    outbound_rx: mpsc::UnboundedReceiver<SignalMessage>,
}

impl SignalingConnection {
    pub async fn connect(
        config: &ClientConfig,
        engine: Arc<dyn NegotiationEngine>,
    ) -> Result<Self, ClientError> {
        info!("Connecting to signaling server at {}", config.url);
        let (ws, _) = connect_async(config.url.as_str()).await?;
        info!("Connected to signaling server");

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let agent = NegotiationAgent::new(config.role, engine, outbound_tx);

        Ok(Self {
            keepalive_interval: config.keepalive_interval,
            ws,
            agent,
            outbound_rx,
        })
    }

    pub fn phases(&self) -> watch::Receiver<AgentPhase> {
        self.agent.subscribe()
    }

    /// Announces the role, then relays until the socket closes.
    ///
    /// Returns the last phase the agent published before the connection ended.
    pub async fn run(
        self,
        events: mpsc::Receiver<EngineEvent>,
    ) -> Result<AgentPhase, ClientError> {
        let phases = self.agent.subscribe();
        let role = self.agent.role();
        let (mut sink, stream) = self.ws.split();

        let join = Frame::from(SignalMessage::Join { role }).encode()?;
        sink.send(Message::Text(join)).await?;
        info!("Announced role {}", role);

        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let agent_task = tokio::spawn(self.agent.run(signal_rx, events));

        let keepalive = Keepalive::new(self.keepalive_interval);
        let mut send_task = tokio::spawn(write_loop(sink, self.outbound_rx, keepalive));
        let mut recv_task = tokio::spawn(read_loop(stream, signal_tx));

        let result = tokio::select! {
            res = &mut recv_task => {
                send_task.abort();
                match res {
                    Ok(r) => r,
                    Err(e) => {
                        error!("Signaling reader task failed: {}", e);
                        Ok(())
                    }
                }
            }
            _ = &mut send_task => {
                recv_task.abort();
                Ok(())
            }
        };

        // In-flight engine work is abandoned along with the connection.
        agent_task.abort();
        let phase = *phases.borrow();

        info!("Signaling connection closed in {:?}", phase);
        result.map(|_| phase)
    }
}

/// Writes agent signals and a `ping` every keepalive period until the agent
/// drops its sender or the sink fails.
pub(crate) async fn write_loop<S>(
    mut sink: S,
    mut outbound: mpsc::UnboundedReceiver<SignalMessage>,
    mut keepalive: Keepalive,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    loop {
        let frame = tokio::select! {
            msg = outbound.recv() => match msg {
                Some(signal) => Frame::from(signal),
                None => break,
            },
            _ = keepalive.tick() => Frame::Ping,
        };

        let text = match frame.encode() {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to encode outbound frame: {}", e);
                continue;
            }
        };

        if let Err(e) = sink.send(Message::Text(text)).await {
            warn!("Signaling socket write failed: {}", e);
            break;
        }
    }

    let _ = sink.close().await;
}

async fn read_loop<S>(
    mut stream: S,
    signals: mpsc::UnboundedSender<SignalMessage>,
) -> Result<(), ClientError>
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg) = stream.next().await {
        let text = match msg? {
            Message::Text(text) => text,
            Message::Binary(bytes) => match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(_) => {
                    warn!("Dropping non-UTF-8 binary frame");
                    continue;
                }
            },
            Message::Close(_) => {
                info!("Signaling server closed the connection");
                break;
            }
            _ => continue,
        };

        match Frame::decode(&text) {
            Ok(Frame::Pong) => debug!("Keepalive acknowledged"),
            Ok(Frame::Ping) => debug!("Unexpected ping from server"),
            Ok(Frame::Signal(signal)) => {
                match &signal {
                    SignalMessage::Candidate { .. } => debug!("Received candidate"),
                    other => info!("Received {}", other.kind()),
                }
                if signals.send(signal).is_err() {
                    break;
                }
            }
            Err(FrameError::InvalidJoin(role)) => {
                warn!("Dropping join with invalid role {} from server", role)
            }
            Err(FrameError::Malformed(e)) => warn!("Dropping malformed frame: {}", e),
        }
    }

    Ok(())
}
