//! Gateway client
//!
//! Owns one connection to the gateway. A receive task reads frames into an
//! unbounded queue, a dispatch task drains the queue in order and routes each
//! frame, and a writer task owns the sink half and writes queued actions.

use super::listeners::ListenerRegistry;
use super::pending::{MessageIdCallback, PendingRequests, Responder};
use super::transport::{Connector, FrameSink, FrameStream};
use crate::codec::cq_code;
use crate::error::{GatewayError, GatewayResult};
use crate::events::{CqHttpProcessor, JsonProcessor};
use crate::protocol::{
    Action, ActionFrame, GroupMessageParams, InboundFrame, PrivateMessageParams, ResponseFrame,
};
use cqbot_common::GatewayConfig;
use cqbot_core::{ChatTarget, Event, EventType, MessageChain, MessageSegment};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Lifecycle of a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    /// Created, `start` not yet called
    Idle,
    /// Opening the transport
    Connecting,
    /// Frames are flowing
    Connected,
    /// Closed or failed; never restarts
    Stopped,
}

impl ConnectionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State shared between the client handle and its tasks
struct Shared {
    state: RwLock<ConnectionState>,
    outbound: Mutex<Option<mpsc::Sender<String>>>,
    shutdown: watch::Sender<bool>,
    pending: PendingRequests,
    listeners: ListenerRegistry,
    processor: Arc<dyn JsonProcessor>,
}

impl Shared {
    /// Move to `Stopped`, drop the outbound queue and signal the tasks
    fn stop(&self) {
        let (previous, sender) = {
            let mut state = self.state.write();
            let previous = *state;
            *state = ConnectionState::Stopped;
            (previous, self.outbound.lock().take())
        };
        drop(sender);
        self.shutdown.send_replace(true);

        if previous != ConnectionState::Stopped {
            tracing::info!(previous = %previous, "Gateway client stopped");
        }
    }

    fn route(&self, text: &str) {
        match InboundFrame::from_json(text) {
            Ok(InboundFrame::Response(response)) => self.route_response(response),
            Ok(InboundFrame::Event(object)) => match self.processor.process(&object) {
                Ok(Some(event)) => {
                    let event_type = event.event_type();
                    let started = self.listeners.dispatch(event);
                    tracing::trace!(event_type = %event_type, listeners = started, "Event dispatched");
                }
                Ok(None) => tracing::trace!("Frame produced no event"),
                Err(e) => tracing::warn!(error = %e, "Dropping undecodable event frame"),
            },
            Err(e) => tracing::warn!(error = %e, "Dropping malformed frame"),
        }
    }

    fn route_response(&self, response: ResponseFrame) {
        if response.is_failure() {
            tracing::warn!(
                echo = %response.echo,
                status = %response.status,
                retcode = %response.retcode,
                "Gateway reported a failed action"
            );
        }

        let Some(request) = response.token().and_then(|token| self.pending.take(token)) else {
            tracing::debug!(echo = %response.echo, "No pending request for response");
            return;
        };

        let action = request.action().to_string();
        tracing::debug!(action = %action, age_ms = request.age().as_millis() as u64, "Response matched");

        let responder = request.into_responder();
        tokio::spawn(async move {
            if let Err(e) = responder.respond(response.data).await {
                tracing::warn!(action = %action, error = %e, "Response callback failed");
            }
        });
    }
}

/// Client for a go-cqhttp style WebSocket gateway
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
pub struct GatewayClient {
    url: String,
    outbound_buffer: usize,
    shared: Arc<Shared>,
}

impl GatewayClient {
    /// Create a client that decodes events in the go-cqhttp format
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self::with_processor(config, CqHttpProcessor)
    }

    /// Create a client with a custom event decoder
    pub fn with_processor(config: &GatewayConfig, processor: impl JsonProcessor + 'static) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            url: config.url.clone(),
            outbound_buffer: config.outbound_buffer.max(1),
            shared: Arc::new(Shared {
                state: RwLock::new(ConnectionState::Idle),
                outbound: Mutex::new(None),
                shutdown,
                pending: PendingRequests::new(),
                listeners: ListenerRegistry::new(),
                processor: Arc::new(processor),
            }),
        }
    }

    /// Gateway URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.read()
    }

    /// Number of actions still waiting for a response
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.shared.pending.len()
    }

    /// Number of listeners registered for an event type
    #[must_use]
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.shared.listeners.count(event_type)
    }

    /// Open the transport and spawn the connection tasks
    ///
    /// A client starts at most once. A failed connection leaves it stopped.
    pub async fn start(&self, connector: &dyn Connector) -> GatewayResult<()> {
        {
            let mut state = self.shared.state.write();
            if *state != ConnectionState::Idle {
                return Err(GatewayError::AlreadyStarted);
            }
            *state = ConnectionState::Connecting;
        }

        tracing::info!(url = %self.url, "Connecting to gateway");

        let (sink, stream) = match connector.connect(&self.url).await {
            Ok(transport) => transport,
            Err(source) => {
                tracing::error!(url = %self.url, error = %source, "Gateway connection failed");
                self.shared.stop();
                return Err(GatewayError::Connect {
                    url: self.url.clone(),
                    source,
                });
            }
        };

        let (outbound_tx, outbound_rx) = mpsc::channel(self.outbound_buffer);
        {
            let mut state = self.shared.state.write();
            if *state == ConnectionState::Stopped {
                // closed while connecting
                return Err(GatewayError::NotConnected);
            }
            *state = ConnectionState::Connected;
            *self.shared.outbound.lock() = Some(outbound_tx);
        }

        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(receive_loop(Arc::clone(&self.shared), stream, inbound_tx));
        tokio::spawn(dispatch_loop(Arc::clone(&self.shared), inbound_rx));
        tokio::spawn(write_loop(Arc::clone(&self.shared), sink, outbound_rx));

        tracing::info!(url = %self.url, "Connected to gateway");
        Ok(())
    }

    /// Stop the client
    ///
    /// Queued frames are still written before the sink closes. Listener
    /// tasks already running are not awaited.
    pub fn close(&self) {
        self.shared.stop();
    }

    /// Register an async listener for one event type
    pub fn add_listener<F, Fut>(&self, event_type: EventType, listener: F)
    where
        F: Fn(Arc<Event>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.shared
            .listeners
            .add(event_type, Arc::new(move |event: Arc<Event>| listener(event).boxed()));
    }

    /// Queue an action frame
    ///
    /// With a responder the frame carries a fresh echo token and the
    /// responder runs once the matching response arrives.
    pub async fn send_action<P: Serialize>(
        &self,
        action: &str,
        params: P,
        responder: Option<Responder>,
    ) -> GatewayResult<()> {
        let sender = self
            .shared
            .outbound
            .lock()
            .clone()
            .ok_or(GatewayError::NotConnected)?;

        let echo = responder.map(|responder| self.shared.pending.insert(action, responder));
        let frame = ActionFrame {
            action,
            params,
            echo,
        };

        let json = match frame.to_json() {
            Ok(json) => json,
            Err(e) => {
                self.forget(echo);
                return Err(e.into());
            }
        };

        if sender.send(json).await.is_err() {
            self.forget(echo);
            return Err(GatewayError::NotConnected);
        }

        tracing::trace!(action = %action, echo = ?echo, "Action queued");
        Ok(())
    }

    /// Send a message chain
    pub async fn send_message(
        &self,
        target: &ChatTarget,
        chain: &MessageChain,
        callback: Option<MessageIdCallback>,
    ) -> GatewayResult<()> {
        self.send_markup(target, cq_code::encode(chain), callback)
            .await
    }

    /// Send text as-is; CQ codes inside it are interpreted by the gateway
    pub async fn send_text(
        &self,
        target: &ChatTarget,
        text: &str,
        callback: Option<MessageIdCallback>,
    ) -> GatewayResult<()> {
        self.send_markup(target, text.to_string(), callback).await
    }

    /// Send a message chain as a reply to an earlier message
    pub async fn reply_message(
        &self,
        target_message_id: i32,
        target: &ChatTarget,
        chain: &MessageChain,
        callback: Option<MessageIdCallback>,
    ) -> GatewayResult<()> {
        let chain = chain
            .clone()
            .prepend(MessageSegment::reply(target_message_id));
        self.send_message(target, &chain, callback).await
    }

    /// Send text as a reply to an earlier message
    pub async fn reply_text(
        &self,
        target_message_id: i32,
        target: &ChatTarget,
        text: &str,
        callback: Option<MessageIdCallback>,
    ) -> GatewayResult<()> {
        let text = format!("{}{text}", cq_code::reply_marker(target_message_id));
        self.send_text(target, &text, callback).await
    }

    async fn send_markup(
        &self,
        target: &ChatTarget,
        message: String,
        callback: Option<MessageIdCallback>,
    ) -> GatewayResult<()> {
        let id = target.numeric_id()?;
        let responder = callback.map(Responder::message_id);
        let action = Action::send_to(target);

        match action {
            Action::SendPrivateMsg => {
                let params = PrivateMessageParams {
                    user_id: id,
                    message,
                };
                self.send_action(action.as_str(), params, responder).await
            }
            Action::SendGroupMsg => {
                let params = GroupMessageParams {
                    group_id: id,
                    message,
                };
                self.send_action(action.as_str(), params, responder).await
            }
        }
    }

    fn forget(&self, echo: Option<u64>) {
        if let Some(token) = echo {
            self.shared.pending.take(token);
        }
    }
}

impl Drop for GatewayClient {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("url", &self.url)
            .field("state", &self.state())
            .field("pending_requests", &self.pending_requests())
            .finish_non_exhaustive()
    }
}

async fn receive_loop(
    shared: Arc<Shared>,
    mut stream: Box<dyn FrameStream>,
    inbound: mpsc::UnboundedSender<String>,
) {
    let mut shutdown = shared.shutdown.subscribe();

    loop {
        if *shutdown.borrow_and_update() {
            break;
        }

        tokio::select! {
            _ = shutdown.changed() => {}
            frame = stream.next_frame() => match frame {
                Some(Ok(text)) => {
                    tracing::trace!(len = text.len(), "Frame received");
                    if inbound.send(text).is_err() {
                        break;
                    }
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Gateway read failed");
                    break;
                }
                None => {
                    tracing::info!("Gateway closed the connection");
                    break;
                }
            },
        }
    }

    shared.stop();
    tracing::debug!("Receive loop finished");
}

async fn dispatch_loop(shared: Arc<Shared>, mut inbound: mpsc::UnboundedReceiver<String>) {
    while let Some(text) = inbound.recv().await {
        shared.route(&text);
    }
    tracing::debug!("Dispatch loop finished");
}

async fn write_loop(
    shared: Arc<Shared>,
    mut sink: Box<dyn FrameSink>,
    mut outbound: mpsc::Receiver<String>,
) {
    while let Some(text) = outbound.recv().await {
        if let Err(e) = sink.send_text(text).await {
            tracing::error!(error = %e, "Gateway write failed");
            shared.stop();
            break;
        }
    }

    if let Err(e) = sink.close().await {
        tracing::debug!(error = %e, "Closing gateway sink failed");
    }
    tracing::debug!("Write loop finished");
}
