//! Echo correlation table
//!
//! Requests that expect a response are stored under a random token sent as
//! the frame's `echo`. Tokens stay below 2^53 so gateways that read JSON
//! numbers as doubles echo them back unchanged. The response carrying that token removes the entry and
//! runs its responder exactly once.

use crate::protocol::{EchoDecoder, MessageIdDecoder};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;
use rand::Rng;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

/// Exclusive upper bound of echo tokens
pub const MAX_ECHO_TOKEN: u64 = 1 << 53;

/// Future returned by response and listener callbacks
pub type CallbackFuture = BoxFuture<'static, anyhow::Result<()>>;

/// Callback for the ID of a sent message
pub type MessageIdCallback = Box<dyn FnOnce(i32) -> CallbackFuture + Send>;

/// Wrap an async closure as a [`MessageIdCallback`]
pub fn on_message_id<F, Fut>(callback: F) -> MessageIdCallback
where
    F: FnOnce(i32) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move |id: i32| callback(id).boxed())
}

/// Decodes a response payload and hands the result to a callback
pub struct Responder {
    handler: Mutex<Box<dyn FnOnce(Value) -> CallbackFuture + Send>>,
}

impl Responder {
    /// Pair a decoder with the callback that consumes its output
    pub fn new<D, F, Fut>(decoder: D, callback: F) -> Self
    where
        D: EchoDecoder,
        F: FnOnce(D::Output) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            handler: Mutex::new(Box::new(move |data: Value| {
                async move {
                    let output = decoder.decode(&data)?;
                    callback(output).await
                }
                .boxed()
            })),
        }
    }

    /// Responder for send-message actions
    pub fn message_id<F, Fut>(callback: F) -> Self
    where
        F: FnOnce(i32) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self::new(MessageIdDecoder, callback)
    }

    /// Run the responder against a response payload
    pub fn respond(self, data: Value) -> CallbackFuture {
        (self.handler.into_inner())(data)
    }
}

impl fmt::Debug for Responder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Responder").finish_non_exhaustive()
    }
}

/// An action waiting for its response
#[derive(Debug)]
pub struct PendingRequest {
    action: String,
    responder: Responder,
    created_at: Instant,
}

impl PendingRequest {
    /// Get the action name
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Time since the request was sent
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Take the responder out of the request
    pub fn into_responder(self) -> Responder {
        self.responder
    }
}

/// Outstanding requests keyed by echo token
///
/// Entries whose response never arrives stay until the client is dropped.
#[derive(Debug, Default)]
pub struct PendingRequests {
    requests: DashMap<u64, PendingRequest>,
}

impl PendingRequests {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a request under a fresh token and return the token
    pub fn insert(&self, action: &str, responder: Responder) -> u64 {
        let request = PendingRequest {
            action: action.to_string(),
            responder,
            created_at: Instant::now(),
        };

        let mut rng = rand::thread_rng();
        loop {
            let token = rng.gen_range(1..MAX_ECHO_TOKEN);
            if let Entry::Vacant(slot) = self.requests.entry(token) {
                slot.insert(request);
                return token;
            }
        }
    }

    /// Remove and return the request stored under `token`
    pub fn take(&self, token: u64) -> Option<PendingRequest> {
        self.requests.remove(&token).map(|(_, request)| request)
    }

    /// Number of outstanding requests
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
