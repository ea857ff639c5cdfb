//! WebSocket transport.
//!
//! One connection carries every request. A writer task drains an outbound
//! queue into the socket; a reader task routes each incoming frame to the
//! caller waiting on its `id`. Responses may arrive in any order.

use async_trait::async_trait;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::rpc::{RpcCommand, RpcRequest, RpcResponse};
use super::transport::{Transport, TransportError};

type PendingMap = DashMap<String, oneshot::Sender<RpcResponse>>;

/// A [`Transport`] over a single multiplexed WebSocket connection.
pub struct WsTransport {
    outbound: mpsc::UnboundedSender<Message>,
    pending: Arc<PendingMap>,
    closed: Arc<AtomicBool>,
    request_timeout: Duration,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl WsTransport {
    /// Open a connection to `url` (e.g. `ws://127.0.0.1:6006`).
    pub async fn connect(url: &str, request_timeout: Duration) -> Result<Self, TransportError> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| TransportError::Network(format!("connect to {} failed: {}", url, e)))?;
        let (mut sink, mut source) = stream.split();

        let pending: Arc<PendingMap> = Arc::new(DashMap::new());
        let closed = Arc::new(AtomicBool::new(false));
        let (outbound, mut queue) = mpsc::unbounded_channel::<Message>();

        let writer = tokio::spawn(async move {
            while let Some(message) = queue.recv().await {
                if let Err(e) = sink.send(message).await {
                    warn!(error = %e, "websocket write failed");
                    break;
                }
            }
            let _ = sink.close().await;
        });

        let reader_pending = Arc::clone(&pending);
        let reader_closed = Arc::clone(&closed);
        let reader = tokio::spawn(async move {
            while let Some(frame) = source.next().await {
                match frame {
                    Ok(Message::Text(text)) => dispatch(&reader_pending, &text),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "websocket read failed");
                        break;
                    }
                }
            }
            reader_closed.store(true, Ordering::SeqCst);
            // Dropping the senders wakes every waiter with a closed-channel error.
            reader_pending.clear();
            debug!("websocket connection closed");
        });

        debug!(url, "websocket connected");
        Ok(Self {
            outbound,
            pending,
            closed,
            request_timeout,
            reader,
            writer,
        })
    }

    /// Number of requests still waiting for a response.
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Whether the connection has been closed by either side.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for WsTransport {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

fn dispatch(pending: &PendingMap, text: &str) {
    let response: RpcResponse = match serde_json::from_str(text) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "dropping unparseable frame");
            return;
        }
    };
    match pending.remove(&response.id) {
        Some((_, waiter)) => {
            let _ = waiter.send(response);
        }
        // Late answer to a request that already timed out.
        None => trace!(id = %response.id, "no waiter for response"),
    }
}

/// Registers the waiter for `id`. The closed flag is read only after the
/// insert, so a reader shutting down concurrently either clears this waiter
/// or is observed here.
fn register(
    pending: &PendingMap,
    closed: &AtomicBool,
    id: &str,
) -> Result<oneshot::Receiver<RpcResponse>, TransportError> {
    let (tx, rx) = oneshot::channel();
    pending.insert(id.to_string(), tx);
    if closed.load(Ordering::SeqCst) {
        pending.remove(id);
        return Err(TransportError::Network("connection closed".to_string()));
    }
    Ok(rx)
}

/// Removes a request's waiter on every exit path.
struct PendingGuard<'a> {
    pending: &'a PendingMap,
    id: String,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn request(
        &self,
        command: RpcCommand,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let id = Uuid::new_v4().to_string();
        let rx = register(&self.pending, &self.closed, &id)?;
        let _guard = PendingGuard {
            pending: &self.pending,
            id: id.clone(),
        };

        let frame = serde_json::to_string(&RpcRequest::new(id.clone(), command, params)).map_err(
            |e| TransportError::Decode {
                command: command.to_string(),
                reason: e.to_string(),
            },
        )?;
        trace!(%id, %command, "sending request");
        self.outbound
            .send(Message::Text(frame))
            .map_err(|_| TransportError::Network("connection closed".to_string()))?;

        match tokio::time::timeout(self.request_timeout, rx).await {
            Err(_) => Err(TransportError::Timeout {
                command: command.to_string(),
                after: self.request_timeout,
            }),
            Ok(Err(_)) => Err(TransportError::Network(
                "connection closed before response".to_string(),
            )),
            Ok(Ok(response)) => response.into_result(command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_on_closed_connection_leaves_no_waiter() {
        let pending = PendingMap::new();
        let closed = AtomicBool::new(true);

        let err = register(&pending, &closed, "late").unwrap_err();
        assert_eq!(err, TransportError::Network("connection closed".to_string()));
        assert!(pending.is_empty());
    }

    #[test]
    fn waiter_cleared_by_shutdown_sees_closed_channel() {
        let pending = PendingMap::new();
        let closed = AtomicBool::new(false);

        let mut rx = register(&pending, &closed, "req-1").unwrap();
        assert_eq!(pending.len(), 1);

        closed.store(true, Ordering::SeqCst);
        pending.clear();
        assert!(matches!(
            rx.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
    }

    #[test]
    fn dispatch_routes_by_id_and_ignores_strays() {
        let pending = PendingMap::new();
        let closed = AtomicBool::new(false);
        let mut rx = register(&pending, &closed, "a").unwrap();

        dispatch(&pending, r#"{"id":"b","result":{"ledger_index":1}}"#);
        dispatch(&pending, "not json");
        assert_eq!(pending.len(), 1);

        dispatch(&pending, r#"{"id":"a","result":{"ledger_index":7}}"#);
        let response = rx.try_recv().unwrap();
        assert_eq!(response.id, "a");
        assert!(pending.is_empty());
    }
}
