//! WebSocket transport against a local in-process node.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{accept_async, WebSocketStream};

use ledgerline_client::network::rpc::{RpcCommand, RpcErrorBody, RpcRequest, RpcResponse};
use ledgerline_client::network::{Transport, TransportError, WsTransport};
use ledgerline_client::submission::RecordingClock;
use ledgerline_client::transaction::{Signer, TransactionBuilder, TransactionKind};
use ledgerline_client::{Client, ClientConfig, SubmitOptions, Wallet};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Bind a listener and hand the first accepted socket to `serve`.
async fn spawn_node<F, Fut>(serve: F) -> String
where
    F: FnOnce(WebSocketStream<TcpStream>) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let ws = accept_async(stream).await.unwrap();
        serve(ws).await;
    });
    format!("ws://{}", addr)
}

async fn next_request(ws: &mut WebSocketStream<TcpStream>) -> Option<RpcRequest> {
    while let Some(Ok(frame)) = ws.next().await {
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).ok();
        }
    }
    None
}

async fn reply(ws: &mut WebSocketStream<TcpStream>, response: RpcResponse) {
    let text = serde_json::to_string(&response).unwrap();
    ws.send(Message::Text(text)).await.unwrap();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn out_of_order_responses_reach_their_callers() {
    let url = spawn_node(|mut ws| async move {
        let first = next_request(&mut ws).await.unwrap();
        let second = next_request(&mut ws).await.unwrap();
        for req in [second, first] {
            let tag = req.params["tag"].clone();
            reply(&mut ws, RpcResponse::success(req.id, json!({ "echo": tag }))).await;
        }
        while next_request(&mut ws).await.is_some() {}
    })
    .await;

    let transport = WsTransport::connect(&url, Duration::from_secs(5)).await.unwrap();
    let (a, b) = tokio::join!(
        transport.request(RpcCommand::Ledger, json!({ "tag": "a" })),
        transport.request(RpcCommand::Tx, json!({ "tag": "b" })),
    );

    assert_eq!(a.unwrap()["echo"], "a");
    assert_eq!(b.unwrap()["echo"], "b");
    assert_eq!(transport.in_flight(), 0);
}

#[tokio::test]
async fn error_responses_become_rpc_errors() {
    let url = spawn_node(|mut ws| async move {
        while let Some(req) = next_request(&mut ws).await {
            let hash = req.params["transaction"].as_str().unwrap_or_default().to_string();
            reply(
                &mut ws,
                RpcResponse::error(req.id, RpcErrorBody::transaction_not_found(&hash)),
            )
            .await;
        }
    })
    .await;

    let transport = WsTransport::connect(&url, Duration::from_secs(5)).await.unwrap();
    let err = transport
        .request(RpcCommand::Tx, json!({ "transaction": "ABC" }))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn silent_node_times_out_and_waiter_is_removed() {
    let url = spawn_node(|mut ws| async move {
        while next_request(&mut ws).await.is_some() {}
    })
    .await;

    let transport = WsTransport::connect(&url, Duration::from_millis(100))
        .await
        .unwrap();
    let err = transport
        .request(RpcCommand::Ledger, json!({ "ledger_index": "validated" }))
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Timeout { .. }));
    assert!(err.is_retryable());
    assert_eq!(transport.in_flight(), 0);
}

#[tokio::test]
async fn closed_connection_fails_in_flight_requests() {
    let url = spawn_node(|mut ws| async move {
        let _ = next_request(&mut ws).await;
        let _ = ws.close(None).await;
    })
    .await;

    let transport = WsTransport::connect(&url, Duration::from_secs(5)).await.unwrap();
    let err = transport
        .request(RpcCommand::Fee, json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));

    let err = transport.request(RpcCommand::Fee, json!({})).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn connect_to_nothing_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = WsTransport::connect(&format!("ws://{}", addr), Duration::from_secs(1)).await;
    assert!(matches!(result, Err(TransportError::Network(_))));
}

#[tokio::test]
async fn client_waits_for_validation_over_websocket() {
    let url = spawn_node(|mut ws| async move {
        let mut validated = 40u32;
        while let Some(req) = next_request(&mut ws).await {
            let response = match req.method {
                RpcCommand::Submit => RpcResponse::success(
                    req.id,
                    json!({ "engine_result": "tesSUCCESS", "engine_result_message": "ok" }),
                ),
                RpcCommand::Ledger => {
                    validated += 1;
                    RpcResponse::success(req.id, json!({ "ledger_index": validated }))
                }
                RpcCommand::Tx if validated >= 43 => RpcResponse::success(
                    req.id,
                    json!({ "validated": true, "ledger_index": 43, "meta": {} }),
                ),
                RpcCommand::Tx => {
                    let hash = req.params["transaction"].as_str().unwrap_or_default().to_string();
                    RpcResponse::error(req.id, RpcErrorBody::transaction_not_found(&hash))
                }
                _ => RpcResponse::error(req.id, RpcErrorBody::invalid_params("unsupported")),
            };
            reply(&mut ws, response).await;
        }
    })
    .await;

    let transport = Arc::new(WsTransport::connect(&url, Duration::from_secs(5)).await.unwrap());
    let wallet = Wallet::from_seed(&[11u8; 32]);
    let signed = wallet
        .sign(
            &TransactionBuilder::new(
                wallet.address(),
                TransactionKind::SetRegularKey { regular_key: None },
            )
            .fee(12)
            .sequence(2)
            .last_ledger_sequence(60)
            .build(),
            false,
        )
        .unwrap();

    let outcome = Client::new(transport)
        .with_config(ClientConfig {
            ledger_close_interval: Duration::ZERO,
            ..ClientConfig::default()
        })
        .with_clock(Arc::new(RecordingClock::new()))
        .submit_and_wait(signed, SubmitOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.ledger_index(), Some(43));
}
