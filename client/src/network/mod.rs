//! # Network Module
//!
//! Everything that talks to a ledger node.
//!
//! ```text
//! transport.rs: Transport trait and TransportError
//! rpc.rs      : command names, request/response envelope, typed payloads
//! ws.rs       : WebSocket transport multiplexing requests by id
//! scripted.rs : canned-response transport for tests and dry runs
//! ```
//!
//! The rest of the crate only sees [`Transport`]; swapping the WebSocket
//! connection for another carrier needs no changes elsewhere.

pub mod rpc;
pub mod scripted;
pub mod transport;
pub mod ws;

pub use rpc::{RpcCommand, RpcErrorBody, RpcRequest, RpcResponse};
pub use scripted::ScriptedTransport;
pub use transport::{Transport, TransportError};
pub use ws::WsTransport;
