//! A [`Transport`] that answers from a script.
//!
//! Responses are queued per command and served in order. Once a command's
//! queue is empty its default (if any) answers every further call. Every
//! call is recorded so tests can assert on what was sent.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use super::rpc::RpcCommand;
use super::transport::{Transport, TransportError};

type Reply = Result<serde_json::Value, TransportError>;

#[derive(Default)]
struct Script {
    queued: HashMap<RpcCommand, VecDeque<Reply>>,
    defaults: HashMap<RpcCommand, Reply>,
    calls: Vec<(RpcCommand, serde_json::Value)>,
}

/// Scripted transport for tests and dry runs.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    /// Empty script: every command answers `unknownCmd`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful result for `command`.
    pub fn push_ok(&self, command: RpcCommand, result: impl Serialize) -> &Self {
        let value = serde_json::to_value(result).unwrap_or(serde_json::Value::Null);
        self.push(command, Ok(value))
    }

    /// Queue a failure for `command`.
    pub fn push_err(&self, command: RpcCommand, error: TransportError) -> &Self {
        self.push(command, Err(error))
    }

    /// Answer `command` with `result` whenever nothing is queued.
    pub fn set_default(&self, command: RpcCommand, result: impl Serialize) -> &Self {
        let value = serde_json::to_value(result).unwrap_or(serde_json::Value::Null);
        self.script.lock().defaults.insert(command, Ok(value));
        self
    }

    /// Fail `command` with `error` whenever nothing is queued.
    pub fn set_default_err(&self, command: RpcCommand, error: TransportError) -> &Self {
        self.script.lock().defaults.insert(command, Err(error));
        self
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<(RpcCommand, serde_json::Value)> {
        self.script.lock().calls.clone()
    }

    /// Parameters of every call to `command`, in order.
    pub fn calls_for(&self, command: RpcCommand) -> Vec<serde_json::Value> {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|(c, _)| *c == command)
            .map(|(_, params)| params.clone())
            .collect()
    }

    /// Total number of calls across all commands.
    pub fn call_count(&self) -> usize {
        self.script.lock().calls.len()
    }

    fn push(&self, command: RpcCommand, reply: Reply) -> &Self {
        self.script
            .lock()
            .queued
            .entry(command)
            .or_default()
            .push_back(reply);
        self
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        command: RpcCommand,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let mut script = self.script.lock();
        script.calls.push((command, params));
        if let Some(reply) = script.queued.get_mut(&command).and_then(VecDeque::pop_front) {
            return reply;
        }
        match script.defaults.get(&command) {
            Some(reply) => reply.clone(),
            None => Err(TransportError::rpc(
                "unknownCmd",
                format!("no scripted response for {}", command),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn queued_replies_come_before_default() {
        let transport = ScriptedTransport::new();
        transport
            .push_ok(RpcCommand::Ledger, json!({ "ledger_index": 1 }))
            .set_default(RpcCommand::Ledger, json!({ "ledger_index": 9 }));

        let first = transport.request(RpcCommand::Ledger, json!({})).await.unwrap();
        let second = transport.request(RpcCommand::Ledger, json!({})).await.unwrap();
        let third = transport.request(RpcCommand::Ledger, json!({})).await.unwrap();

        assert_eq!(first["ledger_index"], 1);
        assert_eq!(second["ledger_index"], 9);
        assert_eq!(third["ledger_index"], 9);
        assert_eq!(transport.calls_for(RpcCommand::Ledger).len(), 3);
    }

    #[tokio::test]
    async fn unscripted_command_is_an_rpc_error() {
        let transport = ScriptedTransport::new();
        let err = transport.request(RpcCommand::Fee, json!({})).await.unwrap_err();
        assert!(matches!(err, TransportError::Rpc { ref code, .. } if code == "unknownCmd"));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn errors_are_replayed_in_order() {
        let transport = ScriptedTransport::new();
        transport
            .push_err(RpcCommand::Tx, TransportError::Network("reset".into()))
            .push_ok(RpcCommand::Tx, json!({ "validated": false }));

        assert!(transport.request(RpcCommand::Tx, json!({})).await.is_err());
        assert!(transport.request(RpcCommand::Tx, json!({})).await.is_ok());
    }
}
