//! Shared fixtures for end-to-end tests

#![allow(dead_code)]

use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::core::ClientError;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::server::ServerHandle;
use jsonrpsee::types::ErrorObjectOwned;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use supervised_api_rpc::{RpcServerConfig, SupervisedRpcServer};
use supervised_core::{Logger, MethodMap, ServerErrorResponse, ServerOptions, ServiceDescriptor};

#[derive(Debug, Clone, PartialEq)]
pub enum LogEntry {
    Debug(String),
    Info(String),
    Warn(String),
    Error(ServerErrorResponse, String),
}

/// Logger that keeps every entry for later assertions
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl RecordingLogger {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<ServerErrorResponse> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                LogEntry::Error(err, _) => Some(err),
                _ => None,
            })
            .collect()
    }

    fn push(&self, entry: LogEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

impl Logger for RecordingLogger {
    fn debug(&self, message: &str) {
        self.push(LogEntry::Debug(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.push(LogEntry::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.push(LogEntry::Warn(message.to_string()));
    }

    fn error(&self, error: &ServerErrorResponse, message: &str) {
        self.push(LogEntry::Error(error.clone(), message.to_string()));
    }
}

/// Options bound to an ephemeral localhost port
pub fn options() -> ServerOptions<RpcServerConfig> {
    ServerOptions::new(RpcServerConfig {
        port: 0,
        ..Default::default()
    })
}

pub struct TestServer {
    pub client: HttpClient,
    handle: ServerHandle,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.handle.stop();
    }
}

/// Register the given services and serve them over HTTP
pub async fn serve(
    options: ServerOptions<RpcServerConfig>,
    services: Vec<(ServiceDescriptor, MethodMap)>,
) -> TestServer {
    let mut server = SupervisedRpcServer::new(Some(options));
    for (descriptor, methods) in &services {
        server.add_service(descriptor, methods).unwrap();
    }

    let (handle, addr) = server.into_base().start().await.unwrap();
    let client = HttpClientBuilder::default()
        .build(format!("http://{}", addr))
        .unwrap();

    TestServer { client, handle }
}

pub fn object(value: Value) -> ObjectParams {
    let mut params = ObjectParams::new();
    if let Value::Object(map) = value {
        for (key, value) in map {
            params.insert(&key, value).unwrap();
        }
    }
    params
}

/// Call a method expecting a JSON-RPC error back
pub async fn call_err(client: &HttpClient, method: &str, params: ObjectParams) -> ErrorObjectOwned {
    match client.request::<Value, _>(method, params).await {
        Err(ClientError::Call(err)) => err,
        other => panic!("expected a call error from {method}, got {other:?}"),
    }
}
