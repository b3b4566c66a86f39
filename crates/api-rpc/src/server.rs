//! JSON-RPC Server
//!
//! `BaseServer` implementation on top of jsonrpsee. Supervised proxies are
//! registered as async methods named `"{service}.{method}"` and served over
//! HTTP/WebSocket on TCP.

use crate::error::{unimplemented_error, RpcError};
use crate::handler::{dispatch, to_call};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use serde_json::Value;
use std::net::SocketAddr;
use supervised_core::application::ProxyMap;
use supervised_core::{BaseServer, ServiceDescriptor, SupervisedServer};
use tracing::{debug, info, warn};

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9527;
const DEFAULT_MAX_CONNECTIONS: u32 = 100;
const DEFAULT_MAX_REQUEST_BODY_SIZE: u32 = 10 * 1024 * 1024;

/// Supervised server over the jsonrpsee transport
pub type SupervisedRpcServer = SupervisedServer<JsonRpcServer>;

/// RPC Server Configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub max_request_body_size: u32,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_request_body_size: DEFAULT_MAX_REQUEST_BODY_SIZE,
        }
    }
}

/// JSON-RPC server (the base server being supervised)
pub struct JsonRpcServer {
    config: RpcServerConfig,
    module: RpcModule<()>,
}

/// Method names must outlive the module; registration happens once per
/// method, so leaking them is bounded.
fn method_name(service: &str, method: &str) -> &'static str {
    Box::leak(format!("{}.{}", service, method).into_boxed_str())
}

impl JsonRpcServer {
    pub fn config(&self) -> &RpcServerConfig {
        &self.config
    }

    /// Registered methods, for in-process inspection
    pub fn module(&self) -> &RpcModule<()> {
        &self.module
    }

    /// Start the JSON-RPC server
    ///
    /// Returns the handle together with the bound address, which differs
    /// from the configured one when port 0 is requested.
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), RpcError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            methods = self.module.method_names().count(),
            "Starting supervised JSON-RPC server"
        );

        let server = Server::builder()
            .max_connections(self.config.max_connections)
            .max_request_body_size(self.config.max_request_body_size)
            .build(&addr)
            .await
            .map_err(|source| RpcError::Build {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server.local_addr()?;

        let handle = server.start(self.module);
        info!(local_addr = %local_addr, "Supervised JSON-RPC server started");

        Ok((handle, local_addr))
    }

    fn register_unimplemented(&mut self, service: &str, method: &str) -> Result<(), RpcError> {
        let name = method_name(service, method);
        warn!(method = name, "Declared method has no handler; replying UNIMPLEMENTED");

        self.module
            .register_async_method(name, move |_, _, _| async move {
                Err::<Value, _>(unimplemented_error(name))
            })
            .map_err(|e| RpcError::Register(e.to_string()))?;
        Ok(())
    }
}

impl BaseServer for JsonRpcServer {
    type Options = RpcServerConfig;
    type Error = RpcError;

    fn new(config: RpcServerConfig) -> Self {
        Self {
            config,
            module: RpcModule::new(()),
        }
    }

    fn add_service(
        &mut self,
        descriptor: &ServiceDescriptor,
        proxies: ProxyMap,
    ) -> Result<(), RpcError> {
        let unimplemented: Vec<String> = descriptor
            .methods
            .iter()
            .filter(|m| !proxies.contains_key(&m.name))
            .map(|m| m.name.clone())
            .collect();

        for (method, proxy) in proxies {
            let name = method_name(&descriptor.name, &method);
            let service = descriptor.name.clone();

            self.module
                .register_async_method(name, move |params, _, _| {
                    let proxy = proxy.clone();
                    let call = to_call(&service, &method, &params);
                    async move {
                        let call = call?;
                        dispatch(&proxy, call).await
                    }
                })
                .map_err(|e| RpcError::Register(e.to_string()))?;

            debug!(method = name, "Registered supervised method");
        }

        for method in unimplemented {
            self.register_unimplemented(&descriptor.name, &method)?;
        }

        Ok(())
    }
}
