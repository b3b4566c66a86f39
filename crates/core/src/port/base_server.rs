// Base Server Port (the RPC server being decorated)

use crate::application::ProxyMap;
use crate::domain::ServiceDescriptor;

/// RPC server whose service registration gets supervised
///
/// Transport, wire protocol and routing stay with the implementor.
pub trait BaseServer: Sized {
    /// Construction options the base server understands
    type Options: Default;

    /// Registration failure (e.g. duplicate method names)
    type Error;

    fn new(options: Self::Options) -> Self;

    /// Register a service whose handlers have already been wrapped
    fn add_service(
        &mut self,
        descriptor: &ServiceDescriptor,
        proxies: ProxyMap,
    ) -> Result<(), Self::Error>;
}
