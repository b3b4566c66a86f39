//! Supervised Server
//!
//! Decorates a [`BaseServer`]: every service registered through it reaches
//! the base server with its handlers replaced by supervisory proxies.

use crate::application::supervisor::{ErrorFormatter, ProxyMap, Supervisor, SupervisoryProxy};
use crate::domain::ServiceDescriptor;
use crate::error::ServerErrorResponse;
use crate::port::{BaseServer, Logger, MethodMap};
use std::sync::Arc;

/// Construction options: the base server's own options plus supervision
pub struct ServerOptions<O> {
    /// Forwarded unmodified to the base server
    pub base: O,
    pub format_error: Option<ErrorFormatter>,
    pub logger: Option<Arc<dyn Logger>>,
}

impl<O> ServerOptions<O> {
    pub fn new(base: O) -> Self {
        Self {
            base,
            format_error: None,
            logger: None,
        }
    }

    pub fn with_format_error<F>(mut self, format_error: F) -> Self
    where
        F: Fn(&ServerErrorResponse) -> ServerErrorResponse + Send + Sync + 'static,
    {
        self.format_error = Some(Arc::new(format_error));
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

impl<O: Default> Default for ServerOptions<O> {
    fn default() -> Self {
        Self::new(O::default())
    }
}

/// RPC server whose handlers are all supervised
pub struct SupervisedServer<S> {
    base: S,
    supervisor: Arc<Supervisor>,
}

impl<S: BaseServer> SupervisedServer<S> {
    /// Split the options: supervision fields stay here, the rest builds the
    /// base server. `None` builds the base server from its default options.
    pub fn new(options: Option<ServerOptions<S::Options>>) -> Self {
        let ServerOptions {
            base,
            format_error,
            logger,
        } = options.unwrap_or_default();

        Self {
            base: S::new(base),
            supervisor: Arc::new(Supervisor {
                format_error,
                logger,
            }),
        }
    }

    /// Register a service with every handler wrapped in a supervisory proxy
    ///
    /// The caller's map is left untouched; the base server receives a fresh
    /// map with the same keys. Base registration errors are returned as is.
    pub fn add_service(
        &mut self,
        descriptor: &ServiceDescriptor,
        implementation: &MethodMap,
    ) -> Result<(), S::Error> {
        let proxies: ProxyMap = implementation
            .iter()
            .map(|(name, handler)| {
                let proxy = SupervisoryProxy::new(Arc::clone(handler), Arc::clone(&self.supervisor));
                (name.clone(), proxy)
            })
            .collect();

        if let Some(logger) = &self.supervisor.logger {
            logger.debug(&format!("Adding service {} to RPC server", descriptor));
        }

        self.base.add_service(descriptor, proxies)
    }

    pub fn base(&self) -> &S {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut S {
        &mut self.base
    }

    pub fn into_base(self) -> S {
        self.base
    }
}

impl<S: BaseServer> Default for SupervisedServer<S> {
    fn default() -> Self {
        Self::new(None)
    }
}
