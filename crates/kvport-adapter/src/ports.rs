//! Named-port boundary between the application and the storage adapter.
//!
//! [`Ports`] plays the role of the host's port object: handlers subscribe to
//! inbound port names, and responses go out through an unbounded channel.
//! [`register`] wires one storage handler to each inbound port.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use kvport_protocol::{Envelope, PortRequest, ProtocolError, INBOUND_PORTS};
use kvport_store::KeyValueStore;

use crate::adapter::StorageAdapter;
use crate::error::{AdapterError, AdapterResult};

/// A handler subscribed to one inbound port.
pub type PortHandler = Box<dyn Fn(Value) -> AdapterResult<()> + Send + Sync>;

/// Inbound subscriptions plus the outbound sender.
pub struct Ports {
    handlers: HashMap<String, PortHandler>,
    outbound: UnboundedSender<Envelope>,
}

impl Ports {
    pub fn new(outbound: UnboundedSender<Envelope>) -> Self {
        Self {
            handlers: HashMap::new(),
            outbound,
        }
    }

    /// Create a port set together with the receiving end of its outbound
    /// channel.
    pub fn channel() -> (Self, UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Subscribe `handler` to `port`, replacing any previous subscriber.
    pub fn subscribe<F>(&mut self, port: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> AdapterResult<()> + Send + Sync + 'static,
    {
        let port = port.into();
        if self.handlers.insert(port.clone(), Box::new(handler)).is_some() {
            warn!(port = %port, "replaced existing port subscriber");
        }
    }

    pub fn has_port(&self, port: &str) -> bool {
        self.handlers.contains_key(port)
    }

    /// Subscribed port names, sorted.
    pub fn port_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort();
        names
    }

    /// A sender for the outbound side, for handlers that emit responses.
    pub fn sender(&self) -> UnboundedSender<Envelope> {
        self.outbound.clone()
    }

    /// Deliver `payload` to the handler subscribed to `port`.
    pub fn dispatch(&self, port: &str, payload: Value) -> AdapterResult<()> {
        let handler = self
            .handlers
            .get(port)
            .ok_or_else(|| ProtocolError::UnknownPort(port.to_string()))?;
        handler(payload)
    }

    pub fn dispatch_envelope(&self, envelope: Envelope) -> AdapterResult<()> {
        self.dispatch(&envelope.port, envelope.payload)
    }
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ports")
            .field("ports", &self.port_names())
            .finish_non_exhaustive()
    }
}

/// Subscribe the storage adapter to every inbound storage port.
///
/// Get requests answer on the outbound port; all other requests are silent.
pub fn register<S>(ports: &mut Ports, adapter: Arc<StorageAdapter<S>>)
where
    S: KeyValueStore + 'static,
{
    for port in INBOUND_PORTS {
        let adapter = Arc::clone(&adapter);
        let outbound = ports.sender();
        ports.subscribe(port, move |payload: Value| {
            let request = PortRequest::from_port(port, payload)?;
            if let Some(response) = adapter.handle(request)? {
                let envelope = response.to_envelope();
                let name = envelope.port.clone();
                outbound
                    .send(envelope)
                    .map_err(|_| AdapterError::OutboundClosed(name))?;
            }
            Ok(())
        });
    }
    debug!(ports = INBOUND_PORTS.len(), "storage ports registered");
}
