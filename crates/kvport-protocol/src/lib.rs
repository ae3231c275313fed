//! Port protocol for the kvport storage adapter.
//!
//! Defines the named ports, the typed requests and responses they carry,
//! and the newline-delimited JSON envelope used to move them across a
//! process boundary.

pub mod codec;
pub mod error;
pub mod message;
pub mod ports;

pub use codec::{EnvelopeCodec, MAX_MESSAGE_SIZE};
pub use error::{ProtocolError, ProtocolResult};
pub use message::{Envelope, PortRequest, PortResponse};
pub use ports::{names, INBOUND_PORTS, SAMPLE_PORT_NAME};
