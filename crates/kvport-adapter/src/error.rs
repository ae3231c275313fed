use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("store error: {0}")]
    Store(#[from] kvport_store::StoreError),

    #[error("protocol error: {0}")]
    Protocol(#[from] kvport_protocol::ProtocolError),

    #[error("encode error: {0}")]
    Encode(String),

    #[error("outbound port {0} is closed")]
    OutboundClosed(String),
}

pub type AdapterResult<T> = Result<T, AdapterError>;
