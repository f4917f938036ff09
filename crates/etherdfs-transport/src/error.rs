//! Link-layer error type.

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to open link-layer socket: {0}")]
    Open(#[source] std::io::Error),

    #[error("failed to transmit frame: {0}")]
    Send(#[source] std::io::Error),

    #[error("no such network interface: {0}")]
    NoSuchInterface(String),

    #[error("receive buffer full, frame dropped")]
    BufferBusy,
}
