//! Engine-level error type.

/// Errors surfaced by the engine itself — configuration and local
/// pre-checks. Peer-returned statuses and transport timeouts are not
/// `EngineError`s; they are translated directly into the caller's status
/// word by the dispatcher (see [`crate::dispatch`]).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("local drive {0} is already mapped")]
    DriveAlreadyMapped(u8),

    #[error("drive map is already installed")]
    AlreadyInstalled,

    #[error("no drive mappings configured")]
    NoMappings,

    #[error("peer discovery timed out")]
    DiscoveryTimedOut,

    #[error("transport error: {0}")]
    Transport(#[from] etherdfs_transport::TransportError),

    #[error("protocol error: {0}")]
    Proto(#[from] etherdfs_proto::ProtoError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
