//! The link-layer abstraction the transaction engine transmits and polls
//! through.

use crate::error::TransportError;
use etherdfs_proto::MacAddr;

/// A raw Ethernet-like transport: synchronous, best-effort send, and a
/// single-slot asynchronous receive path fed by some producer (an
/// interrupt on the original host, a background thread here).
pub trait LinkLayer: Send + Sync {
    /// The local hardware address, read once at open time.
    fn local_mac(&self) -> MacAddr;

    /// Submits a frame. May fail silently at the link layer; the
    /// transaction engine never inspects the result beyond logging it,
    /// since a dropped frame simply manifests as a missing reply.
    fn send(&self, frame: &[u8]) -> Result<(), TransportError>;

    /// Non-blocking poll of the receive slot. Returns `Some(frame)` exactly
    /// once per delivered frame; the caller is responsible for resetting the
    /// slot via [`LinkLayer::reset_recv`] before the next wait.
    fn try_recv(&self) -> Option<Vec<u8>>;

    /// Clears the receive slot back to its empty state, readying it for the
    /// next claim.
    fn reset_recv(&self);
}
