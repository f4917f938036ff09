//! Link-layer transports for EtherDFS frames.

pub mod error;
pub mod loopback;
#[cfg(all(feature = "raw-ethernet", target_os = "linux"))]
pub mod raw_ethernet;
pub mod recv_slot;
pub mod traits;

pub use error::TransportError;
pub use loopback::LoopbackLink;
#[cfg(all(feature = "raw-ethernet", target_os = "linux"))]
pub use raw_ethernet::RawEthernetLink;
pub use recv_slot::ReceiveSlot;
pub use traits::LinkLayer;
