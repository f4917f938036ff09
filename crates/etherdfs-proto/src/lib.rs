//! Wire frame codec for the EtherDFS link-layer protocol.
//!
//! A request is a fixed 60-byte prefix followed by an operation-specific
//! payload; a reply has the same prefix shape with the last two bytes
//! reinterpreted as a 16-bit status word.

pub mod checksum;
pub mod error;
pub mod frame;
pub mod mac;
pub mod ops;

pub use checksum::bsd_checksum;
pub use error::ProtoError;
pub use frame::{
    ETHERTYPE, FRAME_PREFIX_LEN, FrameFlags, FramePrefix, ReplyHeader, RequestHeader,
};
pub use mac::MacAddr;
pub use ops::OpCode;

pub type Result<T> = std::result::Result<T, ProtoError>;
