//! Frame-level error type.

/// Errors that can occur while encoding or decoding a wire frame.
///
/// These never cross into the "peer returned a nonzero status" case — that
/// is a successful decode of a failure reply, not a [`ProtoError`].
#[derive(Debug, thiserror::Error)]
pub enum ProtoError {
    #[error("frame too short: {0} bytes")]
    TooShort(usize),

    #[error("bad ethertype: {0:#06x}")]
    BadEthertype(u16),

    #[error("checksum mismatch: computed {computed:#06x}, frame says {expected:#06x}")]
    ChecksumMismatch { computed: u16, expected: u16 },

    #[error("length field {field} exceeds observed frame length {observed}")]
    LengthOutOfBounds { field: u16, observed: usize },

    #[error("malformed reply payload for this operation: expected {expected} bytes, got {got}")]
    MalformedReply { expected: usize, got: usize },

    #[error("binary codec error: {0}")]
    Codec(#[from] binrw::Error),
}
