//! Path-bearing operations: RMDIR, MKDIR, CHDIR, DELETE, SETATTR, RENAME,
//! GETATTR.
//!
//! None of these payloads are length-prefixed on the wire; the frame's
//! total-length field is what tells the receiver how many bytes follow the
//! 60-byte header, so encode/decode here work against a borrowed slice
//! rather than through `binrw`.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

/// A request payload that is just a path (drive letter already stripped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRequest {
    pub path: Vec<u8>,
}

impl PathRequest {
    pub fn new(path: impl Into<Vec<u8>>) -> Self {
        PathRequest { path: path.into() }
    }

    pub fn encode(&self) -> Vec<u8> {
        self.path.clone()
    }

    pub fn decode(payload: &[u8]) -> Self {
        PathRequest {
            path: payload.to_vec(),
        }
    }
}

/// SETATTR request: a 16-bit attribute word followed by the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetattrRequest {
    pub attr: u16,
    pub path: Vec<u8>,
}

impl SetattrRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(2 + self.path.len());
        out.extend_from_slice(&self.attr.to_le_bytes());
        out.extend_from_slice(&self.path);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < 2 {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(SetattrRequest {
            attr: u16::from_le_bytes([payload[0], payload[1]]),
            path: payload[2..].to_vec(),
        })
    }
}

/// GETATTR reply. On the wire the attribute byte trails the other three
/// fields; the dispatcher fans these back out to AX (attr), CX (time), DX
/// (date) and BX:DI (size).
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(little)]
pub struct GetattrReply {
    pub time: u16,
    pub date: u16,
    pub size: u32,
    pub attr: u8,
}

impl GetattrReply {
    pub const WIRE_LEN: usize = 9;

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() != Self::WIRE_LEN {
            return Err(crate::ProtoError::MalformedReply {
                expected: Self::WIRE_LEN,
                got: payload.len(),
            });
        }
        let mut cursor = Cursor::new(payload);
        Ok(GetattrReply::read(&mut cursor)?)
    }
}

/// RENAME request: length-prefixed old path, followed immediately by the new
/// path (taking up the rest of the payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRequest {
    pub old_path: Vec<u8>,
    pub new_path: Vec<u8>,
}

impl RenameRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.old_path.len() + self.new_path.len());
        out.push(self.old_path.len() as u8);
        out.extend_from_slice(&self.old_path);
        out.extend_from_slice(&self.new_path);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.is_empty() {
            return Err(crate::ProtoError::TooShort(0));
        }
        let old_len = payload[0] as usize;
        if payload.len() < 1 + old_len {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(RenameRequest {
            old_path: payload[1..1 + old_len].to_vec(),
            new_path: payload[1 + old_len..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setattr_round_trips() {
        let req = SetattrRequest {
            attr: 0x20,
            path: b"FOO.TXT".to_vec(),
        };
        let encoded = req.encode();
        let decoded = SetattrRequest::decode(&encoded).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn rename_round_trips() {
        let req = RenameRequest {
            old_path: b"OLD.TXT".to_vec(),
            new_path: b"NEW.TXT".to_vec(),
        };
        let encoded = req.encode();
        let decoded = RenameRequest::decode(&encoded).unwrap();
        assert_eq!(req, decoded);
    }

    #[test]
    fn getattr_reply_rejects_wrong_length() {
        assert!(GetattrReply::decode(&[0; 8]).is_err());
    }

    #[test]
    fn getattr_reply_decodes_fixed_layout() {
        let bytes = [0x11, 0x22, 0x33, 0x44, 0x00, 0x04, 0x00, 0x00, 0x20];
        let reply = GetattrReply::decode(&bytes).unwrap();
        assert_eq!(reply.time, 0x2211);
        assert_eq!(reply.date, 0x4433);
        assert_eq!(reply.size, 0x400);
        assert_eq!(reply.attr, 0x20);
    }
}
