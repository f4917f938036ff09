//! FINDFIRST / FINDNEXT: directory search with peer-held continuation state.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

/// FINDFIRST request: search attribute byte followed by the path (which may
/// carry DOS wildcards).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindfirstRequest {
    pub attr: u8,
    pub path: Vec<u8>,
}

impl FindfirstRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.path.len());
        out.push(self.attr);
        out.extend_from_slice(&self.path);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.is_empty() {
            return Err(crate::ProtoError::TooShort(0));
        }
        Ok(FindfirstRequest {
            attr: payload[0],
            path: payload[1..].to_vec(),
        })
    }
}

/// FINDNEXT request: the two continuation tokens from the previous match,
/// the search attribute, and the 11-byte FCB-style template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindnextRequest {
    pub parent_cluster: u16,
    pub dir_entry: u16,
    pub attr: u8,
    pub fcb_template: [u8; 11],
}

impl FindnextRequest {
    pub const WIRE_LEN: usize = 2 + 2 + 1 + 11;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::WIRE_LEN);
        out.extend_from_slice(&self.parent_cluster.to_le_bytes());
        out.extend_from_slice(&self.dir_entry.to_le_bytes());
        out.push(self.attr);
        out.extend_from_slice(&self.fcb_template);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < Self::WIRE_LEN {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        let mut fcb_template = [0u8; 11];
        fcb_template.copy_from_slice(&payload[5..16]);
        Ok(FindnextRequest {
            parent_cluster: u16::from_le_bytes([payload[0], payload[1]]),
            dir_entry: u16::from_le_bytes([payload[2], payload[3]]),
            attr: payload[4],
            fcb_template,
        })
    }
}

/// The combined FINDFIRST/FINDNEXT reply: a directory entry (attr, FCB-style
/// name, time, date, size) immediately followed by the two continuation
/// tokens the caller must echo on the next FINDNEXT.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(little)]
pub struct FindReply {
    pub attr: u8,
    pub name: [u8; 11],
    pub time: u16,
    pub date: u16,
    pub size: u32,
    pub parent_cluster: u16,
    pub dir_entry: u16,
}

impl FindReply {
    pub const WIRE_LEN: usize = 24;

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() != Self::WIRE_LEN {
            return Err(crate::ProtoError::MalformedReply {
                expected: Self::WIRE_LEN,
                got: payload.len(),
            });
        }
        let mut cursor = Cursor::new(payload);
        Ok(FindReply::read(&mut cursor)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn findnext_round_trips() {
        let req = FindnextRequest {
            parent_cluster: 7,
            dir_entry: 3,
            attr: 0x10,
            fcb_template: *b"FOO     TXT",
        };
        let encoded = req.encode();
        assert_eq!(encoded.len(), FindnextRequest::WIRE_LEN);
        assert_eq!(FindnextRequest::decode(&encoded).unwrap(), req);
    }

    #[test]
    fn findfirst_round_trips() {
        let req = FindfirstRequest {
            attr: 0x16,
            path: b"*.TXT".to_vec(),
        };
        let encoded = req.encode();
        assert_eq!(FindfirstRequest::decode(&encoded).unwrap(), req);
    }
}
