//! OPEN, CREATE and SPOPNFIL: open a remote file and populate an SFT.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

/// Request payload shared by OPEN and CREATE: a caller-supplied stack word
/// (open mode requested by the caller), two reserved words, then the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    pub stack_word: u16,
    pub path: Vec<u8>,
}

impl OpenRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6 + self.path.len());
        out.extend_from_slice(&self.stack_word.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&self.path);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < 6 {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(OpenRequest {
            stack_word: u16::from_le_bytes([payload[0], payload[1]]),
            path: payload[6..].to_vec(),
        })
    }
}

/// SPOPNFIL adds an explicit action and mode word ahead of the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpopnfilRequest {
    pub stack_word: u16,
    pub action: u16,
    pub mode: u16,
    pub path: Vec<u8>,
}

impl SpopnfilRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(6 + self.path.len());
        out.extend_from_slice(&self.stack_word.to_le_bytes());
        out.extend_from_slice(&self.action.to_le_bytes());
        out.extend_from_slice(&self.mode.to_le_bytes());
        out.extend_from_slice(&self.path);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < 6 {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(SpopnfilRequest {
            stack_word: u16::from_le_bytes([payload[0], payload[1]]),
            action: u16::from_le_bytes([payload[2], payload[3]]),
            mode: u16::from_le_bytes([payload[4], payload[5]]),
            path: payload[6..].to_vec(),
        })
    }
}

/// The 25-byte reply to OPEN/CREATE/SPOPNFIL: attribute byte, 11-byte short
/// name, packed 32-bit DOS file time, file size, the peer's file identifier
/// ("start sector"), a word that SPOPNFIL alone repurposes as a mode echo,
/// and the low byte of the granted open mode.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(little)]
pub struct SftReply {
    pub attr: u8,
    pub name: [u8; 11],
    pub file_time: u32,
    pub size: u32,
    pub file_id: u16,
    /// Meaningful only for SPOPNFIL, where it is echoed back as CX.
    pub mode_echo: u16,
    pub open_mode_low: u8,
}

impl SftReply {
    pub const WIRE_LEN: usize = 25;

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < Self::WIRE_LEN {
            return Err(crate::ProtoError::MalformedReply {
                expected: Self::WIRE_LEN,
                got: payload.len(),
            });
        }
        let mut cursor = Cursor::new(&payload[..Self::WIRE_LEN]);
        Ok(SftReply::read(&mut cursor)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_request_round_trips() {
        let req = OpenRequest {
            stack_word: 0x0002,
            path: b"A.TXT".to_vec(),
        };
        let encoded = req.encode();
        assert_eq!(encoded.len(), 6 + 5);
        assert_eq!(OpenRequest::decode(&encoded).unwrap(), req);
    }

    #[test]
    fn sft_reply_decodes_fixed_fields() {
        let mut bytes = vec![0x20u8];
        bytes.extend_from_slice(b"A       TXT");
        bytes.extend_from_slice(&0x11223344u32.to_le_bytes());
        bytes.extend_from_slice(&1024u32.to_le_bytes());
        bytes.extend_from_slice(&0x1234u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        bytes.push(0x02);
        assert_eq!(bytes.len(), SftReply::WIRE_LEN);

        let reply = SftReply::decode(&bytes).unwrap();
        assert_eq!(reply.attr, 0x20);
        assert_eq!(reply.file_id, 0x1234);
        assert_eq!(reply.size, 1024);
        assert_eq!(reply.open_mode_low, 0x02);
    }

    #[test]
    fn spopnfil_reply_carries_mode_echo_in_reserved_word() {
        let mut bytes = vec![0u8; SftReply::WIRE_LEN];
        bytes[0] = 0x10;
        let mode_echo_offset = 1 + 11 + 4 + 4 + 2;
        bytes[mode_echo_offset..mode_echo_offset + 2].copy_from_slice(&0x0002u16.to_le_bytes());
        let reply = SftReply::decode(&bytes).unwrap();
        assert_eq!(reply.mode_echo, 0x0002);
        assert_eq!(reply.attr, 0x10);
    }
}
