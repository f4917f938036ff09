//! File-handle operations: CLSFIL, CMMTFIL, READFIL, WRITEFIL, LOCKFIL,
//! UNLOCKFIL, SKFMEND.

/// CLSFIL request: the peer's file identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClsfilRequest {
    pub file_id: u16,
}

impl ClsfilRequest {
    pub fn encode(&self) -> Vec<u8> {
        self.file_id.to_le_bytes().to_vec()
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < 2 {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(ClsfilRequest {
            file_id: u16::from_le_bytes([payload[0], payload[1]]),
        })
    }
}

/// READFIL request: byte offset, file identifier, and the chunk length
/// requested for this exchange (the caller's total request may be chunked
/// into several of these by the dispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadfilRequest {
    pub offset: u32,
    pub file_id: u16,
    pub chunk_len: u16,
}

impl ReadfilRequest {
    pub const WIRE_LEN: usize = 8;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::WIRE_LEN);
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.file_id.to_le_bytes());
        out.extend_from_slice(&self.chunk_len.to_le_bytes());
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < Self::WIRE_LEN {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(ReadfilRequest {
            offset: u32::from_le_bytes(payload[0..4].try_into().unwrap()),
            file_id: u16::from_le_bytes([payload[4], payload[5]]),
            chunk_len: u16::from_le_bytes([payload[6], payload[7]]),
        })
    }
}

/// WRITEFIL request: byte offset, file identifier, then the bytes to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritefilRequest {
    pub offset: u32,
    pub file_id: u16,
    pub data: Vec<u8>,
}

impl WritefilRequest {
    pub const HEADER_LEN: usize = 6;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::HEADER_LEN + self.data.len());
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.file_id.to_le_bytes());
        out.extend_from_slice(&self.data);
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < Self::HEADER_LEN {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(WritefilRequest {
            offset: u32::from_le_bytes(payload[0..4].try_into().unwrap()),
            file_id: u16::from_le_bytes([payload[4], payload[5]]),
            data: payload[Self::HEADER_LEN..].to_vec(),
        })
    }
}

/// WRITEFIL reply: number of bytes actually written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritefilReply {
    pub written: u16,
}

impl WritefilReply {
    pub const WIRE_LEN: usize = 2;

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() != Self::WIRE_LEN {
            return Err(crate::ProtoError::MalformedReply {
                expected: Self::WIRE_LEN,
                got: payload.len(),
            });
        }
        Ok(WritefilReply {
            written: u16::from_le_bytes([payload[0], payload[1]]),
        })
    }
}

/// A single byte-range lock/unlock region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockRegion {
    pub offset: u32,
    pub len: u32,
}

/// LOCKFIL/UNLOCKFIL request: a list of byte-range regions against a single
/// file identifier. Whether this locks or unlocks is carried out-of-band by
/// which opcode byte is sent (`0x0A` + 0 for lock, `0x0A` + 1 for unlock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockfilRequest {
    pub file_id: u16,
    pub regions: Vec<LockRegion>,
}

impl LockfilRequest {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(4 + self.regions.len() * 8);
        out.extend_from_slice(&(self.regions.len() as u16).to_le_bytes());
        out.extend_from_slice(&self.file_id.to_le_bytes());
        for region in &self.regions {
            out.extend_from_slice(&region.offset.to_le_bytes());
            out.extend_from_slice(&region.len.to_le_bytes());
        }
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < 4 {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        let count = u16::from_le_bytes([payload[0], payload[1]]) as usize;
        let file_id = u16::from_le_bytes([payload[2], payload[3]]);
        let needed = 4 + count * 8;
        if payload.len() < needed {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        let mut regions = Vec::with_capacity(count);
        for i in 0..count {
            let base = 4 + i * 8;
            regions.push(LockRegion {
                offset: u32::from_le_bytes(payload[base..base + 4].try_into().unwrap()),
                len: u32::from_le_bytes(payload[base + 4..base + 8].try_into().unwrap()),
            });
        }
        Ok(LockfilRequest { file_id, regions })
    }
}

/// SKFMEND request: a 32-bit offset (split lo/hi, matching the caller's
/// register pair) and the target file identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkfmendRequest {
    pub offset_lo: u16,
    pub offset_hi: u16,
    pub file_id: u16,
}

impl SkfmendRequest {
    pub const WIRE_LEN: usize = 6;

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::WIRE_LEN);
        out.extend_from_slice(&self.offset_lo.to_le_bytes());
        out.extend_from_slice(&self.offset_hi.to_le_bytes());
        out.extend_from_slice(&self.file_id.to_le_bytes());
        out
    }

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() < Self::WIRE_LEN {
            return Err(crate::ProtoError::TooShort(payload.len()));
        }
        Ok(SkfmendRequest {
            offset_lo: u16::from_le_bytes([payload[0], payload[1]]),
            offset_hi: u16::from_le_bytes([payload[2], payload[3]]),
            file_id: u16::from_le_bytes([payload[4], payload[5]]),
        })
    }
}

/// SKFMEND reply: the new file position, as a DX:AX register pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkfmendReply {
    pub position: u32,
}

impl SkfmendReply {
    pub const WIRE_LEN: usize = 4;

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() != Self::WIRE_LEN {
            return Err(crate::ProtoError::MalformedReply {
                expected: Self::WIRE_LEN,
                got: payload.len(),
            });
        }
        Ok(SkfmendReply {
            position: u32::from_le_bytes(payload.try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readfil_round_trips() {
        let req = ReadfilRequest {
            offset: 1024,
            file_id: 0x1234,
            chunk_len: 512,
        };
        let encoded = req.encode();
        assert_eq!(ReadfilRequest::decode(&encoded).unwrap(), req);
    }

    #[test]
    fn writefil_round_trips_with_payload() {
        let req = WritefilRequest {
            offset: 0,
            file_id: 7,
            data: vec![1, 2, 3, 4],
        };
        let encoded = req.encode();
        assert_eq!(WritefilRequest::decode(&encoded).unwrap(), req);
    }

    #[test]
    fn lockfil_round_trips_multiple_regions() {
        let req = LockfilRequest {
            file_id: 5,
            regions: vec![
                LockRegion { offset: 0, len: 10 },
                LockRegion {
                    offset: 100,
                    len: 20,
                },
            ],
        };
        let encoded = req.encode();
        assert_eq!(LockfilRequest::decode(&encoded).unwrap(), req);
    }

    #[test]
    fn skfmend_reply_decodes_position() {
        let reply = SkfmendReply::decode(&2048u32.to_le_bytes()).unwrap();
        assert_eq!(reply.position, 2048);
    }
}
