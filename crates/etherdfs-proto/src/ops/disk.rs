//! DISKSPACE, and the two operations handled without a wire exchange
//! (install-check and the undocumented 0x2D).

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

/// DISKSPACE has no request payload beyond the common header.
///
/// Unlike every other operation, the status word itself carries a result
/// (sectors per cluster) rather than a pass/fail code — DISKSPACE cannot
/// fail at the protocol level. The 6-byte payload carries the remaining
/// three results: total clusters, bytes per sector, and free clusters,
/// destined for BX/CX/DX respectively.
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
#[brw(little)]
pub struct DiskspaceReply {
    pub total_clusters: u16,
    pub bytes_per_sector: u16,
    pub free_clusters: u16,
}

impl DiskspaceReply {
    pub const WIRE_LEN: usize = 6;

    pub fn decode(payload: &[u8]) -> crate::Result<Self> {
        if payload.len() != Self::WIRE_LEN {
            return Err(crate::ProtoError::MalformedReply {
                expected: Self::WIRE_LEN,
                got: payload.len(),
            });
        }
        let mut cursor = Cursor::new(payload);
        Ok(DiskspaceReply::read(&mut cursor)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diskspace_reply_decodes_fields_in_order() {
        let bytes = [
            0x00, 0x01, // total_clusters
            0x00, 0x02, // bytes_per_sector
            0x80, 0x00, // free_clusters
        ];
        let reply = DiskspaceReply::decode(&bytes).unwrap();
        assert_eq!(reply.total_clusters, 0x0100);
        assert_eq!(reply.bytes_per_sector, 0x0200);
        assert_eq!(reply.free_clusters, 0x0080);
    }
}
