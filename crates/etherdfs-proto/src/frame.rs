//! Fixed-layout frame prefix shared by every request and reply.

use crate::mac::MacAddr;
use binrw::{BinRead, BinWrite, Endian, binrw};
use modular_bitfield::prelude::*;
use std::io::{Read, Seek, Write};

/// `0xF5ED` read as a little-endian `u16`, i.e. the wire bytes `0xED, 0xF5`.
pub const ETHERTYPE: u16 = 0xF5ED;

/// Length of [`FramePrefix`] in bytes (everything before the per-direction
/// drive/op or status bytes).
pub const FRAME_PREFIX_LEN: usize = 58;

/// Length of the full 60-byte request/reply header, prefix included.
pub const FRAME_HEADER_LEN: usize = 60;

/// Protocol version (low 7 bits) plus a checksum-enabled flag (bit 7) packed
/// into a single byte.
#[bitfield(bits = 8)]
#[derive(Clone, Copy, Debug)]
pub struct FrameFlags {
    pub version: B7,
    pub checksum_enabled: bool,
}

impl BinRead for FrameFlags {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let byte = u8::read_options(reader, endian, ())?;
        Ok(FrameFlags::from_bytes([byte]))
    }
}

impl BinWrite for FrameFlags {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        self.into_bytes()[0].write_options(writer, endian, ())
    }
}

impl PartialEq for FrameFlags {
    fn eq(&self, other: &Self) -> bool {
        self.into_bytes() == other.into_bytes()
    }
}
impl Eq for FrameFlags {}

/// The 58 bytes common to every request and reply frame: link headers,
/// ethertype, reserved padding, total length, checksum, and flags/sequence.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePrefix {
    pub dest_mac: MacAddr,
    pub src_mac: MacAddr,
    pub ethertype: u16,
    pub reserved: [u8; 38],
    pub total_len: u16,
    pub checksum: u16,
    pub flags: FrameFlags,
    pub seq: u8,
}

impl FramePrefix {
    pub fn new(dest_mac: MacAddr, src_mac: MacAddr, protocol_version: u8, checksum_enabled: bool) -> Self {
        FramePrefix {
            dest_mac,
            src_mac,
            ethertype: ETHERTYPE,
            reserved: [0u8; 38],
            total_len: FRAME_HEADER_LEN as u16,
            checksum: 0,
            flags: FrameFlags::new()
                .with_version(protocol_version)
                .with_checksum_enabled(checksum_enabled),
            seq: 0,
        }
    }
}

/// A request frame's final two direction-specific bytes: remote drive index
/// and operation code.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub prefix: FramePrefix,
    pub drive: u8,
    pub op: u8,
}

/// A reply frame's final two bytes reinterpreted as a single little-endian
/// status word ("AX").
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyHeader {
    pub prefix: FramePrefix,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use binrw::io::Cursor;

    #[test]
    fn request_header_round_trips() {
        let hdr = RequestHeader {
            prefix: FramePrefix::new(
                MacAddr::BROADCAST,
                MacAddr::new([2, 0xaa, 0xbb, 0xcc, 0xdd, 0xee]),
                1,
                true,
            ),
            drive: 3,
            op: 0x0C,
        };
        let mut buf = Cursor::new(Vec::new());
        hdr.write(&mut buf).unwrap();
        let bytes = buf.into_inner();
        assert_eq!(bytes.len(), FRAME_HEADER_LEN);
        assert_eq!(&bytes[12..14], &ETHERTYPE.to_le_bytes());

        let mut reader = Cursor::new(bytes);
        let decoded = RequestHeader::read(&mut reader).unwrap();
        assert_eq!(decoded, hdr);
    }

    #[test]
    fn flags_pack_version_and_checksum_bit() {
        let flags = FrameFlags::new().with_version(1).with_checksum_enabled(true);
        assert_eq!(flags.into_bytes()[0], 0b1000_0001);
    }
}
