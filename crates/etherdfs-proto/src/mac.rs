//! Link-layer (MAC) address type.

use binrw::{BinRead, BinWrite, Endian};
use std::fmt;
use std::io::{Read, Seek, Write};

/// A 6-byte Ethernet address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub const BROADCAST: MacAddr = MacAddr([0xFF; 6]);

    pub const fn new(bytes: [u8; 6]) -> Self {
        MacAddr(bytes)
    }

    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid MAC address: {0}")]
pub struct ParseMacError(String);

impl std::str::FromStr for MacAddr {
    type Err = ParseMacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = [0u8; 6];
        let parts: Vec<&str> = s.split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(ParseMacError(s.to_string()));
        }
        for (slot, part) in out.iter_mut().zip(parts) {
            *slot = u8::from_str_radix(part, 16).map_err(|_| ParseMacError(s.to_string()))?;
        }
        Ok(MacAddr(out))
    }
}

impl BinRead for MacAddr {
    type Args<'a> = ();

    fn read_options<R: Read + Seek>(
        reader: &mut R,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<Self> {
        let bytes = <[u8; 6]>::read_options(reader, endian, ())?;
        Ok(MacAddr(bytes))
    }
}

impl BinWrite for MacAddr {
    type Args<'a> = ();

    fn write_options<W: Write + Seek>(
        &self,
        writer: &mut W,
        endian: Endian,
        _: Self::Args<'_>,
    ) -> binrw::BinResult<()> {
        self.0.write_options(writer, endian, ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_separated() {
        let mac: MacAddr = "02:aa:bb:cc:dd:ee".parse().unwrap();
        assert_eq!(mac.0, [0x02, 0xaa, 0xbb, 0xcc, 0xdd, 0xee]);
    }

    #[test]
    fn rejects_short_input() {
        assert!("02:aa:bb".parse::<MacAddr>().is_err());
    }

    #[test]
    fn displays_lowercase_hex() {
        let mac = MacAddr([0x02, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);
        assert_eq!(mac.to_string(), "02:aa:bb:cc:dd:ee");
    }
}
