//! Argument parsing, mirroring the original `parseargv()`: drive mappings,
//! peer address (or "auto" discovery), an optional checksum-off flag, and
//! the network interface to bind.

use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use etherdfs_proto::MacAddr;

/// EtherDFS: a network-drive redirector over raw Ethernet frames.
#[derive(Debug, Parser)]
#[command(name = "etherdfs", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Map one or more local drives to a peer and start serving requests.
    Map(MapArgs),
    /// Tear down a previously-mapped session.
    Unload,
    /// Run the dispatcher against a demo in-memory host shim, for local
    /// testing without a real redirector interception point.
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct MapArgs {
    /// Local-to-remote drive mapping, e.g. "F-C" maps local F: to the
    /// peer's drive index for C:. May be repeated.
    #[arg(value_parser = parse_drive_mapping, required = true)]
    pub drives: Vec<DriveMapping>,

    /// Peer MAC address, or "auto" to discover it with a broadcast probe.
    #[arg(long, default_value = "auto")]
    pub peer: PeerAddr,

    /// Network interface to bind the raw-Ethernet link to.
    #[arg(long, default_value = "eth0")]
    pub interface: String,

    /// Disables the per-frame checksum.
    #[arg(long)]
    pub no_checksum: bool,

    /// Protocol version byte to advertise (low 7 bits of the flags byte).
    #[arg(long, default_value_t = 1)]
    pub protocol_version: u8,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Local-to-remote drive mapping, same syntax as `map`.
    #[arg(value_parser = parse_drive_mapping, required = true)]
    pub drives: Vec<DriveMapping>,

    /// Root of the directory tree the demo host shim serves files from.
    #[arg(long)]
    pub root: std::path::PathBuf,
}

#[derive(Debug, Clone, Copy)]
pub struct DriveMapping {
    pub local: u8,
    pub remote: u8,
}

fn parse_drive_mapping(s: &str) -> Result<DriveMapping, String> {
    let (local, remote) = s
        .split_once('-')
        .ok_or_else(|| format!("expected \"X-Y\" drive mapping, got {s:?}"))?;
    let local = drive_letter(local)?;
    let remote = drive_letter(remote)?;
    Ok(DriveMapping { local, remote })
}

fn drive_letter(s: &str) -> Result<u8, String> {
    let mut chars = s.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(format!("expected a single drive letter, got {s:?}"));
    };
    if !c.is_ascii_alphabetic() {
        return Err(format!("{s:?} is not a drive letter"));
    }
    Ok(c.to_ascii_uppercase() as u8 - b'A')
}

#[derive(Debug, Clone, Copy)]
pub enum PeerAddr {
    Auto,
    Fixed(MacAddr),
}

impl FromStr for PeerAddr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            Ok(PeerAddr::Auto)
        } else {
            MacAddr::from_str(s)
                .map(PeerAddr::Fixed)
                .map_err(|e| e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_drive_mapping() {
        let m = parse_drive_mapping("F-C").unwrap();
        assert_eq!(m.local, 5);
        assert_eq!(m.remote, 2);
    }

    #[test]
    fn rejects_malformed_mapping() {
        assert!(parse_drive_mapping("FC").is_err());
    }

    #[test]
    fn peer_addr_parses_auto_case_insensitively() {
        assert!(matches!("AUTO".parse::<PeerAddr>().unwrap(), PeerAddr::Auto));
    }
}
