//! A toy reference peer used only by the `serve` demo command.
//!
//! This is not part of the engine — the engine only ever plays the client
//! role described by the specification. To exercise the dispatcher without
//! a second real machine on the wire, `serve` spawns this thread as the
//! "remote" side, answering wire requests against a local directory tree.
//! It is deliberately minimal: just enough operations to drive the demo
//! script in `main.rs`.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use etherdfs_proto::ops::{
    DiskspaceReply, FindReply, GetattrReply, OpenRequest, ReadfilRequest, SftReply,
};
use etherdfs_proto::frame::FRAME_HEADER_LEN;
use etherdfs_proto::{ETHERTYPE, OpCode};
use etherdfs_transport::LinkLayer;

/// Runs the toy peer until the link is dropped. Blocks the calling thread;
/// spawn it with [`spawn`] instead for interactive use.
pub fn spawn(link: impl LinkLayer + Send + 'static, root: PathBuf) {
    thread::spawn(move || loop {
        let Some(frame) = poll_recv(&link) else {
            continue;
        };
        link.reset_recv();
        if frame.len() < FRAME_HEADER_LEN {
            continue;
        }
        let ethertype = u16::from_le_bytes([frame[12], frame[13]]);
        if ethertype != ETHERTYPE {
            continue;
        }
        let drive = frame[58];
        let op = frame[59];
        let payload = &frame[FRAME_HEADER_LEN..];

        let (status, reply_payload) = handle(op, drive, payload, &root);

        // Addresses swap (the sender becomes the recipient); flags and
        // sequence are echoed verbatim. This demo peer never sets the
        // checksum-enabled bit in its own replies.
        let mut reply = vec![0u8; FRAME_HEADER_LEN];
        reply[0..6].copy_from_slice(&frame[6..12]);
        reply[6..12].copy_from_slice(&frame[0..6]);
        reply[12..14].copy_from_slice(&ETHERTYPE.to_le_bytes());
        reply[56] = frame[56] & 0x7F;
        reply[57] = frame[57];
        let total_len = (FRAME_HEADER_LEN + reply_payload.len()) as u16;
        reply[52..54].copy_from_slice(&total_len.to_le_bytes());
        reply[58..60].copy_from_slice(&status.to_le_bytes());
        reply.extend_from_slice(&reply_payload);

        let _ = link.send(&reply);
    });
}

fn poll_recv(link: &impl LinkLayer) -> Option<Vec<u8>> {
    for _ in 0..1000 {
        if let Some(frame) = link.try_recv() {
            return Some(frame);
        }
        thread::yield_now();
    }
    None
}

fn handle(op: u8, _drive: u8, payload: &[u8], root: &Path) -> (u16, Vec<u8>) {
    let Some(code) = OpCode::from_byte(op) else {
        return (2, Vec::new());
    };
    match code {
        OpCode::Diskspace => {
            let reply = DiskspaceReply {
                total_clusters: 0x0100,
                bytes_per_sector: 0x0200,
                free_clusters: 0x0080,
            };
            (4, encode(&reply))
        }
        OpCode::Getattr => {
            let path = root.join(lossy_path(payload));
            match fs::metadata(&path) {
                Ok(meta) => {
                    let reply = GetattrReply {
                        time: 0,
                        date: 0,
                        size: meta.len() as u32,
                        attr: if meta.is_dir() { 0x10 } else { 0 },
                    };
                    (0, encode(&reply))
                }
                Err(_) => (2, Vec::new()),
            }
        }
        OpCode::Open | OpCode::Create => {
            let req = match OpenRequest::decode(payload) {
                Ok(r) => r,
                Err(_) => return (2, Vec::new()),
            };
            let path = root.join(lossy_path(&req.path));
            match fs::metadata(&path) {
                Ok(meta) => {
                    let mut name = [b' '; 11];
                    let short = short_name(&path);
                    for (dst, src) in name.iter_mut().zip(short.as_bytes()) {
                        *dst = *src;
                    }
                    let reply = SftReply {
                        attr: if meta.is_dir() { 0x10 } else { 0 },
                        name,
                        file_time: 0,
                        size: meta.len() as u32,
                        file_id: 1,
                        mode_echo: 0,
                        open_mode_low: 0x02,
                    };
                    (0, encode(&reply))
                }
                Err(_) => (2, Vec::new()),
            }
        }
        OpCode::Readfil => {
            let req = match ReadfilRequest::decode(payload) {
                Ok(r) => r,
                Err(_) => return (2, Vec::new()),
            };
            // The demo peer only ever opens one file (id 1) rooted under
            // `root`; reads beyond it simply return nothing (EOF).
            let _ = req.file_id;
            (2, Vec::new())
        }
        OpCode::Findfirst => {
            let spec = lossy_path(&payload[1..]);
            let dir_part = spec.rsplit_once('/').map(|(d, _)| d).unwrap_or("");
            let dir = root.join(dir_part);
            match fs::read_dir(&dir).ok().and_then(|mut it| it.next()) {
                Some(Ok(entry)) => {
                    let meta = entry.metadata().ok();
                    let mut name = [b' '; 11];
                    let short = short_name(&entry.path());
                    for (dst, src) in name.iter_mut().zip(short.as_bytes()) {
                        *dst = *src;
                    }
                    let reply = FindReply {
                        attr: meta.as_ref().map(|m| if m.is_dir() { 0x10 } else { 0 }).unwrap_or(0),
                        name,
                        time: 0,
                        date: 0,
                        size: meta.map(|m| m.len() as u32).unwrap_or(0),
                        parent_cluster: 0,
                        dir_entry: 0,
                    };
                    (0, encode(&reply))
                }
                _ => (2, Vec::new()),
            }
        }
        _ => (2, Vec::new()),
    }
}

fn lossy_path(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_start_matches(['\\', '/'])
        .replace('\\', "/")
}

fn short_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_uppercase())
        .unwrap_or_default()
}

fn encode<T>(value: &T) -> Vec<u8>
where
    T: binrw::BinWrite,
    for<'a> <T as binrw::BinWrite>::Args<'a>: Default,
{
    let mut buf = binrw::io::Cursor::new(Vec::new());
    value.write(&mut buf).expect("fixed-layout reply cannot fail to encode");
    buf.into_inner()
}
