//! Operation dispatcher: turns a decoded redirector call plus its
//! host-owned control blocks into wire transactions, and translates the
//! result back into the caller's register-shaped outcome.

use etherdfs_proto::ops::{
    ClsfilRequest, DiskspaceReply, FindReply, FindfirstRequest, FindnextRequest, GetattrReply,
    LockRegion, LockfilRequest, OpenRequest, PathRequest, ReadfilRequest, RenameRequest,
    SetattrRequest, SftReply, SkfmendReply, SkfmendRequest, SpopnfilRequest, WritefilReply,
    WritefilRequest,
};
use etherdfs_proto::OpCode;

use crate::drive_map::DriveMap;
use crate::shim::{FileHandle, SearchState};
use crate::transaction::TransactionEngine;

/// Maximum Ethernet frame this engine will build a request into. READFIL and
/// WRITEFIL chunk their payloads against this, matching the original's
/// `FRAMESIZE` constant.
pub const FRAME_SIZE: usize = 1514;

/// Result envelope matching the spec's "AX/BX/CX/DX/DI plus carry" shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub ax: u16,
    pub bx: u16,
    pub cx: u16,
    pub dx: u16,
    pub di: u16,
    pub carry: bool,
}

impl DispatchOutcome {
    fn success(ax: u16) -> Self {
        DispatchOutcome {
            ax,
            carry: false,
            ..Default::default()
        }
    }

    fn failure(status: u16) -> Self {
        DispatchOutcome {
            ax: status,
            carry: true,
            ..Default::default()
        }
    }

    fn from_status(status: u16) -> Self {
        if status == 0 {
            DispatchOutcome::success(0)
        } else {
            DispatchOutcome::failure(status)
        }
    }
}

/// Generic "file not found" fallback used by most operations on timeout.
const GENERIC_TIMEOUT_STATUS: u16 = 2;
/// CHDIR's timeout fallback: "path not found".
const CHDIR_TIMEOUT_STATUS: u16 = 3;
/// RMDIR-of-current-directory's local rejection and FINDNEXT's timeout
/// fallback both reuse DOS's own error codes for "access denied" and
/// "no more files" respectively.
const ACCESS_DENIED_STATUS: u16 = 5;
const RMDIR_CURRENT_DIR_STATUS: u16 = 16;
const FINDNEXT_TIMEOUT_STATUS: u16 = 18;

/// Strips a leading two-byte "D:" drive prefix, matching the host's
/// unnormalized filename scratch area.
pub fn strip_drive_prefix(path: &[u8]) -> &[u8] {
    if path.len() >= 2 && path[1] == b':' {
        &path[2..]
    } else {
        path
    }
}

/// Normalizes a dot-separated short name into the 11-byte space-padded
/// FCB form (8 name + 3 extension). Applied to the FCB-name scratch area
/// before every operation except DISKSPACE, since the host leaves it stale.
pub fn fcb_normalize(name: &[u8]) -> [u8; 11] {
    let mut out = [b' '; 11];
    let (base, ext) = match name.iter().position(|&b| b == b'.') {
        Some(dot) => (&name[..dot], &name[dot + 1..]),
        None => (name, &[][..]),
    };
    for (dst, src) in out[0..8].iter_mut().zip(base.iter().take(8)) {
        *dst = *src;
    }
    for (dst, src) in out[8..11].iter_mut().zip(ext.iter().take(3)) {
        *dst = *src;
    }
    out
}

/// Returns the part of a backslash-separated path after its last separator,
/// i.e. the bare filename (wildcards included) a search pattern is built
/// from.
fn filename_component(path: &[u8]) -> &[u8] {
    match path.iter().rposition(|&b| b == b'\\') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Resolves the local drive index a path-bearing request targets, from the
/// first character of its (unstripped) filename.
pub fn drive_from_filename(path: &[u8]) -> Option<u8> {
    path.first().map(|&c| (c.to_ascii_uppercase() - b'A'))
}

/// Resolves the local drive index for everything else, from the first
/// character of the CDS path.
pub fn drive_from_cds_path(cds_path: &[u8]) -> Option<u8> {
    path_drive_letter(cds_path)
}

fn path_drive_letter(path: &[u8]) -> Option<u8> {
    path.first().map(|&c| (c.to_ascii_uppercase() - b'A'))
}

fn remote_drive(drive_map: &DriveMap, local: u8) -> Option<u8> {
    drive_map.resolve(local)
}

pub fn install_check() -> DispatchOutcome {
    DispatchOutcome::success(0xDF)
}

pub fn unknown_2d() -> DispatchOutcome {
    DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS)
}

pub fn unlockfil() -> DispatchOutcome {
    // DOS 4+ should never call this; the original always fails it.
    DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS)
}

pub fn cmmtfil() -> DispatchOutcome {
    DispatchOutcome::success(0)
}

pub fn rmdir(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    path: &[u8],
    is_current_dir: bool,
) -> DispatchOutcome {
    if is_current_dir {
        return DispatchOutcome::failure(RMDIR_CURRENT_DIR_STATUS);
    }
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = PathRequest::new(path.to_vec()).encode();
    match tx.transact(OpCode::Rmdir.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn mkdir(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    path: &[u8],
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = PathRequest::new(path.to_vec()).encode();
    match tx.transact(OpCode::Mkdir.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

/// CHDIR never mutates the current-directory structure itself; the host
/// does that after a success result.
pub fn chdir(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    path: &[u8],
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(CHDIR_TIMEOUT_STATUS);
    };
    let req = PathRequest::new(path.to_vec()).encode();
    match tx.transact(OpCode::Chdir.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(CHDIR_TIMEOUT_STATUS),
    }
}

pub fn clsfil(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    handle: &mut FileHandle,
) -> DispatchOutcome {
    // The handle-count decrement is the host's own bookkeeping and always
    // happens, regardless of what the peer says.
    let Some(remote) = remote_drive(drive_map, handle.drive()) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = ClsfilRequest {
        file_id: handle.file_id,
    }
    .encode();
    match tx.transact(OpCode::Clsfil.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

/// READFIL: chunks the request into pieces no larger than the frame can
/// carry, stopping at the first short reply (treated as EOF). Returns the
/// bytes actually read alongside the outcome (CX carries the count).
pub fn readfil(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    handle: &mut FileHandle,
    requested_len: u16,
) -> (DispatchOutcome, Vec<u8>) {
    if handle.is_write_only() {
        return (DispatchOutcome::failure(ACCESS_DENIED_STATUS), Vec::new());
    }
    let Some(remote) = remote_drive(drive_map, handle.drive()) else {
        return (DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS), Vec::new());
    };

    const CHUNK_CAP: usize = FRAME_SIZE - 60;
    let mut data = Vec::with_capacity(requested_len as usize);
    let mut remaining = requested_len as usize;
    let mut offset = handle.position;

    while remaining > 0 {
        let chunk_len = remaining.min(CHUNK_CAP) as u16;
        let req = ReadfilRequest {
            offset,
            file_id: handle.file_id,
            chunk_len,
        }
        .encode();
        let reply = match tx.transact(OpCode::Readfil.as_byte(), remote, &req, false) {
            Ok(reply) => reply,
            Err(_) => {
                handle.position += data.len() as u32;
                let outcome = DispatchOutcome {
                    cx: data.len() as u16,
                    ..DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS)
                };
                return (outcome, data);
            }
        };
        if reply.status != 0 {
            handle.position += data.len() as u32;
            let outcome = DispatchOutcome {
                cx: data.len() as u16,
                ..DispatchOutcome::from_status(reply.status)
            };
            return (outcome, data);
        }
        let got = reply.payload.len();
        data.extend_from_slice(&reply.payload);
        offset += got as u32;
        remaining -= remaining.min(chunk_len as usize);
        if got < chunk_len as usize {
            break; // short reply: end of file
        }
    }

    handle.position += data.len() as u32;
    (
        DispatchOutcome {
            ax: 0,
            cx: data.len() as u16,
            carry: false,
            ..Default::default()
        },
        data,
    )
}

/// WRITEFIL: always performs at least one exchange, even for a zero-byte
/// write (DOS semantics: a zero-length write truncates the file at the
/// current position). Stops at the first partial write.
pub fn writefil(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    handle: &mut FileHandle,
    data: &[u8],
) -> DispatchOutcome {
    if handle.is_read_only() {
        return DispatchOutcome::failure(ACCESS_DENIED_STATUS);
    }
    let Some(remote) = remote_drive(drive_map, handle.drive()) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };

    const CHUNK_CAP: usize = FRAME_SIZE - 66;
    let mut offset = handle.position;
    let mut total_written: u32 = 0;
    // A zero-byte write still performs exactly one exchange (DOS semantics:
    // truncate at the current position), so this is a do/while, not a
    // for-each-chunk loop.
    let mut sent = 0usize;
    loop {
        let chunk = &data[sent..(sent + CHUNK_CAP.max(1)).min(data.len())];
        let req = WritefilRequest {
            offset,
            file_id: handle.file_id,
            data: chunk.to_vec(),
        }
        .encode();
        let reply = match tx.transact(OpCode::Writefil.as_byte(), remote, &req, false) {
            Ok(reply) => reply,
            Err(_) => {
                handle.position = offset;
                handle.size = handle.size.max(offset);
                return DispatchOutcome {
                    cx: total_written as u16,
                    ..DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS)
                };
            }
        };
        if reply.status != 0 {
            handle.position = offset;
            handle.size = handle.size.max(offset);
            return DispatchOutcome {
                cx: total_written as u16,
                ..DispatchOutcome::from_status(reply.status)
            };
        }
        let written = match WritefilReply::decode(&reply.payload) {
            Ok(r) => r.written,
            Err(_) => 0,
        };
        offset += written as u32;
        total_written += written as u32;
        sent += chunk.len();

        let partial = (written as usize) < chunk.len();
        if partial || sent >= data.len() {
            break;
        }
    }

    handle.position = offset;
    handle.size = handle.size.max(offset);
    DispatchOutcome {
        ax: 0,
        cx: total_written as u16,
        carry: false,
        ..Default::default()
    }
}

pub fn lockfil(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    file_id: u16,
    regions: Vec<LockRegion>,
    unlock: bool,
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let op = OpCode::Lockfil.as_byte() + if unlock { 1 } else { 0 };
    let req = LockfilRequest { file_id, regions }.encode();
    match tx.transact(op, remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

/// DISKSPACE cannot fail at the protocol level: the status word itself
/// carries the sectors-per-cluster result rather than a pass/fail code.
pub fn diskspace(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let reply = match tx.transact(OpCode::Diskspace.as_byte(), remote, &[], false) {
        Ok(reply) => reply,
        Err(_) => return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    };
    match DiskspaceReply::decode(&reply.payload) {
        Ok(d) => DispatchOutcome {
            ax: reply.status,
            bx: d.total_clusters,
            cx: d.bytes_per_sector,
            dx: d.free_clusters,
            di: 0,
            carry: false,
        },
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn setattr(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    attr: u16,
    path: &[u8],
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = SetattrRequest {
        attr,
        path: path.to_vec(),
    }
    .encode();
    match tx.transact(OpCode::Setattr.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn getattr(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    path: &[u8],
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = PathRequest::new(path.to_vec()).encode();
    let reply = match tx.transact(OpCode::Getattr.as_byte(), remote, &req, false) {
        Ok(reply) => reply,
        Err(_) => return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    };
    if reply.status != 0 {
        return DispatchOutcome::from_status(reply.status);
    }
    match GetattrReply::decode(&reply.payload) {
        Ok(g) => DispatchOutcome {
            ax: g.attr as u16,
            bx: (g.size >> 16) as u16,
            cx: g.time,
            dx: g.date,
            di: (g.size & 0xFFFF) as u16,
            carry: false,
        },
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn rename(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    old_drive: u8,
    new_drive: u8,
    old_path: &[u8],
    new_path: &[u8],
    new_path_has_wildcards: bool,
) -> DispatchOutcome {
    if old_drive != new_drive {
        return DispatchOutcome::failure(ACCESS_DENIED_STATUS);
    }
    if new_path_has_wildcards {
        return DispatchOutcome::failure(ACCESS_DENIED_STATUS);
    }
    let Some(remote) = remote_drive(drive_map, old_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = RenameRequest {
        old_path: old_path.to_vec(),
        new_path: new_path.to_vec(),
    }
    .encode();
    match tx.transact(OpCode::Rename.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn delete(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    path: &[u8],
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = PathRequest::new(path.to_vec()).encode();
    match tx.transact(OpCode::Delete.as_byte(), remote, &req, false) {
        Ok(reply) => DispatchOutcome::from_status(reply.status),
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

fn open_family(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    op: u8,
    payload: &[u8],
    handle_out: &mut FileHandle,
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let reply = match tx.transact(op, remote, payload, false) {
        Ok(reply) => reply,
        Err(_) => return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    };
    if reply.status != 0 {
        return DispatchOutcome::from_status(reply.status);
    }
    match SftReply::decode(&reply.payload) {
        Ok(sft) => {
            handle_out.populate_from_reply(local_drive, &sft);
            DispatchOutcome {
                ax: 0,
                cx: sft.mode_echo,
                carry: false,
                ..Default::default()
            }
        }
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn open(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    stack_word: u16,
    path: &[u8],
    path_has_wildcards: bool,
    handle_out: &mut FileHandle,
) -> DispatchOutcome {
    if path_has_wildcards {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    }
    let req = OpenRequest {
        stack_word,
        path: path.to_vec(),
    }
    .encode();
    open_family(tx, drive_map, local_drive, OpCode::Open.as_byte(), &req, handle_out)
}

pub fn create(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    stack_word: u16,
    path: &[u8],
    path_has_wildcards: bool,
    handle_out: &mut FileHandle,
) -> DispatchOutcome {
    if path_has_wildcards {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    }
    let req = OpenRequest {
        stack_word,
        path: path.to_vec(),
    }
    .encode();
    open_family(tx, drive_map, local_drive, OpCode::Create.as_byte(), &req, handle_out)
}

pub fn spopnfil(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    stack_word: u16,
    action: u16,
    mode: u16,
    path: &[u8],
    handle_out: &mut FileHandle,
) -> DispatchOutcome {
    let req = SpopnfilRequest {
        stack_word,
        action,
        mode,
        path: path.to_vec(),
    }
    .encode();
    open_family(
        tx,
        drive_map,
        local_drive,
        OpCode::Spopnfil.as_byte(),
        &req,
        handle_out,
    )
}

pub fn findfirst(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    local_drive: u8,
    attr: u8,
    path: &[u8],
    state_out: &mut SearchState,
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, local_drive) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = FindfirstRequest {
        attr,
        path: path.to_vec(),
    }
    .encode();
    let reply = match tx.transact(OpCode::Findfirst.as_byte(), remote, &req, false) {
        Ok(reply) => reply,
        Err(_) => return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    };
    if reply.status != 0 {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    }
    match FindReply::decode(&reply.payload) {
        Ok(entry) => {
            state_out.drive_byte = local_drive;
            state_out.attr = attr;
            state_out.search_template = fcb_normalize(filename_component(path));
            state_out.exhausted = false;
            state_out.apply_reply(&entry);
            DispatchOutcome {
                ax: entry.attr as u16,
                bx: (entry.size >> 16) as u16,
                cx: entry.time,
                dx: entry.date,
                di: (entry.size & 0xFFFF) as u16,
                carry: false,
            }
        }
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

pub fn findnext(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    state: &mut SearchState,
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, state.drive()) else {
        return DispatchOutcome::failure(FINDNEXT_TIMEOUT_STATUS);
    };
    let req = FindnextRequest {
        parent_cluster: state.parent_cluster,
        dir_entry: state.dir_entry,
        attr: state.attr,
        fcb_template: state.search_template,
    }
    .encode();
    let reply = match tx.transact(OpCode::Findnext.as_byte(), remote, &req, false) {
        Ok(reply) => reply,
        Err(_) => return DispatchOutcome::failure(FINDNEXT_TIMEOUT_STATUS),
    };
    if reply.status != 0 {
        state.exhausted = true;
        return DispatchOutcome::failure(FINDNEXT_TIMEOUT_STATUS);
    }
    match FindReply::decode(&reply.payload) {
        Ok(entry) => {
            state.apply_reply(&entry);
            DispatchOutcome {
                ax: entry.attr as u16,
                bx: (entry.size >> 16) as u16,
                cx: entry.time,
                dx: entry.date,
                di: (entry.size & 0xFFFF) as u16,
                carry: false,
            }
        }
        Err(_) => DispatchOutcome::failure(FINDNEXT_TIMEOUT_STATUS),
    }
}

pub fn skfmend(
    tx: &mut TransactionEngine,
    drive_map: &DriveMap,
    handle: &mut FileHandle,
    offset_lo: u16,
    offset_hi: u16,
) -> DispatchOutcome {
    let Some(remote) = remote_drive(drive_map, handle.drive()) else {
        return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS);
    };
    let req = SkfmendRequest {
        offset_lo,
        offset_hi,
        file_id: handle.file_id,
    }
    .encode();
    let reply = match tx.transact(OpCode::Skfmend.as_byte(), remote, &req, false) {
        Ok(reply) => reply,
        Err(_) => return DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    };
    if reply.status != 0 {
        return DispatchOutcome::from_status(reply.status);
    }
    match SkfmendReply::decode(&reply.payload) {
        Ok(pos) => {
            handle.position = pos.position;
            DispatchOutcome {
                ax: (pos.position & 0xFFFF) as u16,
                dx: (pos.position >> 16) as u16,
                carry: false,
                ..Default::default()
            }
        }
        Err(_) => DispatchOutcome::failure(GENERIC_TIMEOUT_STATUS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_drive_prefix_removes_two_bytes() {
        assert_eq!(strip_drive_prefix(b"C:\\FOO.TXT"), b"\\FOO.TXT");
    }

    #[test]
    fn strip_drive_prefix_is_noop_without_colon() {
        assert_eq!(strip_drive_prefix(b"\\FOO.TXT"), b"\\FOO.TXT");
    }

    #[test]
    fn fcb_normalize_pads_and_splits_on_dot() {
        assert_eq!(&fcb_normalize(b"FOO.TXT"), b"FOO     TXT");
        assert_eq!(&fcb_normalize(b"A"), b"A          ");
    }

    #[test]
    fn filename_component_strips_directory_prefix() {
        assert_eq!(filename_component(b"\\SUBDIR\\*.TXT"), b"*.TXT");
        assert_eq!(filename_component(b"*.*"), b"*.*");
    }

    #[test]
    fn drive_from_filename_reads_first_letter() {
        assert_eq!(drive_from_filename(b"C:\\X"), Some(2));
    }
}
