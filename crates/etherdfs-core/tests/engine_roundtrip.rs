//! End-to-end scenarios over a loopback link pair: a minimal responder
//! thread plays the peer role, the real [`Engine`]/dispatcher play the
//! client role, and only the two ends of the wire are test doubles.

use std::thread;
use std::time::{Duration, Instant};

use etherdfs_core::{CurrentDir, DriveMap, Engine, EngineCall, FileHandle, SearchState};
use etherdfs_proto::ops::{DiskspaceReply, FindReply, OpenRequest, ReadfilRequest, SftReply};
use etherdfs_proto::{ETHERTYPE, MacAddr, OpCode};
use etherdfs_transport::{LinkLayer, LoopbackLink};

const CLIENT_MAC: [u8; 6] = [2, 0, 0, 0, 0, 1];
const PEER_MAC: [u8; 6] = [2, 0, 0, 0, 0, 2];

fn install_single_drive(
    link: Box<dyn LinkLayer>,
    peer_mac: Option<MacAddr>,
    current_dirs: &mut [CurrentDir; 26],
) -> etherdfs_core::Result<Engine> {
    let mut drives = DriveMap::new();
    drives.map_local(2, 0).unwrap(); // C: -> peer's drive 0
    Engine::install(link, drives, peer_mac, 1, true, current_dirs)
}

/// Takes the next request frame and immediately resets the slot — mirroring
/// how a real responder must free its receive slot for the next claim,
/// since nothing else on the responder side does that for it.
fn recv_request(link: &impl LinkLayer) -> Vec<u8> {
    loop {
        if let Some(frame) = link.try_recv() {
            link.reset_recv();
            return frame;
        }
        thread::yield_now();
    }
}

fn send_reply(link: &impl LinkLayer, req: &[u8], status: u16, payload: &[u8]) {
    send_reply_from(link, req, PEER_MAC, status, payload);
}

/// Like [`send_reply`], but with an explicit reply source MAC — needed for
/// the auto-discovery scenario, where the request's destination field is
/// the broadcast address rather than the responder's own address.
fn send_reply_from(link: &impl LinkLayer, req: &[u8], src_mac: [u8; 6], status: u16, payload: &[u8]) {
    let mut reply = vec![0u8; 60];
    reply[0..6].copy_from_slice(&req[6..12]); // reply's dest: original sender
    reply[6..12].copy_from_slice(&src_mac);
    reply[12..14].copy_from_slice(&ETHERTYPE.to_le_bytes());
    reply[56] = req[56]; // echo flags verbatim, including the checksum bit
    reply[57] = req[57];
    let total_len = (60 + payload.len()) as u16;
    reply[52..54].copy_from_slice(&total_len.to_le_bytes());
    reply[58..60].copy_from_slice(&status.to_le_bytes());
    reply.extend_from_slice(payload);
    if (req[56] & 0x80) != 0 {
        let sum = etherdfs_proto::bsd_checksum(&reply[56..]);
        reply[54..56].copy_from_slice(&sum.to_le_bytes());
    }
    link.send(&reply).unwrap();
}

#[test]
fn diskspace_round_trip_with_checksum_enabled() {
    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    let responder = thread::spawn(move || {
        let req = recv_request(&peer); // the install-time auto bootstrap is skipped: fixed peer
        let reply = DiskspaceReply {
            total_clusters: 640,
            bytes_per_sector: 512,
            free_clusters: 80,
        };
        let mut buf = binrw::io::Cursor::new(Vec::new());
        use binrw::BinWrite;
        reply.write(&mut buf).unwrap();
        send_reply(&peer, &req, 4, &buf.into_inner());
    });

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine =
        install_single_drive(Box::new(client), Some(MacAddr::new(PEER_MAC)), &mut current_dirs).unwrap();

    let outcome = engine.dispatch(EngineCall::Diskspace { local_drive: 2 });
    responder.join().unwrap();

    assert!(!outcome.carry);
    assert_eq!(outcome.ax, 4);
    assert_eq!(outcome.bx, 640);
    assert_eq!(outcome.cx, 512);
    assert_eq!(outcome.dx, 80);
}

#[test]
fn open_existing_file_populates_handle() {
    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    let responder = thread::spawn(move || {
        let req = recv_request(&peer);
        let opened = OpenRequest::decode(&req[60..]).unwrap();
        assert_eq!(opened.path, b"\\DATA.TXT");

        let mut name = [b' '; 11];
        name[..8].copy_from_slice(b"DATA    ");
        name[8..].copy_from_slice(b"TXT");
        let reply = SftReply {
            attr: 0,
            name,
            file_time: 0,
            size: 4096,
            file_id: 0x2A,
            mode_echo: 0,
            open_mode_low: 0x02, // read/write granted
        };
        let mut buf = binrw::io::Cursor::new(Vec::new());
        use binrw::BinWrite;
        reply.write(&mut buf).unwrap();
        send_reply(&peer, &req, 0, &buf.into_inner());
    });

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine =
        install_single_drive(Box::new(client), Some(MacAddr::new(PEER_MAC)), &mut current_dirs).unwrap();

    let mut handle = FileHandle::default();
    let outcome = engine.dispatch(EngineCall::Open {
        local_drive: 2,
        stack_word: 0x0002,
        path: b"\\DATA.TXT",
        path_has_wildcards: false,
        handle_out: &mut handle,
    });
    responder.join().unwrap();

    assert!(!outcome.carry);
    assert_eq!(handle.file_id, 0x2A);
    assert_eq!(handle.size, 4096);
    assert_eq!(handle.drive(), 2);
    assert!(!handle.is_read_only());
    assert!(!handle.is_write_only());
}

#[test]
fn readfil_chunks_across_multiple_frames() {
    const TOTAL: usize = 3000;
    let data: Vec<u8> = (0..TOTAL).map(|i| (i % 251) as u8).collect();

    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    let responder_data = data.clone();
    let responder = thread::spawn(move || {
        let mut exchanges = 0;
        loop {
            let req = recv_request(&peer);
            let op = req[59];
            if op != OpCode::Readfil.as_byte() {
                continue;
            }
            let read = ReadfilRequest::decode(&req[60..]).unwrap();
            exchanges += 1;
            let start = read.offset as usize;
            let end = (start + read.chunk_len as usize).min(responder_data.len());
            send_reply(&peer, &req, 0, &responder_data[start..end]);
            if end >= responder_data.len() {
                break;
            }
        }
        exchanges
    });

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine =
        install_single_drive(Box::new(client), Some(MacAddr::new(PEER_MAC)), &mut current_dirs).unwrap();

    let mut handle = FileHandle::default();
    handle.device_info = 0x8040 | 2;
    handle.file_id = 7;
    handle.open_mode = 0x02; // read/write granted, not write-only

    let (outcome, got) = engine.dispatch_with_data(EngineCall::Readfil {
        handle: &mut handle,
        requested_len: TOTAL as u16,
    });
    let exchanges = responder.join().unwrap();

    assert!(!outcome.carry);
    assert_eq!(got, data);
    assert_eq!(handle.position, TOTAL as u32);
    assert!(exchanges > 1, "expected more than one frame exchange for {TOTAL} bytes");
}

#[test]
fn readfil_rejects_write_only_handle_without_contacting_peer() {
    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    drop(peer); // no responder: a wire exchange here would hang the test

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine =
        install_single_drive(Box::new(client), Some(MacAddr::new(PEER_MAC)), &mut current_dirs).unwrap();

    let mut handle = FileHandle::default();
    handle.device_info = 0x8040 | 2;
    handle.open_mode = 0x01; // write-only

    let (outcome, got) = engine.dispatch_with_data(EngineCall::Readfil {
        handle: &mut handle,
        requested_len: 10,
    });

    assert!(outcome.carry);
    assert_eq!(outcome.ax, 5); // access denied
    assert!(got.is_empty());
}

#[test]
fn findfirst_then_findnext_carries_continuation_state() {
    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    let responder = thread::spawn(move || {
        let first = recv_request(&peer);
        assert_eq!(first[59], OpCode::Findfirst.as_byte());
        let mut name = [b' '; 11];
        name[..4].copy_from_slice(b"ONE.");
        let reply = FindReply {
            attr: 0,
            name,
            time: 0,
            date: 0,
            size: 10,
            parent_cluster: 11,
            dir_entry: 0,
        };
        let mut buf = binrw::io::Cursor::new(Vec::new());
        use binrw::BinWrite;
        reply.write(&mut buf).unwrap();
        send_reply(&peer, &first, 0, &buf.into_inner());

        let second = recv_request(&peer);
        assert_eq!(second[59], OpCode::Findnext.as_byte());
        let req = etherdfs_proto::ops::FindnextRequest::decode(&second[60..]).unwrap();
        assert_eq!(req.parent_cluster, 11);
        send_reply(&peer, &second, 18, &[]); // no more entries
    });

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine =
        install_single_drive(Box::new(client), Some(MacAddr::new(PEER_MAC)), &mut current_dirs).unwrap();

    let mut search = SearchState::default();
    let first = engine.dispatch(EngineCall::Findfirst {
        local_drive: 2,
        attr: 0x00,
        path: b"\\*.*",
        state_out: &mut search,
    });
    assert!(!first.carry);
    assert_eq!(search.parent_cluster, 11);

    let second = engine.dispatch(EngineCall::Findnext { state: &mut search });
    responder.join().unwrap();

    assert!(second.carry);
    assert!(search.exhausted);
}

#[test]
fn no_responder_times_out_with_generic_status() {
    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    drop(peer);

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine =
        install_single_drive(Box::new(client), Some(MacAddr::new(PEER_MAC)), &mut current_dirs).unwrap();

    let start = Instant::now();
    let outcome = engine.dispatch(EngineCall::Getattr {
        local_drive: 2,
        path: b"\\MISSING.TXT",
    });
    assert!(outcome.carry);
    assert_eq!(outcome.ax, 2);
    assert!(start.elapsed() >= Duration::from_millis(100) * 5);
}

#[test]
fn install_auto_discovers_peer_from_broadcast_probe() {
    let (client, peer) = LoopbackLink::pair(MacAddr::new(CLIENT_MAC), MacAddr::new(PEER_MAC));
    let responder = thread::spawn(move || {
        let req = recv_request(&peer);
        assert_eq!(&req[0..6], &MacAddr::BROADCAST.0);
        let reply = DiskspaceReply {
            total_clusters: 1,
            bytes_per_sector: 1,
            free_clusters: 1,
        };
        let mut buf = binrw::io::Cursor::new(Vec::new());
        use binrw::BinWrite;
        reply.write(&mut buf).unwrap();
        send_reply_from(&peer, &req, PEER_MAC, 0, &buf.into_inner());
    });

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let engine = install_single_drive(Box::new(client), None, &mut current_dirs).unwrap();
    responder.join().unwrap();

    assert_eq!(engine.peer_mac(), MacAddr::new(PEER_MAC));
    assert!(current_dirs[2].network);
}
