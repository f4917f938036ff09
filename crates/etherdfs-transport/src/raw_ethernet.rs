//! Linux `AF_PACKET` raw-Ethernet transport.
//!
//! Stands in for the original packet-driver interrupt scan: instead of
//! probing INT 60h-80h for a loaded driver, this binds a raw socket to a
//! named interface and spawns a single background thread whose only job is
//! to push arrived frames into the shared [`ReceiveSlot`], mirroring the
//! "drop when busy" semantics of the original receive upcall.

use std::io;
use std::mem::MaybeUninit;
use std::os::fd::AsRawFd;
use std::sync::Arc;
use std::thread;

use etherdfs_proto::MacAddr;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::error::TransportError;
use crate::recv_slot::{MAX_FRAME, ReceiveSlot};
use crate::traits::LinkLayer;

const ETH_P_ALL: i32 = 0x0003;

pub struct RawEthernetLink {
    socket: Arc<Socket>,
    local_mac: MacAddr,
    recv_slot: Arc<ReceiveSlot>,
}

impl RawEthernetLink {
    /// Opens a raw `AF_PACKET` socket bound to `interface` and starts the
    /// background receive thread.
    pub fn open(interface: &str) -> Result<Self, TransportError> {
        let socket = Socket::new(
            Domain::PACKET,
            Type::RAW,
            Some(Protocol::from((ETH_P_ALL as u16).to_be() as i32)),
        )
        .map_err(TransportError::Open)?;

        let if_index = interface_index(interface)?;
        let local_mac = interface_mac(&socket, interface, if_index)?;

        let addr = link_sockaddr(if_index);
        socket.bind(&addr).map_err(TransportError::Open)?;

        let socket = Arc::new(socket);
        let recv_slot = Arc::new(ReceiveSlot::new());

        spawn_receiver(socket.clone(), recv_slot.clone());

        Ok(RawEthernetLink {
            socket,
            local_mac,
            recv_slot,
        })
    }
}

impl LinkLayer for RawEthernetLink {
    fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        self.socket
            .send(frame)
            .map(|_| ())
            .map_err(TransportError::Send)
    }

    fn try_recv(&self) -> Option<Vec<u8>> {
        self.recv_slot.consumer_try_take()
    }

    fn reset_recv(&self) {
        self.recv_slot.consumer_reset();
    }
}

/// The dedicated receive thread: blocking reads off the socket, each copied
/// into the slot via the same claim/commit two-phase protocol the original
/// upcall used, with frames dropped (not queued) while the slot is busy.
fn spawn_receiver(socket: Arc<Socket>, recv_slot: Arc<ReceiveSlot>) {
    thread::spawn(move || {
        let mut buf = [MaybeUninit::new(0u8); MAX_FRAME];
        loop {
            let n = match socket.recv(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    log::warn!("raw ethernet receive failed: {e}");
                    continue;
                }
            };
            let bytes: Vec<u8> = buf[..n].iter().map(|b| unsafe { b.assume_init() }).collect();
            if !recv_slot.producer_claim(n) {
                log::trace!("receive slot busy, dropping {n}-byte frame");
                continue;
            }
            recv_slot.producer_commit(&bytes);
        }
    });
}

fn interface_index(interface: &str) -> Result<i32, TransportError> {
    let c_name = std::ffi::CString::new(interface)
        .map_err(|_| TransportError::NoSuchInterface(interface.to_string()))?;
    let idx = unsafe { libc::if_nametoindex(c_name.as_ptr()) };
    if idx == 0 {
        return Err(TransportError::NoSuchInterface(interface.to_string()));
    }
    Ok(idx as i32)
}

fn link_sockaddr(if_index: i32) -> SockAddr {
    let mut storage: libc::sockaddr_ll = unsafe { std::mem::zeroed() };
    storage.sll_family = libc::AF_PACKET as u16;
    storage.sll_protocol = (ETH_P_ALL as u16).to_be();
    storage.sll_ifindex = if_index;
    unsafe {
        SockAddr::new(
            std::mem::transmute_copy(&storage),
            std::mem::size_of::<libc::sockaddr_ll>() as u32,
        )
    }
}

fn interface_mac(socket: &Socket, interface: &str, _if_index: i32) -> Result<MacAddr, TransportError> {
    let c_name = std::ffi::CString::new(interface)
        .map_err(|_| TransportError::NoSuchInterface(interface.to_string()))?;
    let mut req: libc::ifreq = unsafe { std::mem::zeroed() };
    for (dst, src) in req.ifr_name.iter_mut().zip(c_name.as_bytes_with_nul()) {
        *dst = *src as libc::c_char;
    }
    let ret = unsafe { libc::ioctl(socket.as_raw_fd(), libc::SIOCGIFHWADDR, &mut req) };
    if ret < 0 {
        return Err(TransportError::Open(io::Error::last_os_error()));
    }
    let sa_data = unsafe { req.ifr_ifru.ifru_hwaddr.sa_data };
    let mut mac = [0u8; 6];
    for (dst, src) in mac.iter_mut().zip(sa_data.iter()) {
        *dst = *src as u8;
    }
    Ok(MacAddr::new(mac))
}
