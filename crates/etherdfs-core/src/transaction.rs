//! The reliable single-exchange transaction engine: sequence numbering,
//! timeout-and-retry, peer-address learning, optional checksumming.

use std::time::{Duration, Instant};

use etherdfs_proto::frame::{FRAME_HEADER_LEN, FramePrefix};
use etherdfs_proto::{ETHERTYPE, MacAddr, bsd_checksum};
use etherdfs_transport::LinkLayer;

use crate::error::{EngineError, Result};

/// Attempts per transaction, per spec: five tries before giving up.
pub const MAX_ATTEMPTS: u32 = 5;

/// Per-attempt timeout. The original measured "2 ticks" against the BIOS
/// real-time-clock byte (~55ms/tick); a modern reimplementation uses a
/// monotonic clock directly and makes the ~100ms window explicit.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_millis(100);

/// A successfully validated reply: its status word and the payload bytes
/// following the 60-byte header.
pub struct ReplyFrame {
    pub status: u16,
    pub payload: Vec<u8>,
}

/// Drives sequence numbering, retries and peer-MAC learning over a
/// [`LinkLayer`]. One instance is owned by the engine and is never shared
/// across concurrent callers — see the reentrancy note in the crate root.
pub struct TransactionEngine {
    link: Box<dyn LinkLayer>,
    local_mac: MacAddr,
    peer_mac: MacAddr,
    protocol_version: u8,
    checksum_enabled: bool,
    seq: u8,
}

impl TransactionEngine {
    pub fn new(
        link: Box<dyn LinkLayer>,
        peer_mac: MacAddr,
        protocol_version: u8,
        checksum_enabled: bool,
    ) -> Self {
        let local_mac = link.local_mac();
        TransactionEngine {
            link,
            local_mac,
            peer_mac,
            protocol_version,
            checksum_enabled,
            seq: 0,
        }
    }

    pub fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    pub fn peer_mac(&self) -> MacAddr {
        self.peer_mac
    }

    /// Sends `payload` as the body of `op` against `drive` and waits for a
    /// validated reply, retrying up to [`MAX_ATTEMPTS`] times. `learn_peer`
    /// accepts any source MAC for this exchange and adopts it as the peer
    /// address on success — used for the one-shot auto-discovery probe.
    pub fn transact(
        &mut self,
        op: u8,
        drive: u8,
        payload: &[u8],
        learn_peer: bool,
    ) -> Result<ReplyFrame> {
        self.seq = self.seq.wrapping_add(1);
        let seq = self.seq;

        let dest_mac = if learn_peer {
            MacAddr::BROADCAST
        } else {
            self.peer_mac
        };

        let mut prefix = FramePrefix::new(
            dest_mac,
            self.local_mac,
            self.protocol_version,
            self.checksum_enabled,
        );
        prefix.seq = seq;
        prefix.total_len = (FRAME_HEADER_LEN + payload.len()) as u16;

        let mut frame = Vec::with_capacity(prefix.total_len as usize);
        frame.extend_from_slice(&encode_prefix(&prefix));
        frame.push(drive);
        frame.push(op);
        frame.extend_from_slice(payload);

        if self.checksum_enabled {
            let sum = bsd_checksum(&frame[56..]);
            frame[54..56].copy_from_slice(&sum.to_le_bytes());
        }

        self.link.reset_recv();

        for attempt in 0..MAX_ATTEMPTS {
            if let Err(e) = self.link.send(&frame) {
                log::debug!("transmit attempt {attempt} failed: {e}");
            }

            let t0 = Instant::now();
            loop {
                if let Some(candidate) = self.link.try_recv() {
                    match self.validate(&candidate, seq, learn_peer) {
                        Some(reply) => return Ok(reply),
                        None => {
                            self.link.reset_recv();
                            if t0.elapsed() >= ATTEMPT_TIMEOUT {
                                break;
                            }
                            continue;
                        }
                    }
                }
                if t0.elapsed() >= ATTEMPT_TIMEOUT {
                    break;
                }
            }
            log::debug!("transaction seq={seq} attempt {attempt} timed out");
        }

        Err(EngineError::DiscoveryTimedOut)
    }

    /// Runs the validation predicate chain from the spec, in order, and
    /// learns the peer MAC on first success if `learn_peer` was requested.
    fn validate(&mut self, frame: &[u8], expected_seq: u8, learn_peer: bool) -> Option<ReplyFrame> {
        if frame.len() < FRAME_HEADER_LEN {
            return None;
        }
        let dest_mac = MacAddr::new(frame[0..6].try_into().unwrap());
        let src_mac = MacAddr::new(frame[6..12].try_into().unwrap());
        let ethertype = u16::from_le_bytes([frame[12], frame[13]]);
        let total_len = u16::from_le_bytes([frame[52], frame[53]]);
        let checksum = u16::from_le_bytes([frame[54], frame[55]]);
        let seq = frame[57];
        let status = u16::from_le_bytes([frame[58], frame[59]]);

        if dest_mac != self.local_mac {
            return None;
        }
        if src_mac != self.peer_mac {
            if !learn_peer {
                return None;
            }
        }
        if ethertype != ETHERTYPE {
            return None;
        }
        if seq != expected_seq {
            return None;
        }
        if total_len < FRAME_HEADER_LEN as u16 || (total_len as usize) > frame.len() {
            return None;
        }
        if self.checksum_enabled {
            let computed = bsd_checksum(&frame[56..total_len as usize]);
            if computed != checksum {
                return None;
            }
        }

        if learn_peer {
            self.peer_mac = src_mac;
        }

        Some(ReplyFrame {
            status,
            payload: frame[FRAME_HEADER_LEN..total_len as usize].to_vec(),
        })
    }
}

fn encode_prefix(prefix: &FramePrefix) -> Vec<u8> {
    use binrw::BinWrite;
    let mut buf = binrw::io::Cursor::new(Vec::new());
    prefix.write(&mut buf).expect("frame prefix encoding cannot fail");
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use etherdfs_transport::LoopbackLink;

    fn build_pair() -> (TransactionEngine, LoopbackLink) {
        let (a, b) = LoopbackLink::pair(
            MacAddr::new([2, 0, 0, 0, 0, 1]),
            MacAddr::new([2, 0, 0, 0, 0, 2]),
        );
        let engine = TransactionEngine::new(Box::new(a), MacAddr::new([2, 0, 0, 0, 0, 2]), 1, false);
        (engine, b)
    }

    #[test]
    fn successful_round_trip_returns_payload() {
        let (mut engine, peer) = build_pair();
        let handle = std::thread::spawn(move || {
            let req = loop {
                if let Some(f) = peer.try_recv() {
                    break f;
                }
                std::thread::yield_now();
            };
            let seq = req[57];
            let mut reply = vec![0u8; 60 + 2];
            reply[0..6].copy_from_slice(&[2, 0, 0, 0, 0, 1]);
            reply[6..12].copy_from_slice(&[2, 0, 0, 0, 0, 2]);
            reply[12..14].copy_from_slice(&ETHERTYPE.to_le_bytes());
            reply[52..54].copy_from_slice(&62u16.to_le_bytes());
            reply[56] = 1;
            reply[57] = seq;
            reply[58..60].copy_from_slice(&0u16.to_le_bytes());
            reply[60..62].copy_from_slice(&[0xAA, 0xBB]);
            peer.send(&reply).unwrap();
        });
        let reply = engine.transact(0x0C, 3, &[], false).unwrap();
        handle.join().unwrap();
        assert_eq!(reply.status, 0);
        assert_eq!(reply.payload, vec![0xAA, 0xBB]);
    }

    #[test]
    fn sequence_increments_each_transaction() {
        let (mut engine, _peer) = build_pair();
        let first = engine.seq.wrapping_add(1);
        let _ = engine.transact(0x0C, 0, &[], false); // will time out, no responder
        assert_eq!(engine.seq, first);
    }

    #[test]
    fn times_out_with_no_responder() {
        let (mut engine, _peer) = build_pair();
        let start = Instant::now();
        let result = engine.transact(0x1B, 0, &[], false);
        assert!(result.is_err());
        assert!(start.elapsed() >= ATTEMPT_TIMEOUT * MAX_ATTEMPTS);
    }

    #[test]
    fn checksum_verification_follows_our_own_config_not_the_reply_flags_byte() {
        let (a, b) = LoopbackLink::pair(
            MacAddr::new([2, 0, 0, 0, 0, 1]),
            MacAddr::new([2, 0, 0, 0, 0, 2]),
        );
        // Checksum enabled on our side; a well-behaved peer would have to
        // match it too, but this reply clears the flags bit and carries a
        // bogus checksum word, as if trying to dodge verification.
        let mut engine = TransactionEngine::new(Box::new(a), MacAddr::new([2, 0, 0, 0, 0, 2]), 1, true);
        let handle = std::thread::spawn(move || {
            let req = loop {
                if let Some(f) = b.try_recv() {
                    break f;
                }
                std::thread::yield_now();
            };
            let seq = req[57];
            let mut reply = vec![0u8; 60];
            reply[0..6].copy_from_slice(&[2, 0, 0, 0, 0, 1]);
            reply[6..12].copy_from_slice(&[2, 0, 0, 0, 0, 2]);
            reply[12..14].copy_from_slice(&ETHERTYPE.to_le_bytes());
            reply[52..54].copy_from_slice(&60u16.to_le_bytes());
            reply[54..56].copy_from_slice(&0xDEADu16.to_le_bytes()); // wrong on purpose
            reply[56] = 1; // checksum bit clear, unlike our own config
            reply[57] = seq;
            let _ = b.send(&reply);
        });
        let start = Instant::now();
        let result = engine.transact(0x0C, 0, &[], false);
        handle.join().unwrap();
        assert!(result.is_err(), "a reply with a bad checksum must never validate");
        assert!(start.elapsed() >= ATTEMPT_TIMEOUT * MAX_ATTEMPTS);
    }

    #[test]
    fn learns_peer_mac_from_broadcast_probe() {
        let (a, b) = LoopbackLink::pair(
            MacAddr::new([2, 0, 0, 0, 0, 1]),
            MacAddr::new([2, 0, 0, 0, 0, 2]),
        );
        let mut engine = TransactionEngine::new(Box::new(a), MacAddr::BROADCAST, 1, false);
        let handle = std::thread::spawn(move || {
            let req = loop {
                if let Some(f) = b.try_recv() {
                    break f;
                }
                std::thread::yield_now();
            };
            let seq = req[57];
            let mut reply = vec![0u8; 60];
            reply[0..6].copy_from_slice(&[2, 0, 0, 0, 0, 1]);
            reply[6..12].copy_from_slice(&[2, 0, 0, 0, 0, 2]);
            reply[12..14].copy_from_slice(&ETHERTYPE.to_le_bytes());
            reply[52..54].copy_from_slice(&60u16.to_le_bytes());
            reply[57] = seq;
            b.send(&reply).unwrap();
        });
        let reply = engine.transact(0x0C, 0, &[], true).unwrap();
        handle.join().unwrap();
        assert_eq!(reply.status, 0);
        assert_eq!(engine.peer_mac(), MacAddr::new([2, 0, 0, 0, 0, 2]));
    }
}
