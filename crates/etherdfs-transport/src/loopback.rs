//! An in-process link pair used by tests and the CLI's demo `serve` command.

use std::sync::Arc;

use etherdfs_proto::MacAddr;

use crate::error::TransportError;
use crate::recv_slot::ReceiveSlot;
use crate::traits::LinkLayer;

/// One end of a loopback pair. `send` pushes straight into the peer's
/// [`ReceiveSlot`], exercising the real claim/commit protocol without a
/// background thread.
pub struct LoopbackLink {
    local_mac: MacAddr,
    own_slot: Arc<ReceiveSlot>,
    peer_slot: Arc<ReceiveSlot>,
}

impl LoopbackLink {
    /// Builds two ends wired to each other's receive slot.
    pub fn pair(mac_a: MacAddr, mac_b: MacAddr) -> (LoopbackLink, LoopbackLink) {
        let slot_a = Arc::new(ReceiveSlot::new());
        let slot_b = Arc::new(ReceiveSlot::new());
        (
            LoopbackLink {
                local_mac: mac_a,
                own_slot: slot_a.clone(),
                peer_slot: slot_b.clone(),
            },
            LoopbackLink {
                local_mac: mac_b,
                own_slot: slot_b,
                peer_slot: slot_a,
            },
        )
    }
}

impl LinkLayer for LoopbackLink {
    fn local_mac(&self) -> MacAddr {
        self.local_mac
    }

    fn send(&self, frame: &[u8]) -> Result<(), TransportError> {
        if !self.peer_slot.producer_claim(frame.len()) {
            log::debug!("loopback peer busy, dropping frame");
            return Err(TransportError::BufferBusy);
        }
        self.peer_slot.producer_commit(frame);
        Ok(())
    }

    fn try_recv(&self) -> Option<Vec<u8>> {
        self.own_slot.consumer_try_take()
    }

    fn reset_recv(&self) {
        self.own_slot.consumer_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sent_on_one_end_arrives_on_the_other() {
        let (a, b) = LoopbackLink::pair(
            MacAddr::new([1, 0, 0, 0, 0, 1]),
            MacAddr::new([1, 0, 0, 0, 0, 2]),
        );
        a.send(&[1, 2, 3]).unwrap();
        assert_eq!(b.try_recv(), Some(vec![1, 2, 3]));
        assert_eq!(a.try_recv(), None);
    }

    #[test]
    fn reset_allows_next_send() {
        let (a, b) = LoopbackLink::pair(
            MacAddr::new([1, 0, 0, 0, 0, 1]),
            MacAddr::new([1, 0, 0, 0, 0, 2]),
        );
        a.send(&[1]).unwrap();
        b.try_recv();
        b.reset_recv();
        a.send(&[2]).unwrap();
        assert_eq!(b.try_recv(), Some(vec![2]));
    }
}
