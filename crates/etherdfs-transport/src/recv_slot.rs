//! The single-slot sentinel buffer shared between a link-layer receiver and
//! the foreground dispatcher.
//!
//! States cycle `0 -> -N -> +N -> 0`: `0` means empty and claimable, a
//! negative value reserves `N` bytes while a copy is in progress, and a
//! positive value means `N` bytes are ready for the consumer. The producer
//! (an interrupt, a signal handler, or — here — a dedicated receive thread)
//! is the only writer of negative and positive values; the consumer is the
//! only writer of zero and the only reader of positive values.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicI32, Ordering};

pub const MAX_FRAME: usize = 1514;

/// `sentinel` is the single word gating access to `buffer`: the producer is
/// the only writer while it's negative, the consumer the only reader while
/// it's positive, and a side flipping it to 0 gives up its claim on the
/// buffer in the same instant. No lock sits on the data path — the acquire/
/// release pair around each side's exclusive window is the entire
/// synchronization, per the single-word-read model a real interrupt
/// handler's callback would need to follow.
pub struct ReceiveSlot {
    sentinel: AtomicI32,
    buffer: UnsafeCell<[u8; MAX_FRAME]>,
}

// SAFETY: `buffer` is touched only while the calling side exclusively holds
// the sentinel (negative for the producer, positive for the consumer), and
// every handoff between sides crosses an Acquire/Release pair on `sentinel`.
unsafe impl Sync for ReceiveSlot {}

impl Default for ReceiveSlot {
    fn default() -> Self {
        ReceiveSlot {
            sentinel: AtomicI32::new(0),
            buffer: UnsafeCell::new([0u8; MAX_FRAME]),
        }
    }
}

impl ReceiveSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer side, first phase: claim the slot for `len` bytes.
    /// Refuses unless the sentinel currently reads 0. Returns whether the
    /// claim succeeded.
    pub fn producer_claim(&self, len: usize) -> bool {
        if len > MAX_FRAME {
            return false;
        }
        self.sentinel
            .compare_exchange(0, -(len as i32), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Producer side, second phase: copy `data` into the buffer and flip the
    /// sentinel to `+len`, publishing the frame to the consumer.
    pub fn producer_commit(&self, data: &[u8]) {
        // SAFETY: a successful `producer_claim` is this side's sole
        // authorization to write, and no consumer reads the buffer while
        // the sentinel it just set is negative.
        unsafe { (*self.buffer.get())[..data.len()].copy_from_slice(data) };
        self.sentinel
            .store(data.len() as i32, Ordering::Release);
    }

    /// Consumer side: reset the sentinel to 0, making the slot claimable
    /// again. Used both before a transaction and to drop an invalid reply.
    pub fn consumer_reset(&self) {
        self.sentinel.store(0, Ordering::Release);
    }

    /// Consumer side: non-blocking read of a delivered frame, if the
    /// sentinel is currently positive.
    pub fn consumer_try_take(&self) -> Option<Vec<u8>> {
        let len = self.sentinel.load(Ordering::Acquire);
        if len <= 0 {
            return None;
        }
        // SAFETY: the Acquire load above synchronizes-with the Release
        // store in `producer_commit` that published this length, so the
        // bytes it wrote are visible here.
        let buf = unsafe { &*self.buffer.get() };
        Some(buf[..len as usize].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let slot = ReceiveSlot::new();
        assert_eq!(slot.consumer_try_take(), None);
    }

    #[test]
    fn claim_then_commit_cycle() {
        let slot = ReceiveSlot::new();
        assert!(slot.producer_claim(4));
        assert_eq!(slot.consumer_try_take(), None); // reserved, not yet delivered
        slot.producer_commit(&[1, 2, 3, 4]);
        assert_eq!(slot.consumer_try_take(), Some(vec![1, 2, 3, 4]));
    }

    #[test]
    fn refuses_claim_unless_zero() {
        let slot = ReceiveSlot::new();
        assert!(slot.producer_claim(4));
        // still reserved (negative), a second claim must fail
        assert!(!slot.producer_claim(2));
    }

    #[test]
    fn consumer_reset_allows_new_claim() {
        let slot = ReceiveSlot::new();
        slot.producer_claim(4);
        slot.producer_commit(&[9, 9, 9, 9]);
        slot.consumer_reset();
        assert!(slot.producer_claim(2));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let slot = ReceiveSlot::new();
        assert!(!slot.producer_claim(MAX_FRAME + 1));
    }
}
