//! Local-drive-letter to remote-drive-index mapping.

use crate::error::{EngineError, Result};

/// Maps local drive letters (A=0..Z=25) to a remote drive index on the
/// peer. Immutable after [`DriveMap::install`] is called.
#[derive(Debug, Clone, Default)]
pub struct DriveMap {
    slots: [Option<u8>; 26],
    installed: bool,
}

impl DriveMap {
    pub fn new() -> Self {
        DriveMap::default()
    }

    /// Records a local-to-remote mapping. Fails if the local slot is already
    /// mapped, or if the map has already been installed.
    pub fn map_local(&mut self, local: u8, remote: u8) -> Result<()> {
        if self.installed {
            return Err(EngineError::AlreadyInstalled);
        }
        let local_idx = local as usize;
        if self.slots[local_idx].is_some() {
            return Err(EngineError::DriveAlreadyMapped(local));
        }
        self.slots[local_idx] = Some(remote);
        Ok(())
    }

    /// Resolves a local drive index to its remote counterpart, if mapped.
    pub fn resolve(&self, local: u8) -> Option<u8> {
        self.slots[local as usize]
    }

    /// Yields the local drive indices that are currently mapped, in order.
    pub fn enumerate(&self) -> impl Iterator<Item = u8> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|_| i as u8))
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Freezes the map; no further [`DriveMap::map_local`] calls will be
    /// accepted, matching the "immutable after install" invariant.
    pub fn install(&mut self) {
        self.installed = true;
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_and_resolves() {
        let mut map = DriveMap::new();
        map.map_local(2, 0).unwrap(); // C: -> A: on the peer
        assert_eq!(map.resolve(2), Some(0));
        assert_eq!(map.resolve(3), None);
    }

    #[test]
    fn rejects_double_mapping_of_same_local_slot() {
        let mut map = DriveMap::new();
        map.map_local(2, 0).unwrap();
        assert!(map.map_local(2, 1).is_err());
    }

    #[test]
    fn rejects_map_local_after_install() {
        let mut map = DriveMap::new();
        map.map_local(2, 0).unwrap();
        map.install();
        assert!(map.map_local(3, 1).is_err());
    }

    #[test]
    fn enumerate_yields_mapped_locals_in_order() {
        let mut map = DriveMap::new();
        map.map_local(5, 0).unwrap();
        map.map_local(2, 1).unwrap();
        assert_eq!(map.enumerate().collect::<Vec<_>>(), vec![2, 5]);
    }
}
