//! The redirector engine: owns the drive map and transaction engine, drives
//! bootstrap/teardown, and exposes the single dispatch entry point.

use etherdfs_proto::ops::LockRegion;
use etherdfs_proto::MacAddr;
use etherdfs_transport::LinkLayer;

use crate::dispatch::{self, DispatchOutcome};
use crate::drive_map::DriveMap;
use crate::error::{EngineError, Result};
use crate::shim::{CurrentDir, FileHandle, SearchState};
use crate::transaction::TransactionEngine;

/// One call into the dispatcher, shaped per operation the way §4.E's table
/// describes. `local_drive` fields are expected to already be resolved by
/// the caller using [`dispatch::drive_from_filename`] or
/// [`dispatch::drive_from_cds_path`], matching the drive-resolution rule for
/// that operation's category.
pub enum EngineCall<'a> {
    InstallCheck,
    Rmdir {
        local_drive: u8,
        path: &'a [u8],
        is_current_dir: bool,
    },
    Mkdir {
        local_drive: u8,
        path: &'a [u8],
    },
    Chdir {
        local_drive: u8,
        path: &'a [u8],
    },
    Clsfil {
        handle: &'a mut FileHandle,
    },
    Cmmtfil,
    Readfil {
        handle: &'a mut FileHandle,
        requested_len: u16,
    },
    Writefil {
        handle: &'a mut FileHandle,
        data: &'a [u8],
    },
    Lockfil {
        local_drive: u8,
        file_id: u16,
        regions: Vec<LockRegion>,
        unlock: bool,
    },
    Unlockfil,
    Diskspace {
        local_drive: u8,
    },
    Setattr {
        local_drive: u8,
        attr: u16,
        path: &'a [u8],
    },
    Getattr {
        local_drive: u8,
        path: &'a [u8],
    },
    Rename {
        old_drive: u8,
        new_drive: u8,
        old_path: &'a [u8],
        new_path: &'a [u8],
        new_path_has_wildcards: bool,
    },
    Delete {
        local_drive: u8,
        path: &'a [u8],
    },
    Open {
        local_drive: u8,
        stack_word: u16,
        path: &'a [u8],
        path_has_wildcards: bool,
        handle_out: &'a mut FileHandle,
    },
    Create {
        local_drive: u8,
        stack_word: u16,
        path: &'a [u8],
        path_has_wildcards: bool,
        handle_out: &'a mut FileHandle,
    },
    Findfirst {
        local_drive: u8,
        attr: u8,
        path: &'a [u8],
        state_out: &'a mut SearchState,
    },
    Findnext {
        state: &'a mut SearchState,
    },
    Skfmend {
        handle: &'a mut FileHandle,
        offset_lo: u16,
        offset_hi: u16,
    },
    Unknown2d,
    Spopnfil {
        local_drive: u8,
        stack_word: u16,
        action: u16,
        mode: u16,
        path: &'a [u8],
        handle_out: &'a mut FileHandle,
    },
}

/// Composes the drive map and the transaction engine, the way `main()` in
/// the original does implicitly through its global state.
pub struct Engine {
    drives: DriveMap,
    tx: TransactionEngine,
}

impl Engine {
    /// Bootstraps the engine: opens the link, learns the peer MAC if
    /// requested, and marks the given drives as network/physical. Mirrors
    /// spec §4.G steps 2-6 ("install the interception hook" has no analogue
    /// here — that is the caller's responsibility).
    pub fn install(
        link: Box<dyn LinkLayer>,
        mut drives: DriveMap,
        peer_mac: Option<MacAddr>,
        protocol_version: u8,
        checksum_enabled: bool,
        current_dirs: &mut [CurrentDir; 26],
    ) -> Result<Self> {
        if drives.is_empty() {
            return Err(EngineError::NoMappings);
        }

        let auto_discover = peer_mac.is_none();
        let mut tx = TransactionEngine::new(
            link,
            peer_mac.unwrap_or(MacAddr::BROADCAST),
            protocol_version,
            checksum_enabled,
        );

        if auto_discover {
            let first_local = drives
                .enumerate()
                .next()
                .expect("drives checked non-empty above");
            tx.transact(
                etherdfs_proto::OpCode::Diskspace.as_byte(),
                drives.resolve(first_local).expect("drive just enumerated"),
                &[],
                true,
            )
            .map_err(|_| EngineError::DiscoveryTimedOut)?;
        }

        for local in drives.enumerate() {
            current_dirs[local as usize].seed_mapped(local);
        }

        drives.install();
        Ok(Engine { drives, tx })
    }

    /// Tears down the engine: clears the current-directory flags this
    /// engine set at install. Link-driver release and shared-memory release
    /// happen implicitly when `Engine` is dropped.
    pub fn uninstall(&self, current_dirs: &mut [CurrentDir; 26]) {
        for local in self.drives.enumerate() {
            current_dirs[local as usize].clear();
        }
    }

    pub fn drives(&self) -> &DriveMap {
        &self.drives
    }

    pub fn peer_mac(&self) -> MacAddr {
        self.tx.peer_mac()
    }

    /// Runs one dispatcher call to completion. Operations whose payload
    /// carries bulk data (READFIL) also return that data; call
    /// [`Engine::dispatch`] for everything else.
    pub fn dispatch(&mut self, call: EngineCall<'_>) -> DispatchOutcome {
        self.dispatch_with_data(call).0
    }

    pub fn dispatch_with_data(&mut self, call: EngineCall<'_>) -> (DispatchOutcome, Vec<u8>) {
        match call {
            EngineCall::InstallCheck => (dispatch::install_check(), Vec::new()),
            EngineCall::Unknown2d => (dispatch::unknown_2d(), Vec::new()),
            EngineCall::Unlockfil => (dispatch::unlockfil(), Vec::new()),
            EngineCall::Cmmtfil => (dispatch::cmmtfil(), Vec::new()),
            EngineCall::Rmdir {
                local_drive,
                path,
                is_current_dir,
            } => (
                dispatch::rmdir(&mut self.tx, &self.drives, local_drive, path, is_current_dir),
                Vec::new(),
            ),
            EngineCall::Mkdir { local_drive, path } => (
                dispatch::mkdir(&mut self.tx, &self.drives, local_drive, path),
                Vec::new(),
            ),
            EngineCall::Chdir { local_drive, path } => (
                dispatch::chdir(&mut self.tx, &self.drives, local_drive, path),
                Vec::new(),
            ),
            EngineCall::Clsfil { handle } => (
                dispatch::clsfil(&mut self.tx, &self.drives, handle),
                Vec::new(),
            ),
            EngineCall::Readfil {
                handle,
                requested_len,
            } => dispatch::readfil(&mut self.tx, &self.drives, handle, requested_len),
            EngineCall::Writefil { handle, data } => (
                dispatch::writefil(&mut self.tx, &self.drives, handle, data),
                Vec::new(),
            ),
            EngineCall::Lockfil {
                local_drive,
                file_id,
                regions,
                unlock,
            } => (
                dispatch::lockfil(&mut self.tx, &self.drives, local_drive, file_id, regions, unlock),
                Vec::new(),
            ),
            EngineCall::Diskspace { local_drive } => (
                dispatch::diskspace(&mut self.tx, &self.drives, local_drive),
                Vec::new(),
            ),
            EngineCall::Setattr {
                local_drive,
                attr,
                path,
            } => (
                dispatch::setattr(&mut self.tx, &self.drives, local_drive, attr, path),
                Vec::new(),
            ),
            EngineCall::Getattr { local_drive, path } => (
                dispatch::getattr(&mut self.tx, &self.drives, local_drive, path),
                Vec::new(),
            ),
            EngineCall::Rename {
                old_drive,
                new_drive,
                old_path,
                new_path,
                new_path_has_wildcards,
            } => (
                dispatch::rename(
                    &mut self.tx,
                    &self.drives,
                    old_drive,
                    new_drive,
                    old_path,
                    new_path,
                    new_path_has_wildcards,
                ),
                Vec::new(),
            ),
            EngineCall::Delete { local_drive, path } => (
                dispatch::delete(&mut self.tx, &self.drives, local_drive, path),
                Vec::new(),
            ),
            EngineCall::Open {
                local_drive,
                stack_word,
                path,
                path_has_wildcards,
                handle_out,
            } => (
                dispatch::open(
                    &mut self.tx,
                    &self.drives,
                    local_drive,
                    stack_word,
                    path,
                    path_has_wildcards,
                    handle_out,
                ),
                Vec::new(),
            ),
            EngineCall::Create {
                local_drive,
                stack_word,
                path,
                path_has_wildcards,
                handle_out,
            } => (
                dispatch::create(
                    &mut self.tx,
                    &self.drives,
                    local_drive,
                    stack_word,
                    path,
                    path_has_wildcards,
                    handle_out,
                ),
                Vec::new(),
            ),
            EngineCall::Findfirst {
                local_drive,
                attr,
                path,
                state_out,
            } => (
                dispatch::findfirst(&mut self.tx, &self.drives, local_drive, attr, path, state_out),
                Vec::new(),
            ),
            EngineCall::Findnext { state } => {
                (dispatch::findnext(&mut self.tx, &self.drives, state), Vec::new())
            }
            EngineCall::Skfmend {
                handle,
                offset_lo,
                offset_hi,
            } => (
                dispatch::skfmend(&mut self.tx, &self.drives, handle, offset_lo, offset_hi),
                Vec::new(),
            ),
            EngineCall::Spopnfil {
                local_drive,
                stack_word,
                action,
                mode,
                path,
                handle_out,
            } => (
                dispatch::spopnfil(
                    &mut self.tx,
                    &self.drives,
                    local_drive,
                    stack_word,
                    action,
                    mode,
                    path,
                    handle_out,
                ),
                Vec::new(),
            ),
        }
    }
}
