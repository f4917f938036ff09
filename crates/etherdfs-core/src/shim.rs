//! Host-owned control blocks.
//!
//! Per spec, file handles, directory searches and current-directory state
//! belong to the caller, not the engine — the dispatcher only reads and
//! mutates them through `&mut` references handed in by whoever is
//! interposing on the redirector call (a real DOS shim, or the CLI's demo
//! in-memory one).

/// Stand-in for an SFT (system file table) entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileHandle {
    pub file_id: u16,
    /// Device-info word: bits 0..5 the owning drive, bit 14 set by EtherDFS
    /// to mark the handle as ours, bit 15 the documented-no-op "FCB open"
    /// flag (see `is_fcb_open`).
    pub device_info: u16,
    /// Open-mode word: low byte granted by the peer on OPEN/CREATE, high
    /// byte preserved from whatever the host had already set.
    pub open_mode: u16,
    pub position: u32,
    pub size: u32,
    pub attr: u8,
    pub name: [u8; 11],
}

impl FileHandle {
    pub fn drive(&self) -> u8 {
        (self.device_info & 0x3F) as u8
    }

    /// Bit 0 of the open-mode low byte: write-only.
    pub fn is_write_only(&self) -> bool {
        self.open_mode & 0x01 != 0
    }

    /// Low two bits of the open-mode low byte both clear: read-only.
    pub fn is_read_only(&self) -> bool {
        self.open_mode & 0x03 == 0
    }

    /// Bit 15 of the open-mode word. The original leaves the corresponding
    /// "Set FCB Owner" call as an unfinished TODO; this is preserved as a
    /// documented no-op rather than invented behavior — the bit is exposed
    /// here and nowhere acted upon.
    pub fn is_fcb_open(&self) -> bool {
        self.open_mode & 0x8000 != 0
    }

    /// Populates handle fields from an OPEN/CREATE/SPOPNFIL reply, per the
    /// population rule in the operation dispatcher: clear position, set
    /// device-info to `0x8040 | drive`, copy name/attr, and overwrite only
    /// the open-mode low byte.
    pub fn populate_from_reply(
        &mut self,
        drive: u8,
        reply: &etherdfs_proto::ops::SftReply,
    ) {
        self.file_id = reply.file_id;
        self.device_info = 0x8040 | (drive as u16);
        self.open_mode = (self.open_mode & 0xFF00) | reply.open_mode_low as u16;
        self.position = 0;
        self.size = reply.size;
        self.attr = reply.attr;
        self.name = reply.name;
    }
}

/// Stand-in for a FINDFIRST/FINDNEXT search (DTA-equivalent) control block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Low 5 bits are the owning drive.
    pub drive_byte: u8,
    pub attr: u8,
    /// The FCB-style search pattern, set once at FINDFIRST and echoed
    /// verbatim on every following FINDNEXT. Never touched by a reply.
    pub search_template: [u8; 11],
    /// The most recently matched file's FCB-style name, refreshed by every
    /// FINDFIRST/FINDNEXT reply.
    pub found_name: [u8; 11],
    pub parent_cluster: u16,
    pub dir_entry: u16,
    pub exhausted: bool,
}

impl SearchState {
    pub fn drive(&self) -> u8 {
        self.drive_byte & 0x1F
    }

    /// Records a matched entry. Only the found-name and continuation tokens
    /// move here; `search_template` is fixed for the lifetime of the search.
    pub fn apply_reply(&mut self, reply: &etherdfs_proto::ops::FindReply) {
        self.found_name = reply.name;
        self.parent_cluster = reply.parent_cluster;
        self.dir_entry = reply.dir_entry;
    }
}

/// Stand-in for a CDS (current-directory structure) entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentDir {
    pub path: Vec<u8>,
    pub network: bool,
    pub physical: bool,
}

impl CurrentDir {
    /// Seeds a freshly-mapped drive's CDS the way install does: path is
    /// `X:\`, both the network and physical flags set.
    pub fn seed_mapped(&mut self, local_drive: u8) {
        let letter = b'A' + local_drive;
        self.path = vec![letter, b':', b'\\'];
        self.network = true;
        self.physical = true;
    }

    /// Clears the flags set by [`CurrentDir::seed_mapped`], as teardown does.
    pub fn clear(&mut self) {
        self.network = false;
        self.physical = false;
    }
}
