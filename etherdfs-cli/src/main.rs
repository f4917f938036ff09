mod cli;
mod demo_peer;

use clap::Parser;
use etherdfs_core::{CurrentDir, Engine, EngineCall, FileHandle, SearchState};
use etherdfs_proto::MacAddr;
use etherdfs_transport::{LinkLayer, LoopbackLink};

use cli::{Cli, Command, DriveMapping, MapArgs, PeerAddr, ServeArgs};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Map(args) => run_map(args),
        Command::Unload => run_unload(),
        Command::Serve(args) => run_serve(args),
    }
}

fn drive_map_from(mappings: &[DriveMapping]) -> anyhow::Result<etherdfs_core::DriveMap> {
    let mut drives = etherdfs_core::DriveMap::new();
    for m in mappings {
        drives.map_local(m.local, m.remote)?;
    }
    Ok(drives)
}

fn run_map(args: MapArgs) -> anyhow::Result<()> {
    #[cfg(target_os = "linux")]
    {
        let link = etherdfs_transport::RawEthernetLink::open(&args.interface)?;
        install_and_log(args, Box::new(link))
    }
    #[cfg(not(target_os = "linux"))]
    {
        anyhow::bail!("raw-ethernet link is only available on Linux");
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn install_and_log(args: MapArgs, link: Box<dyn LinkLayer>) -> anyhow::Result<()> {
    let drives = drive_map_from(&args.drives)?;
    let peer_mac = match args.peer {
        PeerAddr::Auto => None,
        PeerAddr::Fixed(mac) => Some(mac),
    };
    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let engine = Engine::install(
        link,
        drives,
        peer_mac,
        args.protocol_version,
        !args.no_checksum,
        &mut current_dirs,
    )?;

    log::info!("mapped {} drive(s), peer {}", engine.drives().enumerate().count(), engine.peer_mac());
    for local in engine.drives().enumerate() {
        let letter = (b'A' + local) as char;
        log::info!("  {letter}: -> {}", String::from_utf8_lossy(&current_dirs[local as usize].path));
    }
    Ok(())
}

fn run_unload() -> anyhow::Result<()> {
    // Without a real interception point to unhook, unload has nothing
    // persistent to undo in this reimplementation; see the Non-goals note
    // on DOS interception mechanics.
    log::info!("unload requested; no resident session to tear down on this host");
    Ok(())
}

fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    let drives = drive_map_from(&args.drives)?;
    let (client_link, peer_link) = LoopbackLink::pair(
        MacAddr::new([0x02, 0, 0, 0, 0, 1]),
        MacAddr::new([0x02, 0, 0, 0, 0, 2]),
    );
    demo_peer::spawn(peer_link, args.root.clone());

    let mut current_dirs: [CurrentDir; 26] = Default::default();
    let mut engine = Engine::install(
        Box::new(client_link),
        drives,
        Some(MacAddr::new([0x02, 0, 0, 0, 0, 2])),
        1,
        false,
        &mut current_dirs,
    )?;

    let first_local = engine
        .drives()
        .enumerate()
        .next()
        .expect("install rejects empty drive maps");

    let space = engine.dispatch(EngineCall::Diskspace { local_drive: first_local });
    println!(
        "DISKSPACE: sectors/cluster={} total={} bytes/sector={} free={}",
        space.ax, space.bx, space.cx, space.dx
    );

    let mut search = SearchState::default();
    let found = engine.dispatch(EngineCall::Findfirst {
        local_drive: first_local,
        attr: 0x10,
        path: b"*.*",
        state_out: &mut search,
    });
    if found.carry {
        println!("FINDFIRST: no entries under {}", args.root.display());
    } else {
        println!(
            "FINDFIRST: attr={:#04x} size={} (parent_cluster={}, dir_entry={})",
            found.ax, found.di as u32 | ((found.bx as u32) << 16), search.parent_cluster, search.dir_entry
        );

        let mut handle = FileHandle::default();
        let open = engine.dispatch(EngineCall::Open {
            local_drive: first_local,
            stack_word: 0x0002,
            path: b"\\DUMMY.TXT",
            path_has_wildcards: false,
            handle_out: &mut handle,
        });
        if open.carry {
            println!("OPEN: status {}", open.ax);
        } else {
            println!(
                "OPEN: file_id={:#06x} size={} open_mode={:#04x}",
                handle.file_id, handle.size, handle.open_mode
            );
        }
    }

    engine.uninstall(&mut current_dirs);
    Ok(())
}
