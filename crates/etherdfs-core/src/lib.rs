//! The redirector engine: drive map, transaction engine, operation
//! dispatcher, and bootstrap/teardown lifecycle.

pub mod dispatch;
pub mod drive_map;
pub mod engine;
pub mod error;
pub mod shim;
pub mod transaction;

pub use drive_map::DriveMap;
pub use engine::{Engine, EngineCall};
pub use error::{EngineError, Result};
pub use shim::{CurrentDir, FileHandle, SearchState};
pub use transaction::TransactionEngine;
