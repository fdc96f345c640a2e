//! libzomboid – public API surface for the save backup core.
//!
//! The CLI crate depends *only* on what is exported here: configuration,
//! the save locator and the backup manager, plus the collaborators they
//! lean on (zip archives and the trash).

#![deny(warnings)]

pub mod archive;
pub mod backup;
pub mod config;
pub mod error;
pub mod logging;
pub mod save;
pub mod trash;

#[cfg(test)]
mod test_utils;

pub use backup::{BackupManager, Operation, Outcome, Selectors};
pub use config::Config;
pub use save::{GameMode, Save, SaveLocator};
