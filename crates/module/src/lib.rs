//! Go module plumbing around the splicer: locating modules and their entry
//! files, keeping `go.mod` requirements in line, and invoking the go tool.

mod command;
mod discovery;
mod error;
mod gomod;

pub use command::{run_command, run_go_command, CommandOutcome};
pub use discovery::{
    find_entry_file, find_module_descriptor, find_modules, is_entry_source, MODULE_DESCRIPTOR,
};
pub use error::{ModuleError, Result};
pub use gomod::{ensure_requirements, update_go_mod, Requirement, RequirementEdit};

use std::path::{Path, PathBuf};

/// Like [`find_module_descriptor`], but a missing `go.mod` is an error
pub fn require_module(dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    find_module_descriptor(dir).ok_or_else(|| ModuleError::NotAModule(dir.to_path_buf()))
}
