use goinject_module::{CommandOutcome, RequirementEdit};
use goinject_splicer::InjectionOutcome;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    /// Entry file rewritten
    Updated,
    /// No entry file; only go.mod was considered
    NoEntryFile,
    /// At least one step failed
    Failed,
}

/// What happened to one Go module
#[derive(Debug, Clone, Serialize)]
pub struct ModuleReport {
    pub dir: PathBuf,
    pub status: ModuleStatus,
    pub go_mod_edits: Vec<RequirementEdit>,
    pub entry_file: Option<PathBuf>,
    pub injection: Option<InjectionOutcome>,
    pub commands: Vec<CommandOutcome>,
    pub errors: Vec<String>,
}

impl ModuleReport {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            status: ModuleStatus::NoEntryFile,
            go_mod_edits: Vec::new(),
            entry_file: None,
            injection: None,
            commands: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn failed(dir: PathBuf, error: impl Into<String>) -> Self {
        let mut report = Self::new(dir);
        report.fail(error);
        report
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = ModuleStatus::Failed;
        self.errors.push(error.into());
    }
}

/// Everything one invocation did
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: PathBuf,
    pub modules: Vec<ModuleReport>,
}

impl RunReport {
    pub fn failed_count(&self) -> usize {
        self.modules
            .iter()
            .filter(|m| m.status == ModuleStatus::Failed)
            .count()
    }

    /// Human-readable summary through the log
    pub fn log_summary(&self) {
        for module in &self.modules {
            match module.status {
                ModuleStatus::Updated => {
                    if let Some(entry) = &module.entry_file {
                        log::info!("{}: updated {}", module.dir.display(), entry.display());
                    }
                }
                ModuleStatus::NoEntryFile => {
                    log::info!("{}: no main file, injection skipped", module.dir.display());
                }
                ModuleStatus::Failed => {
                    for error in &module.errors {
                        log::error!("{}: {error}", module.dir.display());
                    }
                }
            }
            for command in module.commands.iter().filter(|c| !c.ok) {
                log::warn!("{}: '{}' failed", module.dir.display(), command.command);
            }
        }
        log::info!(
            "Processed {} modules, {} failed",
            self.modules.len(),
            self.failed_count()
        );
    }
}
