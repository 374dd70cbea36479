use crate::report::{ModuleReport, ModuleStatus};
use crate::settings::Settings;
use goinject_module::{
    find_entry_file, find_module_descriptor, require_module, run_go_command, update_go_mod,
};
use goinject_splicer::Injector;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Optional go tool steps run after injection
#[derive(Debug, Clone, Copy, Default)]
pub struct PostSteps {
    pub fmt: bool,
    pub tidy: bool,
}

/// Shared, read-only inputs of a run
pub struct Pipeline {
    settings: Settings,
    injector: Injector,
    post: PostSteps,
}

impl Pipeline {
    pub fn new(settings: Settings, post: PostSteps) -> Self {
        let injector = Injector::new(settings.service_loading.clone());
        Self {
            settings,
            injector,
            post,
        }
    }

    /// Process modules concurrently; a failing module never affects the others
    pub async fn run(self: Arc<Self>, modules: Vec<PathBuf>) -> Vec<ModuleReport> {
        let mut tasks = JoinSet::new();
        for dir in modules {
            let pipeline = Arc::clone(&self);
            tasks.spawn(async move { pipeline.process_module(dir).await });
        }

        let mut reports = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => log::error!("Module task aborted: {e}"),
            }
        }
        reports.sort_by(|a, b| a.dir.cmp(&b.dir));
        reports
    }

    async fn process_module(self: Arc<Self>, dir: PathBuf) -> ModuleReport {
        let pipeline = Arc::clone(&self);
        let blocking_dir = dir.clone();
        let edited = tokio::task::spawn_blocking(move || pipeline.edit_sources(blocking_dir)).await;

        let mut report = match edited {
            Ok(report) => report,
            Err(e) => return ModuleReport::failed(dir, format!("source edit task failed: {e}")),
        };
        if find_module_descriptor(&dir).is_none() {
            return report;
        }

        if self.post.fmt {
            report.commands.push(run_go_command(&dir, &["fmt", "./..."]).await);
        }
        if self.post.tidy {
            report.commands.push(run_go_command(&dir, &["mod", "tidy"]).await);
        }
        report
    }

    /// go.mod first, then the entry file. Each step reports its own failure.
    fn edit_sources(&self, dir: PathBuf) -> ModuleReport {
        log::info!("Processing {}", dir.display());

        let go_mod = match require_module(&dir) {
            Ok(path) => path,
            Err(e) => return ModuleReport::failed(dir, e.to_string()),
        };
        let mut report = ModuleReport::new(dir);

        match update_go_mod(&go_mod, &self.settings.go_mod.require) {
            Ok(edits) => report.go_mod_edits = edits,
            Err(e) => report.fail(format!("update go.mod: {e}")),
        }

        let Some(entry) = find_entry_file(&report.dir) else {
            log::info!(
                "Main file is not found in {}, skipping injection",
                report.dir.display()
            );
            return report;
        };
        report.entry_file = Some(entry.clone());

        match self.injector.inject_file(&entry) {
            Ok(outcome) => {
                report.injection = Some(outcome);
                if report.status != ModuleStatus::Failed {
                    report.status = ModuleStatus::Updated;
                }
            }
            Err(e) => report.fail(format!("inject {}: {e}", entry.display())),
        }
        report
    }
}
