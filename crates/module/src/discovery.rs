use ignore::{DirEntry, WalkBuilder};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// File name of the Go module descriptor
pub const MODULE_DESCRIPTOR: &str = "go.mod";

const CONVENTIONAL_ENTRY: &str = "main.go";

// Directories the go tool itself ignores or that belong to someone else
const SKIPPED_DIRS: &[&str] = &["vendor", "testdata", "node_modules"];

static PACKAGE_MAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*package\s+main\b").expect("valid regex"));
static FUNC_MAIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*func\s+main\s*\(\s*\)").expect("valid regex"));

/// `dir/go.mod` when it exists
pub fn find_module_descriptor(dir: impl AsRef<Path>) -> Option<PathBuf> {
    let path = dir.as_ref().join(MODULE_DESCRIPTOR);
    path.is_file().then_some(path)
}

/// True when the text declares `package main` with a `func main()`
pub fn is_entry_source(text: &str) -> bool {
    PACKAGE_MAIN.is_match(text) && FUNC_MAIN.is_match(text)
}

/// Locate the program entry file of the module rooted at `dir`.
///
/// `main.go` at the root wins; otherwise the first entry source in path order
/// that belongs to this module (nested modules are not searched).
pub fn find_entry_file(dir: impl AsRef<Path>) -> Option<PathBuf> {
    let dir = dir.as_ref();

    let conventional = dir.join(CONVENTIONAL_ENTRY);
    if is_entry_file(&conventional) {
        return Some(conventional);
    }

    let root = dir.to_path_buf();
    let mut builder = WalkBuilder::new(dir);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .filter_entry(move |entry| !is_skipped_dir(entry) && !is_nested_module(entry, &root));

    let mut candidates = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|t| t.is_file()) && is_go_source(entry.path()) {
                    candidates.push(entry.into_path());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }
    candidates.sort();

    let found = candidates.into_iter().find(|path| is_entry_file(path));
    match &found {
        Some(path) => log::debug!("Entry file for {}: {}", dir.display(), path.display()),
        None => log::debug!("No entry file under {}", dir.display()),
    }
    found
}

/// Every directory at or below `root` that holds a `go.mod`, in path order
pub fn find_modules(root: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(root.as_ref());
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .filter_entry(|entry| !is_skipped_dir(entry));

    let mut modules = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                let is_descriptor = entry.file_type().is_some_and(|t| t.is_file())
                    && entry.file_name() == MODULE_DESCRIPTOR;
                if let (true, Some(parent)) = (is_descriptor, entry.path().parent()) {
                    modules.push(parent.to_path_buf());
                }
            }
            Err(e) => log::warn!("Failed to read entry: {e}"),
        }
    }
    modules.sort();

    log::info!("Found {} go modules", modules.len());
    modules
}

fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

fn is_entry_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    match std::fs::read_to_string(path) {
        Ok(text) => is_entry_source(&text),
        Err(e) => {
            log::debug!("Skipping unreadable {}: {e}", path.display());
            false
        }
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_nested_module(entry: &DirEntry, root: &Path) -> bool {
    entry.file_type().is_some_and(|t| t.is_dir())
        && entry.path() != root
        && entry.path().join(MODULE_DESCRIPTOR).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_entry_source() {
        assert!(is_entry_source("package main\n\nfunc main() {\n}\n"));
        assert!(!is_entry_source("package lib\n\nfunc main() {}\n"));
        assert!(!is_entry_source("package main\n\nfunc mainLoop() {}\n"));
        assert!(!is_entry_source("package main\n\nfunc (s S) main() {}\n"));
    }

    #[test]
    fn test_is_go_source() {
        assert!(is_go_source(Path::new("cmd/app.go")));
        assert!(!is_go_source(Path::new("app_test.go")));
        assert!(!is_go_source(Path::new("go.mod")));
    }
}
