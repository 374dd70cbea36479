//! Requirement rewriting for `go.mod`.
//!
//! Only the `require` directives are interpreted. Every other byte of the file
//! is carried through untouched.

use crate::error::{ModuleError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A module the rewritten go.mod must require
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub path: String,
    pub version: String,
}

impl Requirement {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

/// Change applied to go.mod
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RequirementEdit {
    Added {
        path: String,
        version: String,
    },
    Updated {
        path: String,
        from: String,
        to: String,
    },
}

#[derive(Debug)]
struct RequireEntry {
    path: String,
    version: String,
    version_start: usize,
}

#[derive(Debug, Default)]
struct RequireIndex {
    entries: Vec<RequireEntry>,
    /// Start of the line holding `)` of the first `require ( ... )` block
    first_block_close: Option<usize>,
}

fn index_requirements(text: &str) -> RequireIndex {
    let mut index = RequireIndex::default();
    let mut in_block = false;
    let mut line_start = 0;

    for line in text.split_inclusive('\n') {
        let code = line.split("//").next().unwrap_or_default();
        let trimmed = code.trim();

        if in_block {
            if trimmed.starts_with(')') {
                in_block = false;
                index.first_block_close.get_or_insert(line_start);
            } else {
                parse_entry(code, line_start, &mut index.entries);
            }
        } else if let Some(rest) = trimmed.strip_prefix("require") {
            if rest.trim_start().starts_with('(') {
                // `require ()` on one line has nothing to track
                in_block = !rest.contains(')');
            } else if rest.starts_with(char::is_whitespace) {
                let offset = code.find("require").unwrap_or(0) + "require".len();
                parse_entry(&code[offset..], line_start + offset, &mut index.entries);
            }
        }

        line_start += line.len();
    }

    index
}

/// Parse `path version` out of `code`, which starts at byte `base` of the file
fn parse_entry(code: &str, base: usize, entries: &mut Vec<RequireEntry>) {
    let mut tokens = code.split_whitespace();
    let (Some(path_token), Some(version)) = (tokens.next(), tokens.next()) else {
        return;
    };

    let path_end = code.find(path_token).unwrap_or(0) + path_token.len();
    let Some(version_rel) = code[path_end..].find(version) else {
        return;
    };

    entries.push(RequireEntry {
        path: path_token.trim_matches('"').to_string(),
        version: version.to_string(),
        version_start: base + path_end + version_rel,
    });
}

/// Make `text` require every module in `requirements`.
///
/// Missing modules are appended to the first `require ( ... )` block, or to a
/// new block at the end of the file. A required module pinned to another
/// version is rewritten to the configured one.
pub fn ensure_requirements(
    text: &str,
    requirements: &[Requirement],
) -> (String, Vec<RequirementEdit>) {
    let index = index_requirements(text);

    // (offset, bytes replaced, replacement)
    let mut patches: Vec<(usize, usize, String)> = Vec::new();
    let mut edits = Vec::new();
    let mut additions = String::new();
    let mut seen = HashSet::new();

    for req in requirements {
        if !seen.insert(req.path.as_str()) {
            continue;
        }

        match index.entries.iter().find(|e| e.path == req.path) {
            Some(entry) if entry.version == req.version => {}
            Some(entry) => {
                patches.push((entry.version_start, entry.version.len(), req.version.clone()));
                edits.push(RequirementEdit::Updated {
                    path: req.path.clone(),
                    from: entry.version.clone(),
                    to: req.version.clone(),
                });
            }
            None => {
                additions.push_str(&format!("\t{} {}\n", req.path, req.version));
                edits.push(RequirementEdit::Added {
                    path: req.path.clone(),
                    version: req.version.clone(),
                });
            }
        }
    }

    if !additions.is_empty() {
        match index.first_block_close {
            Some(offset) => patches.push((offset, 0, additions)),
            None => {
                let mut block = String::new();
                if !text.is_empty() && !text.ends_with('\n') {
                    block.push('\n');
                }
                if !text.is_empty() {
                    block.push('\n');
                }
                block.push_str(&format!("require (\n{additions})\n"));
                patches.push((text.len(), 0, block));
            }
        }
    }

    patches.sort_by(|a, b| b.0.cmp(&a.0));
    let mut out = text.to_string();
    for (offset, len, replacement) in patches {
        out.replace_range(offset..offset + len, &replacement);
    }

    (out, edits)
}

/// Rewrite the go.mod at `path` in place; the file is left alone when nothing changes
pub fn update_go_mod(path: impl AsRef<Path>, requirements: &[Requirement]) -> Result<Vec<RequirementEdit>> {
    let path = path.as_ref();
    if requirements.is_empty() {
        return Ok(Vec::new());
    }

    let text = std::fs::read_to_string(path).map_err(|e| ModuleError::io(path, e))?;
    let (updated, edits) = ensure_requirements(&text, requirements);

    if edits.is_empty() {
        log::debug!("{} already satisfies all requirements", path.display());
        return Ok(edits);
    }

    std::fs::write(path, updated).map_err(|e| ModuleError::io(path, e))?;
    for edit in &edits {
        match edit {
            RequirementEdit::Added { path: module, version } => {
                log::info!("go.mod: require {module} {version}");
            }
            RequirementEdit::Updated { path: module, from, to } => {
                log::info!("go.mod: {module} {from} -> {to}");
            }
        }
    }
    Ok(edits)
}
