use crate::anchor::{locate_import_anchor, locate_init_anchor};
use crate::config::InjectionConfig;
use crate::error::{Result, SplicerError};
use crate::format::{render_imports, render_init_statements};
use crate::parser::{GoParser, SyntaxParser};
use crate::splice::{at_line_start, splice};
use crate::types::{AnchorMode, InsertionAnchor};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Summary of one successfully processed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectionOutcome {
    pub path: PathBuf,
    /// How the import pass anchored, `None` when it was skipped
    pub import_mode: Option<AnchorMode>,
    /// How the init pass anchored, `None` when it was skipped
    pub init_mode: Option<AnchorMode>,
    pub bytes_before: usize,
    pub bytes_after: usize,
}

/// Result for one file of a batch
#[derive(Debug)]
pub struct FileInjection {
    pub path: PathBuf,
    pub result: Result<InjectionOutcome>,
}

/// Runs the import pass and then the init pass over Go sources
pub struct Injector {
    config: InjectionConfig,
}

impl Injector {
    /// Create an injector; configured strings are inserted verbatim
    pub fn new(config: InjectionConfig) -> Self {
        for entry in config.suspicious_entries() {
            log::warn!("Suspicious service loading entry: {entry}");
        }
        Self { config }
    }

    pub fn config(&self) -> &InjectionConfig {
        &self.config
    }

    /// Transform source text in memory
    pub fn inject_str(&self, src: &str) -> Result<String> {
        let mut parser = GoParser::new()?;
        self.inject_with(&mut parser, src)
    }

    /// Transform source text with a caller-supplied parser
    pub fn inject_with<P: SyntaxParser + ?Sized>(&self, parser: &mut P, src: &str) -> Result<String> {
        self.run_passes(parser, src).map(|(text, _, _)| text)
    }

    /// Read, transform and write back a single file.
    ///
    /// Nothing is written unless both passes succeed.
    pub fn inject_file(&self, path: impl AsRef<Path>) -> Result<InjectionOutcome> {
        let path = path.as_ref();
        let src = std::fs::read_to_string(path).map_err(|source| SplicerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut parser = GoParser::new()?;
        let (text, import_anchor, init_anchor) = self.run_passes(&mut parser, &src)?;

        write_atomic(path, text.as_bytes()).map_err(|source| SplicerError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Updated {}", path.display());

        Ok(InjectionOutcome {
            path: path.to_path_buf(),
            import_mode: import_anchor.map(|a| a.mode),
            init_mode: init_anchor.map(|a| a.mode),
            bytes_before: src.len(),
            bytes_after: text.len(),
        })
    }

    /// Process files one after another; a failure only affects its own file
    pub fn inject_files<I>(&self, paths: I) -> Vec<FileInjection>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        paths
            .into_iter()
            .map(|path| {
                let path = path.as_ref().to_path_buf();
                let result = self.inject_file(&path);
                if let Err(e) = &result {
                    log::warn!("Skipping {}: {e}", path.display());
                }
                FileInjection { path, result }
            })
            .collect()
    }

    fn run_passes<P: SyntaxParser + ?Sized>(
        &self,
        parser: &mut P,
        src: &str,
    ) -> Result<(String, Option<InsertionAnchor>, Option<InsertionAnchor>)> {
        let (text, import_anchor) = import_pass(parser, src, &self.config.imports)?;
        // Offsets from the import pass are stale now; the init pass re-parses.
        let (text, init_anchor) = init_pass(parser, &text, &self.config.init_statements)?;
        Ok((text, import_anchor, init_anchor))
    }
}

/// Insert import paths into `src`, returning it unchanged when `imports` is empty
pub fn insert_imports<P: SyntaxParser + ?Sized>(
    parser: &mut P,
    src: &str,
    imports: &[String],
) -> Result<String> {
    import_pass(parser, src, imports).map(|(text, _)| text)
}

/// Insert init statements into `src`, returning it unchanged when `statements` is empty
pub fn insert_init_statements<P: SyntaxParser + ?Sized>(
    parser: &mut P,
    src: &str,
    statements: &[String],
) -> Result<String> {
    init_pass(parser, src, statements).map(|(text, _)| text)
}

fn import_pass<P: SyntaxParser + ?Sized>(
    parser: &mut P,
    src: &str,
    imports: &[String],
) -> Result<(String, Option<InsertionAnchor>)> {
    if imports.is_empty() {
        return Ok((src.to_string(), None));
    }

    let tree = parser.parse(src)?;
    let anchor = locate_import_anchor(&tree);
    log::debug!("import anchor: {anchor:?}");

    let insertion = render_imports(imports, anchor.mode);
    Ok((splice_at_anchor(src, &insertion, anchor), Some(anchor)))
}

fn init_pass<P: SyntaxParser + ?Sized>(
    parser: &mut P,
    src: &str,
    statements: &[String],
) -> Result<(String, Option<InsertionAnchor>)> {
    if statements.is_empty() {
        return Ok((src.to_string(), None));
    }

    let tree = parser.parse(src)?;
    let anchor = locate_init_anchor(&tree);
    log::debug!("init anchor: {anchor:?}");

    let insertion = render_init_statements(statements, anchor.mode);
    Ok((splice_at_anchor(src, &insertion, anchor), Some(anchor)))
}

/// Rendered blocks are line-oriented; start a fresh line when the anchor sits
/// after other code on the same line (`func init() {}`, missing final newline).
/// Blanks between that code and the anchor are dropped with the line break.
fn splice_at_anchor(src: &str, insertion: &str, anchor: InsertionAnchor) -> String {
    if at_line_start(src, anchor.offset) {
        return splice(src, insertion, anchor.offset);
    }

    let code_end = src[..anchor.offset].trim_end_matches([' ', '\t']).len();
    let mut out = splice(&src[..code_end], &format!("\n{insertion}"), code_end);
    out.push_str(&src[anchor.offset..]);
    out
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = parent.join(format!(
        ".{}.goinject-tmp-{}",
        path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("source"),
        std::process::id()
    ));

    let written = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, path)
    })();

    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}
